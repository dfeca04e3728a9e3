//! Cell access, row lifecycle and error annotations
//!
//! Writes go to the Proposed slot while an edit is open and straight to
//! Current otherwise. A direct write is a committing mutation: it is
//! staged and checked before its post-change notifications fire.

use crate::events::{ColumnChangeEvent, ColumnPhase, RowChange};
use crate::table::Table;
use crate::validation::{Notice, Staged};
use tessera_core::{ColumnId, ColumnKey, Error, Result, RowId, RowState, RowVersion, Value};
use tracing::{debug, trace};

impl Table {
    // ========================================================================
    // Reads
    // ========================================================================

    /// Default-version value of a cell
    pub fn get<'k>(&self, row: RowId, column: impl Into<ColumnKey<'k>>) -> Result<&Value> {
        self.get_version(row, column, RowVersion::Default)
    }

    /// Value of a cell at `version`
    ///
    /// Fails with `VersionNotFound` when the row's state has no such version.
    pub fn get_version<'k>(
        &self,
        row: RowId,
        column: impl Into<ColumnKey<'k>>,
        version: RowVersion,
    ) -> Result<&Value> {
        let index = self.column_index(column)?;
        self.record(row)?.read(index, version)
    }

    /// Whether the Default-version value is null
    pub fn is_null<'k>(&self, row: RowId, column: impl Into<ColumnKey<'k>>) -> Result<bool> {
        Ok(self.get(row, column)?.is_null())
    }

    /// Whether the value at `version` is null
    pub fn is_null_version<'k>(
        &self,
        row: RowId,
        column: impl Into<ColumnKey<'k>>,
        version: RowVersion,
    ) -> Result<bool> {
        Ok(self.get_version(row, column, version)?.is_null())
    }

    /// Whether the row has `version`
    pub fn has_version(&self, row: RowId, version: RowVersion) -> Result<bool> {
        Ok(self.record(row)?.cells().has_version(version))
    }

    /// Lifecycle state of a row
    pub fn row_state(&self, row: RowId) -> Result<RowState> {
        Ok(self.record(row)?.state())
    }

    /// Default-version values in column order
    pub fn item_array(&self, row: RowId) -> Result<Vec<Value>> {
        self.record(row)?
            .cells()
            .version_values(RowVersion::Default)
            .map(<[Value]>::to_vec)
            .ok_or(Error::VersionNotFound {
                version: RowVersion::Default,
            })
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Assign a value to a cell
    pub fn set<'k>(
        &mut self,
        row: RowId,
        column: impl Into<ColumnKey<'k>>,
        value: impl Into<Value>,
    ) -> Result<()> {
        self.set_value(row, column, Some(value.into()))
    }

    /// Assign a value, or no value, to a cell
    ///
    /// `None` stores `Value::Null` unless the column holds a value kind, in
    /// which case it is rejected before any listener runs.
    pub fn set_value<'k>(
        &mut self,
        row: RowId,
        column: impl Into<ColumnKey<'k>>,
        value: Option<Value>,
    ) -> Result<()> {
        let staged = self.stage_set(row, column, value)?;
        self.settle(staged)
    }

    pub(crate) fn stage_set<'k>(
        &mut self,
        row: RowId,
        column: impl Into<ColumnKey<'k>>,
        value: Option<Value>,
    ) -> Result<Option<Staged>> {
        let index = self.column_index(column)?;
        let target = &self.columns()[index];
        if target.is_computed() {
            return Err(Error::InvalidArgument(format!(
                "column '{}' is computed and cannot be assigned",
                target.name()
            )));
        }
        let value = target.normalize(value)?;
        let column_id = target.id();
        let column_name = target.name().to_owned();
        self.prepare_write(row)?;

        let mut event = ColumnChangeEvent {
            table: self.id(),
            row,
            phase: ColumnPhase::Changing,
            column: column_id,
            column_name,
            previous: self.record(row)?.cells().read(index, RowVersion::Default).cloned(),
            proposed: value.clone(),
        };
        self.notify_column(&event);
        event.phase = ColumnPhase::Changed;

        // a listener may have opened or closed an edit
        self.prepare_write(row)?;
        trace!(table = %self.name(), row = %row, column = %event.column_name, "cell write");
        if self.record(row)?.is_editing() {
            self.record_mut(row)?.write_proposed(index, value)?;
            self.notify_column(&event);
            return Ok(None);
        }

        let baseline = self.load_depth > 0;
        let position = self.rows.position(row);
        let record = self.record_mut(row)?;
        let before = record.clone();
        record.write_current(index, value, baseline)?;
        self.recompute(row);
        self.reindex(row);
        Ok(Some(
            Staged::new(row, before, position)
                .notify(Notice::Column(event))
                .notify(Notice::Row(RowChange::Change)),
        ))
    }

    /// Fail on Deleted rows and refill removed ones
    pub(crate) fn prepare_write(&mut self, row: RowId) -> Result<()> {
        let record = self.record(row)?;
        if record.state().is_deleted() {
            return Err(Error::DeletedRowInaccessible);
        }
        if record.cells().is_empty() {
            let values = self.seed_values();
            self.record_mut(row)?.reseed(values);
        }
        Ok(())
    }

    /// Replace every value of a row in one edit
    ///
    /// `values` must hold exactly one entry per column; entries for computed
    /// columns are ignored. The edit commits at the end unless the caller
    /// already had one open.
    pub fn set_item_array(&mut self, row: RowId, values: Vec<Option<Value>>) -> Result<()> {
        let staged = self.stage_assign(row, values)?;
        self.settle(staged)
    }

    pub(crate) fn stage_assign(
        &mut self,
        row: RowId,
        values: Vec<Option<Value>>,
    ) -> Result<Option<Staged>> {
        if values.len() != self.columns().len() {
            return Err(Error::InvalidArgument(format!(
                "input array of {} values does not match the {} columns of table '{}'",
                values.len(),
                self.columns().len(),
                self.name()
            )));
        }
        let writes = self
            .columns()
            .iter()
            .zip(values)
            .enumerate()
            .filter(|(_, (column, _))| !column.is_computed())
            .map(|(index, (column, value))| column.normalize(value).map(|v| (index, v)))
            .collect::<Result<Vec<_>>>()?;
        self.stage_write_many(row, writes)
    }

    /// Write several cells as one edit
    ///
    /// Opens an edit unless one is already open and commits it at the end;
    /// a rejected commit discards the edit it opened.
    pub(crate) fn stage_write_many(
        &mut self,
        row: RowId,
        writes: Vec<(usize, Value)>,
    ) -> Result<Option<Staged>> {
        self.prepare_write(row)?;
        let opened = self.record_mut(row)?.begin_edit()?;
        for (index, value) in writes {
            if let Err(err) = self.stage_set(row, index, Some(value)) {
                if opened {
                    self.record_mut(row)?.cancel_edit();
                }
                return Err(err);
            }
        }
        if !opened {
            return Ok(None);
        }
        let staged = self.stage_end_edit(row)?;
        Ok(staged.map(Staged::cancel_on_revert))
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Delete a row
    ///
    /// Added rows are dropped at once and their id stops resolving; other
    /// rows stay Deleted with only their Original values until changes are
    /// accepted.
    pub fn delete(&mut self, row: RowId) -> Result<()> {
        let staged = self.stage_delete(row)?;
        self.settle(Some(staged))
    }

    pub(crate) fn stage_delete(&mut self, row: RowId) -> Result<Staged> {
        let position = self.rows.position(row);
        let record = self.record_mut(row)?;
        let before = record.clone();
        let from = record.state();
        let to = record.delete()?;
        if to == RowState::Detached {
            self.rows.release(row);
        }
        self.reindex(row);
        debug!(table = %self.name(), row = %row, from = %from, to = %to, "row deleted");
        Ok(Staged::new(row, before, position).notify(Notice::Row(RowChange::Delete)))
    }

    /// Close any open edit and accept the row's changes
    pub fn accept_row(&mut self, row: RowId) -> Result<()> {
        self.end_edit(row)?;
        self.commit_row(row)
    }

    /// Accept changes on a row with no open edit
    ///
    /// A committed deletion frees the row.
    pub(crate) fn commit_row(&mut self, row: RowId) -> Result<()> {
        let record = self.record_mut(row)?;
        let from = record.state();
        let to = record.commit()?;
        if from == to {
            return Ok(());
        }
        if to == RowState::Detached {
            self.rows.release(row);
            self.reindex(row);
        }
        debug!(table = %self.name(), row = %row, from = %from, to = %to, "row committed");
        self.notify_row(row, RowChange::Commit);
        Ok(())
    }

    /// Reject the row's changes, discarding any open edit
    ///
    /// An Added row is dropped and its id stops resolving. The restored
    /// values are checked like any commit; on a violation the row keeps its
    /// changes and is annotated.
    pub fn reject_row(&mut self, row: RowId) -> Result<()> {
        let staged = self.stage_reject(row)?;
        self.settle(staged)
    }

    pub(crate) fn stage_reject(&mut self, row: RowId) -> Result<Option<Staged>> {
        let position = self.rows.position(row);
        let record = self.record_mut(row)?;
        let before = record.clone();
        let from = record.state();
        let editing = record.is_editing();
        let to = record.rollback()?;
        if from == RowState::Detached || (from == RowState::Unchanged && !editing) {
            return Ok(None);
        }
        if to == RowState::Detached {
            self.rows.release(row);
        } else {
            self.recompute(row);
        }
        self.reindex(row);
        debug!(table = %self.name(), row = %row, from = %from, to = %to, "row rolled back");
        Ok(Some(
            Staged::new(row, before, position).notify(Notice::Row(RowChange::Rollback)),
        ))
    }

    /// Force an Unchanged row to Added
    pub fn set_added(&mut self, row: RowId) -> Result<()> {
        self.record_mut(row)?.force_added()?;
        debug!(table = %self.name(), row = %row, "row forced to Added");
        Ok(())
    }

    /// Force an Unchanged row to Modified
    pub fn set_modified(&mut self, row: RowId) -> Result<()> {
        self.record_mut(row)?.force_modified()?;
        debug!(table = %self.name(), row = %row, "row forced to Modified");
        Ok(())
    }

    // ========================================================================
    // Error annotations
    // ========================================================================

    /// Row-level error, empty when none
    ///
    /// Unknown rows read as error-free.
    pub fn row_error(&self, row: RowId) -> &str {
        self.rows.get(row).map_or("", |r| r.errors().row_error())
    }

    /// Set the row-level error; an empty message clears it
    pub fn set_row_error(&mut self, row: RowId, message: &str) -> Result<()> {
        self.record_mut(row)?.errors_mut().set_row_error(message);
        Ok(())
    }

    /// Error of one cell, empty when none
    pub fn column_error<'k>(&self, row: RowId, column: impl Into<ColumnKey<'k>>) -> Result<&str> {
        let id = self.column_id(column)?;
        Ok(self.record(row)?.errors().column_error(id))
    }

    /// Set the error of one cell; an empty message clears it
    pub fn set_column_error<'k>(
        &mut self,
        row: RowId,
        column: impl Into<ColumnKey<'k>>,
        message: &str,
    ) -> Result<()> {
        let id = self.column_id(column)?;
        self.record_mut(row)?.errors_mut().set_column_error(id, message);
        Ok(())
    }

    /// Columns with a non-empty error, in declaration order
    pub fn columns_in_error(&self, row: RowId) -> Result<Vec<ColumnId>> {
        let errors = self.record(row)?.errors();
        Ok(self
            .columns()
            .iter()
            .map(|c| c.id())
            .filter(|id| errors.is_column_in_error(*id))
            .collect())
    }

    /// Whether the row carries any error
    pub fn row_has_errors(&self, row: RowId) -> bool {
        self.rows.get(row).is_some_and(|r| r.errors().has_errors())
    }

    /// Clear the row error and every column error
    pub fn clear_errors(&mut self, row: RowId) -> Result<()> {
        self.record_mut(row)?.errors_mut().clear();
        Ok(())
    }

    fn column_id<'k>(&self, column: impl Into<ColumnKey<'k>>) -> Result<ColumnId> {
        let index = self.column_index(column)?;
        Ok(self.columns()[index].id())
    }
}
