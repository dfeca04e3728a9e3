//! Tables: schema, row collection and table-wide operations
//!
//! A [`Table`] owns its columns and every row it ever created. Rows are
//! addressed by [`RowId`]; a row created with [`Table::new_row`] starts
//! Detached with pending values and joins the collection on
//! [`Table::add_row`]. Cell access, edit sessions and lifecycle operations
//! live in the `row` and `edit` modules as further `impl Table` blocks.
//!
//! ## Mutation pipeline
//!
//! Committing mutations are staged: the change is applied, the row's prior
//! record is kept, then constraints are checked. A clean check fires the
//! post-change notifications; a failed one restores the prior record,
//! annotates the offending rows and returns `ConstraintViolation`. Inside a
//! batch-load scope the check is skipped and runs once when the scope
//! closes.

use crate::config::TableOptions;
use crate::events::{Listeners, RowChange};
use crate::index::KeyIndex;
use crate::validation::{Notice, Staged};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tessera_core::{
    constraint::key_has_null, schema::find_column, Column, ColumnId, ColumnKey, Error, KeyValues,
    Result, RowId, RowState, RowValues, RowVersion, TableId, UniqueConstraint, Value,
};
use tessera_storage::{CellStore, RowArena, RowErrors, RowRecord, Slot};
use tracing::debug;

/// A table of versioned rows
#[derive(Debug)]
pub struct Table {
    id: TableId,
    name: String,
    pub(crate) options: TableOptions,
    columns: Vec<Column>,
    pub(crate) rows: RowArena,
    unique: Vec<UniqueConstraint>,
    indexes: Vec<KeyIndex>,
    sequences: FxHashMap<ColumnId, i64>,
    pub(crate) listeners: Listeners,
    pub(crate) load_depth: u32,
}

impl Table {
    /// Create an empty table with default options
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, TableOptions::default())
    }

    /// Create an empty table
    pub fn with_options(name: impl Into<String>, options: TableOptions) -> Self {
        let id = TableId::new();
        Table {
            id,
            name: name.into(),
            options,
            columns: Vec::new(),
            rows: RowArena::new(id),
            unique: Vec::new(),
            indexes: Vec::new(),
            sequences: FxHashMap::default(),
            listeners: Listeners::default(),
            load_depth: 0,
        }
    }

    /// Table identity
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Table name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Active options
    pub fn options(&self) -> TableOptions {
        self.options
    }

    // ========================================================================
    // Columns
    // ========================================================================

    /// Columns in declaration order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Resolve a column reference
    pub fn column<'k>(&self, key: impl Into<ColumnKey<'k>>) -> Result<&Column> {
        let index = self.column_index(key)?;
        Ok(&self.columns[index])
    }

    /// Position of a column
    ///
    /// Empty names are invalid-argument; anything that does not name a
    /// column of this table is not-found.
    pub fn column_index<'k>(&self, key: impl Into<ColumnKey<'k>>) -> Result<usize> {
        let key = key.into();
        let found = match key {
            ColumnKey::Index(i) => (i < self.columns.len()).then_some(i),
            ColumnKey::Name("") => {
                return Err(Error::InvalidArgument(
                    "a column name is required".to_string(),
                ))
            }
            ColumnKey::Name(name) => find_column(&self.columns, name, self.options.case_sensitive),
            ColumnKey::Id(id) => self.index_of_id(id),
        };
        found.ok_or_else(|| {
            Error::NotFound(format!("{} does not belong to table '{}'", key, self.name))
        })
    }

    pub(crate) fn index_of_id(&self, id: ColumnId) -> Option<usize> {
        self.columns.iter().position(|c| c.id() == id)
    }

    pub(crate) fn indices_of(&self, ids: &[ColumnId]) -> Option<SmallVec<[usize; 2]>> {
        ids.iter().map(|id| self.index_of_id(*id)).collect()
    }

    /// Whether every id names a column of this table
    pub fn has_columns(&self, ids: &[ColumnId]) -> bool {
        self.indices_of(ids).is_some()
    }

    /// Add a column, filling existing rows with its default
    ///
    /// A column flagged unique registers a single-column constraint; if the
    /// existing rows already break it the column is not added.
    pub fn add_column(&mut self, column: Column) -> Result<ColumnId> {
        if !column.name().is_empty()
            && find_column(&self.columns, column.name(), self.options.case_sensitive).is_some()
        {
            return Err(Error::InvalidArgument(format!(
                "a column named '{}' already belongs to table '{}'",
                column.name(),
                self.name
            )));
        }
        let id = column.id();
        let fill = if column.is_computed() {
            Value::Null
        } else {
            column.default_value().clone()
        };
        if let Some(spec) = column.auto_increment_spec() {
            self.sequences.insert(id, spec.seed);
        }
        let computed = column.is_computed();
        let unique = column.is_unique();
        let name = column.name().to_owned();
        self.columns.push(column);
        for record in self.rows.records_mut() {
            record.push_column(&fill);
        }
        if computed {
            for row in self.rows.ids().to_vec() {
                self.recompute_slot(row, Slot::Original);
                self.recompute_slot(row, Slot::Current);
                self.reindex(row);
            }
        }
        if unique {
            let constraint = format!("Constraint_{}", name);
            if let Err(err) = self.add_unique(&constraint, &[ColumnKey::Id(id)]) {
                self.drop_last_column();
                return Err(err);
            }
        }
        debug!(table = %self.name, column = %name, "column added");
        Ok(id)
    }

    fn drop_last_column(&mut self) {
        if let Some(column) = self.columns.pop() {
            let index = self.columns.len();
            for record in self.rows.records_mut() {
                record.remove_column(index);
                record.errors_mut().forget_column(column.id());
            }
            self.sequences.remove(&column.id());
        }
    }

    /// Remove a column and its values from every row
    ///
    /// Columns that take part in a unique constraint cannot be removed.
    pub fn remove_column<'k>(&mut self, key: impl Into<ColumnKey<'k>>) -> Result<Column> {
        let index = self.column_index(key)?;
        let id = self.columns[index].id();
        if let Some(c) = self.unique.iter().find(|c| c.columns.contains(&id)) {
            return Err(Error::InvalidArgument(format!(
                "column '{}' is part of constraint '{}'",
                self.columns[index].name(),
                c.name
            )));
        }
        let column = self.columns.remove(index);
        for record in self.rows.records_mut() {
            record.remove_column(index);
            record.errors_mut().forget_column(id);
        }
        self.sequences.remove(&id);
        debug!(table = %self.name, column = %column.name(), "column removed");
        Ok(column)
    }

    // ========================================================================
    // Unique constraints
    // ========================================================================

    /// Unique constraints in registration order
    pub fn unique_constraints(&self) -> &[UniqueConstraint] {
        &self.unique
    }

    /// Register a unique constraint over one or more columns
    ///
    /// Existing rows are checked first unless enforcement is off; on
    /// duplicates the rows are annotated and the constraint is not added.
    pub fn add_unique<'k, K>(&mut self, name: &str, columns: &[K]) -> Result<()>
    where
        K: Into<ColumnKey<'k>> + Copy,
    {
        if name.is_empty() {
            return Err(Error::InvalidArgument(
                "a constraint name is required".to_string(),
            ));
        }
        if columns.is_empty() {
            return Err(Error::InvalidArgument(format!(
                "constraint '{}' needs at least one column",
                name
            )));
        }
        if self.unique.iter().any(|c| c.name == name) {
            return Err(Error::InvalidArgument(format!(
                "a constraint named '{}' already belongs to table '{}'",
                name, self.name
            )));
        }
        let ids = columns
            .iter()
            .map(|k| self.column_index(*k).map(|i| self.columns[i].id()))
            .collect::<Result<Vec<_>>>()?;
        let constraint = UniqueConstraint {
            name: name.to_owned(),
            columns: ids,
        };
        if self.options.enforce_constraints {
            let violations = self.check_unique(&constraint);
            if !violations.is_empty() {
                self.annotate(&violations);
                return Err(Error::constraint(violations));
            }
        }
        let mut index = KeyIndex::default();
        for record in self.live_rows() {
            let key = self
                .record_key(record, &constraint.columns, RowVersion::Current)
                .filter(|k| !key_has_null(k));
            index.set(record.id(), key);
        }
        self.unique.push(constraint);
        self.indexes.push(index);
        Ok(())
    }

    /// Unique constraint over exactly these columns, if registered
    pub(crate) fn unique_over(&self, columns: &[ColumnId]) -> Option<&UniqueConstraint> {
        self.unique.iter().find(|c| c.columns == columns)
    }

    pub(crate) fn drop_unique(&mut self, name: &str) {
        if let Some(i) = self.unique.iter().position(|c| c.name == name) {
            self.unique.remove(i);
            self.indexes.remove(i);
        }
    }

    /// Unique constraints paired with their key indexes
    pub(crate) fn indexed_unique(&self) -> impl Iterator<Item = (&UniqueConstraint, &KeyIndex)> + '_ {
        self.unique.iter().zip(&self.indexes)
    }

    /// Live rows whose committed key over `columns` is `key`, when a unique
    /// constraint indexes exactly those columns
    pub(crate) fn indexed_rows(&self, columns: &[ColumnId], key: &KeyValues) -> Option<&[RowId]> {
        let i = self.unique.iter().position(|c| c.columns == columns)?;
        Some(self.indexes[i].rows(key))
    }

    /// Refile a row in every key index after its committed values or
    /// membership changed
    pub(crate) fn reindex(&mut self, row: RowId) {
        if self.unique.is_empty() {
            return;
        }
        let keys: SmallVec<[Option<KeyValues>; 2]> = self
            .unique
            .iter()
            .map(|c| self.live_key(row, &c.columns))
            .collect();
        for (index, key) in self.indexes.iter_mut().zip(keys) {
            index.set(row, key);
        }
    }

    fn live_key(&self, row: RowId, columns: &[ColumnId]) -> Option<KeyValues> {
        self.rows.position(row)?;
        let record = self.rows.get(row)?;
        self.record_key(record, columns, RowVersion::Current)
            .filter(|k| !key_has_null(k))
    }

    // ========================================================================
    // Row collection
    // ========================================================================

    /// Create a Detached row seeded with defaults and sequence values
    pub fn new_row(&mut self) -> RowId {
        let values = self.seed_values();
        self.rows.allocate(values)
    }

    pub(crate) fn seed_values(&mut self) -> Vec<Value> {
        let sequences = &mut self.sequences;
        let mut values = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = match column.auto_increment_spec() {
                Some(spec) => {
                    let next = sequences.entry(column.id()).or_insert(spec.seed);
                    let value = *next;
                    *next = next.saturating_add(spec.step);
                    Value::Int(value)
                }
                None if column.is_computed() => Value::Null,
                None => column.default_value().clone(),
            };
            values.push(value);
        }
        values
    }

    /// Attach a Detached row to the collection
    pub fn add_row(&mut self, row: RowId) -> Result<()> {
        let staged = self.stage_attach(row)?;
        self.settle(staged)
    }

    /// Create a row from leading column values and attach it
    ///
    /// Missing trailing values take the column defaults; computed columns
    /// ignore whatever is supplied.
    pub fn add_values(&mut self, values: Vec<Value>) -> Result<RowId> {
        let (row, staged) = self.stage_add_values(values)?;
        self.settle(staged)?;
        Ok(row)
    }

    pub(crate) fn stage_add_values(&mut self, values: Vec<Value>) -> Result<(RowId, Option<Staged>)> {
        if values.len() > self.columns.len() {
            return Err(Error::InvalidArgument(format!(
                "input array of {} values is longer than the {} columns of table '{}'",
                values.len(),
                self.columns.len(),
                self.name
            )));
        }
        let row = self.new_row();
        let computed: SmallVec<[bool; 8]> = self.columns.iter().map(Column::is_computed).collect();
        let record = self.record_mut(row)?;
        for (index, value) in values.into_iter().enumerate() {
            if !computed[index] {
                record.write_proposed(index, value)?;
            }
        }
        let staged = self.stage_attach(row)?;
        Ok((row, staged.map(Staged::discard_on_revert)))
    }

    pub(crate) fn stage_attach(&mut self, row: RowId) -> Result<Option<Staged>> {
        let record = self.record(row)?;
        if record.state() != RowState::Detached {
            return Err(Error::InvalidArgument(format!(
                "row {} already belongs to table '{}'",
                row, self.name
            )));
        }
        if record.cells().is_empty() {
            let values = self.seed_values();
            self.record_mut(row)?.reseed(values);
        }
        let record = self.record_mut(row)?;
        let before = record.clone();
        record.attach()?;
        self.rows.attach(row);
        self.recompute(row);
        self.reindex(row);
        debug!(table = %self.name, row = %row, "row attached");
        Ok(Some(Staged::new(row, before, None).notify(Notice::Row(RowChange::Add))))
    }

    /// Take a row out of the collection without delete bookkeeping
    pub fn remove_row(&mut self, row: RowId) -> Result<()> {
        self.record_mut(row)?.remove()?;
        self.rows.detach(row);
        self.reindex(row);
        debug!(table = %self.name, row = %row, "row removed");
        Ok(())
    }

    /// Rows of the collection in order, Deleted rows included
    pub fn rows(&self) -> &[RowId] {
        self.rows.ids()
    }

    /// Number of rows in the collection
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Whether the row is in the collection
    pub fn contains(&self, row: RowId) -> bool {
        self.rows.position(row).is_some()
    }

    pub(crate) fn record(&self, row: RowId) -> Result<&RowRecord> {
        self.rows.get(row).ok_or_else(|| row_not_found(&self.name, row))
    }

    pub(crate) fn record_mut(&mut self, row: RowId) -> Result<&mut RowRecord> {
        let name = &self.name;
        self.rows
            .get_mut(row)
            .ok_or_else(|| row_not_found(name, row))
    }

    // ========================================================================
    // Table-wide commit and rollback
    // ========================================================================

    /// Accept changes on every row of the collection
    pub fn accept_changes(&mut self) -> Result<()> {
        for row in self.rows.ids().to_vec() {
            self.accept_row(row)?;
        }
        Ok(())
    }

    /// Reject changes on every row of the collection
    ///
    /// The rollback is checked as a whole once every row is rolled back; on
    /// a violation no row keeps its rollback and the offending rows are
    /// annotated.
    pub fn reject_changes(&mut self) -> Result<()> {
        let staged = self.stage_reject_all()?;
        let violations = staged.iter().flat_map(|s| self.check_staged(s)).collect();
        self.conclude_all(staged, violations)
    }

    /// Roll back every row of the collection without checking
    pub(crate) fn stage_reject_all(&mut self) -> Result<Vec<Staged>> {
        let mut staged = Vec::new();
        for row in self.rows.ids().to_vec() {
            match self.stage_reject(row) {
                Ok(Some(s)) => staged.push(s),
                Ok(None) => {}
                Err(err) => {
                    self.revert_all(staged);
                    return Err(err);
                }
            }
        }
        Ok(staged)
    }

    /// Whether any row of the collection carries an error annotation
    pub fn has_errors(&self) -> bool {
        self.rows.members().any(|r| r.errors().has_errors())
    }

    /// Rows of the collection carrying error annotations, in order
    pub fn rows_in_error(&self) -> Vec<RowId> {
        self.rows
            .members()
            .filter(|r| r.errors().has_errors())
            .map(RowRecord::id)
            .collect()
    }

    // ========================================================================
    // Computed columns
    // ========================================================================

    /// Re-evaluate computed columns of the committed values
    pub(crate) fn recompute(&mut self, row: RowId) {
        self.recompute_slot(row, Slot::Current);
        if let Some(record) = self.rows.get_mut(row) {
            if record.state() == RowState::Unchanged {
                if let Some(values) = record.cells().values(Slot::Current).map(<[Value]>::to_vec) {
                    record.replace_slot(Slot::Original, values);
                }
            }
        }
    }

    fn recompute_slot(&mut self, row: RowId, slot: Slot) {
        if !self.columns.iter().any(Column::is_computed) {
            return;
        }
        let Some(mut values) = self
            .rows
            .get(row)
            .and_then(|r| r.cells().values(slot))
            .map(<[Value]>::to_vec)
        else {
            return;
        };
        for (index, column) in self.columns.iter().enumerate() {
            if let Some(expression) = column.expression() {
                let value = expression.evaluate(&RowValues::new(
                    &self.columns,
                    &values,
                    self.options.case_sensitive,
                ));
                if let Some(cell) = values.get_mut(index) {
                    *cell = value;
                }
            }
        }
        if let Some(record) = self.rows.get_mut(row) {
            record.replace_slot(slot, values);
        }
    }

    // ========================================================================
    // Keys
    // ========================================================================

    /// Values of `columns` for a row at `version`
    pub(crate) fn key_of(&self, row: RowId, columns: &[ColumnId], version: RowVersion) -> Option<KeyValues> {
        self.rows
            .get(row)
            .and_then(|r| self.record_key(r, columns, version))
    }

    pub(crate) fn record_key(
        &self,
        record: &RowRecord,
        columns: &[ColumnId],
        version: RowVersion,
    ) -> Option<KeyValues> {
        let values = record.cells().version_values(version)?;
        columns
            .iter()
            .map(|id| {
                self.index_of_id(*id)
                    .and_then(|i| values.get(i))
                    .cloned()
            })
            .collect()
    }

    /// Member rows holding committed values (everything but Deleted)
    pub(crate) fn live_rows(&self) -> impl Iterator<Item = &RowRecord> + '_ {
        self.rows
            .members()
            .filter(|r| r.cells().has_version(RowVersion::Current))
    }

    pub(crate) fn column_names(&self, ids: &[ColumnId]) -> String {
        ids.iter()
            .filter_map(|id| self.index_of_id(*id))
            .map(|i| self.columns[i].name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    // ========================================================================
    // Row copy
    // ========================================================================

    /// Copy a row's state, versions and errors out of the table
    pub fn export_row(&self, row: RowId) -> Result<RowImage> {
        let record = self.record(row)?;
        let slots = Slot::ALL
            .iter()
            .filter_map(|slot| record.cells().values(*slot).map(|v| (*slot, v.to_vec())))
            .collect();
        let column_errors = self
            .columns
            .iter()
            .filter(|c| record.errors().is_column_in_error(c.id()))
            .map(|c| (c.name().to_owned(), record.errors().column_error(c.id()).to_owned()))
            .collect();
        Ok(RowImage {
            state: record.state(),
            columns: self.columns.iter().map(|c| c.name().to_owned()).collect(),
            slots,
            row_error: record.errors().row_error().to_owned(),
            column_errors,
        })
    }

    /// Insert a copy of an exported row, keeping its state and versions
    ///
    /// Values are matched to columns by name; columns the image lacks take
    /// their defaults.
    pub fn import_row(&mut self, image: &RowImage) -> Result<RowId> {
        let (row, staged) = self.stage_import(image)?;
        self.settle(staged)?;
        Ok(row)
    }

    pub(crate) fn stage_import(&mut self, image: &RowImage) -> Result<(RowId, Option<Staged>)> {
        let defaults = self.seed_values();
        let mapping: Vec<Option<usize>> = self
            .columns
            .iter()
            .map(|c| image.position(c.name(), self.options.case_sensitive))
            .collect();
        let mut cells = CellStore::new();
        for (slot, values) in &image.slots {
            let mapped = mapping
                .iter()
                .zip(&defaults)
                .map(|(from, default)| {
                    from.and_then(|i| values.get(i))
                        .cloned()
                        .unwrap_or_else(|| default.clone())
                })
                .collect();
            cells.open(*slot, mapped);
        }
        let mut errors = RowErrors::new();
        errors.set_row_error(&image.row_error);
        for (name, message) in &image.column_errors {
            if let Some(i) = find_column(&self.columns, name, self.options.case_sensitive) {
                errors.set_column_error(self.columns[i].id(), message);
            }
        }
        let state = image.state;
        let row = self
            .rows
            .insert_with(|id| RowRecord::from_parts(id, state, cells, errors));
        let before = RowRecord::from_parts(row, RowState::Detached, CellStore::new(), RowErrors::new());
        if !state.is_attached() {
            return Ok((row, None));
        }
        self.rows.attach(row);
        self.recompute(row);
        self.reindex(row);
        let staged = Staged::new(row, before, None)
            .notify(Notice::Row(RowChange::Add))
            .discard_on_revert();
        Ok((row, Some(staged)))
    }
}

fn row_not_found(table: &str, row: RowId) -> Error {
    Error::NotFound(format!("row {} does not belong to table '{}'", row, table))
}

/// Detached copy of a row, produced by [`Table::export_row`]
#[derive(Debug, Clone, PartialEq)]
pub struct RowImage {
    state: RowState,
    columns: Vec<String>,
    slots: Vec<(Slot, Vec<Value>)>,
    row_error: String,
    column_errors: Vec<(String, String)>,
}

impl RowImage {
    /// State of the source row
    pub fn state(&self) -> RowState {
        self.state
    }

    fn position(&self, name: &str, case_sensitive: bool) -> Option<usize> {
        if name.is_empty() {
            return None;
        }
        self.columns.iter().position(|c| c == name).or_else(|| {
            if case_sensitive {
                None
            } else {
                let folded = name.to_lowercase();
                self.columns.iter().position(|c| c.to_lowercase() == folded)
            }
        })
    }
}
