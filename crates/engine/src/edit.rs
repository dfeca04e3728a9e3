//! Edit sessions
//!
//! `begin_edit` copies Current into a Proposed slot; writes then land in
//! Proposed until `end_edit` commits them or `cancel_edit` drops them. A
//! fresh Detached row is always mid-edit: its Proposed slot holds the
//! values it will be attached with, and end/cancel leave it alone.

use crate::events::RowChange;
use crate::table::Table;
use crate::validation::{Notice, Staged};
use tessera_core::{Result, RowId};
use tracing::{debug, trace};

impl Table {
    /// Open an edit on a row; a second call while open does nothing
    pub fn begin_edit(&mut self, row: RowId) -> Result<()> {
        self.prepare_write(row)?;
        if self.record_mut(row)?.begin_edit()? {
            trace!(table = %self.name(), row = %row, "edit opened");
        }
        Ok(())
    }

    /// Commit the open edit into Current
    ///
    /// Unchanged rows become Modified when a committed value differs from
    /// Original. On a constraint violation Current is left as it was and the
    /// edit stays open.
    pub fn end_edit(&mut self, row: RowId) -> Result<()> {
        let staged = self.stage_end_edit(row)?;
        self.settle(staged)
    }

    pub(crate) fn stage_end_edit(&mut self, row: RowId) -> Result<Option<Staged>> {
        let baseline = self.load_depth > 0;
        let position = self.rows.position(row);
        let record = self.record_mut(row)?;
        if !record.is_editing() || !record.state().is_attached() {
            return Ok(None);
        }
        let before = record.clone();
        let from = record.state();
        let changed = record.end_edit(baseline)?;
        let to = record.state();
        self.recompute(row);
        self.reindex(row);
        if from != to {
            debug!(table = %self.name(), row = %row, from = %from, to = %to, "edit committed");
        }
        let staged = Staged::new(row, before, position);
        Ok(Some(if changed {
            staged.notify(Notice::Row(RowChange::Change))
        } else {
            staged
        }))
    }

    /// Discard the open edit
    pub fn cancel_edit(&mut self, row: RowId) -> Result<()> {
        if self.record_mut(row)?.cancel_edit() {
            trace!(table = %self.name(), row = %row, "edit cancelled");
        }
        Ok(())
    }

    /// Whether an edit is open on the row
    pub fn is_editing(&self, row: RowId) -> Result<bool> {
        Ok(self.record(row)?.is_editing())
    }
}
