//! Row record: lifecycle state, version slots and error annotations
//!
//! The record applies the slot effects of each lifecycle action. It knows
//! nothing about columns, constraints or notifications; the owning table
//! decides when an action runs and checks the result.
//!
//! ## Slot matrix
//!
//! | State | Original | Current | Proposed |
//! |-------|----------|---------|----------|
//! | Detached (new) | - | - | yes |
//! | Detached (removed) | - | - | - |
//! | Added | - | yes | while editing |
//! | Unchanged | yes (= Current) | yes | while editing |
//! | Modified | yes | yes | while editing |
//! | Deleted | yes | - | - |

use crate::errors::RowErrors;
use crate::slots::{CellStore, Slot};
use tessera_core::{Error, Result, RowAction, RowId, RowState, RowVersion, Value};

/// One row of a table
#[derive(Debug, Clone)]
pub struct RowRecord {
    id: RowId,
    state: RowState,
    cells: CellStore,
    errors: RowErrors,
}

impl RowRecord {
    /// Freshly created row: Detached with a Proposed slot
    pub fn detached(id: RowId, values: Vec<Value>) -> Self {
        RowRecord {
            id,
            state: RowState::Detached,
            cells: CellStore::pending(values),
            errors: RowErrors::new(),
        }
    }

    /// Row rebuilt from copied parts
    pub fn from_parts(id: RowId, state: RowState, cells: CellStore, errors: RowErrors) -> Self {
        RowRecord {
            id,
            state,
            cells,
            errors,
        }
    }

    /// Row identity
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Lifecycle state
    pub fn state(&self) -> RowState {
        self.state
    }

    /// Version slots
    pub fn cells(&self) -> &CellStore {
        &self.cells
    }

    /// Error annotations
    pub fn errors(&self) -> &RowErrors {
        &self.errors
    }

    /// Mutable error annotations
    pub fn errors_mut(&mut self) -> &mut RowErrors {
        &mut self.errors
    }

    /// Whether an edit is open (a Proposed slot exists)
    pub fn is_editing(&self) -> bool {
        self.cells.has(Slot::Proposed)
    }

    /// One cell of a version, or `VersionNotFound`
    pub fn read(&self, column: usize, version: RowVersion) -> Result<&Value> {
        self.cells
            .read(column, version)
            .ok_or(Error::VersionNotFound { version })
    }

    /// Refill a removed row so it can be edited and attached again
    pub fn reseed(&mut self, values: Vec<Value>) {
        self.cells = CellStore::pending(values);
    }

    /// Overwrite the cells of one slot wholesale
    pub fn replace_slot(&mut self, slot: Slot, values: Vec<Value>) {
        self.cells.open(slot, values);
    }

    /// Append a column to every present slot
    pub fn push_column(&mut self, value: &Value) {
        self.cells.push_column(value);
    }

    /// Remove a column from every present slot
    pub fn remove_column(&mut self, column: usize) {
        self.cells.remove_column(column);
    }

    // ========================================================================
    // Edit session
    // ========================================================================

    /// Open an edit by copying Current into Proposed
    ///
    /// Returns `false` when an edit is already open.
    pub fn begin_edit(&mut self) -> Result<bool> {
        if self.state.is_deleted() {
            return Err(Error::DeletedRowInaccessible);
        }
        if self.is_editing() {
            return Ok(false);
        }
        if !self.cells.has(Slot::Current) {
            return Err(Error::VersionNotFound {
                version: RowVersion::Current,
            });
        }
        self.cells.copy(Slot::Current, Slot::Proposed);
        Ok(true)
    }

    /// Write into the open edit, returning the previous proposed value
    pub fn write_proposed(&mut self, column: usize, value: Value) -> Result<Value> {
        self.cells
            .write(Slot::Proposed, column, value)
            .ok_or(Error::VersionNotFound {
                version: RowVersion::Proposed,
            })
    }

    /// Commit Proposed into Current
    ///
    /// `baseline` is set during batch loads: an Unchanged row then takes the
    /// new values as its Original too and stays Unchanged. Returns whether
    /// any value changed. Detached rows keep their pending values.
    pub fn end_edit(&mut self, baseline: bool) -> Result<bool> {
        if self.state == RowState::Detached || !self.is_editing() {
            return Ok(false);
        }
        let changed = !self.cells.same(Slot::Proposed, Slot::Current);
        if let Some(values) = self.cells.take(Slot::Proposed) {
            self.cells.open(Slot::Current, values);
        }
        if changed {
            self.mark_modified(baseline)?;
        }
        Ok(changed)
    }

    /// Discard the open edit
    ///
    /// Detached rows keep their pending values. Returns whether an edit was
    /// discarded.
    pub fn cancel_edit(&mut self) -> bool {
        if self.state == RowState::Detached {
            return false;
        }
        self.cells.take(Slot::Proposed).is_some()
    }

    /// Write straight into Current, returning the previous value
    pub fn write_current(&mut self, column: usize, value: Value, baseline: bool) -> Result<Value> {
        if self.state.is_deleted() {
            return Err(Error::DeletedRowInaccessible);
        }
        let changed = self.cells.read(column, RowVersion::Current) != Some(&value);
        let previous = self
            .cells
            .write(Slot::Current, column, value)
            .ok_or(Error::VersionNotFound {
                version: RowVersion::Current,
            })?;
        if changed {
            self.mark_modified(baseline)?;
        }
        Ok(previous)
    }

    fn mark_modified(&mut self, baseline: bool) -> Result<()> {
        if self.state == RowState::Unchanged {
            if baseline {
                self.cells.copy(Slot::Current, Slot::Original);
                return Ok(());
            }
            if self.cells.same(Slot::Current, Slot::Original) {
                return Ok(());
            }
        }
        self.state = self.state.transition(RowAction::Modify)?;
        Ok(())
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Enter the row collection: pending values become Current
    pub fn attach(&mut self) -> Result<()> {
        let next = self.state.transition(RowAction::Attach)?;
        let values = self.cells.take(Slot::Proposed).ok_or(Error::VersionNotFound {
            version: RowVersion::Proposed,
        })?;
        self.cells.clear();
        self.cells.open(Slot::Current, values);
        self.state = next;
        Ok(())
    }

    /// Accept changes; the caller closes any open edit first
    pub fn commit(&mut self) -> Result<RowState> {
        let next = self.state.transition(RowAction::Commit)?;
        match self.state {
            RowState::Added | RowState::Modified => self.cells.copy(Slot::Current, Slot::Original),
            RowState::Deleted => self.cells.clear(),
            _ => {}
        }
        self.state = next;
        Ok(next)
    }

    /// Reject changes, discarding any open edit
    pub fn rollback(&mut self) -> Result<RowState> {
        let next = self.state.transition(RowAction::Rollback)?;
        match self.state {
            RowState::Detached => return Ok(next),
            RowState::Added => self.cells.clear(),
            RowState::Modified | RowState::Deleted | RowState::Unchanged => {
                self.cells.take(Slot::Proposed);
                self.cells.copy(Slot::Original, Slot::Current);
            }
        }
        self.state = next;
        Ok(next)
    }

    /// Mark for deletion; Added rows are dropped outright
    pub fn delete(&mut self) -> Result<RowState> {
        let next = self.state.transition(RowAction::Delete)?;
        self.cells.take(Slot::Proposed);
        if next == RowState::Detached {
            self.cells.clear();
        } else {
            self.cells.take(Slot::Current);
        }
        self.state = next;
        Ok(next)
    }

    /// Leave the row collection without delete bookkeeping
    pub fn remove(&mut self) -> Result<()> {
        self.state = self.state.transition(RowAction::Remove)?;
        self.cells.clear();
        Ok(())
    }

    /// Force Added; the Original version is dropped
    pub fn force_added(&mut self) -> Result<()> {
        self.state = self.state.transition(RowAction::ForceAdded)?;
        self.cells.take(Slot::Original);
        Ok(())
    }

    /// Force Modified; values are untouched
    pub fn force_modified(&mut self) -> Result<()> {
        self.state = self.state.transition(RowAction::ForceModified)?;
        Ok(())
    }
}

impl PartialEq for RowRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for RowRecord {}
