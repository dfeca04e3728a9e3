//! Batch-load scopes
//!
//! A scope suspends per-mutation constraint checks and change tracking on
//! one table. Commits to Unchanged rows overwrite Original, so loaded data
//! becomes the baseline. When the outermost scope closes every constraint
//! is checked once; offending rows are annotated and a single aggregate
//! `ConstraintViolation` is returned.
//!
//! Closing happens on [`LoadScope::finish`] or on drop. A dropped scope
//! cannot return its result, so violations found then are logged and left
//! on the rows as annotations.

use crate::table::Table;
use std::ops::{Deref, DerefMut};
use tessera_core::{Error, Result};
use tracing::{debug, warn};

impl Table {
    /// Enter a batch-load scope
    pub fn begin_load_data(&mut self) -> LoadScope<'_> {
        self.enter_load();
        LoadScope {
            table: self,
            open: true,
        }
    }

    /// Whether a batch-load scope is open
    pub fn is_loading(&self) -> bool {
        self.load_depth > 0
    }

    pub(crate) fn enter_load(&mut self) {
        self.load_depth += 1;
        if self.load_depth == 1 {
            debug!(table = %self.name(), "load scope opened");
        }
    }

    /// Leave one scope level; true when the outermost scope closed and
    /// constraints should be checked
    pub(crate) fn exit_load(&mut self) -> bool {
        self.load_depth = self.load_depth.saturating_sub(1);
        if self.load_depth > 0 {
            return false;
        }
        debug!(table = %self.name(), "load scope closed");
        self.options.enforce_constraints
    }

    fn leave_load(&mut self) -> Result<()> {
        if !self.exit_load() {
            return Ok(());
        }
        let violations = self.check_all();
        if violations.is_empty() {
            return Ok(());
        }
        self.annotate(&violations);
        Err(Error::constraint(violations))
    }
}

/// Guard of a table's batch-load scope
///
/// Derefs to the table, so rows can be loaded through it.
#[derive(Debug)]
pub struct LoadScope<'a> {
    table: &'a mut Table,
    open: bool,
}

impl LoadScope<'_> {
    /// Close the scope and report violations
    pub fn finish(mut self) -> Result<()> {
        self.open = false;
        self.table.leave_load()
    }
}

impl Deref for LoadScope<'_> {
    type Target = Table;

    fn deref(&self) -> &Table {
        self.table
    }
}

impl DerefMut for LoadScope<'_> {
    fn deref_mut(&mut self) -> &mut Table {
        self.table
    }
}

impl Drop for LoadScope<'_> {
    fn drop(&mut self) {
        if !self.open {
            return;
        }
        if let Err(err) = self.table.leave_load() {
            warn!(table = %self.table.name(), error = %err, "load scope dropped with violations");
        }
    }
}
