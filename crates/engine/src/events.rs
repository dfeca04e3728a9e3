//! Change notifications
//!
//! Listeners run synchronously on the mutating call. Every successful cell
//! write raises `Changing` before the value is stored and `Changed` after.
//! Inside an edit session `Changed` fires as soon as the Proposed slot is
//! written; outside one it fires after the write has committed and passed
//! validation. Lifecycle operations raise row events.
//!
//! Listeners get `&mut Table` and may mutate it. While a listener list is
//! being dispatched it is detached from the table, so a mutation made from
//! inside a listener does not re-enter that same list.

use crate::table::Table;
use rustc_hash::FxHashSet;
use std::fmt;
use tessera_core::{ColumnId, RowId, TableId, Value};
use tracing::trace;

/// Phase of a column change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnPhase {
    /// Before the value is stored
    Changing,
    /// After the value is stored
    Changed,
}

/// A cell write
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnChangeEvent {
    /// Table of the row
    pub table: TableId,
    /// Row written
    pub row: RowId,
    /// Before or after the write
    pub phase: ColumnPhase,
    /// Column written
    pub column: ColumnId,
    /// Column name at the time of the write
    pub column_name: String,
    /// Default-version value before the write, if the row had one
    pub previous: Option<Value>,
    /// Value being written
    pub proposed: Value,
}

/// Kind of row lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowChange {
    /// Attached to the row collection
    Add,
    /// Committed values changed
    Change,
    /// Deleted or dropped
    Delete,
    /// Changes accepted
    Commit,
    /// Changes rejected
    Rollback,
}

/// A row lifecycle event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowChangeEvent {
    /// Table of the row
    pub table: TableId,
    /// Row affected
    pub row: RowId,
    /// What happened
    pub change: RowChange,
}

/// Handle returned by listener registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Column change listener
pub type ColumnListener = Box<dyn FnMut(&mut Table, &ColumnChangeEvent) + Send>;

/// Row change listener
pub type RowListener = Box<dyn FnMut(&mut Table, &RowChangeEvent) + Send>;

/// Registered listeners of a table
#[derive(Default)]
pub(crate) struct Listeners {
    next: u64,
    // registered and not yet removed
    active: FxHashSet<ListenerId>,
    column: Vec<(ListenerId, ColumnListener)>,
    row: Vec<(ListenerId, RowListener)>,
    retired: Vec<ListenerId>,
    dispatching: u32,
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("column", &self.column.len())
            .field("row", &self.row.len())
            .finish()
    }
}

impl Listeners {
    fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next);
        self.next += 1;
        self.active.insert(id);
        id
    }
}

impl Table {
    /// Register a listener for cell writes
    pub fn on_column_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&mut Table, &ColumnChangeEvent) + Send + 'static,
    {
        let id = self.listeners.next_id();
        self.listeners.column.push((id, Box::new(listener)));
        id
    }

    /// Register a listener for row lifecycle events
    pub fn on_row_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&mut Table, &RowChangeEvent) + Send + 'static,
    {
        let id = self.listeners.next_id();
        self.listeners.row.push((id, Box::new(listener)));
        id
    }

    /// Unregister a listener
    ///
    /// A listener removed while events are being dispatched stops receiving
    /// events once the current dispatch finishes.
    ///
    /// Returns false when `id` is not registered, including when it was
    /// already removed.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        if !self.listeners.active.remove(&id) {
            return false;
        }
        self.listeners.column.retain(|(l, _)| *l != id);
        self.listeners.row.retain(|(l, _)| *l != id);
        if self.listeners.dispatching > 0 {
            // the list being dispatched is detached; drop it when it returns
            self.listeners.retired.push(id);
        }
        true
    }

    pub(crate) fn notify_column(&mut self, event: &ColumnChangeEvent) {
        if self.listeners.column.is_empty() {
            return;
        }
        trace!(table = %self.name(), row = %event.row, column = %event.column_name, phase = ?event.phase, "column change");
        let mut active = std::mem::take(&mut self.listeners.column);
        self.listeners.dispatching += 1;
        for (_, listener) in active.iter_mut() {
            listener(self, event);
        }
        self.listeners.dispatching -= 1;
        active.append(&mut self.listeners.column);
        self.listeners.column = active;
        self.sweep_retired();
    }

    pub(crate) fn notify_row(&mut self, row: RowId, change: RowChange) {
        if self.listeners.row.is_empty() {
            return;
        }
        let event = RowChangeEvent {
            table: self.id(),
            row,
            change,
        };
        let mut active = std::mem::take(&mut self.listeners.row);
        self.listeners.dispatching += 1;
        for (_, listener) in active.iter_mut() {
            listener(self, &event);
        }
        self.listeners.dispatching -= 1;
        active.append(&mut self.listeners.row);
        self.listeners.row = active;
        self.sweep_retired();
    }

    fn sweep_retired(&mut self) {
        if self.listeners.dispatching > 0 || self.listeners.retired.is_empty() {
            return;
        }
        let retired = std::mem::take(&mut self.listeners.retired);
        self.listeners.column.retain(|(id, _)| !retired.contains(id));
        self.listeners.row.retain(|(id, _)| !retired.contains(id));
    }
}
