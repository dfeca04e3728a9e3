//! Row lifecycle types
//!
//! ## Design
//!
//! - `RowState`: where a row stands relative to its table and its last commit
//! - `RowVersion`: which stored version of a cell a read targets
//! - `RowAction`: the lifecycle events that move a row between states
//!
//! ## Transitions
//!
//! | From | Action | To |
//! |------|--------|----|
//! | Detached | Attach | Added |
//! | Added | Commit | Unchanged |
//! | Unchanged, Modified | Commit | Unchanged |
//! | Deleted | Commit | Detached |
//! | Unchanged | Modify | Modified |
//! | Added, Modified, Detached | Modify | unchanged |
//! | Unchanged, Modified | Delete | Deleted |
//! | Added | Delete | Detached |
//! | Added | Rollback | Detached |
//! | Modified, Deleted | Rollback | Unchanged |
//! | Unchanged | ForceAdded | Added |
//! | Unchanged | ForceModified | Modified |
//! | Added, Unchanged, Modified, Deleted | Remove | Detached |
//!
//! `transition` is pure: it decides the next state and never touches the
//! version slots. The row record applies the slot effects.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowState {
    /// Not a member of any table's row collection
    Detached,
    /// Attached since the last commit
    Added,
    /// Attached and identical to its last commit
    Unchanged,
    /// Attached with committed changes since the last commit
    Modified,
    /// Marked for removal; only the Original version remains
    Deleted,
}

impl RowState {
    /// True when the row is counted by its table's row collection
    pub fn is_attached(&self) -> bool {
        !matches!(self, RowState::Detached)
    }

    /// True for Deleted
    pub fn is_deleted(&self) -> bool {
        matches!(self, RowState::Deleted)
    }

    /// True when the row carries uncommitted changes
    pub fn has_changes(&self) -> bool {
        matches!(self, RowState::Added | RowState::Modified | RowState::Deleted)
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RowState::Detached => "Detached",
            RowState::Added => "Added",
            RowState::Unchanged => "Unchanged",
            RowState::Modified => "Modified",
            RowState::Deleted => "Deleted",
        }
    }

    /// Compute the state reached by applying `action`
    ///
    /// Returns `IllegalStateTransition` for actions that make no sense in the
    /// current state and `DeletedRowInaccessible` for edits of a deleted row.
    pub fn transition(self, action: RowAction) -> Result<RowState> {
        use RowAction::*;
        use RowState::*;

        let next = match (self, action) {
            (Detached, Attach) => Added,

            (Added, Commit) | (Unchanged, Commit) | (Modified, Commit) => Unchanged,
            (Deleted, Commit) => Detached,
            (Detached, Commit) => Detached,

            (Unchanged, Modify) => Modified,
            (Added, Modify) | (Modified, Modify) | (Detached, Modify) => self,
            (Deleted, Modify) => return Err(Error::DeletedRowInaccessible),

            (Unchanged, Delete) | (Modified, Delete) => Deleted,
            (Added, Delete) => Detached,
            (Deleted, Delete) => return Err(Error::DeletedRowInaccessible),

            (Added, Rollback) => Detached,
            (Modified, Rollback) | (Deleted, Rollback) | (Unchanged, Rollback) => Unchanged,
            (Detached, Rollback) => Detached,

            (Unchanged, ForceAdded) => Added,
            (Unchanged, ForceModified) => Modified,

            (Added, Remove) | (Unchanged, Remove) | (Modified, Remove) | (Deleted, Remove) => {
                Detached
            }

            (from, action) => return Err(Error::IllegalStateTransition { from, action }),
        };
        Ok(next)
    }
}

impl fmt::Display for RowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Version selector for cell reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowVersion {
    /// Values as of the last commit
    Original,
    /// Committed working values
    Current,
    /// Uncommitted values of an open edit
    Proposed,
    /// Proposed when an edit is open, otherwise Current
    Default,
}

impl RowVersion {
    /// All selectors, in declaration order
    pub const ALL: [RowVersion; 4] = [
        RowVersion::Original,
        RowVersion::Current,
        RowVersion::Proposed,
        RowVersion::Default,
    ];

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RowVersion::Original => "Original",
            RowVersion::Current => "Current",
            RowVersion::Proposed => "Proposed",
            RowVersion::Default => "Default",
        }
    }
}

impl Default for RowVersion {
    fn default() -> Self {
        RowVersion::Default
    }
}

impl fmt::Display for RowVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle events applied to a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowAction {
    /// Insert into a table's row collection
    Attach,
    /// Commit a value change
    Modify,
    /// Accept changes
    Commit,
    /// Reject changes
    Rollback,
    /// Mark for deletion
    Delete,
    /// Force the Added state
    ForceAdded,
    /// Force the Modified state
    ForceModified,
    /// Take out of the row collection without delete bookkeeping
    Remove,
}

impl RowAction {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            RowAction::Attach => "attach",
            RowAction::Modify => "modify",
            RowAction::Commit => "commit",
            RowAction::Rollback => "roll back",
            RowAction::Delete => "delete",
            RowAction::ForceAdded => "force Added on",
            RowAction::ForceModified => "force Modified on",
            RowAction::Remove => "remove",
        }
    }
}

impl fmt::Display for RowAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
