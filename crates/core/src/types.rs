//! Identifiers
//!
//! - [`TableId`]: identity of a table, unique across data sets
//! - [`ColumnId`]: identity of a column, stable across reordering and unique
//!   across tables, so a column handle from one table never resolves in another
//! - [`RowId`]: identity of a row, tagged with the table that created it so
//!   a handle from one table never resolves in another
//!
//! Rows compare and hash by identity, never by content.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(Uuid);

impl TableId {
    /// Create a new random TableId using UUID v4
    pub fn new() -> Self {
        TableId(Uuid::new_v4())
    }
}

impl Default for TableId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a column
///
/// Assigned when the column definition is created and kept for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnId(Uuid);

impl ColumnId {
    /// Create a new random ColumnId using UUID v4
    pub fn new() -> Self {
        ColumnId(Uuid::new_v4())
    }
}

impl Default for ColumnId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a row: the table that created it plus a per-table sequence
///
/// Only the creating table resolves a `RowId`. Once a row is physically
/// removed (a committed delete, or an Added row deleted or rolled back) its
/// id resolves nowhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowId {
    table: TableId,
    seq: u64,
}

impl RowId {
    /// Row `seq` of `table`
    pub const fn new(table: TableId, seq: u64) -> Self {
        RowId { table, seq }
    }

    /// Table that created the row
    pub const fn table(&self) -> TableId {
        self.table
    }

    /// Per-table sequence number
    pub const fn seq(&self) -> u64 {
        self.seq
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.seq)
    }
}
