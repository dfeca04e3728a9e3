//! Constraint definitions and violation reports
//!
//! Definitions are plain data keyed by column identity. Checking lives with
//! the tables that own the rows; this module only describes what a rule is
//! and what a broken rule looks like.

use crate::types::{ColumnId, RowId, TableId};
use crate::value::Value;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Values of a (possibly composite) key, in key-column order
pub type KeyValues = SmallVec<[Value; 2]>;

/// True when any component is the null sentinel
///
/// Keys containing null are exempt from uniqueness and referential checks.
pub fn key_has_null(key: &[Value]) -> bool {
    key.iter().any(Value::is_null)
}

/// Render key values as `a, b`
pub fn join_values(key: &[Value]) -> String {
    key.iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Uniqueness over one or more columns of a table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    /// Constraint name
    pub name: String,
    /// Key columns, in key order
    pub columns: Vec<ColumnId>,
}

/// Referential rule from a child key to a parent key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Constraint name
    pub name: String,
    /// Referenced table
    pub parent_table: TableId,
    /// Referenced key columns
    pub parent_columns: Vec<ColumnId>,
    /// Referencing table
    pub child_table: TableId,
    /// Referencing key columns, paired positionally with `parent_columns`
    pub child_columns: Vec<ColumnId>,
}

/// Which kind of rule a violation broke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// Duplicate key under a unique constraint
    Unique,
    /// Null in a column that disallows it
    NotNull,
    /// Child key with no matching parent
    ForeignKey,
    /// Parent key change or delete that would orphan child rows
    ParentKey,
}

impl ViolationKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationKind::Unique => "unique",
            ViolationKind::NotNull => "not-null",
            ViolationKind::ForeignKey => "foreign-key",
            ViolationKind::ParentKey => "parent-key",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One broken rule on one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Table of the offending row
    pub table: TableId,
    /// Offending row
    pub row: RowId,
    /// Name of the broken constraint
    pub constraint: String,
    /// Kind of rule
    pub kind: ViolationKind,
    /// Columns to annotate on the row
    pub columns: Vec<ColumnId>,
    /// Message recorded as the row error and each column error
    pub message: String,
}
