//! Addressing keys for columns and tables

use crate::types::{ColumnId, TableId};
use std::fmt;

/// How a caller names a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKey<'a> {
    /// Position in the table's column list
    Index(usize),
    /// Column name, resolved exact-first then case-insensitively
    Name(&'a str),
    /// Column identity
    Id(ColumnId),
}

impl From<usize> for ColumnKey<'_> {
    fn from(i: usize) -> Self {
        ColumnKey::Index(i)
    }
}

impl<'a> From<&'a str> for ColumnKey<'a> {
    fn from(name: &'a str) -> Self {
        ColumnKey::Name(name)
    }
}

impl<'a> From<&'a String> for ColumnKey<'a> {
    fn from(name: &'a String) -> Self {
        ColumnKey::Name(name)
    }
}

impl From<ColumnId> for ColumnKey<'_> {
    fn from(id: ColumnId) -> Self {
        ColumnKey::Id(id)
    }
}

impl fmt::Display for ColumnKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKey::Index(i) => write!(f, "column {}", i),
            ColumnKey::Name(n) => write!(f, "column '{}'", n),
            ColumnKey::Id(id) => write!(f, "column {}", id),
        }
    }
}

/// How a caller names a table inside a data set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKey<'a> {
    /// Table name
    Name(&'a str),
    /// Table identity
    Id(TableId),
}

impl<'a> From<&'a str> for TableKey<'a> {
    fn from(name: &'a str) -> Self {
        TableKey::Name(name)
    }
}

impl<'a> From<&'a String> for TableKey<'a> {
    fn from(name: &'a String) -> Self {
        TableKey::Name(name)
    }
}

impl From<TableId> for TableKey<'_> {
    fn from(id: TableId) -> Self {
        TableKey::Id(id)
    }
}

impl fmt::Display for TableKey<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKey::Name(n) => write!(f, "table '{}'", n),
            TableKey::Id(id) => write!(f, "table {}", id),
        }
    }
}
