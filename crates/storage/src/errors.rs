//! Error annotations of a row
//!
//! One optional row-level message and one optional message per column.
//! Empty strings mean "no error", so setting an empty message clears it.
//! Column messages are keyed by column identity.

use rustc_hash::FxHashMap;
use tessera_core::ColumnId;

/// Row and column error messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowErrors {
    row: String,
    columns: FxHashMap<ColumnId, String>,
}

impl RowErrors {
    /// No errors recorded
    pub fn new() -> Self {
        Self::default()
    }

    /// Row-level message, empty when unset
    pub fn row_error(&self) -> &str {
        &self.row
    }

    /// Replace the row-level message
    pub fn set_row_error(&mut self, message: &str) {
        self.row.clear();
        self.row.push_str(message);
    }

    /// Column message, empty when unset
    pub fn column_error(&self, column: ColumnId) -> &str {
        self.columns.get(&column).map(String::as_str).unwrap_or("")
    }

    /// Replace a column message; empty clears
    pub fn set_column_error(&mut self, column: ColumnId, message: &str) {
        if message.is_empty() {
            self.columns.remove(&column);
        } else {
            self.columns.insert(column, message.to_owned());
        }
    }

    /// Whether a column carries a message
    pub fn is_column_in_error(&self, column: ColumnId) -> bool {
        self.columns.contains_key(&column)
    }

    /// Drop the message of a column that no longer exists
    pub fn forget_column(&mut self, column: ColumnId) {
        self.columns.remove(&column);
    }

    /// True if the row or any column carries a message
    pub fn has_errors(&self) -> bool {
        !self.row.is_empty() || !self.columns.is_empty()
    }

    /// Clear the row message and every column message
    pub fn clear(&mut self) {
        self.row.clear();
        self.columns.clear();
    }
}
