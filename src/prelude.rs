//! Convenient imports for Tessera.
//!
//! ```
//! use tesseradb::prelude::*;
//!
//! let mut table = Table::new("T");
//! table.add_column(Column::new("a", ColumnType::Int)).unwrap();
//! ```

// Entry points
pub use crate::builder::StoreBuilder;
pub use crate::sync::{SharedDataSet, SharedTable};

// Tables and data sets
pub use crate::types::{DataSet, Relation, Table, TableMut};

// Schema
pub use crate::types::{Column, ColumnType, FnExpression, RowValues};

// Rows
pub use crate::types::{RowId, RowState, RowVersion, Value};

// Errors
pub use crate::types::{Error, Result};
