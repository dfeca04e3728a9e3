//! # Tessera
//!
//! In-memory versioned row store.
//!
//! Every row of a table keeps up to three value versions (Original,
//! Current, Proposed) and moves through a five-state lifecycle. Edits can
//! be staged in sessions, constraints are checked on every commit or once
//! at the end of a batch load, and relations navigate between parent and
//! child rows at any version.
//!
//! ## Quick Start
//!
//! ```
//! use tesseradb::prelude::*;
//!
//! let mut table = Table::new("People");
//! table.add_column(Column::new("id", ColumnType::Int).unique())?;
//! table.add_column(Column::new("name", ColumnType::String))?;
//!
//! let row = table.add_values(vec![Value::Int(1), Value::from("a")])?;
//! table.accept_changes()?;
//!
//! table.set(row, "id", 2)?;
//! assert_eq!(table.row_state(row)?, RowState::Modified);
//! assert_eq!(table.get_version(row, "id", RowVersion::Original)?, &Value::Int(1));
//!
//! table.reject_row(row)?;
//! assert_eq!(table.get(row, "id")?, &Value::Int(1));
//! # Ok::<(), tesseradb::Error>(())
//! ```
//!
//! ## Layers
//!
//! - `tessera-core`: values, identities, schema, row states, errors
//! - `tessera-storage`: per-row version slots, error annotations, row arena
//! - `tessera-engine`: tables, edit sessions, validation, relations, data sets
//!
//! Tables and data sets are single-writer. [`SharedTable`] and
//! [`SharedDataSet`] put them behind a lock for use across threads.

#![warn(missing_docs)]

mod builder;
mod sync;
mod types;

pub mod prelude;

pub use builder::StoreBuilder;
pub use sync::{SharedDataSet, SharedTable};
pub use types::*;
