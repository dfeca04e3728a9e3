//! Row engine for Tessera
//!
//! This crate turns the storage records into tables and data sets:
//! - [`Table`]: columns, the row collection, cell access, edit sessions and lifecycle
//! - [`LoadScope`]: batch-load guard that defers constraint checks to scope close
//! - [`Relation`]: parent/child key pairing with version-aware navigation
//! - [`DataSet`]: tables and relations, with foreign keys checked on every commit
//! - [`TableOptions`], [`DataSetOptions`]: behavior switches, readable from TOML
//!
//! Every operation is synchronous and assumes exclusive access; wrap a
//! table or data set in a lock to share it between threads.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod dataset;
mod edit;
pub mod events;
mod index;
pub mod load;
pub mod relation;
mod row;
pub mod table;
mod validation;

pub use config::{DataSetOptions, TableOptions};
pub use dataset::{DataSet, DataSetLoad, TableMut};
pub use events::{
    ColumnChangeEvent, ColumnListener, ColumnPhase, ListenerId, RowChange, RowChangeEvent,
    RowListener,
};
pub use load::LoadScope;
pub use relation::{Relation, RelationKey};
pub use table::{RowImage, Table};
