//! Core types for the Tessera row engine
//!
//! This crate defines the vocabulary shared by storage and engine:
//! - [`Value`]: cell payload, with `Value::Null` as the null sentinel
//! - [`TableId`], [`ColumnId`], [`RowId`]: identities
//! - [`RowState`], [`RowVersion`], [`RowAction`]: row lifecycle and its pure transition function
//! - [`Column`], [`ColumnType`], [`Expression`]: schema and the computed-column hook
//! - [`UniqueConstraint`], [`ForeignKey`], [`Violation`]: constraint definitions and reports
//! - [`Error`]: the error type for every fallible operation

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod constraint;
pub mod error;
pub mod key;
pub mod row_state;
pub mod schema;
pub mod types;
pub mod value;

pub use constraint::{ForeignKey, KeyValues, UniqueConstraint, Violation, ViolationKind};
pub use error::{Error, ErrorKind, Result};
pub use key::{ColumnKey, TableKey};
pub use row_state::{RowAction, RowState, RowVersion};
pub use schema::{
    AutoIncrement, Column, ColumnAlias, ColumnType, Expression, FnExpression, RowValues,
};
pub use types::{ColumnId, RowId, TableId};
pub use value::Value;
