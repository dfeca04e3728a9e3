//! Storage layer for Tessera
//!
//! This crate holds the row data of a table:
//! - [`CellStore`]: Original / Current / Proposed value slots of a row
//! - [`RowErrors`]: row and column error annotations
//! - [`RowRecord`]: state + slots + errors, with the slot effects of every lifecycle action
//! - [`RowArena`]: FxHashMap-backed record storage plus the ordered row collection

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arena;
pub mod errors;
pub mod record;
pub mod slots;

pub use arena::RowArena;
pub use errors::RowErrors;
pub use record::RowRecord;
pub use slots::{CellStore, Slot};
