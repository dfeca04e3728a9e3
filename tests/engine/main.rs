//! Table Engine Test Suite
//!
//! Drives single tables through the public API: version slots, the row
//! lifecycle, edit sessions, error annotations, constraint checks, batch
//! loads and change notifications.
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all engine tests
//! cargo test --test engine
//!
//! # Run edit session tests only
//! cargo test --test engine edit_session::
//! ```

use std::sync::Once;

pub use tesseradb::prelude::*;
pub use tesseradb::{ColumnPhase, RowChange, TableOptions, ViolationKind};

// Test modules
pub mod constraints;
pub mod edit_session;
pub mod errors;
pub mod lifecycle;
pub mod notifications;
pub mod versions;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

static TRACING: Once = Once::new();

/// Route engine logs to the test harness; set RUST_LOG to see them
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// `(id: int unique, name: string)`
pub fn people() -> Table {
    init_tracing();
    let mut t = Table::new("People");
    t.add_column(Column::new("id", ColumnType::Int).unique())
        .unwrap();
    t.add_column(Column::new("name", ColumnType::String))
        .unwrap();
    t
}

/// Add and commit a row of `people()`
pub fn committed(t: &mut Table, id: i64, name: &str) -> RowId {
    let r = t.add_values(vec![Value::Int(id), Value::from(name)]).unwrap();
    t.accept_row(r).unwrap();
    r
}

/// Presence of every selector, in `RowVersion::ALL` order
pub fn presence(t: &Table, row: RowId) -> [bool; 4] {
    RowVersion::ALL.map(|v| t.has_version(row, v).unwrap())
}
