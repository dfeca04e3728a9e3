//! Relation Test Suite
//!
//! Parent/child navigation across tables of a data set, foreign keys and
//! data-set batch loads.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test relations
//! ```

pub use tesseradb::prelude::*;
pub use tesseradb::ViolationKind;

// Test modules
pub mod foreign_keys;
pub mod navigation;

// =============================================================================
// SHARED TEST UTILITIES
// =============================================================================

/// Name of the relation registered by `family`
pub const REL: &str = "ParentChild";

/// Parent `(P)` and child `(C, P)` tables joined on `P`
pub fn family(constrained: bool) -> DataSet {
    let mut parent = Table::new("Parent");
    parent.add_column(Column::new("P", ColumnType::Int)).unwrap();
    let mut child = Table::new("Child");
    child.add_column(Column::new("C", ColumnType::Int)).unwrap();
    child.add_column(Column::new("P", ColumnType::Int)).unwrap();

    let mut rel = Relation::between(REL, &parent, &["P"], &child, &["P"]).unwrap();
    if constrained {
        rel = rel.with_constraints();
    }
    let mut ds = DataSet::new("Family");
    ds.add_table(parent).unwrap();
    ds.add_table(child).unwrap();
    ds.add_relation(rel).unwrap();
    ds
}

/// Add a parent row through the checked path
pub fn parent(ds: &mut DataSet, p: i64) -> RowId {
    ds.table_mut("Parent")
        .unwrap()
        .add_values(vec![Value::Int(p)])
        .unwrap()
}

/// Add a child row through the checked path
pub fn child(ds: &mut DataSet, c: i64, p: Value) -> RowId {
    ds.table_mut("Child")
        .unwrap()
        .add_values(vec![Value::Int(c), p])
        .unwrap()
}
