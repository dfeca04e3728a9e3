//! Constraint Tests
//!
//! Eager unique / not-null checks and batch-load validation.

use crate::*;

fn pair_table() -> Table {
    init_tracing();
    let mut t = Table::new("Pairs");
    t.add_column(Column::new("a", ColumnType::Int)).unwrap();
    t.add_column(Column::new("b", ColumnType::Int)).unwrap();
    t.add_column(Column::new("note", ColumnType::String)).unwrap();
    t.add_unique("ab", &["a", "b"]).unwrap();
    t
}

// =============================================================================
// EAGER CHECKS
// =============================================================================

#[test]
fn test_duplicate_add_is_rejected_and_not_attached() {
    let mut t = people();
    committed(&mut t, 1, "a");
    let err = t.add_values(vec![Value::Int(1), Value::from("b")]).unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(err.violations().len(), 1);
    assert_eq!(t.row_count(), 1);
}

#[test]
fn test_rejected_row_can_be_fixed_and_added() {
    let mut t = people();
    committed(&mut t, 1, "a");
    let r = t.new_row();
    t.set(r, "id", 1).unwrap();
    assert!(t.add_row(r).is_err());
    assert_eq!(t.row_state(r).unwrap(), RowState::Detached);
    t.set(r, "id", 2).unwrap();
    t.add_row(r).unwrap();
    assert_eq!(t.row_count(), 2);
}

#[test]
fn test_deleted_rows_do_not_hold_keys() {
    let mut t = people();
    let a = committed(&mut t, 1, "a");
    t.delete(a).unwrap();
    t.add_values(vec![Value::Int(1), Value::from("again")]).unwrap();
    assert_eq!(t.row_count(), 2);
}

#[test]
fn test_violation_message_names_columns_and_values() {
    let mut t = pair_table();
    t.add_values(vec![Value::Int(1), Value::Int(2)]).unwrap();
    let err = t.add_values(vec![Value::Int(1), Value::Int(2)]).unwrap_err();
    let message = err.violations()[0].message.clone();
    assert!(message.contains("'a, b'"), "{}", message);
    assert!(message.contains("'1, 2'"), "{}", message);
}

#[test]
fn test_not_null_column() {
    let mut t = Table::new("T");
    t.add_column(Column::new("must", ColumnType::String).not_null().with_default("x"))
        .unwrap();
    let r = t.add_values(Vec::new()).unwrap();
    let err = t.set_value(r, "must", None).unwrap_err();
    assert_eq!(err.violations()[0].kind, ViolationKind::NotNull);
    assert_eq!(t.get(r, "must").unwrap(), &Value::from("x"));
    assert!(t.row_error(r).contains("does not allow nulls"));
}

#[test]
fn test_unique_flag_on_existing_duplicates_fails() {
    let mut t = Table::new("T");
    t.add_column(Column::new("a", ColumnType::Int)).unwrap();
    t.add_values(vec![Value::Int(1)]).unwrap();
    t.add_values(vec![Value::Int(1)]).unwrap();
    let err = t
        .add_column(Column::new("a2", ColumnType::Int).with_default(0).unique())
        .unwrap_err();
    assert!(err.is_constraint_violation());
    assert_eq!(t.columns().len(), 1);
}

// =============================================================================
// BATCH LOAD
// =============================================================================

#[test]
fn test_batch_load_aggregates_violations() {
    let mut t = pair_table();
    let mut scope = t.begin_load_data();
    let r1 = scope.add_values(vec![Value::Int(1), Value::Int(1)]).unwrap();
    let r2 = scope.add_values(vec![Value::Int(1), Value::Int(1)]).unwrap();
    let err = scope.finish().unwrap_err();

    assert!(err.is_constraint_violation());
    assert_eq!(err.violations().len(), 2);
    for r in [r1, r2] {
        assert!(!t.row_error(r).is_empty());
        assert!(!t.column_error(r, "a").unwrap().is_empty());
        assert!(!t.column_error(r, "b").unwrap().is_empty());
        assert!(t.column_error(r, "note").unwrap().is_empty());
    }
}

#[test]
fn test_clean_batch_load_finishes_ok() {
    let mut t = pair_table();
    let mut scope = t.begin_load_data();
    scope.add_values(vec![Value::Int(1), Value::Int(1)]).unwrap();
    scope.add_values(vec![Value::Int(1), Value::Int(2)]).unwrap();
    scope.add_values(vec![Value::Null, Value::Int(2)]).unwrap();
    scope.add_values(vec![Value::Null, Value::Int(2)]).unwrap();
    scope.finish().unwrap();
    assert!(!t.has_errors());
}

#[test]
fn test_batch_load_fixed_before_close_passes() {
    let mut t = pair_table();
    let mut scope = t.begin_load_data();
    scope.add_values(vec![Value::Int(1), Value::Int(1)]).unwrap();
    let r = scope.add_values(vec![Value::Int(1), Value::Int(1)]).unwrap();
    scope.set(r, "b", 3).unwrap();
    scope.finish().unwrap();
}

#[test]
fn test_load_mode_ends_after_error_exit() {
    fn load(t: &mut Table) -> Result<()> {
        let mut scope = t.begin_load_data();
        scope.add_values(vec![Value::Int(1), Value::Int(1)])?;
        scope.add_values(vec![Value::Int(1), Value::Int(1), Value::Null, Value::Null])?;
        scope.finish()
    }
    let mut t = pair_table();
    assert!(load(&mut t).unwrap_err().is_invalid_argument());
    assert!(!t.is_loading());
}

#[test]
fn test_enforcement_disabled_by_options() {
    let options = TableOptions::from_toml_str("enforce_constraints = false").unwrap();
    let mut t = Table::with_options("T", options);
    t.add_column(Column::new("a", ColumnType::Int).unique()).unwrap();
    t.add_values(vec![Value::Int(1)]).unwrap();
    t.add_values(vec![Value::Int(1)]).unwrap();
    assert_eq!(t.row_count(), 2);
}
