//! Foreign Key Tests

use crate::*;

#[test]
fn test_null_child_key_is_exempt() {
    let mut ds = family(true);
    let c = child(&mut ds, 1, Value::Null);
    assert_eq!(ds.table("Child").unwrap().row_state(c).unwrap(), RowState::Added);
}

#[test]
fn test_orphan_child_edit_is_reverted() {
    let mut ds = family(true);
    parent(&mut ds, 1);
    let c = child(&mut ds, 1, Value::Int(1));
    let mut table = ds.table_mut("Child").unwrap();
    table.begin_edit(c).unwrap();
    table.set(c, "P", 9).unwrap();
    let err = table.end_edit(c).unwrap_err();
    assert_eq!(err.violations()[0].kind, ViolationKind::ForeignKey);
    assert_eq!(table.get_version(c, "P", RowVersion::Current).unwrap(), &Value::Int(1));
    assert!(table.row_has_errors(c));
}

#[test]
fn test_parent_key_change_with_children_is_rejected() {
    let mut ds = family(true);
    let p = parent(&mut ds, 1);
    child(&mut ds, 1, Value::Int(1));
    let err = ds.table_mut("Parent").unwrap().set(p, "P", 2).unwrap_err();
    assert_eq!(err.violations()[0].kind, ViolationKind::ParentKey);
    assert_eq!(ds.table("Parent").unwrap().get(p, "P").unwrap(), &Value::Int(1));
}

#[test]
fn test_parent_without_children_can_go() {
    let mut ds = family(true);
    let p = parent(&mut ds, 1);
    parent(&mut ds, 2);
    child(&mut ds, 1, Value::Int(2));
    ds.table_mut("Parent").unwrap().delete(p).unwrap();
    assert_eq!(ds.table("Parent").unwrap().row_count(), 1);
}

#[test]
fn test_parent_key_is_unique() {
    let mut ds = family(true);
    parent(&mut ds, 1);
    let err = ds
        .table_mut("Parent")
        .unwrap()
        .add_values(vec![Value::Int(1)])
        .unwrap_err();
    assert_eq!(err.violations()[0].kind, ViolationKind::Unique);
}

#[test]
fn test_unconstrained_relation_checks_nothing() {
    let mut ds = family(false);
    child(&mut ds, 1, Value::Int(42));
    assert!(!ds.has_errors());
}

#[test]
fn test_load_scope_reports_orphans_once() {
    let mut ds = family(true);
    let mut scope = ds.begin_load_data("Child").unwrap();
    let a = scope.add_values(vec![Value::Int(1), Value::Int(5)]).unwrap();
    let b = scope.add_values(vec![Value::Int(2), Value::Int(6)]).unwrap();
    let err = scope.finish().unwrap_err();
    assert_eq!(err.violations().len(), 2);
    let child = ds.table("Child").unwrap();
    assert!(child.row_has_errors(a) && child.row_has_errors(b));
    assert!(!child.is_loading());
}

#[test]
fn test_parent_load_checks_remaining_children() {
    let mut ds = family(true);
    let p = parent(&mut ds, 3);
    let c = child(&mut ds, 1, Value::Int(3));
    {
        let mut scope = ds.begin_load_data("Parent").unwrap();
        scope.set(p, "P", 4).unwrap();
    }
    assert!(ds.table("Child").unwrap().row_has_errors(c));
    assert!(ds.has_errors());
}

#[test]
fn test_removing_relation_drops_its_parent_key() {
    let mut ds = family(true);
    ds.remove_relation(REL).unwrap();
    assert!(ds.table("Parent").unwrap().unique_constraints().is_empty());
    parent(&mut ds, 1);
    parent(&mut ds, 1);
}

#[test]
fn test_rolling_back_added_parent_with_children_is_refused() {
    let mut ds = family(true);
    let p = parent(&mut ds, 7);
    let c = child(&mut ds, 1, Value::Int(7));
    let err = ds.table_mut("Parent").unwrap().reject_row(p).unwrap_err();
    assert_eq!(err.violations()[0].kind, ViolationKind::ParentKey);
    let parents = ds.table("Parent").unwrap();
    assert!(parents.contains(p));
    assert_eq!(parents.row_state(p).unwrap(), RowState::Added);
    assert!(parents.row_has_errors(p));
    assert_eq!(ds.parent_row(REL, "Child", c, RowVersion::Default).unwrap(), Some(p));
}

#[test]
fn test_table_rollback_keeps_referenced_parents() {
    let mut ds = family(true);
    let p = parent(&mut ds, 7);
    child(&mut ds, 1, Value::Int(7));
    let err = ds.table_mut("Parent").unwrap().reject_changes().unwrap_err();
    assert_eq!(err.violations()[0].kind, ViolationKind::ParentKey);
    assert_eq!(ds.table("Parent").unwrap().rows(), &[p]);
}

#[test]
fn test_rolling_back_parent_and_children_together_succeeds() {
    let mut ds = family(true);
    let p = parent(&mut ds, 7);
    let c = child(&mut ds, 1, Value::Int(7));
    ds.reject_changes().unwrap();
    assert_eq!(ds.table("Parent").unwrap().row_count(), 0);
    assert_eq!(ds.table("Child").unwrap().row_count(), 0);
    assert!(ds.table("Parent").unwrap().row_state(p).unwrap_err().is_not_found());
    assert!(ds.table("Child").unwrap().row_state(c).unwrap_err().is_not_found());
    assert!(!ds.has_errors());
}

#[test]
fn test_rolling_back_parent_key_change_under_new_children_is_refused() {
    let mut ds = family(true);
    let p = parent(&mut ds, 1);
    ds.accept_changes().unwrap();
    ds.table_mut("Parent").unwrap().set(p, "P", 2).unwrap();
    let c = child(&mut ds, 1, Value::Int(2));
    ds.table_mut("Child").unwrap().accept_row(c).unwrap();
    let err = ds.table_mut("Parent").unwrap().reject_row(p).unwrap_err();
    assert_eq!(err.violations()[0].kind, ViolationKind::ParentKey);
    assert_eq!(ds.table("Parent").unwrap().get(p, "P").unwrap(), &Value::Int(2));
    assert_eq!(ds.table("Parent").unwrap().row_state(p).unwrap(), RowState::Modified);
}

#[test]
fn test_set_parent_row_with_foreign_handle_is_not_found() {
    let mut ds = family(true);
    parent(&mut ds, 1);
    let c = child(&mut ds, 1, Value::Int(1));
    let other = child(&mut ds, 2, Value::Int(1));
    let err = ds.set_parent_row("Child", c, Some(other), REL).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(ds.table("Child").unwrap().get(c, "P").unwrap(), &Value::Int(1));
}
