//! Row Lifecycle Tests
//!
//! Attach, commit, modify, delete, rollback and the forced states.

use crate::*;

#[test]
fn test_modify_and_rollback_scenario() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");

    t.set(r, "id", 2).unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Modified);
    assert_eq!(t.get_version(r, "id", RowVersion::Current).unwrap(), &Value::Int(2));
    assert_eq!(t.get_version(r, "id", RowVersion::Original).unwrap(), &Value::Int(1));

    t.reject_row(r).unwrap();
    assert_eq!(t.get_version(r, "id", RowVersion::Current).unwrap(), &Value::Int(1));
    assert_eq!(t.row_state(r).unwrap(), RowState::Unchanged);
}

#[test]
fn test_added_rollback_removes_row() {
    let mut t = people();
    let r = t.add_values(vec![Value::Int(1)]).unwrap();
    t.reject_row(r).unwrap();
    assert!(t.row_state(r).unwrap_err().is_not_found());
    assert!(!t.contains(r));
    assert_eq!(t.row_count(), 0);
}

#[test]
fn test_commit_after_delete_removes_row() {
    let mut t = people();
    let a = committed(&mut t, 1, "a");
    let b = committed(&mut t, 2, "b");
    t.delete(a).unwrap();
    assert_eq!(t.row_count(), 2);
    t.accept_changes().unwrap();
    assert_eq!(t.rows(), &[b]);
}

#[test]
fn test_rollback_after_delete_restores_values() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.set(r, "name", "b").unwrap();
    t.delete(r).unwrap();
    t.reject_changes().unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Unchanged);
    assert_eq!(t.get(r, "name").unwrap(), &Value::from("a"));
}

#[test]
fn test_deleted_row_keeps_its_slot_in_row_order() {
    let mut t = people();
    let a = committed(&mut t, 1, "a");
    let b = committed(&mut t, 2, "b");
    let c = committed(&mut t, 3, "c");
    t.delete(b).unwrap();
    t.reject_row(b).unwrap();
    assert_eq!(t.rows(), &[a, b, c]);
}

#[test]
fn test_forced_states() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.set_modified(r).unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Modified);
    assert!(t.set_added(r).unwrap_err().is_illegal_state_transition());

    t.accept_row(r).unwrap();
    t.set_added(r).unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Added);
    assert!(t.set_modified(r).unwrap_err().is_illegal_state_transition());
}

#[test]
fn test_detached_row_cannot_be_forced_or_deleted() {
    let mut t = people();
    let r = t.new_row();
    assert!(t.set_added(r).unwrap_err().is_illegal_state_transition());
    assert!(t.delete(r).unwrap_err().is_illegal_state_transition());
}

#[test]
fn test_attaching_twice_is_invalid() {
    let mut t = people();
    let r = t.add_values(vec![Value::Int(1)]).unwrap();
    assert!(t.add_row(r).unwrap_err().is_invalid_argument());
}

#[test]
fn test_removed_row_can_rejoin() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.remove_row(r).unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Detached);
    assert!(!t.has_version(r, RowVersion::Original).unwrap());
    t.add_row(r).unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Added);
    assert_eq!(t.get(r, "id").unwrap(), &Value::Null);
}

#[test]
fn test_auto_increment_and_defaults_seed_new_rows() {
    let mut t = Table::new("T");
    t.add_column(Column::new("id", ColumnType::Int).auto_increment(10, 5))
        .unwrap();
    t.add_column(Column::new("flag", ColumnType::Bool).with_default(true))
        .unwrap();
    let a = t.new_row();
    let b = t.new_row();
    assert_eq!(t.item_array(a).unwrap(), vec![Value::Int(10), Value::Bool(true)]);
    assert_eq!(t.get(b, "id").unwrap(), &Value::Int(15));
}

#[test]
fn test_export_import_between_tables() {
    let mut source = people();
    let r = committed(&mut source, 1, "a");
    source.delete(r).unwrap();
    let image = source.export_row(r).unwrap();
    assert_eq!(image.state(), RowState::Deleted);

    let mut target = people();
    let copy = target.import_row(&image).unwrap();
    assert_eq!(target.row_state(copy).unwrap(), RowState::Deleted);
    assert_eq!(
        target.get_version(copy, "name", RowVersion::Original).unwrap(),
        &Value::from("a")
    );
}
