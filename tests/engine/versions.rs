//! Version Slot Tests
//!
//! Presence of Original / Current / Proposed / Default per lifecycle state,
//! and the Default resolution rule.

use crate::*;

// [Original, Current, Proposed, Default]
const DETACHED: [bool; 4] = [false, false, true, true];
const ADDED: [bool; 4] = [false, true, false, true];
const COMMITTED: [bool; 4] = [true, true, false, true];
const DELETED: [bool; 4] = [true, false, false, false];

#[test]
fn test_presence_through_the_lifecycle() {
    let mut t = people();
    let r = t.new_row();
    assert_eq!(presence(&t, r), DETACHED);

    t.add_row(r).unwrap();
    assert_eq!(presence(&t, r), ADDED);

    t.accept_row(r).unwrap();
    assert_eq!(presence(&t, r), COMMITTED);

    t.set(r, "name", "x").unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Modified);
    assert_eq!(presence(&t, r), COMMITTED);

    t.delete(r).unwrap();
    assert_eq!(presence(&t, r), DELETED);
}

#[test]
fn test_edit_session_adds_proposed_only() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.begin_edit(r).unwrap();
    assert_eq!(presence(&t, r), [true, true, true, true]);
    t.cancel_edit(r).unwrap();
    assert_eq!(presence(&t, r), COMMITTED);
}

#[test]
fn test_default_prefers_proposed() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.begin_edit(r).unwrap();
    t.set_value(r, "name", None).unwrap();
    assert!(t.is_null(r, "name").unwrap());
    assert!(!t.is_null_version(r, "name", RowVersion::Current).unwrap());
}

#[test]
fn test_reading_absent_version_is_version_not_found() {
    let mut t = people();
    let r = t.add_values(vec![Value::Int(1)]).unwrap();
    let err = t.get_version(r, "id", RowVersion::Original).unwrap_err();
    assert!(err.is_version_not_found());
    let err = t.get_version(r, "id", RowVersion::Proposed).unwrap_err();
    assert!(err.is_version_not_found());
}

#[test]
fn test_null_sentinel_is_a_value() {
    let mut t = people();
    let r = t.add_values(vec![Value::Int(1), Value::Null]).unwrap();
    assert!(t.has_version(r, RowVersion::Current).unwrap());
    assert_eq!(t.get(r, "name").unwrap(), &Value::Null);
}

#[test]
fn test_cells_are_per_row() {
    let mut t = people();
    let a = committed(&mut t, 1, "a");
    let b = committed(&mut t, 2, "b");
    t.set(a, "name", "z").unwrap();
    assert_eq!(t.get(b, "name").unwrap(), &Value::from("b"));
}

#[test]
fn test_column_lookup_errors() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    assert!(t.get(r, "").unwrap_err().is_invalid_argument());
    assert!(t.get(r, "missing").unwrap_err().is_not_found());
    assert!(t.get(r, 5usize).unwrap_err().is_not_found());

    let removed = t.columns()[1].id();
    t.remove_column("name").unwrap();
    assert!(t.get(r, removed).unwrap_err().is_not_found());
}
