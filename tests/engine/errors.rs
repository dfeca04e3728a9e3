//! Error Annotation Tests

use crate::*;

#[test]
fn test_row_error_set_and_clear() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    assert_eq!(t.row_error(r), "");
    assert!(!t.row_has_errors(r));

    t.set_row_error(r, "bad row").unwrap();
    assert_eq!(t.row_error(r), "bad row");
    assert!(t.row_has_errors(r));

    t.set_row_error(r, "").unwrap();
    assert!(!t.row_has_errors(r));
}

#[test]
fn test_column_error_by_index_name_and_id() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    let name = t.columns()[1].id();

    t.set_column_error(r, 1usize, "one").unwrap();
    assert_eq!(t.column_error(r, "NAME").unwrap(), "one");
    assert_eq!(t.column_error(r, name).unwrap(), "one");
    assert!(t.row_has_errors(r));
    assert_eq!(t.row_error(r), "");
}

#[test]
fn test_clear_errors_resets_everything() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.set_row_error(r, "row").unwrap();
    t.set_column_error(r, "id", "id").unwrap();
    t.set_column_error(r, "name", "name").unwrap();
    t.clear_errors(r).unwrap();
    assert!(!t.row_has_errors(r));
    assert!(t.columns_in_error(r).unwrap().is_empty());
    assert!(!t.has_errors());
}

#[test]
fn test_column_error_on_unknown_column_is_not_found() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    assert!(t.set_column_error(r, "nope", "x").unwrap_err().is_not_found());
}

#[test]
fn test_errors_survive_edits_and_commits() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.set_column_error(r, "name", "check").unwrap();
    t.set(r, "name", "b").unwrap();
    t.accept_changes().unwrap();
    assert_eq!(t.column_error(r, "name").unwrap(), "check");
    assert_eq!(t.rows_in_error(), vec![r]);
}
