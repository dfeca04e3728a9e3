//! Edit Session Tests
//!
//! Begin / set / end / cancel and the bulk row accessors.

use crate::*;

#[test]
fn test_end_with_change_modifies() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.begin_edit(r).unwrap();
    t.set(r, "name", "b").unwrap();
    t.end_edit(r).unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Modified);
    assert_eq!(t.get_version(r, "name", RowVersion::Current).unwrap(), &Value::from("b"));
}

#[test]
fn test_end_without_change_stays_unchanged() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.begin_edit(r).unwrap();
    t.set(r, "name", "b").unwrap();
    t.set(r, "name", "a").unwrap();
    t.end_edit(r).unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Unchanged);
}

#[test]
fn test_cancel_restores_pre_begin_values() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    let before = t.item_array(r).unwrap();
    t.begin_edit(r).unwrap();
    t.set(r, "id", 5).unwrap();
    t.set(r, "name", "q").unwrap();
    t.cancel_edit(r).unwrap();
    assert_eq!(t.item_array(r).unwrap(), before);
    assert_eq!(t.row_state(r).unwrap(), RowState::Unchanged);
}

#[test]
fn test_edit_on_added_row_stays_added() {
    let mut t = people();
    let r = t.add_values(vec![Value::Int(1)]).unwrap();
    t.begin_edit(r).unwrap();
    t.set(r, "name", "n").unwrap();
    t.end_edit(r).unwrap();
    assert_eq!(t.row_state(r).unwrap(), RowState::Added);
}

#[test]
fn test_accept_closes_open_edit() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.begin_edit(r).unwrap();
    t.set(r, "name", "b").unwrap();
    t.accept_row(r).unwrap();
    assert!(!t.is_editing(r).unwrap());
    assert_eq!(t.row_state(r).unwrap(), RowState::Unchanged);
    assert_eq!(t.get_version(r, "name", RowVersion::Original).unwrap(), &Value::from("b"));
}

#[test]
fn test_reject_discards_open_edit() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.begin_edit(r).unwrap();
    t.set(r, "name", "b").unwrap();
    t.reject_row(r).unwrap();
    assert!(!t.is_editing(r).unwrap());
    assert_eq!(t.get(r, "name").unwrap(), &Value::from("a"));
}

#[test]
fn test_set_item_array_inside_open_edit_leaves_it_open() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.begin_edit(r).unwrap();
    t.set_item_array(r, vec![Some(Value::Int(2)), None]).unwrap();
    assert!(t.is_editing(r).unwrap());
    assert!(t.is_null(r, "name").unwrap());
    t.cancel_edit(r).unwrap();
    assert_eq!(t.get(r, "id").unwrap(), &Value::Int(1));
}

#[test]
fn test_set_item_array_rejects_no_value_on_value_kind() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    let err = t
        .set_item_array(r, vec![None, Some(Value::from("b"))])
        .unwrap_err();
    assert!(err.is_invalid_argument());
    assert_eq!(t.item_array(r).unwrap(), vec![Value::Int(1), Value::from("a")]);
    assert!(!t.is_editing(r).unwrap());
}

#[test]
fn test_computed_column_follows_commits() {
    let mut t = Table::new("Lines");
    t.add_column(Column::new("qty", ColumnType::Int)).unwrap();
    t.add_column(
        Column::new("double", ColumnType::Int).computed(FnExpression::new("qty*2", |r: &RowValues<'_>| {
            match r.get("qty") {
                Some(Value::Int(q)) => Value::Int(q * 2),
                _ => Value::Null,
            }
        })),
    )
    .unwrap();
    let r = t.add_values(vec![Value::Int(2)]).unwrap();
    assert_eq!(t.get(r, "double").unwrap(), &Value::Int(4));

    t.begin_edit(r).unwrap();
    t.set(r, "qty", 5).unwrap();
    assert_eq!(t.get(r, "double").unwrap(), &Value::Int(4));
    t.end_edit(r).unwrap();
    assert_eq!(t.get(r, "double").unwrap(), &Value::Int(10));

    t.reject_row(r).unwrap();
    assert!(!t.contains(r));
}
