//! Navigation Tests

use crate::*;

#[test]
fn test_child_finds_its_single_parent() {
    let mut ds = family(true);
    let p = parent(&mut ds, 7);
    parent(&mut ds, 8);
    let c = child(&mut ds, 1, Value::Int(7));
    assert_eq!(ds.parent_rows(REL, "Child", c, RowVersion::Default).unwrap(), vec![p]);
    assert_eq!(ds.parent_row(REL, "Child", c, RowVersion::Default).unwrap(), Some(p));
}

#[test]
fn test_deleted_parent_is_reachable_at_original() {
    let mut ds = family(false);
    let p = parent(&mut ds, 7);
    let c = child(&mut ds, 1, Value::Int(7));
    ds.accept_changes().unwrap();

    ds.table_mut("Parent").unwrap().delete(p).unwrap();
    assert!(ds.parent_rows(REL, "Child", c, RowVersion::Default).unwrap().is_empty());
    assert_eq!(ds.parent_rows(REL, "Child", c, RowVersion::Original).unwrap(), vec![p]);
}

#[test]
fn test_children_in_child_table_order() {
    let mut ds = family(true);
    let p = parent(&mut ds, 1);
    let a = child(&mut ds, 1, Value::Int(1));
    child(&mut ds, 2, Value::Null);
    let c = child(&mut ds, 3, Value::Int(1));
    assert_eq!(ds.child_rows(REL, "Parent", p, RowVersion::Default).unwrap(), vec![a, c]);
}

#[test]
fn test_navigation_follows_modified_keys_per_version() {
    let mut ds = family(true);
    let p1 = parent(&mut ds, 1);
    let p2 = parent(&mut ds, 2);
    let c = child(&mut ds, 1, Value::Int(1));
    ds.accept_changes().unwrap();

    ds.table_mut("Child").unwrap().set(c, "P", 2).unwrap();
    assert_eq!(ds.parent_row(REL, "Child", c, RowVersion::Current).unwrap(), Some(p2));
    assert_eq!(ds.parent_row(REL, "Child", c, RowVersion::Original).unwrap(), Some(p1));
    assert!(ds
        .parent_row(REL, "Child", c, RowVersion::Proposed)
        .unwrap_err()
        .is_version_not_found());
}

#[test]
fn test_detached_child_navigates_by_pending_values() {
    let mut ds = family(true);
    let p = parent(&mut ds, 4);
    let mut child = ds.table_mut("Child").unwrap();
    let c = child.new_row();
    child.set(c, "P", 4).unwrap();
    assert_eq!(ds.parent_rows(REL, "Child", c, RowVersion::Default).unwrap(), vec![p]);
}

#[test]
fn test_wrong_table_is_relation_mismatch() {
    let mut ds = family(true);
    let p = parent(&mut ds, 1);
    let err = ds.parent_rows(REL, "Parent", p, RowVersion::Default).unwrap_err();
    assert!(err.is_relation_mismatch());
}

#[test]
fn test_row_handle_of_another_table_is_not_found() {
    let mut ds = family(true);
    let p = parent(&mut ds, 1);
    child(&mut ds, 1, Value::Int(1));
    let children = ds.table("Child").unwrap();
    assert!(children.get(p, "C").unwrap_err().is_not_found());
    assert!(!children.contains(p));
    let err = ds.parent_rows(REL, "Child", p, RowVersion::Default).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn test_relation_value_works_like_its_name() {
    let mut ds = family(true);
    let p = parent(&mut ds, 1);
    let c = child(&mut ds, 1, Value::Int(1));
    let rel = ds.relation(REL).unwrap().clone();
    assert_eq!(ds.child_rows(&rel, "Parent", p, RowVersion::Default).unwrap(), vec![c]);
}

#[test]
fn test_set_parent_row_moves_child() {
    let mut ds = family(true);
    parent(&mut ds, 1);
    let p2 = parent(&mut ds, 2);
    let c = child(&mut ds, 1, Value::Int(1));
    ds.accept_changes().unwrap();

    ds.set_parent_row("Child", c, Some(p2), REL).unwrap();
    assert_eq!(ds.parent_row(REL, "Child", c, RowVersion::Default).unwrap(), Some(p2));
    assert_eq!(ds.table("Child").unwrap().row_state(c).unwrap(), RowState::Modified);
}

mod properties {
    use crate::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn children_are_exactly_the_rows_keyed_to_the_parent(keys in proptest::collection::vec(proptest::option::of(0i64..4), 0..24)) {
            let mut ds = family(false);
            let parents: Vec<RowId> = (0..4).map(|p| parent(&mut ds, p)).collect();
            let children: Vec<(RowId, Option<i64>)> = keys
                .iter()
                .enumerate()
                .map(|(i, k)| (child(&mut ds, i as i64, k.map_or(Value::Null, Value::Int)), *k))
                .collect();

            for (p, row) in parents.iter().enumerate() {
                let expected: Vec<RowId> = children
                    .iter()
                    .filter(|(_, k)| *k == Some(p as i64))
                    .map(|(r, _)| *r)
                    .collect();
                prop_assert_eq!(ds.child_rows(REL, "Parent", *row, RowVersion::Default).unwrap(), expected);
            }
            for (row, k) in &children {
                let found = ds.parent_row(REL, "Child", *row, RowVersion::Default).unwrap();
                prop_assert_eq!(found, k.map(|k| parents[k as usize]));
            }
        }
    }
}
