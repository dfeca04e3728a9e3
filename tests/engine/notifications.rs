//! Change Notification Tests

use crate::*;
use std::sync::{Arc, Mutex};

type Log<T> = Arc<Mutex<Vec<T>>>;

fn column_log(t: &mut Table) -> Log<(ColumnPhase, Option<Value>, Value)> {
    let log: Log<_> = Arc::default();
    let sink = Arc::clone(&log);
    t.on_column_change(move |_, e| {
        sink.lock()
            .unwrap()
            .push((e.phase, e.previous.clone(), e.proposed.clone()))
    });
    log
}

fn row_log(t: &mut Table) -> Log<RowChange> {
    let log: Log<_> = Arc::default();
    let sink = Arc::clone(&log);
    t.on_row_change(move |_, e| sink.lock().unwrap().push(e.change));
    log
}

#[test]
fn test_changed_fires_immediately_inside_edit() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    let log = column_log(&mut t);
    t.begin_edit(r).unwrap();
    t.set(r, "name", "b").unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            (ColumnPhase::Changing, Some(Value::from("a")), Value::from("b")),
            (ColumnPhase::Changed, Some(Value::from("a")), Value::from("b")),
        ]
    );
}

#[test]
fn test_rejected_assignment_fires_nothing() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    let log = column_log(&mut t);
    assert!(t.set_value(r, "id", None).is_err());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_constraint_failure_suppresses_changed() {
    let mut t = people();
    committed(&mut t, 1, "a");
    let r = committed(&mut t, 2, "b");
    let log = column_log(&mut t);
    assert!(t.set(r, "id", 1).is_err());
    let phases: Vec<_> = log.lock().unwrap().iter().map(|e| e.0).collect();
    assert_eq!(phases, vec![ColumnPhase::Changing]);
}

#[test]
fn test_row_events_follow_lifecycle() {
    let mut t = people();
    let log = row_log(&mut t);
    let r = t.add_values(vec![Value::Int(1)]).unwrap();
    t.accept_row(r).unwrap();
    t.set(r, "name", "x").unwrap();
    t.reject_row(r).unwrap();
    t.delete(r).unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            RowChange::Add,
            RowChange::Commit,
            RowChange::Change,
            RowChange::Rollback,
            RowChange::Delete,
        ]
    );
}

#[test]
fn test_listener_can_mutate_the_notified_row() {
    let mut t = people();
    let r = committed(&mut t, 1, "a");
    t.on_column_change(|table, e| {
        if e.phase == ColumnPhase::Changed && e.column_name == "id" {
            let name = format!("id {}", e.proposed);
            table.set(e.row, "name", name.as_str()).unwrap();
        }
    });
    t.set(r, "id", 5).unwrap();
    assert_eq!(t.get(r, "name").unwrap(), &Value::from("id 5"));
    assert_eq!(t.row_state(r).unwrap(), RowState::Modified);
}
