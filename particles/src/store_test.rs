use std::cell::RefCell;
use std::rc::Rc;

use super::*;

#[test]
fn new_store_starts_at_version_zero() {
    let store = Store::new(5_u32);
    assert_eq!(*store.get(), 5);
    assert_eq!(store.version(), 0);
}

#[test]
fn update_mutates_and_bumps_version() {
    let mut store = Store::new(1_u32);
    store.update(|v| *v += 2);
    assert_eq!(*store.get(), 3);
    assert_eq!(store.version(), 1);
}

#[test]
fn replace_notifies_subscribers() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut store = Store::new(String::from("a"));
    store.subscribe(move |v: &String| sink.borrow_mut().push(v.clone()));

    store.replace("b".into());
    store.update(|v| v.push('c'));

    assert_eq!(*seen.borrow(), vec!["b".to_string(), "bc".to_string()]);
}

#[test]
fn unsubscribe_stops_notifications() {
    let count = Rc::new(RefCell::new(0));
    let sink = Rc::clone(&count);
    let mut store = Store::new(0_i32);
    let id = store.subscribe(move |_| *sink.borrow_mut() += 1);

    store.update(|v| *v += 1);
    assert!(store.unsubscribe(id));
    store.update(|v| *v += 1);

    assert_eq!(*count.borrow(), 1);
    assert_eq!(store.subscriber_count(), 0);
}

#[test]
fn unsubscribe_unknown_id_returns_false() {
    let mut store = Store::new(0_i32);
    let id = store.subscribe(|_| {});
    assert!(store.unsubscribe(id));
    assert!(!store.unsubscribe(id));
}

#[test]
fn snapshot_is_detached_from_later_updates() {
    let mut store = Store::new(vec![1, 2]);
    let snap = store.snapshot();
    store.update(|v| v.push(3));
    assert_eq!(snap, vec![1, 2]);
    assert_eq!(store.get().len(), 3);
}
