//! Surrogate id allocation through the allocator seam.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use designstore_foundation::{ActionKind, BoxError, ErrorKind, SurrogateId};
use designstore_storage::{IdAllocator, PersistConfig, Persistable, SequenceAllocator, persist};

use crate::common::{Widget, widgets};

#[test]
fn sequences_are_per_component_type() {
    let alloc = SequenceAllocator::starting_at(100);
    assert_eq!(alloc.allocate("Widget").unwrap(), SurrogateId::new(100));
    assert_eq!(alloc.allocate("Stage").unwrap(), SurrogateId::new(100));
    assert_eq!(alloc.allocate("Widget").unwrap(), SurrogateId::new(101));
    assert_eq!(alloc.peek("Widget"), 102);
    assert_eq!(alloc.allocated("Widget"), 2);
}

#[test]
fn concurrent_allocation_hands_out_unique_ids() {
    let alloc = Arc::new(SequenceAllocator::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let alloc = Arc::clone(&alloc);
            thread::spawn(move || {
                (0..50)
                    .map(|_| alloc.allocate("Widget").unwrap().get())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids: Vec<i64> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 200);
    assert_eq!(alloc.allocated("Widget"), 200);
}

#[test]
fn allocator_failure_aborts_the_walk() {
    let failing =
        |_: &str| -> Result<SurrogateId, BoxError> { Err("sequence table locked".into()) };
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();

    let err = persist(&mut list, &failing, PersistConfig::default()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::DatabaseComponent { .. }));
}

#[test]
fn exhausted_sequence_is_reported() {
    let alloc = SequenceAllocator::starting_at(i64::MAX);
    let err = alloc.allocate("Widget").unwrap_err();
    assert_eq!(err.to_string(), "sequence for Widget is exhausted");
}

#[test]
fn failed_walk_can_be_retried() {
    let calls = AtomicUsize::new(0);
    let flaky = |_: &str| -> Result<SurrogateId, BoxError> {
        match calls.fetch_add(1, Ordering::SeqCst) {
            0 => Ok(SurrogateId::new(101)),
            _ => Err("sequence table locked".into()),
        }
    };
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();
    list.add(Widget::new("w2", "knob")).unwrap();

    assert!(persist(&mut list, &flaky, PersistConfig::default()).is_err());
    assert_eq!(list.get(0).unwrap().surrogate_id(), SurrogateId::new(101));
    assert!(!list.get(1).unwrap().surrogate_id().is_allocated());

    let alloc = SequenceAllocator::starting_at(200);
    let doc = persist(&mut list, &alloc, PersistConfig::default()).unwrap();
    assert_eq!(doc.count(ActionKind::Insert), 2);
    let ids: Vec<_> = doc
        .fragments()
        .iter()
        .map(|f| f.payload.attr("databaseId").unwrap())
        .collect();
    assert_eq!(ids, vec!["101", "200"]);
    assert_eq!(alloc.allocated("Widget"), 1);
}

#[test]
fn unacknowledged_change_set_is_sent_again() {
    let alloc = SequenceAllocator::new();
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();

    let first = persist(&mut list, &alloc, PersistConfig::default()).unwrap();
    let second = persist(&mut list, &alloc, PersistConfig::default()).unwrap();

    assert_eq!(first.to_element(), second.to_element());
    assert_eq!(alloc.allocated("Widget"), 1);
}
