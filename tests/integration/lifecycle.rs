//! The edit, save, reload cycle of a flat collection.

use designstore_foundation::{ActionKind, ComponentState, Element, RelationContext};
use designstore_storage::{
    MemoryLoader, PersistConfig, Persistable, SequenceAllocator, Serializable, persist,
};

use crate::common::{Widget, cid, widgets};

#[test]
fn insert_then_nothing_then_delete() {
    let alloc = SequenceAllocator::new();
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();

    let first = persist(&mut list, &alloc, PersistConfig::default()).unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first.count(ActionKind::Insert), 1);
    list.set_unchanged();

    let second = persist(&mut list, &alloc, PersistConfig::default()).unwrap();
    assert!(second.is_empty());

    list.remove(&cid("w1")).unwrap();
    let third = persist(&mut list, &alloc, PersistConfig::default()).unwrap();
    assert_eq!(third.len(), 1);
    assert_eq!(third.count(ActionKind::Delete), 1);
    list.set_unchanged();

    assert!(list.is_empty());
    assert!(list.pending_deletions().is_empty());
    assert_eq!(alloc.allocated("Widget"), 1);
}

#[test]
fn database_load_marks_everything_unchanged() {
    let stored = Element::new("Widgets")
        .with_attr("id", "widgets")
        .with_attr("databaseId", 3)
        .with_child(Widget::new("w1", "dial").to_xml())
        .with_child(Widget::new("w2", "knob").to_xml())
        .with_child(Widget::new("w3", "lever").to_xml());

    let mut list = widgets();
    list.from_database_xml(&stored, &MemoryLoader::new(), &RelationContext::new())
        .unwrap();

    assert_eq!(list.len(), 3);
    assert!(list.iter().all(|w| w.state() == ComponentState::Unchanged));
    assert_eq!(list.state(), ComponentState::Unchanged);

    let alloc = SequenceAllocator::new();
    assert!(persist(&mut list, &alloc, PersistConfig::default()).unwrap().is_empty());
}

#[test]
fn add_and_remove_before_saving_leaves_no_trace() {
    let alloc = SequenceAllocator::new();
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();
    list.add(Widget::new("w2", "knob")).unwrap();
    list.remove(&cid("w1")).unwrap();

    let doc = persist(&mut list, &alloc, PersistConfig::default()).unwrap();
    assert_eq!(doc.len(), 1);
    assert_eq!(doc.fragments()[0].payload.attr("id"), Some("w2"));
    assert_eq!(alloc.allocated("Widget"), 1);
}
