//! Collections: membership, deletion bookkeeping, and design-time XML.

use designstore_foundation::{ActionKind, ComponentState, Element};
use designstore_storage::{
    PersistConfig, Persistable, SequenceAllocator, Serializable, Validate, ValidationContext,
    persist,
};

use crate::common::{Widget, cid, widgets};

#[test]
fn named_collection_uses_configured_names() {
    let list = widgets();
    assert_eq!(list.element_name(), "Widgets");
    assert_eq!(list.dataset_name(), "getWidgets");
    assert_eq!(list.configured_dataset_name(), "getWidgets");
}

#[test]
fn lookup_by_correlation_id() {
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();
    list.add(Widget::new("w2", "knob")).unwrap();

    assert_eq!(list.position(&cid("w2")), Some(1));
    assert_eq!(list.find(&cid("w1")).unwrap().label(), "dial");
    assert!(list.find(&cid("w3")).is_none());

    list.find_mut(&cid("w2")).unwrap().set_label("slider").unwrap();
    assert_eq!(list.get(1).unwrap().label(), "slider");
}

#[test]
fn iteration_covers_live_members_only() {
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();
    list.add(Widget::new("w2", "knob")).unwrap();
    list.remove(&cid("w1")).unwrap();

    let labels: Vec<_> = (&list).into_iter().map(Widget::label).collect();
    assert_eq!(labels, vec!["knob"]);
}

#[test]
fn removing_persisted_member_emits_delete() {
    let alloc = SequenceAllocator::new();
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();
    list.add(Widget::new("w2", "knob")).unwrap();
    persist(&mut list, &alloc, PersistConfig::default()).unwrap();
    list.set_unchanged();

    list.remove(&cid("w2")).unwrap();
    assert_eq!(list.pending_deletions()[0].state(), ComponentState::Removed);

    let doc = persist(&mut list, &alloc, PersistConfig::default()).unwrap();
    assert_eq!(doc.len(), 1);
    let delete = doc.of_kind(ActionKind::Delete).next().unwrap();
    assert_eq!(delete.payload.attr("id"), Some("w2"));
    assert_eq!(delete.payload.attr("databaseId"), Some("2"));
}

#[test]
fn change_set_round_trips_through_text() {
    let alloc = SequenceAllocator::new();
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();
    list.add(Widget::new("w2", "knob")).unwrap();
    persist(&mut list, &alloc, PersistConfig::default()).unwrap();
    list.set_unchanged();

    list.get_mut(0).unwrap().set_label("lever").unwrap();
    list.remove(&cid("w2")).unwrap();
    list.add(Widget::new("w3", "switch")).unwrap();

    let text = list.to_xml().to_pretty_xml_string().unwrap();
    let mut back = widgets();
    back.from_xml(&Element::parse(&text).unwrap()).unwrap();

    let states: Vec<_> = back.iter().map(|w| w.state()).collect();
    assert_eq!(states, vec![ComponentState::Modified, ComponentState::New]);
    assert_eq!(back.pending_deletions().len(), 1);
    assert_eq!(back.pending_deletions()[0].id(), &cid("w2"));

    let doc = persist(&mut back, &alloc, PersistConfig::default()).unwrap();
    let kinds: Vec<_> = doc.fragments().iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![ActionKind::Update, ActionKind::Insert, ActionKind::Delete]
    );
}

#[test]
fn bad_member_reports_collection_path() {
    let el = Element::new("Widgets")
        .with_attr("id", "widgets")
        .with_attr("databaseId", -1)
        .with_child(Element::new("Widget").with_attr("id", "w1"));
    let err = widgets().from_xml(&el).unwrap_err();
    assert!(err.is_unknown_node_type());
    assert_eq!(err.context.unwrap().path(), "Widgets");
}

#[test]
fn validation_paths_include_member() {
    let mut list = widgets();
    list.add(Widget::new("w1", "dial")).unwrap();
    list.add(Widget::new("w2", "")).unwrap();

    let mut ctx = ValidationContext::new();
    list.validate(&mut ctx);
    assert_eq!(ctx.issues().len(), 1);
    assert_eq!(ctx.issues()[0].to_string(), "Widgets/Widget[w2]: label is required");
}
