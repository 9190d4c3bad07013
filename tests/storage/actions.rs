//! Action documents and their rendered form.

use designstore_foundation::{ActionKind, Element, RelationContext, SurrogateId};
use designstore_storage::{
    ActionDocument, ActionFragment, ActionSink, PersistConfig, PersistSession, Persistable,
    SequenceAllocator, persist,
};

use crate::common::{Pipe, Stage, Widget};

#[test]
fn rendered_document_carries_relation_keys() {
    let alloc = SequenceAllocator::new();
    let mut pipe = Pipe::loaded("p1", 1);
    pipe.stages.add(Stage::new("s1", "build")).unwrap();

    let doc = persist(&mut pipe, &alloc, PersistConfig::default()).unwrap();
    let root = doc.to_element();

    assert_eq!(root.name(), "Actions");
    let action = root.single_child().unwrap();
    assert_eq!(action.name(), "Action");
    assert_eq!(action.attr("type"), Some("INSERT"));
    assert_eq!(action.attr("Pipe_id"), Some("1"));
    assert_eq!(action.single_child().unwrap().name(), "Stage");
}

#[test]
fn bare_config_omits_relation_keys() {
    let alloc = SequenceAllocator::new();
    let mut pipe = Pipe::loaded("p1", 1);
    pipe.stages.add(Stage::new("s1", "build")).unwrap();

    let config = PersistConfig::bare()
        .with_root_element("ChangeSet")
        .with_action_element("Change");
    let doc = persist(&mut pipe, &alloc, config).unwrap();
    let root = doc.to_element();

    assert_eq!(root.name(), "ChangeSet");
    let action = root.single_child().unwrap();
    assert_eq!(action.name(), "Change");
    assert_eq!(action.attr("Pipe_id"), None);
}

#[test]
fn document_text_parses_back() {
    let alloc = SequenceAllocator::new();
    let mut pipe = Pipe::new("p1");
    pipe.stages.add(Stage::new("s1", "build")).unwrap();
    pipe.stages.add(Stage::new("s2", "test")).unwrap();

    let doc = persist(&mut pipe, &alloc, PersistConfig::default()).unwrap();
    let parsed = Element::parse(&doc.to_xml_string().unwrap()).unwrap();

    assert_eq!(parsed, doc.to_element());
    let kinds: Vec<ActionKind> = parsed
        .children_named("Action")
        .map(|a| a.parse_attr("type").unwrap())
        .collect();
    assert_eq!(kinds, vec![ActionKind::Insert; 3]);
}

#[test]
fn any_sink_can_collect_fragments() {
    let alloc = SequenceAllocator::new();
    let mut sink: Vec<ActionFragment> = Vec::new();
    let mut widget = Widget::new("w1", "dial");
    {
        let mut session = PersistSession::new(&mut sink, &alloc);
        widget
            .to_database_xml(&mut session, &RelationContext::new())
            .unwrap();
        assert_eq!(session.emitted(), 1);
    }
    assert_eq!(sink.len(), 1);
    assert_eq!(sink[0].payload.attr("id"), Some("w1"));
}

#[test]
fn fragments_keep_push_order() {
    let mut doc = ActionDocument::new(PersistConfig::default());
    for (kind, id) in [
        (ActionKind::Delete, "a"),
        (ActionKind::Insert, "b"),
        (ActionKind::Update, "c"),
    ] {
        doc.push(ActionFragment::new(
            kind,
            "Widget",
            RelationContext::new().extend("Pipe", SurrogateId::new(1)),
            Element::new("Widget").with_attr("id", id),
        ));
    }

    let ids: Vec<_> = doc
        .into_fragments()
        .into_iter()
        .map(|f| f.payload.attr("id").unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}
