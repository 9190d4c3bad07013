//! The element tree and its text codec.

use designstore_foundation::{Element, SurrogateId};

#[test]
fn parse_nested_document() {
    let text = r#"<?xml version="1.0" encoding="UTF-8"?>
        <!-- a change set -->
        <Widgets id="widgets" databaseId="-1">
            <Widget id="w1" databaseId="4" componentState="MODIFIED">
                <Label>Front &amp; back</Label>
            </Widget>
            <Widget id="w2" databaseId="-1"/>
        </Widgets>"#;

    let root = Element::parse(text).unwrap();
    assert_eq!(root.name(), "Widgets");
    assert_eq!(root.children().len(), 2);

    let first = &root.children()[0];
    assert_eq!(first.parse_attr::<SurrogateId>("databaseId").unwrap(), SurrogateId::new(4));
    assert_eq!(first.required_child("Label").unwrap().text(), "Front & back");
    assert_eq!(root.children()[1].attr("componentState"), None);
}

#[test]
fn cdata_is_text() {
    let root = Element::parse("<Script><![CDATA[a < b]]></Script>").unwrap();
    assert_eq!(root.text(), "a < b");
}

#[test]
fn written_text_parses_back() {
    let original = Element::new("Stage")
        .with_attr("id", "s1")
        .with_attr("name", "quote \" and <angle>")
        .with_child(Element::new("Note").with_text("x & y"))
        .with_child(Element::new("Empty"));

    let compact = original.to_xml_string().unwrap();
    assert_eq!(Element::parse(&compact).unwrap(), original);

    let pretty = original.to_pretty_xml_string().unwrap();
    assert!(pretty.contains('\n'));
    assert_eq!(Element::parse(&pretty).unwrap(), original);
}

#[test]
fn display_and_from_str_agree() {
    let el = Element::new("Widget").with_attr("id", "w1");
    let back: Element = el.to_string().parse().unwrap();
    assert_eq!(back, el);
}

#[test]
fn malformed_documents_fail() {
    assert!(Element::parse("").is_err());
    assert!(Element::parse("<a><b></a>").is_err());
    assert!(Element::parse("<a>").is_err());
    assert!(Element::parse("<a/><b/>").is_err());
}

#[test]
fn shape_errors_name_what_was_expected() {
    let el = Element::new("Gadget").with_attr("databaseId", "abc");

    assert!(el.expect_name("Widget").unwrap_err().is_unknown_node_type());
    assert!(el.required_attr("id").unwrap_err().is_unknown_node_type());
    assert!(el.parse_attr::<SurrogateId>("databaseId").unwrap_err().is_unknown_node_type());
    assert!(el.required_child("Label").unwrap_err().is_unknown_node_type());
    assert!(el.single_child().unwrap_err().is_unknown_node_type());
}

#[test]
fn attribute_editing_preserves_order() {
    let mut el = Element::new("Widget")
        .with_attr("id", "w1")
        .with_attr("databaseId", -1)
        .with_attr("componentState", "NEW");
    el.set_attr("databaseId", 12);
    assert_eq!(el.remove_attr("componentState").as_deref(), Some("NEW"));

    let attrs: Vec<_> = el.attributes().collect();
    assert_eq!(attrs, vec![("id", "w1"), ("databaseId", "12")]);
}

#[test]
fn children_named_filters() {
    let el = Element::new("Stage")
        .with_child(Element::new("Step"))
        .with_child(Element::new("Note"))
        .with_child(Element::new("Step"));
    assert_eq!(el.children_named("Step").count(), 2);
    assert!(el.child("Note").is_some());
}
