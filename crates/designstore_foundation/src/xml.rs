//! In-memory XML element tree and its text codec.
//!
//! Components serialize into [`Element`] values rather than text so that an
//! action document can splice payloads together without reparsing. Text
//! conversion goes through `quick-xml`.

use std::fmt;
use std::str::FromStr;

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;

use crate::error::{Error, Result};

/// An XML element: name, ordered attributes, text, and child elements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    /// Creates an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the element name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fails with an unknown node type error unless this element is named `expected`.
    ///
    /// # Errors
    ///
    /// Returns an error carrying the expected and the actual name.
    pub fn expect_name(&self, expected: &str) -> Result<()> {
        if self.name == expected {
            Ok(())
        } else {
            Err(Error::unknown_node_type(expected, self.name.as_str()))
        }
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    /// Returns an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        let value = value.to_string();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some((_, v)) => *v = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Builder form of [`Element::set_attr`].
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Removes an attribute, returning its value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(k, _)| k == name)?;
        Some(self.attributes.remove(pos).1)
    }

    /// Returns the attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns a required attribute value.
    ///
    /// # Errors
    ///
    /// Returns an unknown node type error if the attribute is absent.
    pub fn required_attr(&self, name: &str) -> Result<&str> {
        self.attr(name)
            .ok_or_else(|| Error::missing_attribute(&self.name, name))
    }

    /// Parses a required attribute.
    ///
    /// # Errors
    ///
    /// Returns an unknown node type error if the attribute is absent or does not parse.
    pub fn parse_attr<T: FromStr>(&self, name: &str) -> Result<T> {
        let raw = self.required_attr(name)?;
        raw.parse().map_err(|_| Error::invalid_attribute(name, raw))
    }

    /// Parses an optional attribute.
    ///
    /// # Errors
    ///
    /// Returns an unknown node type error if the attribute is present but does not parse.
    pub fn parse_attr_opt<T: FromStr>(&self, name: &str) -> Result<Option<T>> {
        self.attr(name)
            .map(|raw| raw.parse().map_err(|_| Error::invalid_attribute(name, raw)))
            .transpose()
    }

    // =========================================================================
    // Text and children
    // =========================================================================

    /// Returns the text content (empty if none).
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the text content.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Builder form of [`Element::set_text`].
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    /// Returns the child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Appends a child element.
    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Builder form of [`Element::push_child`].
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.push_child(child);
        self
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns all children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Returns the first child with the given name.
    ///
    /// # Errors
    ///
    /// Returns an unknown node type error if there is no such child.
    pub fn required_child(&self, name: &str) -> Result<&Element> {
        self.child(name).ok_or_else(|| {
            Error::unknown_node_type(format!("child <{name}>"), format!("<{}> without it", self.name))
        })
    }

    /// Returns the only child element.
    ///
    /// # Errors
    ///
    /// Returns an unknown node type error unless there is exactly one child.
    pub fn single_child(&self) -> Result<&Element> {
        match self.children.as_slice() {
            [only] => Ok(only),
            other => Err(Error::unknown_node_type(
                format!("exactly one child of <{}>", self.name),
                format!("{} children", other.len()),
            )),
        }
    }

    // =========================================================================
    // Text codec
    // =========================================================================

    /// Parses a document into its root element.
    ///
    /// Whitespace-only text is dropped; comments, processing instructions and
    /// the XML declaration are skipped.
    ///
    /// # Errors
    ///
    /// Returns an XML error if the text is not well formed or has no single root.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| Error::xml(format!("at byte {}: {e}", reader.buffer_position())))?;
            match event {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let element = Self::from_start(&start)?;
                    Self::close(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| Error::xml("closing tag without an open element"))?;
                    Self::close(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|e| Error::xml(e.to_string()))?;
                    Self::append_text(&mut stack, &text)?;
                }
                Event::CData(data) => {
                    let data = data.into_inner();
                    Self::append_text(&mut stack, &String::from_utf8_lossy(&data))?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::xml(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or_else(|| Error::xml("document has no root element"))
    }

    /// Renders this element as compact XML text.
    ///
    /// # Errors
    ///
    /// Returns an XML error if the writer fails.
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|e| Error::xml(e.to_string()))
    }

    /// Renders this element as indented XML text.
    ///
    /// # Errors
    ///
    /// Returns an XML error if the writer fails.
    pub fn to_pretty_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        self.write(&mut writer)?;
        String::from_utf8(writer.into_inner()).map_err(|e| Error::xml(e.to_string()))
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (k, v) in &self.attributes {
            start.push_attribute((k.as_str(), v.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            return writer
                .write_event(Event::Empty(start))
                .map_err(|e| Error::xml(e.to_string()));
        }

        writer
            .write_event(Event::Start(start))
            .map_err(|e| Error::xml(e.to_string()))?;
        if !self.text.is_empty() {
            writer
                .write_event(Event::Text(BytesText::new(&self.text)))
                .map_err(|e| Error::xml(e.to_string()))?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(|e| Error::xml(e.to_string()))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| Error::xml(e.to_string()))?
            .to_string();
        let mut element = Self::new(name);
        for attr in start.attributes() {
            let attr = attr.map_err(|e| Error::xml(e.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::xml(e.to_string()))?
                .to_string();
            let value = attr.unescape_value().map_err(|e| Error::xml(e.to_string()))?;
            element.attributes.push((key, value.into_owned()));
        }
        Ok(element)
    }

    fn close(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(element);
            return Ok(());
        }
        if root.is_some() {
            return Err(Error::xml(format!(
                "second root element <{}>",
                element.name
            )));
        }
        *root = Some(element);
        Ok(())
    }

    fn append_text(stack: &mut [Element], text: &str) -> Result<()> {
        match stack.last_mut() {
            Some(current) => {
                current.text.push_str(text);
                Ok(())
            }
            None => Err(Error::xml(format!("text outside the root element: {text:?}"))),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.to_xml_string().map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl FromStr for Element {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}
