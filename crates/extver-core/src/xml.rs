//! A small mutable XML element tree built on `quick-xml` events.
//!
//! Build descriptors are edited in place: text, comments, the XML declaration
//! and start tags (attribute layout and quoting included) survive a
//! parse/serialize cycle unchanged, so only the text nodes that are explicitly
//! rewritten differ in the output. A start tag whose name or attributes were
//! changed is rebuilt with double-quoted attributes.

use std::borrow::Cow;

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use extver_util::errors::{ExtverError, ExtverResult};

/// A node inside an element or around the root element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    /// Unescaped character data.
    Text(String),
    /// Comments, CDATA, declarations and processing instructions, kept verbatim.
    Verbatim(Event<'static>),
}

/// An XML element with its attributes and children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    self_closing: bool,
    source: Option<SourceTag>,
}

/// Start tag as read, reused on output while the element keeps its identity.
#[derive(Debug, Clone, PartialEq)]
struct SourceTag {
    name: String,
    attributes: Vec<(String, String)>,
    /// Bytes between `<` and `>` (or `/>`).
    content: String,
}

/// A parsed XML document: the root element plus whatever surrounds it.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub prolog: Vec<XmlNode>,
    pub root: XmlElement,
    pub epilog: Vec<XmlNode>,
}

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create an element holding a single text node.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.children.push(XmlNode::Text(text.into()));
        element
    }

    fn from_start(start: &BytesStart<'_>) -> ExtverResult<Self> {
        let mut element = Self::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
        for attr in start.attributes() {
            let attr = attr.map_err(|e| ExtverError::Xml {
                message: format!("Malformed attribute on <{}>: {e}", element.name),
            })?;
            let value = attr.unescape_value().map_err(|e| ExtverError::Xml {
                message: format!("Malformed attribute value on <{}>: {e}", element.name),
            })?;
            element.attributes.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value.into_owned(),
            ));
        }
        let content: &[u8] = start;
        element.source = Some(SourceTag {
            name: element.name.clone(),
            attributes: element.attributes.clone(),
            content: String::from_utf8_lossy(content).into_owned(),
        });
        Ok(element)
    }

    fn start_tag(&self) -> BytesStart<'_> {
        match &self.source {
            Some(tag) if tag.name == self.name && tag.attributes == self.attributes => {
                BytesStart::from_content(tag.content.as_str(), self.name.len())
            }
            _ => {
                let mut start = BytesStart::new(self.name.as_str());
                for (k, v) in &self.attributes {
                    start.push_attribute((k.as_str(), v.as_str()));
                }
                start
            }
        }
    }

    /// Value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Child elements in document order.
    pub fn elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// Mutable child elements in document order.
    pub fn elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|node| match node {
            XmlNode::Element(e) => Some(e),
            _ => None,
        })
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// First child element with the given name, mutably.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut XmlElement> {
        self.elements_mut().find(|e| e.name == name)
    }

    /// All child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.elements().filter(move |e| e.name == name)
    }

    /// All child elements with the given name, mutably.
    pub fn children_named_mut<'a>(
        &'a mut self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a mut XmlElement> {
        self.elements_mut().filter(move |e| e.name == name)
    }

    /// Follow a chain of child names, e.g. `["build", "plugins"]`.
    pub fn find_path(&self, path: &[&str]) -> Option<&XmlElement> {
        path.iter().try_fold(self, |current, name| current.child(name))
    }

    /// Mutable variant of [`XmlElement::find_path`].
    pub fn find_path_mut(&mut self, path: &[&str]) -> Option<&mut XmlElement> {
        let mut current = self;
        for name in path {
            current = current.child_mut(name)?;
        }
        Some(current)
    }

    /// Whether the element contains nested elements (as opposed to a plain value).
    pub fn has_element_children(&self) -> bool {
        self.elements().next().is_some()
    }

    /// Concatenated text content, including CDATA sections, untrimmed.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in &self.children {
            match node {
                XmlNode::Text(t) => out.push_str(t),
                XmlNode::Verbatim(Event::CData(c)) => {
                    out.push_str(&String::from_utf8_lossy(c));
                }
                _ => {}
            }
        }
        out
    }

    /// Text content with surrounding whitespace removed.
    pub fn trimmed_text(&self) -> String {
        self.text().trim().to_string()
    }

    /// Trimmed text of the named child element.
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name).map(XmlElement::trimmed_text)
    }

    /// Replace all character data of this element with `value`.
    ///
    /// Leading and trailing whitespace of the original text is preserved so
    /// hand-formatted values keep their layout.
    pub fn set_text(&mut self, value: &str) {
        let original = self.text();
        let leading = &original[..original.len() - original.trim_start().len()];
        let trailing = &original[original.trim_end().len()..];
        let replacement = format!("{leading}{value}{trailing}");

        self.children.retain(|node| {
            !matches!(node, XmlNode::Text(_) | XmlNode::Verbatim(Event::CData(_)))
        });
        self.children.insert(0, XmlNode::Text(replacement));
        self.self_closing = false;
    }

    /// Insert `element` right after the first child named `after`, copying the
    /// indentation that precedes that sibling. Appends when `after` is absent.
    pub fn insert_after(&mut self, after: &str, element: XmlElement) {
        let position = self
            .children
            .iter()
            .position(|node| matches!(node, XmlNode::Element(e) if e.name == after));
        match position {
            Some(index) => {
                let indent = match index.checked_sub(1).map(|i| &self.children[i]) {
                    Some(XmlNode::Text(t)) if t.trim().is_empty() => Some(t.clone()),
                    _ => None,
                };
                let mut insert_at = index + 1;
                if let Some(indent) = indent {
                    self.children.insert(insert_at, XmlNode::Text(indent));
                    insert_at += 1;
                }
                self.children.insert(insert_at, XmlNode::Element(element));
            }
            None => self.children.push(XmlNode::Element(element)),
        }
        self.self_closing = false;
    }

    fn write_into<W: std::io::Write>(&self, writer: &mut Writer<W>) -> ExtverResult<()> {
        let start = self.start_tag();
        if self.self_closing && self.children.is_empty() {
            return write_event(writer, Event::Empty(start));
        }
        write_event(writer, Event::Start(start))?;
        for child in &self.children {
            child.write_into(writer)?;
        }
        write_event(writer, Event::End(BytesEnd::new(self.name.as_str())))
    }
}

impl XmlNode {
    fn write_into<W: std::io::Write>(&self, writer: &mut Writer<W>) -> ExtverResult<()> {
        match self {
            XmlNode::Element(e) => e.write_into(writer),
            XmlNode::Text(t) => {
                let escaped: Cow<'_, str> = partial_escape(t.as_str());
                write_event(writer, Event::Text(BytesText::from_escaped(escaped)))
            }
            XmlNode::Verbatim(event) => write_event(writer, event.clone()),
        }
    }
}

fn write_event<W: std::io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> ExtverResult<()> {
    writer.write_event(event).map_err(|e| {
        ExtverError::Xml {
            message: format!("Failed to serialize XML: {e}"),
        }
        .into()
    })
}

impl XmlDocument {
    /// Parse a document from a string.
    pub fn parse(xml: &str) -> ExtverResult<Self> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut prolog = Vec::new();
        let mut root: Option<XmlElement> = None;
        let mut epilog = Vec::new();

        loop {
            let node = match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    stack.push(XmlElement::from_start(e)?);
                    continue;
                }
                Ok(Event::End(_)) => {
                    let element = stack.pop().ok_or_else(|| ExtverError::Xml {
                        message: "Unbalanced closing tag".to_string(),
                    })?;
                    XmlNode::Element(element)
                }
                Ok(Event::Empty(ref e)) => {
                    let mut element = XmlElement::from_start(e)?;
                    element.self_closing = true;
                    XmlNode::Element(element)
                }
                Ok(Event::Text(ref e)) => {
                    let text = e.unescape().map_err(|err| ExtverError::Xml {
                        message: format!(
                            "Invalid character data at byte {}: {err}",
                            reader.buffer_position()
                        ),
                    })?;
                    XmlNode::Text(text.into_owned())
                }
                Ok(Event::Eof) => break,
                Ok(other) => XmlNode::Verbatim(other.into_owned()),
                Err(e) => {
                    return Err(ExtverError::Xml {
                        message: format!(
                            "Failed to parse XML at byte {}: {e}",
                            reader.buffer_position()
                        ),
                    }
                    .into());
                }
            };

            if let Some(parent) = stack.last_mut() {
                parent.children.push(node);
            } else if root.is_some() {
                epilog.push(node);
            } else if let XmlNode::Element(element) = node {
                root = Some(element);
            } else {
                prolog.push(node);
            }
        }

        if let Some(open) = stack.last() {
            return Err(ExtverError::Xml {
                message: format!("Unclosed element <{}>", open.name),
            }
            .into());
        }
        let root = root.ok_or_else(|| ExtverError::Xml {
            message: "Document has no root element".to_string(),
        })?;

        Ok(Self {
            prolog,
            root,
            epilog,
        })
    }

    /// Serialize the document back to a string.
    pub fn to_xml_string(&self) -> ExtverResult<String> {
        let mut writer = Writer::new(Vec::new());
        for node in &self.prolog {
            node.write_into(&mut writer)?;
        }
        self.root.write_into(&mut writer)?;
        for node in &self.epilog {
            node.write_into(&mut writer)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| {
            ExtverError::Xml {
                message: format!("Serialized XML is not UTF-8: {e}"),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POM: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- header comment -->
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <groupId>org.example</groupId>
    <artifactId>app</artifactId>
    <version>1.0-SNAPSHOT</version>
    <description><![CDATA[a & b]]></description>
    <packaging/>
</project>
"#;

    #[test]
    fn roundtrip_is_byte_identical() {
        let doc = XmlDocument::parse(POM).unwrap();
        assert_eq!(doc.to_xml_string().unwrap(), POM);
    }

    #[test]
    fn set_text_changes_only_that_node() {
        let mut doc = XmlDocument::parse(POM).unwrap();
        doc.root.child_mut("version").unwrap().set_text("2.0");
        let out = doc.to_xml_string().unwrap();
        assert_eq!(out, POM.replace("1.0-SNAPSHOT", "2.0"));
    }

    #[test]
    fn set_text_keeps_surrounding_whitespace() {
        let mut element = XmlElement::with_text("version", "\n  1.0\n");
        element.set_text("2.0");
        assert_eq!(element.text(), "\n  2.0\n");
    }

    #[test]
    fn cdata_counts_as_text() {
        let doc = XmlDocument::parse(POM).unwrap();
        assert_eq!(doc.root.child_text("description").as_deref(), Some("a & b"));
    }

    #[test]
    fn escaped_text_roundtrips() {
        let xml = "<a><b>x &amp; y &lt; z</b></a>";
        let doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.root.child_text("b").as_deref(), Some("x & y < z"));
        assert_eq!(doc.to_xml_string().unwrap(), xml);
    }

    #[test]
    fn self_closing_element_gets_expanded_when_written() {
        let mut doc = XmlDocument::parse(POM).unwrap();
        doc.root.child_mut("packaging").unwrap().set_text("jar");
        let out = doc.to_xml_string().unwrap();
        assert!(out.contains("<packaging>jar</packaging>"));
    }

    #[test]
    fn insert_after_copies_indentation() {
        let xml = "<project>\n    <groupId>g</groupId>\n    <artifactId>a</artifactId>\n</project>";
        let mut doc = XmlDocument::parse(xml).unwrap();
        doc.root
            .insert_after("artifactId", XmlElement::with_text("version", "1.0"));
        assert_eq!(
            doc.to_xml_string().unwrap(),
            "<project>\n    <groupId>g</groupId>\n    <artifactId>a</artifactId>\n    <version>1.0</version>\n</project>"
        );
    }

    #[test]
    fn multi_line_start_tag_roundtrips() {
        let xml = "<project xmlns=\"http://maven.apache.org/POM/4.0.0\"\n         \
                   xmlns:xsi='http://www.w3.org/2001/XMLSchema-instance'>\n    \
                   <version>1.0</version>\n    <packaging  kind='x' />\n</project>";
        let mut doc = XmlDocument::parse(xml).unwrap();
        assert_eq!(doc.to_xml_string().unwrap(), xml);

        doc.root.child_mut("version").unwrap().set_text("2.0");
        assert_eq!(doc.to_xml_string().unwrap(), xml.replace("1.0<", "2.0<"));
    }

    #[test]
    fn edited_attributes_rebuild_the_start_tag() {
        let mut doc = XmlDocument::parse("<c><strategy  hint='file'/></c>").unwrap();
        doc.root.child_mut("strategy").unwrap().attributes[0].1 = "script".to_string();
        assert_eq!(
            doc.to_xml_string().unwrap(),
            r#"<c><strategy hint="script"/></c>"#
        );
    }

    #[test]
    fn attributes_are_readable() {
        let doc = XmlDocument::parse(r#"<c><strategy hint="file"/></c>"#).unwrap();
        assert_eq!(
            doc.root.child("strategy").unwrap().attribute("hint"),
            Some("file")
        );
    }

    #[test]
    fn find_path_walks_children() {
        let doc =
            XmlDocument::parse("<p><build><plugins><plugin/></plugins></build></p>").unwrap();
        assert!(doc.root.find_path(&["build", "plugins", "plugin"]).is_some());
        assert!(doc.root.find_path(&["build", "missing"]).is_none());
    }

    #[test]
    fn unclosed_element_is_an_error() {
        assert!(XmlDocument::parse("<project><version>1.0</version>").is_err());
    }

    #[test]
    fn mismatched_end_tag_is_an_error() {
        assert!(XmlDocument::parse("<project><version>1.0</group></project>").is_err());
    }
}
