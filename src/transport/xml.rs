//! Minimal XML tree used to build request bodies.

use std::io::{self, Write};
use std::string::FromUtf8Error;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

const XML_VERSION: &str = "1.0";
const ENCODING: &str = "utf-8";

#[derive(Debug, thiserror::Error)]
pub enum XmlWriteError {
    #[error("failed to write XML: {0}")]
    Io(#[from] io::Error),

    #[error("written XML is not UTF-8: {0}")]
    Utf8(#[from] FromUtf8Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Element with ordered attributes, optional text and child elements.
///
/// Mixed content is not supported: text is written before any children.
pub struct XmlElement {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Append a child element and return it for further building.
    pub fn add_element(&mut self, name: impl Into<String>) -> &mut XmlElement {
        self.children.push(XmlElement::new(name));
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Append a leaf child element holding `text`.
    pub fn add_text_element(
        &mut self,
        name: impl Into<String>,
        text: impl Into<String>,
    ) -> &mut Self {
        self.add_element(name).set_text(text);
        self
    }

    /// Append one `<name>value</name>` sibling per value, in order.
    pub fn add_repeated<I, S>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for value in values {
            self.add_text_element(name, value);
        }
        self
    }

    pub fn add_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.text = text.into();
        self
    }

    /// Serialize as a UTF-8 document with an XML declaration.
    pub fn to_document(&self) -> Result<String, XmlWriteError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new(XML_VERSION, Some(ENCODING), None)))?;
        writer.get_mut().push(b'\n');
        self.write_to(&mut writer)?;
        writer.get_mut().push(b'\n');
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Serialize this element alone.
    pub fn serialize(&self) -> Result<String, XmlWriteError> {
        let mut writer = Writer::new(Vec::new());
        self.write_to(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    fn write_to<W: Write>(&self, writer: &mut Writer<W>) -> io::Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (name, value) in &self.attributes {
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.text.is_empty() && self.children.is_empty() {
            return writer.write_event(Event::Empty(start));
        }

        writer.write_event(Event::Start(start))?;
        if !self.text.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&self.text)))?;
        }
        for child in &self.children {
            child.write_to(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Recursive key → value model serialized into nested elements.
pub enum XmlValue {
    /// Leaf element with text content.
    Text(String),
    /// Child element whose entries become nested elements.
    Map(Vec<(String, XmlValue)>),
    /// One sibling element per item, all sharing the entry's key.
    Repeated(Vec<String>),
}

impl XmlValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

/// Serialize `entries` as children of a new `root` element.
pub fn map_to_element(root: &str, entries: &[(String, XmlValue)]) -> XmlElement {
    let mut element = XmlElement::new(root);
    append_entries(&mut element, entries);
    element
}

fn append_entries(parent: &mut XmlElement, entries: &[(String, XmlValue)]) {
    for (key, value) in entries {
        match value {
            XmlValue::Text(text) => {
                parent.add_text_element(key.as_str(), text.as_str());
            }
            XmlValue::Map(nested) => append_entries(parent.add_element(key.as_str()), nested),
            XmlValue::Repeated(items) => {
                parent.add_repeated(key, items.iter().map(String::as_str));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_attributes_text_and_empty_elements() {
        let mut root = XmlElement::new("data");
        root.add_text_element("key", "k&1<");
        root.add_element("att")
            .add_attribute("nr", "1")
            .add_attribute("link", "a\"b.jpg");
        root.add_element("empty");

        assert_eq!(
            root.serialize().unwrap(),
            r#"<data><key>k&amp;1&lt;</key><att nr="1" link="a&quot;b.jpg"/><empty/></data>"#
        );
    }

    #[test]
    fn document_has_utf8_declaration() {
        let root = XmlElement::new("data");
        assert_eq!(
            root.to_document().unwrap(),
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<data/>\n"
        );
    }

    #[test]
    fn map_model_nests_and_repeats() {
        let entries = vec![
            ("key".to_owned(), XmlValue::text("k")),
            (
                "sms".to_owned(),
                XmlValue::Map(vec![
                    (
                        "to".to_owned(),
                        XmlValue::Repeated(vec!["111".to_owned(), "222".to_owned()]),
                    ),
                    ("msg".to_owned(), XmlValue::text("hi")),
                ]),
            ),
        ];
        let element = map_to_element("data", &entries);
        assert_eq!(
            element.serialize().unwrap(),
            "<data><key>k</key><sms><to>111</to><to>222</to><msg>hi</msg></sms></data>"
        );
    }

    #[test]
    fn empty_repeated_value_emits_nothing() {
        let entries = vec![("to".to_owned(), XmlValue::Repeated(Vec::new()))];
        assert_eq!(map_to_element("sms", &entries).serialize().unwrap(), "<sms/>");
    }

    #[test]
    fn polish_text_is_kept_verbatim() {
        let mut root = XmlElement::new("msg");
        root.set_text("Zażółć gęślą jaźń");
        assert_eq!(root.serialize().unwrap(), "<msg>Zażółć gęślą jaźń</msg>");
    }
}
