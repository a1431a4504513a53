//! A small element tree read with [`quick_xml::Reader`].
//!
//! Character data is kept exactly as sent, leading and trailing whitespace
//! included. The document must open with the expected root element.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{DeError, Reader};

use crate::error::CasdmError;

/// One element with its attributes, character data and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Value of the attribute `name`, or `""` when absent.
    pub fn attribute(&self, name: &str) -> &str {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .unwrap_or_default()
    }

    /// First child element called `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Character data of the first child called `name`, or `""` when absent.
    pub fn child_text(&self, name: &str) -> &str {
        self.child(name)
            .map(|child| child.text.as_str())
            .unwrap_or_default()
    }

    /// Every child element called `name`, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }
}

/// Reads `xml` into a tree whose root must be `<root>`.
pub(crate) fn parse_document(xml: &str, root: &str) -> Result<Element, CasdmError> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<Element> = Vec::new();

    loop {
        match reader.read_event().map_err(DeError::from)? {
            Event::Start(start) => {
                let element = start_element(&start, open.is_empty(), root)?;
                open.push(element);
            }
            Event::Empty(start) => {
                let element = start_element(&start, open.is_empty(), root)?;
                if let Some(done) = attach(&mut open, element) {
                    return Ok(done);
                }
            }
            Event::End(_) => {
                let element = open
                    .pop()
                    .ok_or_else(|| malformed("unexpected closing tag"))?;
                if let Some(done) = attach(&mut open, element) {
                    return Ok(done);
                }
            }
            Event::Text(text) => {
                if let Some(current) = open.last_mut() {
                    current.text.push_str(&text.unescape().map_err(DeError::from)?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = open.last_mut() {
                    current.text.push_str(&data.decode().map_err(DeError::from)?);
                }
            }
            Event::Eof => {
                return Err(match open.first() {
                    Some(element) => malformed(format!("<{}> is never closed", element.name)),
                    None => malformed(format!("missing <{root}> element")),
                });
            }
            _ => {}
        }
    }
}

fn start_element(start: &BytesStart<'_>, is_root: bool, root: &str) -> Result<Element, CasdmError> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    if is_root && name != root {
        return Err(malformed(format!("expected <{root}>, found <{name}>")));
    }

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(DeError::from)?;
        let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(DeError::from)?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        ..Element::default()
    })
}

/// Appends `element` to its parent, or hands it back when it is the root.
fn attach(open: &mut [Element], element: Element) -> Option<Element> {
    match open.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            None
        }
        None => Some(element),
    }
}

fn malformed(message: impl Into<String>) -> CasdmError {
    CasdmError::Xml(DeError::Custom(message.into()))
}
