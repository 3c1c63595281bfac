//! # XML Projection
//!
//! Projects an XML document onto a [`serde_json::Value`] tree so that XML
//! and JSON carrier responses share one representation.
//!
//! The projection is lossy but deterministic:
//!
//! - the root element becomes the tree root; its own name is not a key
//! - child elements become mapping keys, namespace prefixes stripped
//! - repeated sibling elements collapse into a sequence, in document order
//! - attributes go under an `@attributes` mapping
//! - an element with only text becomes a string; with nothing, null
//! - text next to attributes or children goes under `#text`
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use shipquote::infrastructure::providers::xml::to_value;
//!
//! let tree = to_value("<Rates><Rate><Code>03</Code></Rate><Rate><Code>01</Code></Rate></Rates>").unwrap();
//! assert_eq!(tree, json!({"Rate": [{"Code": "03"}, {"Code": "01"}]}));
//! ```

use crate::infrastructure::providers::error::{ProviderError, ProviderResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

/// Key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "@attributes";
/// Key holding text of an element that also has attributes or children.
pub const TEXT_KEY: &str = "#text";

#[derive(Debug, Default)]
struct Frame {
    name: String,
    attributes: Map<String, Value>,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> ProviderResult<Self> {
        let mut attributes = Map::new();
        for attribute in start.attributes() {
            let attribute = attribute
                .map_err(|e| ProviderError::malformed_response(format!("invalid xml attribute: {}", e)))?;
            if attribute.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let key = String::from_utf8_lossy(attribute.key.local_name().as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| ProviderError::malformed_response(format!("invalid xml attribute value: {}", e)))?;
            attributes.insert(key, Value::String(value.into_owned()));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            ..Self::default()
        })
    }

    fn close(self) -> (String, Value) {
        let Self {
            name,
            attributes,
            mut children,
            text,
        } = self;

        if attributes.is_empty() && children.is_empty() {
            let value = if text.is_empty() {
                Value::Null
            } else {
                Value::String(text)
            };
            return (name, value);
        }

        if !attributes.is_empty() {
            children.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
        }
        if !text.is_empty() {
            children.insert(TEXT_KEY.to_string(), Value::String(text));
        }
        (name, Value::Object(children))
    }
}

fn insert_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

fn finish(stack: &mut [Frame], root: &mut Option<Value>, frame: Frame) -> ProviderResult<()> {
    let (name, value) = frame.close();
    match stack.last_mut() {
        Some(parent) => insert_child(&mut parent.children, name, value),
        None if root.is_some() => {
            return Err(ProviderError::malformed_response("xml document has more than one root"));
        }
        None => *root = Some(value),
    }
    Ok(())
}

/// Parses an XML document into a value tree.
///
/// # Errors
///
/// Returns `ProviderError::MalformedResponse` if the document is not
/// well-formed or has no root element.
pub fn to_value(xml: &str) -> ProviderResult<Value> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                return Err(ProviderError::malformed_response(format!(
                    "invalid xml at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        };

        match event {
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                finish(&mut stack, &mut root, frame)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| ProviderError::malformed_response("unexpected closing tag"))?;
                finish(&mut stack, &mut root, frame)?;
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| ProviderError::malformed_response(format!("invalid xml text: {}", e)))?;
                    frame.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(ProviderError::malformed_response(format!(
            "unclosed xml element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| ProviderError::malformed_response("xml document has no root element"))
}
