//! Host DOM used by the map converter
//!
//! The converter only needs a DOM-like view: node names, element/text
//! discrimination, attributes and child nodes. [`QuickXmlHost`] builds such a
//! DOM with `quick-xml`; any other XML backend can implement the same traits.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::warn;

use crate::parser::config::DEFAULT_MAX_DEPTH;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

/// A node of a parsed host document
pub trait DomNode: Sized {
    fn node_name(&self) -> &str;
    fn node_kind(&self) -> NodeKind;
    fn attributes(&self) -> Vec<(&str, &str)>;
    fn child_nodes(&self) -> &[Self];
    /// Text of a text node; `None` for elements
    fn node_value(&self) -> Option<&str>;
}

/// Parses text into a host document and returns its document element
pub trait DomParser {
    type Node: DomNode;

    fn parse_document(&self, text: &str) -> Option<Self::Node>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct HostNode {
    name: String,
    kind: NodeKind,
    attributes: Vec<(String, String)>,
    children: Vec<HostNode>,
    value: Option<String>,
}

impl HostNode {
    pub fn element(name: impl Into<String>, attributes: Vec<(String, String)>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Element,
            attributes,
            children: Vec::new(),
            value: None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            name: "#text".to_string(),
            kind: NodeKind::Text,
            attributes: Vec::new(),
            children: Vec::new(),
            value: Some(value.into()),
        }
    }

    pub fn push(&mut self, child: Self) {
        self.children.push(child);
    }
}

impl DomNode for HostNode {
    fn node_name(&self) -> &str {
        &self.name
    }

    fn node_kind(&self) -> NodeKind {
        self.kind
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    fn child_nodes(&self) -> &[Self] {
        &self.children
    }

    fn node_value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

/// Default host backed by `quick-xml`
#[derive(Debug, Clone, Copy, Default)]
pub struct QuickXmlHost;

impl DomParser for QuickXmlHost {
    type Node = HostNode;

    fn parse_document(&self, text: &str) -> Option<HostNode> {
        let mut reader = Reader::from_str(text);
        let mut stack: Vec<HostNode> = Vec::new();
        let mut root = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    warn!(
                        "host parser rejected input at byte {}: {}",
                        reader.buffer_position(),
                        e
                    );
                    return None;
                }
            };
            match event {
                Event::Start(start) => {
                    if stack.len() >= DEFAULT_MAX_DEPTH {
                        warn!("host parser exceeded nesting depth {}", DEFAULT_MAX_DEPTH);
                        return None;
                    }
                    stack.push(element_from(&start)?);
                }
                Event::Empty(start) => attach(&mut stack, &mut root, element_from(&start)?)?,
                Event::End(_) => {
                    let node = stack.pop()?;
                    attach(&mut stack, &mut root, node)?;
                }
                Event::Text(t) => {
                    let value = t.unescape().ok()?;
                    if let Some(parent) = stack.last_mut() {
                        parent.push(HostNode::text(value));
                    }
                }
                Event::CData(c) => {
                    let value = String::from_utf8(c.into_inner().into_owned()).ok()?;
                    if let Some(parent) = stack.last_mut() {
                        parent.push(HostNode::text(value));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            warn!("host parser hit end of input with {} open elements", stack.len());
            return None;
        }
        root
    }
}

fn element_from(start: &BytesStart<'_>) -> Option<HostNode> {
    let name = std::str::from_utf8(start.name().as_ref()).ok()?.to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.ok()?;
        let key = std::str::from_utf8(attr.key.as_ref()).ok()?.to_string();
        let value = attr.unescape_value().ok()?.into_owned();
        attributes.push((key, value));
    }
    Some(HostNode::element(name, attributes))
}

/// Append `node` to the open element, or make it the document element.
/// A second top-level element is rejected.
fn attach(stack: &mut [HostNode], root: &mut Option<HostNode>, node: HostNode) -> Option<()> {
    match stack.last_mut() {
        Some(parent) => parent.push(node),
        None if root.is_none() => *root = Some(node),
        None => {
            warn!("host parser found a second top-level element <{}>", node.name);
            return None;
        }
    }
    Some(())
}
