//! XML to plain-value conversion
//!
//! A looser, JSON-like view of a document: attributes and text are
//! type-coerced, repeated children collapse into arrays. Works on a host DOM,
//! not on [`crate::XmlElement`] trees.

mod coerce;
pub mod host;

use tracing::{debug, warn};

pub use self::coerce::{parse_value, NumericClassifier, StrictNumeric};
pub use self::host::{DomNode, DomParser, HostNode, NodeKind, QuickXmlHost};
use crate::value::{Map, Value};

/// Key holding an element's text when it also has attributes or children
pub const TEXT_KEY: &str = "text";

pub struct Converter<P = QuickXmlHost, C = StrictNumeric> {
    host: P,
    classifier: C,
}

impl Default for Converter {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter {
    pub fn new() -> Self {
        Self::with_host(QuickXmlHost, StrictNumeric)
    }
}

impl<P, C> Converter<P, C>
where
    P: DomParser,
    C: NumericClassifier,
{
    pub fn with_host(host: P, classifier: C) -> Self {
        Self { host, classifier }
    }

    /// Convert XML text. Returns `None` when the host cannot parse it or the
    /// document is HTML.
    pub fn parse(&self, xml: &str) -> Option<Value> {
        let Some(root) = self.host.parse_document(xml) else {
            warn!("converter input is not well-formed XML");
            return None;
        };
        self.parse_document(&root)
    }

    /// Convert an already parsed document element
    pub fn parse_document(&self, root: &P::Node) -> Option<Value> {
        if root.node_name().eq_ignore_ascii_case("html") {
            warn!("converter input is an HTML document");
            return None;
        }
        let value = self.parse_node(root);
        debug!("converted <{}>", root.node_name());
        Some(value)
    }

    fn parse_node(&self, node: &P::Node) -> Value {
        let mut map = Map::new();
        for (key, value) in node.attributes() {
            map.insert(key.to_string(), self.coerce(value));
        }

        let (elements, texts): (Vec<&P::Node>, Vec<&P::Node>) = node
            .child_nodes()
            .iter()
            .partition(|child| child.node_kind() == NodeKind::Element);

        if let ([], [text]) = (elements.as_slice(), texts.as_slice()) {
            let value = self.coerce(text.node_value().unwrap_or_default());
            if map.is_empty() {
                return value;
            }
            map.insert(TEXT_KEY.to_string(), value);
            return Value::Map(map);
        }

        for child in elements {
            let value = self.parse_node(child);
            merge_child(&mut map, child.node_name(), value);
        }

        let text: String = texts.iter().filter_map(|t| t.node_value()).collect();
        if !text.trim().is_empty() {
            map.insert(TEXT_KEY.to_string(), self.coerce(&text));
        }

        Value::Map(map)
    }

    fn coerce(&self, raw: &str) -> Value {
        parse_value(Some(raw), &self.classifier)
    }
}

/// Insert `value` under `name`; a second value under the same name turns the
/// entry into an array
fn merge_child(map: &mut Map, name: &str, value: Value) {
    match map.get_mut(name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = std::mem::replace(existing, Value::Array(Vec::new()));
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name.to_string(), value);
        }
    }
}
