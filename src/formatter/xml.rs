//! XML serializer for element trees
//!
//! Output is byte-for-byte stable: attributes in insertion order, always
//! double-quoted, empty attribute values dropped, `<tag/>` for elements with no
//! contents and no children, and two spaces per level when formatted.

use crate::codec::escape;
use crate::element::XmlElement;

/// Indentation unit for formatted output
pub const INDENTATION: &str = "  ";

pub struct XmlFormatter;

impl XmlFormatter {
    pub fn serialize(element: &XmlElement, formatted: bool) -> String {
        let mut output = String::new();
        Self::write_element(element, formatted, 0, &mut output);
        output
    }

    /// Append `element` serialized at indentation `level` to `output`
    pub fn write_element(element: &XmlElement, formatted: bool, level: usize, output: &mut String) {
        let mut steps = vec![Step::Open(element.clone(), level)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Open(node, depth) => {
                    if formatted && depth > level {
                        output.push('\n');
                    }
                    if let Some(close) = Self::write_open(&node, formatted, depth, output) {
                        steps.push(close);
                        let data = node.read();
                        for child in data.children.iter().rev() {
                            steps.push(Step::Open(child.clone(), depth + 1));
                        }
                    }
                }
                Step::Close { tag, depth, nested } => {
                    if formatted && nested {
                        output.push('\n');
                        Self::indent(formatted, depth, output);
                    }
                    output.push_str("</");
                    output.push_str(&tag);
                    output.push('>');
                }
            }
        }
    }

    /// Write the opening tag and contents. Returns the pending close step, or
    /// `None` when the element was written self-closing.
    fn write_open(node: &XmlElement, formatted: bool, depth: usize, output: &mut String) -> Option<Step> {
        let data = node.read();
        Self::indent(formatted, depth, output);
        output.push('<');
        output.push_str(&data.tag);

        for (key, value) in data.attributes.iter().filter(|(_, v)| !v.is_empty()) {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape(value, false));
            output.push('"');
        }

        if data.contents.is_empty() && data.children.is_empty() {
            output.push_str("/>");
            return None;
        }

        output.push('>');
        output.push_str(&escape(&data.contents, false));
        Some(Step::Close {
            tag: data.tag.clone(),
            depth,
            nested: !data.children.is_empty(),
        })
    }

    fn indent(formatted: bool, depth: usize, output: &mut String) {
        if formatted {
            for _ in 0..depth {
                output.push_str(INDENTATION);
            }
        }
    }
}

/// Pending work for the serializer's explicit stack
enum Step {
    Open(XmlElement, usize),
    Close { tag: String, depth: usize, nested: bool },
}
