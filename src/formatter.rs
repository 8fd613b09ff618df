mod json;
pub mod xml;

pub use self::{json::JsonFormatter, xml::XmlFormatter};
use crate::value::Value;

/// Configuration options for rendering converted values
#[derive(Debug, Clone)]
pub struct FormatConfig {
    /// Number of spaces for indentation
    pub indent_spaces: usize,
    /// Whether to sort object keys
    pub sort_keys: bool,
}

/// Keys stay in document order unless asked otherwise
impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_spaces: 2,
            sort_keys: false,
        }
    }
}

/// Trait for formatting a Value as a string
pub trait Formatter {
    fn format(&self, value: &Value, config: &FormatConfig) -> String;
}

/// Shared helpers for value formatters
pub trait CommonFormatter {
    /// Creates indentation strings
    fn create_indentation(indent: usize, config: &FormatConfig) -> (String, String) {
        let indent_str = " ".repeat(indent * config.indent_spaces);
        let inner_indent = " ".repeat((indent + 1) * config.indent_spaces);
        (indent_str, inner_indent)
    }

    /// Sorts entries if configured
    fn sort_entries<'a>(
        entries: Vec<(&'a String, &'a Value)>,
        config: &FormatConfig,
    ) -> Vec<(&'a String, &'a Value)> {
        let mut entries = entries;
        if config.sort_keys {
            entries.sort_by_key(|(k, _)| *k);
        }
        entries
    }
}

pub mod helpers {
    pub fn format_empty_array() -> String {
        "[]".to_string()
    }

    pub fn format_empty_object() -> String {
        "{}".to_string()
    }

    pub fn join_with_commas(items: Vec<String>) -> String {
        items.join(",\n")
    }
}
