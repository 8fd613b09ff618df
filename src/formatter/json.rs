use super::{helpers, CommonFormatter, FormatConfig, Formatter};
use crate::value::{Map, Value};

pub struct JsonFormatter;

impl CommonFormatter for JsonFormatter {}

impl Formatter for JsonFormatter {
    fn format(&self, value: &Value, config: &FormatConfig) -> String {
        Self::format_value(value, 0, config)
    }
}

impl JsonFormatter {
    fn format_value(value: &Value, indent: usize, config: &FormatConfig) -> String {
        match value {
            Value::Array(arr) => Self::format_array(arr, indent, config),
            Value::Map(map) => Self::format_map(map, indent, config),
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) if n.is_finite() => n.to_string(),
            Value::Number(_) => "null".to_string(),
            Value::String(s) => format!("\"{}\"", escape_json(s)),
        }
    }

    fn format_array(arr: &[Value], indent: usize, config: &FormatConfig) -> String {
        if arr.is_empty() {
            return helpers::format_empty_array();
        }

        let (indent_str, inner_indent) = Self::create_indentation(indent, config);
        let items: Vec<String> = arr
            .iter()
            .map(|v| {
                format!(
                    "{}{}",
                    inner_indent,
                    Self::format_value(v, indent + 1, config)
                )
            })
            .collect();

        format!("[\n{}\n{}]", helpers::join_with_commas(items), indent_str)
    }

    fn format_map(map: &Map, indent: usize, config: &FormatConfig) -> String {
        if map.is_empty() {
            return helpers::format_empty_object();
        }

        let (indent_str, inner_indent) = Self::create_indentation(indent, config);
        let entries = Self::sort_entries(map.iter().collect(), config);

        let items: Vec<String> = entries
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}\"{}\": {}",
                    inner_indent,
                    escape_json(k),
                    Self::format_value(v, indent + 1, config)
                )
            })
            .collect();

        format!("{{\n{}\n{}}}", helpers::join_with_commas(items), indent_str)
    }
}

fn escape_json(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", u32::from(c))),
            c => out.push(c),
        }
    }
    out
}
