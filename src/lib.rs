//! blockxml: XML tree model, serializer, parser and map converter
//!
//! This crate provides functionality to:
//! - Build ordered element trees and navigate them by tag
//! - Serialize trees to compact or indented XML
//! - Parse XML text back into trees with structural validation
//! - Convert XML documents into plain, type-coerced values
//!
//! # Examples
//! ```
//! use blockxml::{parse_str, Result, XmlElement};
//!
//! fn example() -> Result<()> {
//!     let point = XmlElement::new("point");
//!     point.set_attribute("x", "3");
//!     point.set_attribute("y", "-4.5");
//!     let text = point.to_string();
//!     assert_eq!(text, r#"<point x="3" y="-4.5"/>"#);
//!     assert_eq!(parse_str(&text)?.to_string(), text);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

use tracing::{debug, info, instrument};

pub mod codec;
pub mod common;
pub mod converter;
pub mod element;
pub mod enums;
pub mod error;
pub mod formatter;
pub mod parser;
pub mod utils;
pub mod value;

// Re-exports
pub use codec::{escape, unescape};
pub use converter::Converter;
pub use element::XmlElement;
pub use error::{ParseError, ParseErrorKind, Result};
pub use parser::{Cursor, ParserConfig, XmlParser};
pub use value::Value;

pub use common::value_compare::values_equal;

/// Parse the first element of `text` into a new tree
pub fn parse_str(text: &str) -> Result<XmlElement> {
    XmlParser::new(text).parse()
}

#[instrument]
pub fn parse_file(path: &str) -> Result<XmlElement> {
    debug!("Starting to parse file: {}", path);
    let content = utils::read_file(path)?;
    info!("File read successfully, {} bytes", content.len());

    let result = utils::parse_xml(&content).map_err(|e| e.with_context(path));

    debug!("Parsing completed");
    result
}
