//! Error handling types for the XML tree, parser and converter
//!
//! Every structural parse failure is fatal to the call that raised it; the error
//! carries the kind, the line/column where the cursor stood, and optional context.

use std::fmt;
use thiserror::Error;

/// Main error type for tree and parsing operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The specific kind of error
    kind: ParseErrorKind,
    /// Location where the error occurred
    location: Option<Location>,
    /// Additional context for the error
    context: Option<String>,
}

/// Represents a location in the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Missing `=` or a missing/incorrect quote around an attribute value
    #[error("malformed attribute '{0}'")]
    MalformedAttribute(String),

    /// A tag does not terminate with `>` or `/>` where required
    #[error("malformed tag '{0}'")]
    MalformedTag(String),

    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedCloseTag { expected: String, found: String },

    /// Input ran out before the named element was closed
    #[error("unexpected end of input inside <{0}>")]
    UnexpectedEndOfInput(String),

    #[error("missing element <{0}>")]
    MissingElement(String),

    /// Attaching a node under itself or one of its descendants
    #[error("cannot attach <{0}> beneath itself")]
    CyclicAttachment(String),

    #[error("maximum nesting depth ({0}) exceeded")]
    MaxDepthExceeded(usize),

    #[error("maximum input size ({0} bytes) exceeded")]
    MaxSizeExceeded(usize),

    /// Converter input that is not a well-formed XML document
    #[error("document is not XML")]
    NotXml,

    #[error("io error: {0}")]
    Io(String),
}

impl ParseError {
    pub fn new(kind: ParseErrorKind) -> Self {
        Self {
            kind,
            location: None,
            context: None,
        }
    }

    pub fn with_location(mut self, line: usize, column: usize) -> Self {
        self.location = Some(Location { line, column });
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn kind(&self) -> &ParseErrorKind {
        &self.kind
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(loc) = &self.location {
            write!(f, " at line {}, column {}", loc.line, loc.column)?;
        }
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<ParseErrorKind> for ParseError {
    fn from(kind: ParseErrorKind) -> Self {
        Self::new(kind)
    }
}

pub type Result<T> = std::result::Result<T, ParseError>;
