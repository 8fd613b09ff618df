//! Recursive-descent XML parser
//!
//! Single pass over the input: the cursor only moves forward, each opening tag
//! produces one [`XmlElement`], and parsing stops at the root's closing tag.

pub mod config;
pub mod cursor;

use tracing::debug;

use self::config::ParsingContext;
pub use self::{config::ParserConfig, cursor::Cursor};
use crate::codec::unescape;
use crate::element::{XmlElement, DEFAULT_TAG};
use crate::error::{ParseError, ParseErrorKind, Result};

pub struct XmlParser<'a> {
    input: &'a str,
    cursor: Cursor<'a>,
    config: ParserConfig,
    context: ParsingContext,
}

impl<'a> XmlParser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::with_config(input, ParserConfig::default())
    }

    pub fn with_config(input: &'a str, config: ParserConfig) -> Self {
        Self {
            input,
            cursor: Cursor::new(input),
            config,
            context: ParsingContext::new(),
        }
    }

    /// Parse the first element of the input into a new root node
    pub fn parse(&mut self) -> Result<XmlElement> {
        let root = XmlElement::default();
        self.parse_into(&root)?;
        Ok(root)
    }

    /// Parse the first element of the input into `node`
    pub fn parse_into(&mut self, node: &XmlElement) -> Result<()> {
        self.config.validate_size(self.input)?;

        self.cursor.up_to("<");
        if self.cursor.next() != Some('<') {
            return Err(self.error_here(ParseErrorKind::UnexpectedEndOfInput(node.tag())));
        }
        self.parse_stream(node)?;

        debug!(
            "parsed <{}> with {} children, {} of {} bytes consumed",
            node.tag(),
            node.child_count(),
            self.cursor.pos(),
            self.input.len()
        );
        Ok(())
    }

    /// Parse one element whose `<` has already been consumed
    fn parse_stream(&mut self, node: &XmlElement) -> Result<()> {
        if let Err(err) = self.context.enter_nested(&self.config) {
            return Err(self.locate(err));
        }

        let tag = self.cursor.word();
        if tag.is_empty() {
            return Err(self.error_here(ParseErrorKind::MalformedTag(tag.to_string())));
        }
        node.set_tag(tag);
        self.cursor.skip_space();

        self.parse_attributes(node, tag)?;

        if self.cursor.peek() == Some('/') {
            self.cursor.skip(1);
            if self.cursor.next() != Some('>') {
                return Err(self.error_here(ParseErrorKind::MalformedTag(tag.to_string())));
            }
            self.context.exit_nested();
            return Ok(());
        }

        if self.cursor.next() != Some('>') {
            return Err(self.error_here(ParseErrorKind::MalformedTag(tag.to_string())));
        }

        let mut raw = String::new();
        loop {
            raw.push_str(self.cursor.up_to("<"));
            if self.cursor.peek() != Some('<') {
                self.cursor.rest();
                return Err(self.error_here(ParseErrorKind::UnexpectedEndOfInput(tag.to_string())));
            }
            self.cursor.skip(1);

            if self.cursor.peek() != Some('/') {
                let child = XmlElement::new_child(node, DEFAULT_TAG, "");
                self.parse_stream(&child)?;
                continue;
            }

            self.cursor.skip(1);
            let closing = self.cursor.word();
            if closing != tag {
                return Err(self.error_here(ParseErrorKind::MismatchedCloseTag {
                    expected: tag.to_string(),
                    found: closing.to_string(),
                }));
            }
            self.cursor.up_to(">");
            if self.cursor.next() != Some('>') {
                self.cursor.rest();
                return Err(self.error_here(ParseErrorKind::UnexpectedEndOfInput(tag.to_string())));
            }
            node.set_contents(unescape(&raw));
            self.context.exit_nested();
            return Ok(());
        }
    }

    fn parse_attributes(&mut self, node: &XmlElement, tag: &str) -> Result<()> {
        loop {
            match self.cursor.peek() {
                Some('>' | '/') => return Ok(()),
                None => {
                    return Err(
                        self.error_here(ParseErrorKind::UnexpectedEndOfInput(tag.to_string()))
                    );
                }
                Some(_) => {}
            }

            let key = self.cursor.word();
            self.cursor.skip_space();
            if key.is_empty() || self.cursor.next() != Some('=') {
                return Err(self.error_here(ParseErrorKind::MalformedAttribute(key.to_string())));
            }
            self.cursor.skip_space();

            let quote = match self.cursor.next() {
                Some(quote @ ('"' | '\'')) => quote,
                _ => {
                    return Err(
                        self.error_here(ParseErrorKind::MalformedAttribute(key.to_string()))
                    );
                }
            };
            let mut delimiter = [0; 4];
            let value = self.cursor.up_to(quote.encode_utf8(&mut delimiter));
            if self.cursor.next() != Some(quote) {
                return Err(self.error_here(ParseErrorKind::MalformedAttribute(key.to_string())));
            }
            self.cursor.skip_space();

            node.set_attribute(key, unescape(value));
        }
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        self.locate(ParseError::new(kind))
    }

    fn locate(&self, err: ParseError) -> ParseError {
        let loc = self.cursor.location();
        err.with_location(loc.line, loc.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Result<XmlElement> {
        XmlParser::new(input).parse()
    }

    fn kind_of(input: &str) -> Option<ParseErrorKind> {
        parse(input).err().map(|e| e.kind().clone())
    }

    #[test]
    fn test_parse_point() -> Result<()> {
        let node = parse(r#"<point x="3" y="-4.5"/>"#)?;
        assert_eq!(node.tag(), "point");
        assert_eq!(node.attribute("x").as_deref(), Some("3"));
        assert_eq!(node.attribute("y").as_deref(), Some("-4.5"));
        assert_eq!(node.child_count(), 0);
        assert_eq!(node.contents(), "");
        Ok(())
    }

    #[test]
    fn test_parse_nested_with_contents() -> Result<()> {
        let node = parse("<a>one<b>inner</b>two<c/></a>")?;
        assert_eq!(node.contents(), "onetwo");
        let tags: Vec<String> = node.children().iter().map(XmlElement::tag).collect();
        assert_eq!(tags, ["b", "c"]);
        assert_eq!(node.child_named("b").map(|b| b.contents()).as_deref(), Some("inner"));
        assert!(node
            .child_named("c")
            .and_then(|c| c.parent())
            .is_some_and(|p| p.ptr_eq(&node)));
        Ok(())
    }

    #[test]
    fn test_single_quotes_and_spacing() -> Result<()> {
        let node = parse("<a  k = 'it&apos;s'  j=\"say &quot;hi&quot;\" >x</a >")?;
        assert_eq!(node.attribute("k").as_deref(), Some("it's"));
        assert_eq!(node.attribute("j").as_deref(), Some("say \"hi\""));
        assert_eq!(node.contents(), "x");
        Ok(())
    }

    #[test]
    fn test_duplicate_attribute_overwrites() -> Result<()> {
        let node = parse(r#"<a k="1" k="2"/>"#)?;
        assert_eq!(node.attribute("k").as_deref(), Some("2"));
        assert_eq!(node.attributes().len(), 1);
        Ok(())
    }

    #[test]
    fn test_leading_text_is_skipped() -> Result<()> {
        let node = parse("garbage before <root/> after")?;
        assert_eq!(node.tag(), "root");
        Ok(())
    }

    #[test]
    fn test_contents_unescaped() -> Result<()> {
        let node = parse("<a>1 &lt; 2 &amp;&#xD;~&#126;</a>")?;
        assert_eq!(node.contents(), "1 < 2 &\n~~");
        Ok(())
    }

    #[test]
    fn test_missing_equals() {
        assert_eq!(
            kind_of("<a b c></a>"),
            Some(ParseErrorKind::MalformedAttribute("b".to_string()))
        );
    }

    #[test]
    fn test_missing_quote() {
        assert_eq!(
            kind_of("<a b=c></a>"),
            Some(ParseErrorKind::MalformedAttribute("b".to_string()))
        );
        assert_eq!(
            kind_of("<a b=\"unterminated></a>"),
            Some(ParseErrorKind::MalformedAttribute("b".to_string()))
        );
    }

    #[test]
    fn test_mismatched_close() {
        assert_eq!(
            kind_of("<a></b>"),
            Some(ParseErrorKind::MismatchedCloseTag {
                expected: "a".to_string(),
                found: "b".to_string(),
            })
        );
    }

    #[test]
    fn test_unexpected_end() {
        assert_eq!(
            kind_of("<a>"),
            Some(ParseErrorKind::UnexpectedEndOfInput("a".to_string()))
        );
        assert_eq!(
            kind_of("<a><b></b>"),
            Some(ParseErrorKind::UnexpectedEndOfInput("a".to_string()))
        );
        assert_eq!(
            kind_of("no markup"),
            Some(ParseErrorKind::UnexpectedEndOfInput("unnamed".to_string()))
        );
        assert_eq!(
            kind_of("<a x='1'"),
            Some(ParseErrorKind::UnexpectedEndOfInput("a".to_string()))
        );
    }

    #[test]
    fn test_malformed_tag() {
        assert_eq!(
            kind_of("<a/ >"),
            Some(ParseErrorKind::MalformedTag("a".to_string()))
        );
        assert_eq!(
            kind_of("<>"),
            Some(ParseErrorKind::MalformedTag(String::new()))
        );
    }

    #[test]
    fn test_error_location() {
        let err = parse("<a>\n  <b></c>\n</a>").err();
        let loc = err.as_ref().and_then(|e| e.location()).copied();
        assert_eq!(loc.map(|l| l.line), Some(2));
    }

    #[test]
    fn test_depth_limit() {
        let config = ParserConfig {
            max_depth: 3,
            ..ParserConfig::default()
        };
        let ok = XmlParser::with_config("<a><b><c/></b></a>", config.clone()).parse();
        assert!(ok.is_ok());
        let deep = XmlParser::with_config("<a><b><c><d/></c></b></a>", config).parse();
        assert_eq!(
            deep.err().map(|e| e.kind().clone()),
            Some(ParseErrorKind::MaxDepthExceeded(3))
        );
    }

    #[test]
    fn test_parse_into_existing_node() -> Result<()> {
        let node = XmlElement::default();
        node.parse_string("<scene name='stage'><sprite/></scene>")?;
        assert_eq!(node.tag(), "scene");
        assert_eq!(node.attribute("name").as_deref(), Some("stage"));
        assert_eq!(node.child_count(), 1);
        Ok(())
    }
}
