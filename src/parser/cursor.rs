//! Forward-only character cursor over XML source text

use regex::Regex;

use crate::error::Location;

/// Cursor for reading text one character (or one run) at a time.
///
/// `pos` is a byte offset that always sits on a character boundary and never
/// passes the end of the input.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn remaining(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    /// Consume and return the current character
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// Consume up to `count` characters and return them as a slice
    pub fn next_n(&mut self, count: usize) -> &'a str {
        let start = self.pos;
        self.skip(count);
        self.input.get(start..self.pos).unwrap_or_default()
    }

    pub fn peek(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Advance by `count` characters, stopping at the end of input
    pub fn skip(&mut self, count: usize) {
        let rest = self.remaining();
        let advance = rest
            .char_indices()
            .nth(count)
            .map_or(rest.len(), |(offset, _)| offset);
        self.pos += advance;
    }

    pub fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Return the text before the next occurrence of `literal` and move onto it.
    /// Returns `""` without moving when `literal` does not occur.
    pub fn up_to(&mut self, literal: &str) -> &'a str {
        match self.remaining().find(literal) {
            Some(offset) => self.take(offset),
            None => "",
        }
    }

    pub fn peek_up_to(&self, literal: &str) -> &'a str {
        let rest = self.remaining();
        rest.find(literal)
            .and_then(|offset| rest.get(..offset))
            .unwrap_or_default()
    }

    /// Like [`Cursor::up_to`], stopping at the first match of `pattern`
    pub fn up_to_pattern(&mut self, pattern: &Regex) -> &'a str {
        match pattern.find(self.remaining()) {
            Some(found) => self.take(found.start()),
            None => "",
        }
    }

    pub fn peek_up_to_pattern(&self, pattern: &Regex) -> &'a str {
        let rest = self.remaining();
        pattern
            .find(rest)
            .and_then(|found| rest.get(..found.start()))
            .unwrap_or_default()
    }

    /// Consume everything left
    pub fn rest(&mut self) -> &'a str {
        let len = self.remaining().len();
        self.take(len)
    }

    pub fn skip_space(&mut self) {
        let rest = self.remaining();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    /// Consume a run of characters that are not whitespace, `>`, `/` or `=`
    pub fn word(&mut self) -> &'a str {
        let rest = self.remaining();
        let end = rest
            .find(|c: char| c.is_whitespace() || matches!(c, '>' | '/' | '='))
            .unwrap_or(rest.len());
        self.take(end)
    }

    /// Byte offset into the source
    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// 1-based line and column of the current position
    pub fn location(&self) -> Location {
        let consumed = self.input.get(..self.pos).unwrap_or_default();
        let line = consumed.matches('\n').count() + 1;
        let column = consumed
            .rsplit('\n')
            .next()
            .map_or(0, |last| last.chars().count())
            + 1;
        Location { line, column }
    }

    fn take(&mut self, len: usize) -> &'a str {
        let start = self.pos;
        self.pos = (self.pos + len).min(self.input.len());
        self.input.get(start..self.pos).unwrap_or_default()
    }
}
