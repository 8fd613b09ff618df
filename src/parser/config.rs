use crate::error::{ParseError, ParseErrorKind, Result};

/// Maximum element nesting (512); block scripts nest deeply but never this far
pub const DEFAULT_MAX_DEPTH: usize = 512;
/// Maximum input size (32MB); project files embed costumes and sounds as base64
pub const DEFAULT_MAX_SIZE: usize = 32 * 1024 * 1024;

/// Configuration for parser limits
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Maximum nesting depth of elements
    pub max_depth: usize,
    /// Maximum input size in bytes
    pub max_size: usize,
}

/// Tracks nesting depth during parsing
#[derive(Debug, Default)]
pub struct ParsingContext {
    current_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl ParserConfig {
    pub fn validate_size(&self, input: &str) -> Result<()> {
        if input.len() > self.max_size {
            return Err(ParseError::new(ParseErrorKind::MaxSizeExceeded(
                self.max_size,
            )));
        }
        Ok(())
    }
}

impl ParsingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_nested(&mut self, config: &ParserConfig) -> Result<()> {
        self.current_depth += 1;
        if self.current_depth > config.max_depth {
            return Err(ParseError::new(ParseErrorKind::MaxDepthExceeded(
                config.max_depth,
            )));
        }
        Ok(())
    }

    pub fn exit_nested(&mut self) {
        self.current_depth = self.current_depth.saturating_sub(1);
    }

    pub fn depth(&self) -> usize {
        self.current_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_tracking() {
        let config = ParserConfig {
            max_depth: 2,
            ..ParserConfig::default()
        };
        let mut ctx = ParsingContext::new();
        assert!(ctx.enter_nested(&config).is_ok());
        assert!(ctx.enter_nested(&config).is_ok());
        assert!(ctx.enter_nested(&config).is_err());
        ctx.exit_nested();
        ctx.exit_nested();
        assert_eq!(ctx.depth(), 1);
    }

    #[test]
    fn test_size_limit() {
        let config = ParserConfig {
            max_size: 4,
            ..ParserConfig::default()
        };
        assert!(config.validate_size("<a/>").is_ok());
        assert!(matches!(
            config.validate_size("<ab/>").map_err(|e| e.kind().clone()),
            Err(ParseErrorKind::MaxSizeExceeded(4))
        ));
    }
}
