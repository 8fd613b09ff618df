use crate::{
    converter::Converter,
    element::XmlElement,
    enums::OutputFormat,
    error::{ParseError, ParseErrorKind, Result},
    formatter::{FormatConfig, Formatter, JsonFormatter},
    parser::XmlParser,
    value::Value,
};
use std::fs;

pub fn read_file(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        ParseError::new(ParseErrorKind::Io(e.to_string()))
            .with_context(format!("Cannot read file: {}", path))
    })
}

pub fn write_file(path: &str, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| {
        ParseError::new(ParseErrorKind::Io(e.to_string()))
            .with_context(format!("Cannot write to file: {}", path))
    })
}

pub fn parse_xml(content: &str) -> Result<XmlElement> {
    XmlParser::new(content).parse()
}

pub fn convert_xml(content: &str) -> Result<Value> {
    Converter::new()
        .parse(content)
        .ok_or_else(|| ParseError::new(ParseErrorKind::NotXml))
}

pub fn format_json(value: &Value) -> String {
    JsonFormatter.format(value, &FormatConfig::default())
}

/// Render `content` the way the command-line tool prints it
pub fn render(content: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Xml => Ok(parse_xml(content)?.to_xml_string(false)),
        OutputFormat::Pretty => Ok(parse_xml(content)?.to_xml_string(true)),
        OutputFormat::Json => Ok(format_json(&convert_xml(content)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_modes() -> Result<()> {
        let input = "<a k='1'><b/></a>";
        assert_eq!(render(input, OutputFormat::Xml)?, r#"<a k="1"><b/></a>"#);
        assert_eq!(
            render(input, OutputFormat::Pretty)?,
            "<a k=\"1\">\n  <b/>\n</a>"
        );
        assert_eq!(
            render(input, OutputFormat::Json)?,
            "{\n  \"k\": 1,\n  \"b\": {}\n}"
        );
        Ok(())
    }

    #[test]
    fn test_render_rejects_html() {
        let err = render("<html/>", OutputFormat::Json).err();
        assert_eq!(err.map(|e| e.kind().clone()), Some(ParseErrorKind::NotXml));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_file("definitely/not/here.xml").err();
        assert!(matches!(
            err.as_ref().map(ParseError::kind),
            Some(ParseErrorKind::Io(_))
        ));
    }
}
