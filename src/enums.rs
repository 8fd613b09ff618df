use clap::ValueEnum;

/// What the command-line tool prints for a parsed document
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Compact XML re-serialization
    #[default]
    Xml,
    /// XML indented two spaces per level
    Pretty,
    /// Converter output rendered as JSON
    Json,
}
