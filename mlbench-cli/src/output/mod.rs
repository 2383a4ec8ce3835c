//! Output formatting module

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and output one named value
    fn format_entry(&mut self, name: &str, value: f64) -> Result<()>;

    /// Finalize output (e.g., close a JSON object)
    fn finish(&mut self) -> Result<()>;
}

pub mod json;
pub mod markdown;
pub mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `name: value` line per entry
    Text,
    /// JSON object of name to value
    Json,
    /// Markdown table
    Markdown,
}

/// Open the destination: a file if given, otherwise stdout
pub fn open_writer(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            Ok(Box::new(io::BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout())),
    }
}

/// Build the formatter for `format`
pub fn formatter_for<'a>(
    format: OutputFormat,
    writer: Box<dyn Write + 'a>,
) -> Box<dyn OutputFormatter + 'a> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(writer)),
        OutputFormat::Json => Box::new(JsonFormatter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(writer)),
    }
}

/// Write every entry through `formatter` and finish it
pub fn write_entries<'e, I>(formatter: &mut dyn OutputFormatter, entries: I) -> Result<()>
where
    I: IntoIterator<Item = (&'e String, &'e f64)>,
{
    for (name, value) in entries {
        formatter.format_entry(name, *value)?;
    }
    formatter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn render(format: OutputFormat, entries: &BTreeMap<String, f64>) -> String {
        let mut buffer = Vec::new();
        {
            let mut formatter = formatter_for(format, Box::new(&mut buffer));
            write_entries(formatter.as_mut(), entries).unwrap();
        }
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_all_formats_render_entries() {
        let mut entries = BTreeMap::new();
        entries.insert("ACC".to_string(), 0.5);
        entries.insert("runtime".to_string(), 1.25);

        let text = render(OutputFormat::Text, &entries);
        assert_eq!(text, "ACC: 0.5\nruntime: 1.25\n");

        let json = render(OutputFormat::Json, &entries);
        let parsed: BTreeMap<String, f64> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, entries);

        let markdown = render(OutputFormat::Markdown, &entries);
        assert!(markdown.contains("| ACC | 0.5 |"));
        assert!(markdown.contains("*Total entries: 2*"));
    }
}
