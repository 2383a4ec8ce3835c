//! Markdown output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::io::Write;

/// Markdown formatter - outputs entries as a two-column table
pub struct MarkdownFormatter<W: Write> {
    writer: W,
    entry_count: usize,
}

impl<W: Write> MarkdownFormatter<W> {
    /// Create a new markdown formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entry_count: 0,
        }
    }
}

impl<W: Write> OutputFormatter for MarkdownFormatter<W> {
    fn format_entry(&mut self, name: &str, value: f64) -> Result<()> {
        if self.entry_count == 0 {
            writeln!(self.writer, "| Metric | Value |")?;
            writeln!(self.writer, "|--------|-------|")?;
        }
        self.entry_count += 1;
        writeln!(self.writer, "| {name} | {value} |")?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        writeln!(self.writer)?;
        writeln!(self.writer, "---")?;
        writeln!(self.writer, "*Total entries: {}*", self.entry_count)?;
        self.writer.flush()?;
        Ok(())
    }
}
