//! JSON output formatter

use super::OutputFormatter;
use anyhow::Result;
use std::collections::BTreeMap;
use std::io::Write;

/// JSON formatter - outputs all entries as one object
pub struct JsonFormatter<W: Write> {
    writer: W,
    entries: BTreeMap<String, f64>,
}

impl<W: Write> JsonFormatter<W> {
    /// Create a new JSON formatter
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            entries: BTreeMap::new(),
        }
    }
}

impl<W: Write> OutputFormatter for JsonFormatter<W> {
    fn format_entry(&mut self, name: &str, value: f64) -> Result<()> {
        self.entries.insert(name.to_string(), value);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, &self.entries)?;
        writeln!(self.writer)?;
        self.writer.flush()?;
        Ok(())
    }
}
