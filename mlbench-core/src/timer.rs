//! Timer block scraping
//!
//! Tools report per-phase timings in free text. Three layouts are known;
//! the layout is picked by sniffing the text, then a dialect-specific
//! extractor pulls `<name>: <value>s` pairs out of matching lines. This is
//! best effort: lines that do not fit are skipped and an empty report
//! means "no timing data", never an error.

use serde::Serialize;
use std::collections::BTreeMap;

/// Web domain printed by the tool that uses the `INFO` line dialect
pub const INFO_DIALECT_MARKER: &str = "www.mathworks.com";

/// Tool name that selects the weka dialect
pub const WEKA_DIALECT_MARKER: &str = "weka";

/// Header line that opens a program timer block
pub const PROGRAM_TIMERS_MARKER: &str = "Program timers:";

/// Token identifying lines of the `INFO` dialect
const INFO_TOKEN: &str = "INFO";

/// Unit suffix of a timing value
const SECONDS_SUFFIX: char = 's';

/// Timer block layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// Every line containing `INFO` ends in a `<name>: <value>` pair
    InfoLines,
    /// Pairs follow the first line mentioning weka
    Weka,
    /// Pairs follow a `Program timers:` header
    ProgramTimers,
    /// No known marker
    Unknown,
}

impl Dialect {
    /// Classify captured text.
    ///
    /// Markers are checked in a fixed order: the vendor domain first, then
    /// the weka token, then the program timer header.
    pub fn detect(text: &str) -> Self {
        if text.contains(INFO_DIALECT_MARKER) {
            Self::InfoLines
        } else if text.contains(WEKA_DIALECT_MARKER) {
            Self::Weka
        } else if text.contains(PROGRAM_TIMERS_MARKER) {
            Self::ProgramTimers
        } else {
            Self::Unknown
        }
    }

    /// Extract timers from `text` under this dialect
    pub fn extract(self, text: &str) -> TimerReport {
        let mut report = TimerReport::empty(self);
        match self {
            Self::InfoLines => {
                for line in text.lines().filter(|line| line.contains(INFO_TOKEN)) {
                    report.record(trailing_pair(line));
                }
            }
            Self::Weka => report.scan_after(text, WEKA_DIALECT_MARKER),
            Self::ProgramTimers => report.scan_after(text, PROGRAM_TIMERS_MARKER),
            Self::Unknown => {}
        }
        report
    }
}

/// Phase timings scraped from one run's output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimerReport {
    /// The dialect the text was read as
    pub dialect: Dialect,
    /// Phase name to elapsed seconds
    pub timers: BTreeMap<String, f64>,
    /// Candidate lines that could not be read as a pair
    pub skipped_lines: usize,
}

impl TimerReport {
    fn empty(dialect: Dialect) -> Self {
        Self {
            dialect,
            timers: BTreeMap::new(),
            skipped_lines: 0,
        }
    }

    /// Detect the dialect of raw output bytes and extract its timers
    pub fn parse(output: &[u8]) -> Self {
        Self::parse_text(&String::from_utf8_lossy(output))
    }

    /// Same as [`TimerReport::parse`] for already decoded text
    pub fn parse_text(text: &str) -> Self {
        Dialect::detect(text).extract(text)
    }

    /// True when no timer was found
    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    /// Seconds recorded for a phase
    pub fn get(&self, phase: &str) -> Option<f64> {
        self.timers.get(phase).copied()
    }

    /// `total` minus every phase in `subtract` that was recorded.
    ///
    /// `None` if `total` itself is missing.
    pub fn runtime(&self, total: &str, subtract: &[&str]) -> Option<f64> {
        let total = self.get(total)?;
        let deducted: f64 = subtract.iter().filter_map(|phase| self.get(phase)).sum();
        Some(total - deducted)
    }

    fn record(&mut self, pair: Option<(String, f64)>) {
        match pair {
            Some((name, seconds)) => {
                self.timers.insert(name, seconds);
            }
            None => self.skipped_lines += 1,
        }
    }

    /// Read pairs from lines ending in the seconds suffix after `marker`
    fn scan_after(&mut self, text: &str, marker: &str) {
        let mut started = false;
        for line in text.lines() {
            if line.contains(marker) {
                started = true;
                continue;
            }
            if started && line.trim_end().ends_with(SECONDS_SUFFIX) {
                self.record(trailing_pair(line));
            }
        }
    }
}

/// Split `... <name>: <value><unit>` into its name and value.
///
/// The name loses a trailing colon, the value loses its unit character and
/// may use a decimal comma.
fn trailing_pair(line: &str) -> Option<(String, f64)> {
    let mut tokens = line.split_whitespace().rev();
    let value = tokens.next()?;
    let name = tokens.next()?;

    let name = name.strip_suffix(':').unwrap_or(name);
    if name.is_empty() {
        return None;
    }

    let mut chars = value.chars();
    chars.next_back()?;
    let seconds: f64 = chars.as_str().replace(',', ".").parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    Some((name.to_string(), seconds))
}
