//! # Probe Output Parser
//!
//! Turns the probe tool's console-style output into [`ProbeRecord`]s, one per
//! line. Each line goes through a fixed sequence of small steps (see [`line`]);
//! a line that fails a step is logged and dropped without affecting the rest.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use subrefine_common::models::ProbeRecord;
use subrefine_common::{RefineError, Result};
use tracing::warn;

pub mod ansi;
pub mod line;

pub use line::{LineOutcome, Unmatched, parse_line};

use crate::lines;

/// Records of one artifact plus how many lines were lost.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParseSummary {
    pub records: Vec<ProbeRecord>,
    /// Non-blank lines seen.
    pub lines: usize,
    pub dropped: usize,
}

impl ParseSummary {
    fn push(&mut self, number: usize, outcome: LineOutcome) {
        match outcome {
            LineOutcome::Blank => {}
            LineOutcome::Record(record) => {
                self.lines += 1;
                self.records.push(record);
            }
            LineOutcome::Unmatched(reason) => {
                self.lines += 1;
                self.dropped += 1;
                let err = RefineError::ParseFailure {
                    line: number,
                    reason: reason.to_string(),
                };
                warn!("Dropping probe output {err}");
            }
        }
    }
}

/// Parses in-memory output, keeping input order.
pub fn parse(raw_text: &str) -> Vec<ProbeRecord> {
    let mut summary = ParseSummary::default();
    for (idx, raw) in raw_text.lines().enumerate() {
        summary.push(idx + 1, parse_line(raw));
    }
    summary.records
}

/// Parses a stream line by line.
pub fn parse_reader<R: BufRead>(reader: R) -> std::io::Result<ParseSummary> {
    let mut summary = ParseSummary::default();
    for (idx, raw) in lines::lossy_lines(reader).enumerate() {
        summary.push(idx + 1, parse_line(&raw?));
    }
    Ok(summary)
}

pub fn parse_file(path: &Path) -> Result<ParseSummary> {
    let file = File::open(path).map_err(|e| RefineError::io(path, e))?;
    parse_reader(BufReader::new(file)).map_err(|e| RefineError::io(path, e))
}
