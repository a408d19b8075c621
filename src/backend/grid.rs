use anyhow::Result;

use super::export::{CsvSerializer, CsvStyle};
use super::parser::LineParser;
use super::record::{Field, Record};

/// Result of [`ParsedGrid::parse`], mapped to a user-facing notice by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Input was empty or whitespace only. Records are left untouched.
    EmptyInput,
    /// Parsing ran but produced nothing. Non-blank input always yields a
    /// record, so this is kept only for callers that match on every notice.
    NoEntries,
    Parsed(usize),
}

impl ParseOutcome {
    pub fn message(&self) -> String {
        match self {
            ParseOutcome::EmptyInput => "Please enter some text to parse.".to_string(),
            ParseOutcome::NoEntries => {
                "No valid entries found. Expected format: username:password:email:password"
                    .to_string()
            }
            ParseOutcome::Parsed(n) => format!("Parsed {} entries successfully.", n),
        }
    }

    pub fn is_failure(&self) -> bool {
        !matches!(self, ParseOutcome::Parsed(_))
    }
}

pub const CLEARED_MESSAGE: &str = "All data has been cleared.";

/// The current input text and the records last parsed from it.
#[derive(Clone, Debug, Default)]
pub struct ParsedGrid {
    input: String,
    records: Vec<Record>,
}

impl ParsedGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_input(text: impl Into<String>) -> Self {
        Self {
            input: text.into(),
            records: Vec::new(),
        }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Replaces the records with a fresh parse of the current input.
    pub fn parse(&mut self) -> ParseOutcome {
        if self.input.trim().is_empty() {
            return ParseOutcome::EmptyInput;
        }

        self.records = LineParser::parse(&self.input);
        tracing::debug!(
            lines = self.input.trim().lines().count(),
            records = self.records.len(),
            "input parsed"
        );

        if self.records.is_empty() {
            ParseOutcome::NoEntries
        } else {
            ParseOutcome::Parsed(self.records.len())
        }
    }

    /// Appends one line to the input text.
    pub fn push_line(&mut self, line: &str) {
        self.input.push_str(line);
        self.input.push('\n');
    }

    /// Drops the input and the records, returning the notice to show.
    pub fn clear(&mut self) -> &'static str {
        self.input.clear();
        self.records.clear();
        CLEARED_MESSAGE
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn summary(&self) -> String {
        if self.records.is_empty() {
            "No data parsed yet".to_string()
        } else {
            format!("{} entries parsed successfully", self.records.len())
        }
    }

    pub fn cell(&self, row: usize, field: Field) -> Option<&str> {
        self.records.get(row).map(|r| r.get(field))
    }

    pub fn to_csv(&self, style: CsvStyle) -> Result<String> {
        CsvSerializer::render(&self.records, style)
    }
}
