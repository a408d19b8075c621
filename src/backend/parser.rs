use super::record::Record;

/// Separator between the fields of one input line.
pub const DELIMITER: char = ':';

pub struct LineParser;

impl LineParser {
    /// Parses newline-separated `username:password:email:password` text.
    ///
    /// Never fails. Short lines are padded with empty fields and anything past
    /// the fourth part is dropped. Whitespace-only input gives no records.
    pub fn parse(text: &str) -> Vec<Record> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        text.split('\n').filter_map(Self::parse_line).collect()
    }

    /// Splits a single line into a record. `None` only if the split yields no
    /// parts at all.
    pub fn parse_line(line: &str) -> Option<Record> {
        let mut parts = line.split(DELIMITER).map(str::trim);

        let username = parts.next()?;
        let mut next = || parts.next().unwrap_or_default().to_string();

        Some(Record {
            username: username.to_string(),
            secondary1: next(),
            email: next(),
            secondary2: next(),
        })
    }
}
