use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::path::Path;

use super::record::{Field, Record};

/// File name used when no output path is given.
pub const DEFAULT_FILE_NAME: &str = "parsed_data.csv";

#[derive(PartialEq, Clone, Copy, Debug, Default)]
pub enum CsvStyle {
    /// Every field wrapped in quotes, nothing escaped.
    #[default]
    Loose,
    /// RFC 4180 quoting with embedded quotes doubled.
    Strict,
}

pub struct CsvSerializer;

impl CsvSerializer {
    pub fn header() -> String {
        quoted_row(Field::all().iter().map(|f| f.csv_label()))
    }

    /// Header line, then one line per record.
    ///
    /// Values are not escaped: a field holding `"` or `,` gives a row that
    /// strict CSV readers reject. Use [`CsvSerializer::serialize_strict`] for
    /// that case.
    pub fn serialize(records: &[Record]) -> String {
        let rows = records
            .iter()
            .map(|record| quoted_row(record.fields()))
            .collect::<Vec<_>>()
            .join("\n");

        format!("{}\n{}", Self::header(), rows)
    }

    pub fn serialize_strict(records: &[Record]) -> Result<String> {
        let mut buf = Vec::new();
        {
            let mut writer = WriterBuilder::new()
                .quote_style(QuoteStyle::Always)
                .terminator(Terminator::Any(b'\n'))
                .from_writer(&mut buf);

            writer.write_record(Field::all().iter().map(|f| f.csv_label()))?;
            for record in records {
                writer.write_record(record.fields())?;
            }
            writer.flush().context("Failed to flush CSV writer")?;
        }

        let mut output = String::from_utf8(buf).context("CSV output is not valid UTF-8")?;
        // Same line layout as the loose form: no newline after the last row.
        if !records.is_empty() {
            output.pop();
        }
        Ok(output)
    }

    pub fn render(records: &[Record], style: CsvStyle) -> Result<String> {
        match style {
            CsvStyle::Loose => Ok(Self::serialize(records)),
            CsvStyle::Strict => Self::serialize_strict(records),
        }
    }
}

fn quoted_row<'a>(cells: impl IntoIterator<Item = &'a str>) -> String {
    cells
        .into_iter()
        .map(|cell| format!("\"{}\"", cell))
        .collect::<Vec<_>>()
        .join(",")
}

/// Array of objects keyed by the CSV header labels.
pub fn to_json(records: &[Record]) -> Result<String> {
    serde_json::to_string_pretty(records).context("Failed to serialize records as JSON")
}

pub fn export_file(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write export file: {:?}", path))?;
    tracing::debug!(path = ?path, bytes = contents.len(), "export written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::parser::LineParser;
    use tempfile::tempdir;

    const HEADER: &str = "\"Username\",\"Password\",\"Email\",\"Password2\"";

    #[test]
    fn test_serialize_rows() {
        let records = vec![Record::new("a", "b", "c", "d"), Record::new("e", "", "", "")];
        assert_eq!(
            CsvSerializer::serialize(&records),
            format!("{HEADER}\n\"a\",\"b\",\"c\",\"d\"\n\"e\",\"\",\"\",\"\"")
        );
    }

    #[test]
    fn test_serialize_empty_is_header_only() {
        let csv = CsvSerializer::serialize(&[]);
        assert_eq!(csv, format!("{HEADER}\n"));
        assert_eq!(csv.lines().collect::<Vec<_>>(), vec![HEADER]);
    }

    #[test]
    fn test_serialize_row_count_matches_parse() {
        let text = "a:b:c:d\ne\n f : g \n\nh:i:j:k:l";
        let records = LineParser::parse(text);
        let csv = CsvSerializer::serialize(&records);

        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(HEADER));
        assert_eq!(lines.count(), records.len());
    }

    #[test]
    fn test_serialize_is_deterministic() {
        let records = LineParser::parse("a:b:c:d\ne:f:g:h");
        assert_eq!(
            CsvSerializer::serialize(&records),
            CsvSerializer::serialize(&records)
        );
    }

    #[test]
    fn test_serialize_does_not_escape() {
        let records = vec![Record::new("a\"b", "c,d", "", "")];
        assert!(CsvSerializer::serialize(&records).ends_with("\"a\"b\",\"c,d\",\"\",\"\""));
    }

    #[test]
    fn test_serialize_strict_escapes_quotes() -> Result<()> {
        let records = vec![Record::new("a\"b", "c,d", "e", "f")];
        let csv = CsvSerializer::serialize_strict(&records)?;
        assert_eq!(
            csv,
            format!("{HEADER}\n\"a\"\"b\",\"c,d\",\"e\",\"f\"")
        );
        Ok(())
    }

    #[test]
    fn test_serialize_strict_matches_loose_for_plain_values() -> Result<()> {
        let records = LineParser::parse("john123:pass123:john@email.com:backup456");
        assert_eq!(
            CsvSerializer::render(&records, CsvStyle::Strict)?,
            CsvSerializer::render(&records, CsvStyle::Loose)?
        );
        assert_eq!(
            CsvSerializer::serialize_strict(&[])?,
            CsvSerializer::serialize(&[])
        );
        Ok(())
    }

    #[test]
    fn test_to_json() -> Result<()> {
        let records = vec![Record::new("a", "b", "c", "d")];
        let value: serde_json::Value = serde_json::from_str(&to_json(&records)?)?;
        assert_eq!(value[0]["Username"], "a");
        assert_eq!(value[0]["Password"], "b");
        assert_eq!(value[0]["Email"], "c");
        assert_eq!(value[0]["Password2"], "d");
        assert_eq!(to_json(&[])?, "[]");
        Ok(())
    }

    #[test]
    fn test_to_json_keeps_column_order() -> Result<()> {
        let json = to_json(&[Record::new("a", "b", "c", "d")])?;
        let positions: Vec<usize> = ["\"Username\"", "\"Password\"", "\"Email\"", "\"Password2\""]
            .iter()
            .map(|key| json.find(key).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        Ok(())
    }

    #[test]
    fn test_export_file() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join(DEFAULT_FILE_NAME);
        let csv = CsvSerializer::serialize(&[Record::new("a", "b", "c", "d")]);

        export_file(&path, &csv)?;
        assert_eq!(std::fs::read_to_string(&path)?, csv);
        Ok(())
    }

    #[test]
    fn test_export_file_missing_dir_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        assert!(export_file(&path, "x").is_err());
    }
}
