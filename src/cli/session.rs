use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::backend::export;
use crate::backend::formatting::render_table;
use crate::backend::grid::ParsedGrid;
use crate::backend::record::Field;
use crate::backend::settings::Settings;

pub const HELP: &str = "\
Paste lines as username:password:email:password, then:
  /parse              parse the pasted lines
  /show               print the parsed table
  /copy ROW FIELD     print one field (ROW starts at 1)
  /csv                print all entries as CSV
  /save [PATH]        write all entries to a CSV file
  /clear              drop the pasted lines and parsed entries
  /quit               leave the session";

/// Reads pasted lines and `/` commands until `/quit` or end of input.
///
/// Data goes to `out`, notices to `notices`. A failing command is reported as a
/// notice and the session keeps going.
pub fn run_session(
    input: impl BufRead,
    settings: &Settings,
    out: &mut impl Write,
    notices: &mut impl Write,
) -> Result<()> {
    let mut grid = ParsedGrid::new();
    writeln!(notices, "{}", HELP)?;

    for line in input.lines() {
        let line = line.context("Failed to read session input")?;
        let trimmed = line.trim();

        let Some(command) = trimmed.strip_prefix('/') else {
            grid.push_line(&line);
            continue;
        };
        let mut words = command.split_whitespace();
        let name = words.next().unwrap_or_default();
        if name == "quit" {
            break;
        }

        let args: Vec<&str> = words.collect();
        if let Err(e) = apply(name, &args, &mut grid, settings, out, notices) {
            writeln!(notices, "Error: {}", e)?;
        }
    }

    out.flush()?;
    Ok(())
}

fn apply(
    name: &str,
    args: &[&str],
    grid: &mut ParsedGrid,
    settings: &Settings,
    out: &mut impl Write,
    notices: &mut impl Write,
) -> Result<()> {
    match name {
        "parse" => {
            let outcome = grid.parse();
            writeln!(notices, "{}", outcome.message())?;
            if !outcome.is_failure() {
                write!(out, "{}", render_table(grid.records()))?;
            }
        }
        "show" => {
            write!(out, "{}", render_table(grid.records()))?;
            writeln!(notices, "{}", grid.summary())?;
        }
        "copy" => {
            let [row, field] = args else {
                anyhow::bail!("Usage: /copy ROW FIELD");
            };
            let row: usize = row.parse().with_context(|| format!("Invalid row '{}'", row))?;
            let field: Field = field.parse()?;
            writeln!(out, "{}", super::lookup_cell(grid, row, field)?)?;
            writeln!(notices, "{}", field.copied_notice())?;
        }
        "csv" => {
            require_records(grid)?;
            writeln!(out, "{}", grid.to_csv(settings.csv_style())?)?;
            writeln!(notices, "All data copied as CSV format.")?;
        }
        "save" => {
            require_records(grid)?;
            let path = args
                .first()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(&settings.default_output));
            export::export_file(&path, &grid.to_csv(settings.csv_style())?)?;
            writeln!(notices, "Data downloaded to {}", path.display())?;
        }
        "clear" => writeln!(notices, "{}", grid.clear())?,
        "help" => writeln!(notices, "{}", HELP)?,
        other => anyhow::bail!("Unknown command '/{}'. Type /help for the list.", other),
    }
    Ok(())
}

fn require_records(grid: &ParsedGrid) -> Result<()> {
    if grid.is_empty() {
        anyhow::bail!(grid.summary());
    }
    Ok(())
}
