pub mod session;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::backend::export::{self, CsvStyle};
use crate::backend::formatting::render_table;
use crate::backend::grid::ParsedGrid;
use crate::backend::record::Field;
use crate::backend::settings::Settings;

/// Split username:password:email:password lines into columns and export them as CSV
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse the input and print it as a table
    Parse {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Parse the input and export it
    Export {
        #[command(flatten)]
        input: InputArgs,
        /// Output file (defaults to the configured file name)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Write to stdout instead of a file
        #[arg(long, conflicts_with = "output")]
        stdout: bool,
        /// Escape embedded quotes (RFC 4180)
        #[arg(long)]
        strict: bool,
        #[arg(long, value_enum, default_value_t = Format::Csv)]
        format: Format,
    },
    /// Print a single field of one parsed entry
    Cell {
        #[command(flatten)]
        input: InputArgs,
        /// Entry number, starting at 1
        #[arg(short, long)]
        row: usize,
        /// username, password, email or password2
        #[arg(long)]
        field: Field,
    },
    /// Paste lines interactively and parse, copy, save or clear them
    Session,
    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    Show,
    Reset,
    SetOutput { path: String },
    SetStrict {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Read input lines from a file
    #[arg(short, long, conflicts_with = "text")]
    pub file: Option<PathBuf>,
    /// Use the given text as input
    #[arg(short, long)]
    pub text: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Csv,
    Json,
}

impl InputArgs {
    /// Input text from `--text`, `--file`, or stdin, without a leading byte order mark.
    pub fn read(&self) -> Result<String> {
        let text = if let Some(text) = &self.text {
            text.clone()
        } else if let Some(path) = &self.file {
            std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read input file: {:?}", path))?
        } else {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        };

        Ok(strip_bom(text))
    }
}

fn strip_bom(text: String) -> String {
    match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    }
}

fn load_grid(input: &InputArgs) -> Result<ParsedGrid> {
    let mut grid = ParsedGrid::from_input(input.read()?);
    let outcome = grid.parse();
    if outcome.is_failure() {
        bail!(outcome.message());
    }
    Ok(grid)
}

/// Value of `field` in entry `row`, counting entries from 1.
fn lookup_cell(grid: &ParsedGrid, row: usize, field: Field) -> Result<&str> {
    row.checked_sub(1)
        .and_then(|index| grid.cell(index, field))
        .with_context(|| format!("Row {} out of range (1..={})", row, grid.len()))
}

pub fn run(cli: Cli) -> Result<()> {
    let config_path = Settings::config_path();
    let mut settings = config_path
        .as_deref()
        .map(Settings::load_from)
        .unwrap_or_default();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut notices = std::io::stderr();

    if let Command::Session = cli.command {
        let stdin = std::io::stdin();
        return session::run_session(stdin.lock(), &settings, &mut out, &mut notices);
    }

    execute(
        cli.command,
        &mut settings,
        config_path.as_deref(),
        &mut out,
        &mut notices,
    )
}

/// Runs one non-interactive command. Data goes to `out`, notices to `notices`.
pub fn execute(
    command: Command,
    settings: &mut Settings,
    config_path: Option<&Path>,
    out: &mut impl Write,
    notices: &mut impl Write,
) -> Result<()> {
    match command {
        Command::Parse { input } => {
            let grid = load_grid(&input)?;
            write!(out, "{}", render_table(grid.records()))?;
            if settings.show_summary {
                writeln!(notices, "{}", grid.summary())?;
            }
        }
        Command::Export {
            input,
            output,
            stdout,
            strict,
            format,
        } => {
            let grid = load_grid(&input)?;
            let style = if strict {
                CsvStyle::Strict
            } else {
                settings.csv_style()
            };
            let contents = match format {
                Format::Csv => grid.to_csv(style)?,
                Format::Json => export::to_json(grid.records())?,
            };

            if stdout {
                write!(out, "{}", contents)?;
            } else {
                let path = output.unwrap_or_else(|| PathBuf::from(&settings.default_output));
                export::export_file(&path, &contents)?;
                writeln!(notices, "Data downloaded to {}", path.display())?;
            }
        }
        Command::Cell { input, row, field } => {
            let grid = load_grid(&input)?;
            writeln!(out, "{}", lookup_cell(&grid, row, field)?)?;
            writeln!(notices, "{}", field.copied_notice())?;
        }
        Command::Session => bail!("The session command reads from stdin and cannot run here"),
        Command::Config { action } => {
            let path = config_path.context("No config directory available");
            match action {
                ConfigAction::Show => writeln!(out, "{}", settings.to_json()?)?,
                ConfigAction::Reset => {
                    Settings::reset_at(path?)?;
                    *settings = Settings::default();
                    writeln!(notices, "Settings reset to defaults")?;
                }
                ConfigAction::SetOutput { path: output } => {
                    settings.default_output = output;
                    settings.save_to(path?)?;
                }
                ConfigAction::SetStrict { enabled } => {
                    settings.strict_csv = enabled;
                    settings.save_to(path?)?;
                }
            }
        }
    }

    out.flush()?;
    Ok(())
}
