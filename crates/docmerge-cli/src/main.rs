use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use docmerge::docx::{PlaceholderPattern, PlaceholderRule};
use docmerge::sheet::{ColumnSelection, HeaderScan, DEFAULT_FIELD_COUNT};
use docmerge::{merge, CollisionPolicy, JobStatus, MergeOptions, MergeReport, DEFAULT_OUTPUT_DIR};

/// Fill a Word template once per spreadsheet row.
///
/// Every run of four or more underscores in the template is a placeholder.
/// Placeholders are filled in order (body paragraphs first, then tables)
/// with the row's fields; each document is named after the first field.
#[derive(Parser, Debug)]
#[command(name = "docmerge", version, about)]
struct Cli {
    /// Path to the Excel (.xlsx) file
    spreadsheet: PathBuf,

    /// Path to the Word (.docx) template
    template: PathBuf,

    /// Number of parallel workers (default: available CPUs)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    workers: Option<u32>,

    /// Directory generated documents are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,

    /// Worksheet to read (default: the first sheet)
    #[arg(long)]
    sheet: Option<String>,

    /// Header names to fill from, in placeholder order (comma separated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    columns: Vec<String>,

    /// Look for the header row anywhere in the sheet, not just row 1
    #[arg(long, requires = "columns")]
    scan_headers: bool,

    /// Number of leading columns to fill from when --columns is not given
    #[arg(
        long,
        default_value_t = DEFAULT_FIELD_COUNT as u32,
        value_parser = clap::value_parser!(u32).range(1..),
        conflicts_with = "columns"
    )]
    fields: u32,

    /// How runs of underscores are split into placeholders
    #[arg(long, value_enum, default_value_t = RuleArg::Greedy)]
    placeholder_rule: RuleArg,

    /// Underscores needed to form a placeholder
    #[arg(long, default_value_t = 4, value_parser = clap::value_parser!(u32).range(1..))]
    min_underscores: u32,

    /// What to do when two rows produce the same file name
    #[arg(long, value_enum, default_value_t = CollisionArg::Suffix)]
    on_collision: CollisionArg,

    /// Print the run report as JSON
    #[arg(long)]
    json: bool,

    /// More log output (-v debug, -vv trace); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum RuleArg {
    /// A whole run of underscores is one placeholder
    Greedy,
    /// Every --min-underscores underscores are one placeholder
    Exact,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum CollisionArg {
    /// Append -2, -3, ... to repeated names
    Suffix,
    /// Let later rows replace earlier documents
    Overwrite,
}

impl Cli {
    fn merge_options(&self) -> Result<MergeOptions> {
        let rule = match self.placeholder_rule {
            RuleArg::Greedy => PlaceholderRule::Greedy,
            RuleArg::Exact => PlaceholderRule::Exact,
        };
        let pattern = PlaceholderPattern::new(
            PlaceholderPattern::DEFAULT_FILLER,
            self.min_underscores as usize,
            rule,
        )?;
        let columns = if self.columns.is_empty() {
            ColumnSelection::Positional {
                count: self.fields as usize,
            }
        } else {
            ColumnSelection::Headers {
                names: self.columns.clone(),
                scan: if self.scan_headers {
                    HeaderScan::Forward
                } else {
                    HeaderScan::FirstRow
                },
            }
        };
        Ok(MergeOptions {
            output_dir: self.output_dir.clone(),
            workers: self.workers.map(|n| n as usize),
            sheet: self.sheet.clone(),
            columns,
            pattern,
            collisions: match self.on_collision {
                CollisionArg::Suffix => CollisionPolicy::Suffix,
                CollisionArg::Overwrite => CollisionPolicy::Overwrite,
            },
        })
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary(report: &MergeReport) {
    for outcome in report.failures() {
        if let JobStatus::Failed { error } = &outcome.status {
            println!("failed: row {} ({}): {error}", outcome.row, outcome.key);
        }
    }
    println!(
        "{} created, {} failed, {} skipped",
        report.succeeded(),
        report.failed(),
        report.skipped
    );
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let options = cli.merge_options()?;
    let report = merge(&cli.spreadsheet, &cli.template, &options).with_context(|| {
        format!(
            "cannot merge {} into {}",
            cli.spreadsheet.display(),
            cli.template.display()
        )
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}
