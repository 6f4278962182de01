//! Provides the `modeltools` command-line tool.
//!
//! Usage: `modeltools --tool <name> [--opt <args>] [options] <file>...`
//!
//! Applies one tool to every listed model file. Output replaces the input
//! unless `--suffix` or `--output` is given.
//!
//! # Examples
//! ```text
//! modeltools -t rotate --opt 90,y,8,8,8 lamp.json
//! modeltools -t combine --opt "base_a.json,base_b.json top.json" lamp.json
//! ```

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use modeltools::formatter::FormatOptions;
use modeltools::runner::{self, OutputTarget};
use modeltools::tools;

#[derive(Parser, Debug)]
#[command(name = "modeltools")]
#[command(
    about = "Resize, rotate, translate and combine block model JSON files",
    long_about = None
)]
struct Cli {
    /// The tool to use: resize, resizeitem, rotate, translate or combine
    #[arg(short, long)]
    tool: String,

    /// Options for the tool (run with an unknown value to see its pattern)
    #[arg(long = "opt", visible_alias = "tool-options", allow_hyphen_values = true)]
    opt: Option<String>,

    /// Suffix added to each output file name
    #[arg(short, long, conflicts_with = "output")]
    suffix: Option<String>,

    /// Output file
    #[arg(short, long, visible_alias = "out")]
    output: Option<PathBuf>,

    /// Indentation string
    #[arg(short, long, default_value = "    ")]
    indent: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Read extra whitespace-separated file arguments from standard input
    #[arg(long)]
    stdin: bool,

    /// Model files to process
    files: Vec<PathBuf>,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn stdin_files() -> Result<Vec<PathBuf>> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read file list from stdin")?;
        files.extend(line.split_whitespace().map(PathBuf::from));
    }
    Ok(files)
}

fn main() -> Result<()> {
    let mut cli = Cli::parse();
    init_logging(cli.verbose);

    let entry = match tools::find_tool(&cli.tool) {
        Some(entry) => entry,
        None => bail!("tool `{}` does not exist", cli.tool.to_lowercase()),
    };
    let raw = cli
        .opt
        .as_deref()
        .with_context(|| format!("tool requires option: {}", entry.value_pattern))?;
    let op = entry
        .parse(raw)
        .with_context(|| format!("expected {}", entry.value_pattern))?;
    tracing::debug!(?op, "parsed tool options");

    if cli.stdin {
        cli.files.extend(stdin_files()?);
    }
    if cli.files.is_empty() {
        bail!("no model files given");
    }

    let target = match (cli.suffix, cli.output) {
        (Some(suffix), _) => OutputTarget::Suffix(suffix),
        (None, Some(path)) => OutputTarget::Path(path),
        (None, None) => OutputTarget::InPlace,
    };
    let options = FormatOptions { indent: cli.indent };

    let report = runner::process_files(&cli.files, &target, &op, &options);
    eprintln!(
        "{} file(s) written, {} input(s) failed",
        report.written.len(),
        report.failed.len()
    );
    if !report.is_success() {
        process::exit(1);
    }
    Ok(())
}
