//! The Skein Command-Line Interface.
//!
//! This module is the main entry point for all CLI commands and orchestrates
//! the core library functions.

use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::cli::args::{Command, OutputFormat, SkeinArgs};
use crate::cli::diagnostics::{print_diagnostic_to_stderr, DiagnosticReport};
use crate::errors::{Result, SkeinError};
use crate::syntax::{self, ParserOptions};

pub mod args;
pub mod diagnostics;
pub mod output;

/// Extension of script files picked up when checking a directory.
pub const SCRIPT_EXTENSION: &str = "ink";

/// The main entry point for the CLI.
pub fn run() -> miette::Result<ExitCode> {
    let args = SkeinArgs::parse();
    init_logging(args.verbose);

    let options = ParserOptions::default().with_max_nesting_depth(args.max_nesting_depth);
    let code = match args.command {
        Command::Parse { file, format } => handle_parse(&file, format, options)?,
        Command::Check { paths } => handle_check(&paths, options)?,
    };
    Ok(code)
}

/// Logs go to stderr. `RUST_LOG` wins over the `-v` count.
fn init_logging(verbose: u8) {
    let directive = log_directive(verbose);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    // A subscriber may already be installed when embedded; keep that one.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Default filter for a `-v` count.
fn log_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "skein=info",
        1 => "skein=debug",
        _ => "skein=trace",
    }
}

/// Handles the `parse` subcommand.
fn handle_parse(path: &Path, format: OutputFormat, options: ParserOptions) -> Result<ExitCode> {
    let source = read_script(path)?;
    let name = path.display().to_string();
    debug!(file = %name, "parsing");
    let story = syntax::parse_with_options(&source, options).into_result(name, &source)?;
    match format {
        OutputFormat::Tree => output::print_tree(&story),
        OutputFormat::Json => output::print_json(&story)?,
    }
    Ok(ExitCode::SUCCESS)
}

/// Handles the `check` subcommand.
fn handle_check(paths: &[PathBuf], options: ParserOptions) -> Result<ExitCode> {
    let files = collect_scripts(paths)?;
    let mut summary = output::CheckSummary::default();
    for file in &files {
        let source = read_script(file)?;
        let outcome = syntax::parse_with_options(&source, options);
        debug!(
            file = %file.display(),
            errors = outcome.diagnostics.len(),
            "checked"
        );
        for diagnostic in &outcome.diagnostics {
            let report = DiagnosticReport::new(diagnostic, Some(&source)).with_name(file);
            print_diagnostic_to_stderr(&report);
        }
        summary.record(outcome.diagnostics.len());
    }
    info!(files = summary.files, failed = summary.failed, "check finished");
    output::print_summary(&summary);
    Ok(if summary.failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Expands directories into the script files beneath them, sorted by path.
/// Files named explicitly are kept whatever their extension.
pub fn collect_scripts(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut found = Vec::new();
        for entry in WalkDir::new(path) {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(path).to_path_buf();
                SkeinError::io(path, err.into())
            })?;
            let is_script = entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == SCRIPT_EXTENSION);
            if is_script {
                found.push(entry.into_path());
            }
        }
        found.sort();
        files.extend(found);
    }
    Ok(files)
}

fn read_script(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|err| SkeinError::io(path, err))
}
