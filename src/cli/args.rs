//! Command-line argument definitions.
//!
//! The CLI is a thin inspection surface over the library: it parses an
//! output file and prints what is inside.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the EnergyPlus output inspector.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "eso-processor",
    version,
    about = "Inspect EnergyPlus simulation output files",
    long_about = "Parses EnergyPlus simulation output files and prints their contents: \
                  the simulation environments, reporting frequencies and variables of an \
                  .eso time-series file, or the warnings and severe errors of an .err log."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Summarise the environments and variables of an .eso file
    Summary(SummaryArgs),
    /// List the warnings and severe errors of an .err file
    Errors(ErrorsArgs),
}

/// Arguments for the summary command.
#[derive(Debug, Clone, Parser)]
pub struct SummaryArgs {
    /// Path to the .eso file
    #[arg(value_name = "FILE")]
    pub eso_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for the errors command.
#[derive(Debug, Clone, Parser)]
pub struct ErrorsArgs {
    /// Path to the .err file
    #[arg(value_name = "FILE")]
    pub err_file: PathBuf,
}

/// Output format for the summary command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Pretty-printed JSON
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_args() {
        let args = Args::parse_from(["eso-processor", "summary", "eplusout.eso"]);
        match args.command {
            Commands::Summary(summary) => {
                assert_eq!(summary.eso_file, PathBuf::from("eplusout.eso"));
                assert_eq!(summary.format, OutputFormat::Text);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_summary_json_format() {
        let args = Args::parse_from([
            "eso-processor",
            "summary",
            "eplusout.eso",
            "--format",
            "json",
        ]);
        match args.command {
            Commands::Summary(summary) => assert_eq!(summary.format, OutputFormat::Json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_errors_args() {
        let args = Args::parse_from(["eso-processor", "errors", "eplusout.err", "--verbose"]);
        assert!(args.verbose);
        match args.command {
            Commands::Errors(errors) => {
                assert_eq!(errors.err_file, PathBuf::from("eplusout.err"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
