//! Error handling for EnergyPlus output processing.
//!
//! One crate-wide error enum with context-carrying variants. Structural
//! parse failures are fatal and abort with the offending line number;
//! lookup failures (unknown environment title, unknown report code) are
//! distinguishable so callers can branch on "doesn't exist" vs "exists
//! but empty".

use std::path::PathBuf;
use thiserror::Error;

use crate::eso::Frequency;

/// Result type alias for EnergyPlus output processing.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("File is empty: {path}")]
    EmptyFile { path: PathBuf },

    #[error("Malformed report code '{token}' at line {line_number}")]
    MalformedReportCode { line_number: usize, token: String },

    #[error(
        "Truncated row at line {line_number}: expected at least {expected} fields, found {found}"
    )]
    TruncatedRow {
        line_number: usize,
        expected: usize,
        found: usize,
    },

    #[error("File ended inside the {section} section: missing '{marker}' marker")]
    MissingSentinel {
        marker: &'static str,
        section: &'static str,
    },

    #[error(
        "Report code {report_code} at line {line_number} was never declared in the data dictionary"
    )]
    UndeclaredReportCode { report_code: u32, line_number: usize },

    #[error(
        "Data row with report code {report_code} at line {line_number} appears before any environment header"
    )]
    RowOutsideEnvironment { report_code: u32, line_number: usize },

    #[error(
        "Variable row with report code {report_code} at line {line_number} has no resolvable frequency and no period row precedes it"
    )]
    VariableBeforePeriod { report_code: u32, line_number: usize },

    #[error("No simulation environment titled '{title}'")]
    EnvironmentNotFound { title: String },

    #[error("Report code {report_code} not present in the {frequency} data")]
    ReportCodeNotFound {
        report_code: u32,
        frequency: Frequency,
    },

    #[error("Report code {report_code} has {found} rows but the {frequency} periods have {expected}")]
    ShapeMismatch {
        report_code: u32,
        frequency: Frequency,
        expected: usize,
        found: usize,
    },

    #[error("Invalid numeric value '{value}' in {context}")]
    NumberFormat { value: String, context: String },

    #[error("Invalid calendar date: year {year}, month {month}, day {day}")]
    InvalidDate { year: i64, month: i64, day: i64 },

    #[error("Invalid time of day: hour {hour}, minute {minute}")]
    InvalidTime { hour: i64, minute: i64 },

    #[error("Time zone offset of {hours} hours is out of range")]
    InvalidTimeZone { hours: f64 },

    #[error("Simulation directory does not exist: {path}")]
    SimulationDirNotFound { path: PathBuf },

    #[error("No '{extension}' file was produced by the simulation")]
    OutputFileNotFound { extension: String },

    #[error("Directory traversal error: {0}")]
    DirectoryTraversal(#[from] walkdir::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a numeric-format error with context for the failing field.
    pub fn number_format(value: impl Into<String>, context: impl Into<String>) -> Self {
        Self::NumberFormat {
            value: value.into(),
            context: context.into(),
        }
    }
}
