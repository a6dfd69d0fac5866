//! Reader for the EnergyPlus .end completion-status file.
//!
//! The .end file holds a single line summarising the run, e.g.
//! `EnergyPlus Completed Successfully-- 3 Warning; 0 Severe Errors;
//! Elapsed Time=00hr 00min  2.33sec`. The line is kept verbatim; the
//! warning and severe-error counts are extracted when the line matches
//! the standard shape.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

const SUCCESS_PREFIX: &str = "EnergyPlus Completed Successfully";

fn counts_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d+) Warning; (\d+) Severe Errors").expect("hard-coded pattern")
    })
}

/// A parsed .end status file.
#[derive(Debug, Clone)]
pub struct EndFile {
    line: String,
    warnings: Option<u32>,
    severe_errors: Option<u32>,
}

impl EndFile {
    /// Read the single status line of a .end file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let mut reader = BufReader::new(file);
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| Error::io(path, e))?;
        let line = line.trim_end().to_string();
        debug!("read status line from {}: {line}", path.display());

        let (warnings, severe_errors) = match counts_pattern().captures(&line) {
            Some(captures) => (
                captures[1].parse::<u32>().ok(),
                captures[2].parse::<u32>().ok(),
            ),
            None => (None, None),
        };

        Ok(Self {
            line,
            warnings,
            severe_errors,
        })
    }

    /// The status line, verbatim.
    pub fn line(&self) -> &str {
        &self.line
    }

    /// Warning count, when the line matches the standard shape.
    pub fn warnings(&self) -> Option<u32> {
        self.warnings
    }

    /// Severe-error count, when the line matches the standard shape.
    pub fn severe_errors(&self) -> Option<u32> {
        self.severe_errors
    }

    /// Whether the run completed successfully.
    pub fn is_success(&self) -> bool {
        self.line.starts_with(SUCCESS_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_successful_run() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "EnergyPlus Completed Successfully-- 3 Warning; 0 Severe Errors; Elapsed Time=00hr 00min  2.33sec"
        )
        .unwrap();

        let end = EndFile::read(file.path()).unwrap();
        assert!(end.is_success());
        assert_eq!(end.warnings(), Some(3));
        assert_eq!(end.severe_errors(), Some(0));
        assert!(end.line().starts_with("EnergyPlus Completed Successfully"));
    }

    #[test]
    fn test_terminated_run() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "EnergyPlus Terminated--Fatal Error Detected. 0 Warning; 2 Severe Errors; Elapsed Time=00hr 00min  0.16sec"
        )
        .unwrap();

        let end = EndFile::read(file.path()).unwrap();
        assert!(!end.is_success());
        assert_eq!(end.warnings(), Some(0));
        assert_eq!(end.severe_errors(), Some(2));
    }

    #[test]
    fn test_nonstandard_line_has_no_counts() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "something unexpected").unwrap();

        let end = EndFile::read(file.path()).unwrap();
        assert!(!end.is_success());
        assert_eq!(end.warnings(), None);
        assert_eq!(end.severe_errors(), None);
    }

    #[test]
    fn test_empty_file_yields_empty_line() {
        let file = NamedTempFile::new().unwrap();
        let end = EndFile::read(file.path()).unwrap();
        assert_eq!(end.line(), "");
        assert!(!end.is_success());
    }
}
