//! Reader for the EnergyPlus .err warning/error log file.
//!
//! The log is line-oriented: warnings and severe errors each start with a
//! fixed banner prefix, and follow-on detail lines carry a continuation
//! prefix and belong to the message above them.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};

const FIRST_LINE_PREFIX: &str = "Program Version";
const WARNING_PREFIX: &str = "   ** Warning ** ";
const SEVERE_PREFIX: &str = "   ** Severe  ** ";
const CONTINUATION_PREFIX: &str = "   **   ~~~   ** ";
const BANNER_PREFIX: &str = "   ************* ";

#[derive(Clone, Copy)]
enum MessageKind {
    Warning,
    Severe,
}

/// A parsed .err log file.
#[derive(Debug, Clone)]
pub struct ErrFile {
    first_line: Option<String>,
    last_line: String,
    lines: Vec<String>,
    warnings: Vec<String>,
    severe_errors: Vec<String>,
}

impl ErrFile {
    /// Read and parse a .err file.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        let reader = BufReader::new(file);

        let mut first_line = None;
        let mut lines = Vec::new();
        let mut warnings: Vec<String> = Vec::new();
        let mut severe_errors: Vec<String> = Vec::new();
        let mut current: Option<MessageKind> = None;

        for line in reader.lines() {
            let line = line.map_err(|e| Error::io(path, e))?;

            if first_line.is_none() && line.starts_with(FIRST_LINE_PREFIX) {
                first_line = Some(line.clone());
            }

            if let Some(body) = line.strip_prefix(WARNING_PREFIX) {
                warnings.push(body.to_string());
                current = Some(MessageKind::Warning);
            } else if let Some(body) = line.strip_prefix(SEVERE_PREFIX) {
                severe_errors.push(body.to_string());
                current = Some(MessageKind::Severe);
            } else if let Some(body) = line.strip_prefix(CONTINUATION_PREFIX) {
                let target = match current {
                    Some(MessageKind::Warning) => warnings.last_mut(),
                    Some(MessageKind::Severe) => severe_errors.last_mut(),
                    None => None,
                };
                if let Some(message) = target {
                    message.push('\n');
                    message.push_str(body);
                }
            }

            lines.push(line);
        }

        // The closing line carries the same banner prefix as the other
        // asterisk-framed lines; strip it so callers get the summary text.
        let last_line = lines
            .last()
            .map(|line| {
                line.strip_prefix(BANNER_PREFIX)
                    .unwrap_or(line)
                    .to_string()
            })
            .unwrap_or_default();

        debug!(
            warnings = warnings.len(),
            severe_errors = severe_errors.len(),
            "parsed {}",
            path.display()
        );

        Ok(Self {
            first_line,
            last_line,
            lines,
            warnings,
            severe_errors,
        })
    }

    /// The `Program Version` line, when present.
    pub fn first_line(&self) -> Option<&str> {
        self.first_line.as_deref()
    }

    /// The final line with its banner prefix stripped; empty for an empty
    /// file.
    pub fn last_line(&self) -> &str {
        &self.last_line
    }

    /// All lines of the file in order.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The full text of the file.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Warning message bodies, continuation lines folded in.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Severe-error message bodies, continuation lines folded in.
    pub fn severe_errors(&self) -> &[String] {
        &self.severe_errors
    }
}
