//! Parser and query model for EnergyPlus .eso time-series output.
//!
//! An ESO file multiplexes a data-dictionary section (the schema of what
//! will follow) and a data section (the recorded values) in one
//! line-oriented text stream. Parsing is a single streaming pass:
//!
//! - line 1 is the programme/version statement;
//! - dictionary lines are collected until `End of Data Dictionary`;
//! - data lines are demultiplexed until `End of Data`: report code 1
//!   opens a new simulation environment, codes 2-6 append period rows to
//!   their frequency bucket, and variable codes are routed to the bucket
//!   their dictionary entry resolves to (falling back to the most
//!   recently seen period code when the dictionary comment is
//!   unclassifiable);
//! - each bucket's rows are then transposed once to column-major storage.
//!
//! The parse is batch and synchronous: no accessor is usable until the
//! whole file is decoded, and each parse produces an independent result
//! graph. Accessors are pure reads over that graph and recompute their
//! timestamps on every call.

pub mod columns;
pub mod dictionary;
pub mod environment;
pub mod periods;
pub mod tokenizer;
pub mod variables;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
pub use columns::ColumnStore;
pub use dictionary::{
    DataDictionary, Frequency, ProgramVersionStatement, StandardItem, StandardItemField,
    VariableItem, MAX_STANDARD_ITEM_CODE,
};
pub use environment::Environment;
use environment::EnvironmentData;
pub use periods::{
    AnnualPeriods, DailyPeriods, IntervalPeriods, MonthlyPeriods, RunPeriodPeriods, ANCHOR_YEAR,
};
pub use variables::{
    AnnualVariable, DailyVariable, IntervalVariable, MonthlyVariable, RunPeriodVariable,
};

const END_OF_DICTIONARY: &str = "End of Data Dictionary";
const END_OF_DATA: &str = "End of Data";

/// A fully parsed .eso file.
#[derive(Debug, Clone)]
pub struct EsoFile {
    path: PathBuf,
    program_version: ProgramVersionStatement,
    dictionary: DataDictionary,
    environments: Vec<EnvironmentData>,
}

enum Section {
    Dictionary,
    Data,
    Done,
}

impl EsoFile {
    /// Read and parse an .eso file to completion.
    ///
    /// Structural violations (a malformed report code, a data row whose
    /// code was never declared, missing section sentinels) abort the
    /// parse; there is no partial result.
    pub fn parse(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Parsing ESO file: {}", path.display());
        let file = File::open(path).map_err(|e| Error::io(path, e))?;
        Self::parse_reader(BufReader::new(file), path)
    }

    fn parse_reader(reader: impl BufRead, path: &Path) -> Result<Self> {
        let mut lines = reader.lines().enumerate();

        let first_line = match lines.next() {
            Some((_, line)) => line.map_err(|e| Error::io(path, e))?,
            None => {
                return Err(Error::EmptyFile {
                    path: path.to_path_buf(),
                })
            }
        };
        let program_version = parse_program_version(&first_line)?;
        debug!(
            programme = %program_version.programme,
            version = %program_version.version,
            "parsed programme version statement"
        );

        let mut section = Section::Dictionary;
        let mut dictionary = DataDictionary::new();
        let mut environments: Vec<EnvironmentData> = Vec::new();
        let mut current_frequency: Option<Frequency> = None;

        for (index, line) in lines {
            let line_number = index + 1;
            let line = line.map_err(|e| Error::io(path, e))?;

            match section {
                Section::Dictionary => {
                    if line.starts_with(END_OF_DICTIONARY) {
                        debug!(
                            standard_items = dictionary.standard_items().len(),
                            variable_items = dictionary.variable_items().len(),
                            "end of data dictionary at line {line_number}"
                        );
                        section = Section::Data;
                        continue;
                    }
                    if line.trim().is_empty() {
                        debug!("skipping blank line {line_number} in dictionary section");
                        continue;
                    }
                    let tok = tokenizer::tokenize(&line, line_number)?;
                    dictionary.add_line(&tok, line_number)?;
                }
                Section::Data => {
                    if line.starts_with(END_OF_DATA) {
                        section = Section::Done;
                        continue;
                    }
                    if line.trim().is_empty() {
                        debug!("skipping blank line {line_number} in data section");
                        continue;
                    }
                    let tok = tokenizer::tokenize(&line, line_number)?;
                    match tok.report_code {
                        1 => {
                            let env = EnvironmentData::from_header(&tok.fields, line_number)?;
                            debug!(title = %env.title, "opening simulation environment");
                            environments.push(env);
                            current_frequency = None;
                        }
                        code if code <= MAX_STANDARD_ITEM_CODE => {
                            // 2-6 always map to a frequency
                            let frequency = Frequency::from_period_code(code)
                                .ok_or(Error::UndeclaredReportCode {
                                    report_code: code,
                                    line_number,
                                })?;
                            let env = environments.last_mut().ok_or(
                                Error::RowOutsideEnvironment {
                                    report_code: code,
                                    line_number,
                                },
                            )?;
                            env.buckets.get_mut(frequency).period.push_row(tok.fields);
                            current_frequency = Some(frequency);
                        }
                        code => {
                            let env = environments.last_mut().ok_or(
                                Error::RowOutsideEnvironment {
                                    report_code: code,
                                    line_number,
                                },
                            )?;
                            let entry = dictionary.variable(code).ok_or(
                                Error::UndeclaredReportCode {
                                    report_code: code,
                                    line_number,
                                },
                            )?;
                            if let (Some(declared), Some(current)) =
                                (entry.frequency, current_frequency)
                            {
                                if declared != current {
                                    warn!(
                                        report_code = code,
                                        %declared,
                                        %current,
                                        "variable row out of step with the period rows; routing by dictionary frequency"
                                    );
                                }
                            }
                            let frequency = entry.frequency.or(current_frequency).ok_or(
                                Error::VariableBeforePeriod {
                                    report_code: code,
                                    line_number,
                                },
                            )?;
                            env.buckets
                                .get_mut(frequency)
                                .variable_store(code)
                                .push_row(tok.fields);
                        }
                    }
                }
                Section::Done => {
                    // anything beyond End of Data is ignored
                }
            }
        }

        match section {
            Section::Dictionary => {
                return Err(Error::MissingSentinel {
                    marker: END_OF_DICTIONARY,
                    section: "data dictionary",
                })
            }
            Section::Data => {
                return Err(Error::MissingSentinel {
                    marker: END_OF_DATA,
                    section: "data",
                })
            }
            Section::Done => {}
        }

        for env in &mut environments {
            env.finalize();
        }

        info!(
            environments = environments.len(),
            variables = dictionary.variable_items().len(),
            "parsed {}",
            path.display()
        );

        Ok(Self {
            path: path.to_path_buf(),
            program_version,
            dictionary,
            environments,
        })
    }

    /// The path this file was parsed from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The programme/version statement from the first line.
    pub fn program_version(&self) -> &ProgramVersionStatement {
        &self.program_version
    }

    /// The data dictionary, shared read-only by every environment.
    pub fn dictionary(&self) -> &DataDictionary {
        &self.dictionary
    }

    /// The simulation environments in file order.
    pub fn environments(&self) -> Vec<Environment<'_>> {
        self.environments
            .iter()
            .map(|data| Environment::new(data, &self.dictionary))
            .collect()
    }

    /// Look up a simulation environment by exact title.
    ///
    /// Titles are matched by string equality with significant whitespace;
    /// when several environments share a title the first in file order is
    /// returned.
    pub fn environment(&self, title: &str) -> Result<Environment<'_>> {
        self.environments
            .iter()
            .find(|data| data.title == title)
            .map(|data| Environment::new(data, &self.dictionary))
            .ok_or_else(|| Error::EnvironmentNotFound {
                title: title.to_string(),
            })
    }
}

/// Parse the `Programme, Version, Timestamp` statement.
///
/// Real files prefix the three fields with a `Program Version` label;
/// both the labelled and unlabelled forms are accepted.
fn parse_program_version(line: &str) -> Result<ProgramVersionStatement> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    let (programme, version, timestamp) = match fields.len() {
        0..=2 => {
            return Err(Error::TruncatedRow {
                line_number: 1,
                expected: 3,
                found: fields.len(),
            })
        }
        3 => (fields[0], fields[1], fields[2]),
        _ => (fields[1], fields[2], fields[3]),
    };
    Ok(ProgramVersionStatement {
        programme: programme.to_string(),
        version: version.to_string(),
        timestamp: timestamp.to_string(),
    })
}
