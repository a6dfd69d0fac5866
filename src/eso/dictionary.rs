//! Data-dictionary section of an ESO file.
//!
//! The dictionary declares every report code that can appear in the data
//! section. Codes 1-6 are "standard items" describing the structural row
//! shapes (environment header and the five period rows); codes from 7
//! upward are "variable items", one per reported quantity. The dictionary
//! is built once while the section is read and is immutable afterwards,
//! shared read-only by every simulation environment.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use super::tokenizer::TokenizedLine;
use crate::error::{Error, Result};

/// Highest report code reserved for standard items.
pub const MAX_STANDARD_ITEM_CODE: u32 = 6;

/// The five reporting frequencies an ESO file multiplexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Frequency {
    Interval,
    Daily,
    Monthly,
    RunPeriod,
    Annual,
}

impl Frequency {
    /// The standard-item report code that carries this frequency's period rows.
    pub fn period_code(self) -> u32 {
        match self {
            Frequency::Interval => 2,
            Frequency::Daily => 3,
            Frequency::Monthly => 4,
            Frequency::RunPeriod => 5,
            Frequency::Annual => 6,
        }
    }

    /// Map a period report code (2-6) back to its frequency.
    pub fn from_period_code(code: u32) -> Option<Self> {
        match code {
            2 => Some(Frequency::Interval),
            3 => Some(Frequency::Daily),
            4 => Some(Frequency::Monthly),
            5 => Some(Frequency::RunPeriod),
            6 => Some(Frequency::Annual),
            _ => None,
        }
    }

    /// Classify a dictionary comment ("Hourly", "When Daily Report
    /// Variables Requested", ...) into a frequency.
    ///
    /// The comment strings are not a closed enumeration across engine
    /// versions, so matching is a case-insensitive substring check and
    /// unknown comments return `None`; the data-section router then falls
    /// back to last-seen-period routing for that code.
    pub fn from_comment(comment: &str) -> Option<Self> {
        let c = comment.to_ascii_lowercase();
        if c.contains("timestep") || c.contains("each call") || c.contains("hourly") {
            Some(Frequency::Interval)
        } else if c.contains("daily") {
            Some(Frequency::Daily)
        } else if c.contains("monthly") {
            Some(Frequency::Monthly)
        } else if c.contains("runperiod") || c.contains("run period") {
            Some(Frequency::RunPeriod)
        } else if c.contains("annual") {
            Some(Frequency::Annual)
        } else {
            None
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Interval => "interval",
            Frequency::Daily => "daily",
            Frequency::Monthly => "monthly",
            Frequency::RunPeriod => "run period",
            Frequency::Annual => "annual",
        };
        write!(f, "{name}")
    }
}

/// The `Programme, Version, Timestamp` statement from the first line.
#[derive(Debug, Clone)]
pub struct ProgramVersionStatement {
    pub programme: String,
    pub version: String,
    pub timestamp: String,
}

/// One field of a standard item: a name plus an optional unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardItemField {
    pub name: String,
    pub unit: Option<String>,
}

/// A structural row descriptor (report codes 1-6).
#[derive(Debug, Clone)]
pub struct StandardItem {
    /// Field count as declared on the dictionary line (informational).
    pub declared_field_count: usize,
    pub fields: Vec<StandardItemField>,
    pub comment: Option<String>,
}

/// A reported quantity (report codes 7 and up).
#[derive(Debug, Clone)]
pub struct VariableItem {
    /// Value count as declared on the dictionary line (informational).
    pub declared_field_count: usize,
    /// The simulated entity, e.g. a zone or surface name.
    pub object_name: String,
    pub quantity: String,
    /// `None` means no unit was declared (dimensionless or boolean-like).
    pub unit: Option<String>,
    /// The raw reporting-frequency comment, e.g. "Hourly".
    pub comment: Option<String>,
    /// Frequency classified from the comment, when recognisable.
    pub frequency: Option<Frequency>,
}

/// The full data dictionary: standard items and variable items keyed by
/// report code.
#[derive(Debug, Clone, Default)]
pub struct DataDictionary {
    standard_items: BTreeMap<u32, StandardItem>,
    variable_items: BTreeMap<u32, VariableItem>,
}

impl DataDictionary {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add one tokenized dictionary line.
    pub(crate) fn add_line(&mut self, line: &TokenizedLine, line_number: usize) -> Result<()> {
        let declared = line.fields.first().ok_or(Error::TruncatedRow {
            line_number,
            expected: 1,
            found: 0,
        })?;
        let declared_field_count = declared
            .parse::<usize>()
            .map_err(|_| {
                Error::number_format(declared.as_str(), format!("field count at line {line_number}"))
            })?;

        if line.report_code <= MAX_STANDARD_ITEM_CODE {
            let fields = line.fields[1..]
                .iter()
                .map(|f| {
                    let (name, unit) = split_name_unit(f);
                    StandardItemField { name, unit }
                })
                .collect();
            self.standard_items.insert(
                line.report_code,
                StandardItem {
                    declared_field_count,
                    fields,
                    comment: line.comment.clone(),
                },
            );
        } else {
            if line.fields.len() < 3 {
                return Err(Error::TruncatedRow {
                    line_number,
                    expected: 3,
                    found: line.fields.len(),
                });
            }
            let object_name = line.fields[1].clone();
            let (quantity, unit) = split_name_unit(&line.fields[2]);
            let frequency = line.comment.as_deref().and_then(Frequency::from_comment);
            if frequency.is_none() {
                debug!(
                    report_code = line.report_code,
                    comment = line.comment.as_deref(),
                    "dictionary comment did not classify to a reporting frequency"
                );
            }
            self.variable_items.insert(
                line.report_code,
                VariableItem {
                    declared_field_count,
                    object_name,
                    quantity,
                    unit,
                    comment: line.comment.clone(),
                    frequency,
                },
            );
        }
        Ok(())
    }

    /// Standard items keyed by report code (codes 1-6).
    pub fn standard_items(&self) -> &BTreeMap<u32, StandardItem> {
        &self.standard_items
    }

    /// Variable items keyed by report code (codes 7 and up).
    pub fn variable_items(&self) -> &BTreeMap<u32, VariableItem> {
        &self.variable_items
    }

    /// Look up a standard item by report code.
    pub fn standard_item(&self, report_code: u32) -> Option<&StandardItem> {
        self.standard_items.get(&report_code)
    }

    /// Look up a variable item by report code.
    pub fn variable(&self, report_code: u32) -> Option<&VariableItem> {
        self.variable_items.get(&report_code)
    }
}

/// Split a `Name [Unit]` field into name and optional unit.
///
/// A unit that is empty after bracket stripping ("Name []") normalizes to
/// `None`, so callers cannot confuse "dimensionless" with the empty
/// string.
fn split_name_unit(field: &str) -> (String, Option<String>) {
    match field.split_once('[') {
        Some((name, rest)) => {
            let unit = rest.split(']').next().unwrap_or("").trim();
            (
                name.trim().to_string(),
                (!unit.is_empty()).then(|| unit.to_string()),
            )
        }
        None => (field.trim().to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eso::tokenizer::tokenize;

    fn dictionary_with(lines: &[&str]) -> DataDictionary {
        let mut dictionary = DataDictionary::new();
        for (i, line) in lines.iter().enumerate() {
            let tok = tokenize(line, i + 2).unwrap();
            dictionary.add_line(&tok, i + 2).unwrap();
        }
        dictionary
    }

    #[test]
    fn test_standard_item_fields_and_units() {
        let dictionary = dictionary_with(&[
            "1,5,Environment Title[],Latitude[deg],Longitude[deg],Time Zone[],Elevation[m]",
        ]);
        let item = dictionary.standard_item(1).unwrap();
        assert_eq!(item.declared_field_count, 5);
        assert_eq!(item.fields.len(), 5);
        assert_eq!(item.fields[0].name, "Environment Title");
        assert_eq!(item.fields[0].unit, None);
        assert_eq!(item.fields[1].name, "Latitude");
        assert_eq!(item.fields[1].unit.as_deref(), Some("deg"));
        assert_eq!(item.fields[4].unit.as_deref(), Some("m"));
    }

    #[test]
    fn test_variable_item() {
        let dictionary = dictionary_with(&[
            "7,1,Environment,Site Outdoor Air Drybulb Temperature [C] !Hourly",
        ]);
        let var = dictionary.variable(7).unwrap();
        assert_eq!(var.declared_field_count, 1);
        assert_eq!(var.object_name, "Environment");
        assert_eq!(var.quantity, "Site Outdoor Air Drybulb Temperature");
        assert_eq!(var.unit.as_deref(), Some("C"));
        assert_eq!(var.comment.as_deref(), Some("Hourly"));
        assert_eq!(var.frequency, Some(Frequency::Interval));
    }

    #[test]
    fn test_unit_absence_normalization() {
        // "Name []" and bare "Name" both yield no unit, distinguishable
        // from a declared unit.
        assert_eq!(split_name_unit("Environment Title []").1, None);
        assert_eq!(split_name_unit("Environment Title").1, None);
        assert_eq!(
            split_name_unit("Latitude [deg]"),
            ("Latitude".to_string(), Some("deg".to_string()))
        );
    }

    #[test]
    fn test_unitless_variable() {
        let dictionary =
            dictionary_with(&["102,1,MAIN ZONE,Zone Air Relative Humidity [] !Hourly"]);
        let var = dictionary.variable(102).unwrap();
        assert_eq!(var.unit, None);
    }

    #[test]
    fn test_frequency_classification() {
        assert_eq!(Frequency::from_comment("Hourly"), Some(Frequency::Interval));
        assert_eq!(
            Frequency::from_comment("Each Call"),
            Some(Frequency::Interval)
        );
        assert_eq!(
            Frequency::from_comment("TimeStep"),
            Some(Frequency::Interval)
        );
        assert_eq!(
            Frequency::from_comment("When Daily Report Variables Requested"),
            Some(Frequency::Daily)
        );
        assert_eq!(
            Frequency::from_comment("Daily [Value,Min,Hour,Minute,Max,Hour,Minute]"),
            Some(Frequency::Daily)
        );
        assert_eq!(Frequency::from_comment("Monthly"), Some(Frequency::Monthly));
        assert_eq!(
            Frequency::from_comment("RunPeriod"),
            Some(Frequency::RunPeriod)
        );
        assert_eq!(Frequency::from_comment("Annual"), Some(Frequency::Annual));
        assert_eq!(Frequency::from_comment("Sometimes"), None);
    }

    #[test]
    fn test_period_code_round_trip() {
        for frequency in [
            Frequency::Interval,
            Frequency::Daily,
            Frequency::Monthly,
            Frequency::RunPeriod,
            Frequency::Annual,
        ] {
            assert_eq!(
                Frequency::from_period_code(frequency.period_code()),
                Some(frequency)
            );
        }
        assert_eq!(Frequency::from_period_code(1), None);
        assert_eq!(Frequency::from_period_code(7), None);
    }

    #[test]
    fn test_bad_field_count_is_rejected() {
        let mut dictionary = DataDictionary::new();
        let tok = tokenize("7,x,Environment,Temperature [C] !Hourly", 3).unwrap();
        let err = dictionary.add_line(&tok, 3).unwrap_err();
        assert!(matches!(err, Error::NumberFormat { .. }));
    }
}
