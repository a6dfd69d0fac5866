//! Variable accessors: one per reporting frequency.
//!
//! A variable accessor pairs a report code's raw value columns with its
//! dictionary metadata (object name, quantity, unit). Daily and monthly
//! variables additionally carry min/max values with the day/hour/minute
//! the extreme occurred, reconstructed against the owning period's start
//! time. The file records occurrence hours and minutes 1-indexed; both
//! are shifted down by one when building calendar timestamps.
//!
//! Reconstructing occurrence times zips a variable's columns against its
//! period list and fails with a shape-mismatch error if the lengths
//! differ (an intermittently reported variable); plain value reads never
//! zip and are returned as-is.

use chrono::{DateTime, Datelike, FixedOffset};

use super::columns::{parse_floats, parse_ints, ColumnStore};
use super::dictionary::{Frequency, VariableItem};
use super::periods::{make_datetime, DailyPeriods, MonthlyPeriods};
use crate::error::{Error, Result};

fn check_shape(
    report_code: u32,
    frequency: Frequency,
    periods: usize,
    rows: usize,
) -> Result<()> {
    if periods == rows {
        Ok(())
    } else {
        Err(Error::ShapeMismatch {
            report_code,
            frequency,
            expected: periods,
            found: rows,
        })
    }
}

/// An interval (timestep/hourly) variable.
///
/// Row shape: value.
#[derive(Debug, Clone, Copy)]
pub struct IntervalVariable<'a> {
    report_code: u32,
    entry: &'a VariableItem,
    store: &'a ColumnStore,
}

impl<'a> IntervalVariable<'a> {
    pub(crate) fn new(report_code: u32, entry: &'a VariableItem, store: &'a ColumnStore) -> Self {
        Self {
            report_code,
            entry,
            store,
        }
    }

    pub fn report_code(&self) -> u32 {
        self.report_code
    }

    /// The simulated entity this variable was reported for.
    pub fn object_name(&self) -> &'a str {
        &self.entry.object_name
    }

    pub fn quantity(&self) -> &'a str {
        &self.entry.quantity
    }

    pub fn unit(&self) -> Option<&'a str> {
        self.entry.unit.as_deref()
    }

    /// Number of recorded values.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The reported (mean) values.
    pub fn values(&self) -> Result<Vec<f64>> {
        parse_floats(self.store.column(0), "interval variable value")
    }
}

/// A daily variable.
///
/// Row shape: value, min value, min hour, min minute, max value,
/// max hour, max minute.
#[derive(Debug, Clone, Copy)]
pub struct DailyVariable<'a> {
    report_code: u32,
    entry: &'a VariableItem,
    store: &'a ColumnStore,
    periods: DailyPeriods<'a>,
}

impl<'a> DailyVariable<'a> {
    pub(crate) fn new(
        report_code: u32,
        entry: &'a VariableItem,
        store: &'a ColumnStore,
        periods: DailyPeriods<'a>,
    ) -> Self {
        Self {
            report_code,
            entry,
            store,
            periods,
        }
    }

    pub fn report_code(&self) -> u32 {
        self.report_code
    }

    pub fn object_name(&self) -> &'a str {
        &self.entry.object_name
    }

    pub fn quantity(&self) -> &'a str {
        &self.entry.quantity
    }

    pub fn unit(&self) -> Option<&'a str> {
        self.entry.unit.as_deref()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The reported (mean) values.
    pub fn values(&self) -> Result<Vec<f64>> {
        parse_floats(self.store.column(0), "daily variable value")
    }

    pub fn min_values(&self) -> Result<Vec<f64>> {
        parse_floats(self.store.column(1), "daily variable minimum value")
    }

    /// Hours of the minimum occurrences, 1-indexed as recorded.
    pub fn min_hours(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(2), "daily variable minimum hour")
    }

    /// Minutes of the minimum occurrences, 1-indexed as recorded.
    pub fn min_minutes(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(3), "daily variable minimum minute")
    }

    pub fn max_values(&self) -> Result<Vec<f64>> {
        parse_floats(self.store.column(4), "daily variable maximum value")
    }

    /// Hours of the maximum occurrences, 1-indexed as recorded.
    pub fn max_hours(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(5), "daily variable maximum hour")
    }

    /// Minutes of the maximum occurrences, 1-indexed as recorded.
    pub fn max_minutes(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(6), "daily variable maximum minute")
    }

    /// Wall-clock times at which the minimum values occurred.
    pub fn min_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        self.occurrence_times(self.min_hours()?, self.min_minutes()?)
    }

    /// Wall-clock times at which the maximum values occurred.
    pub fn max_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        self.occurrence_times(self.max_hours()?, self.max_minutes()?)
    }

    fn occurrence_times(
        &self,
        hours: Vec<i64>,
        minutes: Vec<i64>,
    ) -> Result<Vec<DateTime<FixedOffset>>> {
        let starts = self.periods.start_times()?;
        check_shape(self.report_code, Frequency::Daily, starts.len(), self.len())?;
        starts
            .iter()
            .zip(&hours)
            .zip(&minutes)
            .map(|((start, &hour), &minute)| {
                make_datetime(
                    *start.offset(),
                    i64::from(start.year()),
                    i64::from(start.month()),
                    i64::from(start.day()),
                    hour - 1,
                    minute - 1,
                )
            })
            .collect()
    }
}

/// A monthly variable.
///
/// Row shape: value, min value, min day, min hour, min minute, max value,
/// max day, max hour, max minute.
#[derive(Debug, Clone, Copy)]
pub struct MonthlyVariable<'a> {
    report_code: u32,
    entry: &'a VariableItem,
    store: &'a ColumnStore,
    periods: MonthlyPeriods<'a>,
}

impl<'a> MonthlyVariable<'a> {
    pub(crate) fn new(
        report_code: u32,
        entry: &'a VariableItem,
        store: &'a ColumnStore,
        periods: MonthlyPeriods<'a>,
    ) -> Self {
        Self {
            report_code,
            entry,
            store,
            periods,
        }
    }

    pub fn report_code(&self) -> u32 {
        self.report_code
    }

    pub fn object_name(&self) -> &'a str {
        &self.entry.object_name
    }

    pub fn quantity(&self) -> &'a str {
        &self.entry.quantity
    }

    pub fn unit(&self) -> Option<&'a str> {
        self.entry.unit.as_deref()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The reported (mean) values.
    pub fn values(&self) -> Result<Vec<f64>> {
        parse_floats(self.store.column(0), "monthly variable value")
    }

    pub fn min_values(&self) -> Result<Vec<f64>> {
        parse_floats(self.store.column(1), "monthly variable minimum value")
    }

    /// Days of month of the minimum occurrences.
    pub fn min_days(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(2), "monthly variable minimum day")
    }

    /// Hours of the minimum occurrences, 1-indexed as recorded.
    pub fn min_hours(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(3), "monthly variable minimum hour")
    }

    /// Minutes of the minimum occurrences, 1-indexed as recorded.
    pub fn min_minutes(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(4), "monthly variable minimum minute")
    }

    pub fn max_values(&self) -> Result<Vec<f64>> {
        parse_floats(self.store.column(5), "monthly variable maximum value")
    }

    /// Days of month of the maximum occurrences.
    pub fn max_days(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(6), "monthly variable maximum day")
    }

    /// Hours of the maximum occurrences, 1-indexed as recorded.
    pub fn max_hours(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(7), "monthly variable maximum hour")
    }

    /// Minutes of the maximum occurrences, 1-indexed as recorded.
    pub fn max_minutes(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(8), "monthly variable maximum minute")
    }

    /// Wall-clock times at which the minimum values occurred.
    pub fn min_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        self.occurrence_times(self.min_days()?, self.min_hours()?, self.min_minutes()?)
    }

    /// Wall-clock times at which the maximum values occurred.
    pub fn max_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        self.occurrence_times(self.max_days()?, self.max_hours()?, self.max_minutes()?)
    }

    fn occurrence_times(
        &self,
        days: Vec<i64>,
        hours: Vec<i64>,
        minutes: Vec<i64>,
    ) -> Result<Vec<DateTime<FixedOffset>>> {
        let starts = self.periods.start_times()?;
        check_shape(
            self.report_code,
            Frequency::Monthly,
            starts.len(),
            self.len(),
        )?;
        starts
            .iter()
            .zip(&days)
            .zip(&hours)
            .zip(&minutes)
            .map(|(((start, &day), &hour), &minute)| {
                make_datetime(
                    *start.offset(),
                    i64::from(start.year()),
                    i64::from(start.month()),
                    day,
                    hour - 1,
                    minute - 1,
                )
            })
            .collect()
    }
}

/// A run-period variable.
///
/// Row shape: value.
#[derive(Debug, Clone, Copy)]
pub struct RunPeriodVariable<'a> {
    report_code: u32,
    entry: &'a VariableItem,
    store: &'a ColumnStore,
}

impl<'a> RunPeriodVariable<'a> {
    pub(crate) fn new(report_code: u32, entry: &'a VariableItem, store: &'a ColumnStore) -> Self {
        Self {
            report_code,
            entry,
            store,
        }
    }

    pub fn report_code(&self) -> u32 {
        self.report_code
    }

    pub fn object_name(&self) -> &'a str {
        &self.entry.object_name
    }

    pub fn quantity(&self) -> &'a str {
        &self.entry.quantity
    }

    pub fn unit(&self) -> Option<&'a str> {
        self.entry.unit.as_deref()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The reported values.
    pub fn values(&self) -> Result<Vec<f64>> {
        parse_floats(self.store.column(0), "run period variable value")
    }
}

/// An annual variable.
///
/// Row shape: value.
#[derive(Debug, Clone, Copy)]
pub struct AnnualVariable<'a> {
    report_code: u32,
    entry: &'a VariableItem,
    store: &'a ColumnStore,
}

impl<'a> AnnualVariable<'a> {
    pub(crate) fn new(report_code: u32, entry: &'a VariableItem, store: &'a ColumnStore) -> Self {
        Self {
            report_code,
            entry,
            store,
        }
    }

    pub fn report_code(&self) -> u32 {
        self.report_code
    }

    pub fn object_name(&self) -> &'a str {
        &self.entry.object_name
    }

    pub fn quantity(&self) -> &'a str {
        &self.entry.quantity
    }

    pub fn unit(&self) -> Option<&'a str> {
        self.entry.unit.as_deref()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The reported values.
    pub fn values(&self) -> Result<Vec<f64>> {
        parse_floats(self.store.column(0), "annual variable value")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn store_with(rows: &[&[&str]]) -> ColumnStore {
        let mut store = ColumnStore::new();
        for row in rows {
            store.push_row(row.iter().map(|s| s.to_string()).collect());
        }
        store.finalize();
        store
    }

    fn zone_temperature(frequency: Option<Frequency>) -> VariableItem {
        VariableItem {
            declared_field_count: 7,
            object_name: "ZONE ONE".to_string(),
            quantity: "Zone Mean Air Temperature".to_string(),
            unit: Some("C".to_string()),
            comment: Some("Daily".to_string()),
            frequency,
        }
    }

    #[test]
    fn test_daily_occurrence_times_shift_one_indexed_fields() {
        let period_store = store_with(&[&["1", "12", "21", "0", "WinterDesignDay"]]);
        let periods = DailyPeriods::new(&period_store, utc());
        let entry = zone_temperature(Some(Frequency::Daily));
        let store = store_with(&[&[
            "-20.0",
            "-21.5",
            "24",
            "60",
            "-18.1438609435393",
            "1",
            "15",
        ]]);
        let variable = DailyVariable::new(51, &entry, &store, periods);

        // Raw max hour 1, max minute 15 means 00:14 wall clock.
        assert_eq!(
            variable.max_times().unwrap(),
            vec![Utc.with_ymd_and_hms(2001, 12, 21, 0, 14, 0).unwrap()]
        );
        // Raw min hour 24, min minute 60 means 23:59 wall clock.
        assert_eq!(
            variable.min_times().unwrap(),
            vec![Utc.with_ymd_and_hms(2001, 12, 21, 23, 59, 0).unwrap()]
        );
        assert_eq!(variable.max_values().unwrap(), vec![-18.1438609435393]);
        assert_eq!(variable.min_hours().unwrap(), vec![24]);
    }

    #[test]
    fn test_monthly_occurrence_times() {
        let period_store = store_with(&[&["31", "12"]]);
        let periods = MonthlyPeriods::new(&period_store, utc());
        let entry = zone_temperature(Some(Frequency::Monthly));
        let store = store_with(&[&[
            "-20.0", "-21.5", "21", "24", "60", "-18.1", "21", "1", "15",
        ]]);
        let variable = MonthlyVariable::new(52, &entry, &store, periods);

        assert_eq!(variable.min_days().unwrap(), vec![21]);
        assert_eq!(
            variable.min_times().unwrap(),
            vec![Utc.with_ymd_and_hms(2001, 12, 21, 23, 59, 0).unwrap()]
        );
        assert_eq!(
            variable.max_times().unwrap(),
            vec![Utc.with_ymd_and_hms(2001, 12, 21, 0, 14, 0).unwrap()]
        );
    }

    #[test]
    fn test_occurrence_times_reject_mismatched_lengths() {
        // Two periods but only one variable row.
        let period_store = store_with(&[
            &["1", "12", "21", "0", "WinterDesignDay"],
            &["2", "12", "22", "0", "WinterDesignDay"],
        ]);
        let periods = DailyPeriods::new(&period_store, utc());
        let entry = zone_temperature(Some(Frequency::Daily));
        let store = store_with(&[&["-20.0", "-21.5", "24", "60", "-18.1", "1", "15"]]);
        let variable = DailyVariable::new(51, &entry, &store, periods);

        let err = variable.max_times().unwrap_err();
        match err {
            Error::ShapeMismatch {
                report_code,
                frequency,
                expected,
                found,
            } => {
                assert_eq!(report_code, 51);
                assert_eq!(frequency, Frequency::Daily);
                assert_eq!(expected, 2);
                assert_eq!(found, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_interval_variable_metadata_and_values() {
        let entry = VariableItem {
            declared_field_count: 1,
            object_name: "Environment".to_string(),
            quantity: "Site Outdoor Air Drybulb Temperature".to_string(),
            unit: Some("C".to_string()),
            comment: Some("Hourly".to_string()),
            frequency: Some(Frequency::Interval),
        };
        let store = store_with(&[&["-17.5"], &["-17.0"], &["-16.25"]]);
        let variable = IntervalVariable::new(7, &entry, &store);
        assert_eq!(variable.report_code(), 7);
        assert_eq!(variable.object_name(), "Environment");
        assert_eq!(variable.unit(), Some("C"));
        assert_eq!(variable.values().unwrap(), vec![-17.5, -17.0, -16.25]);
    }
}
