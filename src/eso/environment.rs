//! Simulation environments and their accessor views.
//!
//! Each report-code-1 row in the data section opens one simulation
//! environment (a design day or a run period). The environment owns five
//! frequency buckets of raw column data; [`Environment`] is the borrowed,
//! read-only view over one of them, resolving variable metadata through
//! the shared data dictionary.

use std::collections::BTreeMap;

use chrono::FixedOffset;

use super::columns::ColumnStore;
use super::dictionary::{DataDictionary, Frequency, VariableItem};
use super::periods::{
    AnnualPeriods, DailyPeriods, IntervalPeriods, MonthlyPeriods, RunPeriodPeriods,
};
use super::variables::{
    AnnualVariable, DailyVariable, IntervalVariable, MonthlyVariable, RunPeriodVariable,
};
use crate::error::{Error, Result};

/// Raw column data for one reporting frequency within one environment.
#[derive(Debug, Clone)]
pub(crate) struct FrequencyBucket {
    pub(crate) period: ColumnStore,
    pub(crate) variables: BTreeMap<u32, ColumnStore>,
}

impl FrequencyBucket {
    fn new() -> Self {
        Self {
            period: ColumnStore::new(),
            variables: BTreeMap::new(),
        }
    }

    pub(crate) fn variable_store(&mut self, report_code: u32) -> &mut ColumnStore {
        self.variables.entry(report_code).or_default()
    }

    fn finalize(&mut self) {
        self.period.finalize();
        for store in self.variables.values_mut() {
            store.finalize();
        }
    }
}

/// The five frequency buckets of one environment.
#[derive(Debug, Clone)]
pub(crate) struct Buckets {
    interval: FrequencyBucket,
    daily: FrequencyBucket,
    monthly: FrequencyBucket,
    run_period: FrequencyBucket,
    annual: FrequencyBucket,
}

impl Buckets {
    fn new() -> Self {
        Self {
            interval: FrequencyBucket::new(),
            daily: FrequencyBucket::new(),
            monthly: FrequencyBucket::new(),
            run_period: FrequencyBucket::new(),
            annual: FrequencyBucket::new(),
        }
    }

    pub(crate) fn get(&self, frequency: Frequency) -> &FrequencyBucket {
        match frequency {
            Frequency::Interval => &self.interval,
            Frequency::Daily => &self.daily,
            Frequency::Monthly => &self.monthly,
            Frequency::RunPeriod => &self.run_period,
            Frequency::Annual => &self.annual,
        }
    }

    pub(crate) fn get_mut(&mut self, frequency: Frequency) -> &mut FrequencyBucket {
        match frequency {
            Frequency::Interval => &mut self.interval,
            Frequency::Daily => &mut self.daily,
            Frequency::Monthly => &mut self.monthly,
            Frequency::RunPeriod => &mut self.run_period,
            Frequency::Annual => &mut self.annual,
        }
    }
}

/// Owned data of one simulation environment.
#[derive(Debug, Clone)]
pub(crate) struct EnvironmentData {
    pub(crate) title: String,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) time_zone: f64,
    pub(crate) elevation: f64,
    pub(crate) timezone: FixedOffset,
    pub(crate) buckets: Buckets,
}

impl EnvironmentData {
    /// Build from the fields of a report-code-1 row:
    /// title, latitude, longitude, time zone (hours), elevation (m).
    pub(crate) fn from_header(fields: &[String], line_number: usize) -> Result<Self> {
        if fields.len() < 5 {
            return Err(Error::TruncatedRow {
                line_number,
                expected: 5,
                found: fields.len(),
            });
        }
        let parse = |index: usize, name: &str| -> Result<f64> {
            fields[index].parse::<f64>().map_err(|_| {
                Error::number_format(
                    fields[index].as_str(),
                    format!("environment header {name} at line {line_number}"),
                )
            })
        };
        let latitude = parse(1, "latitude")?;
        let longitude = parse(2, "longitude")?;
        let time_zone = parse(3, "time zone")?;
        let elevation = parse(4, "elevation")?;

        // Derived once; fractional offsets like -7.5 hours are valid.
        let timezone = FixedOffset::east_opt((time_zone * 3600.0).round() as i32)
            .ok_or(Error::InvalidTimeZone { hours: time_zone })?;

        Ok(Self {
            title: fields[0].clone(),
            latitude,
            longitude,
            time_zone,
            elevation,
            timezone,
            buckets: Buckets::new(),
        })
    }

    pub(crate) fn finalize(&mut self) {
        for frequency in [
            Frequency::Interval,
            Frequency::Daily,
            Frequency::Monthly,
            Frequency::RunPeriod,
            Frequency::Annual,
        ] {
            self.buckets.get_mut(frequency).finalize();
        }
    }
}

/// Read-only view of one simulation environment.
#[derive(Debug, Clone, Copy)]
pub struct Environment<'a> {
    data: &'a EnvironmentData,
    dictionary: &'a DataDictionary,
}

impl<'a> Environment<'a> {
    pub(crate) fn new(data: &'a EnvironmentData, dictionary: &'a DataDictionary) -> Self {
        Self { data, dictionary }
    }

    /// The environment title. Not guaranteed unique within a file.
    pub fn title(&self) -> &'a str {
        &self.data.title
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.data.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.data.longitude
    }

    /// Time zone offset in hours, possibly fractional.
    pub fn time_zone(&self) -> f64 {
        self.data.time_zone
    }

    /// Elevation in metres.
    pub fn elevation(&self) -> f64 {
        self.data.elevation
    }

    /// The environment's fixed-offset timezone, carried by every derived
    /// timestamp.
    pub fn timezone(&self) -> FixedOffset {
        self.data.timezone
    }

    pub fn interval_periods(&self) -> IntervalPeriods<'a> {
        IntervalPeriods::new(
            &self.data.buckets.get(Frequency::Interval).period,
            self.data.timezone,
        )
    }

    pub fn daily_periods(&self) -> DailyPeriods<'a> {
        DailyPeriods::new(
            &self.data.buckets.get(Frequency::Daily).period,
            self.data.timezone,
        )
    }

    pub fn monthly_periods(&self) -> MonthlyPeriods<'a> {
        MonthlyPeriods::new(
            &self.data.buckets.get(Frequency::Monthly).period,
            self.data.timezone,
        )
    }

    pub fn run_period_periods(&self) -> RunPeriodPeriods<'a> {
        RunPeriodPeriods::new(
            &self.data.buckets.get(Frequency::RunPeriod).period,
            self.data.timezone,
        )
    }

    pub fn annual_periods(&self) -> AnnualPeriods<'a> {
        AnnualPeriods::new(
            &self.data.buckets.get(Frequency::Annual).period,
            self.data.timezone,
        )
    }

    /// Every interval variable recorded in this environment.
    pub fn interval_variables(&self) -> Vec<IntervalVariable<'a>> {
        self.variable_entries(Frequency::Interval)
            .map(|(code, entry, store)| IntervalVariable::new(code, entry, store))
            .collect()
    }

    /// Look up one interval variable by report code.
    pub fn interval_variable(&self, report_code: u32) -> Result<IntervalVariable<'a>> {
        let (entry, store) = self.variable_entry(Frequency::Interval, report_code)?;
        Ok(IntervalVariable::new(report_code, entry, store))
    }

    /// Every daily variable recorded in this environment.
    pub fn daily_variables(&self) -> Vec<DailyVariable<'a>> {
        let periods = self.daily_periods();
        self.variable_entries(Frequency::Daily)
            .map(|(code, entry, store)| DailyVariable::new(code, entry, store, periods))
            .collect()
    }

    /// Look up one daily variable by report code.
    pub fn daily_variable(&self, report_code: u32) -> Result<DailyVariable<'a>> {
        let (entry, store) = self.variable_entry(Frequency::Daily, report_code)?;
        Ok(DailyVariable::new(
            report_code,
            entry,
            store,
            self.daily_periods(),
        ))
    }

    /// Every monthly variable recorded in this environment.
    pub fn monthly_variables(&self) -> Vec<MonthlyVariable<'a>> {
        let periods = self.monthly_periods();
        self.variable_entries(Frequency::Monthly)
            .map(|(code, entry, store)| MonthlyVariable::new(code, entry, store, periods))
            .collect()
    }

    /// Look up one monthly variable by report code.
    pub fn monthly_variable(&self, report_code: u32) -> Result<MonthlyVariable<'a>> {
        let (entry, store) = self.variable_entry(Frequency::Monthly, report_code)?;
        Ok(MonthlyVariable::new(
            report_code,
            entry,
            store,
            self.monthly_periods(),
        ))
    }

    /// Every run-period variable recorded in this environment.
    pub fn run_period_variables(&self) -> Vec<RunPeriodVariable<'a>> {
        self.variable_entries(Frequency::RunPeriod)
            .map(|(code, entry, store)| RunPeriodVariable::new(code, entry, store))
            .collect()
    }

    /// Look up one run-period variable by report code.
    pub fn run_period_variable(&self, report_code: u32) -> Result<RunPeriodVariable<'a>> {
        let (entry, store) = self.variable_entry(Frequency::RunPeriod, report_code)?;
        Ok(RunPeriodVariable::new(report_code, entry, store))
    }

    /// Every annual variable recorded in this environment.
    pub fn annual_variables(&self) -> Vec<AnnualVariable<'a>> {
        self.variable_entries(Frequency::Annual)
            .map(|(code, entry, store)| AnnualVariable::new(code, entry, store))
            .collect()
    }

    /// Look up one annual variable by report code.
    pub fn annual_variable(&self, report_code: u32) -> Result<AnnualVariable<'a>> {
        let (entry, store) = self.variable_entry(Frequency::Annual, report_code)?;
        Ok(AnnualVariable::new(report_code, entry, store))
    }

    fn variable_entries(
        &self,
        frequency: Frequency,
    ) -> impl Iterator<Item = (u32, &'a VariableItem, &'a ColumnStore)> + '_ {
        let dictionary = self.dictionary;
        self.data
            .buckets
            .get(frequency)
            .variables
            .iter()
            .filter_map(move |(&code, store)| {
                dictionary.variable(code).map(|entry| (code, entry, store))
            })
    }

    fn variable_entry(
        &self,
        frequency: Frequency,
        report_code: u32,
    ) -> Result<(&'a VariableItem, &'a ColumnStore)> {
        let store = self
            .data
            .buckets
            .get(frequency)
            .variables
            .get(&report_code)
            .ok_or(Error::ReportCodeNotFound {
                report_code,
                frequency,
            })?;
        let entry = self
            .dictionary
            .variable(report_code)
            .ok_or(Error::ReportCodeNotFound {
                report_code,
                frequency,
            })?;
        Ok((entry, store))
    }
}
