//! Period accessors: one per reporting frequency.
//!
//! Each frequency's period rows have their own shape and their own rule
//! for reconstructing calendar timestamps. Interval, daily, monthly and
//! run-period rows carry no year, so their timestamps are anchored to a
//! conventional year; annual rows carry the real calendar year. All
//! derived timestamps use the owning environment's fixed-offset timezone.
//!
//! Timestamps are computed on demand from the raw columns, not cached;
//! the arithmetic is linear in the number of periods.

use chrono::{DateTime, Duration, FixedOffset, Months, NaiveDate, NaiveTime};

use super::columns::{parse_ints, ColumnStore};
use crate::error::{Error, Result};

/// Conventional anchor year for period rows that carry no year of their own.
pub const ANCHOR_YEAR: i64 = 2001;

/// Build a timezone-aware timestamp from raw (possibly out-of-range)
/// calendar components.
pub(crate) fn make_datetime(
    timezone: FixedOffset,
    year: i64,
    month: i64,
    day: i64,
    hour: i64,
    minute: i64,
) -> Result<DateTime<FixedOffset>> {
    let invalid_date = Error::InvalidDate { year, month, day };
    let y = i32::try_from(year).map_err(|_| Error::InvalidDate { year, month, day })?;
    let m = u32::try_from(month).map_err(|_| Error::InvalidDate { year, month, day })?;
    let d = u32::try_from(day).map_err(|_| Error::InvalidDate { year, month, day })?;
    let date = NaiveDate::from_ymd_opt(y, m, d).ok_or(invalid_date)?;

    let h = u32::try_from(hour).map_err(|_| Error::InvalidTime { hour, minute })?;
    let mi = u32::try_from(minute).map_err(|_| Error::InvalidTime { hour, minute })?;
    let time = NaiveTime::from_hms_opt(h, mi, 0).ok_or(Error::InvalidTime { hour, minute })?;

    // A fixed offset maps every local time to exactly one instant.
    date.and_time(time)
        .and_local_timezone(timezone)
        .single()
        .ok_or(Error::InvalidDate { year, month, day })
}

/// Interval (timestep/hourly) periods: report code 2.
///
/// Row shape: day-of-simulation, month, day-of-month, DST indicator,
/// hour (1-indexed), start minute, end minute, day type.
#[derive(Debug, Clone, Copy)]
pub struct IntervalPeriods<'a> {
    store: &'a ColumnStore,
    timezone: FixedOffset,
}

impl<'a> IntervalPeriods<'a> {
    pub(crate) fn new(store: &'a ColumnStore, timezone: FixedOffset) -> Self {
        Self { store, timezone }
    }

    /// Number of recorded interval periods.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn days_of_simulation(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(0), "interval day of simulation")
    }

    pub fn months(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(1), "interval month")
    }

    pub fn days_of_month(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(2), "interval day of month")
    }

    pub fn dst_indicators(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(3), "interval DST indicator")
    }

    /// Hours as recorded in the file, 1-indexed.
    pub fn hours(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(4), "interval hour")
    }

    pub fn start_minutes(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(5), "interval start minute")
    }

    pub fn end_minutes(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(6), "interval end minute")
    }

    pub fn day_types(&self) -> Vec<String> {
        self.store.column(7).to_vec()
    }

    /// Start times: anchor year, recorded month/day, hour shifted from
    /// the file's 1-indexed convention, start minute.
    pub fn start_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        let months = self.months()?;
        let days = self.days_of_month()?;
        let hours = self.hours()?;
        let minutes = self.start_minutes()?;
        months
            .iter()
            .zip(&days)
            .zip(&hours)
            .zip(&minutes)
            .map(|(((&month, &day), &hour), &minute)| {
                make_datetime(self.timezone, ANCHOR_YEAR, month, day, hour - 1, minute)
            })
            .collect()
    }

    /// End times: start plus the recorded start/end minute difference.
    pub fn end_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        let starts = self.start_times()?;
        let start_minutes = self.start_minutes()?;
        let end_minutes = self.end_minutes()?;
        Ok(starts
            .into_iter()
            .zip(start_minutes)
            .zip(end_minutes)
            .map(|((start, s), e)| start + Duration::minutes(e - s))
            .collect())
    }

    /// The reporting interval, taken from the first period and assumed
    /// constant across the bucket. Files that change interval mid-run are
    /// not supported and will be mislabelled.
    pub fn interval(&self) -> Result<Option<Duration>> {
        let start_minutes = self.start_minutes()?;
        let end_minutes = self.end_minutes()?;
        Ok(start_minutes
            .first()
            .zip(end_minutes.first())
            .map(|(&s, &e)| Duration::minutes(e - s)))
    }
}

/// Daily periods: report code 3.
///
/// Row shape: cumulative days of simulation, month, day-of-month,
/// DST indicator, day type.
#[derive(Debug, Clone, Copy)]
pub struct DailyPeriods<'a> {
    store: &'a ColumnStore,
    timezone: FixedOffset,
}

impl<'a> DailyPeriods<'a> {
    pub(crate) fn new(store: &'a ColumnStore, timezone: FixedOffset) -> Self {
        Self { store, timezone }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn cumulative_days_of_simulation(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(0), "daily cumulative day of simulation")
    }

    pub fn months(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(1), "daily month")
    }

    pub fn days_of_month(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(2), "daily day of month")
    }

    pub fn dst_indicators(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(3), "daily DST indicator")
    }

    pub fn day_types(&self) -> Vec<String> {
        self.store.column(4).to_vec()
    }

    /// Start times: midnight of the recorded day in the anchor year.
    pub fn start_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        let months = self.months()?;
        let days = self.days_of_month()?;
        months
            .iter()
            .zip(&days)
            .map(|(&month, &day)| make_datetime(self.timezone, ANCHOR_YEAR, month, day, 0, 0))
            .collect()
    }

    /// End times: one day after the start.
    pub fn end_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        Ok(self
            .start_times()?
            .into_iter()
            .map(|start| start + Duration::days(1))
            .collect())
    }

    /// Daily periods are always one day long.
    pub fn interval(&self) -> Duration {
        Duration::days(1)
    }
}

/// Monthly periods: report code 4.
///
/// Row shape: cumulative days of simulation, month.
#[derive(Debug, Clone, Copy)]
pub struct MonthlyPeriods<'a> {
    store: &'a ColumnStore,
    timezone: FixedOffset,
}

impl<'a> MonthlyPeriods<'a> {
    pub(crate) fn new(store: &'a ColumnStore, timezone: FixedOffset) -> Self {
        Self { store, timezone }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn cumulative_days_of_simulation(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(0), "monthly cumulative day of simulation")
    }

    pub fn months(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(1), "monthly month")
    }

    /// Start times: first of the recorded month in the anchor year.
    pub fn start_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        let months = self.months()?;
        months
            .iter()
            .map(|&month| make_datetime(self.timezone, ANCHOR_YEAR, month, 1, 0, 0))
            .collect()
    }

    /// End times: start plus the true calendar length of that month, so a
    /// December period ends on the first of January.
    pub fn end_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        let months = self.months()?;
        self.start_times()?
            .into_iter()
            .zip(months)
            .map(|(start, month)| {
                start
                    .checked_add_months(Months::new(1))
                    .ok_or(Error::InvalidDate {
                        year: ANCHOR_YEAR,
                        month,
                        day: 1,
                    })
            })
            .collect()
    }
}

/// Run-period periods: report code 5.
///
/// Row shape: cumulative days of simulation. Run periods are open-ended
/// and have no defined end time.
#[derive(Debug, Clone, Copy)]
pub struct RunPeriodPeriods<'a> {
    store: &'a ColumnStore,
    timezone: FixedOffset,
}

impl<'a> RunPeriodPeriods<'a> {
    pub(crate) fn new(store: &'a ColumnStore, timezone: FixedOffset) -> Self {
        Self { store, timezone }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn cumulative_days_of_simulation(&self) -> Result<Vec<i64>> {
        parse_ints(
            self.store.column(0),
            "run period cumulative day of simulation",
        )
    }

    /// Start times: the first of January of the anchor year, offset by the
    /// cumulative day count minus one.
    pub fn start_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        let days = self.cumulative_days_of_simulation()?;
        days.iter()
            .map(|&day| {
                let origin = make_datetime(self.timezone, ANCHOR_YEAR, 1, 1, 0, 0)?;
                Ok(origin + Duration::days(day - 1))
            })
            .collect()
    }
}

/// Annual periods: report code 6.
///
/// Row shape: calendar year of simulation. Unlike the other frequencies,
/// annual periods carry a real year.
#[derive(Debug, Clone, Copy)]
pub struct AnnualPeriods<'a> {
    store: &'a ColumnStore,
    timezone: FixedOffset,
}

impl<'a> AnnualPeriods<'a> {
    pub(crate) fn new(store: &'a ColumnStore, timezone: FixedOffset) -> Self {
        Self { store, timezone }
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn calendar_years_of_simulation(&self) -> Result<Vec<i64>> {
        parse_ints(self.store.column(0), "annual calendar year")
    }

    /// Start times: the first of January of the recorded calendar year.
    pub fn start_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        let years = self.calendar_years_of_simulation()?;
        years
            .iter()
            .map(|&year| make_datetime(self.timezone, year, 1, 1, 0, 0))
            .collect()
    }

    /// End times: the first of January of the following year.
    pub fn end_times(&self) -> Result<Vec<DateTime<FixedOffset>>> {
        let years = self.calendar_years_of_simulation()?;
        years
            .iter()
            .map(|&year| make_datetime(self.timezone, year + 1, 1, 1, 0, 0))
            .collect()
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

    #[test]
    fn test_interval_start_times_shift_one_indexed_hour() {
        let store = store_with(&[
            &["1", "12", "21", "0", "1", "0.00", "60.00", "WinterDesignDay"],
            &["1", "12", "21", "0", "2", "0.00", "60.00", "WinterDesignDay"],
        ]);
        let periods = IntervalPeriods::new(&store, utc());
        let starts = periods.start_times().unwrap();
        assert_eq!(
            starts[0],
            Utc.with_ymd_and_hms(2001, 12, 21, 0, 0, 0).unwrap()
        );
        assert_eq!(
            starts[1],
            Utc.with_ymd_and_hms(2001, 12, 21, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_interval_end_times_and_interval() {
        let store = store_with(&[&[
            "1", "7", "4", "0", "10", "15.00", "30.00", "SummerDesignDay",
        ]]);
        let periods = IntervalPeriods::new(&store, utc());
        let starts = periods.start_times().unwrap();
        let ends = periods.end_times().unwrap();
        assert_eq!(ends[0] - starts[0], Duration::minutes(15));
        assert_eq!(periods.interval().unwrap(), Some(Duration::minutes(15)));
    }

    #[test]
    fn test_interval_timezone_offset_carried() {
        let tz = FixedOffset::east_opt(-7 * 3600).unwrap();
        let store = store_with(&[&[
            "1", "12", "21", "0", "1", "0.00", "60.00", "WinterDesignDay",
        ]]);
        let periods = IntervalPeriods::new(&store, tz);
        let starts = periods.start_times().unwrap();
        assert_eq!(starts[0].offset(), &tz);
        assert_eq!(
            starts[0],
            tz.with_ymd_and_hms(2001, 12, 21, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_daily_periods() {
        let store = store_with(&[
            &["1", "12", "21", "0", "WinterDesignDay"],
            &["2", "12", "22", "0", "WinterDesignDay"],
        ]);
        let periods = DailyPeriods::new(&store, utc());
        assert_eq!(periods.cumulative_days_of_simulation().unwrap(), vec![1, 2]);
        assert_eq!(
            periods.day_types(),
            vec!["WinterDesignDay", "WinterDesignDay"]
        );
        let starts = periods.start_times().unwrap();
        let ends = periods.end_times().unwrap();
        assert_eq!(
            starts[0],
            Utc.with_ymd_and_hms(2001, 12, 21, 0, 0, 0).unwrap()
        );
        assert_eq!(ends[0], Utc.with_ymd_and_hms(2001, 12, 22, 0, 0, 0).unwrap());
        assert_eq!(periods.interval(), Duration::days(1));
    }

    #[test]
    fn test_monthly_end_times_use_calendar_month_length() {
        let store = store_with(&[&["334", "12"], &["31", "2"]]);
        let periods = MonthlyPeriods::new(&store, utc());
        let ends = periods.end_times().unwrap();
        // December runs 31 days into January of the next year.
        assert_eq!(ends[0], Utc.with_ymd_and_hms(2002, 1, 1, 0, 0, 0).unwrap());
        // Non-leap February is 28 days.
        assert_eq!(ends[1], Utc.with_ymd_and_hms(2001, 3, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_run_period_start_times() {
        let store = store_with(&[&["1"], &["32"]]);
        let periods = RunPeriodPeriods::new(&store, utc());
        let starts = periods.start_times().unwrap();
        assert_eq!(starts[0], Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(starts[1], Utc.with_ymd_and_hms(2001, 2, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_annual_periods_use_real_year() {
        let store = store_with(&[&["2017"]]);
        let periods = AnnualPeriods::new(&store, utc());
        assert_eq!(
            periods.start_times().unwrap()[0],
            Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            periods.end_times().unwrap()[0],
            Utc.with_ymd_and_hms(2018, 1, 1, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_empty_store_yields_empty_sequences() {
        let store = store_with(&[]);
        let periods = IntervalPeriods::new(&store, utc());
        assert!(periods.is_empty());
        assert!(periods.start_times().unwrap().is_empty());
        assert!(periods.end_times().unwrap().is_empty());
        assert_eq!(periods.interval().unwrap(), None);
    }

    #[test]
    fn test_invalid_month_is_a_date_error() {
        let store = store_with(&[&["1", "13", "1", "0", "Monday"]]);
        let periods = DailyPeriods::new(&store, utc());
        let err = periods.start_times().unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::InvalidDate { month: 13, .. }
        ));
    }
}
