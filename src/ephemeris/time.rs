use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::Serialize;

use crate::error::{PipelineError, PipelineResult};

/// Earliest year accepted. The integer day-number formula needs a positive
/// Julian Day Number.
pub const MIN_YEAR: i32 = -4712;
pub const MAX_YEAR: i32 = 9999;

/// Greenwich Mean Time of day, whole seconds. Leap seconds (`:60`) are not
/// representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gmt {
    hour: u32,
    minute: u32,
    second: u32,
}

impl Gmt {
    pub fn new(hour: u32, minute: u32, second: u32) -> PipelineResult<Self> {
        if hour > 23 {
            return Err(PipelineError::input_range("hour", hour as f64, "expected 0-23"));
        }
        if minute > 59 {
            return Err(PipelineError::input_range("minute", minute as f64, "expected 0-59"));
        }
        if second > 59 {
            return Err(PipelineError::input_range("second", second as f64, "expected 0-59"));
        }
        Ok(Self {
            hour,
            minute,
            second,
        })
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn second(&self) -> u32 {
        self.second
    }

    pub fn fractional_hours(&self) -> f64 {
        self.hour as f64 + (self.minute as f64 + self.second as f64 / 60.0) / 60.0
    }

    fn seconds_from_midnight(&self) -> u32 {
        self.hour * 3600 + self.minute * 60 + self.second
    }
}

/// A UTC instant at whole-second resolution: calendar day plus time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Timestamp {
    date: NaiveDate,
    gmt: Gmt,
}

impl Timestamp {
    /// Build from a year and a 1-based day-of-year index (1 = January 1st).
    pub fn new(year: i32, day_of_year: u32, gmt: Gmt) -> PipelineResult<Self> {
        check_year(year)?;
        let date = NaiveDate::from_yo_opt(year, day_of_year).ok_or_else(|| {
            PipelineError::input_range(
                "day_of_year",
                day_of_year as f64,
                "outside the days of this year",
            )
        })?;
        Ok(Self { date, gmt })
    }

    pub fn from_calendar(year: i32, month: u32, day: u32, gmt: Gmt) -> PipelineResult<Self> {
        check_year(year)?;
        if !(1..=12).contains(&month) {
            return Err(PipelineError::input_range("month", month as f64, "expected 1-12"));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            PipelineError::input_range("day", day as f64, "outside the days of this month")
        })?;
        Ok(Self { date, gmt })
    }

    /// Truncates any sub-second part. A leap second collapses onto `:59`.
    pub fn from_datetime(datetime: &DateTime<Utc>) -> PipelineResult<Self> {
        let gmt = Gmt::new(
            datetime.hour(),
            datetime.minute(),
            datetime.second().min(59),
        )?;
        Self::new(datetime.year(), datetime.ordinal(), gmt)
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }

    pub fn day_of_year(&self) -> u32 {
        self.date.ordinal()
    }

    pub fn gmt(&self) -> Gmt {
        self.gmt
    }

    pub fn naive_utc(&self) -> NaiveDateTime {
        let seconds = self.gmt.seconds_from_midnight();
        let time = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0).unwrap_or_default();
        self.date.and_time(time)
    }

    /// Julian Date, continuous day count from noon 4713 BC-01-01 (Julian
    /// calendar), with the time of day as the fractional part.
    pub fn julian_date(&self) -> f64 {
        let jdn = julian_day_number(self.year(), self.month(), self.day());
        jdn as f64 - 0.5 + self.gmt.fractional_hours() / 24.0
    }
}

fn check_year(year: i32) -> PipelineResult<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(PipelineError::input_range(
            "year",
            year as f64,
            "outside the supported calendar range",
        ));
    }
    Ok(())
}

/// Julian Day Number at noon of a proleptic Gregorian date (Fliegel & Van
/// Flandern, 1968). Divisions truncate toward zero.
pub fn julian_day_number(year: i32, month: u32, day: u32) -> i64 {
    let (y, m, d) = (year as i64, month as i64, day as i64);
    let a = (m - 14) / 12;
    d - 32075 + 1461 * (y + 4800 + a) / 4 + 367 * (m - 2 - a * 12) / 12
        - 3 * ((y + 4900 + a) / 100) / 4
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    fn gmt(h: u32, m: u32, s: u32) -> Gmt {
        Gmt::new(h, m, s).unwrap()
    }

    #[test]
    fn test_j2000_epoch() {
        let ts = Timestamp::from_calendar(2000, 1, 1, gmt(12, 0, 0)).unwrap();
        assert_eq!(ts.julian_date(), 2451545.0);
    }

    #[test]
    fn test_modified_julian_date_origin() {
        let ts = Timestamp::from_calendar(1858, 11, 17, gmt(0, 0, 0)).unwrap();
        assert_eq!(ts.julian_date(), 2400000.5);
    }

    #[test]
    fn test_leap_day_is_one_day_after_feb_28() {
        let feb28 = Timestamp::from_calendar(2024, 2, 28, gmt(0, 0, 0)).unwrap();
        let feb29 = Timestamp::from_calendar(2024, 2, 29, gmt(0, 0, 0)).unwrap();
        let mar01 = Timestamp::from_calendar(2024, 3, 1, gmt(0, 0, 0)).unwrap();
        assert_eq!(feb29.julian_date() - feb28.julian_date(), 1.0);
        assert_eq!(mar01.julian_date() - feb29.julian_date(), 1.0);
        assert_eq!(mar01.julian_date(), 2460370.5);
    }

    #[test]
    fn test_century_rule() {
        // 1900 is not a leap year, so Feb 28 -> Mar 1 is a single day.
        let feb28 = Timestamp::from_calendar(1900, 2, 28, gmt(0, 0, 0)).unwrap();
        let mar01 = Timestamp::from_calendar(1900, 3, 1, gmt(0, 0, 0)).unwrap();
        assert_eq!(mar01.julian_date() - feb28.julian_date(), 1.0);
        assert!(Timestamp::from_calendar(1900, 2, 29, gmt(0, 0, 0)).is_err());
    }

    #[test]
    fn test_day_of_year_matches_calendar() {
        let by_ordinal = Timestamp::new(2014, 169, gmt(10, 10, 10)).unwrap();
        let by_calendar = Timestamp::from_calendar(2014, 6, 18, gmt(10, 10, 10)).unwrap();
        assert_eq!(by_ordinal, by_calendar);
        assert_eq!(by_calendar.day_of_year(), 169);
        assert!(Timestamp::new(2023, 366, gmt(0, 0, 0)).is_err());
        assert!(Timestamp::new(2024, 366, gmt(0, 0, 0)).is_ok());
        assert!(Timestamp::new(2024, 0, gmt(0, 0, 0)).is_err());
    }

    #[test]
    fn test_time_of_day_fraction() {
        let ts = Timestamp::from_calendar(2000, 1, 1, gmt(18, 0, 0)).unwrap();
        assert_abs_diff_eq!(ts.julian_date(), 2451545.25, epsilon = 1e-9);
        assert_abs_diff_eq!(gmt(10, 30, 36).fractional_hours(), 10.51, epsilon = 1e-12);
    }

    #[test]
    fn test_gmt_range() {
        assert!(Gmt::new(24, 0, 0).is_err());
        assert!(Gmt::new(0, 60, 0).is_err());
        assert!(Gmt::new(0, 0, 60).is_err());
        assert!(Gmt::new(23, 59, 59).is_ok());
    }

    #[test]
    fn test_year_range() {
        assert!(Timestamp::new(MIN_YEAR - 1, 1, gmt(0, 0, 0)).is_err());
        assert!(Timestamp::new(MAX_YEAR + 1, 1, gmt(0, 0, 0)).is_err());
    }

    #[test]
    fn test_from_datetime() {
        let dt = Utc.with_ymd_and_hms(2014, 6, 18, 10, 10, 10).unwrap();
        let ts = Timestamp::from_datetime(&dt).unwrap();
        assert_eq!(ts.naive_utc(), dt.naive_utc());
        assert_eq!(ts.day_of_year(), 169);
        assert_eq!(ts.gmt().second(), 10);
    }
}
