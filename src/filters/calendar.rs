//! UTC calendar periods used by time-bucket drilldowns.

use chrono::{Datelike, Days, Months, NaiveDate, TimeZone, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds covered by the default daily bucket, exclusive of its last second.
pub const DAY_SPAN: i64 = 86_399;

/// Granularity of a trend bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Interval {
    Day,
    Week,
    BiWeek,
    Month,
    Quarter,
    Year,
}

impl Interval {
    /// Parses the interval names widgets store, tolerating their historical spellings.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "day" | "daily" | "day_of_week" => Some(Self::Day),
            "week" | "weekly" => Some(Self::Week),
            "bi_week" | "biweekly" | "bi-weekly" | "bi_weekly" => Some(Self::BiWeek),
            "month" | "monthly" => Some(Self::Month),
            "quarter" | "quarterly" => Some(Self::Quarter),
            "year" | "yearly" => Some(Self::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::BiWeek => "bi_week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Week, month and quarter buckets: the granularities that reshape backlog reports.
    pub fn is_coarse(&self) -> bool {
        matches!(self, Self::Week | Self::Month | Self::Quarter)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn date_of(ts: i64) -> Option<NaiveDate> {
    Utc.timestamp_opt(ts, 0).single().map(|dt| dt.date_naive())
}

fn midnight(date: NaiveDate) -> Option<i64> {
    date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp())
}

fn week_start(date: NaiveDate, first_day: Weekday) -> Option<NaiveDate> {
    let offset = (date.weekday().num_days_from_monday() + 7 - first_day.num_days_from_monday()) % 7;
    date.checked_sub_days(Days::new(u64::from(offset)))
}

/// Inclusive `(start, end)` epoch seconds of the `interval` period containing `ts`.
///
/// `end` is one second before the next period starts. Weeks begin on `first_day`.
pub fn period_bounds(ts: i64, interval: Interval, first_day: Weekday) -> Option<(i64, i64)> {
    let date = date_of(ts)?;
    let (start, next) = match interval {
        Interval::Day => (date, date.checked_add_days(Days::new(1))?),
        Interval::Week => {
            let start = week_start(date, first_day)?;
            (start, start.checked_add_days(Days::new(7))?)
        }
        Interval::BiWeek => {
            let start = week_start(date, first_day)?;
            (start, start.checked_add_days(Days::new(14))?)
        }
        Interval::Month => {
            let start = date.with_day(1)?;
            (start, start.checked_add_months(Months::new(1))?)
        }
        Interval::Quarter => {
            let first_month = (date.month0() / 3) * 3 + 1;
            let start = NaiveDate::from_ymd_opt(date.year(), first_month, 1)?;
            (start, start.checked_add_months(Months::new(3))?)
        }
        Interval::Year => {
            let start = NaiveDate::from_ymd_opt(date.year(), 1, 1)?;
            (start, start.checked_add_months(Months::new(12))?)
        }
    };
    Some((midnight(start)?, midnight(next)? - 1))
}

/// Last second of the UTC day containing `ts`.
pub fn end_of_day(ts: i64) -> Option<i64> {
    period_bounds(ts, Interval::Day, Weekday::Mon).map(|(_, end)| end)
}
