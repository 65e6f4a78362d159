//! Calendar granularity and calendar-correct instant arithmetic.
//!
//! Port of Duckling's `TG.Grain` plus the `timePlus`/`timeRound` arithmetic
//! helpers from `Duckling.Time.Types`, generalized to operate directly on
//! instants rather than on `TimeObject`s (see [`crate::time_object`]).

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};

/// Calendar granularity, ordered from finest to coarsest.
///
/// The ordering is load-bearing: the composer (§4.5) and the field-runner
/// construction order (§4.3) both rely on `Grain: Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Grain {
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl Grain {
    /// Lowercase name, as rendered in the value JSON schema (§6).
    pub fn as_str(&self) -> &'static str {
        match self {
            Grain::Second => "second",
            Grain::Minute => "minute",
            Grain::Hour => "hour",
            Grain::Day => "day",
            Grain::Week => "week",
            Grain::Month => "month",
            Grain::Quarter => "quarter",
            Grain::Year => "year",
        }
    }
}

/// Truncate `dt` down to the start of the grain period containing it.
///
/// `Week` rounds to the Monday of the ISO week (time-of-day zeroed by
/// rounding to `Day` first); `Quarter` rounds to `Month` then subtracts
/// `(month - 1) % 3` months.
pub fn grain_start(dt: DateTime<Utc>, grain: Grain) -> DateTime<Utc> {
    match grain {
        Grain::Second => dt
            .date_naive()
            .and_hms_opt(dt.hour(), dt.minute(), dt.second())
            .unwrap()
            .and_utc(),
        Grain::Minute => dt
            .date_naive()
            .and_hms_opt(dt.hour(), dt.minute(), 0)
            .unwrap()
            .and_utc(),
        Grain::Hour => dt
            .date_naive()
            .and_hms_opt(dt.hour(), 0, 0)
            .unwrap()
            .and_utc(),
        Grain::Day => midnight(dt),
        Grain::Week => start_of_week(dt),
        Grain::Month => start_of_month(dt),
        Grain::Quarter => start_of_quarter(dt),
        Grain::Year => start_of_year(dt),
    }
}

fn midnight(dt: DateTime<Utc>) -> DateTime<Utc> {
    dt.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc()
}

fn start_of_week(dt: DateTime<Utc>) -> DateTime<Utc> {
    let dow = dt.weekday().num_days_from_monday();
    midnight(dt - Duration::days(dow as i64))
}

fn start_of_month(dt: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(dt.year(), dt.month(), 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

fn start_of_year(dt: DateTime<Utc>) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(dt.year(), 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

fn start_of_quarter(dt: DateTime<Utc>) -> DateTime<Utc> {
    let months_into_quarter = (dt.month() - 1) % 3;
    let month = dt.month() - months_into_quarter;
    NaiveDate::from_ymd_opt(dt.year(), month, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
}

/// Shift `dt` by `n` units of `grain`. Calendar-correct for `Month`/`Quarter`/
/// `Year` (clamps day-of-month to the last valid day of the target month);
/// a wall-clock duration shift for `Day`/`Week`/`Hour`/`Minute`/`Second`.
pub fn add_grain(dt: DateTime<Utc>, grain: Grain, n: i64) -> DateTime<Utc> {
    match grain {
        Grain::Second => dt + Duration::seconds(n),
        Grain::Minute => dt + Duration::minutes(n),
        Grain::Hour => dt + Duration::hours(n),
        Grain::Day => dt + Duration::days(n),
        Grain::Week => dt + Duration::days(n.saturating_mul(7)),
        Grain::Month => add_months(dt, n),
        Grain::Quarter => add_months(dt, n.saturating_mul(3)),
        Grain::Year => add_years(dt, n),
    }
}

fn add_months(dt: DateTime<Utc>, months: i64) -> DateTime<Utc> {
    let total = (dt.year() as i64)
        .saturating_mul(12)
        .saturating_add(dt.month() as i64 - 1)
        .saturating_add(months);
    let year = total.div_euclid(12) as i32;
    let month = (total.rem_euclid(12) + 1) as u32;
    let day = dt.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap()
        .and_hms_opt(dt.hour(), dt.minute(), dt.second())
        .unwrap()
        .and_utc()
}

fn add_years(dt: DateTime<Utc>, years: i64) -> DateTime<Utc> {
    let year = dt.year().saturating_add(years as i32);
    let day = dt.day().min(days_in_month(year, dt.month()));
    NaiveDate::from_ymd_opt(year, dt.month(), day)
        .unwrap()
        .and_hms_opt(dt.hour(), dt.minute(), dt.second())
        .unwrap()
        .and_utc()
}

/// Number of days the given Gregorian month has, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => unreachable!("month out of 1..=12 range"),
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}
