//! Month iteration — pure calendar arithmetic, no local timezone.
//!
//! RULE: dates are always built with `NaiveDate::from_ymd_opt`.
//! Constructing dates through a local-timezone clock shifts day
//! boundaries and is disallowed everywhere in this crate.
//!
//! Weekday numbering follows the roster convention:
//! 0 = Sunday .. 6 = Saturday.

use chrono::{Datelike, NaiveDate};

pub const SUNDAY: u32 = 0;
pub const SATURDAY: u32 = 6;

/// Number of days in the given month (`month0` is 0 = January).
pub fn days_in_month(year: i32, month0: u32) -> u32 {
    let (next_year, next_month) = if month0 >= 11 {
        (year + 1, 1)
    } else {
        (year, month0 + 2)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(0)
}

/// Weekday of `date`, 0 = Sunday .. 6 = Saturday.
pub fn weekday0(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

/// Invoke `f(date, weekday)` for every working day of the month,
/// day 1 through the last day, skipping Sundays entirely.
pub fn for_each_working_day<F>(year: i32, month0: u32, mut f: F)
where
    F: FnMut(NaiveDate, u32),
{
    for day in 1..=days_in_month(year, month0) {
        let Some(date) = NaiveDate::from_ymd_opt(year, month0 + 1, day) else {
            continue;
        };
        let weekday = weekday0(date);
        if weekday == SUNDAY {
            continue;
        }
        f(date, weekday);
    }
}
