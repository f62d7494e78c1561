//
//  datamall
//  util/mod.rs
//
//  Copyright (c) 2026 The datamall developers. All rights reserved.
//

//! # Time Utilities
//!
//! Helpers for standardising all datetime-related values to SGT (Singapore
//! Time, UTC+08:00) and for recognising the loosely-typed temporal strings
//! the DataMall API returns.
//!
//! ## Categories
//!
//! - **Parsing**: [`temporal_from_string`] converts a wire-format string into
//!   a [`Temporal`] value, trying a fixed list of formats in order.
//! - **Normalisation**: [`datetime_as_sgt`] re-expresses any zoned datetime
//!   in SGT.
//! - **Validation**: [`date_is_within_last_three_months`] implements the
//!   month-window rule used by the passenger-volume endpoints.
//!
//! ## Example
//!
//! ```rust
//! use datamall::util::{temporal_from_string, Temporal};
//!
//! match temporal_from_string("2019-07-13 08:32:17") {
//!     Some(Temporal::DateTime(dt)) => println!("parsed {}", dt),
//!     _ => println!("not a datetime"),
//! }
//! ```

use chrono::{
    DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
    Utc,
};
use once_cell::sync::Lazy;

use crate::api::ApiError;

/// The fixed SGT offset (UTC+08:00). Singapore does not observe DST.
pub static SGT: Lazy<FixedOffset> =
    Lazy::new(|| FixedOffset::east_opt(8 * 3600).expect("+08:00 is a valid offset"));

/// Zoned datetime formats tried first when parsing a temporal string.
const ZONED_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%z", "%Y%m%dT%H:%M:%S%z"];

/// Naive datetime formats, interpreted as Singapore local time.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"];

/// A temporal value recovered from a wire-format string.
///
/// The variant reflects which components the original string carried:
/// a full datetime, a bare calendar date, or a clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    /// A full datetime, normalised to SGT.
    DateTime(DateTime<FixedOffset>),
    /// A calendar date with no time component.
    Date(NaiveDate),
    /// A clock time with no date component (4-digit `HHMM` strings).
    Time(NaiveTime),
}

/// Re-expresses a zoned datetime in SGT.
///
/// # Example
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use datamall::util::datetime_as_sgt;
///
/// let utc = Utc.with_ymd_and_hms(2019, 7, 1, 8, 0, 0).unwrap();
/// assert_eq!(datetime_as_sgt(utc).format("%H").to_string(), "16");
/// ```
pub fn datetime_as_sgt<Tz: TimeZone>(dt: DateTime<Tz>) -> DateTime<FixedOffset> {
    dt.with_timezone(&*SGT)
}

/// Today's date in Singapore.
pub fn today_sgt() -> NaiveDate {
    Utc::now().with_timezone(&*SGT).date_naive()
}

/// Parses a wire-format string into a [`Temporal`] value.
///
/// The recognised formats are tried in a fixed order, first match wins:
///
/// 1. `%Y-%m-%dT%H:%M:%S%z` (zoned)
/// 2. `%Y%m%dT%H:%M:%S%z` (zoned)
/// 3. `%Y-%m-%d %H:%M:%S%.f` (naive, taken as SGT)
/// 4. `%Y-%m-%d %H:%M:%S` (naive, taken as SGT)
/// 5. `%Y-%m-%d` (date only)
/// 6. `%H%M` (time only; accepted solely for strings of exactly 4 digits)
///
/// Zoned datetimes are converted to SGT; naive datetimes are assumed to
/// already be Singapore local time. Returns `None` when no format matches,
/// leaving numeric and plain-string interpretation to the caller.
pub fn temporal_from_string(val: &str) -> Option<Temporal> {
    for format in ZONED_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(val, format) {
            return Some(Temporal::DateTime(datetime_as_sgt(dt)));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(val, format) {
            if let LocalResult::Single(dt) = dt.and_local_timezone(*SGT) {
                return Some(Temporal::DateTime(dt));
            }
        }
    }

    if let Ok(d) = NaiveDate::parse_from_str(val, "%Y-%m-%d") {
        return Some(Temporal::Date(d));
    }

    // 4-digit times only; "530" or "12345" are not clock times
    if val.len() == 4 && val.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(t) = NaiveTime::parse_from_str(val, "%H%M") {
            return Some(Temporal::Time(t));
        }
    }

    None
}

/// Returns whether `check_date` falls inside the last-three-months window
/// relative to today in Singapore.
///
/// The window is a run of three whole calendar months. Which run depends on
/// `cutoff_day`, the day of the month when a "new month" begins: before the
/// cutoff the window shifts one month further back.
///
/// With `cutoff_day = 15`:
/// - between 1st and 14th September, the window is May through July;
/// - between 15th and 30th September, the window is June through August.
///
/// # Errors
///
/// Returns [`ApiError::Validation`] if `cutoff_day` is not a valid calendar
/// day.
pub fn date_is_within_last_three_months(
    check_date: NaiveDate,
    cutoff_day: u32,
) -> Result<bool, ApiError> {
    date_is_within_last_three_months_on(check_date, cutoff_day, today_sgt())
}

/// Window check against an explicit `today`, so the rule is testable
/// without freezing the clock.
fn date_is_within_last_three_months_on(
    check_date: NaiveDate,
    cutoff_day: u32,
    today: NaiveDate,
) -> Result<bool, ApiError> {
    if NaiveDate::from_ymd_opt(2019, 1, cutoff_day).is_none() {
        return Err(ApiError::Validation(format!(
            "cutoff_day {cutoff_day} is not a valid calendar day"
        )));
    }

    let mut start_year = today.year();
    // assume today is on or after the cutoff day
    let mut start_month = today.month() as i32 - 3;
    if today.day() < cutoff_day {
        start_month -= 1;
    }
    if start_month < 1 {
        start_month += 12;
        start_year -= 1;
    }

    let mut end_year = start_year;
    let mut end_month = start_month + 2;
    if end_month > 12 {
        end_month -= 12;
        end_year += 1;
    }

    let Some(window_start) = NaiveDate::from_ymd_opt(start_year, start_month as u32, 1) else {
        return Ok(false);
    };
    let Some(window_end) = last_day_of_month(end_year, end_month as u32) else {
        return Ok(false);
    };

    Ok(check_date >= window_start && check_date <= window_end)
}

/// Last day of the given month, or `None` for an invalid month.
fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1).map(|d| d.pred_opt().unwrap_or(d))
}
