//! Date and time arithmetic for attendance evaluation.
//!
//! This module validates the date and time strings accepted at the
//! boundary and measures overtime, tardiness and undertime against a
//! scheduled shift. Shifts may wrap past midnight, so both the scheduled
//! end and the recorded clock times are corrected onto the right calendar
//! day before they are compared.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{Overtime, ShiftDefinition, round_currency};

/// Accepted date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Accepted time formats, tried in order.
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// A clock-in this far before the scheduled start is read as the next day.
const CLOCK_IN_WRAP_HOURS: i64 = 12;

/// Returns true if `value` is a `YYYY-MM-DD` calendar date.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::validate_date;
///
/// assert!(validate_date("2026-03-02"));
/// assert!(!validate_date("2026-02-30"));
/// assert!(!validate_date("03/02/2026"));
/// ```
pub fn validate_date(value: &str) -> bool {
    parse_date(value).is_ok()
}

/// Returns true if `value` is absent, empty, or a 24-hour `HH:MM[:SS]` time.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::validate_time;
///
/// assert!(validate_time(None));
/// assert!(validate_time(Some("")));
/// assert!(validate_time(Some("07:30")));
/// assert!(validate_time(Some("22:00:00")));
/// assert!(!validate_time(Some("25:00")));
/// ```
pub fn validate_time(value: Option<&str>) -> bool {
    parse_optional_time(value).is_ok()
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| EngineError::InvalidDate {
        value: value.to_string(),
    })
}

/// Parses an `HH:MM` or `HH:MM:SS` time.
pub fn parse_time(value: &str) -> EngineResult<NaiveTime> {
    let trimmed = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| EngineError::InvalidTime {
            value: value.to_string(),
        })
}

/// Parses an optional time; absent or empty means "not recorded".
pub fn parse_optional_time(value: Option<&str>) -> EngineResult<Option<NaiveTime>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => parse_time(v).map(Some),
    }
}

/// The absolute start and end instants of a shift worked on `date`.
///
/// The end moves to the next day for overnight shifts.
pub fn shift_window(shift: &ShiftDefinition, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    let start = date.and_time(shift.start_time);
    let mut end = date.and_time(shift.end_time);
    if end <= start {
        end += Duration::days(1);
    }
    (start, end)
}

/// Places a clock-out on the calendar, moving it past midnight when it
/// falls at or before the shift start.
fn corrected_time_out(start: NaiveDateTime, date: NaiveDate, time_out: NaiveTime) -> NaiveDateTime {
    let out = date.and_time(time_out);
    if out <= start {
        out + Duration::days(1)
    } else {
        out
    }
}

fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> Decimal {
    let seconds = (to - from).num_seconds().max(0);
    round_currency(Decimal::new(seconds, 0) / Decimal::new(3600, 0))
}

fn minutes_between(from: NaiveDateTime, to: NaiveDateTime) -> Decimal {
    let seconds = (to - from).num_seconds().max(0);
    round_currency(Decimal::new(seconds, 0) / Decimal::new(60, 0))
}

/// Overtime for a recorded clock-out, in hours rounded to 2 decimal places.
///
/// Returns [`Overtime::Unknown`] when no clock-out was recorded.
pub fn overtime(shift: &ShiftDefinition, date: NaiveDate, time_out: Option<NaiveTime>) -> Overtime {
    let Some(time_out) = time_out else {
        return Overtime::Unknown;
    };
    let (start, end) = shift_window(shift, date);
    let out = corrected_time_out(start, date, time_out);
    if out <= end {
        Overtime::Hours(Decimal::ZERO)
    } else {
        Overtime::Hours(hours_between(end, out))
    }
}

/// Overtime for a clock-out given as a string.
///
/// Absent, empty or unparsable input yields [`Overtime::Unknown`]; it is
/// never coerced to zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::overtime_hours;
/// use payroll_engine::models::{Overtime, ShiftDefinition};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let night = ShiftDefinition {
///     label: "Night Shift".to_string(),
///     start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
///     end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
/// };
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
///
/// assert_eq!(overtime_hours(&night, date, Some("07:30")), Overtime::Hours(Decimal::new(15, 1)));
/// assert_eq!(overtime_hours(&night, date, Some("05:00")), Overtime::Hours(Decimal::ZERO));
/// assert_eq!(overtime_hours(&night, date, None), Overtime::Unknown);
/// ```
pub fn overtime_hours(
    shift: &ShiftDefinition,
    date: NaiveDate,
    actual_time_out: Option<&str>,
) -> Overtime {
    match parse_optional_time(actual_time_out) {
        Ok(time_out) => overtime(shift, date, time_out),
        Err(_) => Overtime::Unknown,
    }
}

/// Minutes between the scheduled start and a later clock-in.
///
/// A clock-in more than twelve hours before the start is read as an
/// after-midnight arrival for that shift.
pub fn tardiness_minutes(shift: &ShiftDefinition, date: NaiveDate, time_in: NaiveTime) -> Decimal {
    let (start, _) = shift_window(shift, date);
    let mut arrived = date.and_time(time_in);
    if start - arrived > Duration::hours(CLOCK_IN_WRAP_HOURS) {
        arrived += Duration::days(1);
    }
    minutes_between(start, arrived)
}

/// Minutes between an early clock-out and the scheduled end.
///
/// The clock-out gets the same midnight correction as overtime.
pub fn undertime_minutes(
    shift: &ShiftDefinition,
    date: NaiveDate,
    time_out: NaiveTime,
) -> Decimal {
    let (start, end) = shift_window(shift, date);
    let out = corrected_time_out(start, date, time_out);
    minutes_between(out, end)
}
