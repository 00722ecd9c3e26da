//! Calendar month ranges and semi-monthly pay periods.
//!
//! This module contains the [`DateRange`] and [`PayPeriod`] types used to
//! restrict schedules, attendance and payroll figures to a window of dates.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An inclusive range of calendar dates.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange::month(2024, 2).unwrap();
/// assert_eq!(range.end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
/// assert!(range.contains(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First date (inclusive).
    pub start: NaiveDate,
    /// Last date (inclusive).
    pub end: NaiveDate,
}

impl DateRange {
    /// The full calendar month.
    pub fn month(year: i32, month: u32) -> EngineResult<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(EngineError::InvalidMonth { month, year })?;
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .ok_or(EngineError::InvalidMonth { month, year })?;
        Ok(Self { start, end })
    }

    /// Checks if a date falls inside the range (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates over every date in the range, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

/// Which half of the month a pay period covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodHalf {
    /// From the 1st to the cutoff day.
    First,
    /// From the day after the cutoff to the end of the month.
    Second,
}

impl PeriodHalf {
    /// Maps the period number used by callers (1 or 2).
    pub fn from_number(period: u8) -> EngineResult<Self> {
        match period {
            1 => Ok(PeriodHalf::First),
            2 => Ok(PeriodHalf::Second),
            _ => Err(EngineError::InvalidPeriod { period }),
        }
    }

    /// The period number (1 or 2).
    pub fn number(&self) -> u8 {
        match self {
            PeriodHalf::First => 1,
            PeriodHalf::Second => 2,
        }
    }
}

/// One semi-monthly payroll period.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{PayPeriod, PeriodHalf};
/// use chrono::NaiveDate;
///
/// let period = PayPeriod::new(2026, 3, PeriodHalf::Second, 15).unwrap();
/// assert_eq!(period.range.start, NaiveDate::from_ymd_opt(2026, 3, 16).unwrap());
/// assert_eq!(period.range.end, NaiveDate::from_ymd_opt(2026, 3, 31).unwrap());
/// assert_eq!(period.label(), "March 2026 - Period 2 (16-31)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The calendar year.
    pub year: i32,
    /// The calendar month (1-12).
    pub month: u32,
    /// Which half of the month.
    pub half: PeriodHalf,
    /// The dates covered.
    pub range: DateRange,
}

impl PayPeriod {
    /// Builds the period for a month, splitting after `cutoff_day`.
    pub fn new(year: i32, month: u32, half: PeriodHalf, cutoff_day: u32) -> EngineResult<Self> {
        let month_range = DateRange::month(year, month)?;
        let cutoff = month_range
            .start
            .with_day(cutoff_day.clamp(1, month_range.end.day()))
            .ok_or(EngineError::InvalidMonth { month, year })?;

        let range = match half {
            PeriodHalf::First => DateRange {
                start: month_range.start,
                end: cutoff,
            },
            PeriodHalf::Second => DateRange {
                start: cutoff.succ_opt().unwrap_or(cutoff),
                end: month_range.end,
            },
        };

        Ok(Self {
            year,
            month,
            half,
            range,
        })
    }

    /// The month label (e.g., "March 2026").
    pub fn month_label(&self) -> String {
        self.range.start.format("%B %Y").to_string()
    }

    /// The full period label (e.g., "March 2026 - Period 1 (1-15)").
    pub fn label(&self) -> String {
        format!(
            "{} - Period {} ({}-{})",
            self.month_label(),
            self.half.number(),
            self.range.start.day(),
            self.range.end.day()
        )
    }
}
