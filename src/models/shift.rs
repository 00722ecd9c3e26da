//! Shift definitions and derived monthly schedules.
//!
//! A [`ShiftDefinition`] is a time-of-day window that may wrap past
//! midnight. A [`Schedule`] assigns either a rest day or a shift to every
//! calendar date of one month; it is derived on demand and never stored.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named daily shift window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftDefinition {
    /// Display label (e.g., "Night Shift").
    pub label: String,
    /// The scheduled start time-of-day.
    pub start_time: NaiveTime,
    /// The scheduled end time-of-day; at or before `start_time` means overnight.
    pub end_time: NaiveTime,
}

impl ShiftDefinition {
    /// Returns true if the shift ends on the calendar day after it starts.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::ShiftDefinition;
    /// use chrono::NaiveTime;
    ///
    /// let night = ShiftDefinition {
    ///     label: "Night Shift".to_string(),
    ///     start_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
    ///     end_time: NaiveTime::from_hms_opt(6, 0, 0).unwrap(),
    /// };
    /// assert!(night.is_overnight());
    /// ```
    pub fn is_overnight(&self) -> bool {
        self.end_time <= self.start_time
    }
}

impl fmt::Display for ShiftDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}-{})",
            self.label,
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M")
        )
    }
}

/// What a single calendar date holds in a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleDay {
    /// A scheduled non-workday.
    RestDay,
    /// A workday on the given shift.
    WorkDay {
        /// The shift worked that day.
        shift: ShiftDefinition,
    },
}

impl ScheduleDay {
    /// Returns the shift if this is a workday.
    pub fn shift(&self) -> Option<&ShiftDefinition> {
        match self {
            ScheduleDay::RestDay => None,
            ScheduleDay::WorkDay { shift } => Some(shift),
        }
    }

    /// Returns true for workdays.
    pub fn is_workday(&self) -> bool {
        matches!(self, ScheduleDay::WorkDay { .. })
    }
}

impl fmt::Display for ScheduleDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScheduleDay::RestDay => write!(f, "Rest Day"),
            ScheduleDay::WorkDay { shift } => write!(f, "Work Day - {}", shift),
        }
    }
}

/// One dated entry of a schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// The calendar date.
    pub date: NaiveDate,
    /// Rest day or shift.
    pub day: ScheduleDay,
}

/// A display row for calendar views: date, weekday name and description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// The calendar date.
    pub date: NaiveDate,
    /// Abbreviated weekday name (e.g., "Mon").
    pub weekday: String,
    /// "Rest Day" or "Work Day - <shift>".
    pub description: String,
}

/// The expected schedule of one employee for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    /// The employee the schedule belongs to.
    pub employee_id: String,
    /// The calendar year.
    pub year: i32,
    /// The calendar month (1-12).
    pub month: u32,
    /// One entry per date of the month, ascending.
    pub entries: Vec<ScheduleEntry>,
    /// Number of non-rest-day entries.
    pub total_workdays: u32,
}

impl Schedule {
    /// Returns the entry for a date, if the date falls in this month.
    pub fn day(&self, date: NaiveDate) -> Option<&ScheduleDay> {
        self.entries
            .binary_search_by_key(&date, |e| e.date)
            .ok()
            .map(|i| &self.entries[i].day)
    }

    /// Iterates over workday entries only.
    pub fn workdays(&self) -> impl Iterator<Item = (NaiveDate, &ShiftDefinition)> {
        self.entries
            .iter()
            .filter_map(|e| e.day.shift().map(|shift| (e.date, shift)))
    }

    /// Builds calendar display rows.
    pub fn rows(&self) -> Vec<ScheduleRow> {
        self.entries
            .iter()
            .map(|e| ScheduleRow {
                date: e.date,
                weekday: e.date.weekday().to_string(),
                description: e.day.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn office_shift() -> ShiftDefinition {
        ShiftDefinition {
            label: "Office Shift".to_string(),
            start_time: time(8, 0),
            end_time: time(17, 0),
        }
    }

    fn sample_schedule() -> Schedule {
        let entries = vec![
            ScheduleEntry {
                date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(), // Sunday
                day: ScheduleDay::RestDay,
            },
            ScheduleEntry {
                date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(), // Monday
                day: ScheduleDay::WorkDay {
                    shift: office_shift(),
                },
            },
        ];
        Schedule {
            employee_id: "EMP-001".to_string(),
            year: 2026,
            month: 3,
            entries,
            total_workdays: 1,
        }
    }

    #[test]
    fn test_day_shift_is_not_overnight() {
        assert!(!office_shift().is_overnight());
    }

    #[test]
    fn test_equal_start_and_end_counts_as_overnight() {
        let shift = ShiftDefinition {
            label: "Full Day".to_string(),
            start_time: time(7, 0),
            end_time: time(7, 0),
        };
        assert!(shift.is_overnight());
    }

    #[test]
    fn test_work_day_description() {
        let day = ScheduleDay::WorkDay {
            shift: office_shift(),
        };
        assert_eq!(day.to_string(), "Work Day - Office Shift (08:00-17:00)");
        assert_eq!(ScheduleDay::RestDay.to_string(), "Rest Day");
    }

    #[test]
    fn test_rows_carry_weekday_names() {
        let rows = sample_schedule().rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].weekday, "Sun");
        assert_eq!(rows[0].description, "Rest Day");
        assert_eq!(rows[1].weekday, "Mon");
    }

    #[test]
    fn test_day_lookup_and_workdays() {
        let schedule = sample_schedule();
        let monday = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert!(schedule.day(monday).unwrap().is_workday());
        assert!(schedule
            .day(NaiveDate::from_ymd_opt(2026, 4, 2).unwrap())
            .is_none());
        assert_eq!(schedule.workdays().count(), 1);
    }

    #[test]
    fn test_shift_deserializes_from_yaml() {
        let yaml = "label: Night Shift\nstart_time: \"22:00:00\"\nend_time: \"06:00:00\"\n";
        let shift: ShiftDefinition = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(shift.start_time, time(22, 0));
        assert!(shift.is_overnight());
    }
}
