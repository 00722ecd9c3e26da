//! Attendance records and the evaluated monthly attendance report.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

use super::{DateRange, LeaveType};

/// Placeholder rendered for values that were not recorded or cannot be known.
pub const PLACEHOLDER: &str = "-";

/// A recorded time-in/time-out pair for one employee and date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee.
    pub employee_id: String,
    /// The attendance date.
    pub date: NaiveDate,
    /// Clock-in time, if recorded.
    pub time_in: Option<NaiveTime>,
    /// Clock-out time, if recorded.
    pub time_out: Option<NaiveTime>,
}

/// Overtime for one day: a known number of hours or unknown.
///
/// Unknown is never coerced to zero; it renders as a placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overtime {
    /// Hours past the scheduled end, rounded to 2 decimal places.
    Hours(Decimal),
    /// No usable time-out was recorded.
    Unknown,
}

impl Overtime {
    /// Returns the hours if known.
    pub fn hours(&self) -> Option<Decimal> {
        match self {
            Overtime::Hours(h) => Some(*h),
            Overtime::Unknown => None,
        }
    }
}

impl Serialize for Overtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Overtime::Hours(h) => Serialize::serialize(h, serializer),
            Overtime::Unknown => serializer.serialize_str(PLACEHOLDER),
        }
    }
}

/// The evaluated status of a scheduled workday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttendanceStatus {
    /// Both time-in and time-out were recorded.
    Present,
    /// Neither leave nor a complete time record.
    Absent,
    /// An approved leave covers the date.
    OnLeave(LeaveType),
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "Present"),
            AttendanceStatus::Absent => write!(f, "Absent"),
            AttendanceStatus::OnLeave(leave_type) => write!(f, "On Leave ({})", leave_type),
        }
    }
}

impl Serialize for AttendanceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn time_or_placeholder<S: Serializer>(
    value: &Option<NaiveTime>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(t) => serializer.collect_str(&t.format("%H:%M:%S")),
        None => serializer.serialize_str(PLACEHOLDER),
    }
}

fn minutes_or_placeholder<S: Serializer>(
    value: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(m) => Serialize::serialize(m, serializer),
        None => serializer.serialize_str(PLACEHOLDER),
    }
}

/// One evaluated scheduled workday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceRow {
    /// The workday.
    pub date: NaiveDate,
    /// Recorded clock-in.
    #[serde(serialize_with = "time_or_placeholder")]
    pub time_in: Option<NaiveTime>,
    /// Recorded clock-out.
    #[serde(serialize_with = "time_or_placeholder")]
    pub time_out: Option<NaiveTime>,
    /// Hours past the scheduled end.
    pub overtime: Overtime,
    /// Minutes late against the scheduled start, for present days.
    #[serde(serialize_with = "minutes_or_placeholder")]
    pub tardiness_minutes: Option<Decimal>,
    /// Minutes left before the scheduled end, for present days.
    #[serde(serialize_with = "minutes_or_placeholder")]
    pub undertime_minutes: Option<Decimal>,
    /// Present, Absent or On Leave.
    pub status: AttendanceStatus,
}

impl AttendanceRow {
    /// The contribution of this row to days present (leave may be fractional).
    pub fn present_credit(&self) -> Decimal {
        match self.status {
            AttendanceStatus::Present => Decimal::ONE,
            AttendanceStatus::OnLeave(leave_type) => leave_type.day_equivalent(),
            AttendanceStatus::Absent => Decimal::ZERO,
        }
    }
}

/// Aggregates over a set of attendance rows.
///
/// `days_present + days_absent` equals `total_workdays` only when no
/// half-day leave is involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// Scheduled workdays covered.
    pub total_workdays: u32,
    /// Present days plus leave day-equivalents.
    pub days_present: Decimal,
    /// Leave day-equivalents included in `days_present`.
    pub approved_leave_days: Decimal,
    /// Days with neither leave nor a complete time record.
    pub days_absent: Decimal,
    /// Sum of known overtime hours.
    pub total_overtime_hours: Decimal,
    /// Sum of tardiness minutes on present days.
    pub total_tardiness_minutes: Decimal,
    /// Sum of undertime minutes on present days.
    pub total_undertime_minutes: Decimal,
}

impl AttendanceSummary {
    /// Folds rows into a summary.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a AttendanceRow>) -> Self {
        let mut summary = AttendanceSummary {
            total_workdays: 0,
            days_present: Decimal::ZERO,
            approved_leave_days: Decimal::ZERO,
            days_absent: Decimal::ZERO,
            total_overtime_hours: Decimal::ZERO,
            total_tardiness_minutes: Decimal::ZERO,
            total_undertime_minutes: Decimal::ZERO,
        };

        for row in rows {
            summary.total_workdays += 1;
            summary.days_present += row.present_credit();
            match row.status {
                AttendanceStatus::OnLeave(leave_type) => {
                    summary.approved_leave_days += leave_type.day_equivalent();
                }
                AttendanceStatus::Absent => summary.days_absent += Decimal::ONE,
                AttendanceStatus::Present => {}
            }
            // Unknown overtime is excluded rather than counted as zero hours.
            if let Some(hours) = row.overtime.hours() {
                summary.total_overtime_hours += hours;
            }
            summary.total_tardiness_minutes += row.tardiness_minutes.unwrap_or_default();
            summary.total_undertime_minutes += row.undertime_minutes.unwrap_or_default();
        }

        summary
    }
}

/// The evaluated attendance of one employee for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttendanceReport {
    /// The employee.
    pub employee_id: String,
    /// The calendar year.
    pub year: i32,
    /// The calendar month (1-12).
    pub month: u32,
    /// One row per scheduled workday, ascending by date.
    pub rows: Vec<AttendanceRow>,
    /// Aggregates over all rows.
    pub summary: AttendanceSummary,
}

impl AttendanceReport {
    /// Summarises only the rows whose date falls inside `range`.
    pub fn summarize_within(&self, range: DateRange) -> AttendanceSummary {
        AttendanceSummary::from_rows(self.rows.iter().filter(|r| range.contains(r.date)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn row(day: u32, status: AttendanceStatus, overtime: Overtime) -> AttendanceRow {
        AttendanceRow {
            date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            time_in: None,
            time_out: None,
            overtime,
            tardiness_minutes: None,
            undertime_minutes: None,
            status,
        }
    }

    #[test]
    fn test_status_display() {
        assert_eq!(AttendanceStatus::Present.to_string(), "Present");
        assert_eq!(
            AttendanceStatus::OnLeave(LeaveType::VacationHalfDay).to_string(),
            "On Leave (VLH)"
        );
    }

    #[test]
    fn test_summary_keeps_fractional_leave() {
        let rows = vec![
            row(2, AttendanceStatus::Present, Overtime::Hours(dec("1.5"))),
            row(
                3,
                AttendanceStatus::OnLeave(LeaveType::VacationHalfDay),
                Overtime::Unknown,
            ),
            row(4, AttendanceStatus::Absent, Overtime::Unknown),
        ];

        let summary = AttendanceSummary::from_rows(&rows);
        assert_eq!(summary.total_workdays, 3);
        assert_eq!(summary.days_present, dec("1.5"));
        assert_eq!(summary.approved_leave_days, dec("0.5"));
        assert_eq!(summary.days_absent, dec("1"));
        assert_eq!(summary.total_overtime_hours, dec("1.5"));
    }

    #[test]
    fn test_summarize_within_restricts_dates() {
        let rows = vec![
            row(2, AttendanceStatus::Present, Overtime::Unknown),
            row(16, AttendanceStatus::Absent, Overtime::Unknown),
        ];
        let report = AttendanceReport {
            employee_id: "EMP-001".to_string(),
            year: 2026,
            month: 3,
            summary: AttendanceSummary::from_rows(&rows),
            rows,
        };

        let first_half = DateRange {
            start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
        };
        let summary = report.summarize_within(first_half);
        assert_eq!(summary.total_workdays, 1);
        assert_eq!(summary.days_absent, Decimal::ZERO);
    }

    #[test]
    fn test_row_serializes_placeholders() {
        let json = serde_json::to_value(row(4, AttendanceStatus::Absent, Overtime::Unknown)).unwrap();
        assert_eq!(json["time_in"], "-");
        assert_eq!(json["time_out"], "-");
        assert_eq!(json["overtime"], "-");
        assert_eq!(json["status"], "Absent");
    }

    #[test]
    fn test_row_serializes_known_values() {
        let mut present = row(2, AttendanceStatus::Present, Overtime::Hours(dec("1.25")));
        present.time_in = NaiveTime::from_hms_opt(8, 0, 0);
        present.tardiness_minutes = Some(dec("20"));
        let json = serde_json::to_value(present).unwrap();
        assert_eq!(json["time_in"], "08:00:00");
        assert_eq!(json["overtime"], "1.25");
        assert_eq!(json["tardiness_minutes"], "20");
        assert_eq!(json["undertime_minutes"], "-");
    }
}
