//! Attendance evaluation.
//!
//! This module joins a monthly schedule with recorded time-in/time-out
//! pairs and approved leave to classify every scheduled workday as
//! Present, Absent or On Leave. Rest days are skipped entirely.
//!
//! Leave always takes precedence over recorded times. A leave day credits
//! its day-equivalent (1.0 or 0.5) toward days present, so days present
//! may be fractional and need not sum with days absent to the number of
//! workdays.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::debug;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceReport, AttendanceRow, AttendanceStatus, AttendanceSummary,
    DateRange, Employee, LeaveType, Overtime, Schedule, ShiftDefinition,
};
use crate::store::PayrollStore;

use super::schedule::ShiftScheduler;
use super::time_math::{overtime, tardiness_minutes, undertime_minutes};

/// Evaluates one scheduled workday.
///
/// Overtime is measured whenever a clock-out exists and the day is not
/// absent; tardiness and undertime only on present days.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::evaluate_day;
/// use payroll_engine::models::{AttendanceRecord, AttendanceStatus, Overtime, ShiftDefinition};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let shift = ShiftDefinition {
///     label: "Regular Shift".to_string(),
///     start_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
///     end_time: NaiveTime::from_hms_opt(16, 0, 0).unwrap(),
/// };
/// let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
/// let record = AttendanceRecord {
///     employee_id: "EMP-001".to_string(),
///     date,
///     time_in: NaiveTime::from_hms_opt(8, 10, 0),
///     time_out: NaiveTime::from_hms_opt(17, 0, 0),
/// };
///
/// let row = evaluate_day(date, &shift, Some(&record), None);
/// assert_eq!(row.status, AttendanceStatus::Present);
/// assert_eq!(row.overtime, Overtime::Hours(Decimal::ONE));
/// assert_eq!(row.tardiness_minutes, Some(Decimal::new(10, 0)));
/// ```
pub fn evaluate_day(
    date: NaiveDate,
    shift: &ShiftDefinition,
    record: Option<&AttendanceRecord>,
    leave: Option<LeaveType>,
) -> AttendanceRow {
    let time_in = record.and_then(|r| r.time_in);
    let time_out = record.and_then(|r| r.time_out);

    let status = match (leave, time_in, time_out) {
        (Some(leave_type), _, _) => AttendanceStatus::OnLeave(leave_type),
        (None, Some(_), Some(_)) => AttendanceStatus::Present,
        _ => AttendanceStatus::Absent,
    };

    let measured_overtime = match status {
        AttendanceStatus::Absent => Overtime::Unknown,
        _ => overtime(shift, date, time_out),
    };

    let (tardiness, undertime) = match (status, time_in, time_out) {
        (AttendanceStatus::Present, Some(t_in), Some(t_out)) => (
            Some(tardiness_minutes(shift, date, t_in)),
            Some(undertime_minutes(shift, date, t_out)),
        ),
        _ => (None, None),
    };

    AttendanceRow {
        date,
        time_in,
        time_out,
        overtime: measured_overtime,
        tardiness_minutes: tardiness,
        undertime_minutes: undertime,
        status,
    }
}

/// Builds attendance reports from schedules, records and approved leave.
#[derive(Debug, Clone)]
pub struct AttendanceEvaluator {
    scheduler: ShiftScheduler,
}

impl AttendanceEvaluator {
    /// Creates an evaluator over the given configuration.
    pub fn new(config: Arc<PayrollConfig>) -> Self {
        Self {
            scheduler: ShiftScheduler::new(config),
        }
    }

    /// Returns the scheduler used to resolve workdays.
    pub fn scheduler(&self) -> &ShiftScheduler {
        &self.scheduler
    }

    /// Evaluates a schedule against a snapshot of records and approved leave.
    ///
    /// Records and leave outside the schedule's month are ignored.
    pub fn evaluate(
        &self,
        schedule: &Schedule,
        records: &[AttendanceRecord],
        leaves: &BTreeMap<NaiveDate, LeaveType>,
    ) -> AttendanceReport {
        let by_date: HashMap<NaiveDate, &AttendanceRecord> =
            records.iter().map(|r| (r.date, r)).collect();

        let rows: Vec<AttendanceRow> = schedule
            .workdays()
            .map(|(date, shift)| {
                evaluate_day(
                    date,
                    shift,
                    by_date.get(&date).copied(),
                    leaves.get(&date).copied(),
                )
            })
            .collect();

        let summary = AttendanceSummary::from_rows(&rows);

        AttendanceReport {
            employee_id: schedule.employee_id.clone(),
            year: schedule.year,
            month: schedule.month,
            rows,
            summary,
        }
    }

    /// Reads the month's snapshot from the store and evaluates it.
    ///
    /// # Errors
    ///
    /// - `EmployeeNotFound` if the id is unknown
    /// - `InvalidMonth` if `month`/`year` do not name a calendar month
    /// - `StorageFailure` if a read fails
    pub fn report<S: PayrollStore + ?Sized>(
        &self,
        store: &S,
        employee_id: &str,
        month: u32,
        year: i32,
    ) -> EngineResult<AttendanceReport> {
        let employee = store
            .employee(employee_id)?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })?;
        self.report_for(store, &employee, month, year)
    }

    /// Evaluates the month of an employee already read from the store.
    pub fn report_for<S: PayrollStore + ?Sized>(
        &self,
        store: &S,
        employee: &Employee,
        month: u32,
        year: i32,
    ) -> EngineResult<AttendanceReport> {
        let schedule = self.scheduler.schedule_for(employee, year, month)?;
        let range = DateRange::month(year, month)?;

        let records = store.attendance(&employee.id, range)?;
        let leaves = store.approved_leaves(&employee.id, range)?;

        let report = self.evaluate(&schedule, &records, &leaves);
        debug!(
            employee_id = %employee.id,
            month,
            year,
            days_present = %report.summary.days_present,
            days_absent = %report.summary.days_absent,
            "Attendance evaluated"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::{shift, test_config};
    use crate::store::InMemoryStore;
    use chrono::NaiveTime;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
    }

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    fn employee(position: &str) -> Employee {
        Employee {
            id: "EMP-001".to_string(),
            name: "Juan dela Cruz".to_string(),
            position: position.to_string(),
            department: "Operations".to_string(),
            monthly_salary: Decimal::new(22_000, 0),
        }
    }

    fn record(day: u32, time_in: Option<NaiveTime>, time_out: Option<NaiveTime>) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "EMP-001".to_string(),
            date: date(day),
            time_in,
            time_out,
        }
    }

    fn evaluator() -> AttendanceEvaluator {
        AttendanceEvaluator::new(test_config())
    }

    fn schedule(position: &str) -> Schedule {
        evaluator()
            .scheduler()
            .schedule_for(&employee(position), 2026, 3)
            .unwrap()
    }

    #[test]
    fn test_no_records_means_every_workday_absent() {
        let report = evaluator().evaluate(&schedule("Manager"), &[], &BTreeMap::new());

        assert_eq!(report.rows.len(), 22);
        assert_eq!(report.summary.total_workdays, 22);
        assert_eq!(report.summary.days_present, Decimal::ZERO);
        assert_eq!(report.summary.days_absent, dec("22"));
        assert!(report.rows.iter().all(|r| r.overtime == Overtime::Unknown));
    }

    #[test]
    fn test_rest_days_are_skipped() {
        let records = vec![record(1, time(8, 0), time(17, 0))]; // Sunday
        let report = evaluator().evaluate(&schedule("Manager"), &records, &BTreeMap::new());
        assert!(report.rows.iter().all(|r| r.date != date(1)));
    }

    #[test]
    fn test_present_day_measures_overtime() {
        let records = vec![record(2, time(8, 0), time(18, 30))];
        let report = evaluator().evaluate(&schedule("Manager"), &records, &BTreeMap::new());

        let row = &report.rows[0];
        assert_eq!(row.status, AttendanceStatus::Present);
        assert_eq!(row.overtime, Overtime::Hours(dec("1.5")));
        assert_eq!(report.summary.days_present, Decimal::ONE);
        assert_eq!(report.summary.total_overtime_hours, dec("1.5"));
    }

    #[test]
    fn test_time_in_only_is_absent() {
        let records = vec![record(2, time(8, 0), None)];
        let report = evaluator().evaluate(&schedule("Manager"), &records, &BTreeMap::new());

        assert_eq!(report.rows[0].status, AttendanceStatus::Absent);
        assert_eq!(report.rows[0].overtime, Overtime::Unknown);
        assert_eq!(report.rows[0].tardiness_minutes, None);
    }

    #[test]
    fn test_leave_takes_precedence_over_records() {
        let records = vec![record(3, time(8, 0), time(17, 0))];
        let mut leaves = BTreeMap::new();
        leaves.insert(date(3), LeaveType::VacationHalfDay);

        let report = evaluator().evaluate(&schedule("Manager"), &records, &leaves);
        let row = report.rows.iter().find(|r| r.date == date(3)).unwrap();

        assert_eq!(row.status, AttendanceStatus::OnLeave(LeaveType::VacationHalfDay));
        assert_eq!(row.status.to_string(), "On Leave (VLH)");
        assert_eq!(report.summary.days_present, dec("0.5"));
        assert_eq!(report.summary.days_absent, dec("21"));
    }

    #[test]
    fn test_night_guard_overtime_across_midnight() {
        let records = vec![record(2, time(22, 0), time(7, 30))];
        let report = evaluator().evaluate(&schedule("Security Guard C"), &records, &BTreeMap::new());

        let row = &report.rows[0];
        assert_eq!(row.status, AttendanceStatus::Present);
        assert_eq!(row.overtime, Overtime::Hours(dec("1.5")));
        assert_eq!(row.undertime_minutes, Some(Decimal::ZERO));
    }

    #[test]
    fn test_tardiness_and_undertime_totals() {
        let records = vec![
            record(2, time(8, 20), time(17, 0)),
            record(3, time(8, 0), time(16, 30)),
        ];
        let report = evaluator().evaluate(&schedule("Manager"), &records, &BTreeMap::new());

        assert_eq!(report.summary.total_tardiness_minutes, dec("20"));
        assert_eq!(report.summary.total_undertime_minutes, dec("30"));
    }

    #[test]
    fn test_report_reads_from_store() {
        let mut store = InMemoryStore::new();
        store.insert_employee(employee("Manager")).unwrap();
        store.upsert_attendance(record(2, time(8, 0), time(17, 0))).unwrap();

        let report = evaluator().report(&store, "EMP-001", 3, 2026).unwrap();
        assert_eq!(report.summary.days_present, Decimal::ONE);
        assert_eq!(report.summary.days_absent, dec("21"));
    }

    #[test]
    fn test_report_unknown_employee() {
        let store = InMemoryStore::new();
        assert!(matches!(
            evaluator().report(&store, "EMP-404", 3, 2026),
            Err(EngineError::EmployeeNotFound { .. })
        ));
    }

    #[test]
    fn test_evaluate_day_unknown_overtime_for_missing_clock_out_on_leave() {
        let s = shift("Regular Shift", (8, 0), (16, 0));
        let row = evaluate_day(date(2), &s, None, Some(LeaveType::Sick));
        assert_eq!(row.overtime, Overtime::Unknown);
        assert_eq!(row.present_credit(), Decimal::ONE);
    }

    proptest! {
        #[test]
        fn prop_day_counts_sum_without_leave(present in proptest::collection::vec(any::<bool>(), 22)) {
            let sched = schedule("Manager");
            let records: Vec<AttendanceRecord> = sched
                .workdays()
                .zip(present.iter())
                .filter(|(_, p)| **p)
                .map(|((d, _), _)| AttendanceRecord {
                    employee_id: "EMP-001".to_string(),
                    date: d,
                    time_in: time(8, 0),
                    time_out: time(17, 0),
                })
                .collect();

            let report = evaluator().evaluate(&sched, &records, &BTreeMap::new());
            let total = Decimal::from(report.summary.total_workdays);
            prop_assert_eq!(report.summary.days_present + report.summary.days_absent, total);
        }

        #[test]
        fn prop_days_present_never_exceeds_workdays(leave_days in proptest::collection::vec(0usize..22, 0..8), half in any::<bool>()) {
            let sched = schedule("Manager");
            let workdays: Vec<NaiveDate> = sched.workdays().map(|(d, _)| d).collect();
            let leave_type = if half { LeaveType::VacationHalfDay } else { LeaveType::Vacation };
            let leaves: BTreeMap<NaiveDate, LeaveType> =
                leave_days.iter().map(|i| (workdays[*i], leave_type)).collect();
            let records: Vec<AttendanceRecord> = workdays
                .iter()
                .map(|d| AttendanceRecord {
                    employee_id: "EMP-001".to_string(),
                    date: *d,
                    time_in: time(8, 0),
                    time_out: time(17, 0),
                })
                .collect();

            let report = evaluator().evaluate(&sched, &records, &leaves);
            prop_assert!(report.summary.days_present <= Decimal::from(report.summary.total_workdays));
        }
    }
}
