//! Weekly leave quota.
//!
//! An employee may hold at most the configured number of leave
//! day-equivalents (pending plus approved) within one Monday-to-Friday
//! week. Half-day vacation leave counts 0.5, other leave 1.0. Weekend
//! dates are rejected outright.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{DateRange, LeaveRequest, LeaveType, RequestStatus};
use crate::store::PayrollStore;

/// Statuses that consume quota.
const COUNTED_STATUSES: [RequestStatus; 2] = [RequestStatus::Pending, RequestStatus::Approved];

/// The Monday-to-Friday window containing `date`.
///
/// # Examples
///
/// ```
/// use payroll_engine::policy::leave_week;
/// use chrono::NaiveDate;
///
/// let wednesday = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
/// let week = leave_week(wednesday);
/// assert_eq!(week.start, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
/// assert_eq!(week.end, NaiveDate::from_ymd_opt(2026, 3, 6).unwrap());
/// ```
pub fn leave_week(date: NaiveDate) -> DateRange {
    let start = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    DateRange {
        start,
        end: start + Duration::days(4),
    }
}

/// Admission check for leave requests.
#[derive(Debug, Clone)]
pub struct LeaveQuotaPolicy {
    config: Arc<PayrollConfig>,
}

impl LeaveQuotaPolicy {
    /// Creates the policy over the given configuration.
    pub fn new(config: Arc<PayrollConfig>) -> Self {
        Self { config }
    }

    /// Checks a request against the leave already held that week.
    ///
    /// `existing` should hold the employee's pending and approved leave in
    /// the week of `date`; other entries are ignored.
    pub fn check(
        &self,
        date: NaiveDate,
        leave_type: LeaveType,
        existing: &[LeaveRequest],
    ) -> EngineResult<()> {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return Err(EngineError::WeekendLeave { date });
        }

        let week = leave_week(date);
        let held: Decimal = existing
            .iter()
            .filter(|l| week.contains(l.date) && COUNTED_STATUSES.contains(&l.status))
            .map(|l| l.leave_type.day_equivalent())
            .sum();

        let limit = self.config.payroll().leave.weekly_quota_days;
        if held + leave_type.day_equivalent() > limit {
            return Err(EngineError::QuotaExceeded {
                week_start: week.start,
                existing: held,
                limit,
            });
        }
        Ok(())
    }

    /// Reads the employee's leave for the week and checks the request.
    ///
    /// Run inside the same transaction as the insert that follows.
    pub fn evaluate<S: PayrollStore + ?Sized>(
        &self,
        store: &S,
        employee_id: &str,
        date: NaiveDate,
        leave_type: LeaveType,
    ) -> EngineResult<()> {
        let existing = store.leaves_in_range(employee_id, leave_week(date), &COUNTED_STATUSES)?;
        self.check(date, leave_type, &existing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_config;
    use crate::store::InMemoryStore;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 3, d).unwrap()
    }

    fn policy() -> LeaveQuotaPolicy {
        LeaveQuotaPolicy::new(test_config())
    }

    fn leave(d: u32, leave_type: LeaveType, status: RequestStatus) -> LeaveRequest {
        LeaveRequest {
            id: u64::from(d),
            employee_id: "EMP-001".to_string(),
            date: date(d),
            leave_type,
            status,
        }
    }

    // March 2099: the 2nd is a Monday, the 7th and 8th a weekend.

    #[test]
    fn test_weekend_is_rejected() {
        match policy().check(date(7), LeaveType::Sick, &[]) {
            Err(EngineError::WeekendLeave { date: d }) => assert_eq!(d, date(7)),
            other => panic!("Expected WeekendLeave, got {:?}", other),
        }
        assert!(policy().check(date(8), LeaveType::VacationHalfDay, &[]).is_err());
    }

    #[test]
    fn test_two_half_days_fill_the_week() {
        let existing = vec![leave(3, LeaveType::VacationHalfDay, RequestStatus::Approved)];
        assert!(policy().check(date(5), LeaveType::VacationHalfDay, &existing).is_ok());

        let existing = vec![
            leave(3, LeaveType::VacationHalfDay, RequestStatus::Approved),
            leave(5, LeaveType::VacationHalfDay, RequestStatus::Pending),
        ];
        match policy().check(date(6), LeaveType::VacationHalfDay, &existing) {
            Err(EngineError::QuotaExceeded {
                week_start,
                existing,
                limit,
            }) => {
                assert_eq!(week_start, date(2));
                assert_eq!(existing, dec("1.0"));
                assert_eq!(limit, dec("1"));
            }
            other => panic!("Expected QuotaExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_rejected_leave_does_not_count() {
        let existing = vec![leave(3, LeaveType::Vacation, RequestStatus::Rejected)];
        assert!(policy().check(date(4), LeaveType::Sick, &existing).is_ok());
    }

    #[test]
    fn test_next_week_is_independent() {
        let existing = vec![leave(6, LeaveType::Vacation, RequestStatus::Approved)];
        assert!(policy().check(date(9), LeaveType::Vacation, &existing).is_ok());
    }

    #[test]
    fn test_full_day_after_half_day_exceeds() {
        let existing = vec![leave(2, LeaveType::VacationHalfDay, RequestStatus::Pending)];
        assert!(matches!(
            policy().check(date(4), LeaveType::Sick, &existing),
            Err(EngineError::QuotaExceeded { .. })
        ));
    }

    #[test]
    fn test_evaluate_reads_week_from_store() {
        let mut store = InMemoryStore::new();
        store
            .insert_leave("EMP-001", date(3), LeaveType::Vacation)
            .unwrap();

        assert!(policy()
            .evaluate(&store, "EMP-001", date(4), LeaveType::VacationHalfDay)
            .is_err());
        assert!(policy()
            .evaluate(&store, "EMP-002", date(4), LeaveType::VacationHalfDay)
            .is_ok());
    }
}
