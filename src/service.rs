//! Transactional orchestration of the payroll engine.
//!
//! [`PayrollService`] owns the store behind a mutex and wires the
//! calculators and admission policies to it. Every read-then-write
//! operation (policy check then insert, posting then loan debits) runs as
//! one store transaction under the lock, so two concurrent submissions can
//! never both pass a quota or cap check before either is recorded.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

use crate::calculation::{PayrollCalculator, parse_date, parse_optional_time};
use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AttendanceReport, Employee, LeaveRequest, LeaveType, LoanRequest,
    PayrollComputation, PayrollPosting, RequestStatus, RosterSummary, Schedule,
};
use crate::policy::{LeaveQuotaPolicy, LoanCapPolicy, PositionQuotaPolicy};
use crate::store::PayrollStore;

/// A payroll that has been posted, with the computation it recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostedPayroll {
    /// The posting record.
    pub posting: PayrollPosting,
    /// The computation that was posted.
    pub computation: PayrollComputation,
}

/// Entry point for every engine operation.
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::service::PayrollService;
/// use payroll_engine::store::InMemoryStore;
///
/// let config = ConfigLoader::load("./config/default").unwrap().config();
/// let service = PayrollService::new(config, InMemoryStore::new());
/// let roster = service.roster(3, 2026, 1).unwrap();
/// println!("{} employees", roster.lines.len());
/// ```
#[derive(Debug)]
pub struct PayrollService<S> {
    config: Arc<PayrollConfig>,
    store: Mutex<S>,
    calculator: PayrollCalculator,
    leave_policy: LeaveQuotaPolicy,
    loan_policy: LoanCapPolicy,
    position_policy: PositionQuotaPolicy,
}

impl<S: PayrollStore> PayrollService<S> {
    /// Creates a service over a store.
    pub fn new(config: Arc<PayrollConfig>, store: S) -> Self {
        Self {
            calculator: PayrollCalculator::new(Arc::clone(&config)),
            leave_policy: LeaveQuotaPolicy::new(Arc::clone(&config)),
            loan_policy: LoanCapPolicy::new(Arc::clone(&config)),
            position_policy: PositionQuotaPolicy::new(Arc::clone(&config)),
            store: Mutex::new(store),
            config,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Arc<PayrollConfig> {
        &self.config
    }

    /// Runs a read-only operation against the store.
    fn read<T>(&self, f: impl FnOnce(&S) -> EngineResult<T>) -> EngineResult<T> {
        let store = self.store.lock().map_err(|_| EngineError::StorageFailure {
            message: "store lock poisoned".to_string(),
        })?;
        f(&store)
    }

    /// Runs a unit of work as one store transaction.
    fn transact<T>(&self, f: impl FnOnce(&mut S) -> EngineResult<T>) -> EngineResult<T> {
        let mut store = self.store.lock().map_err(|_| EngineError::StorageFailure {
            message: "store lock poisoned".to_string(),
        })?;
        store.transaction(f)
    }

    fn require_employee(store: &S, employee_id: &str) -> EngineResult<Employee> {
        store
            .employee(employee_id)?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })
    }

    // Employees

    /// Adds an employee, enforcing the position head-count cap.
    pub fn add_employee(&self, employee: Employee) -> EngineResult<Employee> {
        employee.validate()?;
        let added = self.transact(|store| {
            self.position_policy.evaluate(store, &employee.position)?;
            store.insert_employee(employee.clone())?;
            Ok(employee)
        })?;
        info!(employee_id = %added.id, position = %added.position, "Employee added");
        Ok(added)
    }

    /// Replaces an employee record.
    ///
    /// The head-count cap is re-checked only when the position changes.
    pub fn update_employee(&self, employee: Employee) -> EngineResult<Employee> {
        employee.validate()?;
        let updated = self.transact(|store| {
            let existing = Self::require_employee(store, &employee.id)?;
            if existing.position != employee.position {
                self.position_policy.evaluate(store, &employee.position)?;
            }
            store.update_employee(employee.clone())?;
            Ok(employee)
        })?;
        info!(employee_id = %updated.id, "Employee updated");
        Ok(updated)
    }

    /// Deletes an employee and all of their records.
    pub fn delete_employee(&self, employee_id: &str) -> EngineResult<()> {
        self.transact(|store| store.delete_employee(employee_id))?;
        info!(employee_id, "Employee deleted");
        Ok(())
    }

    /// Looks up one employee.
    pub fn employee(&self, employee_id: &str) -> EngineResult<Employee> {
        self.read(|store| Self::require_employee(store, employee_id))
    }

    /// All employees, ordered by id.
    pub fn employees(&self) -> EngineResult<Vec<Employee>> {
        self.read(|store| store.employees())
    }

    // Attendance

    /// Records a clock-in at `now`.
    ///
    /// # Errors
    ///
    /// `AlreadyClockedIn` if a time-in exists for that date; the existing
    /// record is left untouched.
    pub fn clock_in(&self, employee_id: &str, now: NaiveDateTime) -> EngineResult<AttendanceRecord> {
        let date = now.date();
        let time = now.time().with_nanosecond(0).unwrap_or(now.time());

        let record = self.transact(|store| {
            Self::require_employee(store, employee_id)?;
            let existing = store.attendance_on(employee_id, date)?;
            if let Some(time_in) = existing.as_ref().and_then(|r| r.time_in) {
                return Err(EngineError::AlreadyClockedIn {
                    date,
                    time_in: time_in.format("%H:%M:%S").to_string(),
                });
            }
            let record = AttendanceRecord {
                employee_id: employee_id.to_string(),
                date,
                time_in: Some(time),
                time_out: existing.and_then(|r| r.time_out),
            };
            store.upsert_attendance(record.clone())?;
            Ok(record)
        })?;

        info!(employee_id, %date, time_in = %time, "Clocked in");
        Ok(record)
    }

    /// Records a clock-out at `now`.
    ///
    /// With no time-in for today, a clock-out closes the previous date's
    /// open record when that date was scheduled with an overnight shift.
    ///
    /// # Errors
    ///
    /// - `NotClockedIn` if there is no open time-in to close
    /// - `AlreadyClockedOut` if a time-out already exists
    pub fn clock_out(
        &self,
        employee_id: &str,
        now: NaiveDateTime,
    ) -> EngineResult<AttendanceRecord> {
        let today = now.date();
        let time = now.time().with_nanosecond(0).unwrap_or(now.time());

        let record = self.transact(|store| {
            let employee = Self::require_employee(store, employee_id)?;
            let mut record = match store
                .attendance_on(employee_id, today)?
                .filter(|r| r.time_in.is_some())
            {
                Some(record) => record,
                None => self
                    .open_overnight_record(store, &employee, today)?
                    .ok_or_else(|| EngineError::NotClockedIn {
                        employee_id: employee_id.to_string(),
                        date: today,
                    })?,
            };
            if let Some(time_out) = record.time_out {
                return Err(EngineError::AlreadyClockedOut {
                    date: record.date,
                    time_out: time_out.format("%H:%M:%S").to_string(),
                });
            }
            record.time_out = Some(time);
            store.upsert_attendance(record.clone())?;
            Ok(record)
        })?;

        info!(employee_id, date = %record.date, time_out = %time, "Clocked out");
        Ok(record)
    }

    /// The previous date's record if it is still open and that date was
    /// scheduled with a shift running past midnight.
    fn open_overnight_record(
        &self,
        store: &S,
        employee: &Employee,
        today: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>> {
        let Some(previous) = today.pred_opt() else {
            return Ok(None);
        };
        let open = store
            .attendance_on(&employee.id, previous)?
            .filter(|r| r.time_in.is_some() && r.time_out.is_none());
        let Some(record) = open else {
            return Ok(None);
        };

        let schedule = self.calculator.evaluator().scheduler().schedule_for(
            employee,
            previous.year(),
            previous.month(),
        )?;
        let overnight = schedule
            .day(previous)
            .and_then(|day| day.shift())
            .is_some_and(|shift| shift.is_overnight());
        Ok(overnight.then_some(record))
    }

    /// Replaces the attendance record of one date.
    ///
    /// Times may be absent or empty (not recorded); a time-out requires a
    /// time-in.
    pub fn set_attendance(
        &self,
        employee_id: &str,
        date: &str,
        time_in: Option<&str>,
        time_out: Option<&str>,
    ) -> EngineResult<AttendanceRecord> {
        let date = parse_date(date)?;
        let time_in = parse_optional_time(time_in)?;
        let time_out = parse_optional_time(time_out)?;
        if time_in.is_none() && time_out.is_some() {
            return Err(EngineError::TimeOutWithoutTimeIn { date });
        }

        let record = AttendanceRecord {
            employee_id: employee_id.to_string(),
            date,
            time_in,
            time_out,
        };
        self.transact(|store| {
            Self::require_employee(store, employee_id)?;
            store.upsert_attendance(record.clone())
        })?;

        info!(employee_id, %date, "Attendance updated");
        Ok(record)
    }

    /// Builds an employee's schedule for a month.
    pub fn schedule(&self, employee_id: &str, month: u32, year: i32) -> EngineResult<Schedule> {
        self.read(|store| {
            self.calculator
                .evaluator()
                .scheduler()
                .schedule(store, employee_id, month, year)
        })
    }

    /// Builds an employee's attendance report for a month.
    pub fn attendance_report(
        &self,
        employee_id: &str,
        month: u32,
        year: i32,
    ) -> EngineResult<AttendanceReport> {
        self.read(|store| {
            self.calculator
                .evaluator()
                .report(store, employee_id, month, year)
        })
    }

    // Leave

    fn reject_past(record: &str, date: NaiveDate, today: NaiveDate) -> EngineResult<()> {
        if date < today {
            return Err(EngineError::PastDateModification {
                record: record.to_string(),
                date,
            });
        }
        Ok(())
    }

    /// Submits a leave request, enforcing the weekly quota.
    ///
    /// # Errors
    ///
    /// - `InvalidDate` for a malformed date
    /// - `PastDateModification` for a date before `today`
    /// - `EmployeeNotFound` if the id is unknown
    /// - `WeekendLeave` / `QuotaExceeded` from the quota policy
    pub fn submit_leave(
        &self,
        employee_id: &str,
        date: &str,
        leave_type: LeaveType,
        today: NaiveDate,
    ) -> EngineResult<LeaveRequest> {
        let date = parse_date(date)?;
        Self::reject_past("leave", date, today)?;

        let result = self.transact(|store| {
            Self::require_employee(store, employee_id)?;
            self.leave_policy
                .evaluate(store, employee_id, date, leave_type)?;
            store.insert_leave(employee_id, date, leave_type)
        });

        match &result {
            Ok(leave) => info!(
                employee_id,
                leave_id = leave.id,
                %date,
                leave_type = %leave_type,
                "Leave submitted"
            ),
            Err(error) => warn!(employee_id, %date, error = %error, "Leave rejected"),
        }
        result
    }

    fn transition_leave(
        &self,
        leave_id: u64,
        to: RequestStatus,
        today: NaiveDate,
    ) -> EngineResult<LeaveRequest> {
        let leave = self.transact(|store| {
            let mut leave = store
                .leave(leave_id)?
                .ok_or(EngineError::LeaveNotFound { leave_id })?;
            Self::reject_past("leave", leave.date, today)?;
            if leave.status != RequestStatus::Pending {
                return Err(EngineError::InvalidTransition {
                    record: "leave".to_string(),
                    id: leave_id,
                    from: leave.status.to_string(),
                    to: to.to_string(),
                });
            }
            store.set_leave_status(leave_id, to)?;
            leave.status = to;
            Ok(leave)
        })?;
        info!(leave_id, status = %to, "Leave status changed");
        Ok(leave)
    }

    /// Approves a pending leave request.
    pub fn approve_leave(&self, leave_id: u64, today: NaiveDate) -> EngineResult<LeaveRequest> {
        self.transition_leave(leave_id, RequestStatus::Approved, today)
    }

    /// Rejects a pending leave request.
    pub fn reject_leave(&self, leave_id: u64, today: NaiveDate) -> EngineResult<LeaveRequest> {
        self.transition_leave(leave_id, RequestStatus::Rejected, today)
    }

    /// Deletes a leave request dated today or later.
    pub fn delete_leave(&self, leave_id: u64, today: NaiveDate) -> EngineResult<()> {
        self.transact(|store| {
            let leave = store
                .leave(leave_id)?
                .ok_or(EngineError::LeaveNotFound { leave_id })?;
            Self::reject_past("leave", leave.date, today)?;
            store.delete_leave(leave_id)
        })?;
        info!(leave_id, "Leave deleted");
        Ok(())
    }

    /// Every leave request, ordered by id.
    pub fn leaves(&self) -> EngineResult<Vec<LeaveRequest>> {
        self.read(|store| store.leaves())
    }

    // Loans

    /// Submits a loan request, enforcing the loan cap.
    pub fn submit_loan(
        &self,
        employee_id: &str,
        amount: Decimal,
        now: NaiveDateTime,
    ) -> EngineResult<LoanRequest> {
        let requested_at = now.with_nanosecond(0).unwrap_or(now);
        let result = self.transact(|store| {
            self.loan_policy.evaluate(store, employee_id, amount)?;
            store.insert_loan(employee_id, amount, requested_at)
        });

        match &result {
            Ok(loan) => info!(employee_id, loan_id = loan.id, %amount, "Loan submitted"),
            Err(error) => warn!(employee_id, %amount, error = %error, "Loan rejected"),
        }
        result
    }

    fn transition_loan(&self, loan_id: u64, to: RequestStatus) -> EngineResult<LoanRequest> {
        let loan = self.transact(|store| {
            let mut loan = store
                .loan(loan_id)?
                .ok_or(EngineError::LoanNotFound { loan_id })?;
            if loan.status != RequestStatus::Pending {
                return Err(EngineError::InvalidTransition {
                    record: "loan".to_string(),
                    id: loan_id,
                    from: loan.status.to_string(),
                    to: to.to_string(),
                });
            }
            let remaining = if to == RequestStatus::Approved {
                loan.amount
            } else {
                loan.remaining_balance
            };
            store.set_loan_status(loan_id, to, remaining)?;
            loan.status = to;
            loan.remaining_balance = remaining;
            Ok(loan)
        })?;
        info!(loan_id, status = %to, "Loan status changed");
        Ok(loan)
    }

    /// Approves a pending loan; its remaining balance becomes its amount.
    pub fn approve_loan(&self, loan_id: u64) -> EngineResult<LoanRequest> {
        self.transition_loan(loan_id, RequestStatus::Approved)
    }

    /// Rejects a pending loan.
    pub fn reject_loan(&self, loan_id: u64) -> EngineResult<LoanRequest> {
        self.transition_loan(loan_id, RequestStatus::Rejected)
    }

    /// Every loan request, ordered by id.
    pub fn loans(&self) -> EngineResult<Vec<LoanRequest>> {
        self.read(|store| store.all_loans())
    }

    // Payroll

    /// Computes one employee's payroll without writing anything.
    pub fn payroll(
        &self,
        employee_id: &str,
        month: u32,
        year: i32,
        period: u8,
    ) -> EngineResult<PayrollComputation> {
        self.read(|store| {
            self.calculator
                .calculate(store, employee_id, month, year, period)
        })
    }

    /// Computes every employee's payroll for a period.
    pub fn roster(&self, month: u32, year: i32, period: u8) -> EngineResult<RosterSummary> {
        self.read(|store| self.calculator.roster(store, month, year, period))
    }

    /// Computes a payroll, applies its loan debits and records the posting
    /// as one atomic unit.
    ///
    /// # Errors
    ///
    /// `PayrollAlreadyPosted` if the employee's period was posted before.
    pub fn post_payroll(
        &self,
        employee_id: &str,
        month: u32,
        year: i32,
        period: u8,
        now: NaiveDateTime,
    ) -> EngineResult<PostedPayroll> {
        let posted = self.transact(|store| {
            let pay_period = self.calculator.period(month, year, period)?;
            if store.payroll_posting(employee_id, &pay_period)?.is_some() {
                return Err(EngineError::PayrollAlreadyPosted {
                    employee_id: employee_id.to_string(),
                    label: pay_period.label(),
                });
            }

            let computation = self
                .calculator
                .calculate(&*store, employee_id, month, year, period)?;
            for debit in &computation.loan_debits {
                store.debit_loan(debit.loan_id, debit.amount)?;
            }

            let posting = PayrollPosting {
                employee_id: employee_id.to_string(),
                period: pay_period,
                net_pay: computation.report.net_pay,
                loan_deduction: computation.report.loan_deduction,
                posted_at: now.with_nanosecond(0).unwrap_or(now),
            };
            store.record_payroll(posting.clone())?;
            Ok(PostedPayroll {
                posting,
                computation,
            })
        })?;

        info!(
            employee_id,
            period = %posted.posting.period.label(),
            loan_deduction = %posted.posting.loan_deduction,
            "Payroll posted"
        );
        Ok(posted)
    }
}
