//! Persistence contract for the payroll engine.
//!
//! The calculators never touch storage directly: they receive snapshots
//! read through [`PayrollStore`] and return requested side effects (loan
//! debits) for the caller to apply. Read-then-write admission checks run
//! inside [`PayrollStore::transaction`].

mod memory;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::EngineResult;
use crate::models::{
    AttendanceRecord, DateRange, Employee, LeaveRequest, LeaveType, LoanRequest, PayPeriod,
    PayrollPosting, RequestStatus,
};

pub use memory::InMemoryStore;

/// Storage operations consumed by the engine.
///
/// Lookups of a single record return `Ok(None)` when the record does not
/// exist; mutations of a missing record return the matching not-found
/// error. Any backend failure is reported as `StorageFailure`.
pub trait PayrollStore {
    /// Looks up one employee.
    fn employee(&self, employee_id: &str) -> EngineResult<Option<Employee>>;

    /// All employees, ordered by id.
    fn employees(&self) -> EngineResult<Vec<Employee>>;

    /// Number of employees currently holding `position`.
    fn count_in_position(&self, position: &str) -> EngineResult<u32>;

    /// Inserts a new employee; duplicates fail with `DuplicateEmployee`.
    fn insert_employee(&mut self, employee: Employee) -> EngineResult<()>;

    /// Replaces an existing employee record.
    fn update_employee(&mut self, employee: Employee) -> EngineResult<()>;

    /// Removes an employee and every record that references them.
    fn delete_employee(&mut self, employee_id: &str) -> EngineResult<()>;

    /// Attendance records of one employee inside `range`, ascending by date.
    fn attendance(&self, employee_id: &str, range: DateRange)
    -> EngineResult<Vec<AttendanceRecord>>;

    /// The attendance record of one employee on one date.
    fn attendance_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>>;

    /// Inserts or replaces the record for (employee, date).
    fn upsert_attendance(&mut self, record: AttendanceRecord) -> EngineResult<()>;

    /// Approved leave of one employee inside `range`, keyed by date.
    fn approved_leaves(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> EngineResult<BTreeMap<NaiveDate, LeaveType>>;

    /// Leave requests of one employee inside `range` whose status is one of `statuses`.
    fn leaves_in_range(
        &self,
        employee_id: &str,
        range: DateRange,
        statuses: &[RequestStatus],
    ) -> EngineResult<Vec<LeaveRequest>>;

    /// Every leave request, ordered by id.
    fn leaves(&self) -> EngineResult<Vec<LeaveRequest>>;

    /// Looks up one leave request.
    fn leave(&self, leave_id: u64) -> EngineResult<Option<LeaveRequest>>;

    /// Inserts a new leave request with status Pending.
    fn insert_leave(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        leave_type: LeaveType,
    ) -> EngineResult<LeaveRequest>;

    /// Changes the status of a leave request.
    fn set_leave_status(&mut self, leave_id: u64, status: RequestStatus) -> EngineResult<()>;

    /// Removes a leave request.
    fn delete_leave(&mut self, leave_id: u64) -> EngineResult<()>;

    /// Loans of one employee, optionally filtered by status, oldest first.
    fn loans(
        &self,
        employee_id: &str,
        status: Option<RequestStatus>,
    ) -> EngineResult<Vec<LoanRequest>>;

    /// Every loan request, ordered by id.
    fn all_loans(&self) -> EngineResult<Vec<LoanRequest>>;

    /// Looks up one loan request.
    fn loan(&self, loan_id: u64) -> EngineResult<Option<LoanRequest>>;

    /// Inserts a new loan request with status Pending and a zero balance.
    fn insert_loan(
        &mut self,
        employee_id: &str,
        amount: Decimal,
        requested_at: NaiveDateTime,
    ) -> EngineResult<LoanRequest>;

    /// Changes the status and remaining balance of a loan request.
    fn set_loan_status(
        &mut self,
        loan_id: u64,
        status: RequestStatus,
        remaining_balance: Decimal,
    ) -> EngineResult<()>;

    /// Subtracts `amount` from a loan's remaining balance.
    fn debit_loan(&mut self, loan_id: u64, amount: Decimal) -> EngineResult<()>;

    /// The posting of one employee's payroll for a period, if any.
    fn payroll_posting(
        &self,
        employee_id: &str,
        period: &PayPeriod,
    ) -> EngineResult<Option<PayrollPosting>>;

    /// Records a payroll posting.
    fn record_payroll(&mut self, posting: PayrollPosting) -> EngineResult<()>;

    /// Runs `f` as one atomic unit.
    ///
    /// Backends that can roll back must leave no partial writes behind when
    /// `f` fails. The default runs `f` directly and suits backends whose
    /// exclusive borrow already serializes writers.
    fn transaction<T, F>(&mut self, f: F) -> EngineResult<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> EngineResult<T>,
    {
        f(self)
    }
}
