//! In-memory implementation of [`PayrollStore`].

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, DateRange, Employee, LeaveRequest, LeaveType, LoanRequest, PayPeriod,
    PayrollPosting, RequestStatus,
};

use super::PayrollStore;

/// A store held entirely in memory.
///
/// Transactions snapshot the whole store and restore it when the unit of
/// work fails, so a rejected request never leaves partial writes.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Employee;
/// use payroll_engine::store::{InMemoryStore, PayrollStore};
/// use rust_decimal::Decimal;
///
/// let mut store = InMemoryStore::new();
/// store
///     .insert_employee(Employee {
///         id: "EMP-001".to_string(),
///         name: "Maria Santos".to_string(),
///         position: "Manager".to_string(),
///         department: "Administration".to_string(),
///         monthly_salary: Decimal::new(30_000, 0),
///     })
///     .unwrap();
/// assert_eq!(store.count_in_position("Manager").unwrap(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    employees: BTreeMap<String, Employee>,
    attendance: BTreeMap<(String, NaiveDate), AttendanceRecord>,
    leaves: BTreeMap<u64, LeaveRequest>,
    loans: BTreeMap<u64, LoanRequest>,
    postings: Vec<PayrollPosting>,
    next_leave_id: u64,
    next_loan_id: u64,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn attendance_key(employee_id: &str, date: NaiveDate) -> (String, NaiveDate) {
        (employee_id.to_string(), date)
    }
}

impl PayrollStore for InMemoryStore {
    fn employee(&self, employee_id: &str) -> EngineResult<Option<Employee>> {
        Ok(self.employees.get(employee_id).cloned())
    }

    fn employees(&self) -> EngineResult<Vec<Employee>> {
        Ok(self.employees.values().cloned().collect())
    }

    fn count_in_position(&self, position: &str) -> EngineResult<u32> {
        let count = self
            .employees
            .values()
            .filter(|e| e.position == position)
            .count();
        u32::try_from(count).map_err(|_| EngineError::StorageFailure {
            message: format!("position count overflow for {}", position),
        })
    }

    fn insert_employee(&mut self, employee: Employee) -> EngineResult<()> {
        if self.employees.contains_key(&employee.id) {
            return Err(EngineError::DuplicateEmployee {
                employee_id: employee.id,
            });
        }
        self.employees.insert(employee.id.clone(), employee);
        Ok(())
    }

    fn update_employee(&mut self, employee: Employee) -> EngineResult<()> {
        match self.employees.get_mut(&employee.id) {
            Some(existing) => {
                *existing = employee;
                Ok(())
            }
            None => Err(EngineError::EmployeeNotFound {
                employee_id: employee.id,
            }),
        }
    }

    fn delete_employee(&mut self, employee_id: &str) -> EngineResult<()> {
        if self.employees.remove(employee_id).is_none() {
            return Err(EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            });
        }
        self.attendance.retain(|(id, _), _| id != employee_id);
        self.leaves.retain(|_, l| l.employee_id != employee_id);
        self.loans.retain(|_, l| l.employee_id != employee_id);
        self.postings.retain(|p| p.employee_id != employee_id);
        Ok(())
    }

    fn attendance(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        let from = Self::attendance_key(employee_id, range.start);
        let to = Self::attendance_key(employee_id, range.end);
        Ok(self
            .attendance
            .range(from..=to)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn attendance_on(
        &self,
        employee_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<AttendanceRecord>> {
        Ok(self
            .attendance
            .get(&Self::attendance_key(employee_id, date))
            .cloned())
    }

    fn upsert_attendance(&mut self, record: AttendanceRecord) -> EngineResult<()> {
        let key = Self::attendance_key(&record.employee_id, record.date);
        self.attendance.insert(key, record);
        Ok(())
    }

    fn approved_leaves(
        &self,
        employee_id: &str,
        range: DateRange,
    ) -> EngineResult<BTreeMap<NaiveDate, LeaveType>> {
        Ok(self
            .leaves
            .values()
            .filter(|l| {
                l.employee_id == employee_id
                    && l.status == RequestStatus::Approved
                    && range.contains(l.date)
            })
            .map(|l| (l.date, l.leave_type))
            .collect())
    }

    fn leaves_in_range(
        &self,
        employee_id: &str,
        range: DateRange,
        statuses: &[RequestStatus],
    ) -> EngineResult<Vec<LeaveRequest>> {
        Ok(self
            .leaves
            .values()
            .filter(|l| {
                l.employee_id == employee_id
                    && range.contains(l.date)
                    && statuses.contains(&l.status)
            })
            .cloned()
            .collect())
    }

    fn leaves(&self) -> EngineResult<Vec<LeaveRequest>> {
        Ok(self.leaves.values().cloned().collect())
    }

    fn leave(&self, leave_id: u64) -> EngineResult<Option<LeaveRequest>> {
        Ok(self.leaves.get(&leave_id).cloned())
    }

    fn insert_leave(
        &mut self,
        employee_id: &str,
        date: NaiveDate,
        leave_type: LeaveType,
    ) -> EngineResult<LeaveRequest> {
        self.next_leave_id += 1;
        let leave = LeaveRequest {
            id: self.next_leave_id,
            employee_id: employee_id.to_string(),
            date,
            leave_type,
            status: RequestStatus::Pending,
        };
        self.leaves.insert(leave.id, leave.clone());
        Ok(leave)
    }

    fn set_leave_status(&mut self, leave_id: u64, status: RequestStatus) -> EngineResult<()> {
        let leave = self
            .leaves
            .get_mut(&leave_id)
            .ok_or(EngineError::LeaveNotFound { leave_id })?;
        leave.status = status;
        Ok(())
    }

    fn delete_leave(&mut self, leave_id: u64) -> EngineResult<()> {
        self.leaves
            .remove(&leave_id)
            .map(|_| ())
            .ok_or(EngineError::LeaveNotFound { leave_id })
    }

    fn loans(
        &self,
        employee_id: &str,
        status: Option<RequestStatus>,
    ) -> EngineResult<Vec<LoanRequest>> {
        let mut loans: Vec<LoanRequest> = self
            .loans
            .values()
            .filter(|l| l.employee_id == employee_id && status.is_none_or(|s| l.status == s))
            .cloned()
            .collect();
        loans.sort_by(|a, b| a.date_requested.cmp(&b.date_requested).then(a.id.cmp(&b.id)));
        Ok(loans)
    }

    fn all_loans(&self) -> EngineResult<Vec<LoanRequest>> {
        Ok(self.loans.values().cloned().collect())
    }

    fn loan(&self, loan_id: u64) -> EngineResult<Option<LoanRequest>> {
        Ok(self.loans.get(&loan_id).cloned())
    }

    fn insert_loan(
        &mut self,
        employee_id: &str,
        amount: Decimal,
        requested_at: NaiveDateTime,
    ) -> EngineResult<LoanRequest> {
        self.next_loan_id += 1;
        let loan = LoanRequest {
            id: self.next_loan_id,
            employee_id: employee_id.to_string(),
            amount,
            remaining_balance: Decimal::ZERO,
            date_requested: requested_at,
            status: RequestStatus::Pending,
        };
        self.loans.insert(loan.id, loan.clone());
        Ok(loan)
    }

    fn set_loan_status(
        &mut self,
        loan_id: u64,
        status: RequestStatus,
        remaining_balance: Decimal,
    ) -> EngineResult<()> {
        let loan = self
            .loans
            .get_mut(&loan_id)
            .ok_or(EngineError::LoanNotFound { loan_id })?;
        loan.status = status;
        loan.remaining_balance = remaining_balance;
        Ok(())
    }

    fn debit_loan(&mut self, loan_id: u64, amount: Decimal) -> EngineResult<()> {
        let loan = self
            .loans
            .get_mut(&loan_id)
            .ok_or(EngineError::LoanNotFound { loan_id })?;
        if amount > loan.remaining_balance {
            return Err(EngineError::StorageFailure {
                message: format!(
                    "debit of {} exceeds remaining balance {} on loan {}",
                    amount, loan.remaining_balance, loan_id
                ),
            });
        }
        loan.remaining_balance -= amount;
        Ok(())
    }

    fn payroll_posting(
        &self,
        employee_id: &str,
        period: &PayPeriod,
    ) -> EngineResult<Option<PayrollPosting>> {
        Ok(self
            .postings
            .iter()
            .find(|p| {
                p.employee_id == employee_id
                    && p.period.year == period.year
                    && p.period.month == period.month
                    && p.period.half == period.half
            })
            .cloned())
    }

    fn record_payroll(&mut self, posting: PayrollPosting) -> EngineResult<()> {
        self.postings.push(posting);
        Ok(())
    }

    fn transaction<T, F>(&mut self, f: F) -> EngineResult<T>
    where
        F: FnOnce(&mut Self) -> EngineResult<T>,
    {
        let snapshot = self.clone();
        let result = f(self);
        if result.is_err() {
            *self = snapshot;
        }
        result
    }
}
