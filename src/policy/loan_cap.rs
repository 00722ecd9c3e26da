//! Loan cap.
//!
//! The remaining balance of an employee's approved loans plus a new request
//! may not exceed a multiple of their monthly salary. Pending requests do
//! not count toward the cap.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, LoanRequest, RequestStatus};
use crate::store::PayrollStore;

/// Admission check for loan requests.
#[derive(Debug, Clone)]
pub struct LoanCapPolicy {
    config: Arc<PayrollConfig>,
}

impl LoanCapPolicy {
    /// Creates the policy over the given configuration.
    pub fn new(config: Arc<PayrollConfig>) -> Self {
        Self { config }
    }

    /// The most an employee may owe across approved loans.
    ///
    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn cap(&self, monthly_salary: Decimal) -> Decimal {
        monthly_salary.saturating_mul(self.config.payroll().loans.cap_multiplier)
    }

    /// Checks a request against the employee's outstanding loans.
    pub fn check(
        &self,
        employee: &Employee,
        amount: Decimal,
        loans: &[LoanRequest],
    ) -> EngineResult<()> {
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount { amount });
        }

        let outstanding = loans
            .iter()
            .filter(|l| l.is_outstanding())
            .fold(Decimal::ZERO, |total, l| total.saturating_add(l.remaining_balance));
        let cap = self.cap(employee.monthly_salary);

        // An amount too large to add is over any cap.
        match outstanding.checked_add(amount) {
            Some(total) if total <= cap => Ok(()),
            _ => Err(EngineError::CapExceeded {
                outstanding,
                requested: amount,
                cap,
            }),
        }
    }

    /// Reads the employee and their approved loans, then checks the request.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` for a zero or negative amount
    /// - `EmployeeNotFound` if the id is unknown
    /// - `CapExceeded` if the cap would be exceeded
    pub fn evaluate<S: PayrollStore + ?Sized>(
        &self,
        store: &S,
        employee_id: &str,
        amount: Decimal,
    ) -> EngineResult<()> {
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidAmount { amount });
        }
        let employee = store
            .employee(employee_id)?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })?;
        let loans = store.loans(employee_id, Some(RequestStatus::Approved))?;
        self.check(&employee, amount, &loans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::fixtures::test_config;
    use crate::store::InMemoryStore;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn employee(salary: &str) -> Employee {
        Employee {
            id: "EMP-001".to_string(),
            name: "Pedro Reyes".to_string(),
            position: "Sales".to_string(),
            department: "Sales".to_string(),
            monthly_salary: dec(salary),
        }
    }

    fn approved(id: u64, remaining: &str) -> LoanRequest {
        LoanRequest {
            id,
            employee_id: "EMP-001".to_string(),
            amount: dec(remaining),
            remaining_balance: dec(remaining),
            date_requested: NaiveDate::from_ymd_opt(2026, 1, 5)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            status: RequestStatus::Approved,
        }
    }

    fn policy() -> LoanCapPolicy {
        LoanCapPolicy::new(test_config())
    }

    #[test]
    fn test_request_up_to_cap_is_admitted() {
        let loans = vec![approved(1, "30000"), approved(2, "20000")];
        assert!(policy().check(&employee("20000"), dec("10000"), &loans).is_ok());
    }

    #[test]
    fn test_request_over_cap_is_rejected() {
        let loans = vec![approved(1, "50000")];
        match policy().check(&employee("20000"), dec("10001"), &loans) {
            Err(EngineError::CapExceeded {
                outstanding,
                requested,
                cap,
            }) => {
                assert_eq!(outstanding, dec("50000"));
                assert_eq!(requested, dec("10001"));
                assert_eq!(cap, dec("60000"));
            }
            other => panic!("Expected CapExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_amount_is_invalid() {
        assert!(matches!(
            policy().check(&employee("20000"), Decimal::ZERO, &[]),
            Err(EngineError::InvalidAmount { .. })
        ));
        assert!(matches!(
            policy().check(&employee("20000"), dec("-5"), &[]),
            Err(EngineError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_paid_off_and_pending_loans_do_not_count() {
        let mut pending = approved(2, "60000");
        pending.status = RequestStatus::Pending;
        let loans = vec![approved(1, "0"), pending];
        assert!(policy().check(&employee("20000"), dec("60000"), &loans).is_ok());
    }

    #[test]
    fn test_amount_that_overflows_is_over_cap() {
        let loans = vec![approved(1, "1000")];
        match policy().check(&employee("20000"), Decimal::MAX, &loans) {
            Err(EngineError::CapExceeded { outstanding, cap, .. }) => {
                assert_eq!(outstanding, dec("1000"));
                assert_eq!(cap, dec("60000"));
            }
            other => panic!("Expected CapExceeded, got {:?}", other),
        }
    }

    #[test]
    fn test_cap_saturates_for_huge_salary() {
        assert_eq!(policy().cap(Decimal::MAX), Decimal::MAX);
    }

    #[test]
    fn test_evaluate_unknown_employee() {
        let store = InMemoryStore::new();
        assert!(matches!(
            policy().evaluate(&store, "EMP-404", dec("100")),
            Err(EngineError::EmployeeNotFound { .. })
        ));
    }
}
