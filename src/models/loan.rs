//! Loan models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::RequestStatus;

/// A salary loan request.
///
/// `remaining_balance` stays zero while the request is pending and is set
/// to `amount` on approval; payroll loan deductions then reduce it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRequest {
    /// Store-assigned identifier.
    pub id: u64,
    /// The borrowing employee.
    pub employee_id: String,
    /// The principal requested.
    pub amount: Decimal,
    /// Outstanding principal.
    pub remaining_balance: Decimal,
    /// When the request was submitted.
    pub date_requested: NaiveDateTime,
    /// Current status.
    pub status: RequestStatus,
}

impl LoanRequest {
    /// Returns true for approved loans that still carry a balance.
    pub fn is_outstanding(&self) -> bool {
        self.status == RequestStatus::Approved && self.remaining_balance > Decimal::ZERO
    }
}

/// A reduction of one loan's remaining balance requested by payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDebit {
    /// The loan to debit.
    pub loan_id: u64,
    /// The amount to subtract from its remaining balance.
    pub amount: Decimal,
}
