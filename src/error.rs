//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while scheduling, evaluating
//! attendance, computing payroll or admitting leave and loan requests.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad category of an [`EngineError`].
///
/// Callers render errors by kind without matching on every variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// An employee or record does not exist.
    NotFound,
    /// A malformed date, time, amount or field value.
    InvalidInput,
    /// A business rule rejected the request.
    PolicyViolation,
    /// The underlying store failed.
    StorageFailure,
    /// The configuration could not be loaded.
    Configuration,
}

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use payroll_engine::error::{EngineError, ErrorKind};
///
/// let error = EngineError::EmployeeNotFound {
///     employee_id: "EMP-404".to_string(),
/// };
/// assert_eq!(error.to_string(), "Employee not found: EMP-404");
/// assert_eq!(error.kind(), ErrorKind::NotFound);
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {employee_id}")]
    EmployeeNotFound {
        /// The id that was looked up.
        employee_id: String,
    },

    /// No leave request exists with the given id.
    #[error("Leave request not found: {leave_id}")]
    LeaveNotFound {
        /// The id that was looked up.
        leave_id: u64,
    },

    /// No loan request exists with the given id.
    #[error("Loan request not found: {loan_id}")]
    LoanNotFound {
        /// The id that was looked up.
        loan_id: u64,
    },

    /// A date string was not `YYYY-MM-DD`.
    #[error("Invalid date '{value}': expected YYYY-MM-DD")]
    InvalidDate {
        /// The rejected input.
        value: String,
    },

    /// A time string was not `HH:MM` or `HH:MM:SS`.
    #[error("Invalid time '{value}': expected HH:MM or HH:MM:SS (24-hour)")]
    InvalidTime {
        /// The rejected input.
        value: String,
    },

    /// A month/year pair does not name a calendar month.
    #[error("Invalid month {month}/{year}")]
    InvalidMonth {
        /// The month number supplied.
        month: u32,
        /// The year supplied.
        year: i32,
    },

    /// A payroll period other than 1 or 2 was requested.
    #[error("Invalid payroll period {period}: expected 1 or 2")]
    InvalidPeriod {
        /// The period number supplied.
        period: u8,
    },

    /// A loan amount was zero or negative.
    #[error("Invalid amount {amount}: must be greater than zero")]
    InvalidAmount {
        /// The rejected amount.
        amount: Decimal,
    },

    /// An employee record was invalid or contained inconsistent data.
    #[error("Invalid employee field '{field}': {message}")]
    InvalidEmployee {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// An attendance override supplied a time-out without a time-in.
    #[error("Time out requires a time in for {date}")]
    TimeOutWithoutTimeIn {
        /// The attendance date.
        date: NaiveDate,
    },

    /// Clock-out attempted before any clock-in on that date.
    #[error("Employee {employee_id} must clock in before clocking out on {date}")]
    NotClockedIn {
        /// The employee.
        employee_id: String,
        /// The attendance date.
        date: NaiveDate,
    },

    /// A second clock-in on the same date.
    #[error("Already clocked in on {date} at {time_in}")]
    AlreadyClockedIn {
        /// The attendance date.
        date: NaiveDate,
        /// The existing time-in.
        time_in: String,
    },

    /// A second clock-out on the same date.
    #[error("Already clocked out on {date} at {time_out}")]
    AlreadyClockedOut {
        /// The attendance date.
        date: NaiveDate,
        /// The existing time-out.
        time_out: String,
    },

    /// Leave requested on a Saturday or Sunday.
    #[error("Cannot request leave on a weekend ({date})")]
    WeekendLeave {
        /// The requested date.
        date: NaiveDate,
    },

    /// The weekly leave quota would be exceeded.
    #[error(
        "Leave quota exceeded for week starting {week_start}: already requested {existing} day(s), limit is {limit}"
    )]
    QuotaExceeded {
        /// Monday of the affected week.
        week_start: NaiveDate,
        /// Day-equivalents already pending or approved in that week.
        existing: Decimal,
        /// The weekly limit.
        limit: Decimal,
    },

    /// Outstanding loans plus the new request would exceed the cap.
    #[error("Loan cap exceeded: outstanding {outstanding} + requested {requested} exceeds {cap}")]
    CapExceeded {
        /// Remaining balance across approved loans.
        outstanding: Decimal,
        /// The requested amount.
        requested: Decimal,
        /// The cap for this employee.
        cap: Decimal,
    },

    /// A position already holds its maximum head count.
    #[error("Maximum for {position} is {limit}")]
    PositionQuotaExceeded {
        /// The position name.
        position: String,
        /// The configured head count.
        limit: u32,
    },

    /// An attempt to create or modify a record dated in the past.
    #[error("Cannot modify {record} dated {date}: date is in the past")]
    PastDateModification {
        /// What was being modified.
        record: String,
        /// The record's date.
        date: NaiveDate,
    },

    /// A status change from a non-pending state.
    #[error("Cannot change {record} {id} from {from} to {to}")]
    InvalidTransition {
        /// What was being modified.
        record: String,
        /// The record id.
        id: u64,
        /// Current status.
        from: String,
        /// Requested status.
        to: String,
    },

    /// The same payroll period was posted twice.
    #[error("Payroll already posted for {employee_id} ({label})")]
    PayrollAlreadyPosted {
        /// The employee.
        employee_id: String,
        /// The month/period label.
        label: String,
    },

    /// An employee with this id already exists.
    #[error("Employee ID {employee_id} already exists")]
    DuplicateEmployee {
        /// The conflicting id.
        employee_id: String,
    },

    /// The persistence collaborator failed.
    #[error("Storage failure: {message}")]
    StorageFailure {
        /// A description of the failure.
        message: String,
    },
}

impl EngineError {
    /// Returns the broad category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorKind::Configuration
            }
            EngineError::EmployeeNotFound { .. }
            | EngineError::LeaveNotFound { .. }
            | EngineError::LoanNotFound { .. } => ErrorKind::NotFound,
            EngineError::InvalidDate { .. }
            | EngineError::InvalidTime { .. }
            | EngineError::InvalidMonth { .. }
            | EngineError::InvalidPeriod { .. }
            | EngineError::InvalidAmount { .. }
            | EngineError::InvalidEmployee { .. }
            | EngineError::TimeOutWithoutTimeIn { .. }
            | EngineError::NotClockedIn { .. } => ErrorKind::InvalidInput,
            EngineError::AlreadyClockedIn { .. }
            | EngineError::AlreadyClockedOut { .. }
            | EngineError::WeekendLeave { .. }
            | EngineError::QuotaExceeded { .. }
            | EngineError::CapExceeded { .. }
            | EngineError::PositionQuotaExceeded { .. }
            | EngineError::PastDateModification { .. }
            | EngineError::InvalidTransition { .. }
            | EngineError::PayrollAlreadyPosted { .. }
            | EngineError::DuplicateEmployee { .. } => ErrorKind::PolicyViolation,
            EngineError::StorageFailure { .. } => ErrorKind::StorageFailure,
        }
    }

    /// Returns a stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                "CONFIG_ERROR"
            }
            EngineError::EmployeeNotFound { .. } => "EMPLOYEE_NOT_FOUND",
            EngineError::LeaveNotFound { .. } => "LEAVE_NOT_FOUND",
            EngineError::LoanNotFound { .. } => "LOAN_NOT_FOUND",
            EngineError::InvalidDate { .. } => "INVALID_DATE",
            EngineError::InvalidTime { .. } => "INVALID_TIME",
            EngineError::InvalidMonth { .. } => "INVALID_MONTH",
            EngineError::InvalidPeriod { .. } => "INVALID_PERIOD",
            EngineError::InvalidAmount { .. } => "INVALID_AMOUNT",
            EngineError::InvalidEmployee { .. } => "INVALID_EMPLOYEE",
            EngineError::TimeOutWithoutTimeIn { .. } => "TIME_OUT_WITHOUT_TIME_IN",
            EngineError::NotClockedIn { .. } => "NOT_CLOCKED_IN",
            EngineError::AlreadyClockedIn { .. } => "ALREADY_CLOCKED_IN",
            EngineError::AlreadyClockedOut { .. } => "ALREADY_CLOCKED_OUT",
            EngineError::WeekendLeave { .. } => "WEEKEND_LEAVE",
            EngineError::QuotaExceeded { .. } => "QUOTA_EXCEEDED",
            EngineError::CapExceeded { .. } => "CAP_EXCEEDED",
            EngineError::PositionQuotaExceeded { .. } => "POSITION_QUOTA_EXCEEDED",
            EngineError::PastDateModification { .. } => "PAST_DATE_MODIFICATION",
            EngineError::InvalidTransition { .. } => "INVALID_TRANSITION",
            EngineError::PayrollAlreadyPosted { .. } => "PAYROLL_ALREADY_POSTED",
            EngineError::DuplicateEmployee { .. } => "DUPLICATE_EMPLOYEE",
            EngineError::StorageFailure { .. } => "STORAGE_FAILURE",
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
