//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod leave;
mod loan;
mod pay_period;
mod payroll_report;
mod shift;

pub use attendance::{
    AttendanceRecord, AttendanceReport, AttendanceRow, AttendanceStatus, AttendanceSummary,
    Overtime, PLACEHOLDER,
};
pub use employee::{Employee, MAX_MONTHLY_SALARY};
pub use leave::{LeaveRequest, LeaveType, RequestStatus};
pub use loan::{LoanDebit, LoanRequest};
pub use pay_period::{DateRange, PayPeriod, PeriodHalf};
pub use payroll_report::{
    AuditStep, PayrollComputation, PayrollPosting, PayrollReport, RosterLine, RosterSummary,
    RosterTotals, round_currency,
};
pub use shift::{Schedule, ScheduleDay, ScheduleEntry, ScheduleRow, ShiftDefinition};
