//! Calculation logic for the payroll engine.
//!
//! This module contains the computation components: date/time arithmetic,
//! shift scheduling, attendance evaluation, semi-monthly payroll and the
//! all-employee roster. Every component is constructed with the shared
//! configuration and reads storage only through snapshots.

mod attendance;
mod payroll;
mod roster;
mod schedule;
mod time_math;

pub use attendance::{AttendanceEvaluator, evaluate_day};
pub use payroll::{PayrollCalculator, allocate_loan_debits};
pub use roster::{roster_line, roster_totals, summarize_roster};
pub use schedule::{GuardSlot, PositionSchedule, ShiftScheduler};
pub use time_math::{
    DATE_FORMAT, overtime, overtime_hours, parse_date, parse_optional_time, parse_time,
    shift_window, tardiness_minutes, undertime_minutes, validate_date, validate_time,
};
