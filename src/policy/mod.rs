//! Admission-control rules.
//!
//! Policies are pure checks over a snapshot. Each has a `check` taking the
//! snapshot explicitly and an `evaluate` that reads it from a
//! [`PayrollStore`](crate::store::PayrollStore); callers run `evaluate`
//! and the following write inside one store transaction. Approving or
//! rejecting a pending request never re-runs these checks.

mod leave_quota;
mod loan_cap;
mod position_quota;

pub use leave_quota::{LeaveQuotaPolicy, leave_week};
pub use loan_cap::LoanCapPolicy;
pub use position_quota::PositionQuotaPolicy;
