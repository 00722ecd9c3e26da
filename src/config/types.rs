//! Configuration types for the payroll engine.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use chrono::Weekday;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::models::ShiftDefinition;

/// Organization metadata from organization.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganizationConfig {
    /// The organization's display name.
    pub name: String,
    /// Identifier of the backing database.
    pub database: String,
}

/// Flat statutory contribution and tax rates, applied to gross pay.
#[derive(Debug, Clone, Deserialize)]
pub struct StatutoryRates {
    /// Social Security System rate (e.g., 0.045).
    pub sss_rate: Decimal,
    /// Pag-IBIG fund rate (e.g., 0.02).
    pub pagibig_rate: Decimal,
    /// PhilHealth rate (e.g., 0.02).
    pub philhealth_rate: Decimal,
    /// Flat income tax rate (e.g., 0.10).
    pub tax_rate: Decimal,
}

/// Loan admission and repayment settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LoanSettings {
    /// Outstanding loans may not exceed this multiple of the monthly salary.
    pub cap_multiplier: Decimal,
    /// Fixed installment deducted each payroll period.
    pub installment_per_period: Decimal,
}

/// Leave admission settings.
#[derive(Debug, Clone, Deserialize)]
pub struct LeaveSettings {
    /// Maximum pending plus approved leave day-equivalents per Mon-Fri week.
    pub weekly_quota_days: Decimal,
}

/// Payroll settings from payroll.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PayrollSettings {
    /// Statutory deduction rates.
    pub statutory: StatutoryRates,
    /// Paid hours per working day.
    pub standard_paid_hours: Decimal,
    /// Divisor turning a monthly salary into a daily rate.
    pub working_days_per_month: Decimal,
    /// Multiplier applied to the hourly rate for overtime hours.
    pub overtime_multiplier: Decimal,
    /// Last day of the first semi-monthly period.
    pub period_cutoff_day: u32,
    /// Loan settings.
    pub loans: LoanSettings,
    /// Leave settings.
    pub leave: LeaveSettings,
}

/// How a position's working days are assigned a shift.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShiftAssignment {
    /// Every workday uses the same shift.
    Fixed {
        /// The shift worked.
        shift: ShiftDefinition,
    },
    /// The shift is picked by the A/B/C suffix of the position name.
    GuardRotation,
}

/// The schedule policy of one position.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SchedulePolicy {
    /// The position name this policy applies to.
    pub position: String,
    /// Days of the week worked; every other day is a rest day.
    pub workdays: Vec<Weekday>,
    /// The shift assignment for workdays.
    pub shift: ShiftAssignment,
}

/// The three rotating guard shifts, keyed by position suffix.
#[derive(Debug, Clone, Deserialize)]
pub struct GuardShifts {
    /// Shift for positions ending in "A".
    pub a: ShiftDefinition,
    /// Shift for positions ending in "B".
    pub b: ShiftDefinition,
    /// Shift for every other guard position.
    pub c: ShiftDefinition,
}

/// The policy used for positions without an explicit entry.
#[derive(Debug, Clone, Deserialize)]
pub struct FallbackPolicy {
    /// Days of the week worked.
    pub workdays: Vec<Weekday>,
    /// The shift worked.
    pub shift: ShiftDefinition,
}

/// Positions configuration from positions.yaml.
#[derive(Debug, Clone, Deserialize)]
pub struct PositionsConfig {
    /// Org-wide head-count caps per position.
    #[serde(default)]
    pub quotas: HashMap<String, u32>,
    /// Rotating guard shift definitions.
    pub guard_shifts: GuardShifts,
    /// Policy for unmapped positions.
    pub fallback: FallbackPolicy,
    /// Explicit position-to-schedule table.
    #[serde(default)]
    pub policies: Vec<SchedulePolicy>,
}

/// The complete payroll configuration loaded from YAML files.
///
/// Immutable once loaded; components receive it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    organization: OrganizationConfig,
    payroll: PayrollSettings,
    positions: PositionsConfig,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(
        organization: OrganizationConfig,
        payroll: PayrollSettings,
        positions: PositionsConfig,
    ) -> Self {
        Self {
            organization,
            payroll,
            positions,
        }
    }

    /// Returns the organization metadata.
    pub fn organization(&self) -> &OrganizationConfig {
        &self.organization
    }

    /// Returns the payroll settings.
    pub fn payroll(&self) -> &PayrollSettings {
        &self.payroll
    }

    /// Returns the positions configuration.
    pub fn positions(&self) -> &PositionsConfig {
        &self.positions
    }

    /// Returns the explicit schedule policy for a position name, if any.
    pub fn policy_for(&self, position: &str) -> Option<&SchedulePolicy> {
        self.positions
            .policies
            .iter()
            .find(|p| p.position == position)
    }

    /// Returns the head-count cap for a position, if one is configured.
    pub fn position_quota(&self, position: &str) -> Option<u32> {
        self.positions.quotas.get(position).copied()
    }
}
