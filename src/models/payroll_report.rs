//! Payroll report models for the payroll engine.
//!
//! This module contains the [`PayrollReport`] value object and the types that
//! travel with it: the audit trail of a computation, the loan debits it
//! requests, roster aggregation and posted-payroll records.

use chrono::NaiveDateTime;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::{LoanDebit, PayPeriod};

/// Rounds a currency or quantity value to 2 decimal places.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A single step in the audit trail recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// The payroll figures of one employee for one semi-monthly period.
///
/// Fields carry full precision. The reconciliation identities hold exactly:
/// `gross_pay = base_pay + overtime_pay`, `total_deductions` is the sum of
/// the eight deduction fields, and `net_pay = gross_pay - total_deductions`.
/// Use [`PayrollReport::rounded`] for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollReport {
    /// The employee.
    pub employee_id: String,
    /// Month label (e.g., "March 2026").
    pub month: String,
    /// Period label (e.g., "Period 1 (1-15)").
    pub period_label: String,
    /// Monthly salary.
    pub monthly_salary: Decimal,
    /// Monthly salary over working days per month.
    pub daily_rate: Decimal,
    /// Daily rate over standard paid hours.
    pub hourly_rate: Decimal,
    /// Present days plus leave day-equivalents in the period.
    pub days_present: Decimal,
    /// Leave day-equivalents included in `days_present`.
    pub approved_leave_days: Decimal,
    /// Absent days in the period.
    pub days_absent: Decimal,
    /// Known overtime hours in the period.
    pub total_overtime_hours: Decimal,
    /// Tardiness minutes in the period.
    pub total_tardiness_minutes: Decimal,
    /// Undertime minutes in the period.
    pub total_undertime_minutes: Decimal,
    /// Daily rate times days present.
    pub base_pay: Decimal,
    /// Hourly rate times overtime hours times the overtime multiplier.
    pub overtime_pay: Decimal,
    /// Base pay plus overtime pay.
    pub gross_pay: Decimal,
    /// Social Security System contribution.
    pub sss: Decimal,
    /// Pag-IBIG fund contribution.
    pub pagibig: Decimal,
    /// PhilHealth contribution.
    pub philhealth: Decimal,
    /// Flat-rate income tax.
    pub tax: Decimal,
    /// Daily rate times days absent.
    pub absence_deduction: Decimal,
    /// Per-minute rate times tardiness minutes.
    pub tardiness_deduction: Decimal,
    /// Per-minute rate times undertime minutes.
    pub undertime_deduction: Decimal,
    /// Loan installment for the period.
    pub loan_deduction: Decimal,
    /// Sum of all deductions.
    pub total_deductions: Decimal,
    /// Gross pay minus total deductions.
    pub net_pay: Decimal,
}

impl PayrollReport {
    /// Returns a copy with every numeric field rounded to 2 decimal places.
    ///
    /// Totals are summed from the rounded components rather than rounded
    /// on their own, so the reconciliation identities hold exactly on the
    /// displayed figures too.
    pub fn rounded(&self) -> PayrollReport {
        let base_pay = round_currency(self.base_pay);
        let overtime_pay = round_currency(self.overtime_pay);
        let gross_pay = base_pay + overtime_pay;

        let sss = round_currency(self.sss);
        let pagibig = round_currency(self.pagibig);
        let philhealth = round_currency(self.philhealth);
        let tax = round_currency(self.tax);
        let absence_deduction = round_currency(self.absence_deduction);
        let tardiness_deduction = round_currency(self.tardiness_deduction);
        let undertime_deduction = round_currency(self.undertime_deduction);
        let loan_deduction = round_currency(self.loan_deduction);
        let total_deductions = sss
            + pagibig
            + philhealth
            + tax
            + absence_deduction
            + tardiness_deduction
            + undertime_deduction
            + loan_deduction;

        PayrollReport {
            employee_id: self.employee_id.clone(),
            month: self.month.clone(),
            period_label: self.period_label.clone(),
            monthly_salary: round_currency(self.monthly_salary),
            daily_rate: round_currency(self.daily_rate),
            hourly_rate: round_currency(self.hourly_rate),
            days_present: round_currency(self.days_present),
            approved_leave_days: round_currency(self.approved_leave_days),
            days_absent: round_currency(self.days_absent),
            total_overtime_hours: round_currency(self.total_overtime_hours),
            total_tardiness_minutes: round_currency(self.total_tardiness_minutes),
            total_undertime_minutes: round_currency(self.total_undertime_minutes),
            base_pay,
            overtime_pay,
            gross_pay,
            sss,
            pagibig,
            philhealth,
            tax,
            absence_deduction,
            tardiness_deduction,
            undertime_deduction,
            loan_deduction,
            total_deductions,
            net_pay: gross_pay - total_deductions,
        }
    }
}

/// The complete result of a payroll calculation.
///
/// The loan debits are requested side effects: the calculator never
/// mutates storage, callers that post the payroll apply them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollComputation {
    /// The pay period computed.
    pub period: PayPeriod,
    /// The report.
    pub report: PayrollReport,
    /// Loan balance reductions implied by `report.loan_deduction`.
    pub loan_debits: Vec<LoanDebit>,
    /// The calculation decisions, in order.
    pub audit_steps: Vec<AuditStep>,
}

/// One line of the all-employees roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RosterLine {
    /// The employee's payroll was computed.
    Computed {
        /// The employee.
        employee_id: String,
        /// The employee's name.
        name: String,
        /// Gross pay.
        gross_pay: Decimal,
        /// Total deductions.
        total_deductions: Decimal,
        /// Net pay.
        net_pay: Decimal,
    },
    /// The computation failed; the message is shown in place of figures.
    Failed {
        /// The employee.
        employee_id: String,
        /// The employee's name.
        name: String,
        /// The error message.
        error: String,
    },
}

/// The grand-total row of a roster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterTotals {
    /// Sum of gross pay over computed lines.
    pub gross_pay: Decimal,
    /// Sum of total deductions over computed lines.
    pub total_deductions: Decimal,
    /// Sum of net pay over computed lines.
    pub net_pay: Decimal,
}

/// Payroll overview of every employee for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSummary {
    /// Title (e.g., "Payroll Overview - March 2026 - Period 1").
    pub title: String,
    /// The period covered.
    pub period: PayPeriod,
    /// One line per employee, ordered by employee id.
    pub lines: Vec<RosterLine>,
    /// Grand totals.
    pub totals: RosterTotals,
}

/// A posted payroll: the record that loan debits for a period were applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollPosting {
    /// The employee.
    pub employee_id: String,
    /// The period posted.
    pub period: PayPeriod,
    /// Net pay at posting time.
    pub net_pay: Decimal,
    /// Loan deduction applied.
    pub loan_deduction: Decimal,
    /// When the posting happened.
    pub posted_at: NaiveDateTime,
}
