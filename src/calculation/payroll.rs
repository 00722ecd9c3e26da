//! Semi-monthly payroll calculation.
//!
//! This module turns an attendance report and an employee's approved loans
//! into a [`PayrollReport`] for one half of a month. The calculation is a
//! pure function of its inputs; loan balance reductions are returned as
//! [`LoanDebit`]s for the caller to apply.
//!
//! Derivation:
//! - `daily_rate = monthly_salary / working_days_per_month`
//! - `hourly_rate = daily_rate / standard_paid_hours`
//! - `base_pay = daily_rate * days_present`
//! - `overtime_pay = hourly_rate * overtime_hours * overtime_multiplier`
//! - statutory contributions and tax are flat rates on gross pay
//! - absence, tardiness and undertime are charged at the daily and
//!   per-minute rates
//! - the loan installment is capped at the outstanding balance

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::debug;

use crate::config::PayrollConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceReport, AuditStep, Employee, LoanDebit, LoanRequest, PayPeriod, PayrollComputation,
    PayrollReport, PeriodHalf, RequestStatus,
};
use crate::store::PayrollStore;

use super::attendance::AttendanceEvaluator;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Splits a total loan deduction across loans, oldest first.
///
/// `loans` must be ordered oldest first; loans that are not outstanding
/// are skipped.
pub fn allocate_loan_debits(loans: &[LoanRequest], total: Decimal) -> Vec<LoanDebit> {
    let mut left = total;
    let mut debits = Vec::new();
    for loan in loans.iter().filter(|l| l.is_outstanding()) {
        if left <= Decimal::ZERO {
            break;
        }
        let amount = left.min(loan.remaining_balance);
        debits.push(LoanDebit {
            loan_id: loan.id,
            amount,
        });
        left -= amount;
    }
    debits
}

/// Computes payroll reports from attendance and loan snapshots.
#[derive(Debug, Clone)]
pub struct PayrollCalculator {
    config: Arc<PayrollConfig>,
    evaluator: AttendanceEvaluator,
}

impl PayrollCalculator {
    /// Creates a calculator over the given configuration.
    pub fn new(config: Arc<PayrollConfig>) -> Self {
        Self {
            evaluator: AttendanceEvaluator::new(Arc::clone(&config)),
            config,
        }
    }

    /// Returns the attendance evaluator feeding this calculator.
    pub fn evaluator(&self) -> &AttendanceEvaluator {
        &self.evaluator
    }

    /// Resolves a period number (1 or 2) to its date window.
    ///
    /// # Errors
    ///
    /// - `InvalidPeriod` if `period` is not 1 or 2
    /// - `InvalidMonth` if `month`/`year` do not name a calendar month
    pub fn period(&self, month: u32, year: i32, period: u8) -> EngineResult<PayPeriod> {
        let half = PeriodHalf::from_number(period)?;
        PayPeriod::new(year, month, half, self.config.payroll().period_cutoff_day)
    }

    /// Computes the payroll of one employee for one period.
    ///
    /// Only attendance rows inside `period` contribute. `loans` should be
    /// the employee's approved loans, oldest first.
    pub fn compute(
        &self,
        employee: &Employee,
        period: &PayPeriod,
        attendance: &AttendanceReport,
        loans: &[LoanRequest],
    ) -> PayrollComputation {
        let settings = self.config.payroll();
        let statutory = &settings.statutory;
        let mut audit_steps = Vec::new();

        // Step 1: rates
        let daily_rate = employee.monthly_salary / settings.working_days_per_month;
        let hourly_rate = daily_rate / settings.standard_paid_hours;
        let minute_rate = hourly_rate / MINUTES_PER_HOUR;
        audit_steps.push(AuditStep {
            step_number: 1,
            rule_id: "rate_derivation".to_string(),
            rule_name: "Rate Derivation".to_string(),
            input: serde_json::json!({
                "monthly_salary": employee.monthly_salary.to_string(),
                "working_days_per_month": settings.working_days_per_month.to_string(),
                "standard_paid_hours": settings.standard_paid_hours.to_string()
            }),
            output: serde_json::json!({
                "daily_rate": daily_rate.round_dp(4).to_string(),
                "hourly_rate": hourly_rate.round_dp(4).to_string()
            }),
            reasoning: format!(
                "{} / {} days = {} per day; / {} hours = {} per hour",
                employee.monthly_salary,
                settings.working_days_per_month,
                daily_rate.round_dp(2),
                settings.standard_paid_hours,
                hourly_rate.round_dp(2)
            ),
        });

        // Step 2: restrict attendance to the period
        let summary = attendance.summarize_within(period.range);
        audit_steps.push(AuditStep {
            step_number: 2,
            rule_id: "period_attendance".to_string(),
            rule_name: "Period Attendance".to_string(),
            input: serde_json::json!({
                "period_start": period.range.start.to_string(),
                "period_end": period.range.end.to_string(),
                "rows_in_month": attendance.rows.len()
            }),
            output: serde_json::json!({
                "total_workdays": summary.total_workdays,
                "days_present": summary.days_present.to_string(),
                "approved_leave_days": summary.approved_leave_days.to_string(),
                "days_absent": summary.days_absent.to_string(),
                "total_overtime_hours": summary.total_overtime_hours.to_string(),
                "total_tardiness_minutes": summary.total_tardiness_minutes.to_string(),
                "total_undertime_minutes": summary.total_undertime_minutes.to_string()
            }),
            reasoning: format!(
                "{} workdays in {}: {} present (including {} leave), {} absent",
                summary.total_workdays,
                period.label(),
                summary.days_present,
                summary.approved_leave_days,
                summary.days_absent
            ),
        });

        // Step 3: earnings
        let base_pay = daily_rate * summary.days_present;
        let overtime_pay =
            hourly_rate * summary.total_overtime_hours * settings.overtime_multiplier;
        let gross_pay = base_pay + overtime_pay;
        audit_steps.push(AuditStep {
            step_number: 3,
            rule_id: "earnings".to_string(),
            rule_name: "Earnings".to_string(),
            input: serde_json::json!({
                "days_present": summary.days_present.to_string(),
                "overtime_hours": summary.total_overtime_hours.to_string(),
                "overtime_multiplier": settings.overtime_multiplier.to_string()
            }),
            output: serde_json::json!({
                "base_pay": base_pay.round_dp(2).to_string(),
                "overtime_pay": overtime_pay.round_dp(2).to_string(),
                "gross_pay": gross_pay.round_dp(2).to_string()
            }),
            reasoning: format!(
                "Base {} + overtime {} = gross {}",
                base_pay.round_dp(2),
                overtime_pay.round_dp(2),
                gross_pay.round_dp(2)
            ),
        });

        // Step 4: statutory deductions on gross
        let sss = gross_pay * statutory.sss_rate;
        let pagibig = gross_pay * statutory.pagibig_rate;
        let philhealth = gross_pay * statutory.philhealth_rate;
        let tax = gross_pay * statutory.tax_rate;
        audit_steps.push(AuditStep {
            step_number: 4,
            rule_id: "statutory_deductions".to_string(),
            rule_name: "Statutory Deductions".to_string(),
            input: serde_json::json!({
                "gross_pay": gross_pay.round_dp(2).to_string(),
                "sss_rate": statutory.sss_rate.to_string(),
                "pagibig_rate": statutory.pagibig_rate.to_string(),
                "philhealth_rate": statutory.philhealth_rate.to_string(),
                "tax_rate": statutory.tax_rate.to_string()
            }),
            output: serde_json::json!({
                "sss": sss.round_dp(2).to_string(),
                "pagibig": pagibig.round_dp(2).to_string(),
                "philhealth": philhealth.round_dp(2).to_string(),
                "tax": tax.round_dp(2).to_string()
            }),
            reasoning: "Flat contribution and tax rates applied to gross pay".to_string(),
        });

        // Step 5: attendance deductions
        let absence_deduction = daily_rate * summary.days_absent;
        let tardiness_deduction = minute_rate * summary.total_tardiness_minutes;
        let undertime_deduction = minute_rate * summary.total_undertime_minutes;
        audit_steps.push(AuditStep {
            step_number: 5,
            rule_id: "attendance_deductions".to_string(),
            rule_name: "Attendance Deductions".to_string(),
            input: serde_json::json!({
                "days_absent": summary.days_absent.to_string(),
                "tardiness_minutes": summary.total_tardiness_minutes.to_string(),
                "undertime_minutes": summary.total_undertime_minutes.to_string(),
                "minute_rate": minute_rate.round_dp(4).to_string()
            }),
            output: serde_json::json!({
                "absence_deduction": absence_deduction.round_dp(2).to_string(),
                "tardiness_deduction": tardiness_deduction.round_dp(2).to_string(),
                "undertime_deduction": undertime_deduction.round_dp(2).to_string()
            }),
            reasoning: format!(
                "{} absent day(s) at the daily rate; {} late and {} early minute(s) at the per-minute rate",
                summary.days_absent,
                summary.total_tardiness_minutes,
                summary.total_undertime_minutes
            ),
        });

        // Step 6: loan installment
        let outstanding: Decimal = loans
            .iter()
            .filter(|l| l.is_outstanding())
            .map(|l| l.remaining_balance)
            .sum();
        let installment = settings.loans.installment_per_period;
        let loan_deduction = installment.min(outstanding);
        let loan_debits = allocate_loan_debits(loans, loan_deduction);
        audit_steps.push(AuditStep {
            step_number: 6,
            rule_id: "loan_deduction".to_string(),
            rule_name: "Loan Deduction".to_string(),
            input: serde_json::json!({
                "outstanding_balance": outstanding.to_string(),
                "installment_per_period": installment.to_string()
            }),
            output: serde_json::json!({
                "loan_deduction": loan_deduction.to_string(),
                "debits": loan_debits
                    .iter()
                    .map(|d| serde_json::json!({"loan_id": d.loan_id, "amount": d.amount.to_string()}))
                    .collect::<Vec<_>>()
            }),
            reasoning: format!(
                "Lesser of installment {} and outstanding balance {}",
                installment, outstanding
            ),
        });

        // Step 7: net
        let total_deductions = sss
            + pagibig
            + philhealth
            + tax
            + absence_deduction
            + tardiness_deduction
            + undertime_deduction
            + loan_deduction;
        let net_pay = gross_pay - total_deductions;
        audit_steps.push(AuditStep {
            step_number: 7,
            rule_id: "net_pay".to_string(),
            rule_name: "Net Pay".to_string(),
            input: serde_json::json!({
                "gross_pay": gross_pay.round_dp(2).to_string(),
                "total_deductions": total_deductions.round_dp(2).to_string()
            }),
            output: serde_json::json!({
                "net_pay": net_pay.round_dp(2).to_string()
            }),
            reasoning: format!(
                "Gross {} - deductions {} = net {}",
                gross_pay.round_dp(2),
                total_deductions.round_dp(2),
                net_pay.round_dp(2)
            ),
        });

        let report = PayrollReport {
            employee_id: employee.id.clone(),
            month: period.month_label(),
            period_label: period.label(),
            monthly_salary: employee.monthly_salary,
            daily_rate,
            hourly_rate,
            days_present: summary.days_present,
            approved_leave_days: summary.approved_leave_days,
            days_absent: summary.days_absent,
            total_overtime_hours: summary.total_overtime_hours,
            total_tardiness_minutes: summary.total_tardiness_minutes,
            total_undertime_minutes: summary.total_undertime_minutes,
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
            net_pay,
        };

        PayrollComputation {
            period: *period,
            report,
            loan_debits,
            audit_steps,
        }
    }

    /// Reads an employee's snapshot from the store and computes their payroll.
    ///
    /// Nothing is written; apply `loan_debits` to post the result.
    ///
    /// # Errors
    ///
    /// - `EmployeeNotFound` if the id is unknown
    /// - `InvalidPeriod` / `InvalidMonth` for a bad period or month
    /// - `StorageFailure` if a read fails
    pub fn calculate<S: PayrollStore + ?Sized>(
        &self,
        store: &S,
        employee_id: &str,
        month: u32,
        year: i32,
        period: u8,
    ) -> EngineResult<PayrollComputation> {
        let pay_period = self.period(month, year, period)?;
        let employee = store
            .employee(employee_id)?
            .ok_or_else(|| EngineError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            })?;

        let attendance = self.evaluator.report_for(store, &employee, month, year)?;
        let loans = store.loans(employee_id, Some(RequestStatus::Approved))?;

        let computation = self.compute(&employee, &pay_period, &attendance, &loans);
        debug!(
            employee_id,
            period = %pay_period.label(),
            gross_pay = %computation.report.gross_pay.round_dp(2),
            net_pay = %computation.report.net_pay.round_dp(2),
            "Payroll computed"
        );
        Ok(computation)
    }
}
