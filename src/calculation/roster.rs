//! All-employee payroll roster.
//!
//! Runs the same per-employee computation as a single payroll report for
//! every employee and aggregates the results. One employee failing does not
//! fail the roster: the error message takes the place of that line's
//! figures and the line is left out of the grand totals.

use tracing::warn;

use crate::error::EngineResult;
use crate::models::{Employee, PayPeriod, PayrollComputation, RosterLine, RosterSummary, RosterTotals};
use crate::store::PayrollStore;

use super::payroll::PayrollCalculator;

/// Turns one employee's computation outcome into a roster line.
///
/// Figures are rounded to 2 decimal places so the grand totals equal the
/// sum of what is displayed.
pub fn roster_line(employee: &Employee, outcome: EngineResult<PayrollComputation>) -> RosterLine {
    match outcome {
        Ok(computation) => {
            let report = computation.report.rounded();
            RosterLine::Computed {
                employee_id: employee.id.clone(),
                name: employee.name.clone(),
                gross_pay: report.gross_pay,
                total_deductions: report.total_deductions,
                net_pay: report.net_pay,
            }
        }
        Err(error) => RosterLine::Failed {
            employee_id: employee.id.clone(),
            name: employee.name.clone(),
            error: error.to_string(),
        },
    }
}

/// Sums the computed lines of a roster.
pub fn roster_totals(lines: &[RosterLine]) -> RosterTotals {
    lines
        .iter()
        .fold(RosterTotals::default(), |mut totals, line| {
            if let RosterLine::Computed {
                gross_pay,
                total_deductions,
                net_pay,
                ..
            } = line
            {
                totals.gross_pay += *gross_pay;
                totals.total_deductions += *total_deductions;
                totals.net_pay += *net_pay;
            }
            totals
        })
}

/// Assembles a roster summary for a period.
pub fn summarize_roster(period: PayPeriod, lines: Vec<RosterLine>) -> RosterSummary {
    let totals = roster_totals(&lines);
    RosterSummary {
        title: format!(
            "Payroll Overview - {} - Period {}",
            period.month_label(),
            period.half.number()
        ),
        period,
        lines,
        totals,
    }
}

impl PayrollCalculator {
    /// Computes the roster of every employee for one period.
    ///
    /// # Errors
    ///
    /// Fails only when the period is invalid or the employee list cannot
    /// be read; per-employee failures become [`RosterLine::Failed`] lines.
    pub fn roster<S: PayrollStore + ?Sized>(
        &self,
        store: &S,
        month: u32,
        year: i32,
        period: u8,
    ) -> EngineResult<RosterSummary> {
        let pay_period = self.period(month, year, period)?;

        let lines = store
            .employees()?
            .iter()
            .map(|employee| {
                let outcome = self.calculate(store, &employee.id, month, year, period);
                if let Err(error) = &outcome {
                    warn!(employee_id = %employee.id, error = %error, "Roster line failed");
                }
                roster_line(employee, outcome)
            })
            .collect();

        Ok(summarize_roster(pay_period, lines))
    }
}
