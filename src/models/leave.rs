//! Leave and request-status models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle status shared by leave and loan requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    /// Awaiting an administrator decision.
    Pending,
    /// Approved by an administrator.
    Approved,
    /// Rejected by an administrator.
    Rejected,
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestStatus::Pending => write!(f, "Pending"),
            RequestStatus::Approved => write!(f, "Approved"),
            RequestStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// The kind of leave requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaveType {
    /// Sick leave, one full day.
    #[serde(rename = "SL")]
    Sick,
    /// Vacation leave, one full day.
    #[serde(rename = "VL")]
    Vacation,
    /// Vacation leave, half a day.
    #[serde(rename = "VLH")]
    VacationHalfDay,
}

impl LeaveType {
    /// The fraction of a day this leave consumes from the weekly quota
    /// and credits toward days present.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::LeaveType;
    /// use rust_decimal::Decimal;
    ///
    /// assert_eq!(LeaveType::Sick.day_equivalent(), Decimal::ONE);
    /// assert_eq!(LeaveType::VacationHalfDay.day_equivalent(), Decimal::new(5, 1));
    /// ```
    pub fn day_equivalent(&self) -> Decimal {
        match self {
            LeaveType::Sick | LeaveType::Vacation => Decimal::ONE,
            LeaveType::VacationHalfDay => Decimal::new(5, 1),
        }
    }

    /// The short code ("SL", "VL", "VLH").
    pub fn code(&self) -> &'static str {
        match self {
            LeaveType::Sick => "SL",
            LeaveType::Vacation => "VL",
            LeaveType::VacationHalfDay => "VLH",
        }
    }
}

impl fmt::Display for LeaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for LeaveType {
    type Err = String;

    /// Accepts either the short code or the form label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SL" | "Sick Leave" => Ok(LeaveType::Sick),
            "VL" | "Vacation Leave" => Ok(LeaveType::Vacation),
            "VLH" | "Vacation Leave (Half Day)" => Ok(LeaveType::VacationHalfDay),
            other => Err(format!("Unknown leave type: {}", other)),
        }
    }
}

/// A leave request for a single date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaveRequest {
    /// Store-assigned identifier.
    pub id: u64,
    /// The requesting employee.
    pub employee_id: String,
    /// The date of leave.
    pub date: NaiveDate,
    /// The kind of leave.
    pub leave_type: LeaveType,
    /// Current status.
    pub status: RequestStatus,
}
