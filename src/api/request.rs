//! Request types for the payroll API.
//!
//! Bodies are deserialized from JSON, query strings from the URL. Dates and
//! times stay as strings so the engine reports malformed values with its own
//! error codes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::Employee;

/// Request body for creating an employee.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRequest {
    /// Unique identifier (e.g., "EMP-001").
    pub id: String,
    /// Full name.
    pub name: String,
    /// Position name, used to look up the schedule policy.
    pub position: String,
    /// Department name.
    pub department: String,
    /// Gross monthly salary.
    pub monthly_salary: Decimal,
}

impl From<EmployeeRequest> for Employee {
    fn from(req: EmployeeRequest) -> Self {
        Employee {
            id: req.id,
            name: req.name,
            position: req.position,
            department: req.department,
            monthly_salary: req.monthly_salary,
        }
    }
}

/// Request body for replacing an employee; the id comes from the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeUpdateRequest {
    /// Full name.
    pub name: String,
    /// Position name.
    pub position: String,
    /// Department name.
    pub department: String,
    /// Gross monthly salary.
    pub monthly_salary: Decimal,
}

impl EmployeeUpdateRequest {
    /// Builds the employee record for the given id.
    pub fn into_employee(self, id: String) -> Employee {
        Employee {
            id,
            name: self.name,
            position: self.position,
            department: self.department,
            monthly_salary: self.monthly_salary,
        }
    }
}

/// Query selecting a calendar month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MonthQuery {
    /// Month (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

/// Query selecting a pay period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodQuery {
    /// Month (1-12).
    pub month: u32,
    /// Calendar year.
    pub year: i32,
    /// Period within the month (1 or 2).
    pub period: u8,
}

/// Request body for editing one day's attendance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// Date as `YYYY-MM-DD`.
    pub date: String,
    /// Clock-in as `HH:MM` or `HH:MM:SS`; absent or empty means not recorded.
    #[serde(default)]
    pub time_in: Option<String>,
    /// Clock-out, same format.
    #[serde(default)]
    pub time_out: Option<String>,
}

/// Request body for submitting a leave request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaveSubmitRequest {
    /// The requesting employee.
    pub employee_id: String,
    /// Leave date as `YYYY-MM-DD`.
    pub date: String,
    /// Leave code ("SL", "VL", "VLH") or its form label.
    pub leave_type: String,
}

/// Request body for submitting a loan request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSubmitRequest {
    /// The requesting employee.
    pub employee_id: String,
    /// Amount requested.
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_employee_request_accepts_string_salary() {
        let json = r#"{
            "id": "EMP-001",
            "name": "Maria Santos",
            "position": "Manager",
            "department": "Administration",
            "monthly_salary": "22000.00"
        }"#;
        let request: EmployeeRequest = serde_json::from_str(json).unwrap();
        let employee: Employee = request.into();
        assert_eq!(employee.monthly_salary, Decimal::from_str("22000").unwrap());
    }

    #[test]
    fn test_attendance_request_times_default_to_none() {
        let request: AttendanceRequest = serde_json::from_str(r#"{"date": "2026-03-02"}"#).unwrap();
        assert!(request.time_in.is_none());
        assert!(request.time_out.is_none());
    }
}
