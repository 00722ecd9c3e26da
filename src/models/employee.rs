//! Employee model.
//!
//! This module defines the Employee struct for representing staff members
//! whose schedules, attendance and payroll the engine computes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The largest monthly salary accepted; keeps payroll and loan-cap
/// arithmetic far from `Decimal` overflow.
pub const MAX_MONTHLY_SALARY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Represents an employee on the payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique, human-assigned employee code (e.g., "EMP-001").
    pub id: String,
    /// The employee's display name.
    pub name: String,
    /// The position name (e.g., "Manager", "Security Guard A").
    pub position: String,
    /// The department the employee belongs to.
    pub department: String,
    /// The monthly salary in currency units.
    pub monthly_salary: Decimal,
}

impl Employee {
    /// Checks the fields an administrator supplies when creating or editing.
    ///
    /// # Examples
    ///
    /// ```
    /// use payroll_engine::models::Employee;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "EMP-001".to_string(),
    ///     name: "Maria Santos".to_string(),
    ///     position: "Manager".to_string(),
    ///     department: "Operations".to_string(),
    ///     monthly_salary: Decimal::new(30_000, 0),
    /// };
    /// assert!(employee.validate().is_ok());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        for (field, value) in [
            ("id", &self.id),
            ("name", &self.name),
            ("position", &self.position),
            ("department", &self.department),
        ] {
            if value.trim().is_empty() {
                return Err(EngineError::InvalidEmployee {
                    field: field.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }

        if self.monthly_salary <= Decimal::ZERO {
            return Err(EngineError::InvalidEmployee {
                field: "monthly_salary".to_string(),
                message: format!("must be positive, got {}", self.monthly_salary),
            });
        }

        if self.monthly_salary > MAX_MONTHLY_SALARY {
            return Err(EngineError::InvalidEmployee {
                field: "monthly_salary".to_string(),
                message: format!(
                    "must not exceed {}, got {}",
                    MAX_MONTHLY_SALARY, self.monthly_salary
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_employee() -> Employee {
        Employee {
            id: "EMP-001".to_string(),
            name: "Maria Santos".to_string(),
            position: "Manager".to_string(),
            department: "Operations".to_string(),
            monthly_salary: Decimal::new(30_000, 0),
        }
    }

    #[test]
    fn test_deserialize_employee() {
        let json = r#"{
            "id": "EMP-002",
            "name": "Jose Rizal",
            "position": "Security Guard B",
            "department": "Security",
            "monthly_salary": "18500.50"
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.id, "EMP-002");
        assert_eq!(employee.position, "Security Guard B");
        assert_eq!(employee.monthly_salary, Decimal::new(1_850_050, 2));
    }

    #[test]
    fn test_valid_employee_passes() {
        assert!(create_test_employee().validate().is_ok());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let mut employee = create_test_employee();
        employee.name = "   ".to_string();

        match employee.validate() {
            Err(EngineError::InvalidEmployee { field, .. }) => assert_eq!(field, "name"),
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
    }

    #[test]
    fn test_non_positive_salary_is_rejected() {
        let mut employee = create_test_employee();
        employee.monthly_salary = Decimal::ZERO;

        match employee.validate() {
            Err(EngineError::InvalidEmployee { field, .. }) => {
                assert_eq!(field, "monthly_salary")
            }
            other => panic!("Expected InvalidEmployee, got {:?}", other),
        }
    }

    #[test]
    fn test_salary_above_maximum_is_rejected() {
        let mut employee = create_test_employee();
        employee.monthly_salary = Decimal::MAX;
        assert!(matches!(
            employee.validate(),
            Err(EngineError::InvalidEmployee { .. })
        ));

        employee.monthly_salary = MAX_MONTHLY_SALARY;
        assert!(employee.validate().is_ok());
    }
}
