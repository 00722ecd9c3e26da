//! Response types for the payroll API.
//!
//! This module defines the error response structures and the mapping from
//! engine errors to HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, ErrorKind};
use crate::models::{
    LeaveRequest, LoanRequest, PayrollComputation, PayrollPosting, Schedule, ScheduleRow,
};
use crate::service::PostedPayroll;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying the given error body.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::PolicyViolation => StatusCode::CONFLICT,
        ErrorKind::StorageFailure | ErrorKind::Configuration => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let status = status_for(error.kind());
        let error = match &error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiError::with_details(error.code(), "Configuration error", error.to_string())
            }
            EngineError::StorageFailure { .. } => {
                ApiError::with_details(error.code(), "Storage failure", error.to_string())
            }
            _ => ApiError::new(error.code(), error.to_string()),
        };
        ApiErrorResponse { status, error }
    }
}

/// Response body of a posted payroll.
#[derive(Debug, Clone, Serialize)]
pub struct PostedPayrollResponse {
    /// The recorded posting.
    pub posting: PayrollPosting,
    /// The posted computation with rounded figures.
    pub computation: PayrollComputation,
}

impl From<PostedPayroll> for PostedPayrollResponse {
    fn from(posted: PostedPayroll) -> Self {
        Self {
            posting: posted.posting,
            computation: rounded(posted.computation),
        }
    }
}

/// Rounds a computation's report to currency precision for display.
pub fn rounded(mut computation: PayrollComputation) -> PayrollComputation {
    computation.report = computation.report.rounded();
    computation
}

/// Calendar view of a monthly schedule.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleResponse {
    /// The employee.
    pub employee_id: String,
    /// The calendar year.
    pub year: i32,
    /// The calendar month.
    pub month: u32,
    /// Number of scheduled workdays.
    pub total_workdays: u32,
    /// One row per date of the month.
    pub rows: Vec<ScheduleRow>,
}

impl From<Schedule> for ScheduleResponse {
    fn from(schedule: Schedule) -> Self {
        Self {
            rows: schedule.rows(),
            employee_id: schedule.employee_id,
            year: schedule.year,
            month: schedule.month,
            total_workdays: schedule.total_workdays,
        }
    }
}

/// Response body of leave listings.
#[derive(Debug, Clone, Serialize)]
pub struct LeaveListResponse {
    /// Every leave request, ordered by id.
    pub leaves: Vec<LeaveRequest>,
}

/// Response body of loan listings.
#[derive(Debug, Clone, Serialize)]
pub struct LoanListResponse {
    /// Every loan request, ordered by id.
    pub loans: Vec<LoanRequest>,
}
