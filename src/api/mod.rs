//! HTTP API for the payroll engine.
//!
//! Exposes employee management, schedules, attendance, leave and loan
//! requests and payroll as JSON endpoints over a shared [`AppState`].

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceRequest, EmployeeRequest, EmployeeUpdateRequest, LeaveSubmitRequest,
    LoanSubmitRequest, MonthQuery, PeriodQuery,
};
pub use response::{ApiError, ApiErrorResponse, PostedPayrollResponse, ScheduleResponse};
pub use state::AppState;
