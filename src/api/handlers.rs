//! HTTP request handlers for the payroll API.
//!
//! This module contains the router and the handler functions for all API
//! endpoints. Every handler tags its log lines with a correlation id.

use std::str::FromStr;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::LeaveType;

use super::request::{
    AttendanceRequest, EmployeeRequest, EmployeeUpdateRequest, LeaveSubmitRequest,
    LoanSubmitRequest, MonthQuery, PeriodQuery,
};
use super::response::{
    ApiError, ApiErrorResponse, LeaveListResponse, LoanListResponse, PostedPayrollResponse,
    ScheduleResponse, rounded,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/:id/schedule", get(schedule_handler))
        .route(
            "/employees/:id/attendance",
            get(attendance_handler).put(set_attendance_handler),
        )
        .route("/employees/:id/clock-in", post(clock_in_handler))
        .route("/employees/:id/clock-out", post(clock_out_handler))
        .route("/employees/:id/payroll", get(payroll_handler))
        .route("/employees/:id/payroll/post", post(post_payroll_handler))
        .route("/payroll", get(roster_handler))
        .route("/leaves", get(list_leaves).post(submit_leave))
        .route("/leaves/:id", delete(delete_leave))
        .route("/leaves/:id/approve", post(approve_leave))
        .route("/leaves/:id/reject", post(reject_leave))
        .route("/loans", get(list_loans).post(submit_loan))
        .route("/loans/:id/approve", post(approve_loan))
        .route("/loans/:id/reject", post(reject_loan))
        .with_state(state)
}

/// Converts an engine result into a JSON response, logging failures.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &str,
    status: StatusCode,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => {
            info!(correlation_id = %correlation_id, operation, "Request completed");
            (
                status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(body),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                kind = ?err.kind(),
                error = %err,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

/// Maps a JSON body rejection to a 400 error.
fn json_body<T>(
    correlation_id: Uuid,
    payload: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiErrorResponse> {
    let rejection = match payload {
        Ok(Json(body)) => return Ok(body),
        Err(rejection) => rejection,
    };

    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    Err(ApiErrorResponse::bad_request(error))
}

/// Maps a query string rejection to a 400 error.
fn query_params<T>(
    correlation_id: Uuid,
    query: Result<Query<T>, QueryRejection>,
) -> Result<T, ApiErrorResponse> {
    query.map(|Query(params)| params).map_err(|rejection| {
        let body_text = rejection.body_text();
        warn!(
            correlation_id = %correlation_id,
            error = %body_text,
            "Query string error"
        );
        ApiErrorResponse::bad_request(ApiError::validation_error(body_text))
    })
}

// Employees

async fn list_employees(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "list_employees",
        StatusCode::OK,
        state.service().employees(),
    )
}

async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing employee creation");

    let request = match json_body(correlation_id, payload) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };
    respond(
        correlation_id,
        "create_employee",
        StatusCode::CREATED,
        state.service().add_employee(request.into()),
    )
}

async fn get_employee(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "get_employee",
        StatusCode::OK,
        state.service().employee(&id),
    )
}

async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EmployeeUpdateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match json_body(correlation_id, payload) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };
    respond(
        correlation_id,
        "update_employee",
        StatusCode::OK,
        state.service().update_employee(request.into_employee(id)),
    )
}

async fn delete_employee(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    match state.service().delete_employee(&id) {
        Ok(()) => {
            info!(correlation_id = %correlation_id, employee_id = %id, "Employee removed");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => respond::<()>(correlation_id, "delete_employee", StatusCode::OK, Err(err)),
    }
}

// Schedule and attendance

async fn schedule_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let MonthQuery { month, year } = match query_params(correlation_id, query) {
        Ok(params) => params,
        Err(error) => return error.into_response(),
    };
    let result = state
        .service()
        .schedule(&id, month, year)
        .map(ScheduleResponse::from);
    respond(correlation_id, "schedule", StatusCode::OK, result)
}

async fn attendance_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<MonthQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let MonthQuery { month, year } = match query_params(correlation_id, query) {
        Ok(params) => params,
        Err(error) => return error.into_response(),
    };
    respond(
        correlation_id,
        "attendance_report",
        StatusCode::OK,
        state.service().attendance_report(&id, month, year),
    )
}

async fn set_attendance_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match json_body(correlation_id, payload) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };
    let result = state.service().set_attendance(
        &id,
        &request.date,
        request.time_in.as_deref(),
        request.time_out.as_deref(),
    );
    respond(correlation_id, "set_attendance", StatusCode::OK, result)
}

async fn clock_in_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let now = state.clock().now();
    respond(
        correlation_id,
        "clock_in",
        StatusCode::OK,
        state.service().clock_in(&id, now),
    )
}

async fn clock_out_handler(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let correlation_id = Uuid::new_v4();
    let now = state.clock().now();
    respond(
        correlation_id,
        "clock_out",
        StatusCode::OK,
        state.service().clock_out(&id, now),
    )
}

// Payroll

async fn payroll_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let PeriodQuery {
        month,
        year,
        period,
    } = match query_params(correlation_id, query) {
        Ok(params) => params,
        Err(error) => return error.into_response(),
    };

    let start_time = Instant::now();
    let result = state.service().payroll(&id, month, year, period).map(rounded);
    if let Ok(computation) = &result {
        info!(
            correlation_id = %correlation_id,
            employee_id = %id,
            net_pay = %computation.report.net_pay,
            duration_us = start_time.elapsed().as_micros(),
            "Payroll computed"
        );
    }
    respond(correlation_id, "payroll", StatusCode::OK, result)
}

async fn post_payroll_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let PeriodQuery {
        month,
        year,
        period,
    } = match query_params(correlation_id, query) {
        Ok(params) => params,
        Err(error) => return error.into_response(),
    };
    let now = state.clock().now();
    let result = state
        .service()
        .post_payroll(&id, month, year, period, now)
        .map(PostedPayrollResponse::from);
    respond(correlation_id, "post_payroll", StatusCode::CREATED, result)
}

async fn roster_handler(
    State(state): State<AppState>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let PeriodQuery {
        month,
        year,
        period,
    } = match query_params(correlation_id, query) {
        Ok(params) => params,
        Err(error) => return error.into_response(),
    };

    let start_time = Instant::now();
    let result = state.service().roster(month, year, period);
    if let Ok(summary) = &result {
        info!(
            correlation_id = %correlation_id,
            employees = summary.lines.len(),
            net_pay = %summary.totals.net_pay,
            duration_us = start_time.elapsed().as_micros(),
            "Roster computed"
        );
    }
    respond(correlation_id, "roster", StatusCode::OK, result)
}

// Leave

async fn list_leaves(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .service()
        .leaves()
        .map(|leaves| LeaveListResponse { leaves });
    respond(correlation_id, "list_leaves", StatusCode::OK, result)
}

async fn submit_leave(
    State(state): State<AppState>,
    payload: Result<Json<LeaveSubmitRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match json_body(correlation_id, payload) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };
    let leave_type = match LeaveType::from_str(&request.leave_type) {
        Ok(leave_type) => leave_type,
        Err(message) => {
            warn!(correlation_id = %correlation_id, error = %message, "Unknown leave type");
            return ApiErrorResponse::bad_request(ApiError::validation_error(message))
                .into_response();
        }
    };

    let today = state.clock().now().date();
    let result =
        state
            .service()
            .submit_leave(&request.employee_id, &request.date, leave_type, today);
    respond(correlation_id, "submit_leave", StatusCode::CREATED, result)
}

async fn approve_leave(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let correlation_id = Uuid::new_v4();
    let today = state.clock().now().date();
    respond(
        correlation_id,
        "approve_leave",
        StatusCode::OK,
        state.service().approve_leave(id, today),
    )
}

async fn reject_leave(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let correlation_id = Uuid::new_v4();
    let today = state.clock().now().date();
    respond(
        correlation_id,
        "reject_leave",
        StatusCode::OK,
        state.service().reject_leave(id, today),
    )
}

async fn delete_leave(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let correlation_id = Uuid::new_v4();
    let today = state.clock().now().date();
    match state.service().delete_leave(id, today) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => respond::<()>(correlation_id, "delete_leave", StatusCode::OK, Err(err)),
    }
}

// Loans

async fn list_loans(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state.service().loans().map(|loans| LoanListResponse { loans });
    respond(correlation_id, "list_loans", StatusCode::OK, result)
}

async fn submit_loan(
    State(state): State<AppState>,
    payload: Result<Json<LoanSubmitRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match json_body(correlation_id, payload) {
        Ok(request) => request,
        Err(error) => return error.into_response(),
    };
    let now = state.clock().now();
    respond(
        correlation_id,
        "submit_loan",
        StatusCode::CREATED,
        state
            .service()
            .submit_loan(&request.employee_id, request.amount, now),
    )
}

async fn approve_loan(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "approve_loan",
        StatusCode::OK,
        state.service().approve_loan(id),
    )
}

async fn reject_loan(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    let correlation_id = Uuid::new_v4();
    respond(
        correlation_id,
        "reject_loan",
        StatusCode::OK,
        state.service().reject_loan(id),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::config::fixtures::test_config;
    use axum::{body::Body, http::Request};
    use chrono::NaiveDate;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let now = NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(8, 5, 0)
            .unwrap();
        AppState::with_clock(test_config(), Arc::new(FixedClock(now)))
    }

    async fn send(router: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    fn manager() -> Value {
        json!({
            "id": "EMP-001",
            "name": "Maria Santos",
            "position": "Manager",
            "department": "Administration",
            "monthly_salary": "22000"
        })
    }

    #[tokio::test]
    async fn test_create_employee_returns_201() {
        let router = create_router(create_test_state());
        let (status, body) = send(router, "POST", "/employees", Some(manager())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "EMP-001");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());
        let response = router
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/employees")
                    .header("Content-Type", "application/json")
                    .body(Body::from("{invalid json"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_employee_returns_404() {
        let router = create_router(create_test_state());
        let (status, body) = send(router, "GET", "/employees/EMP-404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "EMPLOYEE_NOT_FOUND");
    }

    #[tokio::test]
    async fn test_missing_query_returns_400() {
        let state = create_test_state();
        let router = create_router(state.clone());
        send(router.clone(), "POST", "/employees", Some(manager())).await;

        let (status, body) = send(router, "GET", "/employees/EMP-001/schedule?month=3", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_clock_in_uses_state_clock() {
        let router = create_router(create_test_state());
        send(router.clone(), "POST", "/employees", Some(manager())).await;

        let (status, body) = send(router.clone(), "POST", "/employees/EMP-001/clock-in", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["time_in"], "08:05:00");

        let (status, body) = send(router, "POST", "/employees/EMP-001/clock-in", None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "ALREADY_CLOCKED_IN");
    }

    #[tokio::test]
    async fn test_unknown_leave_type_returns_400() {
        let router = create_router(create_test_state());
        send(router.clone(), "POST", "/employees", Some(manager())).await;

        let leave = json!({
            "employee_id": "EMP-001",
            "date": "2026-03-03",
            "leave_type": "Maternity"
        });
        let (status, body) = send(router, "POST", "/leaves", Some(leave)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_delete_employee_returns_204() {
        let router = create_router(create_test_state());
        send(router.clone(), "POST", "/employees", Some(manager())).await;

        let (status, _) = send(router.clone(), "DELETE", "/employees/EMP-001", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (status, _) = send(router, "DELETE", "/employees/EMP-001", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
