//! HTTP request handlers for the reconciliation API.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::engine::process;

use super::request::ReconcileRequest;
use super::response::{ApiError, ApiErrorResponse, ReconcileResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reconcile", post(reconcile_handler))
        .with_state(state)
}

/// Handler for POST /reconcile.
///
/// Reconciles the posted attendance and overtime tables and returns the
/// enriched table, the summary and the data-quality report.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Response {
    let run_id = Uuid::new_v4();
    info!(run_id = %run_id, "Processing reconciliation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return json_response(StatusCode::BAD_REQUEST, rejection_error(run_id, rejection));
        }
    };

    let config = request.options.apply(state.config());

    let start_time = Instant::now();
    match process(&request.attendance, &request.overtime, &config) {
        Ok(output) => {
            info!(
                run_id = %run_id,
                attendance_rows = request.attendance.len(),
                overtime_rows = request.overtime.len(),
                employees = output.totals.employees,
                warnings = output.report.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Reconciliation request completed"
            );
            json_response(StatusCode::OK, ReconcileResponse::from_output(run_id, output))
        }
        Err(err) => {
            warn!(run_id = %run_id, error = %err, "Reconciliation failed");
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

fn rejection_error(run_id: Uuid, rejection: JsonRejection) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(run_id = %run_id, error = %body_text, "JSON data error");
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(run_id = %run_id, error = %err, "JSON syntax error");
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
