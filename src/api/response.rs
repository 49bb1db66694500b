//! Response types for the reconciliation API.
//!
//! This module defines the success payload, the error response structures
//! and the mapping from [`ReconError`] to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::ReconcileOutput;
use crate::error::ReconError;
use crate::models::{
    DataQualityReport, EnrichedRow, NormalizedRecord, SummaryDisplayRow, SummaryTotals,
};

/// Successful response of the `/reconcile` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileResponse {
    /// Identifier of this run; also the request's correlation id in logs.
    pub run_id: Uuid,
    /// When the result was produced.
    pub generated_at: DateTime<Utc>,
    /// The enriched attendance table.
    pub enriched: Vec<EnrichedRow>,
    /// Headers of the unclaimed attendance columns in each row's `extra`.
    pub extra_headers: Vec<String>,
    /// The normalized overtime rows, so unmatched ones can be looked up by
    /// `source_row`.
    pub overtime: Vec<NormalizedRecord>,
    /// The per-employee summary.
    pub summary: Vec<SummaryDisplayRow>,
    /// Headline totals.
    pub totals: SummaryTotals,
    /// Data-quality counters and warnings.
    pub report: DataQualityReport,
}

impl ReconcileResponse {
    /// Builds the response for a completed run.
    pub fn from_output(run_id: Uuid, output: ReconcileOutput) -> Self {
        Self {
            run_id,
            generated_at: Utc::now(),
            enriched: output.enriched.iter().map(|r| r.display()).collect(),
            extra_headers: output.extra_headers,
            overtime: output.overtime,
            summary: output.summary.iter().map(|r| r.display()).collect(),
            totals: output.totals,
            report: output.report,
        }
    }
}

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

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<ReconError> for ApiErrorResponse {
    fn from(error: ReconError) -> Self {
        let message = error.to_string();
        match error {
            ReconError::MissingColumn {
                table,
                field,
                available,
            } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "MISSING_COLUMN",
                    format!("The {} table has no column for {}", table, field),
                    format!("Available headers: [{}]", available.join(", ")),
                ),
            },
            ReconError::InsufficientValidRows { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INSUFFICIENT_VALID_ROWS",
                    message,
                    "Rows need a non-blank employee name and a parseable date",
                ),
            },
            ReconError::Csv { .. } | ReconError::Workbook { .. } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(message),
            },
            ReconError::ConfigNotFound { .. }
            | ReconError::ConfigParseError { .. }
            | ReconError::InvalidConfig { .. } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            },
        }
    }
}
