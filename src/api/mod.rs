//! HTTP API module for the reconciliation engine.
//!
//! Exposes a single `POST /reconcile` endpoint that accepts both tables as
//! JSON and returns the reconciled result.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{ReconcileOptions, ReconcileRequest};
pub use response::{ApiError, ApiErrorResponse, ReconcileResponse};
pub use state::AppState;
