//! Request types for the reconciliation API.
//!
//! This module defines the JSON request structures for the `/reconcile` endpoint.

use serde::{Deserialize, Serialize};

use crate::config::{DuplicatePolicy, ReconcileConfig, ShiftPolicy};
use crate::models::RawTable;

/// Request body for the `/reconcile` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// The attendance roster.
    pub attendance: RawTable,
    /// The overtime log.
    pub overtime: RawTable,
    /// Per-request overrides of the server configuration.
    #[serde(default)]
    pub options: ReconcileOptions,
}

/// Settings a caller may override for a single request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconcileOptions {
    /// Overrides the configured duplicate policy.
    #[serde(default)]
    pub duplicate_policy: Option<DuplicatePolicy>,
    /// Overrides the configured shift policy.
    #[serde(default)]
    pub shift_policy: Option<ShiftPolicy>,
}

impl ReconcileOptions {
    /// Returns `base` with these overrides applied.
    pub fn apply(&self, base: &ReconcileConfig) -> ReconcileConfig {
        ReconcileConfig {
            duplicate_policy: self.duplicate_policy.unwrap_or(base.duplicate_policy),
            shift_policy: self.shift_policy.unwrap_or(base.shift_policy),
            ..base.clone()
        }
    }
}
