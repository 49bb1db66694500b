//! Error types for the reconciliation engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that aborts a reconciliation run. Row-level problems
//! (unparseable dates, malformed durations) are never errors; they are
//! reported through [`crate::models::DataQualityReport`] instead.

use thiserror::Error;

use crate::models::{CanonicalField, TableRole};

/// The main error type for the reconciliation engine.
///
/// # Example
///
/// ```
/// use roster_recon::error::ReconError;
///
/// let error = ReconError::ConfigNotFound {
///     path: "/missing/reconcile.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/reconcile.yaml");
/// ```
#[derive(Debug, Error)]
pub enum ReconError {
    /// A required canonical field could not be resolved from any header.
    #[error(
        "{table} table is missing a column for {field}; available headers: [{}]",
        .available.join(", ")
    )]
    MissingColumn {
        /// The table that was being resolved.
        table: TableRole,
        /// The canonical field that could not be found.
        field: CanonicalField,
        /// Every header present in the table, as supplied.
        available: Vec<String>,
    },

    /// Too few rows of a table survived normalization.
    #[error(
        "{table} table has only {valid} valid rows out of {total} (minimum ratio {minimum_ratio})"
    )]
    InsufficientValidRows {
        /// The table that failed validation.
        table: TableRole,
        /// Number of rows retained after normalization.
        valid: usize,
        /// Number of rows in the raw table.
        total: usize,
        /// The configured minimum share of valid rows.
        minimum_ratio: f64,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but holds values the engine cannot use.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// A description of the problem.
        message: String,
    },

    /// Reading or writing delimited text failed.
    #[error("CSV error: {message}")]
    Csv {
        /// A description of the failure.
        message: String,
    },

    /// A spreadsheet workbook could not be opened or a sheet read.
    #[error("Workbook error: {message}")]
    Workbook {
        /// A description of the failure.
        message: String,
    },
}

impl From<csv::Error> for ReconError {
    fn from(err: csv::Error) -> Self {
        ReconError::Csv {
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return ReconError.
pub type ReconResult<T> = Result<T, ReconError>;
