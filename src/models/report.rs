//! Data-quality reporting.
//!
//! Value-level problems never abort a run. They are counted here so the
//! caller can show a warning next to the results.

use serde::{Deserialize, Serialize};

use super::{NormalizationStats, ResolvedColumns};

/// How serious a [`DataWarning`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational; results are complete.
    Low,
    /// Some values were defaulted or rows dropped.
    Medium,
    /// A large share of the input was unusable.
    High,
}

/// A warning generated during reconciliation.
///
/// # Example
///
/// ```
/// use roster_recon::models::{DataWarning, Severity};
///
/// let warning = DataWarning::new("AMBIGUOUS_MATCH", "2 duplicate keys", Severity::Medium);
/// assert_eq!(warning.code, "AMBIGUOUS_MATCH");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level.
    pub severity: Severity,
}

impl DataWarning {
    /// Creates a new warning.
    pub fn new(code: impl Into<String>, message: impl Into<String>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity,
        }
    }
}

/// Everything the caller needs to judge how clean the inputs were.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataQualityReport {
    /// Counters for the attendance table.
    pub attendance: NormalizationStats,
    /// Counters for the overtime table.
    pub overtime: NormalizationStats,
    /// Header mapping used for the attendance table.
    pub attendance_columns: ResolvedColumns,
    /// Header mapping used for the overtime table.
    pub overtime_columns: ResolvedColumns,
    /// Distinct (employee, date) keys that occur more than once in overtime.
    pub duplicate_overtime_keys: usize,
    /// Overtime rows that belong to a duplicated key.
    pub duplicate_overtime_rows: usize,
    /// Overtime rows with no attendance counterpart.
    pub unmatched_overtime_rows: usize,
    /// Zero-based raw-table indexes of those overtime rows.
    #[serde(default)]
    pub unmatched_overtime_source_rows: Vec<usize>,
    /// Attendance rows that found at least one overtime row.
    pub matched_attendance_rows: usize,
    /// Human-readable warnings derived from the counters.
    pub warnings: Vec<DataWarning>,
}

impl DataQualityReport {
    /// Returns true when no warnings were raised.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
