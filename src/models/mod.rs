//! Core data models for the reconciliation engine.
//!
//! This module contains the raw input tables, the typed records produced
//! from them, and the summary and report structures handed back to callers.

mod cell;
mod field;
mod raw_table;
mod record;
mod report;
mod summary;

pub use cell::CellValue;
pub use field::{CanonicalField, ResolutionPass, ResolvedColumn, ResolvedColumns, TableRole};
pub use raw_table::RawTable;
pub use record::{
    EnrichedRecord, EnrichedRow, NormalizationStats, NormalizedRecord, NormalizedTable,
};
pub use report::{DataQualityReport, DataWarning, Severity};
pub use summary::{SummaryDisplayRow, SummaryRow, SummaryTotals};
