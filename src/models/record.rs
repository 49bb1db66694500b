//! Normalized and enriched records.
//!
//! This module defines the typed rows produced by the value normalizer and
//! the reconciliation engine, together with their presentation forms.

use std::borrow::Cow;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::{hours_to_hhmm, round_hours};

use super::{CellValue, ResolvedColumns, TableRole};

/// One source row with its fields resolved and its values converted.
///
/// `employee` and `date` are always present: rows that fail either are
/// dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Join key: lower-cased, trimmed, punctuation stripped.
    pub employee: String,
    /// The name as it should be shown (title-cased).
    pub display_name: String,
    /// The calendar date of the record.
    pub date: NaiveDate,
    /// The shift label, if any.
    pub shift: Option<String>,
    /// The job position, if any.
    pub job_position: Option<String>,
    /// The work area, if any.
    pub work_area: Option<String>,
    /// Duration in decimal hours.
    pub duration_hours: f64,
    /// Scheduled normal working time in decimal hours.
    pub working_time_normal_hours: f64,
    /// Whether the shift counts as a worked day.
    pub work_day: bool,
    /// Zero-based index of the row in the raw table.
    pub source_row: usize,
    /// This row's cells from the columns no canonical field claimed, in the
    /// order of [`NormalizedTable::extra_headers`].
    #[serde(default)]
    pub extra: Vec<CellValue>,
}

/// Per-table counters collected while normalizing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationStats {
    /// Rows present in the raw table.
    pub rows_read: usize,
    /// Rows that survived normalization.
    pub rows_retained: usize,
    /// Rows dropped because the date could not be parsed.
    pub dropped_bad_date: usize,
    /// Rows dropped because the employee name was blank.
    pub dropped_missing_employee: usize,
    /// Non-blank duration values that were coerced to zero.
    pub durations_coerced: usize,
    /// Non-blank working-time values that were coerced to zero.
    pub working_time_coerced: usize,
}

/// A normalized table: its records plus how they were obtained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTable {
    /// Which input this table came from.
    pub role: TableRole,
    /// The retained records, in source order.
    pub records: Vec<NormalizedRecord>,
    /// The header mapping used.
    pub columns: ResolvedColumns,
    /// Headers of the unclaimed source columns, in source order.
    #[serde(default)]
    pub extra_headers: Vec<String>,
    /// Counters describing what was dropped or coerced.
    pub stats: NormalizationStats,
}

/// An attendance record annotated with its matched overtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    /// The attendance record.
    pub record: NormalizedRecord,
    /// Overtime merged from the overtime table (the "RKP PIC" figure).
    pub overtime_hours: f64,
    /// Normal working time: from attendance when that table carries the
    /// column, otherwise from the matched overtime rows.
    pub working_time_normal_hours: f64,
    /// Number of overtime rows sharing this record's key.
    pub overtime_matches: usize,
}

impl EnrichedRecord {
    /// Returns the presentation form of this record.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use roster_recon::models::{EnrichedRecord, NormalizedRecord};
    ///
    /// let record = NormalizedRecord {
    ///     employee: "john doe".to_string(),
    ///     display_name: "John Doe".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
    ///     shift: Some("Pagi".to_string()),
    ///     job_position: None,
    ///     work_area: None,
    ///     duration_hours: 0.0,
    ///     working_time_normal_hours: 8.0,
    ///     work_day: true,
    ///     source_row: 0,
    ///     extra: vec![],
    /// };
    /// let enriched = EnrichedRecord {
    ///     record,
    ///     overtime_hours: 2.5,
    ///     working_time_normal_hours: 8.0,
    ///     overtime_matches: 1,
    /// };
    /// assert_eq!(enriched.display().rkp_pic, "02:30");
    /// ```
    pub fn display(&self) -> EnrichedRow {
        EnrichedRow {
            employee_name: self.record.display_name.clone(),
            date: self.record.date,
            rkp_pic: hours_to_hhmm(self.overtime_hours),
            shift: self.record.shift.clone(),
            job_position: self.record.job_position.clone(),
            work_area: self.record.work_area.clone(),
            wt_normal: hours_to_hhmm(self.working_time_normal_hours),
            attendance_duration: hours_to_hhmm(self.record.duration_hours),
            overtime_hours: round_hours(self.overtime_hours),
            extra: self
                .record
                .extra
                .iter()
                .map(|cell| cell.as_text().map(Cow::into_owned).unwrap_or_default())
                .collect(),
        }
    }
}

/// Presentation form of an [`EnrichedRecord`], in export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedRow {
    /// Display name.
    pub employee_name: String,
    /// Record date.
    pub date: NaiveDate,
    /// Merged overtime as `HH:MM`.
    pub rkp_pic: String,
    /// Shift label.
    pub shift: Option<String>,
    /// Job position.
    pub job_position: Option<String>,
    /// Work area.
    pub work_area: Option<String>,
    /// Normal working time as `HH:MM`.
    pub wt_normal: String,
    /// The attendance table's own duration column as `HH:MM` (`00:00` when
    /// the attendance table has none). Not the overtime figure.
    pub attendance_duration: String,
    /// Merged overtime rounded to two decimals.
    pub overtime_hours: Decimal,
    /// Unclaimed attendance cells as text, appended after the fixed columns.
    #[serde(default)]
    pub extra: Vec<String>,
}
