//! Per-employee aggregation.

use std::collections::HashMap;

use crate::models::{EnrichedRecord, SummaryRow, SummaryTotals};

use super::durations::round_hours;

/// Groups enriched records by employee.
///
/// Groups appear in the order their employee was first seen. Each group
/// takes the display name of its first record and the first non-empty job
/// position; hours are summed at full precision.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use roster_recon::engine::summarize;
/// use roster_recon::models::{EnrichedRecord, NormalizedRecord};
///
/// let day = |d, shift: &str, work_day| EnrichedRecord {
///     record: NormalizedRecord {
///         employee: "ana".to_string(),
///         display_name: "Ana".to_string(),
///         date: NaiveDate::from_ymd_opt(2024, 3, d).unwrap(),
///         shift: Some(shift.to_string()),
///         job_position: None,
///         work_area: None,
///         duration_hours: 0.0,
///         working_time_normal_hours: 8.0,
///         work_day,
///         source_row: 0,
///         extra: vec![],
///     },
///     overtime_hours: if work_day { 1.0 } else { 0.0 },
///     working_time_normal_hours: 8.0,
///     overtime_matches: 1,
/// };
///
/// let summary = summarize(&[day(1, "Pagi", true), day(2, "Off", false)]);
/// assert_eq!(summary.len(), 1);
/// assert_eq!(summary[0].work_days, 1);
/// assert_eq!(summary[0].overtime_hours, 1.0);
/// ```
pub fn summarize(enriched: &[EnrichedRecord]) -> Vec<SummaryRow> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut rows: Vec<SummaryRow> = Vec::new();

    for item in enriched {
        let record = &item.record;
        let position = *positions.entry(record.employee.as_str()).or_insert_with(|| {
            rows.push(SummaryRow {
                no: rows.len() + 1,
                employee: record.employee.clone(),
                employee_name: record.display_name.clone(),
                job_position: None,
                work_days: 0,
                working_time_normal_hours: 0.0,
                overtime_hours: 0.0,
            });
            rows.len() - 1
        });

        let row = &mut rows[position];
        if row.job_position.is_none() {
            row.job_position = record.job_position.clone();
        }
        if record.work_day {
            row.work_days += 1;
        }
        row.working_time_normal_hours += item.working_time_normal_hours;
        row.overtime_hours += item.overtime_hours;
    }

    rows
}

/// Computes the headline totals over a summary.
pub fn summary_totals(summary: &[SummaryRow]) -> SummaryTotals {
    SummaryTotals {
        employees: summary.len(),
        work_days: summary.iter().map(|r| u64::from(r.work_days)).sum(),
        working_time_normal_hours: round_hours(
            summary.iter().map(|r| r.working_time_normal_hours).sum(),
        ),
        overtime_hours: round_hours(summary.iter().map(|r| r.overtime_hours).sum()),
    }
}
