//! The end-to-end reconciliation run.
//!
//! [`process`] chains column resolution, normalization, reconciliation and
//! aggregation, and turns the counters collected on the way into a
//! [`DataQualityReport`].

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ReconcileConfig;
use crate::error::ReconResult;
use crate::models::{
    DataQualityReport, DataWarning, EnrichedRecord, NormalizationStats, NormalizedRecord,
    NormalizedTable, RawTable, Severity, SummaryRow, SummaryTotals, TableRole,
};

use super::normalize::normalize_table;
use super::reconcile::{Reconciliation, reconcile};
use super::summary::{summarize, summary_totals};

/// Everything a reconciliation run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconcileOutput {
    /// One record per retained attendance row, in attendance order.
    pub enriched: Vec<EnrichedRecord>,
    /// Headers of the attendance columns carried in [`NormalizedRecord::extra`].
    pub extra_headers: Vec<String>,
    /// The retained overtime rows after normalization, in source order.
    pub overtime: Vec<NormalizedRecord>,
    /// One row per employee, in first-seen order.
    pub summary: Vec<SummaryRow>,
    /// Totals over the summary.
    pub totals: SummaryTotals,
    /// What was dropped, coerced or ambiguous.
    pub report: DataQualityReport,
}

/// Reconciles an attendance table with an overtime table.
///
/// # Errors
///
/// Fails only on structural problems: a required column that cannot be
/// resolved, or an overtime table with too few valid rows. Bad values in
/// individual rows end up in the report instead.
///
/// # Example
///
/// ```
/// use roster_recon::config::ReconcileConfig;
/// use roster_recon::engine::process;
/// use roster_recon::models::RawTable;
///
/// let attendance = RawTable::new(
///     vec!["Employee Name".into(), "Date".into(), "Shift".into()],
///     vec![vec!["John Doe".into(), "01/03/2024".into(), "Pagi".into()]],
/// );
/// let overtime = RawTable::new(
///     vec!["Name".into(), "Date".into(), "Duration".into()],
///     vec![vec!["john doe".into(), "01/03/2024".into(), "02:30".into()]],
/// );
///
/// let output = process(&attendance, &overtime, &ReconcileConfig::default()).unwrap();
/// assert_eq!(output.enriched[0].overtime_hours, 2.5);
/// assert_eq!(output.enriched[0].display().rkp_pic, "02:30");
/// assert_eq!(output.summary[0].work_days, 1);
/// ```
pub fn process(
    attendance: &RawTable,
    overtime: &RawTable,
    config: &ReconcileConfig,
) -> ReconResult<ReconcileOutput> {
    let attendance = normalize_table(attendance, TableRole::Attendance, config)?;
    let overtime = normalize_table(overtime, TableRole::Overtime, config)?;

    let reconciliation = reconcile(&attendance, &overtime, config.duplicate_policy);
    let report = build_report(&attendance, &overtime, &reconciliation);

    let summary = summarize(&reconciliation.records);
    let totals = summary_totals(&summary);

    info!(
        employees = totals.employees,
        work_days = totals.work_days,
        overtime_hours = %totals.overtime_hours,
        warnings = report.warnings.len(),
        "Reconciliation completed"
    );

    Ok(ReconcileOutput {
        enriched: reconciliation.records,
        extra_headers: attendance.extra_headers,
        overtime: overtime.records,
        summary,
        totals,
        report,
    })
}

fn build_report(
    attendance: &NormalizedTable,
    overtime: &NormalizedTable,
    reconciliation: &Reconciliation,
) -> DataQualityReport {
    let mut warnings = Vec::new();
    for table in [attendance, overtime] {
        table_warnings(table.role, &table.stats, &mut warnings);
    }

    if reconciliation.duplicate_overtime_keys > 0 {
        warnings.push(DataWarning::new(
            "AMBIGUOUS_MATCH",
            format!(
                "{} employee/date keys occur more than once in the overtime table ({} rows)",
                reconciliation.duplicate_overtime_keys, reconciliation.duplicate_overtime_rows
            ),
            Severity::Medium,
        ));
    }

    if reconciliation.unmatched_overtime_rows > 0 {
        warnings.push(DataWarning::new(
            "UNMATCHED_OVERTIME",
            format!(
                "{} overtime rows have no matching attendance record (rows {})",
                reconciliation.unmatched_overtime_rows,
                row_list(&reconciliation.unmatched_overtime_source_rows)
            ),
            Severity::Low,
        ));
    }

    DataQualityReport {
        attendance: attendance.stats.clone(),
        overtime: overtime.stats.clone(),
        attendance_columns: attendance.columns.clone(),
        overtime_columns: overtime.columns.clone(),
        duplicate_overtime_keys: reconciliation.duplicate_overtime_keys,
        duplicate_overtime_rows: reconciliation.duplicate_overtime_rows,
        unmatched_overtime_rows: reconciliation.unmatched_overtime_rows,
        unmatched_overtime_source_rows: reconciliation.unmatched_overtime_source_rows.clone(),
        matched_attendance_rows: reconciliation.matched_attendance_rows,
        warnings,
    }
}

/// Lists row numbers one-based, as a spreadsheet user would count data rows.
fn row_list(rows: &[usize]) -> String {
    const SHOWN: usize = 10;
    let mut listed: Vec<String> = rows.iter().take(SHOWN).map(|r| (r + 1).to_string()).collect();
    if rows.len() > SHOWN {
        listed.push(format!("and {} more", rows.len() - SHOWN));
    }
    listed.join(", ")
}

fn table_warnings(role: TableRole, stats: &NormalizationStats, warnings: &mut Vec<DataWarning>) {
    let drop_severity = |dropped: usize| {
        if dropped * 2 > stats.rows_read {
            Severity::High
        } else {
            Severity::Medium
        }
    };

    if stats.dropped_bad_date > 0 {
        warnings.push(DataWarning::new(
            "DATE_PARSE_FAILURE",
            format!(
                "{} {} rows were dropped because the date could not be parsed",
                stats.dropped_bad_date, role
            ),
            drop_severity(stats.dropped_bad_date),
        ));
    }

    if stats.dropped_missing_employee > 0 {
        warnings.push(DataWarning::new(
            "MISSING_EMPLOYEE",
            format!(
                "{} {} rows were dropped because the employee name was blank",
                stats.dropped_missing_employee, role
            ),
            drop_severity(stats.dropped_missing_employee),
        ));
    }

    let coerced = stats.durations_coerced + stats.working_time_coerced;
    if coerced > 0 {
        warnings.push(DataWarning::new(
            "DURATION_COERCED",
            format!(
                "{} {} values could not be read as hours and were set to 0 \
                 ({} duration, {} working time)",
                coerced, role, stats.durations_coerced, stats.working_time_coerced
            ),
            Severity::Medium,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::error::ReconError;
    use crate::models::CellValue;

    fn raw(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| CellValue::from(*c)).collect())
                .collect(),
        )
    }

    fn codes(report: &DataQualityReport) -> Vec<&str> {
        report.warnings.iter().map(|w| w.code.as_str()).collect()
    }

    #[test]
    fn test_clean_run_has_no_warnings() {
        let attendance = raw(
            &["Employee Name", "Date", "Shift"],
            &[&["John Doe", "01/03/2024", "Pagi"]],
        );
        let overtime = raw(
            &["Employee Name", "Date", "Duration"],
            &[&["john doe", "01/03/2024", "02:30"]],
        );

        let output = process(&attendance, &overtime, &ReconcileConfig::default()).unwrap();
        assert!(output.report.is_clean());
        assert_eq!(output.report.matched_attendance_rows, 1);
        assert_eq!(output.totals.employees, 1);
    }

    #[test]
    fn test_warnings_are_collected() {
        let attendance = raw(
            &["Employee Name", "Date", "Shift"],
            &[
                &["Ana", "01/03/2024", "Pagi"],
                &["Ana", "never", "Pagi"],
                &["", "02/03/2024", "Pagi"],
            ],
        );
        let overtime = raw(
            &["Name", "Date", "Duration"],
            &[
                &["Ana", "01/03/2024", "1"],
                &["Ana", "01/03/2024", "oops"],
                &["Budi", "01/03/2024", "1"],
            ],
        );

        let output = process(&attendance, &overtime, &ReconcileConfig::default()).unwrap();
        assert_eq!(
            codes(&output.report),
            vec![
                "DATE_PARSE_FAILURE",
                "MISSING_EMPLOYEE",
                "DURATION_COERCED",
                "AMBIGUOUS_MATCH",
                "UNMATCHED_OVERTIME",
            ]
        );
        assert_eq!(output.report.duplicate_overtime_keys, 1);
        assert_eq!(output.report.unmatched_overtime_rows, 1);
        assert_eq!(output.report.attendance.rows_retained, 1);
    }

    #[test]
    fn test_unmatched_overtime_is_identifiable() {
        let attendance = raw(
            &["Employee Name", "Date", "Shift"],
            &[&["John Doe", "01/03/2024", "Pagi"]],
        );
        let overtime = raw(
            &["Name", "Date", "Duration"],
            &[&["John Doe", "01/03/2024", "1"], &["Ghost", "01/03/2024", "2"]],
        );

        let output = process(&attendance, &overtime, &ReconcileConfig::default()).unwrap();
        assert_eq!(output.report.unmatched_overtime_source_rows, vec![1]);

        let row = output.report.unmatched_overtime_source_rows[0];
        let ghost = output
            .overtime
            .iter()
            .find(|r| r.source_row == row)
            .unwrap();
        assert_eq!(ghost.employee, "ghost");
        assert_eq!(ghost.duration_hours, 2.0);
        assert_eq!(output.overtime.len(), 2);

        let warning = output
            .report
            .warnings
            .iter()
            .find(|w| w.code == "UNMATCHED_OVERTIME")
            .unwrap();
        assert!(warning.message.contains("(rows 2)"));
    }

    #[test]
    fn test_row_list_truncates() {
        assert_eq!(row_list(&[0, 4]), "1, 5");
        let many: Vec<usize> = (0..12).collect();
        assert_eq!(row_list(&many), "1, 2, 3, 4, 5, 6, 7, 8, 9, 10, and 2 more");
    }

    #[test]
    fn test_unclaimed_attendance_columns_reach_output() {
        let attendance = raw(
            &["NIK", "Employee Name", "Date", "Shift", "Remarks"],
            &[&["E-01", "John Doe", "01/03/2024", "Pagi", "late"]],
        );
        let overtime = raw(&["Name", "Date", "Duration"], &[]);

        let output = process(&attendance, &overtime, &ReconcileConfig::default()).unwrap();
        assert_eq!(output.extra_headers, vec!["NIK", "Remarks"]);
        assert_eq!(output.enriched[0].display().extra, vec!["E-01", "late"]);
    }

    #[test]
    fn test_duplicate_policy_flows_through() {
        let attendance = raw(
            &["Employee Name", "Date", "Shift"],
            &[&["Ana", "01/03/2024", "Pagi"]],
        );
        let overtime = raw(
            &["Name", "Date", "Duration"],
            &[&["Ana", "01/03/2024", "1"], &["Ana", "01/03/2024", "2"]],
        );

        let config = ReconcileConfig {
            duplicate_policy: DuplicatePolicy::Sum,
            ..ReconcileConfig::default()
        };
        let output = process(&attendance, &overtime, &config).unwrap();
        assert_eq!(output.summary[0].overtime_hours, 3.0);
    }

    #[test]
    fn test_structural_errors_propagate() {
        let attendance = raw(&["Employee Name", "Date"], &[]);
        let overtime = raw(&["Name", "Date", "Duration"], &[]);

        let result = process(&attendance, &overtime, &ReconcileConfig::default());
        assert!(matches!(result, Err(ReconError::MissingColumn { .. })));
    }
}
