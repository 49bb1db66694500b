//! Attendance/overtime reconciliation.
//!
//! A left join of attendance onto overtime by `(employee, date)`. Every
//! attendance record comes out exactly once, in its original order; overtime
//! rows without an attendance counterpart are listed by source row.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DuplicatePolicy;
use crate::models::{CanonicalField, EnrichedRecord, NormalizedRecord, NormalizedTable};

/// Join key shared by both tables.
type MatchKey<'a> = (&'a str, NaiveDate);

/// The output of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// One enriched record per attendance record, in attendance order.
    pub records: Vec<EnrichedRecord>,
    /// Distinct overtime keys that occur more than once.
    pub duplicate_overtime_keys: usize,
    /// Overtime rows belonging to a duplicated key.
    pub duplicate_overtime_rows: usize,
    /// Overtime rows whose key has no attendance record.
    pub unmatched_overtime_rows: usize,
    /// Raw-table row indexes of those overtime rows, in source order.
    pub unmatched_overtime_source_rows: Vec<usize>,
    /// Attendance records that matched at least one overtime row.
    pub matched_attendance_rows: usize,
}

/// Combines the hours of several overtime rows sharing one key.
///
/// # Example
///
/// ```
/// use roster_recon::config::DuplicatePolicy;
/// use roster_recon::engine::merge_hours;
///
/// assert_eq!(merge_hours([1.0, 2.0], DuplicatePolicy::FirstMatch), 1.0);
/// assert_eq!(merge_hours([1.0, 2.0], DuplicatePolicy::Sum), 3.0);
/// assert_eq!(merge_hours([], DuplicatePolicy::Sum), 0.0);
/// ```
pub fn merge_hours<I>(hours: I, policy: DuplicatePolicy) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut hours = hours.into_iter();
    match policy {
        DuplicatePolicy::FirstMatch => hours.next().unwrap_or(0.0),
        DuplicatePolicy::Sum => hours.sum(),
    }
}

/// Joins attendance records to overtime records.
///
/// `overtime_hours` is 0 for unmatched records; several matches are merged
/// with `policy`. Normal working time comes from the attendance record when
/// the attendance table has its own column for it, otherwise from the
/// matched overtime rows (merged with the same policy).
pub fn reconcile(
    attendance: &NormalizedTable,
    overtime: &NormalizedTable,
    policy: DuplicatePolicy,
) -> Reconciliation {
    let mut index: HashMap<MatchKey<'_>, Vec<&NormalizedRecord>> = HashMap::new();
    for record in &overtime.records {
        index
            .entry((record.employee.as_str(), record.date))
            .or_default()
            .push(record);
    }

    let duplicates: Vec<usize> = index
        .values()
        .map(Vec::len)
        .filter(|&len| len > 1)
        .collect();
    let duplicate_overtime_keys = duplicates.len();
    let duplicate_overtime_rows = duplicates.iter().sum();

    let attendance_keys: HashSet<MatchKey<'_>> = attendance
        .records
        .iter()
        .map(|r| (r.employee.as_str(), r.date))
        .collect();
    let unmatched_overtime_source_rows: Vec<usize> = overtime
        .records
        .iter()
        .filter(|r| !attendance_keys.contains(&(r.employee.as_str(), r.date)))
        .map(|r| r.source_row)
        .collect();
    let unmatched_overtime_rows = unmatched_overtime_source_rows.len();

    let attendance_has_wt = attendance.columns.contains(CanonicalField::WorkingTimeNormal);
    let overtime_has_wt = overtime.columns.contains(CanonicalField::WorkingTimeNormal);

    let mut matched_attendance_rows = 0;
    let records: Vec<EnrichedRecord> = attendance
        .records
        .iter()
        .map(|record| {
            let matches = index
                .get(&(record.employee.as_str(), record.date))
                .map(Vec::as_slice)
                .unwrap_or_default();
            if !matches.is_empty() {
                matched_attendance_rows += 1;
            }

            let overtime_hours = merge_hours(matches.iter().map(|m| m.duration_hours), policy);
            let working_time_normal_hours =
                if attendance_has_wt || !overtime_has_wt || matches.is_empty() {
                    record.working_time_normal_hours
                } else {
                    merge_hours(matches.iter().map(|m| m.working_time_normal_hours), policy)
                };

            if matches.len() > 1 {
                debug!(
                    employee = %record.employee,
                    date = %record.date,
                    matches = matches.len(),
                    "Merged duplicate overtime rows"
                );
            }

            EnrichedRecord {
                record: record.clone(),
                overtime_hours,
                working_time_normal_hours,
                overtime_matches: matches.len(),
            }
        })
        .collect();

    info!(
        attendance_rows = records.len(),
        matched = matched_attendance_rows,
        unmatched_overtime = unmatched_overtime_rows,
        duplicate_keys = duplicate_overtime_keys,
        "Reconciled attendance with overtime"
    );

    Reconciliation {
        records,
        duplicate_overtime_keys,
        duplicate_overtime_rows,
        unmatched_overtime_rows,
        unmatched_overtime_source_rows,
        matched_attendance_rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        NormalizationStats, ResolutionPass, ResolvedColumn, ResolvedColumns, TableRole,
    };

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn record(employee: &str, day: u32, duration: f64, wt: f64, row: usize) -> NormalizedRecord {
        NormalizedRecord {
            employee: employee.to_string(),
            display_name: employee.to_string(),
            date: date(day),
            shift: Some("Pagi".to_string()),
            job_position: None,
            work_area: None,
            duration_hours: duration,
            working_time_normal_hours: wt,
            work_day: true,
            source_row: row,
            extra: vec![],
        }
    }

    fn table(role: TableRole, records: Vec<NormalizedRecord>, with_wt: bool) -> NormalizedTable {
        let mut columns = ResolvedColumns::default();
        if with_wt {
            columns.insert(
                CanonicalField::WorkingTimeNormal,
                ResolvedColumn {
                    index: 9,
                    header: "WT".to_string(),
                    pass: ResolutionPass::Alias,
                },
            );
        }
        NormalizedTable {
            role,
            records,
            columns,
            extra_headers: vec![],
            stats: NormalizationStats::default(),
        }
    }

    #[test]
    fn test_single_match_takes_duration() {
        let attendance = table(TableRole::Attendance, vec![record("john doe", 1, 0.0, 0.0, 0)], false);
        let overtime = table(TableRole::Overtime, vec![record("john doe", 1, 2.5, 0.0, 0)], false);

        let result = reconcile(&attendance, &overtime, DuplicatePolicy::FirstMatch);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].overtime_hours, 2.5);
        assert_eq!(result.records[0].overtime_matches, 1);
        assert_eq!(result.matched_attendance_rows, 1);
        assert_eq!(result.unmatched_overtime_rows, 0);
    }

    #[test]
    fn test_unmatched_overtime_rows_are_identified() {
        let attendance = table(TableRole::Attendance, vec![record("john doe", 1, 0.0, 0.0, 0)], false);
        let overtime = table(
            TableRole::Overtime,
            vec![record("john doe", 1, 1.0, 0.0, 0), record("ghost", 1, 2.0, 0.0, 3)],
            false,
        );

        let result = reconcile(&attendance, &overtime, DuplicatePolicy::FirstMatch);
        assert_eq!(result.unmatched_overtime_rows, 1);
        assert_eq!(result.unmatched_overtime_source_rows, vec![3]);
    }

    #[test]
    fn test_unmatched_attendance_gets_zero() {
        let attendance = table(TableRole::Attendance, vec![record("ana", 1, 0.0, 0.0, 0)], false);
        let overtime = table(TableRole::Overtime, vec![record("ana", 2, 3.0, 0.0, 0)], false);

        let result = reconcile(&attendance, &overtime, DuplicatePolicy::FirstMatch);
        assert_eq!(result.records[0].overtime_hours, 0.0);
        assert_eq!(result.records[0].overtime_matches, 0);
        assert_eq!(result.unmatched_overtime_rows, 1);
        assert_eq!(result.matched_attendance_rows, 0);
    }

    #[test]
    fn test_duplicate_policy() {
        let attendance = table(TableRole::Attendance, vec![record("ana", 1, 0.0, 0.0, 0)], false);
        let overtime = table(
            TableRole::Overtime,
            vec![record("ana", 1, 1.0, 0.0, 0), record("ana", 1, 2.0, 0.0, 1)],
            false,
        );

        let first = reconcile(&attendance, &overtime, DuplicatePolicy::FirstMatch);
        assert_eq!(first.records[0].overtime_hours, 1.0);
        assert_eq!(first.duplicate_overtime_keys, 1);
        assert_eq!(first.duplicate_overtime_rows, 2);

        let sum = reconcile(&attendance, &overtime, DuplicatePolicy::Sum);
        assert_eq!(sum.records[0].overtime_hours, 3.0);
        assert_eq!(sum.records[0].overtime_matches, 2);
    }

    #[test]
    fn test_left_join_preserves_order_and_length() {
        let attendance = table(
            TableRole::Attendance,
            vec![
                record("budi", 2, 0.0, 0.0, 0),
                record("ana", 1, 0.0, 0.0, 1),
                record("budi", 2, 0.0, 0.0, 2),
            ],
            false,
        );
        let overtime = table(TableRole::Overtime, vec![record("budi", 2, 1.0, 0.0, 0)], false);

        let result = reconcile(&attendance, &overtime, DuplicatePolicy::FirstMatch);
        let rows: Vec<usize> = result.records.iter().map(|r| r.record.source_row).collect();
        assert_eq!(rows, vec![0, 1, 2]);
        assert_eq!(result.records[0].overtime_hours, 1.0);
        assert_eq!(result.records[2].overtime_hours, 1.0);
        assert_eq!(result.matched_attendance_rows, 2);
    }

    #[test]
    fn test_working_time_prefers_attendance_column() {
        let attendance = table(TableRole::Attendance, vec![record("ana", 1, 0.0, 8.0, 0)], true);
        let overtime = table(TableRole::Overtime, vec![record("ana", 1, 1.0, 7.0, 0)], true);

        let result = reconcile(&attendance, &overtime, DuplicatePolicy::FirstMatch);
        assert_eq!(result.records[0].working_time_normal_hours, 8.0);
    }

    #[test]
    fn test_working_time_falls_back_to_overtime() {
        let attendance = table(TableRole::Attendance, vec![record("ana", 1, 0.0, 0.0, 0)], false);
        let overtime = table(
            TableRole::Overtime,
            vec![record("ana", 1, 1.0, 7.0, 0), record("ana", 1, 1.0, 1.0, 1)],
            true,
        );

        let first = reconcile(&attendance, &overtime, DuplicatePolicy::FirstMatch);
        assert_eq!(first.records[0].working_time_normal_hours, 7.0);

        let sum = reconcile(&attendance, &overtime, DuplicatePolicy::Sum);
        assert_eq!(sum.records[0].working_time_normal_hours, 8.0);
    }

    #[test]
    fn test_working_time_default_kept_without_any_column() {
        let attendance = table(TableRole::Attendance, vec![record("ana", 1, 0.0, 7.5, 0)], false);
        let overtime = table(TableRole::Overtime, vec![record("ana", 1, 1.0, 0.0, 0)], false);

        let result = reconcile(&attendance, &overtime, DuplicatePolicy::FirstMatch);
        assert_eq!(result.records[0].working_time_normal_hours, 7.5);
    }

    #[test]
    fn test_empty_overtime() {
        let attendance = table(TableRole::Attendance, vec![record("ana", 1, 0.0, 0.0, 0)], false);
        let overtime = table(TableRole::Overtime, vec![], false);

        let result = reconcile(&attendance, &overtime, DuplicatePolicy::Sum);
        assert_eq!(result.records.len(), 1);
        assert_eq!(result.records[0].overtime_hours, 0.0);
        assert_eq!(result.duplicate_overtime_keys, 0);
    }
}
