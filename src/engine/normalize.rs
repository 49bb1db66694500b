//! Table normalization.
//!
//! Turns a [`RawTable`] into typed [`NormalizedRecord`]s: resolves the
//! columns, converts every cell, drops rows without an employee or a valid
//! date, and fills absent numeric columns according to the configured
//! [`MissingFieldPolicy`].

use tracing::{debug, info, warn};

use crate::config::{MissingFieldPolicy, ReconcileConfig};
use crate::error::{ReconError, ReconResult};
use crate::models::{
    CanonicalField, CellValue, NormalizationStats, NormalizedRecord, NormalizedTable, RawTable,
    ResolvedColumns, TableRole,
};

use super::columns::resolve_columns;
use super::dates::parse_date;
use super::durations::try_convert_to_hours;
use super::names::{display_name, normalize_name};
use super::shifts::is_work_day;

/// How a numeric field is filled for every row of a table.
#[derive(Debug, Clone, Copy)]
enum HoursSource {
    Column(usize),
    Constant(f64),
}

impl HoursSource {
    fn for_field(
        columns: &ResolvedColumns,
        field: CanonicalField,
        policy: MissingFieldPolicy,
    ) -> Self {
        match (columns.index_of(field), policy) {
            (Some(index), _) => HoursSource::Column(index),
            (None, MissingFieldPolicy::Default { value }) => HoursSource::Constant(value),
            // Resolution already rejected the table if the column was required.
            (None, MissingFieldPolicy::Fail) => HoursSource::Constant(0.0),
        }
    }

    /// Returns the hours and whether a non-blank value had to be coerced.
    fn read(self, raw: &RawTable, row: usize) -> (f64, bool) {
        match self {
            HoursSource::Constant(value) => (value, false),
            HoursSource::Column(index) => match try_convert_to_hours(raw.cell(row, index)) {
                Some(hours) => (hours, false),
                None => (0.0, true),
            },
        }
    }
}

/// Normalizes one input table.
///
/// Rows are dropped, never failed, when the employee name is blank or the
/// date does not parse. For the overtime table the batch does fail when a
/// non-empty table keeps no rows at all, or keeps fewer than
/// `validation.min_valid_overtime_ratio` of them.
///
/// # Errors
///
/// - [`ReconError::MissingColumn`] when a required field has no column.
/// - [`ReconError::InsufficientValidRows`] when the overtime threshold is not met.
///
/// # Example
///
/// ```
/// use roster_recon::config::ReconcileConfig;
/// use roster_recon::engine::normalize_table;
/// use roster_recon::models::{CellValue, RawTable, TableRole};
///
/// let raw = RawTable::new(
///     vec!["Employee Name".into(), "Date".into(), "Shift".into()],
///     vec![
///         vec!["John Doe".into(), "01/03/2024".into(), "Pagi".into()],
///         vec!["".into(), "02/03/2024".into(), "Pagi".into()],
///     ],
/// );
///
/// let table = normalize_table(&raw, TableRole::Attendance, &ReconcileConfig::default()).unwrap();
/// assert_eq!(table.records.len(), 1);
/// assert_eq!(table.records[0].employee, "john doe");
/// assert_eq!(table.stats.dropped_missing_employee, 1);
/// ```
pub fn normalize_table(
    raw: &RawTable,
    role: TableRole,
    config: &ReconcileConfig,
) -> ReconResult<NormalizedTable> {
    let columns = resolve_columns(&raw.headers, role, config)?;

    let name_col = columns.index_of(CanonicalField::EmployeeName);
    let date_col = columns.index_of(CanonicalField::Date);
    let shift_col = columns.index_of(CanonicalField::Shift);
    let job_col = columns.index_of(CanonicalField::JobPosition);
    let area_col = columns.index_of(CanonicalField::WorkArea);
    let extra_cols: Vec<usize> = (0..raw.headers.len())
        .filter(|&index| !columns.is_claimed(index))
        .collect();

    let duration_policy = match role {
        TableRole::Overtime => config.missing_fields.duration,
        TableRole::Attendance => MissingFieldPolicy::Default { value: 0.0 },
    };
    let duration = HoursSource::for_field(&columns, CanonicalField::Duration, duration_policy);
    let working_time = HoursSource::for_field(
        &columns,
        CanonicalField::WorkingTimeNormal,
        config.missing_fields.working_time_normal,
    );

    let mut stats = NormalizationStats {
        rows_read: raw.len(),
        ..NormalizationStats::default()
    };
    let mut records = Vec::with_capacity(raw.len());

    for row in 0..raw.len() {
        let name = name_col.and_then(|c| text_of(raw.cell(row, c)));
        let employee = name.as_deref().map(normalize_name).unwrap_or_default();
        if employee.is_empty() {
            stats.dropped_missing_employee += 1;
            continue;
        }

        let date = match date_col.and_then(|c| parse_date(raw.cell(row, c))) {
            Some(date) => date,
            None => {
                stats.dropped_bad_date += 1;
                debug!(table = %role, row, "Dropped row with unparseable date");
                continue;
            }
        };

        let shift = shift_col.and_then(|c| text_of(raw.cell(row, c)));
        let work_day = match shift_col {
            Some(_) => is_work_day(shift.as_deref(), config.shift_policy, &config.shift_vocabulary),
            None => true,
        };

        let (duration_hours, duration_coerced) = duration.read(raw, row);
        let (working_time_normal_hours, working_time_coerced) = working_time.read(raw, row);
        stats.durations_coerced += usize::from(duration_coerced);
        stats.working_time_coerced += usize::from(working_time_coerced);

        records.push(NormalizedRecord {
            employee,
            display_name: name.as_deref().map(display_name).unwrap_or_default(),
            date,
            shift,
            job_position: job_col.and_then(|c| text_of(raw.cell(row, c))),
            work_area: area_col.and_then(|c| text_of(raw.cell(row, c))),
            duration_hours,
            working_time_normal_hours,
            work_day,
            source_row: row,
            extra: extra_cols.iter().map(|&c| raw.cell(row, c).clone()).collect(),
        });
    }

    stats.rows_retained = records.len();

    let dropped = stats.rows_read - stats.rows_retained;
    if dropped > 0 {
        warn!(
            table = %role,
            dropped,
            bad_date = stats.dropped_bad_date,
            missing_employee = stats.dropped_missing_employee,
            "Dropped invalid rows"
        );
    }
    info!(
        table = %role,
        rows_read = stats.rows_read,
        rows_retained = stats.rows_retained,
        durations_coerced = stats.durations_coerced,
        "Normalized table"
    );

    if role == TableRole::Overtime {
        check_valid_ratio(&stats, role, config.validation.min_valid_overtime_ratio)?;
    }

    Ok(NormalizedTable {
        role,
        records,
        columns,
        extra_headers: extra_cols.iter().map(|&c| raw.headers[c].clone()).collect(),
        stats,
    })
}

fn check_valid_ratio(
    stats: &NormalizationStats,
    table: TableRole,
    minimum_ratio: f64,
) -> ReconResult<()> {
    if stats.rows_read == 0 {
        return Ok(());
    }
    let ratio = stats.rows_retained as f64 / stats.rows_read as f64;
    if stats.rows_retained == 0 || ratio < minimum_ratio {
        return Err(ReconError::InsufficientValidRows {
            table,
            valid: stats.rows_retained,
            total: stats.rows_read,
            minimum_ratio,
        });
    }
    Ok(())
}

fn text_of(cell: &CellValue) -> Option<String> {
    cell.as_text()
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}
