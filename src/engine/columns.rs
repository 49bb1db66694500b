//! Column resolution.
//!
//! Maps messy header strings ("Employee Name", "employee_name", "NAMA") to
//! canonical fields. Matching compares normalized headers against normalized
//! aliases for exact equality; substring matching is only used by the
//! working-time fallback pass.

use tracing::debug;

use crate::config::{MissingFieldPolicy, ReconcileConfig, builtin_aliases};
use crate::error::{ReconError, ReconResult};
use crate::models::{CanonicalField, ResolutionPass, ResolvedColumn, ResolvedColumns, TableRole};

/// Normalizes a header for alias comparison.
///
/// Lower-cases and removes every non-alphanumeric character.
///
/// # Example
///
/// ```
/// use roster_recon::engine::normalize_header;
///
/// assert_eq!(normalize_header(" Employee_Name "), "employeename");
/// assert_eq!(normalize_header("WT/Normal"), "wtnormal");
/// ```
pub fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_alias_of(normalized: &str, field: CanonicalField, config: &ReconcileConfig) -> bool {
    if normalized.is_empty() {
        return false;
    }
    builtin_aliases(field).contains(&normalized)
        || config
            .extra_aliases_for(field)
            .iter()
            .any(|alias| normalize_header(alias) == normalized)
}

/// Returns the index of the first header that is an alias of `field`.
///
/// # Example
///
/// ```
/// use roster_recon::config::ReconcileConfig;
/// use roster_recon::engine::resolve_column;
/// use roster_recon::models::CanonicalField;
///
/// let headers = vec!["No".to_string(), "EMPLOYEE NAME".to_string()];
/// let config = ReconcileConfig::default();
/// assert_eq!(resolve_column(&headers, CanonicalField::EmployeeName, &config), Some(1));
/// assert_eq!(resolve_column(&headers, CanonicalField::Shift, &config), None);
/// ```
pub fn resolve_column(
    headers: &[String],
    field: CanonicalField,
    config: &ReconcileConfig,
) -> Option<usize> {
    headers
        .iter()
        .position(|h| is_alias_of(&normalize_header(h), field, config))
}

/// Returns the fields a table of the given role cannot do without.
pub fn required_fields(role: TableRole, config: &ReconcileConfig) -> Vec<CanonicalField> {
    let mut fields = vec![CanonicalField::EmployeeName, CanonicalField::Date];
    match role {
        TableRole::Attendance => {
            if config.require_shift_column {
                fields.push(CanonicalField::Shift);
            }
        }
        TableRole::Overtime => {
            if config.missing_fields.duration == MissingFieldPolicy::Fail {
                fields.push(CanonicalField::Duration);
            }
        }
    }
    if config.missing_fields.working_time_normal == MissingFieldPolicy::Fail {
        fields.push(CanonicalField::WorkingTimeNormal);
    }
    fields
}

/// Resolves every canonical field for a table.
///
/// Runs the alias pass over all fields, then the working-time fallback pass
/// over unclaimed headers, then checks the role's required fields.
///
/// # Errors
///
/// Returns [`ReconError::MissingColumn`] naming the first required field
/// without a column, together with every available header.
pub fn resolve_columns(
    headers: &[String],
    role: TableRole,
    config: &ReconcileConfig,
) -> ReconResult<ResolvedColumns> {
    let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
    let mut columns = ResolvedColumns::default();

    for field in CanonicalField::ALL {
        let found = normalized
            .iter()
            .enumerate()
            .find(|(index, n)| !columns.is_claimed(*index) && is_alias_of(n, field, config));

        if let Some((index, _)) = found {
            debug!(table = %role, field = %field, header = %headers[index], "Resolved column by alias");
            columns.insert(
                field,
                ResolvedColumn {
                    index,
                    header: headers[index].clone(),
                    pass: ResolutionPass::Alias,
                },
            );
        }
    }

    if !columns.contains(CanonicalField::WorkingTimeNormal) {
        let patterns: Vec<String> = config
            .fallback_wt_patterns
            .iter()
            .map(|p| normalize_header(p))
            .filter(|p| !p.is_empty())
            .collect();

        let found = normalized.iter().enumerate().find(|(index, n)| {
            !columns.is_claimed(*index) && patterns.iter().any(|p| n.contains(p.as_str()))
        });

        if let Some((index, _)) = found {
            debug!(
                table = %role,
                header = %headers[index],
                "Adopted fallback column for working time"
            );
            columns.insert(
                CanonicalField::WorkingTimeNormal,
                ResolvedColumn {
                    index,
                    header: headers[index].clone(),
                    pass: ResolutionPass::Fallback,
                },
            );
        }
    }

    for field in required_fields(role, config) {
        if !columns.contains(field) {
            return Err(ReconError::MissingColumn {
                table: role,
                field,
                available: headers.to_vec(),
            });
        }
    }

    Ok(columns)
}
