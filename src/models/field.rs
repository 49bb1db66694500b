//! Canonical fields and table roles.
//!
//! A [`CanonicalField`] is the semantic role a column plays regardless of the
//! header text it was uploaded with. A [`TableRole`] says which of the two
//! input tables is being processed, since required fields differ per table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The semantic role a source column can be mapped to.
///
/// # Example
///
/// ```
/// use roster_recon::models::CanonicalField;
///
/// assert_eq!(CanonicalField::EmployeeName.to_string(), "EmployeeName");
/// assert_eq!(CanonicalField::ALL.len(), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    /// The employee's name, used as the join identity.
    EmployeeName,
    /// The calendar date of the record.
    Date,
    /// The shift label (e.g. "Pagi", "Off").
    Shift,
    /// The employee's job position.
    JobPosition,
    /// An overtime duration.
    Duration,
    /// Scheduled "normal" working time.
    WorkingTimeNormal,
    /// The work area or department.
    WorkArea,
}

impl CanonicalField {
    /// Every field, in resolution order.
    pub const ALL: [CanonicalField; 7] = [
        CanonicalField::EmployeeName,
        CanonicalField::Date,
        CanonicalField::Shift,
        CanonicalField::JobPosition,
        CanonicalField::Duration,
        CanonicalField::WorkingTimeNormal,
        CanonicalField::WorkArea,
    ];

    /// Returns the field name as used in messages and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            CanonicalField::EmployeeName => "EmployeeName",
            CanonicalField::Date => "Date",
            CanonicalField::Shift => "Shift",
            CanonicalField::JobPosition => "JobPosition",
            CanonicalField::Duration => "Duration",
            CanonicalField::WorkingTimeNormal => "WorkingTimeNormal",
            CanonicalField::WorkArea => "WorkArea",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which of the two input tables a record or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableRole {
    /// The daily attendance roster.
    Attendance,
    /// The overtime/duration log.
    Overtime,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableRole::Attendance => f.write_str("attendance"),
            TableRole::Overtime => f.write_str("overtime"),
        }
    }
}

/// How a column was matched to its canonical field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionPass {
    /// The normalized header equals one of the field's aliases.
    Alias,
    /// The normalized header contains one of the fallback patterns.
    Fallback,
}

/// A header that was mapped to a canonical field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumn {
    /// Position of the column in the raw header list.
    pub index: usize,
    /// The header text as supplied.
    pub header: String,
    /// Which pass claimed the column.
    pub pass: ResolutionPass,
}

/// The column mapping for one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    columns: BTreeMap<CanonicalField, ResolvedColumn>,
}

impl ResolvedColumns {
    /// Records the column for a field. An existing mapping is kept.
    pub fn insert(&mut self, field: CanonicalField, column: ResolvedColumn) {
        self.columns.entry(field).or_insert(column);
    }

    /// Returns the column mapped to `field`, if any.
    pub fn get(&self, field: CanonicalField) -> Option<&ResolvedColumn> {
        self.columns.get(&field)
    }

    /// Returns the column index mapped to `field`, if any.
    pub fn index_of(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).map(|c| c.index)
    }

    /// Returns true when `field` has a column.
    pub fn contains(&self, field: CanonicalField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Returns true when the raw column at `index` is already claimed.
    pub fn is_claimed(&self, index: usize) -> bool {
        self.columns.values().any(|c| c.index == index)
    }

    /// Iterates over the mapping in field order.
    pub fn iter(&self) -> impl Iterator<Item = (CanonicalField, &ResolvedColumn)> {
        self.columns.iter().map(|(field, column)| (*field, column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_serializes_snake_case() {
        let json = serde_json::to_string(&CanonicalField::WorkingTimeNormal).unwrap();
        assert_eq!(json, "\"working_time_normal\"");

        let field: CanonicalField = serde_json::from_str("\"employee_name\"").unwrap();
        assert_eq!(field, CanonicalField::EmployeeName);
    }

    #[test]
    fn test_resolved_columns_keep_first_mapping() {
        let mut columns = ResolvedColumns::default();
        columns.insert(
            CanonicalField::Date,
            ResolvedColumn { index: 1, header: "Tanggal".to_string(), pass: ResolutionPass::Alias },
        );
        columns.insert(
            CanonicalField::Date,
            ResolvedColumn { index: 4, header: "Date".to_string(), pass: ResolutionPass::Alias },
        );

        assert_eq!(columns.index_of(CanonicalField::Date), Some(1));
        assert!(columns.is_claimed(1));
        assert!(!columns.is_claimed(4));
        assert!(!columns.contains(CanonicalField::Shift));
    }

    #[test]
    fn test_table_role_display() {
        assert_eq!(TableRole::Attendance.to_string(), "attendance");
        assert_eq!(TableRole::Overtime.to_string(), "overtime");
    }
}
