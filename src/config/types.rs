//! Configuration types for reconciliation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every field has a default,
//! so a partial file (or none at all) yields a usable configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ReconError, ReconResult};
use crate::models::CanonicalField;

/// How several overtime rows sharing one (employee, date) key are merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Use the first row in source order.
    #[default]
    FirstMatch,
    /// Add every matching row together.
    Sum,
}

/// Which rule decides whether a shift label counts as a worked day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPolicy {
    /// The label must contain a work keyword and no non-work token.
    #[default]
    Keyword,
    /// The label must be non-empty and not exactly a non-work token.
    NonExcluded,
}

/// What to do when an optional numeric column is absent from a table.
///
/// Serialized with an `action` tag:
///
/// ```yaml
/// duration:
///   action: fail
/// working_time_normal:
///   action: default
///   value: 0.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Fail the batch with a missing-column error.
    Fail,
    /// Fill every row with a constant number of hours.
    Default {
        /// The hours to fill in.
        value: f64,
    },
}

/// Missing-column policies for the numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MissingFieldPolicies {
    /// Applies to `Duration` in the overtime table.
    pub duration: MissingFieldPolicy,
    /// Applies to `WorkingTimeNormal` in both tables.
    pub working_time_normal: MissingFieldPolicy,
}

impl Default for MissingFieldPolicies {
    fn default() -> Self {
        Self {
            duration: MissingFieldPolicy::Fail,
            working_time_normal: MissingFieldPolicy::Default { value: 0.0 },
        }
    }
}

/// Row-retention thresholds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Minimum share (0.0 to 1.0) of overtime rows that must survive
    /// normalization. A non-empty overtime table that loses every row
    /// always fails, whatever this is set to.
    pub min_valid_overtime_ratio: f64,
}

/// Words used to classify shift labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShiftVocabulary {
    /// Substrings that mark a label as a working shift.
    pub work_keywords: Vec<String>,
    /// Labels (or, under the keyword policy, substrings) meaning "not worked".
    pub non_work_tokens: Vec<String>,
}

/// Default work keywords.
pub const DEFAULT_WORK_KEYWORDS: &[&str] = &[
    "pagi", "siang", "sore", "malam", "shift", "normal", "morning", "evening", "day", "night",
    "kerja",
];

/// Default non-work tokens.
pub const DEFAULT_NON_WORK_TOKENS: &[&str] = &[
    "off",
    "libur",
    "leave",
    "cuti",
    "hari libur",
    "istirahat",
    "kosong",
];

/// Default header fragments that mark a column as a working-time fallback.
pub const DEFAULT_FALLBACK_WT_PATTERNS: &[&str] = &["project", "plant", "volume", "task", "output"];

impl Default for ShiftVocabulary {
    fn default() -> Self {
        Self {
            work_keywords: DEFAULT_WORK_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            non_work_tokens: DEFAULT_NON_WORK_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The complete reconciliation configuration.
///
/// # Example
///
/// ```
/// use roster_recon::config::{DuplicatePolicy, ReconcileConfig, ShiftPolicy};
///
/// let config = ReconcileConfig::default();
/// assert_eq!(config.duplicate_policy, DuplicatePolicy::FirstMatch);
/// assert_eq!(config.shift_policy, ShiftPolicy::Keyword);
/// assert!(config.require_shift_column);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Resolution of duplicate overtime keys.
    pub duplicate_policy: DuplicatePolicy,
    /// Work-day classification rule.
    pub shift_policy: ShiftPolicy,
    /// When false, an attendance table without a shift column is accepted
    /// and every row counts as worked.
    pub require_shift_column: bool,
    /// Defaults for absent numeric columns.
    pub missing_fields: MissingFieldPolicies,
    /// Row-retention thresholds.
    pub validation: ValidationConfig,
    /// Shift classification vocabulary.
    pub shift_vocabulary: ShiftVocabulary,
    /// Header fragments for the working-time fallback pass.
    pub fallback_wt_patterns: Vec<String>,
    /// Aliases added to the built-in table, per field.
    pub extra_aliases: BTreeMap<CanonicalField, Vec<String>>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::default(),
            shift_policy: ShiftPolicy::default(),
            require_shift_column: true,
            missing_fields: MissingFieldPolicies::default(),
            validation: ValidationConfig::default(),
            shift_vocabulary: ShiftVocabulary::default(),
            fallback_wt_patterns: DEFAULT_FALLBACK_WT_PATTERNS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            extra_aliases: BTreeMap::new(),
        }
    }
}

impl ReconcileConfig {
    /// Checks values that deserialize fine but cannot be used.
    pub fn validate(&self) -> ReconResult<()> {
        let ratio = self.validation.min_valid_overtime_ratio;
        if !(0.0..=1.0).contains(&ratio) {
            return Err(ReconError::InvalidConfig {
                message: format!("min_valid_overtime_ratio must be within 0..=1, got {}", ratio),
            });
        }

        for (name, policy) in [
            ("duration", self.missing_fields.duration),
            ("working_time_normal", self.missing_fields.working_time_normal),
        ] {
            if let MissingFieldPolicy::Default { value } = policy {
                if !value.is_finite() {
                    return Err(ReconError::InvalidConfig {
                        message: format!("default value for {} must be finite", name),
                    });
                }
            }
        }

        Ok(())
    }

    /// Returns the configured extra aliases for `field`.
    pub fn extra_aliases_for(&self, field: CanonicalField) -> &[String] {
        self.extra_aliases
            .get(&field)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_missing_field_policies() {
        let policies = MissingFieldPolicies::default();
        assert_eq!(policies.duration, MissingFieldPolicy::Fail);
        assert_eq!(
            policies.working_time_normal,
            MissingFieldPolicy::Default { value: 0.0 }
        );
    }

    #[test]
    fn test_missing_field_policy_tagged_yaml() {
        let policy: MissingFieldPolicy = serde_yaml::from_str("action: default\nvalue: 1.0").unwrap();
        assert_eq!(policy, MissingFieldPolicy::Default { value: 1.0 });

        let policy: MissingFieldPolicy = serde_yaml::from_str("action: fail").unwrap();
        assert_eq!(policy, MissingFieldPolicy::Fail);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config: ReconcileConfig = serde_yaml::from_str("duplicate_policy: sum").unwrap();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Sum);
        assert_eq!(config.shift_policy, ShiftPolicy::Keyword);
        assert_eq!(config.fallback_wt_patterns.len(), 5);
        assert!(config.shift_vocabulary.work_keywords.contains(&"pagi".to_string()));
    }

    #[test]
    fn test_validate_rejects_ratio_out_of_range() {
        let mut config = ReconcileConfig::default();
        config.validation.min_valid_overtime_ratio = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ReconError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_default() {
        let mut config = ReconcileConfig::default();
        config.missing_fields.duration = MissingFieldPolicy::Default { value: f64::NAN };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_extra_aliases_for_unconfigured_field_is_empty() {
        let config = ReconcileConfig::default();
        assert!(config.extra_aliases_for(CanonicalField::Shift).is_empty());
    }
}
