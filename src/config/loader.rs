//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a
//! reconciliation configuration from a YAML file.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{ReconError, ReconResult};

use super::types::ReconcileConfig;

/// Loads and provides access to reconciliation configuration.
///
/// # File Format
///
/// ```yaml
/// duplicate_policy: first_match   # or: sum
/// shift_policy: keyword           # or: non_excluded
/// require_shift_column: true
/// missing_fields:
///   duration:
///     action: fail
///   working_time_normal:
///     action: default
///     value: 0.0
/// validation:
///   min_valid_overtime_ratio: 0.0
/// extra_aliases:
///   employee_name: [karyawan]
/// ```
///
/// Every key is optional.
///
/// # Example
///
/// ```no_run
/// use roster_recon::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/reconcile.yaml").unwrap();
/// println!("Duplicate policy: {:?}", loader.config().duplicate_policy);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: ReconcileConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified YAML file.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file is missing
    /// - The file contains invalid YAML or unknown enum values
    /// - A value is out of range (see [`ReconcileConfig::validate`])
    pub fn load<P: AsRef<Path>>(path: P) -> ReconResult<Self> {
        let path = path.as_ref();
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| ReconError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        let config = Self::parse(&content, &path_str)?;
        debug!(path = %path_str, "Loaded reconciliation configuration");
        Ok(Self { config })
    }

    /// Parses configuration from YAML text.
    pub fn from_yaml_str(content: &str) -> ReconResult<Self> {
        let config = Self::parse(content, "<inline>")?;
        Ok(Self { config })
    }

    fn parse(content: &str, path: &str) -> ReconResult<ReconcileConfig> {
        let config: ReconcileConfig =
            serde_yaml::from_str(content).map_err(|e| ReconError::ConfigParseError {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Consumes the loader and returns the configuration.
    pub fn into_config(self) -> ReconcileConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DuplicatePolicy, MissingFieldPolicy, ShiftPolicy};
    use crate::models::CanonicalField;

    fn config_path() -> &'static str {
        "./config/reconcile.yaml"
    }

    #[test]
    fn test_load_shipped_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let config = result.unwrap().into_config();
        assert_eq!(config.duplicate_policy, DuplicatePolicy::FirstMatch);
        assert_eq!(config.shift_policy, ShiftPolicy::Keyword);
        assert_eq!(config.missing_fields.duration, MissingFieldPolicy::Fail);
        assert_eq!(
            config.missing_fields.working_time_normal,
            MissingFieldPolicy::Default { value: 0.0 }
        );
    }

    #[test]
    fn test_shipped_configuration_matches_defaults() {
        let loaded = ConfigLoader::load(config_path()).unwrap().into_config();
        assert_eq!(loaded, ReconcileConfig::default());
    }

    #[test]
    fn test_load_missing_file_returns_error() {
        let result = ConfigLoader::load("/nonexistent/reconcile.yaml");

        match result {
            Err(ReconError::ConfigNotFound { path }) => {
                assert!(path.contains("reconcile.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let result = ConfigLoader::from_yaml_str("duplicate_policy: average");
        assert!(matches!(result, Err(ReconError::ConfigParseError { .. })));
    }

    #[test]
    fn test_out_of_range_ratio_is_invalid() {
        let result =
            ConfigLoader::from_yaml_str("validation:\n  min_valid_overtime_ratio: -0.1\n");
        assert!(matches!(result, Err(ReconError::InvalidConfig { .. })));
    }

    #[test]
    fn test_extra_aliases_parsed() {
        let loader = ConfigLoader::from_yaml_str(
            "extra_aliases:\n  employee_name: [karyawan, pegawai]\n",
        )
        .unwrap();
        assert_eq!(
            loader.config().extra_aliases_for(CanonicalField::EmployeeName),
            ["karyawan".to_string(), "pegawai".to_string()]
        );
    }
}
