//! Configuration loading and management for the reconciliation engine.
//!
//! This module holds the built-in alias table, the policy switches the
//! engine reads (duplicate handling, shift classification, missing-column
//! defaults, row-retention thresholds) and the YAML loader for them.
//!
//! # Example
//!
//! ```no_run
//! use roster_recon::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/reconcile.yaml").unwrap();
//! println!("Shift policy: {:?}", config.config().shift_policy);
//! ```

mod aliases;
mod loader;
mod types;

pub use aliases::builtin_aliases;
pub use loader::ConfigLoader;
pub use types::{
    DEFAULT_FALLBACK_WT_PATTERNS, DEFAULT_NON_WORK_TOKENS, DEFAULT_WORK_KEYWORDS, DuplicatePolicy,
    MissingFieldPolicies, MissingFieldPolicy, ReconcileConfig, ShiftPolicy, ShiftVocabulary,
    ValidationConfig,
};
