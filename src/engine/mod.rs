//! Reconciliation engine.
//!
//! This module contains the column resolver, the value normalizers, the
//! join between attendance and overtime, and the per-employee aggregation.
//! Each piece is a plain function over borrowed inputs; [`process`] runs
//! them in order.

mod columns;
mod dates;
mod durations;
mod names;
mod normalize;
mod pipeline;
mod reconcile;
mod shifts;
mod summary;

pub use columns::{normalize_header, required_fields, resolve_column, resolve_columns};
pub use dates::{parse_date, parse_date_str};
pub(crate) use dates::from_serial_day;
pub use durations::{convert_to_hours, hours_to_hhmm, round_hours, try_convert_to_hours};
pub use names::{display_name, normalize_name};
pub use normalize::normalize_table;
pub use pipeline::{ReconcileOutput, process};
pub use reconcile::{Reconciliation, merge_hours, reconcile};
pub use shifts::{count_work_days, is_work_day};
pub use summary::{summarize, summary_totals};
