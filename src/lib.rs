//! Attendance and overtime reconciliation.
//!
//! This crate joins a daily attendance roster with an overtime log by
//! employee and date, producing an enriched attendance table and a
//! per-employee summary of worked days, normal working time and overtime.
//! Messy headers, mixed duration formats and day-first dates are normalized
//! on the way in; rows that cannot be used are counted in a data-quality
//! report instead of failing the run.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod table_io;
