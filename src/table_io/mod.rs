//! Table input and output.
//!
//! The engine works on in-memory [`crate::models::RawTable`]s. This module
//! gets them in and out of delimited text files, and reads them from
//! spreadsheet workbooks.

mod delimited;
mod workbook;

pub use delimited::{
    ENRICHED_HEADERS, SUMMARY_HEADERS, read_csv_str, read_csv_table, sniff_delimiter,
    write_enriched_csv, write_summary_csv,
};
pub use workbook::read_workbook_table;
