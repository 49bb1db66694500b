//! Raw input tables.

use serde::{Deserialize, Serialize};

use super::CellValue;

/// A table exactly as uploaded: a header list and a row-major value grid.
///
/// Rows may be shorter than the header list; missing trailing cells read as
/// [`CellValue::Empty`].
///
/// # Example
///
/// ```
/// use roster_recon::models::{CellValue, RawTable};
///
/// let table = RawTable::new(
///     vec!["Employee Name".into(), "Date".into()],
///     vec![vec!["John Doe".into()]],
/// );
/// assert_eq!(table.cell(0, 0), &CellValue::Text("John Doe".to_string()));
/// assert_eq!(table.cell(0, 1), &CellValue::Empty);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    /// Column headers in source order.
    pub headers: Vec<String>,
    /// Data rows in source order.
    #[serde(default)]
    pub rows: Vec<Vec<CellValue>>,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl RawTable {
    /// Creates a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self { headers, rows }
    }

    /// Builds a table from records keyed by header.
    ///
    /// Headers are collected in order of first appearance across records.
    pub fn from_records<I, R, K>(records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, CellValue)>,
        K: Into<String>,
    {
        let mut headers: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<CellValue>> = Vec::new();

        for record in records {
            let mut row: Vec<CellValue> = vec![CellValue::Empty; headers.len()];
            for (key, value) in record {
                let key = key.into();
                let index = match headers.iter().position(|h| *h == key) {
                    Some(index) => index,
                    None => {
                        headers.push(key);
                        headers.len() - 1
                    }
                };
                if row.len() <= index {
                    row.resize(index + 1, CellValue::Empty);
                }
                row[index] = value;
            }
            rows.push(row);
        }

        Self { headers, rows }
    }

    /// Returns the number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true when the table has no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the cell at `row`, `column`, or `Empty` when out of range.
    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&EMPTY_CELL)
    }
}
