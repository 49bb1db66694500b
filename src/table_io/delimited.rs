//! CSV adapters.
//!
//! Reads a delimited file into a [`RawTable`] of text cells, and writes the
//! enriched and summary tables in their fixed export column orders.

use std::io::{Read, Write};

use csv::{ReaderBuilder, Writer, WriterBuilder};

use crate::error::ReconResult;
use crate::models::{CellValue, EnrichedRecord, RawTable, SummaryRow};

/// Fixed column order of the enriched export. Unclaimed attendance columns
/// follow these, under their original headers.
pub const ENRICHED_HEADERS: [&str; 8] = [
    "Employee Name",
    "Date",
    "RKP PIC",
    "Shift",
    "Job Position",
    "Work Area",
    "WT/Normal",
    "Attendance Duration",
];

/// Column order of the summary export.
pub const SUMMARY_HEADERS: [&str; 6] = [
    "No",
    "Employee Name",
    "Job Position",
    "D/Work",
    "WT/Normal",
    "RKP PIC",
];

const DELIMITER_CANDIDATES: [u8; 3] = [b',', b';', b'\t'];

/// Guesses the delimiter of a delimited text sample.
///
/// Each candidate is scored by how many of the first lines split into the
/// same number of fields as the first line, weighted by that field count.
/// Falls back to a comma.
///
/// # Example
///
/// ```
/// use roster_recon::table_io::sniff_delimiter;
///
/// assert_eq!(sniff_delimiter("Nama;Tanggal;Shift\nAna;01/03/2024;Pagi\n"), b';');
/// assert_eq!(sniff_delimiter("Name,Date\nAna,01/03/2024\n"), b',');
/// ```
pub fn sniff_delimiter(sample: &str) -> u8 {
    let lines: Vec<&str> = sample.lines().take(10).collect();

    let mut best = b',';
    let mut best_score = 0;
    for delimiter in DELIMITER_CANDIDATES {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| {
                ReaderBuilder::new()
                    .delimiter(delimiter)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(Result::ok)
                    .map_or(1, |record| record.len())
            })
            .collect();

        let target = match counts.first() {
            Some(&n) if n > 1 => n,
            _ => continue,
        };
        let score = counts.iter().filter(|&&c| c == target).count() * target;
        if score > best_score {
            best_score = score;
            best = delimiter;
        }
    }
    best
}

/// Reads delimited text into a [`RawTable`].
///
/// The first record is the header row. Fields are kept as text; blank
/// fields become [`CellValue::Empty`]. Ragged rows are accepted.
///
/// # Errors
///
/// Returns [`crate::error::ReconError::Csv`] when the input cannot be read.
pub fn read_csv_table<R: Read>(reader: R, delimiter: u8) -> ReconResult<RawTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::from(field)
                    }
                })
                .collect(),
        );
    }

    Ok(RawTable::new(headers, rows))
}

/// Reads delimited text, guessing the delimiter from its first lines.
///
/// # Example
///
/// ```
/// use roster_recon::table_io::read_csv_str;
///
/// let table = read_csv_str("Nama;Tanggal\nAna;01/03/2024\n").unwrap();
/// assert_eq!(table.headers, vec!["Nama", "Tanggal"]);
/// assert_eq!(table.len(), 1);
/// ```
pub fn read_csv_str(content: &str) -> ReconResult<RawTable> {
    read_csv_table(content.as_bytes(), sniff_delimiter(content))
}

/// Writes the enriched table: one line per record, hours as `HH:MM`.
///
/// `extra_headers` names the raw attendance columns carried in each
/// record's `extra` cells (see [`crate::engine::ReconcileOutput::extra_headers`]).
/// They are written after the fixed columns; each row is padded or cut to
/// that width.
pub fn write_enriched_csv<W: Write>(
    writer: W,
    extra_headers: &[String],
    records: &[EnrichedRecord],
) -> ReconResult<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(
        ENRICHED_HEADERS
            .iter()
            .copied()
            .chain(extra_headers.iter().map(String::as_str)),
    )?;

    for record in records {
        let row = record.display();
        let mut fields = vec![
            row.employee_name,
            row.date.format("%Y-%m-%d").to_string(),
            row.rkp_pic,
            row.shift.unwrap_or_default(),
            row.job_position.unwrap_or_default(),
            row.work_area.unwrap_or_default(),
            row.wt_normal,
            row.attendance_duration,
        ];
        let mut extra = row.extra;
        extra.resize(extra_headers.len(), String::new());
        fields.extend(extra);
        wtr.write_record(&fields)?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes the summary table: one line per employee, hours as `HH:MM`.
pub fn write_summary_csv<W: Write>(writer: W, summary: &[SummaryRow]) -> ReconResult<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(SUMMARY_HEADERS)?;

    for row in summary {
        let row = row.display();
        wtr.write_record([
            row.no.to_string(),
            row.employee_name,
            row.job_position.unwrap_or_default(),
            row.d_work.to_string(),
            row.wt_normal,
            row.rkp_pic,
        ])?;
    }

    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}
