//! Spreadsheet workbook import.
//!
//! Reads one sheet of an xlsx, xls, xlsb or ods workbook into a [`RawTable`].
//! Cells keep the type the workbook records for them, so a date-formatted
//! cell arrives as a date, a clock time or an elapsed span rather than a
//! bare serial number.

use std::path::Path;
use std::sync::LazyLock;

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use regex::Regex;
use tracing::{debug, info};

use crate::engine::from_serial_day;
use crate::error::{ReconError, ReconResult};
use crate::models::{CellValue, RawTable};

const SECONDS_PER_DAY: i64 = 86_400;

static ISO_DURATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(-)?P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+(?:\.\d+)?)S)?)?$")
        .expect("valid ISO duration pattern")
});

/// Reads a worksheet into a [`RawTable`].
///
/// `sheet` names the worksheet; `None` takes the first one. The first row of
/// the used range is the header row. Rows in which every cell is blank are
/// skipped.
///
/// # Errors
///
/// Returns [`ReconError::Workbook`] when the file cannot be opened, has no
/// sheets, or the named sheet cannot be read.
pub fn read_workbook_table(path: impl AsRef<Path>, sheet: Option<&str>) -> ReconResult<RawTable> {
    let path = path.as_ref();
    let mut workbook: Sheets<_> = open_workbook_auto(path).map_err(|e| ReconError::Workbook {
        message: format!("failed to open {}: {}", path.display(), e),
    })?;

    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ReconError::Workbook {
                message: format!("{} contains no sheets", path.display()),
            })?,
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReconError::Workbook {
            message: format!("failed to read sheet '{}': {}", sheet_name, e),
        })?;

    let mut grid = range.rows();
    let headers: Vec<String> = grid
        .next()
        .map(|row| row.iter().map(header_text).collect())
        .unwrap_or_default();

    let mut skipped = 0usize;
    let rows: Vec<Vec<CellValue>> = grid
        .map(|row| row.iter().map(convert_cell).collect::<Vec<_>>())
        .filter(|cells| {
            let blank = cells.iter().all(CellValue::is_empty);
            skipped += usize::from(blank);
            !blank
        })
        .collect();

    if skipped > 0 {
        debug!(sheet = %sheet_name, skipped, "Skipped blank workbook rows");
    }
    info!(
        sheet = %sheet_name,
        rows = rows.len(),
        columns = headers.len(),
        "Read workbook sheet"
    );

    Ok(RawTable::new(headers, rows))
}

fn header_text(cell: &Data) -> String {
    convert_cell(cell)
        .as_text()
        .map(|text| text.trim().to_string())
        .unwrap_or_default()
}

/// Maps a workbook cell onto a [`CellValue`].
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.trim().is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string()),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
        Data::DateTime(dt) => serial_to_cell(dt.as_f64(), dt.is_duration()),
        Data::DateTimeIso(s) => iso_datetime_cell(s),
        Data::DurationIso(s) => iso_duration_cell(s),
    }
}

/// Interprets a date-formatted serial (days since 1899-12-30).
///
/// Spans become [`CellValue::DurationSpan`]. Otherwise a serial below one day
/// is a clock time, a whole serial is a date and anything else a date-time.
/// Serials that fit none of these stay numbers.
fn serial_to_cell(serial: f64, is_duration: bool) -> CellValue {
    if !serial.is_finite() {
        return CellValue::Number(serial);
    }

    if is_duration {
        let millis = (serial * SECONDS_PER_DAY as f64 * 1000.0).round() as i64;
        return TimeDelta::try_milliseconds(millis)
            .map_or(CellValue::Number(serial), CellValue::DurationSpan);
    }

    let total = (serial * SECONDS_PER_DAY as f64).round();
    if total < 0.0 {
        return CellValue::Number(serial);
    }
    let total = total as i64;
    let (days, seconds) = (total / SECONDS_PER_DAY, (total % SECONDS_PER_DAY) as u32);
    let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0) else {
        return CellValue::Number(serial);
    };

    if days == 0 {
        return CellValue::TimeOfDay(time);
    }
    match from_serial_day(days as f64) {
        Some(date) if seconds == 0 => CellValue::Date(date),
        Some(date) => CellValue::DateTime(date.and_time(time)),
        None => CellValue::Number(serial),
    }
}

fn iso_datetime_cell(text: &str) -> CellValue {
    let text = text.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        CellValue::DateTime(dt)
    } else if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        CellValue::Date(date)
    } else if let Ok(time) = NaiveTime::parse_from_str(text, "%H:%M:%S%.f") {
        CellValue::TimeOfDay(time)
    } else {
        CellValue::Text(text.to_string())
    }
}

/// Reads ISO 8601 spans such as `PT02H30M00S` or `P1DT4H`.
fn iso_duration_cell(text: &str) -> CellValue {
    let text = text.trim();
    let Some(caps) = ISO_DURATION.captures(text) else {
        return CellValue::Text(text.to_string());
    };

    let part = |i: usize| -> f64 {
        caps.get(i)
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .unwrap_or(0.0)
    };
    let seconds = part(2) * SECONDS_PER_DAY as f64 + part(3) * 3600.0 + part(4) * 60.0 + part(5);
    let millis = (seconds * 1000.0).round() as i64;
    let millis = if caps.get(1).is_some() { -millis } else { millis };

    TimeDelta::try_milliseconds(millis)
        .map_or_else(|| CellValue::Text(text.to_string()), CellValue::DurationSpan)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_whole_serial_is_date() {
        assert_eq!(serial_to_cell(45352.0, false), CellValue::Date(date(2024, 3, 1)));
    }

    #[test]
    fn test_fractional_serial_is_date_time() {
        assert_eq!(
            serial_to_cell(45352.75, false),
            CellValue::DateTime(date(2024, 3, 1).and_time(time(18, 0)))
        );
    }

    #[test]
    fn test_serial_below_one_day_is_time_of_day() {
        assert_eq!(serial_to_cell(0.34375, false), CellValue::TimeOfDay(time(8, 15)));
        assert_eq!(serial_to_cell(0.0, false), CellValue::TimeOfDay(time(0, 0)));
    }

    #[test]
    fn test_duration_serial_is_span() {
        assert_eq!(
            serial_to_cell(0.09375, true),
            CellValue::DurationSpan(TimeDelta::minutes(135))
        );
        assert_eq!(
            serial_to_cell(1.5, true),
            CellValue::DurationSpan(TimeDelta::hours(36))
        );
    }

    #[test]
    fn test_unusable_serials_stay_numbers() {
        assert_eq!(serial_to_cell(-1.0, false), CellValue::Number(-1.0));
        assert_eq!(serial_to_cell(9_000_000.0, false), CellValue::Number(9_000_000.0));
        assert!(matches!(serial_to_cell(f64::NAN, false), CellValue::Number(n) if n.is_nan()));
    }

    #[test]
    fn test_plain_cells() {
        assert_eq!(convert_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(convert_cell(&Data::String("  ".to_string())), CellValue::Empty);
        assert_eq!(
            convert_cell(&Data::String("Budi".to_string())),
            CellValue::Text("Budi".to_string())
        );
        assert_eq!(convert_cell(&Data::Float(2.5)), CellValue::Number(2.5));
        assert_eq!(convert_cell(&Data::Int(3)), CellValue::Number(3.0));
        assert_eq!(
            convert_cell(&Data::Bool(true)),
            CellValue::Text("TRUE".to_string())
        );
    }

    #[test]
    fn test_iso_cells() {
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2024-03-01".to_string())),
            CellValue::Date(date(2024, 3, 1))
        );
        assert_eq!(
            convert_cell(&Data::DateTimeIso("2024-03-01T08:30:00".to_string())),
            CellValue::DateTime(date(2024, 3, 1).and_time(time(8, 30)))
        );
        assert_eq!(
            convert_cell(&Data::DateTimeIso("17:45:00".to_string())),
            CellValue::TimeOfDay(time(17, 45))
        );
        assert_eq!(
            convert_cell(&Data::DurationIso("PT02H30M00S".to_string())),
            CellValue::DurationSpan(TimeDelta::minutes(150))
        );
        assert_eq!(
            convert_cell(&Data::DurationIso("P1DT4H".to_string())),
            CellValue::DurationSpan(TimeDelta::hours(28))
        );
        assert_eq!(
            convert_cell(&Data::DurationIso("soon".to_string())),
            CellValue::Text("soon".to_string())
        );
    }

    #[test]
    fn test_typed_cells_feed_the_value_parsers() {
        use crate::engine::{convert_to_hours, parse_date};

        assert_eq!(
            parse_date(&serial_to_cell(45352.0, false)),
            Some(date(2024, 3, 1))
        );
        assert_eq!(convert_to_hours(&serial_to_cell(0.09375, true)), 2.25);
        assert_eq!(convert_to_hours(&serial_to_cell(0.09375, false)), 2.25);
    }

    #[test]
    fn test_missing_file_is_workbook_error() {
        let result = read_workbook_table("/nonexistent/roster.xlsx", None);
        assert!(matches!(result, Err(ReconError::Workbook { .. })));
    }
}
