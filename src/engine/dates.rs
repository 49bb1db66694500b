//! Date parsing.
//!
//! Attendance exports are day-first (`01/03/2024` is the 1st of March). The
//! primary formats are `D/M/YYYY` and `D-M-YYYY`; everything else goes
//! through a list of general formats. Only the date part is kept.

use std::sync::LazyLock;

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use regex::{Captures, Regex};

use crate::models::CellValue;

static DAY_FIRST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})[/-](\d{1,2})[/-](\d{4})$").expect("valid day-first pattern")
});

static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Za-z]+").expect("valid word pattern"));

// Two-digit-year forms come first: `%Y` would otherwise read "01" as year 1.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y",
    "%d-%m-%y",
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%B %d, %Y",
    "%B %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Largest spreadsheet serial day accepted (9999-12-31).
const MAX_SERIAL_DAY: f64 = 2_958_465.0;

/// Parses a cell into a calendar date.
///
/// Returns `None` when no interpretation succeeds; callers decide whether
/// the row survives.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use roster_recon::engine::parse_date;
/// use roster_recon::models::CellValue;
///
/// let march_first = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// assert_eq!(parse_date(&CellValue::from("01/03/2024")), Some(march_first));
/// assert_eq!(parse_date(&CellValue::from("2024-03-01")), Some(march_first));
/// assert_eq!(parse_date(&CellValue::from("not a date")), None);
/// ```
pub fn parse_date(value: &CellValue) -> Option<NaiveDate> {
    match value {
        CellValue::Date(d) => Some(*d),
        CellValue::DateTime(dt) => Some(dt.date()),
        CellValue::Number(n) => from_serial_day(*n),
        CellValue::Text(s) => parse_date_str(s),
        CellValue::TimeOfDay(_) | CellValue::DurationSpan(_) | CellValue::Empty => None,
    }
}

/// Parses date text, day-first.
pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let text = raw.trim();
    if text.is_empty() {
        return None;
    }

    // A trailing time of day ("01/03/2024 08:00") is ignored.
    let head = text.split_whitespace().next().unwrap_or(text);
    if let Some(caps) = DAY_FIRST.captures(head) {
        return from_day_first(&caps);
    }

    parse_with_time_stripped(text, head).or_else(|| {
        let translated = translate_month_names(text);
        (translated != text)
            .then(|| parse_with_time_stripped(&translated, head))
            .flatten()
    })
}

fn parse_with_time_stripped(text: &str, head: &str) -> Option<NaiveDate> {
    parse_general(text).or_else(|| (head != text).then(|| parse_general(head)).flatten())
}

fn from_day_first(caps: &Captures<'_>) -> Option<NaiveDate> {
    let first: u32 = caps[1].parse().ok()?;
    let second: u32 = caps[2].parse().ok()?;
    let year: i32 = caps[3].parse().ok()?;

    // Month-first input only when the day-first reading is impossible.
    NaiveDate::from_ymd_opt(year, second, first)
        .or_else(|| NaiveDate::from_ymd_opt(year, first, second))
}

fn parse_general(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

fn translate_month_names(text: &str) -> String {
    WORD.replace_all(text, |caps: &Captures<'_>| {
        let word = &caps[0];
        indonesian_month(word).unwrap_or(word).to_string()
    })
    .into_owned()
}

fn indonesian_month(word: &str) -> Option<&'static str> {
    let month = match word.to_lowercase().as_str() {
        "januari" => "January",
        "februari" | "pebruari" => "February",
        "maret" => "March",
        "mei" => "May",
        "juni" => "June",
        "juli" => "July",
        "agustus" | "agu" | "ags" => "August",
        "oktober" | "okt" => "October",
        "nopember" => "November",
        "desember" | "des" => "December",
        _ => return None,
    };
    Some(month)
}

/// Converts a spreadsheet serial day (1899-12-30 epoch) into a date.
pub(crate) fn from_serial_day(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=MAX_SERIAL_DAY).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(Days::new(serial.floor() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, TimeDelta};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_first_slash_and_dash() {
        assert_eq!(parse_date_str("01/03/2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("01-03-2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("1/3/2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("31/12/2023"), Some(date(2023, 12, 31)));
    }

    #[test]
    fn test_time_component_discarded() {
        assert_eq!(parse_date_str("01/03/2024 08:15:00"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("2024-03-01 08:15:00"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("2024-03-01T08:15:00"), Some(date(2024, 3, 1)));
        assert_eq!(
            parse_date_str("2024-03-01T08:15:00+07:00"),
            Some(date(2024, 3, 1))
        );
    }

    #[test]
    fn test_time_component_discarded_for_general_formats() {
        assert_eq!(parse_date_str("01/03/24 08:00"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("01.03.2024 17:30:00"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("2024/03/01 08:00"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("01/03/24 whenever"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_month_first_only_when_day_first_impossible() {
        assert_eq!(parse_date_str("03/25/2024"), Some(date(2024, 3, 25)));
        assert_eq!(parse_date_str("05/04/2024"), Some(date(2024, 4, 5)));
    }

    #[test]
    fn test_invalid_calendar_date_rejected() {
        assert_eq!(parse_date_str("31/02/2024"), None);
        assert_eq!(parse_date_str("45/45/2024"), None);
    }

    #[test]
    fn test_general_formats() {
        assert_eq!(parse_date_str("2024/03/01"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("01.03.2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("01/03/24"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("01-Mar-2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("1 March 2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("March 1, 2024"), Some(date(2024, 3, 1)));
    }

    #[test]
    fn test_indonesian_month_names() {
        assert_eq!(parse_date_str("1 Maret 2024"), Some(date(2024, 3, 1)));
        assert_eq!(parse_date_str("17 Agustus 2024"), Some(date(2024, 8, 17)));
        assert_eq!(parse_date_str("05 Mei 2024"), Some(date(2024, 5, 5)));
        assert_eq!(parse_date_str("25 Desember 2023"), Some(date(2023, 12, 25)));
    }

    #[test]
    fn test_garbage_is_none() {
        assert_eq!(parse_date_str(""), None);
        assert_eq!(parse_date_str("   "), None);
        assert_eq!(parse_date_str("tomorrow"), None);
        assert_eq!(parse_date_str("2024"), None);
    }

    #[test]
    fn test_typed_cells() {
        let d = date(2024, 3, 1);
        assert_eq!(parse_date(&CellValue::Date(d)), Some(d));
        assert_eq!(
            parse_date(&CellValue::DateTime(d.and_hms_opt(23, 59, 0).unwrap())),
            Some(d)
        );
        assert_eq!(
            parse_date(&CellValue::TimeOfDay(NaiveTime::from_hms_opt(8, 0, 0).unwrap())),
            None
        );
        assert_eq!(parse_date(&CellValue::DurationSpan(TimeDelta::hours(2))), None);
        assert_eq!(parse_date(&CellValue::Empty), None);
    }

    #[test]
    fn test_serial_day_numbers() {
        // 45352 is 2024-03-01 in spreadsheet serial days.
        assert_eq!(parse_date(&CellValue::Number(45352.0)), Some(date(2024, 3, 1)));
        assert_eq!(parse_date(&CellValue::Number(45352.75)), Some(date(2024, 3, 1)));
        assert_eq!(parse_date(&CellValue::Number(0.0)), None);
        assert_eq!(parse_date(&CellValue::Number(-3.0)), None);
        assert_eq!(parse_date(&CellValue::Number(20240301.0)), None);
        assert_eq!(parse_date(&CellValue::Number(f64::NAN)), None);
    }
}
