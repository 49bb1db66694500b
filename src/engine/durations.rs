//! Duration and clock-time conversion.
//!
//! Duration cells arrive as plain numbers, clock times, elapsed spans or
//! text in several shapes. Everything is converted to decimal hours.
//! Unparseable values become `0.0` instead of failing the batch; the
//! [`try_convert_to_hours`] form lets callers count how often that happens.

use std::sync::LazyLock;

use chrono::{NaiveTime, TimeDelta, Timelike};
use regex::Regex;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::CellValue;

static CLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+):(\d{1,2})(?::(\d{1,2}(?:\.\d+)?))?$").expect("valid clock pattern")
});

static DAY_SPAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(-?\d+(?:\.\d+)?)\s*(?:days?|hari)\s*,?\s*(?:(\d+):(\d{1,2})(?::(\d{1,2}(?:\.\d+)?))?)?$",
    )
    .expect("valid day span pattern")
});

// Absorbs float error so that e.g. 1.15 h renders as 01:09, not 01:08.
const MINUTE_EPSILON: f64 = 1e-9;

/// Converts a cell to decimal hours, or `None` when the value is malformed.
///
/// Blank cells are `Some(0.0)`: they are missing, not malformed.
///
/// # Example
///
/// ```
/// use roster_recon::engine::try_convert_to_hours;
/// use roster_recon::models::CellValue;
///
/// assert_eq!(try_convert_to_hours(&CellValue::from("02:30")), Some(2.5));
/// assert_eq!(try_convert_to_hours(&CellValue::Empty), Some(0.0));
/// assert_eq!(try_convert_to_hours(&CellValue::from("lots")), None);
/// ```
pub fn try_convert_to_hours(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Empty => Some(0.0),
        CellValue::Number(n) => n.is_finite().then_some(*n),
        CellValue::DurationSpan(span) => Some(span_hours(*span)),
        CellValue::TimeOfDay(time) => Some(time_of_day_hours(*time)),
        CellValue::DateTime(dt) => Some(time_of_day_hours(dt.time())),
        CellValue::Date(_) => None,
        CellValue::Text(text) => text_hours(text),
    }
}

/// Converts a cell to decimal hours. Never fails: malformed values are `0.0`.
///
/// # Example
///
/// ```
/// use roster_recon::engine::convert_to_hours;
/// use roster_recon::models::CellValue;
///
/// assert_eq!(convert_to_hours(&CellValue::Number(1.25)), 1.25);
/// assert_eq!(convert_to_hours(&CellValue::from("1:30:00")), 1.5);
/// assert_eq!(convert_to_hours(&CellValue::from("1 days 02:00:00")), 26.0);
/// assert_eq!(convert_to_hours(&CellValue::from("n/a")), 0.0);
/// ```
pub fn convert_to_hours(value: &CellValue) -> f64 {
    try_convert_to_hours(value).unwrap_or(0.0)
}

fn span_hours(span: TimeDelta) -> f64 {
    span.num_milliseconds() as f64 / 3_600_000.0
}

fn time_of_day_hours(time: NaiveTime) -> f64 {
    f64::from(time.hour()) + f64::from(time.minute()) / 60.0 + f64::from(time.second()) / 3600.0
}

fn text_hours(raw: &str) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        return Some(0.0);
    }

    if let Some(caps) = CLOCK.captures(text) {
        return clock_hours(&caps[1], &caps[2], caps.get(3).map(|m| m.as_str()));
    }

    let lowered = text.to_lowercase();
    if lowered.contains("day") || lowered.contains("hari") {
        let caps = DAY_SPAN.captures(text)?;
        let days: f64 = caps[1].parse().ok()?;
        let clock = match caps.get(2) {
            Some(hours) => clock_hours(
                hours.as_str(),
                caps.get(3).map_or("0", |m| m.as_str()),
                caps.get(4).map(|m| m.as_str()),
            )?,
            None => 0.0,
        };
        let total = days * 24.0 + if days < 0.0 { -clock } else { clock };
        return total.is_finite().then_some(total);
    }

    parse_float(text)
}

fn clock_hours(hours: &str, minutes: &str, seconds: Option<&str>) -> Option<f64> {
    let hours: f64 = hours.parse().ok()?;
    let minutes: f64 = minutes.parse().ok()?;
    let seconds: f64 = match seconds {
        Some(s) => s.parse().ok()?,
        None => 0.0,
    };
    if minutes >= 60.0 || seconds >= 60.0 {
        return None;
    }
    let total = hours + minutes / 60.0 + seconds / 3600.0;
    total.is_finite().then_some(total)
}

fn parse_float(text: &str) -> Option<f64> {
    let candidate = if !text.contains('.') && text.matches(',').count() == 1 {
        text.replace(',', ".")
    } else {
        text.to_string()
    };
    candidate
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Renders decimal hours as a zero-padded `HH:MM` clock string.
///
/// Truncates to whole minutes (`floor(hours * 60)`). Zero and non-finite
/// input render as `"00:00"`; negative input keeps a leading `-`; totals
/// of 100 hours or more widen the hour field.
///
/// # Example
///
/// ```
/// use roster_recon::engine::hours_to_hhmm;
///
/// assert_eq!(hours_to_hhmm(0.0), "00:00");
/// assert_eq!(hours_to_hhmm(1.5), "01:30");
/// assert_eq!(hours_to_hhmm(2.999), "02:59");
/// ```
pub fn hours_to_hhmm(hours: f64) -> String {
    if !hours.is_finite() {
        return "00:00".to_string();
    }
    let minutes = (hours.abs() * 60.0 + MINUTE_EPSILON).floor() as u64;
    let sign = if hours < 0.0 && minutes > 0 { "-" } else { "" };
    format!("{}{:02}:{:02}", sign, minutes / 60, minutes % 60)
}

/// Rounds hours to two decimal places for display.
///
/// Midpoints round away from zero. Non-finite input yields zero.
pub fn round_hours(hours: f64) -> Decimal {
    let mut rounded = Decimal::from_f64(hours)
        .unwrap_or(Decimal::ZERO)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}
