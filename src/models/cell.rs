//! Raw cell values.
//!
//! Spreadsheet readers hand over cells whose runtime type varies from row to
//! row: numbers, clock times, elapsed spans, dates or free text. [`CellValue`]
//! captures that as a closed sum type so every consumer can match on it
//! exhaustively.

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize, Serializer};

/// A single raw cell as supplied by the table reader.
///
/// JSON input maps `null` to [`CellValue::Empty`], numbers to
/// [`CellValue::Number`], strings to [`CellValue::Text`] and booleans to their
/// text form. The temporal variants are produced by spreadsheet readers that
/// already know a cell's type.
///
/// # Example
///
/// ```
/// use roster_recon::models::CellValue;
///
/// let cell: CellValue = serde_json::from_str("\"02:30\"").unwrap();
/// assert_eq!(cell, CellValue::Text("02:30".to_string()));
///
/// let cell: CellValue = serde_json::from_str("null").unwrap();
/// assert!(cell.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "WireCell")]
pub enum CellValue {
    /// A numeric cell.
    Number(f64),
    /// A clock time without a date.
    TimeOfDay(NaiveTime),
    /// An elapsed span of time.
    DurationSpan(TimeDelta),
    /// A date with a time component.
    DateTime(NaiveDateTime),
    /// A date without a time component.
    Date(NaiveDate),
    /// Free text.
    Text(String),
    /// A blank cell.
    Empty,
}

impl CellValue {
    /// Returns true for blank cells and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Returns the cell rendered as trimmed text, or `None` when blank.
    ///
    /// Whole numbers render without a fractional part so that numeric
    /// employee codes and shift codes read the way they were typed.
    pub fn as_text(&self) -> Option<Cow<'_, str>> {
        match self {
            CellValue::Empty => None,
            CellValue::Text(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then_some(Cow::Borrowed(trimmed))
            }
            CellValue::Number(n) => Some(Cow::Owned(format_number(*n))),
            CellValue::TimeOfDay(t) => Some(Cow::Owned(t.format("%H:%M:%S").to_string())),
            CellValue::DurationSpan(d) => Some(Cow::Owned(format_span(*d))),
            CellValue::DateTime(dt) => Some(Cow::Owned(dt.format("%Y-%m-%dT%H:%M:%S").to_string())),
            CellValue::Date(d) => Some(Cow::Owned(d.format("%Y-%m-%d").to_string())),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn format_span(span: TimeDelta) -> String {
    let total = span.num_seconds();
    let sign = if total < 0 { "-" } else { "" };
    let secs = total.abs();
    format!("{}{}:{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60, secs % 60)
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Empty => serializer.serialize_none(),
            CellValue::Number(n) => serializer.serialize_f64(*n),
            CellValue::Text(s) => serializer.serialize_str(s),
            other => match other.as_text() {
                Some(text) => serializer.serialize_str(&text),
                None => serializer.serialize_none(),
            },
        }
    }
}

/// The shapes a cell can take on the JSON wire.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireCell {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl From<WireCell> for CellValue {
    fn from(wire: WireCell) -> Self {
        match wire {
            WireCell::Null => CellValue::Empty,
            WireCell::Bool(b) => CellValue::Text(b.to_string()),
            WireCell::Number(n) => CellValue::Number(n),
            WireCell::Text(s) => CellValue::Text(s),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<NaiveDate> for CellValue {
    fn from(d: NaiveDate) -> Self {
        CellValue::Date(d)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(dt: NaiveDateTime) -> Self {
        CellValue::DateTime(dt)
    }
}

impl From<NaiveTime> for CellValue {
    fn from(t: NaiveTime) -> Self {
        CellValue::TimeOfDay(t)
    }
}

impl From<TimeDelta> for CellValue {
    fn from(d: TimeDelta) -> Self {
        CellValue::DurationSpan(d)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}
