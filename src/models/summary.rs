//! Per-employee summary models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::engine::{hours_to_hhmm, round_hours};

/// One employee's totals over the reconciled period.
///
/// Hours are kept at full precision; rounding happens only in
/// [`SummaryRow::display`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    /// Sequence number, starting at 1, in output order.
    pub no: usize,
    /// The normalized join key the group was built on.
    pub employee: String,
    /// Display form of the employee's name.
    pub employee_name: String,
    /// First non-empty job position seen for the employee.
    pub job_position: Option<String>,
    /// Number of rows classified as worked days ("D/Work").
    pub work_days: u32,
    /// Sum of normal working time ("WT/Normal").
    pub working_time_normal_hours: f64,
    /// Sum of merged overtime ("RKP PIC").
    pub overtime_hours: f64,
}

impl SummaryRow {
    /// Returns the presentation form of this row.
    pub fn display(&self) -> SummaryDisplayRow {
        SummaryDisplayRow {
            no: self.no,
            employee_name: self.employee_name.clone(),
            job_position: self.job_position.clone(),
            d_work: self.work_days,
            wt_normal: hours_to_hhmm(self.working_time_normal_hours),
            rkp_pic: hours_to_hhmm(self.overtime_hours),
            wt_normal_hours: round_hours(self.working_time_normal_hours),
            rkp_pic_hours: round_hours(self.overtime_hours),
        }
    }
}

/// Presentation form of a [`SummaryRow`], in export column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryDisplayRow {
    /// Sequence number.
    pub no: usize,
    /// Display name.
    pub employee_name: String,
    /// Job position.
    pub job_position: Option<String>,
    /// Worked days.
    pub d_work: u32,
    /// Normal working time as `HH:MM`.
    pub wt_normal: String,
    /// Overtime as `HH:MM`.
    pub rkp_pic: String,
    /// Normal working time rounded to two decimals.
    pub wt_normal_hours: Decimal,
    /// Overtime rounded to two decimals.
    pub rkp_pic_hours: Decimal,
}

/// Headline figures across every summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryTotals {
    /// Number of distinct employees.
    pub employees: usize,
    /// Total worked days.
    pub work_days: u64,
    /// Total normal working time, rounded to two decimals.
    pub working_time_normal_hours: Decimal,
    /// Total overtime, rounded to two decimals.
    pub overtime_hours: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_rounds_once() {
        let row = SummaryRow {
            no: 1,
            employee: "budi".to_string(),
            employee_name: "Budi".to_string(),
            job_position: Some("Driver".to_string()),
            work_days: 5,
            working_time_normal_hours: 40.0,
            overtime_hours: 3.5,
        };

        let display = row.display();
        assert_eq!(display.no, 1);
        assert_eq!(display.d_work, 5);
        assert_eq!(display.wt_normal, "40:00");
        assert_eq!(display.rkp_pic, "03:30");
        assert_eq!(display.rkp_pic_hours, Decimal::new(350, 2));
    }

    #[test]
    fn test_totals_serialize_decimals_as_strings() {
        let totals = SummaryTotals {
            employees: 2,
            work_days: 9,
            working_time_normal_hours: Decimal::new(7200, 2),
            overtime_hours: Decimal::new(450, 2),
        };

        let json = serde_json::to_string(&totals).unwrap();
        assert!(json.contains("\"overtime_hours\":\"4.50\""));
    }
}
