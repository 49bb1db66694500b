//! Built-in header aliases.
//!
//! The table is compiled into the binary and never mutated. Every alias is
//! already in normalized form (lower-case ASCII letters and digits only).

use crate::models::CanonicalField;

const EMPLOYEE_NAME: &[&str] = &[
    "employeename",
    "employee",
    "empname",
    "name",
    "nama",
    "namakaryawan",
    "staffname",
];

const DATE: &[&str] = &["date", "tanggal", "workdate", "dates", "periode", "day", "tgl"];

const SHIFT: &[&str] = &["shift", "shif", "jadwal", "shiftkerja", "jadwalshift", "schedule"];

const JOB_POSITION: &[&str] = &["jobposition", "position", "job", "jabatan", "posisi", "jobtitle"];

const DURATION: &[&str] = &[
    "duration",
    "durasi",
    "lama",
    "totalhours",
    "hours",
    "jam",
    "overtimehours",
    "lamawaktu",
];

const WORKING_TIME_NORMAL: &[&str] = &[
    "wtnormal",
    "wt",
    "normal",
    "workingtime",
    "worktime",
    "waktukerja",
    "regularhours",
    "normalhours",
];

const WORK_AREA: &[&str] = &["workarea", "area", "lokasi", "location", "department", "bagian"];

/// Returns the built-in aliases for `field`.
///
/// # Example
///
/// ```
/// use roster_recon::config::builtin_aliases;
/// use roster_recon::models::CanonicalField;
///
/// assert!(builtin_aliases(CanonicalField::Date).contains(&"tanggal"));
/// ```
pub fn builtin_aliases(field: CanonicalField) -> &'static [&'static str] {
    match field {
        CanonicalField::EmployeeName => EMPLOYEE_NAME,
        CanonicalField::Date => DATE,
        CanonicalField::Shift => SHIFT,
        CanonicalField::JobPosition => JOB_POSITION,
        CanonicalField::Duration => DURATION,
        CanonicalField::WorkingTimeNormal => WORKING_TIME_NORMAL,
        CanonicalField::WorkArea => WORK_AREA,
    }
}
