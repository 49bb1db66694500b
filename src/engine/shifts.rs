//! Work-day classification of shift labels.

use crate::config::{ShiftPolicy, ShiftVocabulary};

/// Decides whether a shift label counts as a worked day.
///
/// `None` means the label is absent from a table that has a shift column;
/// it never counts. Tables without a shift column are handled by the
/// normalizer, which marks every row as worked.
///
/// # Example
///
/// ```
/// use roster_recon::config::{ShiftPolicy, ShiftVocabulary};
/// use roster_recon::engine::is_work_day;
///
/// let vocabulary = ShiftVocabulary::default();
/// assert!(is_work_day(Some("Pagi"), ShiftPolicy::Keyword, &vocabulary));
/// assert!(!is_work_day(Some("Hari Libur"), ShiftPolicy::Keyword, &vocabulary));
/// assert!(!is_work_day(Some("A1"), ShiftPolicy::Keyword, &vocabulary));
/// assert!(is_work_day(Some("A1"), ShiftPolicy::NonExcluded, &vocabulary));
/// ```
pub fn is_work_day(shift: Option<&str>, policy: ShiftPolicy, vocabulary: &ShiftVocabulary) -> bool {
    let label = match shift.map(|s| s.trim().to_lowercase()) {
        Some(label) if !label.is_empty() => label,
        _ => return false,
    };

    match policy {
        ShiftPolicy::Keyword => {
            let has_keyword = vocabulary
                .work_keywords
                .iter()
                .map(|k| k.trim().to_lowercase())
                .any(|k| !k.is_empty() && label.contains(k.as_str()));
            let has_exclusion = vocabulary
                .non_work_tokens
                .iter()
                .map(|t| t.trim().to_lowercase())
                .any(|t| !t.is_empty() && label.contains(t.as_str()));
            has_keyword && !has_exclusion
        }
        ShiftPolicy::NonExcluded => !vocabulary
            .non_work_tokens
            .iter()
            .any(|t| t.trim().eq_ignore_ascii_case(&label)),
    }
}

/// Counts the labels that classify as worked days.
pub fn count_work_days<'a, I>(shifts: I, policy: ShiftPolicy, vocabulary: &ShiftVocabulary) -> u32
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    shifts
        .into_iter()
        .filter(|shift| is_work_day(*shift, policy, vocabulary))
        .count() as u32
}
