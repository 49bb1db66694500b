//! Employee name normalization.
//!
//! Two forms are derived from every raw name: a join key, compared across
//! tables, and a display form shown to people.

/// Returns the join key for an employee name.
///
/// Lower-cases, drops every character outside `[a-z0-9]` and whitespace,
/// collapses whitespace runs to a single space and trims.
///
/// # Example
///
/// ```
/// use roster_recon::engine::normalize_name;
///
/// assert_eq!(normalize_name("  John  Doe "), "john doe");
/// assert_eq!(normalize_name("O'Brien, Pat."), "obrien pat");
/// assert_eq!(normalize_name("JOHN DOE"), normalize_name("john doe"));
/// ```
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Returns the display form of an employee name.
///
/// Trims, collapses whitespace and title-cases every word.
///
/// # Example
///
/// ```
/// use roster_recon::engine::display_name;
///
/// assert_eq!(display_name("  jOHN   doe "), "John Doe");
/// ```
pub fn display_name(raw: &str) -> String {
    raw.split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn title_case_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_and_whitespace_insensitive() {
        assert_eq!(normalize_name("John Doe"), "john doe");
        assert_eq!(normalize_name("  JOHN DOE  "), "john doe");
        assert_eq!(normalize_name("john\tdoe"), "john doe");
    }

    #[test]
    fn test_punctuation_stripped() {
        assert_eq!(normalize_name("Doe, John."), "doe john");
        assert_eq!(normalize_name("Siti-Aminah"), "sitiaminah");
        assert_eq!(normalize_name("A. B. - C"), "a b c");
    }

    #[test]
    fn test_digits_kept() {
        assert_eq!(normalize_name("Operator 07"), "operator 07");
    }

    #[test]
    fn test_non_ascii_letters_removed() {
        assert_eq!(normalize_name("José"), "jos");
    }

    #[test]
    fn test_only_punctuation_yields_empty_key() {
        assert_eq!(normalize_name("--- / ---"), "");
    }

    #[test]
    fn test_display_name_title_cases() {
        assert_eq!(display_name("budi santoso"), "Budi Santoso");
        assert_eq!(display_name("SITI"), "Siti");
        assert_eq!(display_name(""), "");
    }
}
