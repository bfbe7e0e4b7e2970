use crate::whitespace::collapse_whitespace;

/// Rewrite a person facet from `"Last, First Middle"` into display order
/// `"First Middle Last"`.
///
/// - Input without a comma is assumed to already be in display order and is
///   only whitespace-collapsed.
/// - Only the first comma splits, so suffixes attached to the surname survive:
///   `"King Jr., Martin Luther"` becomes `"Martin Luther King Jr."`.
/// - Empty or whitespace-only input returns an empty string.
///
/// ```rust
/// use canonical::normalize_person_name;
///
/// assert_eq!(normalize_person_name("Biden, Joseph R Jr"), "Joseph R Jr Biden");
/// assert_eq!(normalize_person_name("Taylor Swift"), "Taylor Swift");
/// ```
pub fn normalize_person_name(name: &str) -> String {
    let name = name.trim();

    let Some((last, rest)) = name.split_once(',') else {
        return collapse_whitespace(name);
    };

    let display = format!("{} {}", rest.trim(), last.trim());
    collapse_whitespace(&display)
}
