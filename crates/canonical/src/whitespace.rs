//! Whitespace normalization.
//!
//! Every Unicode whitespace run becomes a single ASCII space and the result
//! carries no leading or trailing whitespace.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  Walking \t for\nHealth "), "Walking for Health");
//! ```

/// Collapses repeated whitespace and trims both edges.
///
/// Returns an empty string for empty or whitespace-only input.
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
