//! Value collapsing policy shared by every extracted field.
//!
//! Selectors routinely match several nodes. A scalar field keeps exactly one
//! of them: the first value that still has text once surrounding whitespace
//! is trimmed. Sequence fields keep every such value, in document order.

/// Trims a raw text value, returning None when nothing is left
pub fn clean_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Collapses candidate values to the first non-empty one
///
/// # Examples
///
/// ```
/// use afdb_crawler::extract::first_value;
///
/// assert_eq!(first_value(["\n  ", " Acme ", "Other"]), Some("Acme".to_string()));
/// assert_eq!(first_value(Vec::<String>::new()), None);
/// ```
pub fn first_value<I, S>(values: I) -> Option<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values.into_iter().find_map(|v| clean_text(v.as_ref()))
}

/// Keeps every non-empty value, in order
pub fn all_values<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    values
        .into_iter()
        .filter_map(|v| clean_text(v.as_ref()))
        .collect()
}
