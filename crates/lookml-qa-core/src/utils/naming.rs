//! Identifier conventions.

use std::fmt::Write;

/// Returns true if `name` is lower `snake_case`: starts with a lowercase
/// ASCII letter, then lowercase letters, digits and single underscores.
///
/// A leading `+` (refinement) is ignored.
#[must_use]
pub fn is_snake_case(name: &str) -> bool {
    let name = name.strip_prefix('+').unwrap_or(name);
    let mut chars = name.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
        return false;
    }
    !name.ends_with('_')
        && !name.contains("__")
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Formats up to `limit` names as a comma-separated list, with a count of
/// the remainder.
#[must_use]
pub fn summarize_names<S: AsRef<str>>(names: &[S], limit: usize) -> String {
    let shown: Vec<String> = names
        .iter()
        .take(limit)
        .map(|n| format!("`{}`", n.as_ref()))
        .collect();
    let mut out = shown.join(", ");
    if names.len() > limit {
        let _ = write!(out, " and {} more", names.len() - limit);
    }
    out
}
