//! Color literal handling for dashboard style checks.

/// Returns true for `#rgb`, `#rrggbb`, `#rrggbbaa` and `rgb(...)`/`rgba(...)`
/// literals.
#[must_use]
pub fn is_color_literal(value: &str) -> bool {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit());
    }
    let lower = value.to_ascii_lowercase();
    (lower.starts_with("rgb(") || lower.starts_with("rgba(")) && lower.ends_with(')')
}

/// Normalizes a color literal for comparison: lowercase, `#rgb` expanded to
/// `#rrggbb`, and whitespace removed from functional notation.
#[must_use]
pub fn normalize_color(value: &str) -> String {
    let lower: String = value
        .trim()
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    match lower.strip_prefix('#') {
        Some(hex) if hex.len() == 3 => {
            let mut expanded = String::from("#");
            for c in hex.chars() {
                expanded.push(c);
                expanded.push(c);
            }
            expanded
        }
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literals() {
        assert!(is_color_literal("#1A73E8"));
        assert!(is_color_literal("#fff"));
        assert!(is_color_literal("rgb(0, 0, 0)"));
        assert!(!is_color_literal("#12345"));
        assert!(!is_color_literal("palette-1"));
    }

    #[test]
    fn normalization() {
        assert_eq!(normalize_color("#ABC"), "#aabbcc");
        assert_eq!(normalize_color(" #1A73E8 "), "#1a73e8");
        assert_eq!(normalize_color("RGB(1, 2, 3)"), "rgb(1,2,3)");
    }
}
