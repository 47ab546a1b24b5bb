//! URL slug generation for catalog nodes.

/// Convert a human label into a URL-safe slug.
///
/// Non-ASCII characters are dropped, the result is lowercased, anything
/// other than alphanumerics, `_`, `-` and whitespace is removed, and runs of
/// whitespace or hyphens collapse into a single `-`. Leading and trailing
/// `-`/`_` are trimmed.
pub fn slugify(value: &str) -> String {
    let mut slug = String::with_capacity(value.len());
    let mut pending_dash = false;

    for ch in value.chars().filter(char::is_ascii) {
        let ch = ch.to_ascii_lowercase();
        if ch.is_ascii_alphanumeric() || ch == '_' {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else if ch == '-' || ch.is_ascii_whitespace() {
            pending_dash = true;
        }
    }

    slug.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Whether `value` is usable as a slug as given: non-empty, only ASCII
/// letters, digits, `_` and `-`.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}
