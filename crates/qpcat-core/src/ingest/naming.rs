//! Title and filename derivation for archive entries.

/// Extension given to every stored question paper.
pub const STORED_EXTENSION: &str = "pdf";

/// Last path component of an archive entry name.
///
/// Both `/` and `\` count as separators, since archives built on Windows
/// sometimes carry backslash paths.
pub fn entry_base_name(entry_name: &str) -> &str {
    entry_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or(entry_name)
}

/// Title of the paper stored from `entry_name`.
///
/// Directory prefixes are dropped and the final extension removed:
/// `folder/Midterm 2023.pdf` becomes `Midterm 2023`. Leading dots do not
/// start an extension, so `.pdf` stays `.pdf`.
pub fn derive_title(entry_name: &str) -> String {
    strip_extension(entry_base_name(entry_name)).to_string()
}

/// `{title}.pdf`, regardless of the entry's original suffix casing.
pub fn canonical_filename(title: &str) -> String {
    format!("{title}.{STORED_EXTENSION}")
}

fn strip_extension(base: &str) -> &str {
    match base.rfind('.') {
        Some(idx) if base[..idx].chars().any(|c| c != '.') => &base[..idx],
        _ => base,
    }
}
