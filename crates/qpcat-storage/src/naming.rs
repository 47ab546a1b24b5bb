//! Collision handling shared by every backend.
//!
//! A taken key is never overwritten. The backend retries under
//! `{stem}_{suffix}{ext}` until a free name is found.

/// Attempts (including the original name) before a write gives up.
pub const MAX_NAME_ATTEMPTS: usize = 16;

const SUFFIX_LEN: usize = 7;

/// `report.pdf` → `report_1a2b3c4.pdf`.
pub fn alternative_name(filename: &str) -> String {
    let suffix: String = uuid::Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect();
    let (stem, ext) = split_extension(filename);
    format!("{stem}_{suffix}{ext}")
}

/// Split off the last extension, dot included. Leading-dot names have no extension.
fn split_extension(filename: &str) -> (&str, &str) {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => filename.split_at(idx),
        _ => (filename, ""),
    }
}

/// Filenames to try in order: the requested one, then random alternatives.
pub fn candidates(filename: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(filename.to_string())
        .chain(std::iter::repeat_with(move || alternative_name(filename)))
        .take(MAX_NAME_ATTEMPTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternative_name_keeps_extension() {
        let name = alternative_name("Midterm 2023.pdf");
        assert!(name.starts_with("Midterm 2023_"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), "Midterm 2023.pdf".len() + 1 + SUFFIX_LEN);
        let suffix = &name["Midterm 2023_".len().."Midterm 2023_".len() + SUFFIX_LEN];
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_alternative_name_without_extension() {
        assert_eq!(alternative_name(".pdf").len(), ".pdf".len() + 1 + SUFFIX_LEN);
        assert!(alternative_name("README").starts_with("README_"));
    }

    #[test]
    fn test_candidates_start_with_requested_name() {
        let all: Vec<String> = candidates("a.pdf").collect();
        assert_eq!(all.len(), MAX_NAME_ATTEMPTS);
        assert_eq!(all[0], "a.pdf");
        assert!(all[1..].iter().all(|n| n.starts_with("a_") && n != "a.pdf"));
    }
}
