//! Shared CLI presentation utilities.
//!
//! Format-only helpers; nothing here touches the catalog.

use qpcat_core::NoticeLevel;

/// Truncates a string to a maximum number of characters, adding "..." if needed.
///
/// ```rust
/// use qpcat_cli::presentation::truncate_string;
///
/// assert_eq!(truncate_string("Hello", 10), "Hello");
/// assert_eq!(truncate_string("Hello World", 8), "Hello...");
/// ```
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Print a horizontal separator line.
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Prefix shown in front of an upload notice.
pub const fn notice_prefix(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Success => "[ok]",
        NoticeLevel::Error => "[error]",
    }
}

/// `1 paper` / `3 papers`.
pub fn papers(count: i64) -> String {
    if count == 1 {
        "1 paper".to_string()
    } else {
        format!("{count} papers")
    }
}
