//! Search command handler.

use qpcat_core::services::SearchResults;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::{print_separator, truncate_string};

const TITLE_WIDTH: usize = 60;

/// Render matches grouped by kind; empty groups are left out.
pub fn render_results(results: &SearchResults) -> Vec<String> {
    let mut lines = Vec::new();
    if !results.papers.is_empty() {
        lines.push(format!("Papers ({})", results.papers.len()));
        for hit in &results.papers {
            lines.push(format!(
                "  #{:<5} {}",
                hit.paper.id,
                truncate_string(&hit.paper.display_with(&hit.subject_name), TITLE_WIDTH)
            ));
        }
    }
    if !results.subjects.is_empty() {
        lines.push(format!("Subjects ({})", results.subjects.len()));
        for subject in &results.subjects {
            lines.push(format!("  #{:<5} {}", subject.id, subject.label()));
        }
    }
    if !results.departments.is_empty() {
        lines.push(format!("Departments ({})", results.departments.len()));
        for dept in &results.departments {
            lines.push(format!("  #{:<5} {}", dept.id, dept.name));
        }
    }
    lines
}

pub async fn execute(ctx: &CliContext, query: &str) -> Result<(), CliError> {
    let results = ctx.app().catalog().search(query).await?;
    if results.is_empty() {
        println!("No results for '{query}'.");
        return Ok(());
    }
    println!("Results for '{query}':");
    print_separator(TITLE_WIDTH + 9);
    for line in render_results(&results) {
        println!("{line}");
    }
    Ok(())
}
