//! Tree command handler.
//!
//! Prints every department with its schemes, semesters and subjects.
//! Ids are shown so they can be passed to `add` and `ingest`.

use qpcat_core::services::DepartmentBranch;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::papers;

/// Render the catalog as indented lines.
pub fn render_tree(branches: &[DepartmentBranch]) -> Vec<String> {
    let mut lines = Vec::new();
    for branch in branches {
        let dept = &branch.department;
        lines.push(format!("#{} {} [{}]", dept.id, dept.name, dept.slug));
        for scheme in &branch.schemes {
            lines.push(format!(
                "  #{} {} [{}]",
                scheme.scheme.id,
                scheme.scheme.label(),
                scheme.scheme.slug
            ));
            for semester in &scheme.semesters {
                lines.push(format!(
                    "    #{} {} [{}]",
                    semester.semester.id,
                    semester.semester.label(),
                    semester.semester.slug
                ));
                for summary in &semester.subjects {
                    lines.push(format!(
                        "      #{} {} [{}] - {}",
                        summary.subject.id,
                        summary.subject.label(),
                        summary.subject.slug,
                        papers(summary.paper_count)
                    ));
                }
            }
        }
    }
    lines
}

pub async fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let branches = ctx.app().catalog().tree().await?;
    if branches.is_empty() {
        println!("The catalog is empty.");
        println!("Use 'qpcat department add <name>' to create the first department.");
        return Ok(());
    }
    for line in render_tree(&branches) {
        println!("{line}");
    }
    Ok(())
}
