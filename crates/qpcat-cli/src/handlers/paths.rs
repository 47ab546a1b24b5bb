//! Paths command handler.

use qpcat_core::ResolvedPaths;

use crate::error::CliError;

/// Print the resolved data root, database file and media root.
pub fn execute() -> Result<(), CliError> {
    let paths = ResolvedPaths::resolve()?;
    println!("{paths}");
    Ok(())
}
