//! Path resolution for qpcat data locations.
//!
//! - Database location
//! - Local media root for stored question papers
//!
//! Returns `PathBuf` and `PathError`; no interactive I/O.

mod ensure;
mod error;
mod resolver;

pub use ensure::{ensure_directory, ensure_parent};
pub use error::PathError;
pub use resolver::{DATA_DIR_ENV, DATABASE_PATH_ENV, MEDIA_ROOT_ENV, ResolvedPaths};
