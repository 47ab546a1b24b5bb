//! `qpcat` command-line interface.
//!
//! Catalog administration, archive ingestion and the HTTP server behind one
//! binary. `main.rs` parses arguments and dispatches to [`handlers`].

#![deny(unsafe_code)]

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod handlers;
pub mod parser;
pub mod presentation;

// Re-export primary types for convenient access
pub use bootstrap::{CliContext, bootstrap};
pub use commands::{
    Commands, DepartmentCommand, IngestArgs, SchemeCommand, SemesterCommand, SubjectCommand,
};
pub use error::CliError;
pub use parser::Cli;
