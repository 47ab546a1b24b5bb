//! Main commands enum and catalog administration subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use qpcat_core::Month;

/// Available commands for the question paper catalog.
#[derive(Subcommand)]
pub enum Commands {
    /// Show resolved paths for the database and media root
    Paths,

    /// Manage departments
    Department {
        #[command(subcommand)]
        command: DepartmentCommand,
    },

    /// Manage schemes (syllabus years) of a department
    Scheme {
        #[command(subcommand)]
        command: SchemeCommand,
    },

    /// Manage semesters of a scheme
    Semester {
        #[command(subcommand)]
        command: SemesterCommand,
    },

    /// Manage subjects of a semester
    Subject {
        #[command(subcommand)]
        command: SubjectCommand,
    },

    /// Print the whole catalog with ids and paper counts
    Tree,

    /// Search papers, subjects and departments
    Search {
        /// Text to look for (case-insensitive)
        query: String,
    },

    /// Ingest every PDF in a ZIP archive into one subject
    Ingest(IngestArgs),

    /// Start the JSON HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "QPCAT_PORT", default_value_t = qpcat_axum::DEFAULT_PORT)]
        port: u16,
    },
}

/// Department command variants.
#[derive(Subcommand)]
pub enum DepartmentCommand {
    /// Create a department
    Add {
        /// Department name (must be unique)
        name: String,
        /// URL slug (derived from the name when omitted)
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
}

/// Scheme command variants.
#[derive(Subcommand)]
pub enum SchemeCommand {
    /// Create a scheme under a department
    Add {
        /// Parent department id
        #[arg(long)]
        department: i64,
        /// Scheme year, e.g. 2021
        year: i32,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
}

/// Semester command variants.
#[derive(Subcommand)]
pub enum SemesterCommand {
    /// Create a semester under a scheme
    Add {
        /// Parent scheme id
        #[arg(long)]
        scheme: i64,
        /// Semester number (1-8)
        number: u8,
        #[arg(long)]
        slug: Option<String>,
    },
}

/// Subject command variants.
#[derive(Subcommand)]
pub enum SubjectCommand {
    /// Create a subject under a semester
    Add {
        /// Parent semester id
        #[arg(long)]
        semester: i64,
        /// Subject name
        name: String,
        /// Subject code, e.g. CS301
        #[arg(long, default_value = "")]
        code: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long, default_value = "")]
        description: String,
    },
}

/// Arguments of `qpcat ingest`.
#[derive(Args, Debug)]
pub struct IngestArgs {
    /// Destination subject id
    #[arg(long)]
    pub subject: i64,
    /// Exam year recorded on every paper
    #[arg(long)]
    pub year: i32,
    /// Exam month code (jan..dec)
    #[arg(long)]
    pub month: Month,
    /// ZIP archive containing the PDFs
    pub archive: PathBuf,
}
