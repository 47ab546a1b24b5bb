//! CLI entry point - the composition root.
//!
//! Commands that touch the catalog share one `CliContext` built by
//! [`bootstrap`]; `paths` and `serve` do their own setup.

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use qpcat_cli::{Cli, CliError, Commands, bootstrap, handlers};

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Paths => handlers::paths::execute(),
        Commands::Serve { port } => handlers::serve::execute(port).await,
        command => {
            let ctx = bootstrap().await?;
            match command {
                Commands::Department { command } => {
                    handlers::admin::execute_department(&ctx, command).await
                }
                Commands::Scheme { command } => handlers::admin::execute_scheme(&ctx, command).await,
                Commands::Semester { command } => {
                    handlers::admin::execute_semester(&ctx, command).await
                }
                Commands::Subject { command } => {
                    handlers::admin::execute_subject(&ctx, command).await
                }
                Commands::Tree => handlers::tree::execute(&ctx).await,
                Commands::Search { query } => handlers::search::execute(&ctx, &query).await,
                Commands::Ingest(args) => handlers::ingest::execute(&ctx, &args).await,
                // handled above
                Commands::Paths | Commands::Serve { .. } => Ok(()),
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help
        return match Cli::command().print_help() {
            Ok(()) => ExitCode::SUCCESS,
            Err(_) => ExitCode::FAILURE,
        };
    };

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}
