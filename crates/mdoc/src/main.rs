//! mdoc CLI - Markdown documentation server.
//!
//! Provides commands for:
//! - `serve`: Start the documentation server
//! - `meta example`: Print a sample site metadata file
//! - `meta check`: Validate a site metadata file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{MetaCommand, ServeArgs};
use error::CliError;
use output::Output;

/// mdoc - Markdown documentation server.
#[derive(Parser)]
#[command(name = "mdoc", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the documentation server.
    Serve(ServeArgs),
    /// Site metadata commands.
    #[command(subcommand)]
    Meta(MetaCommand),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Serve(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if let Err(err) = run(cli.command) {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

fn run(command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(args.execute())
        }
        Commands::Meta(cmd) => cmd.execute(),
    }
}
