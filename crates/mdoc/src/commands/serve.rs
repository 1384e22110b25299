//! `mdoc serve` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdoc_config::{CliSettings, Config};
use mdoc_server::{run_server, server_config_from_mdoc_config};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the serve command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Path to configuration file (default: auto-discover mdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to (overrides config).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind to (overrides config).
    #[arg(short, long)]
    port: Option<u16>,

    /// Re-read style assets on every request.
    #[arg(long)]
    debug: bool,

    /// Root directory of the local backend (overrides config).
    #[arg(long)]
    content_root: Option<PathBuf>,

    /// Style bundle directory (overrides config).
    #[arg(long)]
    styles_dir: Option<PathBuf>,

    /// Enable verbose output (request and backend logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeArgs {
    /// Execute the serve command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the server fails to start.
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            host: self.host,
            port: self.port,
            debug: self.debug.then_some(true),
            content_root: self.content_root,
            styles_dir: self.styles_dir,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        tracing::debug!(
            config = ?config.config_path,
            host = %config.server.host,
            port = config.server.port,
            "Configuration loaded"
        );

        if let Some(path) = &config.config_path {
            output.info(&format!("Config: {}", path.display()));
        }
        output.info(&format!(
            "Content root: {}",
            config.content_resolved.root.display()
        ));
        output.info(&format!(
            "Styles directory: {}",
            config.styles_resolved.dir.display()
        ));
        if config.github.enabled {
            output.info(&format!("GitHub backend: {}", config.github.raw_base_url));
        } else {
            output.info("GitHub backend: disabled");
        }
        if config.server.debug {
            output.info("Assets: reloaded on every request (debug)");
        } else {
            output.info("Assets: cached at startup");
        }

        let server_config = server_config_from_mdoc_config(&config);
        run_server(server_config, |addr| {
            output.highlight(&format!("Listening on http://{addr}/"));
        })
        .await
        .map_err(|e| CliError::Server(e.to_string()))?;

        output.success("Server stopped");
        Ok(())
    }
}
