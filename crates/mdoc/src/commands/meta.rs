//! `mdoc meta` subcommand group.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use mdoc_config::Config;
use mdoc_meta::MetaData;

use crate::error::CliError;
use crate::output::Output;

/// Site metadata commands.
#[derive(Subcommand)]
pub(crate) enum MetaCommand {
    /// Print a sample metadata file.
    Example,
    /// Decode and validate a metadata file.
    Check(CheckArgs),
}

impl MetaCommand {
    /// Execute the meta subcommand.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Example => example(),
            Self::Check(args) => args.execute(),
        }
    }
}

fn example() -> Result<(), CliError> {
    let yaml = MetaData::example()
        .to_yaml()
        .map_err(|source| CliError::Meta {
            path: "example".to_owned(),
            source,
        })?;
    Output::new().data(&yaml);
    Ok(())
}

/// Arguments for the meta check command.
#[derive(Args)]
pub(crate) struct CheckArgs {
    /// Metadata file to check.
    file: PathBuf,

    /// Document extension menu links must use (default: from config).
    #[arg(long)]
    extension: Option<String>,

    /// Path to configuration file (default: auto-discover mdoc.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl CheckArgs {
    fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let extension = match self.extension {
            Some(ext) => ext,
            None => Config::load(self.config.as_deref(), None)?.site.extension,
        };
        let meta = check_file(&self.file, &extension)?;

        output.success(&format!(
            "{}: OK ({} links, {} menus)",
            self.file.display(),
            meta.links.len(),
            meta.menus.len()
        ));
        Ok(())
    }
}

/// Read, decode and validate the metadata file at `path`.
fn check_file(path: &Path, extension: &str) -> Result<MetaData, CliError> {
    tracing::debug!(path = %path.display(), extension, "Checking metadata file");
    let bytes = std::fs::read(path)?;
    MetaData::from_yaml(&bytes, extension).map_err(|source| CliError::Meta {
        path: path.display().to_string(),
        source,
    })
}
