//! CLI error types.

use mdoc_config::ConfigError;
use mdoc_meta::MetaError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{path}: {source}")]
    Meta {
        path: String,
        #[source]
        source: MetaError,
    },

    #[error("{0}")]
    Server(String),
}
