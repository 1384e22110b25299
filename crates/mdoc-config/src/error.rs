use std::path::PathBuf;

/// Errors raised while loading or checking `mdoc.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An explicitly given config file does not exist.
    #[error("config file {} does not exist", .0.display())]
    NotFound(PathBuf),
    /// The config file could not be read.
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),
    /// The config file is not valid TOML or has the wrong shape.
    #[error("invalid mdoc.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of range.
    #[error("invalid setting: {0}")]
    Validation(String),
    /// A `${VAR}` reference could not be expanded.
    #[error("cannot expand {field}: {message}")]
    EnvVar {
        /// Dotted key of the setting, e.g. `server.host`.
        field: String,
        /// What went wrong, e.g. `${MDOC_HOST} not set`.
        message: String,
    },
}
