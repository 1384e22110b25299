//! `mdoc.toml` loading for mdoc.
//!
//! Unless a path is given, the config file is looked up in the working
//! directory and then in each parent. Relative directories in the file are
//! resolved against the directory holding it, and [`CliSettings`] given on the
//! command line are applied last.
//!
//! `server.host` and `github.raw_base_url` may reference environment
//! variables as `${VAR}` (must be set) or `${VAR:-fallback}`.

mod error;
mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

pub use error::ConfigError;

/// Name of the config file looked up by [`Config::load`].
const CONFIG_FILENAME: &str = "mdoc.toml";

/// Command-line overrides. `None` keeps the value from the file.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub debug: Option<bool>,
    /// Replaces the resolved `content.root`.
    pub content_root: Option<PathBuf>,
    /// Replaces the resolved `styles.dir`.
    pub styles_dir: Option<PathBuf>,
}

/// Parsed `mdoc.toml`.
///
/// `content` and `styles` hold paths as written in the file; read the
/// `*_resolved` fields instead, which are absolute or relative to the working
/// directory.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    content: ContentConfigRaw,
    styles: StylesConfigRaw,
    pub site: SiteConfig,
    pub github: GithubConfig,
    pub render: RenderConfig,

    #[serde(skip)]
    pub content_resolved: ContentConfig,
    #[serde(skip)]
    pub styles_resolved: StylesConfig,
    /// File the config came from, `None` for built-in defaults.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// `[server]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Re-read style assets on every request instead of once at startup.
    pub debug: bool,
    /// Upper bound for handling one request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8111,
            debug: false,
            request_timeout_secs: 30,
        }
    }
}

/// `[content]` as written in the file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct ContentConfigRaw {
    root: Option<String>,
    default_scheme: Option<String>,
}

/// `[content]` after path resolution.
#[derive(Debug, Default)]
pub struct ContentConfig {
    /// Directory served under the `local` scheme.
    pub root: PathBuf,
    /// Scheme assumed when a URL does not start with a registered one.
    pub default_scheme: String,
}

/// `[styles]` as written in the file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct StylesConfigRaw {
    dir: Option<String>,
    url_prefix: Option<String>,
    extensions: Option<Vec<String>>,
}

/// `[styles]` after path resolution.
#[derive(Debug, Default)]
pub struct StylesConfig {
    /// One sub-directory per style bundle.
    pub dir: PathBuf,
    /// URL prefix of style assets, slashes trimmed.
    pub url_prefix: String,
    /// Extensions of files exposed as style assets.
    pub extensions: Vec<String>,
}

/// `[site]` section: how sites are laid out in storage.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Directory name marking a site root.
    pub marker: String,
    /// Document extension, without the dot.
    pub extension: String,
    pub index: String,
    pub meta_filename: String,
    pub default_style: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            marker: "mdoc".to_owned(),
            extension: "mdoc".to_owned(),
            index: "index.mdoc".to_owned(),
            meta_filename: "meta".to_owned(),
            default_style: "base".to_owned(),
        }
    }
}

/// `[github]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Register the `github` scheme.
    pub enabled: bool,
    pub raw_base_url: String,
    pub branch: String,
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            raw_base_url: "https://raw.githubusercontent.com/".to_owned(),
            branch: "master".to_owned(),
            timeout_secs: 10,
        }
    }
}

/// `[render]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Keep raw HTML found in documents; when `false` it is shown as text.
    pub allow_raw_html: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            allow_raw_html: true,
        }
    }
}

fn non_empty(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} is empty")));
    }
    Ok(())
}

/// A non-empty name usable as one path segment.
fn segment(field: &str, value: &str) -> Result<(), ConfigError> {
    non_empty(field, value)?;
    if value.contains('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must not contain '/', got '{value}'"
        )));
    }
    Ok(())
}

fn positive(field: &str, value: u64) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!("{field} must be at least 1")));
    }
    Ok(())
}

fn http_url(field: &str, value: &str) -> Result<(), ConfigError> {
    let http = ["http://", "https://"].iter().any(|p| value.starts_with(p));
    if !http {
        return Err(ConfigError::Validation(format!(
            "{field} must be an http:// or https:// URL, got '{value}'"
        )));
    }
    Ok(())
}

impl Config {
    /// Load `config_path`, or the discovered `mdoc.toml`, or the defaults.
    ///
    /// `cli_settings` win over anything in the file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `config_path` does not exist, and
    /// any read, parse, expansion or validation error of the file.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Some(path) => Some(path.to_path_buf()),
            None => Self::discover_config(),
        };
        let mut config = match file {
            Some(path) => Self::load_from_file(&path)?,
            None => Self::default_with_cwd(),
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        let CliSettings {
            host,
            port,
            debug,
            content_root,
            styles_dir,
        } = settings;

        if let Some(host) = host {
            self.server.host.clone_from(host);
        }
        self.server.port = port.unwrap_or(self.server.port);
        self.server.debug = debug.unwrap_or(self.server.debug);
        if let Some(root) = content_root {
            self.content_resolved.root.clone_from(root);
        }
        if let Some(dir) = styles_dir {
            self.styles_resolved.dir.clone_from(dir);
        }
    }

    /// Nearest `mdoc.toml` in the working directory or its ancestors.
    fn discover_config() -> Option<PathBuf> {
        let cwd = std::env::current_dir().ok()?;
        cwd.ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    fn default_with_cwd() -> Self {
        Self::default_with_base(&std::env::current_dir().unwrap_or_default())
    }

    /// Built-in defaults with paths under `base`.
    fn default_with_base(base: &Path) -> Self {
        let mut config = Self {
            server: ServerConfig::default(),
            content: ContentConfigRaw::default(),
            styles: StylesConfigRaw::default(),
            site: SiteConfig::default(),
            github: GithubConfig::default(),
            render: RenderConfig::default(),
            content_resolved: ContentConfig::default(),
            styles_resolved: StylesConfig::default(),
            config_path: None,
        };
        config.resolve_paths(base);
        config
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&text)?;

        config.expand_env_vars()?;
        config.resolve_paths(path.parent().unwrap_or(Path::new(".")));
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Check every setting.
    ///
    /// [`Config::load`] runs this for config files; built-in defaults always pass.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("server.host", &self.server.host)?;
        if self.server.port == 0 {
            return Err(ConfigError::Validation(
                "server.port must not be 0".to_owned(),
            ));
        }
        positive("server.request_timeout_secs", self.server.request_timeout_secs)?;

        segment("site.marker", &self.site.marker)?;
        segment("site.extension", &self.site.extension)?;
        segment("site.index", &self.site.index)?;
        segment("site.meta_filename", &self.site.meta_filename)?;
        segment("site.default_style", &self.site.default_style)?;

        if self.github.enabled {
            http_url("github.raw_base_url", &self.github.raw_base_url)?;
            segment("github.branch", &self.github.branch)?;
            positive("github.timeout_secs", self.github.timeout_secs)?;
        }

        non_empty("content.default_scheme", &self.content_resolved.default_scheme)?;
        segment("styles.url_prefix", &self.styles_resolved.url_prefix)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        self.github.raw_base_url =
            expand::expand_env(&self.github.raw_base_url, "github.raw_base_url")?;
        Ok(())
    }

    /// Fill the `*_resolved` fields, joining relative paths onto `config_dir`.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let content = &self.content;
        self.content_resolved = ContentConfig {
            root: config_dir.join(content.root.as_deref().unwrap_or(".")),
            default_scheme: content
                .default_scheme
                .clone()
                .unwrap_or_else(|| "local".to_owned()),
        };

        let styles = &self.styles;
        self.styles_resolved = StylesConfig {
            dir: config_dir.join(styles.dir.as_deref().unwrap_or("styles")),
            url_prefix: styles
                .url_prefix
                .as_deref()
                .unwrap_or("styles")
                .trim_matches('/')
                .to_owned(),
            extensions: styles
                .extensions
                .clone()
                .unwrap_or_else(|| vec!["css".to_owned()]),
        };
    }
}
