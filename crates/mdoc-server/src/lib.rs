//! HTTP server for mdoc documentation sites.
//!
//! Every request path is resolved to a site (a directory containing the
//! `mdoc/` marker segment), the site's metadata and a Markdown document are
//! read through the configured storage backends, and the converted document is
//! rendered through the site's style template.
//!
//! # Quick Start
//!
//! ```ignore
//! use mdoc_server::{ServerConfig, run_server};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig {
//!         port: 8111,
//!         ..ServerConfig::default()
//!     };
//!
//!     run_server(config, |addr| println!("listening on {addr}")).await.unwrap();
//! }
//! ```
//!
//! # Architecture
//!
//! ```text
//! Browser ──HTTP──► axum router (mdoc-server)
//!                        │
//!                        ├─► Style assets (one route per file, cached or live)
//!                        │
//!                        └─► Catch-all page handler
//!                                │
//!                                ├─► SitePath (URL → scheme, site root, target)
//!                                ├─► MultiReader ──► local / github readers
//!                                ├─► MarkdownRenderer + Sanitizer
//!                                └─► minijinja style template
//! ```

mod app;
mod assets;
mod error;
mod middleware;
mod pipeline;
mod site_path;
mod state;
mod templates;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use mdoc_renderer::{MarkdownRenderer, PassThrough};
use mdoc_storage::{MultiReader, ReaderRegistry};
use mdoc_storage_fs::LocalReader;
use mdoc_storage_github::{GithubReader, GithubSettings};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use assets::{AssetConfig, AssetMode};
pub use error::{LifecycleError, ServerError};
pub use site_path::SiteLayout;

use assets::asset_router;
use pipeline::RenderPipeline;
use state::AppState;
use templates::StyleBundles;

/// Server configuration.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on (0 picks a free port).
    pub port: u16,
    /// Re-read static assets on every request.
    pub debug: bool,
    /// Upper bound for handling one request.
    pub request_timeout: Duration,
    /// Root directory of the `local` backend.
    pub content_root: PathBuf,
    /// Scheme used when a URL does not start with a registered scheme.
    pub default_scheme: String,
    /// Directory holding the style bundles.
    pub styles_dir: PathBuf,
    /// URL prefix of style assets, without slashes.
    pub styles_url_prefix: String,
    /// Extensions of files exposed as style assets.
    pub asset_extensions: Vec<String>,
    /// Site naming conventions.
    pub site: SiteLayout,
    /// GitHub backend settings (`None` disables the backend).
    pub github: Option<GithubSettings>,
    /// Pass raw HTML in documents through to the output.
    pub allow_raw_html: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8111,
            debug: false,
            request_timeout: Duration::from_secs(30),
            content_root: PathBuf::from("."),
            default_scheme: mdoc_storage_fs::SCHEME.to_owned(),
            styles_dir: PathBuf::from("styles"),
            styles_url_prefix: "styles".to_owned(),
            asset_extensions: vec!["css".to_owned()],
            site: SiteLayout::default(),
            github: Some(GithubSettings::default()),
            allow_raw_html: true,
        }
    }
}

/// Build the reader registry for `config`.
///
/// The `local` backend is always registered; `github` only when configured.
///
/// # Errors
///
/// Returns an error if a backend cannot be constructed.
pub fn build_registry(config: &ServerConfig) -> Result<ReaderRegistry, ServerError> {
    let mut registry = ReaderRegistry::new();
    registry.register(
        mdoc_storage_fs::SCHEME,
        Arc::new(LocalReader::new(config.content_root.clone())),
    )?;
    if let Some(settings) = &config.github {
        registry.register(
            mdoc_storage_github::SCHEME,
            Arc::new(GithubReader::new(settings.clone())?),
        )?;
    }
    Ok(registry)
}

/// A bound server task.
struct Running {
    addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

/// The documentation server.
///
/// Construction wires the pipeline and routes; [`Server::start`] and
/// [`Server::stop`] control the listening socket.
pub struct Server {
    host: String,
    port: u16,
    router: Router,
    running: Mutex<Option<Running>>,
}

impl Server {
    /// Create a server with the backends described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a backend cannot be constructed or, in cached mode,
    /// a static asset cannot be read.
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let registry = build_registry(&config)?;
        Self::with_registry(config, registry).await
    }

    /// Create a server reading through `registry`.
    ///
    /// # Errors
    ///
    /// Returns an error if, in cached mode, a static asset cannot be read.
    pub async fn with_registry(
        config: ServerConfig,
        registry: ReaderRegistry,
    ) -> Result<Self, ServerError> {
        if !registry.contains(&config.default_scheme) {
            tracing::warn!(
                scheme = %config.default_scheme,
                "Default scheme has no registered reader"
            );
        }

        let reader = MultiReader::new(registry);
        let schemes = reader.schemes();
        let renderer = MarkdownRenderer::new()
            .with_title_extraction()
            .with_raw_html(config.allow_raw_html);
        let pipeline = RenderPipeline::new(
            Arc::new(reader),
            schemes,
            config.default_scheme.clone(),
            config.site.clone(),
            StyleBundles::new(config.styles_dir.clone()),
            renderer,
            Arc::new(PassThrough),
        );
        tracing::info!(dir = %pipeline.bundles().dir().display(), "Using style bundles");

        let assets = asset_router(&AssetConfig {
            dir: config.styles_dir.clone(),
            url_prefix: config.styles_url_prefix.clone(),
            extensions: config.asset_extensions.clone(),
            mode: AssetMode::from_debug(config.debug),
        })
        .await?;

        let state = Arc::new(AppState { pipeline });
        let router = app::create_router(state, assets, config.request_timeout);

        Ok(Self {
            host: config.host,
            port: config.port,
            router,
            running: Mutex::new(None),
        })
    }

    /// Bind the listening socket and start serving.
    ///
    /// Returns the bound address.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::AlreadyRunning`] if the server is running, or
    /// [`LifecycleError::Bind`] if the socket cannot be opened.
    pub async fn start(&self) -> Result<SocketAddr, LifecycleError> {
        let mut running = self.running.lock().await;
        if let Some(current) = running.as_ref() {
            return Err(LifecycleError::AlreadyRunning(current.addr));
        }

        let listener = tokio::net::TcpListener::bind((self.host.as_str(), self.port))
            .await
            .map_err(|source| LifecycleError::Bind {
                addr: format!("{}:{}", self.host, self.port),
                source,
            })?;
        let addr = listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone().cancelled_owned();
        let router = self.router.clone();
        let task = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(signal)
                .await
        });

        tracing::info!(address = %addr, "Server started");
        *running = Some(Running {
            addr,
            shutdown,
            task,
        });
        Ok(addr)
    }

    /// Stop serving and wait for in-flight requests to finish.
    ///
    /// Does nothing if the server is not running.
    ///
    /// # Errors
    ///
    /// Returns an error if the server loop failed.
    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let mut running = self.running.lock().await;
        let Some(current) = running.take() else {
            return Ok(());
        };

        current.shutdown.cancel();
        current.task.await??;
        tracing::info!(address = %current.addr, "Server stopped");
        Ok(())
    }

    /// Address the server listens on, if running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.running.lock().await.as_ref().map(|r| r.addr)
    }
}

/// Run the server until Ctrl-C.
///
/// `on_ready` is called with the bound address once the socket is open.
///
/// # Errors
///
/// Returns an error if the server cannot be constructed, started or stopped.
pub async fn run_server(
    config: ServerConfig,
    on_ready: impl FnOnce(SocketAddr),
) -> Result<(), Box<dyn std::error::Error>> {
    let server = Server::new(config).await?;
    let addr = server.start().await?;
    on_ready(addr);

    shutdown_signal().await;
    server.stop().await?;
    Ok(())
}

/// Wait for shutdown signal (Ctrl-C).
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, stopping server...");
}

/// Create server configuration from mdoc config.
#[must_use]
pub fn server_config_from_mdoc_config(config: &mdoc_config::Config) -> ServerConfig {
    let github = config.github.enabled.then(|| GithubSettings {
        raw_base_url: config.github.raw_base_url.clone(),
        branch: config.github.branch.clone(),
        timeout: Duration::from_secs(config.github.timeout_secs),
    });

    ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        debug: config.server.debug,
        request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        content_root: config.content_resolved.root.clone(),
        default_scheme: config.content_resolved.default_scheme.clone(),
        styles_dir: config.styles_resolved.dir.clone(),
        styles_url_prefix: config.styles_resolved.url_prefix.clone(),
        asset_extensions: config.styles_resolved.extensions.clone(),
        site: SiteLayout {
            marker: config.site.marker.clone(),
            extension: config.site.extension.clone(),
            index: config.site.index.clone(),
            meta_filename: config.site.meta_filename.clone(),
            default_style: config.site.default_style.clone(),
        },
        github,
        allow_raw_html: config.render.allow_raw_html,
    }
}
