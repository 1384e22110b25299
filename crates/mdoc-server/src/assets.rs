//! Static assets of style bundles.
//!
//! Every file under the styles directory whose extension is listed in the
//! configuration gets its own GET route at `/<url_prefix>/<relative path>`.
//! How the bytes are obtained is decided once at startup:
//!
//! - [`CachedAsset`] reads the file while the router is built and serves the
//!   same bytes forever. Startup fails if a file cannot be read.
//! - [`LiveAsset`] re-reads the file on every request, so edits show up
//!   immediately.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Bytes;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use crate::error::ServerError;

/// Source of one static asset's bytes.
#[async_trait]
pub(crate) trait AssetSource: Send + Sync {
    async fn bytes(&self) -> Result<Bytes, ServerError>;
}

/// Asset read once at startup.
pub(crate) struct CachedAsset {
    bytes: Bytes,
}

impl CachedAsset {
    pub(crate) async fn load(path: &Path) -> Result<Self, ServerError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| ServerError::Asset {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            bytes: Bytes::from(bytes),
        })
    }
}

#[async_trait]
impl AssetSource for CachedAsset {
    async fn bytes(&self) -> Result<Bytes, ServerError> {
        Ok(self.bytes.clone())
    }
}

/// Asset re-read from disk on every request.
pub(crate) struct LiveAsset {
    path: PathBuf,
}

impl LiveAsset {
    pub(crate) fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl AssetSource for LiveAsset {
    async fn bytes(&self) -> Result<Bytes, ServerError> {
        tokio::fs::read(&self.path)
            .await
            .map(Bytes::from)
            .map_err(|source| ServerError::Asset {
                path: self.path.clone(),
                source,
            })
    }
}

/// How asset bytes are obtained.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetMode {
    /// Read at startup, serve from memory.
    Cached,
    /// Read on every request.
    Live,
}

impl AssetMode {
    /// `Live` in debug mode, `Cached` otherwise.
    pub fn from_debug(debug: bool) -> Self {
        if debug { Self::Live } else { Self::Cached }
    }
}

/// Static asset settings.
#[derive(Clone, Debug)]
pub struct AssetConfig {
    /// Directory walked for assets.
    pub dir: PathBuf,
    /// URL prefix, without slashes.
    pub url_prefix: String,
    /// Extensions (without the dot) that are exposed.
    pub extensions: Vec<String>,
    pub mode: AssetMode,
}

/// Return the MIME type string for the given file path.
fn mime_for(path: &str) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

/// Build one route per exposed asset.
pub(crate) async fn asset_router<S>(config: &AssetConfig) -> Result<Router<S>, ServerError>
where
    S: Clone + Send + Sync + 'static,
{
    let mut router = Router::new();
    if !config.dir.is_dir() {
        tracing::warn!(dir = %config.dir.display(), "Styles directory not found, no assets exposed");
        return Ok(router);
    }

    for rel in walk_dir(&config.dir)? {
        if !has_extension(&rel, &config.extensions) {
            continue;
        }
        if !is_routable(&rel) {
            tracing::warn!(path = %rel, "Skipping asset with unroutable name");
            continue;
        }

        let path = config.dir.join(&rel);
        let source: Arc<dyn AssetSource> = match config.mode {
            AssetMode::Cached => Arc::new(CachedAsset::load(&path).await?),
            AssetMode::Live => Arc::new(LiveAsset::new(path)),
        };
        let route = format!("/{}/{rel}", config.url_prefix);
        let mime = mime_for(&rel);
        tracing::info!(route = %route, mode = ?config.mode, "Exposing asset");

        router = router.route(
            &route,
            get(move || {
                let source = Arc::clone(&source);
                let mime = mime.clone();
                async move { serve(source.as_ref(), mime).await }
            }),
        );
    }
    Ok(router)
}

async fn serve(source: &dyn AssetSource, mime: String) -> Result<Response, ServerError> {
    let bytes = source.bytes().await?;
    Ok(([(header::CONTENT_TYPE, mime)], bytes).into_response())
}

fn has_extension(rel: &str, extensions: &[String]) -> bool {
    Path::new(rel)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

/// Whether `rel` can be registered as a literal route.
///
/// The router treats braces and `*` as captures and rejects segments
/// starting with `:`.
fn is_routable(rel: &str) -> bool {
    !rel.contains(['{', '}', '*']) && !rel.split('/').any(|segment| segment.starts_with(':'))
}

/// Recursively walk a directory and return sorted paths relative to `base`.
///
/// Hidden entries (names starting with `.`) are skipped. Any unreadable
/// directory or entry fails the walk.
fn walk_dir(base: &Path) -> Result<Vec<String>, ServerError> {
    let mut result = Vec::new();
    walk_dir_inner(base, base, &mut result)?;
    result.sort();
    Ok(result)
}

fn walk_dir_inner(base: &Path, dir: &Path, result: &mut Vec<String>) -> Result<(), ServerError> {
    let walk_error = |source| ServerError::AssetWalk {
        path: dir.to_path_buf(),
        source,
    };
    for entry in std::fs::read_dir(dir).map_err(walk_error)? {
        let entry = entry.map_err(walk_error)?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            walk_dir_inner(base, &path, result)?;
        } else if let Ok(rel) = path.strip_prefix(base) {
            result.push(rel.to_string_lossy().replace('\\', "/"));
        }
    }
    Ok(())
}
