//! GitHub raw-content reader for mdoc.
//!
//! [`GithubReader`] serves the `github` scheme. An address of the form
//! `<owner>/<project>/<path...>` is fetched from
//! `<raw_base_url><owner>/<project>/<branch>/<path...>` with a plain HTTP GET.

use std::time::Duration;

use async_trait::async_trait;
use mdoc_storage::{Location, ReadContext, Reader, StorageError, StorageErrorKind};
use reqwest::{Client, StatusCode, Url};

/// Backend identifier for error messages.
const BACKEND: &str = "GitHub";

/// Scheme name this reader is registered under by default.
pub const SCHEME: &str = "github";

/// Default raw-content host.
pub const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com/";

/// Connection settings for [`GithubReader`].
#[derive(Debug, Clone)]
pub struct GithubSettings {
    /// Base URL that `<owner>/<project>/<branch>/<path>` is appended to.
    pub raw_base_url: String,
    /// Branch every read resolves against.
    pub branch: String,
    /// Whole-request timeout.
    pub timeout: Duration,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            raw_base_url: DEFAULT_RAW_BASE_URL.to_owned(),
            branch: "master".to_owned(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Reader fetching files from a raw-content HTTP endpoint.
#[derive(Debug, Clone)]
pub struct GithubReader {
    client: Client,
    base_url: Url,
    branch: String,
}

impl GithubReader {
    /// Build a reader from `settings`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] if the base URL does not parse
    /// and [`StorageErrorKind::Other`] if the HTTP client cannot be built.
    pub fn new(settings: GithubSettings) -> Result<Self, StorageError> {
        let mut raw = settings.raw_base_url;
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let base_url = Url::parse(&raw).map_err(|e| {
            StorageError::new(StorageErrorKind::InvalidPath)
                .with_backend(BACKEND)
                .with_path(raw.clone())
                .with_source(e)
        })?;
        let client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Other)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?;

        Ok(Self {
            client,
            base_url,
            branch: settings.branch,
        })
    }

    /// URL an address is fetched from.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`] if the address has fewer than
    /// three segments, an empty owner or project, or any `.`/`..` segment.
    pub fn url_for(&self, address: &str) -> Result<Url, StorageError> {
        let location = Location::new(address);
        let segments = location
            .segments(3)
            .map_err(|e| e.with_backend(BACKEND))?;
        let (owner, project, rest) = (segments[0], segments[1], &segments[2..]);
        if owner.is_empty() || project.is_empty() {
            return Err(
                StorageError::invalid_path(address, "owner and project are required")
                    .with_backend(BACKEND),
            );
        }
        if segments.iter().any(|s| *s == "." || *s == "..") {
            return Err(
                StorageError::invalid_path(address, "relative segments are not allowed")
                    .with_backend(BACKEND),
            );
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                StorageError::invalid_path(self.base_url.as_str(), "base URL cannot hold a path")
                    .with_backend(BACKEND)
            })?
            .pop_if_empty()
            .extend([owner, project, self.branch.as_str()])
            .extend(rest);
        Ok(url)
    }

    async fn fetch(&self, url: Url, address: &str) -> Result<Vec<u8>, StorageError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(e, address))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::new(status_kind(status))
                .with_backend(BACKEND)
                .with_path(address)
                .with_source(format!("HTTP {status}")));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(e, address))?;
        if body.is_empty() {
            return Err(StorageError::new(StorageErrorKind::EmptyContent)
                .with_backend(BACKEND)
                .with_path(address));
        }
        Ok(body.to_vec())
    }
}

fn status_kind(status: StatusCode) -> StorageErrorKind {
    match status {
        StatusCode::NOT_FOUND => StorageErrorKind::NotFound,
        StatusCode::FORBIDDEN | StatusCode::UNAUTHORIZED => StorageErrorKind::PermissionDenied,
        StatusCode::TOO_MANY_REQUESTS => StorageErrorKind::RateLimited,
        s if s.is_server_error() => StorageErrorKind::Unavailable,
        _ => StorageErrorKind::Other,
    }
}

fn transport_error(err: reqwest::Error, address: &str) -> StorageError {
    let kind = if err.is_timeout() {
        StorageErrorKind::Timeout
    } else {
        StorageErrorKind::Unavailable
    };
    StorageError::new(kind)
        .with_backend(BACKEND)
        .with_path(address)
        .with_source(err)
}

#[async_trait]
impl Reader for GithubReader {
    async fn read(&self, ctx: &ReadContext, location: &Location) -> Result<Vec<u8>, StorageError> {
        let url = self.url_for(location.path())?;
        tracing::debug!(%url, "Fetching remote file");
        ctx.run(self.fetch(url, location.path())).await
    }
}
