//! Error types for the HTTP server.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mdoc_meta::MetaError;
use mdoc_storage::StorageError;

/// Errors raised while serving a request or assembling the server.
///
/// Request handlers return this type directly; [`IntoResponse`] is the only
/// place where failures become HTTP status codes.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The URL does not contain the site marker segment exactly once.
    #[error("path {path} must contain exactly one '{marker}/' segment, found {count}")]
    MarkerCount {
        path: String,
        marker: String,
        count: usize,
    },

    /// The URL names something other than a site index or a document.
    #[error("we don't know how to handle path {0}")]
    UnsupportedPath(String),

    /// A URL segment is not valid percent-encoded UTF-8.
    #[error("path {0} is not valid UTF-8")]
    BadEncoding(String),

    /// The metadata file could not be read.
    #[error("could not read metadata at {location}: {source}")]
    Metadata {
        location: String,
        #[source]
        source: StorageError,
    },

    /// The metadata file could not be decoded.
    #[error("could not decode metadata at {location}: {source}")]
    MetaDecode {
        location: String,
        #[source]
        source: MetaError,
    },

    /// No template bundle exists for the style.
    #[error("style '{style}' not found: missing template {}", .path.display())]
    StyleNotFound { style: String, path: PathBuf },

    /// A template bundle exists but could not be read.
    #[error("could not read template {}: {source}", .path.display())]
    StyleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document could not be read.
    #[error("could not read {location}: {source}")]
    Content {
        location: String,
        #[source]
        source: StorageError,
    },

    /// Template parsing or execution failed.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),

    /// A static asset could not be read.
    #[error("could not read asset {}: {source}", .path.display())]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The styles directory tree could not be walked.
    #[error("could not walk styles directory {}: {source}", .path.display())]
    AssetWalk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A reader backend could not be set up.
    #[error("reader setup failed: {0}")]
    Registry(#[from] StorageError),
}

impl ServerError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MarkerCount { .. } | Self::UnsupportedPath(_) | Self::BadEncoding(_) => {
                StatusCode::NOT_ACCEPTABLE
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

/// Errors from starting or stopping a [`Server`](crate::Server).
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// `start` was called on a running server.
    #[error("server is already running on {0}")]
    AlreadyRunning(SocketAddr),

    /// The listening socket could not be opened.
    #[error("could not bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The server loop failed.
    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),

    /// The server task panicked or was aborted.
    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[cfg(test)]
mod tests {
    use mdoc_storage::StorageErrorKind;

    use super::*;

    #[test]
    fn test_format_errors_are_not_acceptable() {
        let errors = [
            ServerError::MarkerCount {
                path: "/a/b".to_owned(),
                marker: "mdoc".to_owned(),
                count: 0,
            },
            ServerError::UnsupportedPath("/a/mdoc/x.txt".to_owned()),
            ServerError::BadEncoding("/%ff".to_owned()),
        ];

        for err in errors {
            assert_eq!(err.status(), StatusCode::NOT_ACCEPTABLE, "{err}");
        }
    }

    #[test]
    fn test_storage_failures_are_server_errors() {
        let err = ServerError::Content {
            location: "/local/site/mdoc/page.mdoc".to_owned(),
            source: StorageError::not_found("site/mdoc/page.mdoc"),
        };

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("/local/site/mdoc/page.mdoc"));
    }

    #[test]
    fn test_registry_error_from_storage() {
        let err: ServerError = StorageError::new(StorageErrorKind::AlreadyRegistered).into();

        assert!(matches!(err, ServerError::Registry(_)));
    }

    #[test]
    fn test_unsupported_message() {
        let err = ServerError::UnsupportedPath("/site/mdoc/notes.txt".to_owned());

        assert_eq!(
            err.to_string(),
            "we don't know how to handle path /site/mdoc/notes.txt"
        );
    }
}
