//! Storage error types.
//!
//! [`StorageError`] is shared by every backend and by the dispatcher, so callers
//! can react to the semantic [`StorageErrorKind`] without knowing which medium
//! produced the failure.

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// Nothing is stored at the Location.
    NotFound,
    /// Permission denied.
    PermissionDenied,
    /// Location path does not match the grammar expected by the reader.
    InvalidPath,
    /// No backend is registered for the Location's scheme.
    NotRegistered,
    /// A backend is already registered for the scheme.
    AlreadyRegistered,
    /// Backend is unavailable or the transport failed.
    Unavailable,
    /// Too many requests.
    RateLimited,
    /// Operation timed out.
    Timeout,
    /// Backend answered successfully but returned no content.
    EmptyContent,
    /// Caller cancelled the read.
    Cancelled,
    /// Anything not covered above.
    Other,
}

impl StorageErrorKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "Not found",
            Self::PermissionDenied => "Permission denied",
            Self::InvalidPath => "Invalid path",
            Self::NotRegistered => "Backend not registered",
            Self::AlreadyRegistered => "Backend already registered",
            Self::Unavailable => "Unavailable",
            Self::RateLimited => "Rate limited",
            Self::Timeout => "Timeout",
            Self::EmptyContent => "Empty content",
            Self::Cancelled => "Cancelled",
            Self::Other => "Error",
        }
    }
}

/// Failure of a read, tagged with the backend and path it concerns.
#[derive(Debug)]
pub struct StorageError {
    kind: StorageErrorKind,
    path: Option<String>,
    backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Error of `kind` with no context attached.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            backend: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Name the backend that failed.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Keep the lower-level cause.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// What went wrong.
    pub fn kind(&self) -> StorageErrorKind {
        self.kind
    }

    /// Path context, if any.
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Backend identifier, if any.
    pub fn backend(&self) -> Option<&'static str> {
        self.backend
    }

    /// The cause, if it is an `E`.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// `NotFound` for `path`.
    #[must_use]
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create an invalid path error with a reason.
    #[must_use]
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        let reason: String = reason.into();
        Self::new(StorageErrorKind::InvalidPath)
            .with_path(path)
            .with_source(reason)
    }

    /// Classify an I/O failure.
    #[must_use]
    pub fn io(err: std::io::Error, path: Option<String>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied => StorageErrorKind::PermissionDenied,
            std::io::ErrorKind::TimedOut => StorageErrorKind::Timeout,
            _ => StorageErrorKind::Other,
        };
        let mut error = Self::new(kind).with_source(err);
        if let Some(p) = path {
            error = error.with_path(p);
        }
        error
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // [Backend] Kind: cause (path: p)
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        write!(f, "{}", self.kind.as_str())?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {path})")?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_error_has_no_context() {
        let err = StorageError::new(StorageErrorKind::Timeout);

        assert_eq!(err.kind(), StorageErrorKind::Timeout);
        assert_eq!(err.path(), None);
        assert_eq!(err.backend(), None);
        assert_eq!(err.to_string(), "Timeout");
    }

    #[test]
    fn test_cause_is_downcastable() {
        let cause = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::io(cause, Some("site/mdoc/meta".to_owned()));

        assert_eq!(err.kind(), StorageErrorKind::PermissionDenied);
        assert_eq!(err.path(), Some("site/mdoc/meta"));
        let io = err.downcast_source::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_io_kinds() {
        for (io_kind, expected) in [
            (std::io::ErrorKind::NotFound, StorageErrorKind::NotFound),
            (std::io::ErrorKind::TimedOut, StorageErrorKind::Timeout),
            (std::io::ErrorKind::InvalidData, StorageErrorKind::Other),
        ] {
            let err = StorageError::io(std::io::Error::new(io_kind, "x"), None);
            assert_eq!(err.kind(), expected, "{io_kind:?}");
        }
    }

    #[test]
    fn test_display_with_all_context() {
        let err = StorageError::not_found("site/mdoc/page.mdoc")
            .with_backend("Local")
            .with_source("no such file");

        assert_eq!(
            err.to_string(),
            "[Local] Not found: no such file (path: site/mdoc/page.mdoc)"
        );
    }

    #[test]
    fn test_invalid_path_carries_reason() {
        let err = StorageError::invalid_path("a/b", "too few segments");

        assert_eq!(err.kind(), StorageErrorKind::InvalidPath);
        assert_eq!(err.to_string(), "Invalid path: too few segments (path: a/b)");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error as _;

        let err = StorageError::new(StorageErrorKind::Unavailable).with_source("connection reset");

        assert_eq!(err.source().unwrap().to_string(), "connection reset");
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }
}
