//! Scheme-prefixed content addresses.

use std::fmt;

use crate::error::StorageError;

/// Address of a piece of content, written as `<prefix>/<scheme>/<address...>`.
///
/// The first segment is ignored (it is empty for absolute paths like
/// `/local/site/mdoc/index.mdoc`), the second names the storage backend and
/// the rest is handed to that backend verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    path: String,
}

impl Location {
    /// Wrap a raw path.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// Build `/<scheme>/<address>`.
    pub fn from_parts(scheme: &str, address: &str) -> Self {
        Self {
            path: format!("/{scheme}/{}", address.trim_start_matches('/')),
        }
    }

    /// The raw path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Split off the scheme.
    ///
    /// Returns the scheme and the backend-relative remainder (segments from the
    /// third onward, rejoined with `/`).
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`](crate::StorageErrorKind::InvalidPath)
    /// if the path has fewer than three segments or the scheme is empty.
    pub fn split_scheme(&self) -> Result<(&str, Location), StorageError> {
        let mut parts = self.path.splitn(3, '/');
        let (Some(_prefix), Some(scheme), Some(rest)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(StorageError::invalid_path(
                &self.path,
                "expected <prefix>/<scheme>/<address>",
            ));
        };
        if scheme.is_empty() {
            return Err(StorageError::invalid_path(&self.path, "empty scheme"));
        }
        Ok((scheme, Location::new(rest)))
    }

    /// Path segments, failing if there are fewer than `min`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidPath`](crate::StorageErrorKind::InvalidPath)
    /// when the path is too short.
    pub fn segments(&self, min: usize) -> Result<Vec<&str>, StorageError> {
        let segments: Vec<&str> = self.path.split('/').collect();
        if segments.len() < min {
            return Err(StorageError::invalid_path(
                &self.path,
                format!("expected at least {min} segments, got {}", segments.len()),
            ));
        }
        Ok(segments)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for Location {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::StorageErrorKind;

    #[test]
    fn test_split_scheme_absolute() {
        let location = Location::new("/local/site/mdoc/index.mdoc");

        let (scheme, rest) = location.split_scheme().unwrap();

        assert_eq!(scheme, "local");
        assert_eq!(rest.path(), "site/mdoc/index.mdoc");
    }

    #[test]
    fn test_split_scheme_ignores_prefix() {
        let location = Location::new("anything/github/owner/proj/README.md");

        let (scheme, rest) = location.split_scheme().unwrap();

        assert_eq!(scheme, "github");
        assert_eq!(rest.path(), "owner/proj/README.md");
    }

    #[test]
    fn test_split_scheme_keeps_empty_remainder() {
        let location = Location::new("/local/");
        let (scheme, rest) = location.split_scheme().unwrap();

        assert_eq!(scheme, "local");
        assert_eq!(rest.path(), "");
    }

    #[test]
    fn test_split_scheme_too_short() {
        for path in ["", "local", "/local"] {
            let err = Location::new(path).split_scheme().unwrap_err();
            assert_eq!(err.kind(), StorageErrorKind::InvalidPath, "path {path:?}");
        }
    }

    #[test]
    fn test_split_scheme_empty_scheme() {
        let err = Location::new("//site/page.mdoc").split_scheme().unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::InvalidPath);
    }

    #[test]
    fn test_from_parts() {
        assert_eq!(
            Location::from_parts("local", "site/mdoc/meta").path(),
            "/local/site/mdoc/meta"
        );
        assert_eq!(
            Location::from_parts("local", "/site/mdoc/meta").path(),
            "/local/site/mdoc/meta"
        );
    }

    #[test]
    fn test_segments_min() {
        let location = Location::new("owner/proj");

        assert_eq!(location.segments(2).unwrap(), vec!["owner", "proj"]);
        assert_eq!(
            location.segments(3).unwrap_err().kind(),
            StorageErrorKind::InvalidPath
        );
    }
}
