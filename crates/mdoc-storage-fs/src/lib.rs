//! Local filesystem reader for mdoc.
//!
//! [`LocalReader`] serves the `local` scheme. The address part of a Location is
//! cleaned lexically and resolved against a configured content root; `..`
//! segments can never climb above that root.
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use mdoc_storage::{Location, ReadContext, Reader};
//! use mdoc_storage_fs::LocalReader;
//!
//! let reader = LocalReader::new(PathBuf::from("content"));
//! let bytes = reader
//!     .read(&ReadContext::new(), &Location::new("site/mdoc/index.mdoc"))
//!     .await?;
//! ```

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use mdoc_storage::{Location, ReadContext, Reader, StorageError};

/// Backend identifier for error messages.
const BACKEND: &str = "Local";

/// Scheme name this reader is registered under by default.
pub const SCHEME: &str = "local";

/// Reader backed by files under a content root.
#[derive(Debug, Clone)]
pub struct LocalReader {
    root: PathBuf,
}

impl LocalReader {
    /// Create a reader rooted at `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a Location address onto a file under the root.
    pub fn resolve(&self, address: &str) -> PathBuf {
        let mut path = self.root.clone();
        for segment in clean(address) {
            path.push(segment);
        }
        path
    }
}

/// Lexically clean a slash-separated path.
///
/// Empty and `.` segments are dropped and `..` removes the previous segment.
/// A `..` with nothing left to remove is discarded.
fn clean(address: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in address.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments
}

#[async_trait]
impl Reader for LocalReader {
    async fn read(&self, ctx: &ReadContext, location: &Location) -> Result<Vec<u8>, StorageError> {
        let path = self.resolve(location.path());
        tracing::debug!(path = %path.display(), "Reading local file");

        ctx.run(async {
            tokio::fs::read(&path).await.map_err(|e| {
                StorageError::io(e, Some(location.path().to_owned())).with_backend(BACKEND)
            })
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use mdoc_storage::StorageErrorKind;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    use super::*;

    fn setup() -> (TempDir, LocalReader) {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("site/mdoc")).unwrap();
        fs::write(dir.path().join("site/mdoc/index.mdoc"), "# Home").unwrap();
        fs::write(dir.path().join("site/mdoc/meta"), "name: Docs").unwrap();
        let reader = LocalReader::new(dir.path().to_path_buf());
        (dir, reader)
    }

    #[test]
    fn test_clean() {
        assert_eq!(clean("a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(clean("./a//b/./c"), vec!["a", "b", "c"]);
        assert_eq!(clean("a/b/../c"), vec!["a", "c"]);
        assert_eq!(clean("../../etc/passwd"), vec!["etc", "passwd"]);
        assert!(clean("").is_empty());
    }

    #[test]
    fn test_resolve_stays_under_root() {
        let reader = LocalReader::new(PathBuf::from("/srv/content"));

        assert_eq!(
            reader.resolve("../../etc/passwd"),
            PathBuf::from("/srv/content/etc/passwd")
        );
        assert_eq!(
            reader.resolve("/site/mdoc/meta"),
            PathBuf::from("/srv/content/site/mdoc/meta")
        );
    }

    #[tokio::test]
    async fn test_read_file() {
        let (_dir, reader) = setup();

        let bytes = reader
            .read(&ReadContext::new(), &Location::new("site/mdoc/index.mdoc"))
            .await
            .unwrap();

        assert_eq!(bytes, b"# Home");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let (_dir, reader) = setup();

        let err = reader
            .read(&ReadContext::new(), &Location::new("site/mdoc/nope.mdoc"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::NotFound);
        assert_eq!(err.backend(), Some("Local"));
    }

    #[tokio::test]
    async fn test_read_traversal_is_clamped() {
        let (dir, _) = setup();
        let reader = LocalReader::new(dir.path().join("site"));

        let bytes = reader
            .read(&ReadContext::new(), &Location::new("../../mdoc/meta"))
            .await
            .unwrap();

        assert_eq!(bytes, b"name: Docs");
    }

    #[tokio::test]
    async fn test_read_cancelled() {
        let (_dir, reader) = setup();
        let ctx = ReadContext::new();
        ctx.cancel();

        let err = reader
            .read(&ctx, &Location::new("site/mdoc/index.mdoc"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::Cancelled);
    }
}
