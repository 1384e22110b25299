//! Mock reader for testing.
//!
//! Provides [`MockReader`] for unit testing without filesystem or network access.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::context::ReadContext;
use crate::error::{StorageError, StorageErrorKind};
use crate::location::Location;
use crate::reader::Reader;

/// In-memory reader keyed by the exact Location path it receives.
///
/// # Example
///
/// ```ignore
/// use mdoc_storage::{Location, MockReader, ReadContext, Reader};
///
/// let reader = MockReader::new().with_content("site/mdoc/meta", "name: Docs");
/// let bytes = reader.read(&ReadContext::new(), &Location::new("site/mdoc/meta")).await?;
/// ```
#[derive(Debug, Default)]
pub struct MockReader {
    contents: RwLock<HashMap<String, Vec<u8>>>,
    calls: AtomicUsize,
}

impl MockReader {
    /// Create an empty mock reader.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add content for `path`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_content(self, path: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.contents
            .write()
            .unwrap()
            .insert(path.into(), content.into());
        self
    }

    /// Replace content for `path` after construction.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set_content(&self, path: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.contents
            .write()
            .unwrap()
            .insert(path.into(), content.into());
    }

    /// Number of `read()` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Reader for MockReader {
    async fn read(&self, ctx: &ReadContext, location: &Location) -> Result<Vec<u8>, StorageError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if ctx.is_cancelled() {
            return Err(StorageError::new(StorageErrorKind::Cancelled));
        }
        self.contents
            .read()
            .unwrap()
            .get(location.path())
            .cloned()
            .ok_or_else(|| StorageError::not_found(location.path()).with_backend("Mock"))
    }
}
