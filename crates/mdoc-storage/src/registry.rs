use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{StorageError, StorageErrorKind};
use crate::reader::Reader;

/// Scheme name to backend mapping.
///
/// Built once at startup and then moved into a [`MultiReader`](crate::MultiReader),
/// after which it can no longer change.
#[derive(Default)]
pub struct ReaderRegistry {
    readers: HashMap<String, Arc<dyn Reader>>,
}

impl ReaderRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `reader` under `scheme`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::AlreadyRegistered`] if the scheme is taken.
    /// The existing registration is kept.
    pub fn register(
        &mut self,
        scheme: impl Into<String>,
        reader: Arc<dyn Reader>,
    ) -> Result<(), StorageError> {
        let scheme = scheme.into();
        if self.readers.contains_key(&scheme) {
            return Err(StorageError::new(StorageErrorKind::AlreadyRegistered).with_path(scheme));
        }
        tracing::debug!(%scheme, "Registered reader");
        self.readers.insert(scheme, reader);
        Ok(())
    }

    /// Backend registered for `scheme`.
    pub fn get(&self, scheme: &str) -> Option<&Arc<dyn Reader>> {
        self.readers.get(scheme)
    }

    /// Whether `scheme` has a backend.
    pub fn contains(&self, scheme: &str) -> bool {
        self.readers.contains_key(scheme)
    }

    /// Registered scheme names, sorted.
    pub fn schemes(&self) -> Vec<&str> {
        let mut schemes: Vec<&str> = self.readers.keys().map(String::as_str).collect();
        schemes.sort_unstable();
        schemes
    }

    /// Number of registered backends.
    pub fn len(&self) -> usize {
        self.readers.len()
    }

    /// Whether no backend is registered.
    pub fn is_empty(&self) -> bool {
        self.readers.is_empty()
    }
}

impl fmt::Debug for ReaderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderRegistry")
            .field("schemes", &self.schemes())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Location, MockReader, ReadContext};

    #[test]
    fn test_register_and_get() {
        let mut registry = ReaderRegistry::new();

        registry
            .register("local", Arc::new(MockReader::new()))
            .unwrap();

        assert!(registry.contains("local"));
        assert!(registry.get("local").is_some());
        assert!(registry.get("github").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_register_keeps_first() {
        let mut registry = ReaderRegistry::new();
        let first = Arc::new(MockReader::new().with_content("a", "first"));
        let second = Arc::new(MockReader::new().with_content("a", "second"));

        registry.register("local", first).unwrap();
        let err = registry.register("local", second).unwrap_err();

        assert_eq!(err.kind(), StorageErrorKind::AlreadyRegistered);
        let reader = registry.get("local").unwrap();
        let bytes = reader
            .read(&ReadContext::new(), &Location::new("a"))
            .await
            .unwrap();
        assert_eq!(bytes, b"first");
    }

    #[test]
    fn test_schemes_sorted() {
        let mut registry = ReaderRegistry::new();
        registry
            .register("local", Arc::new(MockReader::new()))
            .unwrap();
        registry
            .register("github", Arc::new(MockReader::new()))
            .unwrap();

        assert_eq!(registry.schemes(), vec!["github", "local"]);
    }
}
