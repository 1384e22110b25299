use std::collections::HashSet;

use async_trait::async_trait;

use crate::context::ReadContext;
use crate::error::{StorageError, StorageErrorKind};
use crate::location::Location;
use crate::reader::Reader;
use crate::registry::ReaderRegistry;

/// Reader that dispatches each [`Location`] to the backend registered for its scheme.
///
/// Owns a frozen [`ReaderRegistry`]; share it behind an `Arc` across requests.
#[derive(Debug)]
pub struct MultiReader {
    registry: ReaderRegistry,
}

impl MultiReader {
    /// Freeze `registry` into a dispatcher.
    #[must_use]
    pub fn new(registry: ReaderRegistry) -> Self {
        Self { registry }
    }

    /// Registered scheme names.
    pub fn schemes(&self) -> HashSet<String> {
        self.registry
            .schemes()
            .into_iter()
            .map(ToOwned::to_owned)
            .collect()
    }

    /// Whether `scheme` has a backend.
    pub fn has_scheme(&self, scheme: &str) -> bool {
        self.registry.contains(scheme)
    }
}

#[async_trait]
impl Reader for MultiReader {
    async fn read(&self, ctx: &ReadContext, location: &Location) -> Result<Vec<u8>, StorageError> {
        let (scheme, address) = location.split_scheme()?;
        let Some(reader) = self.registry.get(scheme) else {
            return Err(StorageError::new(StorageErrorKind::NotRegistered)
                .with_source(format!("no reader for scheme '{scheme}'"))
                .with_path(location.path()));
        };
        tracing::debug!(scheme, address = %address, "Dispatching read");
        reader.read(ctx, &address).await
    }
}
