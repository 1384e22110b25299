use async_trait::async_trait;

use crate::context::ReadContext;
use crate::error::StorageError;
use crate::location::Location;

/// Fetches the raw bytes stored at a [`Location`].
///
/// Implementations must be thread-safe (`Send + Sync`) since a single reader
/// serves concurrent requests.
#[async_trait]
pub trait Reader: Send + Sync {
    /// Read the full content at `location`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the location is malformed for this reader,
    /// the content is missing, the backend fails, or `ctx` is cancelled.
    async fn read(&self, ctx: &ReadContext, location: &Location) -> Result<Vec<u8>, StorageError>;
}
