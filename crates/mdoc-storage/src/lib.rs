//! Content addressing and storage readers for mdoc.
//!
//! This crate provides the [`Reader`] trait for fetching raw document bytes from a
//! storage medium, addressed by scheme-prefixed [`Location`] paths. This enables:
//!
//! - **Backend flexibility** (local filesystem, remote git hosting)
//! - **Unit testing** without touching the filesystem or the network
//! - **Uniform addressing** of content regardless of where it lives
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Location`] with the `<prefix>/<scheme>/<address...>` path grammar
//! - [`Reader`] trait with a single `read()` method
//! - [`ReaderRegistry`] mapping scheme names to backends, built once at startup
//! - [`MultiReader`] dispatching a Location to the backend registered for its scheme
//! - [`ReadContext`] carrying request cancellation down to backends
//! - [`MockReader`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use mdoc_storage::{Location, MultiReader, ReadContext, Reader, ReaderRegistry};
//! use mdoc_storage_fs::LocalReader;
//!
//! let mut registry = ReaderRegistry::new();
//! registry.register("local", Arc::new(LocalReader::new("content".into())))?;
//! let reader = MultiReader::new(registry);
//!
//! let bytes = reader
//!     .read(&ReadContext::new(), &Location::from_parts("local", "site/mdoc/index.mdoc"))
//!     .await?;
//! ```

mod context;
mod error;
mod location;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod multi;
mod reader;
mod registry;

pub use context::ReadContext;
pub use error::{StorageError, StorageErrorKind};
pub use location::Location;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockReader;
pub use multi::MultiReader;
pub use reader::Reader;
pub use registry::ReaderRegistry;
