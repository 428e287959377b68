//! Type-safe key-value persistence layer for the Newton storefront.
//!
//! Provides a small, ergonomic API for keeping serializable state in a
//! key-value backend with automatic JSON serialization. Backends are
//! pluggable through [`KvStore`]:
//!
//! - [`MemoryStore`]: process-local, shared between clones
//! - [`FileStore`]: one file per key under a directory
//! - `SpinStore`: Spin's key-value store (`wasm32` only)
//!
//! # Example
//!
//! ```rust,ignore
//! use newton_cache::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open("./data")?);
//!
//! // Store a value
//! cache.set("newtonbotics-cart", &record)?;
//!
//! // Retrieve a value
//! let record: Option<PersistedCart> = cache.get("newtonbotics-cart")?;
//!
//! // Delete a value
//! cache.delete("newtonbotics-cart")?;
//! ```

mod backend;
mod error;
mod kv;

#[cfg(target_arch = "wasm32")]
pub use backend::SpinStore;
pub use backend::{FileStore, KvStore, MemoryStore};
pub use error::CacheError;
pub use kv::Cache;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KvStore, MemoryStore};
}
