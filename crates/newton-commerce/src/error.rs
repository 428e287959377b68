//! Commerce error types.

use thiserror::Error;

/// Errors that can occur in cart and configuration handling.
///
/// Cart mutations never return these; the store turns persistence and
/// rehydration failures into log records.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// A persisted cart breaks the cart invariants.
    #[error("Invalid cart state: {0}")]
    InvalidCartState(String),

    /// A persisted cart was written with an unknown record version.
    #[error("Unsupported cart record version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    /// Cache error.
    #[error("Cache error: {0}")]
    Cache(#[from] newton_cache::CacheError),

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for CommerceError {
    fn from(e: toml::de::Error) -> Self {
        CommerceError::Config(e.to_string())
    }
}
