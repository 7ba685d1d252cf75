//! Device-local key-value preferences.
//!
//! The only value the core persists is whether the onboarding carousel has
//! been viewed. Finished cards are never stored.

mod file;
mod memory;
mod onboarding;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use onboarding::{INTRO_CAROUSEL_VIEWED_KEY, has_viewed_onboarding, mark_onboarding_viewed};

use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Trait for key-value preference backends.
///
/// Reads and writes are asynchronous so hosts can back them with platform
/// storage that does I/O off the UI thread.
pub trait PreferenceStore: Send + Sync {
    /// Read a value. Missing keys yield `Ok(None)`.
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>>;

    /// Write a value.
    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>>;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>>;
}
