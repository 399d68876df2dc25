//! Result cache: TTL-bounded memoization of shaped query results.
//!
//! The cache is addressed by a deterministic fingerprint of the query
//! parameters and stores the serialized result document. Entries expire
//! after a fixed TTL; there is no invalidation path, because ingestion
//! happens before serving starts. Clients may therefore observe results up
//! to TTL seconds stale relative to any store mutation.
//!
//! The [`ResultCache`] trait is a minimal key-value interface (string keys,
//! byte values) so providers can be swapped without touching the serving
//! path. [`QueryCacheClient`] layers the domain on top: fingerprint
//! derivation, serialization-agnostic byte passthrough, and fail-open
//! degradation when the cache misbehaves.

mod client;
mod memory;

pub use client::{fingerprint, QueryCacheClient};
pub use memory::{MemoryResultCache, DEFAULT_MAX_SIZE_BYTES, DEFAULT_TTL};

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use thiserror::Error;

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Infrastructure faults from the cache backend.
///
/// These never surface to callers of the serving path; the cache client
/// degrades by bypassing itself.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The backend could not be reached or failed to execute the operation.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// The operation did not complete within the caller-supplied timeout.
    #[error("cache operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Generic byte cache with provider-managed expiry.
pub trait ResultCache: Send + Sync {
    /// Look up a non-expired entry.
    fn get(&self, key: &str) -> BoxFuture<'_, Result<Option<Vec<u8>>, CacheError>>;

    /// Store a value; the provider applies its configured TTL.
    fn set(&self, key: &str, value: Vec<u8>) -> BoxFuture<'_, Result<(), CacheError>>;
}
