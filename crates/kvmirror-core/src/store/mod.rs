//! Target index abstraction for kvmirror.
//!
//! The [`TargetIndex`] trait is the write and query surface the mirror
//! pipeline needs from its secondary store, enabling pluggable backends
//! (SQLite FTS5, in-memory).
//!
//! Implementations must be `Send + Sync`: the bulk loader and the change
//! watcher call into the same index concurrently.

pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::KeyValue;

/// Abstract secondary store that mirrors the source.
///
/// # Operations
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`upsert`](TargetIndex::upsert) | Insert or overwrite one key |
/// | [`upsert_batch`](TargetIndex::upsert_batch) | Insert or overwrite a scan page |
/// | [`remove`](TargetIndex::remove) | Delete one key (absent keys are not an error) |
/// | [`get`](TargetIndex::get) | Point lookup |
/// | [`search`](TargetIndex::search) | Free-text search over keys |
/// | [`clear`](TargetIndex::clear) | Drop every entry before a fresh backfill |
#[async_trait]
pub trait TargetIndex: Send + Sync {
    /// Insert or overwrite a single entry.
    async fn upsert(&self, key: &str, value: &str) -> Result<()>;

    /// Insert or overwrite every entry of a page as one write.
    async fn upsert_batch(&self, page: &[KeyValue]) -> Result<()>;

    /// Remove an entry.
    async fn remove(&self, key: &str) -> Result<()>;

    /// Look up the mirrored value for `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Search keys, returning at most `limit` entries.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KeyValue>>;

    /// Remove every entry.
    async fn clear(&self) -> Result<()>;

    /// Number of mirrored entries.
    async fn len(&self) -> Result<usize>;
}
