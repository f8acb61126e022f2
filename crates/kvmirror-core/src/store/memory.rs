//! In-memory [`TargetIndex`] implementation for tests and small deployments.
//!
//! Entries live in a `BTreeMap` behind `std::sync::RwLock`. Search is a
//! linear scan over keys using [`KeyQuery`].

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::models::KeyValue;
use crate::search::{KeyQuery, MatchingStrategy};

use super::TargetIndex;

/// In-memory mirror index.
pub struct InMemoryIndex {
    entries: RwLock<BTreeMap<String, String>>,
    strategy: MatchingStrategy,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::with_strategy(MatchingStrategy::default())
    }

    pub fn with_strategy(strategy: MatchingStrategy) -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            strategy,
        }
    }

    /// Copy of every entry in key order.
    pub fn snapshot(&self) -> Result<Vec<KeyValue>> {
        Ok(self
            .read()?
            .iter()
            .map(|(k, v)| KeyValue::new(k.clone(), v.clone()))
            .collect())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .read()
            .map_err(|_| anyhow!("in-memory index lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .write()
            .map_err(|_| anyhow!("in-memory index lock poisoned"))
    }
}

impl Default for InMemoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TargetIndex for InMemoryIndex {
    async fn upsert(&self, key: &str, value: &str) -> Result<()> {
        self.write()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn upsert_batch(&self, page: &[KeyValue]) -> Result<()> {
        let mut entries = self.write()?;
        for kv in page {
            entries.insert(kv.key.clone(), kv.value.clone());
        }
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.write()?.remove(key);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<KeyValue>> {
        let parsed = KeyQuery::parse(query, self.strategy);
        let all = self.snapshot()?;
        if parsed.is_empty() {
            return Ok(all.into_iter().take(limit).collect());
        }
        Ok(parsed.rank(&all, limit))
    }

    async fn clear(&self) -> Result<()> {
        self.write()?.clear();
        Ok(())
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }
}
