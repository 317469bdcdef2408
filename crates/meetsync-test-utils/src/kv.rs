// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`KvStore`] with a manually advanced clock.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use meetsync_core::MeetsyncError;
use meetsync_core::traits::KvStore;

struct Entry {
    value: Vec<u8>,
    /// Clock value at which the entry stops being visible, if any.
    expires_at: Option<u64>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    /// Monotonic test clock in seconds. Never advances on its own.
    now_secs: u64,
    /// When set, every operation fails with a storage error.
    failing: bool,
}

/// In-memory key-value store for tests.
///
/// TTLs are measured against an internal clock that only moves when the test
/// calls [`MemoryKv::advance_secs`], so expiry behaviour is deterministic
/// without sleeping.
#[derive(Default)]
pub struct MemoryKv {
    inner: Mutex<Inner>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the test clock, expiring any entries whose TTL has elapsed.
    pub fn advance_secs(&self, secs: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.now_secs += secs;
    }

    /// Make every subsequent operation fail with a storage error.
    pub fn set_failing(&self, failing: bool) {
        self.inner.lock().unwrap().failing = failing;
    }

    /// Keys currently visible, sorted. Expired entries are excluded.
    pub fn keys(&self) -> Vec<String> {
        let inner = self.inner.lock().unwrap();
        let now = inner.now_secs;
        let mut keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, e)| e.expires_at.is_none_or(|at| at > now))
            .map(|(k, _)| k.clone())
            .collect();
        keys.sort();
        keys
    }

    fn check_failing(inner: &Inner) -> Result<(), MeetsyncError> {
        if inner.failing {
            return Err(MeetsyncError::storage(std::io::Error::other(
                "injected store failure",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl KvStore for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MeetsyncError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_failing(&inner)?;
        let now = inner.now_secs;
        match inner.entries.get(key) {
            Some(entry) if entry.expires_at.is_some_and(|at| at <= now) => {
                inner.entries.remove(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), MeetsyncError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_failing(&inner)?;
        inner.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: None,
            },
        );
        Ok(())
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl_secs: u64,
    ) -> Result<(), MeetsyncError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_failing(&inner)?;
        let expires_at = inner.now_secs + ttl_secs;
        inner.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at: Some(expires_at),
            },
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), MeetsyncError> {
        let mut inner = self.inner.lock().unwrap();
        Self::check_failing(&inner)?;
        inner.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ttl_entries_expire_with_the_clock() {
        let kv = MemoryKv::new();
        kv.set_with_ttl("k", b"v", 300).await.unwrap();
        assert_eq!(kv.get("k").await.unwrap(), Some(b"v".to_vec()));

        kv.advance_secs(299);
        assert!(kv.get("k").await.unwrap().is_some());

        kv.advance_secs(1);
        assert_eq!(kv.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn failure_injection_covers_all_operations() {
        let kv = MemoryKv::new();
        kv.set("k", b"v").await.unwrap();
        kv.set_failing(true);
        assert!(kv.get("k").await.is_err());
        assert!(kv.set("k", b"v").await.is_err());
        assert!(kv.delete("k").await.is_err());
        kv.set_failing(false);
        assert_eq!(kv.get("k").await.unwrap(), Some(b"v".to_vec()));
    }
}
