// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key-value substrate trait backing all meetsync persistence.

use async_trait::async_trait;

use crate::error::MeetsyncError;

/// The key-value substrate meetsync persists through.
///
/// TTL expiry is enforced by the implementation, not by callers: a key whose
/// TTL has elapsed reads as absent, indistinguishable from an explicit
/// deletion. No compare-and-swap is assumed; callers tolerate
/// last-writer-wins races on read-modify-write maps.
#[async_trait]
pub trait KvStore: Send + Sync + 'static {
    /// Reads the raw bytes under `key`. `Ok(None)` means the key is absent,
    /// whether never written, deleted, or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MeetsyncError>;

    /// Writes `value` under `key` with no expiry.
    async fn set(&self, key: &str, value: &[u8]) -> Result<(), MeetsyncError>;

    /// Writes `value` under `key`, expiring after `ttl_secs` seconds.
    async fn set_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl_secs: u64,
    ) -> Result<(), MeetsyncError>;

    /// Deletes `key`. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<(), MeetsyncError>;
}
