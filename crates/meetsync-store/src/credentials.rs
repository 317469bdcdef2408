// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dual-indexed credential store.
//!
//! Every connected user's credential record is written under two keys, one
//! per lookup direction (host-platform user id and remote-service user id),
//! with identical payloads. The access token inside the payload is encrypted
//! with the configured encryption key; everything else is stored in the
//! clear.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use meetsync_core::MeetsyncError;
use meetsync_core::traits::KvStore;
use meetsync_core::types::OAuthToken;
use meetsync_config::ConfigStore;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::keys;

/// A connected user's credential record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    /// Host-platform user id.
    pub user_id: String,
    /// Remote-service user id.
    pub remote_id: String,
    /// Account email on the remote service.
    pub email: String,
    /// OAuth token. Plaintext in memory, encrypted at rest.
    pub token: OAuthToken,
    /// When the connection was established.
    pub created_at: DateTime<Utc>,
}

/// Store for per-user credentials and the account-level superuser token.
pub struct CredentialStore {
    kv: Arc<dyn KvStore>,
    config: Arc<ConfigStore>,
}

impl CredentialStore {
    pub fn new(kv: Arc<dyn KvStore>, config: Arc<ConfigStore>) -> Self {
        CredentialStore { kv, config }
    }

    fn encryption_key(&self) -> Result<String, MeetsyncError> {
        let key = self.config.get().encryption_key.clone();
        if key.is_empty() {
            return Err(MeetsyncError::Config(
                "no encryption key configured".to_string(),
            ));
        }
        Ok(key)
    }

    /// Persist `record` under both indexes.
    ///
    /// The two writes carry identical payloads; a record reachable from one
    /// index but not the other is a corrupt state, so neither key is ever
    /// written alone through this interface. The caller's record is not
    /// mutated.
    pub async fn store(&self, record: &CredentialRecord) -> Result<(), MeetsyncError> {
        let key = self.encryption_key()?;
        let mut stored = record.clone();
        stored.token.access_token =
            meetsync_crypto::encrypt(&key, &record.token.access_token)?;
        let payload =
            serde_json::to_vec(&stored).map_err(|e| MeetsyncError::Internal(e.to_string()))?;

        self.kv
            .set(&keys::credential_by_user_key(&record.user_id), &payload)
            .await?;
        self.kv
            .set(&keys::credential_by_remote_key(&record.remote_id), &payload)
            .await?;
        Ok(())
    }

    /// Look up the credential record for a host-platform user.
    pub async fn fetch_by_user_id(
        &self,
        user_id: &str,
    ) -> Result<Option<CredentialRecord>, MeetsyncError> {
        self.fetch(&keys::credential_by_user_key(user_id)).await
    }

    /// Look up the credential record for a remote-service user.
    pub async fn fetch_by_remote_id(
        &self,
        remote_id: &str,
    ) -> Result<Option<CredentialRecord>, MeetsyncError> {
        self.fetch(&keys::credential_by_remote_key(remote_id)).await
    }

    async fn fetch(&self, key: &str) -> Result<Option<CredentialRecord>, MeetsyncError> {
        let Some(raw) = self.kv.get(key).await? else {
            return Ok(None);
        };
        let mut record: CredentialRecord =
            serde_json::from_slice(&raw).map_err(|e| MeetsyncError::corrupt(key, e))?;
        let enc_key = self.encryption_key()?;
        record.token.access_token =
            meetsync_crypto::decrypt(&enc_key, &record.token.access_token)?;
        Ok(Some(record))
    }

    /// Remove both index entries for a user.
    ///
    /// Returns [`MeetsyncError::NotConnected`] when no record exists, so
    /// callers can tell a real disconnect from a no-op.
    pub async fn disconnect(&self, user_id: &str) -> Result<(), MeetsyncError> {
        let user_key = keys::credential_by_user_key(user_id);
        let Some(raw) = self.kv.get(&user_key).await? else {
            return Err(MeetsyncError::NotConnected);
        };

        // The remote id is stored in the clear, so a disconnect never needs
        // the encryption key. An undecodable record still gets its primary
        // entry removed rather than leaving the user stuck half-connected.
        match serde_json::from_slice::<CredentialRecord>(&raw) {
            Ok(record) => {
                self.kv.delete(&user_key).await?;
                self.kv
                    .delete(&keys::credential_by_remote_key(&record.remote_id))
                    .await?;
            }
            Err(e) => {
                warn!(user_id, error = %e, "removing undecodable credential record");
                self.kv.delete(&user_key).await?;
            }
        }
        Ok(())
    }

    /// Read the account-level superuser token, if one is stored.
    pub async fn superuser_token(&self) -> Result<Option<OAuthToken>, MeetsyncError> {
        let Some(raw) = self.kv.get(keys::SUPERUSER_TOKEN_KEY).await? else {
            return Ok(None);
        };
        let token = serde_json::from_slice(&raw)
            .map_err(|e| MeetsyncError::corrupt(keys::SUPERUSER_TOKEN_KEY, e))?;
        Ok(Some(token))
    }

    /// Replace the account-level superuser token.
    pub async fn set_superuser_token(&self, token: &OAuthToken) -> Result<(), MeetsyncError> {
        let payload =
            serde_json::to_vec(token).map_err(|e| MeetsyncError::Internal(e.to_string()))?;
        self.kv.set(keys::SUPERUSER_TOKEN_KEY, &payload).await
    }

    /// Remove the account-level superuser token. Removing an absent token
    /// succeeds.
    pub async fn remove_superuser_token(&self) -> Result<(), MeetsyncError> {
        self.kv.delete(keys::SUPERUSER_TOKEN_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use meetsync_config::Configuration;
    use meetsync_test_utils::MemoryKv;

    const TEST_KEY: &str = "0123456789abcdef0123456789abcdef";

    fn store_with(kv: Arc<MemoryKv>) -> CredentialStore {
        let config = Arc::new(ConfigStore::new());
        config.set(Arc::new(Configuration {
            encryption_key: TEST_KEY.to_string(),
            ..Configuration::default()
        }));
        CredentialStore::new(kv, config)
    }

    fn record(user_id: &str, remote_id: &str) -> CredentialRecord {
        CredentialRecord {
            user_id: user_id.to_string(),
            remote_id: remote_id.to_string(),
            email: "user@example.com".to_string(),
            token: OAuthToken {
                access_token: "access-secret".to_string(),
                refresh_token: Some("refresh-secret".to_string()),
                expiry: None,
            },
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn store_writes_both_indexes_and_round_trips() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_with(kv.clone());
        let rec = record("u1", "z1");

        store.store(&rec).await.unwrap();
        assert_eq!(kv.keys(), vec!["zoomtoken_u1", "zoomtokenbyzoomid_z1"]);

        let by_user = store.fetch_by_user_id("u1").await.unwrap().unwrap();
        let by_remote = store.fetch_by_remote_id("z1").await.unwrap().unwrap();
        assert_eq!(by_user, rec);
        assert_eq!(by_remote, rec);
    }

    #[tokio::test]
    async fn access_token_is_not_stored_in_the_clear() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_with(kv.clone());
        store.store(&record("u1", "z1")).await.unwrap();

        let raw = kv.get("zoomtoken_u1").await.unwrap().unwrap();
        let raw = String::from_utf8(raw).unwrap();
        assert!(!raw.contains("access-secret"));
        // The remote id stays readable without the key.
        assert!(raw.contains("z1"));
    }

    #[tokio::test]
    async fn store_does_not_mutate_the_caller_record() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_with(kv);
        let rec = record("u1", "z1");
        store.store(&rec).await.unwrap();
        assert_eq!(rec.token.access_token, "access-secret");
    }

    #[tokio::test]
    async fn absent_credentials_read_as_none() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_with(kv);
        assert!(store.fetch_by_user_id("nobody").await.unwrap().is_none());
        assert!(store.fetch_by_remote_id("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn undecodable_record_is_corrupt_not_absent() {
        let kv = Arc::new(MemoryKv::new());
        kv.set("zoomtoken_u1", b"not json").await.unwrap();
        let store = store_with(kv);
        let err = store.fetch_by_user_id("u1").await.unwrap_err();
        assert!(matches!(err, MeetsyncError::Corrupt { .. }));
    }

    #[tokio::test]
    async fn decrypt_failure_after_key_rotation_is_a_crypto_error() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_with(kv.clone());
        store.store(&record("u1", "z1")).await.unwrap();

        let rotated = store_with(kv.clone());
        rotated.config.set(Arc::new(Configuration {
            encryption_key: "fedcba9876543210fedcba9876543210".to_string(),
            ..Configuration::default()
        }));
        let err = rotated.fetch_by_user_id("u1").await.unwrap_err();
        assert!(matches!(err, MeetsyncError::Crypto(_)));
    }

    #[tokio::test]
    async fn disconnect_removes_both_indexes() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_with(kv.clone());
        store.store(&record("u1", "z1")).await.unwrap();

        store.disconnect("u1").await.unwrap();
        assert!(kv.keys().is_empty());
    }

    #[tokio::test]
    async fn disconnect_without_credentials_is_not_connected() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_with(kv);
        let err = store.disconnect("u1").await.unwrap_err();
        assert!(matches!(err, MeetsyncError::NotConnected));
    }

    #[tokio::test]
    async fn superuser_token_round_trips_and_removes() {
        let kv = Arc::new(MemoryKv::new());
        let store = store_with(kv);
        assert!(store.superuser_token().await.unwrap().is_none());

        let token = OAuthToken {
            access_token: "super".to_string(),
            refresh_token: None,
            expiry: None,
        };
        store.set_superuser_token(&token).await.unwrap();
        assert_eq!(store.superuser_token().await.unwrap(), Some(token));

        store.remove_superuser_token().await.unwrap();
        assert!(store.superuser_token().await.unwrap().is_none());
        // Removing again is still fine.
        store.remove_superuser_token().await.unwrap();
    }
}
