// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-channel meeting-start preferences.
//!
//! The whole map lives under a single key and is rewritten on every change.
//! Concurrent writers race last-writer-wins; the map is small and admin
//! writes are rare, so no finer-grained scheme is warranted.

use std::collections::BTreeMap;
use std::sync::Arc;

use meetsync_core::MeetsyncError;
use meetsync_core::traits::KvStore;
use serde::{Deserialize, Serialize};

use crate::keys;

/// Whether members may start meetings in a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    /// Anyone in the channel may start a meeting.
    Allow,
    /// Only channel admins may start a meeting.
    Restrict,
    /// Fall back to the system-wide default.
    Default,
}

/// A channel's stored preference, with its display name for admin listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelPreference {
    pub channel_name: String,
    pub preference: Preference,
}

/// Store for the channel preference map.
pub struct ChannelPreferences {
    kv: Arc<dyn KvStore>,
}

impl ChannelPreferences {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        ChannelPreferences { kv }
    }

    /// The full preference map. An absent key reads as an empty map.
    pub async fn list(&self) -> Result<BTreeMap<String, ChannelPreference>, MeetsyncError> {
        let Some(raw) = self.kv.get(keys::CHANNEL_SETTINGS_KEY).await? else {
            return Ok(BTreeMap::new());
        };
        serde_json::from_slice(&raw)
            .map_err(|e| MeetsyncError::corrupt(keys::CHANNEL_SETTINGS_KEY, e))
    }

    /// The stored preference for one channel, if any.
    pub async fn get(
        &self,
        channel_id: &str,
    ) -> Result<Option<ChannelPreference>, MeetsyncError> {
        Ok(self.list().await?.remove(channel_id))
    }

    /// Set or replace a channel's preference. Read-modify-write of the whole
    /// map.
    pub async fn set(
        &self,
        channel_id: &str,
        value: ChannelPreference,
    ) -> Result<(), MeetsyncError> {
        let mut map = self.list().await?;
        map.insert(channel_id.to_string(), value);
        self.write(&map).await
    }

    /// Remove a channel's preference. Removing an absent entry succeeds.
    pub async fn remove(&self, channel_id: &str) -> Result<(), MeetsyncError> {
        let mut map = self.list().await?;
        if map.remove(channel_id).is_some() {
            self.write(&map).await?;
        }
        Ok(())
    }

    async fn write(
        &self,
        map: &BTreeMap<String, ChannelPreference>,
    ) -> Result<(), MeetsyncError> {
        let payload =
            serde_json::to_vec(map).map_err(|e| MeetsyncError::Internal(e.to_string()))?;
        self.kv.set(keys::CHANNEL_SETTINGS_KEY, &payload).await
    }
}
