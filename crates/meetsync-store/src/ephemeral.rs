// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Short-lived state: OAuth handshake blobs and meeting-to-post mappings.
//!
//! Both record kinds are written with a TTL and disappear on their own; the
//! substrate enforces expiry, so an expired record reads exactly like one
//! that was never written.

use std::sync::Arc;

use meetsync_core::MeetsyncError;
use meetsync_core::traits::KvStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keys;

/// Handshake lifetime. A user has this long to complete the OAuth consent
/// screen before the flow has to restart.
pub const HANDSHAKE_TTL_SECS: u64 = 300;

/// Meeting-mapping lifetime. Meetings that receive no end event within a day
/// stop being tracked.
pub const MEETING_MAPPING_TTL_SECS: u64 = 86_400;

/// Pending OAuth handshake state, keyed by the initiating user.
///
/// The nonce doubles as the CSRF token carried through the `state` query
/// parameter of the authorization URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandshakeState {
    /// Random nonce bound to this handshake attempt.
    pub nonce: String,
    /// Host-platform user who started the flow.
    pub user_id: String,
    /// Channel the flow was started from; a meeting is announced there once
    /// the connection completes.
    pub channel_id: String,
    /// When set, the flow only connects the account and starts no meeting.
    pub connect_only: bool,
}

/// Store for handshake state and meeting-to-post mappings.
pub struct EphemeralStore {
    kv: Arc<dyn KvStore>,
}

impl EphemeralStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        EphemeralStore { kv }
    }

    /// Start a handshake for `user_id`, replacing any pending one.
    ///
    /// Returns the stored state so the caller can embed the nonce in the
    /// authorization URL.
    pub async fn put_handshake(
        &self,
        user_id: &str,
        channel_id: &str,
        connect_only: bool,
    ) -> Result<HandshakeState, MeetsyncError> {
        let state = HandshakeState {
            nonce: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            channel_id: channel_id.to_string(),
            connect_only,
        };
        let payload =
            serde_json::to_vec(&state).map_err(|e| MeetsyncError::Internal(e.to_string()))?;
        self.kv
            .set_with_ttl(&keys::handshake_key(user_id), &payload, HANDSHAKE_TTL_SECS)
            .await?;
        Ok(state)
    }

    /// Read the pending handshake for `user_id`, if one exists and has not
    /// expired.
    pub async fn get_handshake(
        &self,
        user_id: &str,
    ) -> Result<Option<HandshakeState>, MeetsyncError> {
        let key = keys::handshake_key(user_id);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(None);
        };
        let state =
            serde_json::from_slice(&raw).map_err(|e| MeetsyncError::corrupt(&key, e))?;
        Ok(Some(state))
    }

    /// Discard the pending handshake for `user_id`.
    pub async fn delete_handshake(&self, user_id: &str) -> Result<(), MeetsyncError> {
        self.kv.delete(&keys::handshake_key(user_id)).await
    }

    /// Remember which post announced `meeting_id`.
    pub async fn put_meeting_mapping(
        &self,
        meeting_id: &str,
        post_id: &str,
    ) -> Result<(), MeetsyncError> {
        self.kv
            .set_with_ttl(
                &keys::meeting_post_key(meeting_id),
                post_id.as_bytes(),
                MEETING_MAPPING_TTL_SECS,
            )
            .await
    }

    /// The post id that announced `meeting_id`, if the meeting is tracked.
    pub async fn get_meeting_mapping(
        &self,
        meeting_id: &str,
    ) -> Result<Option<String>, MeetsyncError> {
        let key = keys::meeting_post_key(meeting_id);
        let Some(raw) = self.kv.get(&key).await? else {
            return Ok(None);
        };
        let post_id = String::from_utf8(raw)
            .map_err(|e| MeetsyncError::corrupt(&key, e))?;
        Ok(Some(post_id))
    }

    /// Stop tracking `meeting_id`.
    pub async fn delete_meeting_mapping(&self, meeting_id: &str) -> Result<(), MeetsyncError> {
        self.kv.delete(&keys::meeting_post_key(meeting_id)).await
    }
}
