// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Key layout for the key-value substrate.
//!
//! Key shapes are wire-stable: existing deployments hold records under these
//! exact prefixes, so renaming any of them orphans live data.

/// Meeting-to-post mapping, keyed by percent-escaped meeting UUID. 24 h TTL.
pub const MEETING_POST_PREFIX: &str = "post_meeting_";

/// OAuth handshake state, keyed by host-platform user id. 5 min TTL.
pub const HANDSHAKE_PREFIX: &str = "zoomuserstate_";

/// Credential record keyed by host-platform user id.
pub const CREDENTIAL_BY_USER_PREFIX: &str = "zoomtoken_";

/// Credential record keyed by remote-service user id.
pub const CREDENTIAL_BY_REMOTE_PREFIX: &str = "zoomtokenbyzoomid_";

/// Account-level (superuser) token. Single key, trailing underscore included.
pub const SUPERUSER_TOKEN_KEY: &str = "zoomSuperUserToken_";

/// Whole-map channel preference store. Single key.
pub const CHANNEL_SETTINGS_KEY: &str = "zoomChannelSettings";

/// Key for the meeting-to-post mapping of `meeting_id`.
///
/// Meeting UUIDs can contain `/` and `=`; the id is percent-escaped so the
/// key stays unambiguous under any substrate.
pub fn meeting_post_key(meeting_id: &str) -> String {
    format!("{MEETING_POST_PREFIX}{}", urlencoding::encode(meeting_id))
}

/// Key for the OAuth handshake state of `user_id`.
pub fn handshake_key(user_id: &str) -> String {
    format!("{HANDSHAKE_PREFIX}{user_id}")
}

/// Key for the credential record of host-platform user `user_id`.
pub fn credential_by_user_key(user_id: &str) -> String {
    format!("{CREDENTIAL_BY_USER_PREFIX}{user_id}")
}

/// Key for the credential record of remote-service user `remote_id`.
pub fn credential_by_remote_key(remote_id: &str) -> String {
    format!("{CREDENTIAL_BY_REMOTE_PREFIX}{remote_id}")
}
