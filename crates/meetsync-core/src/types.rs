// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared across the meetsync crates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A chat-side post as exposed by the host platform's post collaborator.
///
/// Meetsync treats posts as opaque beyond the fields it reads and writes:
/// the creation timestamp drives the meeting-duration calculation, and the
/// property bag carries the meeting status fields consumed by the webapp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post identifier assigned by the host platform.
    pub id: String,
    /// Channel the post was made in.
    pub channel_id: String,
    /// Display text of the post.
    pub message: String,
    /// Creation time in epoch milliseconds.
    pub create_at: i64,
    /// String-keyed property bag.
    #[serde(default)]
    pub props: serde_json::Map<String, serde_json::Value>,
}

impl Post {
    /// Read a string property, if present and a string.
    pub fn prop_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(|v| v.as_str())
    }
}

/// A meeting as returned by the remote conferencing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meeting {
    /// Numeric meeting identifier.
    pub id: i64,
    /// Per-occurrence meeting UUID. May contain `/` and `=`.
    pub uuid: String,
    /// Meeting topic.
    #[serde(default)]
    pub topic: String,
    /// URL participants use to join.
    #[serde(default)]
    pub join_url: String,
}

/// A user profile as returned by the remote conferencing API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteUser {
    /// Remote user identifier.
    pub id: String,
    /// Account email on the remote service.
    pub email: String,
    /// Personal meeting ID, zero when the account has none.
    #[serde(default)]
    pub pmi: i64,
}

/// An OAuth token issued by the remote service.
///
/// The access token is encrypted at rest by the credential store; in memory
/// it is always plaintext. The Debug impl redacts it.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Bearer access token.
    pub access_token: String,
    /// Refresh token, when the grant produced one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Access-token expiry time, when known.
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl std::fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"[redacted]")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "[redacted]"))
            .field("expiry", &self.expiry)
            .finish()
    }
}

impl OAuthToken {
    /// Whether the token has an expiry in the past.
    pub fn is_expired(&self) -> bool {
        match self.expiry {
            Some(expiry) => expiry <= Utc::now(),
            None => false,
        }
    }
}
