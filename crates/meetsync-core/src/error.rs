// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the meetsync bridge.
//!
//! Absence of a record is not an error anywhere in meetsync: lookups return
//! `Ok(None)` and callers branch on it. The variants here cover the failure
//! conditions that cannot be recovered locally.

use thiserror::Error;

/// The primary error type used across all meetsync crates.
#[derive(Debug, Error)]
pub enum MeetsyncError {
    /// Configuration errors (invalid mode combination, bad encryption key length,
    /// missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// A webhook delivery failed shared-secret verification. Terminal at the
    /// pipeline boundary; nothing is read or written after this.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// A malformed envelope or payload, rejected before any state lookup.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// A disconnect was requested for a user with no stored credential.
    /// Distinct from silent success so callers can tell a no-op from a real
    /// disconnect.
    #[error("user is not connected")]
    NotConnected,

    /// A stored record exists but cannot be decoded. Distinct from absence:
    /// "never connected" and "corrupt storage" drive different caller paths.
    #[error("corrupt record under key {key}")]
    Corrupt {
        key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The key-value substrate itself failed.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Encryption or decryption failed, e.g. after an encryption-key rotation.
    /// Callers prompt re-authentication instead of treating the user as
    /// connected with garbage data.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The remote API or post collaborator failed. Carries the collaborator's
    /// HTTP-style status code verbatim where one exists.
    #[error("upstream error: {message}")]
    Upstream { status: Option<u16>, message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl MeetsyncError {
    /// Wrap a substrate failure.
    pub fn storage(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        MeetsyncError::Storage {
            source: Box::new(source),
        }
    }

    /// Wrap an undecodable stored record.
    pub fn corrupt(key: &str, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        MeetsyncError::Corrupt {
            key: key.to_string(),
            source: Box::new(source),
        }
    }

    /// An upstream failure with the collaborator's status code, if any.
    pub fn upstream(status: Option<u16>, message: impl Into<String>) -> Self {
        MeetsyncError::Upstream {
            status,
            message: message.into(),
        }
    }
}
