// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the meetsync bridge.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

const DEFAULT_BASE_URL: &str = "https://zoom.us";
const DEFAULT_API_BASE_URL: &str = "https://api.zoom.us/v2";

/// Top-level meetsync configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MeetsyncConfig {
    /// HTTP server and storage settings for the standalone binary.
    #[serde(default)]
    pub server: ServerConfig,

    /// Bridge settings: auth mode, credentials, secrets.
    #[serde(default)]
    pub bridge: Configuration,
}

/// HTTP server and storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the SQLite database backing the key-value substrate.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_path: default_database_path(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8065
}

fn default_database_path() -> String {
    "meetsync.db".to_string()
}

/// The bridge configuration snapshot.
///
/// Replaced atomically as a whole whenever the external payload changes;
/// readers always observe a complete, self-consistent snapshot through
/// [`crate::store::ConfigStore`]. Fields named after the remote service's
/// persisted contract are part of the on-disk compatibility surface.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// Remote service base URL. Empty means the default.
    #[serde(default)]
    pub base_url: String,

    /// Remote API base URL. Empty means the default.
    #[serde(default)]
    pub api_base_url: String,

    /// Enables the legacy key/secret authentication mode. Mutually
    /// exclusive with `enable_oauth`.
    #[serde(default)]
    pub enable_legacy_auth: bool,

    /// API key for the legacy mode.
    #[serde(default)]
    pub api_key: String,

    /// API secret for the legacy mode.
    #[serde(default)]
    pub api_secret: String,

    /// Enables the OAuth authentication mode. Mutually exclusive with
    /// `enable_legacy_auth`.
    #[serde(default)]
    pub enable_oauth: bool,

    /// Whether the OAuth app is installed account-wide (one superuser token)
    /// rather than per user.
    #[serde(default)]
    pub account_level_app: bool,

    /// OAuth client id.
    #[serde(default)]
    pub oauth_client_id: String,

    /// OAuth client secret.
    #[serde(default)]
    pub oauth_client_secret: String,

    /// OAuth redirect URL override. Empty derives it from the host platform.
    #[serde(default)]
    pub oauth_redirect_url: String,

    /// 32-byte key encrypting stored access tokens.
    #[serde(default)]
    pub encryption_key: String,

    /// Shared secret authenticating inbound webhook deliveries.
    #[serde(default)]
    pub webhook_secret: String,
}

impl Configuration {
    /// The remote service base URL, defaulted when unset.
    pub fn base_url(&self) -> &str {
        let url = self.base_url.trim();
        if url.is_empty() { DEFAULT_BASE_URL } else { url }
    }

    /// The remote API base URL, defaulted when unset.
    pub fn api_base_url(&self) -> &str {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            DEFAULT_API_BASE_URL
        } else {
            url
        }
    }

    /// Fill in generated secrets where none are configured.
    ///
    /// Returns `true` when anything changed, so the caller knows to persist
    /// the updated payload back to its source.
    pub fn set_defaults(&mut self) -> Result<bool, meetsync_core::MeetsyncError> {
        let mut changed = false;
        if self.encryption_key.is_empty() {
            self.encryption_key = generate_secret()?;
            changed = true;
        }
        if self.webhook_secret.is_empty() {
            self.webhook_secret = generate_secret()?;
            changed = true;
        }
        Ok(changed)
    }
}

/// Generate a 32-character random secret from the system CSPRNG.
fn generate_secret() -> Result<String, meetsync_core::MeetsyncError> {
    use base64::Engine;
    use ring::rand::{SecureRandom, SystemRandom};

    let rng = SystemRandom::new();
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes)
        .map_err(|_| meetsync_core::MeetsyncError::Internal("CSPRNG unavailable".to_string()))?;

    let encoded = base64::engine::general_purpose::STANDARD_NO_PAD.encode(bytes);
    Ok(encoded[..32].to_string())
}
