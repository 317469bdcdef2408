// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./meetsync.toml` > `~/.config/meetsync/meetsync.toml`
//! > `/etc/meetsync/meetsync.toml` with environment variable overrides via
//! `MEETSYNC_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::MeetsyncConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/meetsync/meetsync.toml` (system-wide)
/// 3. `~/.config/meetsync/meetsync.toml` (user XDG config)
/// 4. `./meetsync.toml` (local directory)
/// 5. `MEETSYNC_*` environment variables
pub fn load_config() -> Result<MeetsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MeetsyncConfig::default()))
        .merge(Toml::file("/etc/meetsync/meetsync.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("meetsync/meetsync.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("meetsync.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<MeetsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MeetsyncConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<MeetsyncConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(MeetsyncConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `MEETSYNC_BRIDGE_WEBHOOK_SECRET` must
/// map to `bridge.webhook_secret`, not `bridge.webhook.secret`.
fn env_provider() -> Env {
    Env::prefixed("MEETSYNC_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("server_", "server.", 1)
            .replacen("bridge_", "bridge.", 1);
        mapped.into()
    })
}
