// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the meetsync bridge.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, environment variable
//! overrides, miette diagnostic rendering, and the guarded snapshot store
//! every other component reads its active configuration through.

pub mod diagnostic;
pub mod loader;
pub mod model;
pub mod store;
pub mod validation;

pub use diagnostic::{ConfigError, render_errors};
pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{Configuration, MeetsyncConfig};
pub use store::ConfigStore;
pub use validation::{validate_bridge, validate_config};

/// Load configuration from the XDG hierarchy and validate it.
///
/// The high-level entry point: loads TOML files + env vars via Figment, then
/// runs post-deserialization validation. Parse failures are converted into
/// diagnostics rather than a bare figment error.
pub fn load_and_validate() -> Result<MeetsyncConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}

/// Load configuration from a TOML string and validate it.
pub fn load_and_validate_str(toml_content: &str) -> Result<MeetsyncConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(diagnostic::figment_to_config_errors(err)),
    }
}
