// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! The bridge rules form a small state machine over the two authentication
//! mode flags: exactly one of legacy and OAuth must be enabled, and each
//! mode pulls in its own required fields. A snapshot failing these rules
//! never becomes visible to readers.

use crate::diagnostic::ConfigError;
use crate::model::{Configuration, MeetsyncConfig};

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MeetsyncConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.host must not be empty".to_string(),
        });
    }

    if config.server.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "server.database_path must not be empty".to_string(),
        });
    }

    collect_bridge_errors(&config.bridge, &mut errors);

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a bridge snapshot in isolation.
///
/// Used both at load time and as the per-request gate: a bridge whose
/// snapshot fails here must not serve webhook traffic.
pub fn validate_bridge(config: &Configuration) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    collect_bridge_errors(config, &mut errors);
    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

fn collect_bridge_errors(config: &Configuration, errors: &mut Vec<ConfigError>) {
    match (config.enable_legacy_auth, config.enable_oauth) {
        (true, true) => {
            errors.push(ConfigError::Validation {
                message: "bridge.enable_legacy_auth and bridge.enable_oauth are mutually \
                          exclusive; enable exactly one"
                    .to_string(),
            });
        }
        (false, false) => {
            errors.push(ConfigError::Validation {
                message: "no authentication mode enabled; set either \
                          bridge.enable_legacy_auth or bridge.enable_oauth"
                    .to_string(),
            });
        }
        (true, false) => {
            if config.api_key.is_empty() {
                errors.push(ConfigError::Validation {
                    message: "bridge.api_key is required in legacy auth mode".to_string(),
                });
            }
            if config.api_secret.is_empty() {
                errors.push(ConfigError::Validation {
                    message: "bridge.api_secret is required in legacy auth mode".to_string(),
                });
            }
        }
        (false, true) => {
            if config.oauth_client_id.is_empty() {
                errors.push(ConfigError::Validation {
                    message: "bridge.oauth_client_id is required in OAuth mode".to_string(),
                });
            }
            if config.oauth_client_secret.is_empty() {
                errors.push(ConfigError::Validation {
                    message: "bridge.oauth_client_secret is required in OAuth mode".to_string(),
                });
            }
            if config.encryption_key.is_empty() {
                errors.push(ConfigError::Validation {
                    message: "bridge.encryption_key is required in OAuth mode".to_string(),
                });
            }
        }
    }

    // The webhook surface needs a secret in every mode.
    if config.webhook_secret.is_empty() {
        errors.push(ConfigError::Validation {
            message: "bridge.webhook_secret must be configured".to_string(),
        });
    }

    // Fail fast on a bad key here rather than on the first encrypt call.
    if !config.encryption_key.is_empty()
        && config.encryption_key.len() != meetsync_crypto_key_len()
    {
        errors.push(ConfigError::Validation {
            message: format!(
                "bridge.encryption_key must be exactly {} bytes, got {}",
                meetsync_crypto_key_len(),
                config.encryption_key.len()
            ),
        });
    }
}

// Mirrors meetsync_crypto::KEY_LEN without a dependency cycle: the crypto
// crate depends on core only, and config must stay independent of it.
const fn meetsync_crypto_key_len() -> usize {
    32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_oauth() -> Configuration {
        Configuration {
            enable_oauth: true,
            oauth_client_id: "cid".into(),
            oauth_client_secret: "csecret".into(),
            encryption_key: "0123456789abcdef0123456789abcdef".into(),
            webhook_secret: "whsecret".into(),
            ..Default::default()
        }
    }

    fn valid_legacy() -> Configuration {
        Configuration {
            enable_legacy_auth: true,
            api_key: "key".into(),
            api_secret: "secret".into(),
            webhook_secret: "whsecret".into(),
            ..Default::default()
        }
    }

    #[test]
    fn exactly_one_mode_validates() {
        assert!(validate_bridge(&valid_oauth()).is_ok());
        assert!(validate_bridge(&valid_legacy()).is_ok());
    }

    #[test]
    fn both_modes_enabled_fails_with_exclusion_error() {
        let config = Configuration {
            enable_legacy_auth: true,
            ..valid_oauth()
        };
        let errors = validate_bridge(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("mutually exclusive"))
        );
    }

    #[test]
    fn neither_mode_enabled_fails_with_mode_error() {
        let errors = validate_bridge(&Configuration::default()).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("no authentication mode"))
        );
    }

    #[test]
    fn oauth_mode_requires_client_and_key_fields() {
        let config = Configuration {
            enable_oauth: true,
            webhook_secret: "s".into(),
            ..Default::default()
        };
        let errors = validate_bridge(&config).unwrap_err();
        let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(joined.iter().any(|m| m.contains("oauth_client_id")));
        assert!(joined.iter().any(|m| m.contains("oauth_client_secret")));
        assert!(joined.iter().any(|m| m.contains("encryption_key")));
    }

    #[test]
    fn legacy_mode_requires_key_and_secret() {
        let config = Configuration {
            enable_legacy_auth: true,
            webhook_secret: "s".into(),
            ..Default::default()
        };
        let errors = validate_bridge(&config).unwrap_err();
        let joined: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
        assert!(joined.iter().any(|m| m.contains("api_key")));
        assert!(joined.iter().any(|m| m.contains("api_secret")));
    }

    #[test]
    fn webhook_secret_required_in_every_mode() {
        let config = Configuration {
            webhook_secret: String::new(),
            ..valid_legacy()
        };
        let errors = validate_bridge(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("webhook_secret"))
        );
    }

    #[test]
    fn wrong_length_encryption_key_fails() {
        let config = Configuration {
            encryption_key: "too-short".into(),
            ..valid_oauth()
        };
        let errors = validate_bridge(&config).unwrap_err();
        assert!(
            errors
                .iter()
                .any(|e| e.to_string().contains("exactly 32 bytes"))
        );
    }

    #[test]
    fn full_config_validates_server_fields_too() {
        let config = MeetsyncConfig {
            server: crate::model::ServerConfig {
                host: " ".into(),
                port: 8065,
                database_path: String::new(),
            },
            bridge: valid_oauth(),
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
    }
}
