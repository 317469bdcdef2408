// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guarded mutable configuration snapshot.
//!
//! Every write installs a whole new [`Configuration`] value; readers load
//! the current pointer without blocking each other or the writer. A reader
//! that obtained a snapshot before a write keeps a fully consistent,
//! possibly stale, view -- never a torn one.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use tracing::warn;

use crate::diagnostic::ConfigError;
use crate::model::Configuration;
use crate::validation::validate_bridge;

/// Holds the active bridge configuration snapshot.
#[derive(Default)]
pub struct ConfigStore {
    current: ArcSwapOption<Configuration>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active snapshot, or an empty default if never initialized.
    ///
    /// The returned snapshot is immutable; the active configuration may be
    /// replaced underneath the caller, but the value it holds never changes.
    pub fn get(&self) -> Arc<Configuration> {
        match self.current.load_full() {
            Some(config) => config,
            None => Arc::new(Configuration::default()),
        }
    }

    /// Installs a new snapshot.
    ///
    /// # Panics
    ///
    /// Panics if called with the exact `Arc` that is already active. That
    /// almost certainly means a snapshot was mutated in place instead of
    /// cloned, which would race readers; it is a programming error, not a
    /// recoverable condition.
    pub fn set(&self, next: Arc<Configuration>) {
        let current = self.current.load();
        if let Some(current) = current.as_ref()
            && Arc::ptr_eq(current, &next)
        {
            panic!("ConfigStore::set called with the configuration that is already active");
        }
        self.current.store(Some(next));
    }

    /// Handles an external configuration-change notification.
    ///
    /// Validates the decoded payload and installs it only when valid. On
    /// failure the previous snapshot stays active and the errors are
    /// returned so the host can disable the integration; the webhook surface
    /// independently refuses traffic while the active snapshot is invalid.
    pub fn on_change(&self, next: Configuration) -> Result<(), Vec<ConfigError>> {
        if let Err(errors) = validate_bridge(&next) {
            for error in &errors {
                warn!(%error, "rejecting configuration change");
            }
            return Err(errors);
        }
        self.set(Arc::new(next));
        Ok(())
    }

    /// Whether the active snapshot passes validation.
    ///
    /// The uninitialized default snapshot never does, so a bridge that was
    /// never configured refuses webhook traffic.
    pub fn is_configured(&self) -> bool {
        validate_bridge(&self.get()).is_ok()
    }
}
