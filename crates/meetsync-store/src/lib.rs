// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence layer for the meetsync bridge.
//!
//! Everything here sits on top of the [`KvStore`](meetsync_core::traits::KvStore)
//! substrate: credentials (dual-indexed, access token encrypted at rest),
//! short-lived handshake state, meeting-to-post mappings, and the per-channel
//! preference map.

pub mod channels;
pub mod credentials;
pub mod ephemeral;
pub mod keys;

pub use channels::{ChannelPreference, ChannelPreferences, Preference};
pub use credentials::{CredentialRecord, CredentialStore};
pub use ephemeral::{EphemeralStore, HandshakeState};
