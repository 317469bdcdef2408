// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the meetsync bridge.
//!
//! This crate provides the error taxonomy, the collaborator traits for the
//! key-value substrate and the host/remote services, and the shared types
//! used throughout the meetsync workspace.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::MeetsyncError;
pub use traits::{KvStore, PostApi, RemoteApi};
pub use types::{Meeting, OAuthToken, Post, RemoteUser};
