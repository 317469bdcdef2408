// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Cryptographic primitives for meetsync.
//!
//! - [`codec`]: the AES-256-GCM secret codec used to encrypt credential
//!   access tokens at rest.
//! - [`signature`]: constant-time webhook secret comparison and the
//!   HMAC-SHA256 challenge hash for URL validation.
//!
//! Everything here is stateless and safe for concurrent use.

pub mod codec;
pub mod signature;

pub use codec::{KEY_LEN, decrypt, encrypt};
pub use signature::{challenge_hash, verify_shared_secret};
