// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator trait definitions for the meetsync bridge.
//!
//! All traits use `#[async_trait]` for dynamic dispatch compatibility.

pub mod kv;
pub mod posts;
pub mod remote;

pub use kv::KvStore;
pub use posts::PostApi;
pub use remote::RemoteApi;
