// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory collaborator doubles shared by the meetsync test suites.

mod kv;
mod posts;

pub use kv::MemoryKv;
pub use posts::RecordingPostApi;
