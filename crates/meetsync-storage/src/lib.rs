// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the key-value substrate.
//!
//! Used by the standalone binary; a plugin embedding meetsync inside a host
//! platform would supply the host's own store instead.

pub mod database;
pub mod kv;

pub use database::Database;
pub use kv::SqliteKv;
