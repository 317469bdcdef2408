// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread; the `Database` struct IS the single writer. Do not create
//! additional `Connection` instances for the same file.

use meetsync_core::MeetsyncError;
use tokio_rusqlite::Connection;
use tracing::debug;

/// A single SQLite connection with meetsync's PRAGMA setup applied.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open (or create) the database at `path` and apply the PRAGMAs.
    pub async fn open(path: &str) -> Result<Self, MeetsyncError> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;
        conn.call(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode = WAL;
                 PRAGMA synchronous = NORMAL;
                 PRAGMA busy_timeout = 5000;
                 PRAGMA foreign_keys = ON;",
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)?;
        debug!(path, "opened SQLite database");
        Ok(Database { conn })
    }

    /// The underlying serialized connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Checkpoint the WAL. Called before shutdown.
    pub async fn checkpoint(&self) -> Result<(), MeetsyncError> {
        self.conn
            .call(|conn| {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        debug!("WAL checkpoint complete");
        Ok(())
    }
}

/// Convert a tokio-rusqlite error into the crate error type.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error) -> MeetsyncError {
    MeetsyncError::storage(e)
}
