// SPDX-FileCopyrightText: 2026 Meetsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite-backed [`KvStore`].
//!
//! One table, `kv(key, value, expires_at)`. Expiry is enforced here, at the
//! substrate: a row whose `expires_at` has passed reads as absent and is
//! deleted lazily on the read that finds it.

use async_trait::async_trait;
use chrono::Utc;
use meetsync_core::MeetsyncError;
use meetsync_core::traits::KvStore;
use rusqlite::params;

use crate::database::{Database, map_tr_err};

/// Key-value substrate stored in a single SQLite table.
pub struct SqliteKv {
    db: Database,
}

impl SqliteKv {
    /// Open the store at `path`, creating the table if needed.
    pub async fn open(path: &str) -> Result<Self, MeetsyncError> {
        let db = Database::open(path).await?;
        db.connection()
            .call(|conn| {
                conn.execute_batch(
                    "CREATE TABLE IF NOT EXISTS kv (
                         key        TEXT PRIMARY KEY,
                         value      BLOB NOT NULL,
                         expires_at INTEGER
                     );",
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(SqliteKv { db })
    }

    /// The underlying database, for checkpointing at shutdown.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Delete every expired row. Reads already treat expired rows as
    /// absent; this just reclaims space.
    pub async fn purge_expired(&self) -> Result<usize, MeetsyncError> {
        let now = Utc::now().timestamp();
        self.db
            .connection()
            .call(move |conn| {
                let purged = conn.execute(
                    "DELETE FROM kv WHERE expires_at IS NOT NULL AND expires_at <= ?1",
                    params![now],
                )?;
                Ok(purged)
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl KvStore for SqliteKv {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, MeetsyncError> {
        let key = key.to_string();
        let now = Utc::now().timestamp();
        self.db
            .connection()
            .call(move |conn| {
                let mut stmt =
                    conn.prepare("SELECT value, expires_at FROM kv WHERE key = ?1")?;
                let row = stmt.query_row(params![key], |row| {
                    Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Option<i64>>(1)?))
                });
                match row {
                    Ok((_, Some(expires_at))) if expires_at <= now => {
                        conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
                        Ok(None)
                    }
                    Ok((value, _)) => Ok(Some(value)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<(), MeetsyncError> {
        let key = key.to_string();
        let value = value.to_vec();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value, expires_at) VALUES (?1, ?2, NULL)
                     ON CONFLICT(key) DO UPDATE SET value = ?2, expires_at = NULL",
                    params![key, value],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &[u8],
        ttl_secs: u64,
    ) -> Result<(), MeetsyncError> {
        let key = key.to_string();
        let value = value.to_vec();
        let expires_at = Utc::now().timestamp() + ttl_secs as i64;
        self.db
            .connection()
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO kv (key, value, expires_at) VALUES (?1, ?2, ?3)
                     ON CONFLICT(key) DO UPDATE SET value = ?2, expires_at = ?3",
                    params![key, value, expires_at],
                )?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }

    async fn delete(&self, key: &str) -> Result<(), MeetsyncError> {
        let key = key.to_string();
        self.db
            .connection()
            .call(move |conn| {
                conn.execute("DELETE FROM kv WHERE key = ?1", params![key])?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}
