// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault file connection management: PRAGMA setup, migrations, transactions.
//!
//! One `Database` owns one SQLite connection. All writes for a logical
//! operation go through a single transaction obtained from
//! [`Database::transaction`], so a crash never leaves a half-written record.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags, Transaction};
use securepass_config::model::StorageConfig;
use securepass_core::SecurePassError;
use tracing::{debug, info};

use crate::migrations;

/// An open vault file.
pub struct Database {
    conn: Connection,
    path: PathBuf,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

impl Database {
    /// Open (or create) the vault file at `path` and bring its schema up to date.
    pub fn open(path: impl AsRef<Path>, config: &StorageConfig) -> Result<Self, SecurePassError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(SecurePassError::storage)?;
        }

        let mut conn = Connection::open_with_flags(
            &path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(map_sql_err)?;

        configure(&conn, config)?;
        migrations::run_migrations(&mut conn)?;

        info!(path = %path.display(), wal = config.wal_mode, "vault file opened");
        Ok(Self { conn, path })
    }

    /// The underlying connection, for read queries.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction for one logical write operation.
    ///
    /// The connection is never shared across threads and transactions are
    /// never nested, so the unchecked variant is sound here.
    pub fn transaction(&self) -> Result<Transaction<'_>, SecurePassError> {
        self.conn.unchecked_transaction().map_err(map_sql_err)
    }

    /// Path of the vault file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Close the connection, surfacing any error from the final flush.
    pub fn close(self) -> Result<(), SecurePassError> {
        let path = self.path;
        self.conn.close().map_err(|(_, e)| map_sql_err(e))?;
        debug!(path = %path.display(), "vault file closed");
        Ok(())
    }
}

fn configure(conn: &Connection, config: &StorageConfig) -> Result<(), SecurePassError> {
    conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(map_sql_err)?;

    let mode = if config.wal_mode { "WAL" } else { "DELETE" };
    let applied: String = conn
        .pragma_update_and_check(None, "journal_mode", mode, |row| row.get(0))
        .map_err(map_sql_err)?;
    debug!(journal_mode = %applied, "journal mode set");

    conn.pragma_update(None, "synchronous", "FULL")
        .map_err(map_sql_err)?;
    conn.pragma_update(None, "foreign_keys", "ON")
        .map_err(map_sql_err)?;
    Ok(())
}

/// Convert a rusqlite error into [`SecurePassError::Storage`].
pub fn map_sql_err(e: rusqlite::Error) -> SecurePassError {
    SecurePassError::storage(e)
}
