// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plaintext key/value settings.

use rusqlite::{Connection, OptionalExtension, params};
use securepass_core::SecurePassError;

use crate::database::map_sql_err;

pub fn get(conn: &Connection, key: &str) -> Result<Option<String>, SecurePassError> {
    conn.query_row(
        "SELECT value FROM settings WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(map_sql_err)
}

/// Insert or overwrite.
pub fn set(conn: &Connection, key: &str, value: &str) -> Result<(), SecurePassError> {
    conn.execute(
        "INSERT INTO settings (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .map_err(map_sql_err)?;
    Ok(())
}

/// All settings sorted by key.
pub fn list(conn: &Connection) -> Result<Vec<(String, String)>, SecurePassError> {
    let mut stmt = conn
        .prepare("SELECT key, value FROM settings ORDER BY key")
        .map_err(map_sql_err)?;
    let rows = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .map_err(map_sql_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_sql_err)?;
    Ok(rows)
}
