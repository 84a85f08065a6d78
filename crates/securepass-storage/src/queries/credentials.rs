// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential row CRUD. Values in and out are ciphertext tokens.

use rusqlite::{Connection, OptionalExtension, Row, params};
use securepass_core::{EntryId, SecurePassError};

use crate::database::map_sql_err;
use crate::models::{EncryptedFields, StoredEntry};

const SELECT_COLUMNS: &str =
    "SELECT id, service, username, password, notes, created_at, updated_at FROM credentials";

fn row_to_entry(row: &Row<'_>) -> rusqlite::Result<StoredEntry> {
    Ok(StoredEntry {
        id: row.get(0)?,
        fields: EncryptedFields {
            service: row.get(1)?,
            username: row.get(2)?,
            password: row.get(3)?,
            notes: row.get(4)?,
        },
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Insert a row with `created_at == updated_at == timestamp`.
pub fn insert(
    conn: &Connection,
    fields: &EncryptedFields,
    timestamp: &str,
) -> Result<EntryId, SecurePassError> {
    conn.execute(
        "INSERT INTO credentials (service, username, password, notes, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
        params![
            fields.service,
            fields.username,
            fields.password,
            fields.notes,
            timestamp,
        ],
    )
    .map_err(map_sql_err)?;
    Ok(conn.last_insert_rowid())
}

/// All rows in insertion order.
pub fn list(conn: &Connection) -> Result<Vec<StoredEntry>, SecurePassError> {
    let mut stmt = conn
        .prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))
        .map_err(map_sql_err)?;
    let rows = stmt
        .query_map([], row_to_entry)
        .map_err(map_sql_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_sql_err)?;
    Ok(rows)
}

/// One row by id.
pub fn get(conn: &Connection, id: EntryId) -> Result<Option<StoredEntry>, SecurePassError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        params![id],
        row_to_entry,
    )
    .optional()
    .map_err(map_sql_err)
}

/// The `updated_at` of one row, if it exists.
pub fn updated_at(conn: &Connection, id: EntryId) -> Result<Option<String>, SecurePassError> {
    conn.query_row(
        "SELECT updated_at FROM credentials WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
    .map_err(map_sql_err)
}

/// The encrypted service column of one row, if it exists.
pub fn service_token(conn: &Connection, id: EntryId) -> Result<Option<String>, SecurePassError> {
    conn.query_row(
        "SELECT service FROM credentials WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
    .map_err(map_sql_err)
}

/// Replace all four fields and set `updated_at`. Returns `false` if absent.
pub fn update(
    conn: &Connection,
    id: EntryId,
    fields: &EncryptedFields,
    updated_at: &str,
) -> Result<bool, SecurePassError> {
    let changed = conn
        .execute(
            "UPDATE credentials
             SET service = ?1, username = ?2, password = ?3, notes = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                fields.service,
                fields.username,
                fields.password,
                fields.notes,
                updated_at,
                id,
            ],
        )
        .map_err(map_sql_err)?;
    Ok(changed > 0)
}

/// Replace the four fields without touching timestamps (re-encryption).
pub fn rewrite(
    conn: &Connection,
    id: EntryId,
    fields: &EncryptedFields,
) -> Result<bool, SecurePassError> {
    let changed = conn
        .execute(
            "UPDATE credentials
             SET service = ?1, username = ?2, password = ?3, notes = ?4
             WHERE id = ?5",
            params![
                fields.service,
                fields.username,
                fields.password,
                fields.notes,
                id,
            ],
        )
        .map_err(map_sql_err)?;
    Ok(changed > 0)
}

/// Hard-delete one row. Returns `false` if absent.
pub fn delete(conn: &Connection, id: EntryId) -> Result<bool, SecurePassError> {
    let changed = conn
        .execute("DELETE FROM credentials WHERE id = ?1", params![id])
        .map_err(map_sql_err)?;
    Ok(changed > 0)
}

/// Number of rows.
pub fn count(conn: &Connection) -> Result<usize, SecurePassError> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM credentials", [], |row| row.get(0))
        .map_err(map_sql_err)?;
    Ok(n.max(0) as usize)
}
