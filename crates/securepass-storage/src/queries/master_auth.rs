// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master passphrase record operations.

use rusqlite::{Connection, OptionalExtension, params};
use securepass_core::SecurePassError;

use crate::database::map_sql_err;
use crate::models::MasterAuthRecord;

/// Whether the vault has a master passphrase set.
pub fn exists(conn: &Connection) -> Result<bool, SecurePassError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM master_auth", [], |row| row.get(0))
        .map_err(map_sql_err)?;
    Ok(count > 0)
}

/// Read the singleton record, if any.
pub fn get(conn: &Connection) -> Result<Option<MasterAuthRecord>, SecurePassError> {
    conn.query_row(
        "SELECT password_hash, encryption_salt, kdf_iterations, created_at, updated_at
         FROM master_auth WHERE id = 1",
        [],
        |row| {
            Ok(MasterAuthRecord {
                password_hash: row.get(0)?,
                encryption_salt: row.get(1)?,
                kdf_iterations: row.get(2)?,
                created_at: row.get(3)?,
                updated_at: row.get(4)?,
            })
        },
    )
    .optional()
    .map_err(map_sql_err)
}

/// Insert the singleton record. Fails if one already exists.
pub fn insert(conn: &Connection, record: &MasterAuthRecord) -> Result<(), SecurePassError> {
    conn.execute(
        "INSERT INTO master_auth
            (id, password_hash, encryption_salt, kdf_iterations, created_at, updated_at)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)",
        params![
            record.password_hash,
            record.encryption_salt,
            record.kdf_iterations,
            record.created_at,
            record.updated_at,
        ],
    )
    .map_err(map_sql_err)?;
    Ok(())
}

/// Replace hash, salt and iteration count (passphrase rotation).
///
/// `created_at` is left untouched. Returns `false` if no record exists.
pub fn replace(conn: &Connection, record: &MasterAuthRecord) -> Result<bool, SecurePassError> {
    let changed = conn
        .execute(
            "UPDATE master_auth
             SET password_hash = ?1, encryption_salt = ?2, kdf_iterations = ?3, updated_at = ?4
             WHERE id = 1",
            params![
                record.password_hash,
                record.encryption_salt,
                record.kdf_iterations,
                record.updated_at,
            ],
        )
        .map_err(map_sql_err)?;
    Ok(changed > 0)
}
