// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Credential CRUD over encrypted rows.
//!
//! Every field is encrypted on its own with a fresh nonce. Each mutation and
//! its audit event commit in the same transaction.

use securepass_core::{CredentialEntry, EntryId, SecurePassError};
use securepass_storage::database::map_sql_err;
use securepass_storage::{Database, EncryptedFields, StoredEntry, queries, timestamp};
use tracing::debug;

use crate::audit::{AuditAction, append_in};
use crate::engine::EncryptionEngine;

/// Plaintext field values for an add or update.
#[derive(Clone, Copy)]
pub struct EntryFields<'a> {
    pub service: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub notes: &'a str,
}

impl std::fmt::Debug for EntryFields<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryFields")
            .field("service", &self.service)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Borrowed view tying a vault file to an encryption engine.
#[derive(Debug, Clone, Copy)]
pub struct CredentialStore<'a> {
    db: &'a Database,
    engine: &'a EncryptionEngine,
}

impl<'a> CredentialStore<'a> {
    pub fn new(db: &'a Database, engine: &'a EncryptionEngine) -> Self {
        Self { db, engine }
    }

    pub(crate) fn encrypt_fields(&self, fields: EntryFields<'_>) -> Result<EncryptedFields, SecurePassError> {
        if !self.engine.is_ready() {
            return Err(SecurePassError::EncryptionNotInitialized);
        }
        if fields.service.trim().is_empty() {
            return Err(SecurePassError::InvalidInput(
                "service name must not be empty".to_string(),
            ));
        }
        Ok(EncryptedFields {
            service: self.engine.encrypt(fields.service)?,
            username: self.engine.encrypt(fields.username)?,
            password: self.engine.encrypt(fields.password)?,
            notes: self.engine.encrypt(fields.notes)?,
        })
    }

    fn decrypt_row(&self, row: &StoredEntry) -> Result<CredentialEntry, SecurePassError> {
        Ok(CredentialEntry {
            id: row.id,
            service: self.engine.decrypt(&row.fields.service)?,
            username: self.engine.decrypt(&row.fields.username)?,
            password: self.engine.decrypt(&row.fields.password)?,
            notes: self.engine.decrypt(&row.fields.notes)?,
            created_at: row.created_at.clone(),
            updated_at: row.updated_at.clone(),
        })
    }

    /// Add a new entry and return its id.
    pub fn add(&self, fields: EntryFields<'_>) -> Result<EntryId, SecurePassError> {
        let encrypted = self.encrypt_fields(fields)?;
        let tx = self.db.transaction()?;
        let id = queries::credentials::insert(&tx, &encrypted, &timestamp::now())?;
        append_in(
            &tx,
            AuditAction::PasswordAdded,
            &format!("Service: {}", fields.service),
        )?;
        tx.commit().map_err(map_sql_err)?;
        debug!(id, "entry added");
        Ok(id)
    }

    /// All entries in insertion order.
    ///
    /// One field failing to decrypt fails the whole call.
    pub fn get_all(&self) -> Result<Vec<CredentialEntry>, SecurePassError> {
        if !self.engine.is_ready() {
            return Err(SecurePassError::EncryptionNotInitialized);
        }
        queries::credentials::list(self.db.connection())?
            .iter()
            .map(|row| self.decrypt_row(row))
            .collect()
    }

    pub fn get(&self, id: EntryId) -> Result<Option<CredentialEntry>, SecurePassError> {
        if !self.engine.is_ready() {
            return Err(SecurePassError::EncryptionNotInitialized);
        }
        queries::credentials::get(self.db.connection(), id)?
            .map(|row| self.decrypt_row(&row))
            .transpose()
    }

    /// Case-insensitive substring search on service and username.
    pub fn search(&self, query: &str) -> Result<Vec<CredentialEntry>, SecurePassError> {
        let needle = query.to_lowercase();
        let mut entries = self.get_all()?;
        entries.retain(|e| e.matches(&needle));
        Ok(entries)
    }

    /// Replace all fields of `id`. Returns `false` if the entry does not exist.
    pub fn update(&self, id: EntryId, fields: EntryFields<'_>) -> Result<bool, SecurePassError> {
        let encrypted = self.encrypt_fields(fields)?;
        let tx = self.db.transaction()?;
        let Some(previous) = queries::credentials::updated_at(&tx, id)? else {
            return Ok(false);
        };
        let updated_at = timestamp::after(&previous);
        queries::credentials::update(&tx, id, &encrypted, &updated_at)?;
        append_in(
            &tx,
            AuditAction::PasswordUpdated,
            &format!("Service: {}", fields.service),
        )?;
        tx.commit().map_err(map_sql_err)?;
        debug!(id, "entry updated");
        Ok(true)
    }

    /// Permanently remove `id`. Returns `false` if it does not exist.
    pub fn delete(&self, id: EntryId) -> Result<bool, SecurePassError> {
        if !self.engine.is_ready() {
            return Err(SecurePassError::EncryptionNotInitialized);
        }
        let tx = self.db.transaction()?;
        let Some(service_token) = queries::credentials::service_token(&tx, id)? else {
            return Ok(false);
        };
        let service = self.engine.decrypt(&service_token)?;
        queries::credentials::delete(&tx, id)?;
        append_in(
            &tx,
            AuditAction::PasswordDeleted,
            &format!("Service: {service}"),
        )?;
        tx.commit().map_err(map_sql_err)?;
        debug!(id, "entry deleted");
        Ok(true)
    }

    pub fn count(&self) -> Result<usize, SecurePassError> {
        queries::credentials::count(self.db.connection())
    }
}
