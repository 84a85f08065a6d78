// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only activity log.
//!
//! Events are stored in plaintext. Details name services and files but never
//! carry passwords, notes or key material.

use rusqlite::Connection;
use securepass_core::{AuditEvent, SecurePassError};
use securepass_storage::{Database, queries, timestamp};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::warn;

/// What happened. Rendered as the human-readable label stored in the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr, EnumIter)]
pub enum AuditAction {
    #[strum(serialize = "Master password set")]
    MasterPasswordSet,
    #[strum(serialize = "Successful login")]
    SuccessfulLogin,
    #[strum(serialize = "Failed login attempt")]
    FailedLogin,
    #[strum(serialize = "Password added")]
    PasswordAdded,
    #[strum(serialize = "Password updated")]
    PasswordUpdated,
    #[strum(serialize = "Password deleted")]
    PasswordDeleted,
    #[strum(serialize = "Data exported")]
    DataExported,
    #[strum(serialize = "Data imported")]
    DataImported,
    #[strum(serialize = "Import failed")]
    ImportFailed,
    #[strum(serialize = "Master password changed")]
    MasterPasswordChanged,
    #[strum(serialize = "Failed passphrase change")]
    FailedPassphraseChange,
    #[strum(serialize = "Setting changed")]
    SettingChanged,
    #[strum(serialize = "Operation failed")]
    OperationFailed,
}

/// Append `action` on `conn`, typically an open transaction.
pub fn append_in(
    conn: &Connection,
    action: AuditAction,
    details: &str,
) -> Result<(), SecurePassError> {
    queries::audit::append(conn, action.as_ref(), details, &timestamp::now())
}

/// Read and write access to the audit table of one vault file.
#[derive(Debug, Clone, Copy)]
pub struct AuditLog<'a> {
    db: &'a Database,
}

impl<'a> AuditLog<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Durably append one event. Storage failure is returned to the caller.
    pub fn append(&self, action: AuditAction, details: &str) -> Result<(), SecurePassError> {
        append_in(self.db.connection(), action, details)
    }

    /// Best-effort append for error paths.
    ///
    /// A failure here is logged and swallowed so it never replaces the error
    /// that is already being reported.
    pub fn record_failure(&self, action: AuditAction, details: &str) {
        if let Err(e) = self.append(action, details) {
            warn!(action = %action, error = %e, "failed to write audit event");
        }
    }

    /// Up to `limit` events, most recent first.
    pub fn recent(&self, limit: usize) -> Result<Vec<AuditEvent>, SecurePassError> {
        queries::audit::recent(self.db.connection(), limit)
    }

    pub fn count(&self) -> Result<usize, SecurePassError> {
        queries::audit::count(self.db.connection())
    }
}
