// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the vault, storage and CLI crates.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Row identifier of a credential entry. Assigned by storage, never reused.
pub type EntryId = i64;

/// A decrypted credential entry.
///
/// Only ever exists inside an unlocked session. The plaintext fields are
/// wiped when the value is dropped, and `Debug` never prints the password.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CredentialEntry {
    pub id: EntryId,
    pub service: String,
    pub username: String,
    pub password: String,
    pub notes: String,
    /// ISO 8601 UTC timestamp with microsecond precision.
    pub created_at: String,
    /// ISO 8601 UTC timestamp; strictly increases on every update.
    pub updated_at: String,
}

impl CredentialEntry {
    /// Case-insensitive substring match on service or username.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.service.to_lowercase().contains(needle) || self.username.to_lowercase().contains(needle)
    }
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("id", &self.id)
            .field("service", &self.service)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("notes_len", &self.notes.len())
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// One row of the append-only audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Short human-readable label, e.g. "Password added".
    pub action: String,
    /// Non-secret context.
    pub details: String,
    pub timestamp: String,
}
