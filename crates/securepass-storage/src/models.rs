// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Row types as they sit on disk.
//!
//! Credential columns hold ciphertext tokens; turning them into
//! [`securepass_core::CredentialEntry`] values is the vault crate's job.

use securepass_core::EntryId;

/// The singleton master passphrase record.
#[derive(Clone, PartialEq, Eq)]
pub struct MasterAuthRecord {
    /// Argon2id PHC string (embeds its own salt and cost).
    pub password_hash: String,
    /// PBKDF2 salt for the field encryption key.
    pub encryption_salt: Vec<u8>,
    /// PBKDF2 iteration count the key is derived with.
    pub kdf_iterations: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl std::fmt::Debug for MasterAuthRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterAuthRecord")
            .field("password_hash", &"[REDACTED]")
            .field("encryption_salt_len", &self.encryption_salt.len())
            .field("kdf_iterations", &self.kdf_iterations)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// The four encrypted columns of a credential row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedFields {
    pub service: String,
    pub username: String,
    pub password: String,
    pub notes: String,
}

/// A credential row with its fields still encrypted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub id: EntryId,
    pub fields: EncryptedFields,
    pub created_at: String,
    pub updated_at: String,
}
