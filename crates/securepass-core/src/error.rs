// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the SecurePass vault.
//!
//! A wrong passphrase and a missing entry are not errors: `unlock` reports the
//! former as `Ok(false)` and update/delete report the latter as `Ok(false)`.
//! Everything below is a genuine failure of the enclosing operation.

use thiserror::Error;

/// The error type shared by every SecurePass crate.
#[derive(Debug, Error)]
pub enum SecurePassError {
    /// The supplied master passphrase did not verify.
    #[error("authentication failed: invalid master passphrase")]
    AuthenticationFailed,

    /// A vault operation ran before a successful setup or unlock.
    ///
    /// This indicates a bug in the calling layer rather than a user error.
    #[error("encryption not initialized: the vault is locked")]
    EncryptionNotInitialized,

    /// A ciphertext token failed authentication or could not be parsed.
    #[error("integrity violation: {0}")]
    IntegrityViolation(String),

    /// The persistent medium was unavailable or a write failed.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An export container was malformed or came from a foreign format.
    #[error("import format error: {0}")]
    ImportFormat(String),

    /// Setup was requested on a vault that already has a master passphrase.
    #[error("vault is already initialized")]
    AlreadyInitialized,

    /// Unlock was requested on a vault that has no master passphrase yet.
    #[error("vault is not initialized: run setup first")]
    NotInitialized,

    /// Caller-supplied input was rejected before touching storage.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Configuration could not be loaded or failed validation.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors (CSPRNG failure, cipher construction).
    #[error("internal error: {0}")]
    Internal(String),
}

impl SecurePassError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Storage {
            source: Box::new(source),
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T, E = SecurePassError> = std::result::Result<T, E>;
