// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication and encrypted-storage engine for the SecurePass vault.
//!
//! Two independent secrets come out of the master passphrase:
//! - an Argon2id PHC hash, stored, used only to verify the passphrase;
//! - a PBKDF2-HMAC-SHA256 key, never stored, used to AES-256-GCM encrypt
//!   every credential field.
//!
//! [`VaultSession`] is the entry point. Open it, `setup` or `unlock`, work,
//! then `lock`.

pub mod audit;
pub mod auth;
pub mod crypto;
pub mod engine;
pub mod export;
pub mod kdf;
pub mod session;
pub mod store;

pub use audit::{AuditAction, AuditLog};
pub use auth::{PassphraseAuthenticator, PassphraseHash};
pub use engine::EncryptionEngine;
pub use export::{EXPORT_FILE_EXTENSION, ExportContainer};
pub use kdf::DerivedKey;
pub use session::{VaultSession, mask_secret};
pub use store::{CredentialStore, EntryFields};
