// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field encryption engine holding the session key.

use securepass_core::SecurePassError;

use crate::crypto;
use crate::kdf::DerivedKey;

/// Encrypts and decrypts credential fields for one unlocked session.
///
/// Starts uninitialized. [`setup`](Self::setup) installs a key and
/// [`clear`](Self::clear) drops it (the key zeroizes itself on drop).
#[derive(Debug, Default)]
pub struct EncryptionEngine {
    key: Option<DerivedKey>,
}

impl EncryptionEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install `key`, replacing any previous one.
    pub fn setup(&mut self, key: DerivedKey) {
        self.key = Some(key);
    }

    /// Forget the key.
    pub fn clear(&mut self) {
        self.key = None;
    }

    pub fn is_ready(&self) -> bool {
        self.key.is_some()
    }

    fn key(&self) -> Result<&DerivedKey, SecurePassError> {
        self.key
            .as_ref()
            .ok_or(SecurePassError::EncryptionNotInitialized)
    }

    /// Encrypt a UTF-8 string into a ciphertext token.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, SecurePassError> {
        crypto::seal_token(self.key()?.as_bytes(), plaintext.as_bytes())
    }

    /// Decrypt a token back to the original string.
    pub fn decrypt(&self, token: &str) -> Result<String, SecurePassError> {
        let bytes = crypto::open_token(self.key()?.as_bytes(), token)?;
        std::str::from_utf8(&bytes)
            .map(str::to_owned)
            .map_err(|_| SecurePassError::IntegrityViolation("plaintext is not valid UTF-8".to_string()))
    }
}
