// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Master passphrase verification with Argon2id.
//!
//! The stored hash is a PHC string carrying its own salt and cost, so a
//! vault created with older parameters still verifies after the config
//! changes.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use ring::rand::{SecureRandom, SystemRandom};
use securepass_config::model::VaultConfig;
use securepass_core::SecurePassError;

/// An Argon2id PHC string as stored in the master auth record.
#[derive(Clone, PartialEq, Eq)]
pub struct PassphraseHash(String);

/// Cost parameters embedded in a [`PassphraseHash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl PassphraseHash {
    /// Wrap a PHC string read back from storage. Not validated until used.
    pub fn from_stored(phc: impl Into<String>) -> Self {
        Self(phc.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Read the embedded Argon2 cost parameters.
    pub fn cost(&self) -> Result<HashCost, SecurePassError> {
        let parsed = self.parse()?;
        let params = Params::try_from(&parsed)
            .map_err(|e| SecurePassError::IntegrityViolation(format!("bad hash parameters: {e}")))?;
        Ok(HashCost {
            memory_kib: params.m_cost(),
            iterations: params.t_cost(),
            parallelism: params.p_cost(),
        })
    }

    fn parse(&self) -> Result<PasswordHash<'_>, SecurePassError> {
        PasswordHash::new(&self.0)
            .map_err(|e| SecurePassError::IntegrityViolation(format!("malformed passphrase hash: {e}")))
    }
}

impl std::fmt::Debug for PassphraseHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PassphraseHash([REDACTED])")
    }
}

/// Hashes and verifies the master passphrase.
#[derive(Debug, Clone)]
pub struct PassphraseAuthenticator {
    params: Params,
}

impl PassphraseAuthenticator {
    /// Build with the Argon2id cost from `config`.
    pub fn new(config: &VaultConfig) -> Result<Self, SecurePassError> {
        let params = Params::new(
            config.hash_memory_cost,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| SecurePassError::Config(format!("invalid Argon2id parameters: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash `passphrase` with a fresh random salt.
    pub fn hash(&self, passphrase: &str) -> Result<PassphraseHash, SecurePassError> {
        let mut salt_bytes = [0u8; 16];
        SystemRandom::new()
            .fill(&mut salt_bytes)
            .map_err(|_| SecurePassError::Internal("failed to generate hash salt".to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|e| SecurePassError::Internal(format!("salt encoding failed: {e}")))?;

        let hash = self
            .argon2()
            .hash_password(passphrase.as_bytes(), &salt)
            .map_err(|e| SecurePassError::Internal(format!("passphrase hashing failed: {e}")))?;
        Ok(PassphraseHash(hash.to_string()))
    }

    /// Check `passphrase` against a stored hash in constant time.
    ///
    /// Uses the cost embedded in `hash`, not the configured one. A hash that
    /// does not parse is an integrity violation rather than a mismatch.
    pub fn verify(&self, passphrase: &str, hash: &PassphraseHash) -> Result<bool, SecurePassError> {
        let parsed = hash.parse()?;
        match self.argon2().verify_password(passphrase.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(SecurePassError::IntegrityViolation(format!(
                "passphrase hash could not be verified: {e}"
            ))),
        }
    }
}
