// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! PBKDF2-HMAC-SHA256 key derivation from the master passphrase.
//!
//! The derived key only ever encrypts credential fields. Passphrase
//! verification uses a separate Argon2id hash (see [`crate::auth`]).

use std::num::NonZeroU32;

use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use securepass_core::SecurePassError;
use zeroize::Zeroizing;

/// Length of the derived AES-256 key.
pub const KEY_LEN: usize = 32;

/// Length of the per-vault encryption salt.
pub const SALT_LEN: usize = 32;

/// A passphrase-derived key. Zeroized on drop, never printed.
pub struct DerivedKey(Zeroizing<[u8; KEY_LEN]>);

impl DerivedKey {
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

/// Derive a 32-byte key from `passphrase` and `salt`.
///
/// Deterministic for identical inputs. Fails only on a salt of the wrong
/// length or a zero iteration count.
pub fn derive_key(
    passphrase: &[u8],
    salt: &[u8],
    iterations: u32,
) -> Result<DerivedKey, SecurePassError> {
    if salt.len() != SALT_LEN {
        return Err(SecurePassError::InvalidInput(format!(
            "encryption salt must be {SALT_LEN} bytes, got {}",
            salt.len()
        )));
    }
    let iterations = NonZeroU32::new(iterations).ok_or_else(|| {
        SecurePassError::InvalidInput("PBKDF2 iteration count must be non-zero".to_string())
    })?;

    let mut out = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        salt,
        passphrase,
        out.as_mut(),
    );
    Ok(DerivedKey(out))
}

/// Generate a random 32-byte encryption salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN], SecurePassError> {
    let rng = SystemRandom::new();
    let mut salt = [0u8; SALT_LEN];
    rng.fill(&mut salt)
        .map_err(|_| SecurePassError::Internal("failed to generate random salt".to_string()))?;
    Ok(salt)
}
