// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM sealing into self-describing ciphertext tokens.
//!
//! Token layout before base64 (URL-safe alphabet, no padding):
//!
//! ```text
//! version (1) | nonce (12) | ciphertext | tag (16)
//! ```
//!
//! The version byte is authenticated as associated data. Every call to
//! [`seal_token`] draws a fresh random nonce; reusing one under the same key
//! would break GCM.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ring::aead::{AES_256_GCM, Aad, LessSafeKey, NONCE_LEN, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use securepass_core::SecurePassError;
use zeroize::Zeroizing;

use crate::kdf::KEY_LEN;

/// Current token format version.
pub const TOKEN_VERSION: u8 = 1;

const TAG_LEN: usize = 16;
const HEADER_LEN: usize = 1 + NONCE_LEN;

fn cipher(key: &[u8; KEY_LEN]) -> Result<LessSafeKey, SecurePassError> {
    let unbound = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| SecurePassError::Internal("failed to create AES-256-GCM key".to_string()))?;
    Ok(LessSafeKey::new(unbound))
}

/// Encrypt `plaintext` and encode it as a token.
pub fn seal_token(key: &[u8; KEY_LEN], plaintext: &[u8]) -> Result<String, SecurePassError> {
    let cipher = cipher(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    SystemRandom::new()
        .fill(&mut nonce_bytes)
        .map_err(|_| SecurePassError::Internal("failed to generate random nonce".to_string()))?;

    let mut buf = Vec::with_capacity(HEADER_LEN + plaintext.len() + TAG_LEN);
    buf.push(TOKEN_VERSION);
    buf.extend_from_slice(&nonce_bytes);
    let mut in_out = plaintext.to_vec();
    cipher
        .seal_in_place_append_tag(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::from([TOKEN_VERSION]),
            &mut in_out,
        )
        .map_err(|_| SecurePassError::Internal("AES-256-GCM encryption failed".to_string()))?;
    buf.extend_from_slice(&in_out);

    Ok(URL_SAFE_NO_PAD.encode(buf))
}

/// Decode and decrypt a token produced by [`seal_token`].
pub fn open_token(key: &[u8; KEY_LEN], token: &str) -> Result<Zeroizing<Vec<u8>>, SecurePassError> {
    let raw = URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|e| SecurePassError::IntegrityViolation(format!("token is not valid base64: {e}")))?;

    if raw.len() < HEADER_LEN + TAG_LEN {
        return Err(SecurePassError::IntegrityViolation(format!(
            "token truncated ({} bytes)",
            raw.len()
        )));
    }
    let version = raw[0];
    if version != TOKEN_VERSION {
        return Err(SecurePassError::IntegrityViolation(format!(
            "unknown token version {version}"
        )));
    }

    let mut nonce_bytes = [0u8; NONCE_LEN];
    nonce_bytes.copy_from_slice(&raw[1..HEADER_LEN]);
    let mut in_out = Zeroizing::new(raw[HEADER_LEN..].to_vec());

    let plaintext_len = cipher(key)?
        .open_in_place(
            Nonce::assume_unique_for_key(nonce_bytes),
            Aad::from([version]),
            in_out.as_mut_slice(),
        )
        .map_err(|_| {
            SecurePassError::IntegrityViolation(
                "authentication failed: wrong key or tampered data".to_string(),
            )
        })?
        .len();
    in_out.truncate(plaintext_len);
    Ok(in_out)
}
