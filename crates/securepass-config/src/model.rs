// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for SecurePass.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a misspelled key is an
//! error at startup instead of a silently ignored setting.

use serde::{Deserialize, Serialize};

/// Default PBKDF2-HMAC-SHA256 iteration count for new vaults.
///
/// Raise this as hardware improves. Existing vaults keep the count they were
/// created with because it is persisted alongside the salt.
pub const PBKDF2_ITERATIONS: u32 = 600_000;

/// Lowest PBKDF2 iteration count accepted by validation.
pub const MIN_KDF_ITERATIONS: u32 = 100_000;

/// Top-level SecurePass configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SecurePassConfig {
    /// Vault file settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Key derivation and passphrase hashing costs.
    #[serde(default)]
    pub vault: VaultConfig,

    /// Activity log settings.
    #[serde(default)]
    pub audit: AuditConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vault file configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite vault file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL mode. Off by default so the vault stays a single file
    /// between operations.
    #[serde(default)]
    pub wal_mode: bool,

    /// How long a write waits for a competing process before failing.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: false,
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("securepass").join("passwords.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("passwords.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

/// Cost parameters for the two password-based primitives.
///
/// `kdf_iterations` drives PBKDF2 (encryption key); the `hash_*` fields drive
/// Argon2id (passphrase verification hash).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct VaultConfig {
    /// PBKDF2-HMAC-SHA256 iterations for newly created keys.
    #[serde(default = "default_kdf_iterations")]
    pub kdf_iterations: u32,

    /// Argon2id memory cost in KiB (default: 19456 = 19 MiB).
    #[serde(default = "default_hash_memory_cost")]
    pub hash_memory_cost: u32,

    /// Argon2id iteration count.
    #[serde(default = "default_hash_iterations")]
    pub hash_iterations: u32,

    /// Argon2id parallelism lanes.
    #[serde(default = "default_hash_parallelism")]
    pub hash_parallelism: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            kdf_iterations: default_kdf_iterations(),
            hash_memory_cost: default_hash_memory_cost(),
            hash_iterations: default_hash_iterations(),
            hash_parallelism: default_hash_parallelism(),
        }
    }
}

fn default_kdf_iterations() -> u32 {
    PBKDF2_ITERATIONS
}

fn default_hash_memory_cost() -> u32 {
    19456 // OWASP minimum for Argon2id
}

fn default_hash_iterations() -> u32 {
    2
}

fn default_hash_parallelism() -> u32 {
    1
}

/// Activity log configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Number of events returned when the caller does not pass a limit.
    #[serde(default = "default_audit_limit")]
    pub default_limit: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_limit: default_audit_limit(),
        }
    }
}

fn default_audit_limit() -> usize {
    50
}

/// Log output configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = SecurePassConfig::default();
        assert_eq!(config.vault.kdf_iterations, PBKDF2_ITERATIONS);
        assert!(config.storage.database_path.ends_with("passwords.db"));
        assert!(!config.storage.wal_mode);
        assert_eq!(config.audit.default_limit, 50);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: SecurePassConfig = toml::from_str("").unwrap();
        assert_eq!(config.vault.hash_memory_cost, 19456);
        assert_eq!(config.storage.busy_timeout_ms, 5000);
    }
}
