// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic checks that serde attributes cannot express.

use crate::diagnostic::ConfigError;
use crate::model::{MIN_KDF_ITERATIONS, SecurePassConfig};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration.
///
/// Collects every problem instead of stopping at the first one.
pub fn validate_config(config: &SecurePassConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    if config.vault.kdf_iterations < MIN_KDF_ITERATIONS {
        fail(format!(
            "vault.kdf_iterations must be at least {MIN_KDF_ITERATIONS}, got {}",
            config.vault.kdf_iterations
        ));
    }

    // Argon2 requires at least 8 KiB per lane.
    let min_memory = 8 * config.vault.hash_parallelism.max(1);
    if config.vault.hash_memory_cost < min_memory {
        fail(format!(
            "vault.hash_memory_cost must be at least {min_memory} KiB, got {}",
            config.vault.hash_memory_cost
        ));
    }

    if config.vault.hash_iterations < 1 {
        fail("vault.hash_iterations must be at least 1".to_string());
    }

    if config.vault.hash_parallelism < 1 {
        fail("vault.hash_parallelism must be at least 1".to_string());
    }

    if config.audit.default_limit < 1 {
        fail("audit.default_limit must be at least 1".to_string());
    }

    let level = config.logging.level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        fail(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        ));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
