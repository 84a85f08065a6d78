// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the SecurePass configuration system.

use securepass_config::{ConfigError, load_and_validate_str, load_config_from_str};

#[test]
fn full_toml_deserializes() {
    let toml = r#"
[storage]
database_path = "/tmp/vault.db"
wal_mode = true
busy_timeout_ms = 250

[vault]
kdf_iterations = 650000
hash_memory_cost = 32768
hash_iterations = 3
hash_parallelism = 2

[audit]
default_limit = 20

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.storage.database_path, "/tmp/vault.db");
    assert!(config.storage.wal_mode);
    assert_eq!(config.storage.busy_timeout_ms, 250);
    assert_eq!(config.vault.kdf_iterations, 650_000);
    assert_eq!(config.vault.hash_memory_cost, 32768);
    assert_eq!(config.vault.hash_iterations, 3);
    assert_eq!(config.vault.hash_parallelism, 2);
    assert_eq!(config.audit.default_limit, 20);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn unknown_key_suggests_correction() {
    let toml = r#"
[vault]
kdf_iteratons = 650000
"#;

    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key,
            suggestion,
            span,
            ..
        } => {
            assert_eq!(key, "kdf_iteratons");
            assert_eq!(suggestion.as_deref(), Some("kdf_iterations"));
            assert!(span.is_some(), "inline source should yield a span");
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let errors = load_and_validate_str("[theme]\nname = \"dark\"\n").unwrap_err();
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_is_reported() {
    let errors = load_and_validate_str("[storage]\nwal_mode = \"yes\"\n").unwrap_err();
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert_eq!(key, "storage.wal_mode"),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn weak_kdf_fails_validation() {
    let errors = load_and_validate_str("[vault]\nkdf_iterations = 1000\n").unwrap_err();
    assert!(
        errors
            .iter()
            .any(|e| e.to_string().contains("vault.kdf_iterations"))
    );
}
