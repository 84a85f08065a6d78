// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `/etc/securepass/securepass.toml`, then
//! `~/.config/securepass/securepass.toml`, then `./securepass.toml`, then
//! `SECUREPASS_*` environment variables.

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::SecurePassConfig;

/// File name looked up in every config directory.
pub const CONFIG_FILE_NAME: &str = "securepass.toml";

/// System-wide config location.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/securepass/securepass.toml";

/// Load configuration from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<SecurePassConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from an inline TOML string (no file lookup, no env).
pub fn load_config_from_str(toml_content: &str) -> Result<SecurePassConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SecurePassConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from one explicit file, plus env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<SecurePassConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(SecurePassConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment used by [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(SecurePassConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(user_config_path().unwrap_or_default()))
        .merge(Toml::file(CONFIG_FILE_NAME))
        .merge(env_provider())
}

/// `~/.config/securepass/securepass.toml`, if a config dir exists.
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("securepass").join(CONFIG_FILE_NAME))
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `SECUREPASS_STORAGE_DATABASE_PATH` into
/// `storage.database.path`; only the first segment names the section.
fn env_provider() -> Env {
    Env::prefixed("SECUREPASS_")
        .ignore(&["VAULT_KEY", "NEW_VAULT_KEY"])
        .map(|key| {
            let key = key.as_str().to_ascii_lowercase();
            for section in ["storage", "vault", "audit", "logging"] {
                if let Some(rest) = key
                    .strip_prefix(section)
                    .and_then(|rest| rest.strip_prefix('_'))
                {
                    return format!("{section}.{rest}").into();
                }
            }
            key.into()
        })
}
