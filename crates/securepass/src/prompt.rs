// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Passphrase acquisition via TTY prompt or environment variable.

use secrecy::SecretString;
use securepass_core::SecurePassError;

/// Environment variable holding the master passphrase.
pub const VAULT_KEY_ENV_VAR: &str = "SECUREPASS_VAULT_KEY";

/// Environment variable holding the replacement passphrase for `passwd`.
pub const NEW_VAULT_KEY_ENV_VAR: &str = "SECUREPASS_NEW_VAULT_KEY";

fn from_env(var: &str) -> Option<SecretString> {
    std::env::var(var)
        .ok()
        .filter(|key| !key.is_empty())
        .map(SecretString::from)
}

fn is_interactive() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdin())
}

fn read_hidden(label: &str) -> Result<String, SecurePassError> {
    eprint!("{label}: ");
    rpassword::read_password()
        .map_err(|e| SecurePassError::InvalidInput(format!("failed to read {label}: {e}")))
}

fn no_source(var: &str) -> SecurePassError {
    SecurePassError::InvalidInput(format!(
        "no passphrase provided: set {var} or run interactively"
    ))
}

/// Master passphrase from `SECUREPASS_VAULT_KEY` or an interactive prompt.
pub fn get_vault_passphrase() -> Result<SecretString, SecurePassError> {
    if let Some(key) = from_env(VAULT_KEY_ENV_VAR) {
        return Ok(key);
    }
    if is_interactive() {
        let passphrase = read_hidden("Master passphrase")?;
        if passphrase.is_empty() {
            return Err(SecurePassError::InvalidInput(
                "empty passphrase not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(passphrase));
    }
    Err(no_source(VAULT_KEY_ENV_VAR))
}

/// A new passphrase, typed twice when prompting.
///
/// `var` is checked first; environment values are taken as-is.
pub fn get_new_passphrase(var: &str) -> Result<SecretString, SecurePassError> {
    if let Some(key) = from_env(var) {
        return Ok(key);
    }
    if is_interactive() {
        let first = read_hidden("New master passphrase")?;
        let second = read_hidden("Confirm master passphrase")?;
        if first != second {
            return Err(SecurePassError::InvalidInput(
                "passphrases do not match".to_string(),
            ));
        }
        if first.is_empty() {
            return Err(SecurePassError::InvalidInput(
                "empty passphrase not allowed".to_string(),
            ));
        }
        return Ok(SecretString::from(first));
    }
    Err(no_source(var))
}

/// Prompt for a credential password without echo.
pub fn get_entry_password() -> Result<String, SecurePassError> {
    if !is_interactive() {
        return Err(SecurePassError::InvalidInput(
            "no password provided: pass --password or run interactively".to_string(),
        ));
    }
    read_hidden("Password")
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serial_test::serial;

    #[test]
    #[serial]
    fn passphrase_from_env_var() {
        // SAFETY: env mutation is serialized across tests.
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "test-passphrase") };
        let result = get_vault_passphrase();
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "test-passphrase");
    }

    #[test]
    #[serial]
    fn new_passphrase_reads_its_own_var() {
        unsafe { std::env::set_var(NEW_VAULT_KEY_ENV_VAR, "rotated") };
        let result = get_new_passphrase(NEW_VAULT_KEY_ENV_VAR);
        unsafe { std::env::remove_var(NEW_VAULT_KEY_ENV_VAR) };

        assert_eq!(result.unwrap().expose_secret(), "rotated");
    }

    #[test]
    #[serial]
    fn empty_env_var_is_ignored() {
        unsafe { std::env::set_var(VAULT_KEY_ENV_VAR, "") };
        // stdin is not a terminal under the test harness.
        let result = get_vault_passphrase();
        unsafe { std::env::remove_var(VAULT_KEY_ENV_VAR) };

        assert!(result.is_err());
    }
}
