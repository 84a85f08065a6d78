// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault session lifecycle: setup, unlock, lock, and every operation that
//! needs the derived key.
//!
//! The session owns the vault file, the encryption engine and a cache of
//! decrypted entries. Locking (or dropping the session) discards both the
//! key and the cache, each of which zeroizes its memory on drop.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use securepass_config::SecurePassConfig;
use securepass_config::model::VaultConfig;
use securepass_core::{AuditEvent, CredentialEntry, EntryId, SecurePassError};
use securepass_storage::database::map_sql_err;
use securepass_storage::{Database, MasterAuthRecord, queries, timestamp};
use tracing::{debug, info, warn};

use crate::audit::{AuditAction, AuditLog, append_in};
use crate::auth::{PassphraseAuthenticator, PassphraseHash};
use crate::engine::EncryptionEngine;
use crate::export::{self, ExportContainer};
use crate::kdf;
use crate::store::{CredentialStore, EntryFields};

/// An open vault file and, once unlocked, its session key.
pub struct VaultSession {
    db: Database,
    config: VaultConfig,
    authenticator: PassphraseAuthenticator,
    engine: EncryptionEngine,
    cache: Option<Vec<CredentialEntry>>,
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("path", &self.db.path())
            .field("unlocked", &self.engine.is_ready())
            .field("cached_entries", &self.cache.as_ref().map(Vec::len))
            .finish()
    }
}

impl VaultSession {
    /// Open the vault file named by `config.storage.database_path`.
    pub fn open(config: &SecurePassConfig) -> Result<Self, SecurePassError> {
        Self::open_path(&config.storage.database_path, config)
    }

    /// Open the vault file at `path`, creating it if needed. Starts locked.
    pub fn open_path(
        path: impl AsRef<Path>,
        config: &SecurePassConfig,
    ) -> Result<Self, SecurePassError> {
        let db = Database::open(path, &config.storage)?;
        let authenticator = PassphraseAuthenticator::new(&config.vault)?;
        Ok(Self {
            db,
            config: config.vault.clone(),
            authenticator,
            engine: EncryptionEngine::new(),
            cache: None,
        })
    }

    /// Path of the underlying vault file.
    pub fn path(&self) -> &Path {
        self.db.path()
    }

    /// Whether a master passphrase has been set.
    pub fn has_master_auth(&self) -> Result<bool, SecurePassError> {
        queries::master_auth::exists(self.db.connection())
    }

    pub fn is_unlocked(&self) -> bool {
        self.engine.is_ready()
    }

    fn audit(&self) -> AuditLog<'_> {
        AuditLog::new(&self.db)
    }

    fn store(&self) -> CredentialStore<'_> {
        CredentialStore::new(&self.db, &self.engine)
    }

    /// Set the master passphrase on a new vault and unlock it.
    pub fn setup(&mut self, passphrase: &SecretString) -> Result<(), SecurePassError> {
        let passphrase = passphrase.expose_secret();
        if passphrase.is_empty() {
            return Err(SecurePassError::InvalidInput(
                "master passphrase must not be empty".to_string(),
            ));
        }
        if self.has_master_auth()? {
            return Err(SecurePassError::AlreadyInitialized);
        }

        let hash = self.authenticator.hash(passphrase)?;
        let salt = kdf::generate_salt()?;
        let iterations = self.config.kdf_iterations;
        let key = kdf::derive_key(passphrase.as_bytes(), &salt, iterations)?;

        let now = timestamp::now();
        let record = MasterAuthRecord {
            password_hash: hash.as_str().to_string(),
            encryption_salt: salt.to_vec(),
            kdf_iterations: iterations,
            created_at: now.clone(),
            updated_at: now,
        };
        let tx = self.db.transaction()?;
        queries::master_auth::insert(&tx, &record)?;
        append_in(&tx, AuditAction::MasterPasswordSet, "")?;
        tx.commit().map_err(map_sql_err)?;

        self.engine.setup(key);
        info!(path = %self.db.path().display(), "vault created");
        Ok(())
    }

    /// Verify `passphrase` and, on success, derive the session key.
    ///
    /// A wrong passphrase returns `Ok(false)`, is audited, and locks the
    /// session, even one that was already unlocked.
    pub fn unlock(&mut self, passphrase: &SecretString) -> Result<bool, SecurePassError> {
        let record = queries::master_auth::get(self.db.connection())?
            .ok_or(SecurePassError::NotInitialized)?;
        let passphrase = passphrase.expose_secret();

        let hash = PassphraseHash::from_stored(record.password_hash.as_str());
        if !self.authenticator.verify(passphrase, &hash)? {
            self.lock();
            self.audit().append(AuditAction::FailedLogin, "")?;
            warn!("vault unlock failed: wrong passphrase");
            return Ok(false);
        }
        self.note_outdated_cost(&record, &hash);

        let key = kdf::derive_key(
            passphrase.as_bytes(),
            &record.encryption_salt,
            record.kdf_iterations,
        )
        .map_err(|e| match e {
            SecurePassError::InvalidInput(msg) => SecurePassError::IntegrityViolation(msg),
            other => other,
        })?;
        self.audit().append(AuditAction::SuccessfulLogin, "")?;
        self.cache = None;
        self.engine.setup(key);
        info!("vault unlocked");
        Ok(true)
    }

    /// Log when the vault was created with a lower cost than configured.
    /// Changing the passphrase rewrites both with the configured values.
    fn note_outdated_cost(&self, record: &MasterAuthRecord, hash: &PassphraseHash) {
        if record.kdf_iterations < self.config.kdf_iterations {
            info!(
                stored = record.kdf_iterations,
                configured = self.config.kdf_iterations,
                "vault key uses fewer PBKDF2 iterations than configured; change the passphrase to upgrade"
            );
        }
        match hash.cost() {
            Ok(cost)
                if cost.memory_kib < self.config.hash_memory_cost
                    || cost.iterations < self.config.hash_iterations =>
            {
                info!(
                    memory_kib = cost.memory_kib,
                    iterations = cost.iterations,
                    "passphrase hash is cheaper than configured; change the passphrase to upgrade"
                );
            }
            Ok(_) => {}
            Err(e) => debug!(error = %e, "could not read passphrase hash cost"),
        }
    }

    /// Discard the session key and the decrypted cache.
    pub fn lock(&mut self) {
        let was_unlocked = self.engine.is_ready();
        self.engine.clear();
        self.cache = None;
        if was_unlocked {
            info!("vault locked");
        }
    }

    /// Record a failed mutation without masking `err`.
    fn failed(&self, operation: &str, err: &SecurePassError) {
        self.audit().record_failure(
            AuditAction::OperationFailed,
            &format!("{operation}: {err}"),
        );
    }

    pub fn add_entry(
        &mut self,
        service: &str,
        username: &str,
        password: &str,
        notes: &str,
    ) -> Result<EntryId, SecurePassError> {
        let result = self.store().add(EntryFields {
            service,
            username,
            password,
            notes,
        });
        self.cache = None;
        result.inspect_err(|e| self.failed("Add entry", e))
    }

    /// Every entry in insertion order.
    pub fn get_all(&mut self) -> Result<Vec<CredentialEntry>, SecurePassError> {
        if let Some(cached) = self.cache.as_ref().filter(|_| self.engine.is_ready()) {
            return Ok(cached.clone());
        }
        let entries = self.store().get_all()?;
        self.cache = Some(entries.clone());
        debug!(count = entries.len(), "entries decrypted");
        Ok(entries)
    }

    /// One entry by id. Served from the cache when it is warm, otherwise only
    /// that row is decrypted.
    pub fn get_entry(&mut self, id: EntryId) -> Result<Option<CredentialEntry>, SecurePassError> {
        if let Some(cached) = self.cache.as_ref().filter(|_| self.engine.is_ready()) {
            return Ok(cached.iter().find(|e| e.id == id).cloned());
        }
        self.store().get(id)
    }

    /// Case-insensitive substring match on service or username.
    pub fn search(&mut self, query: &str) -> Result<Vec<CredentialEntry>, SecurePassError> {
        let needle = query.to_lowercase();
        let mut entries = self.get_all()?;
        entries.retain(|e| e.matches(&needle));
        Ok(entries)
    }

    pub fn update_entry(
        &mut self,
        id: EntryId,
        service: &str,
        username: &str,
        password: &str,
        notes: &str,
    ) -> Result<bool, SecurePassError> {
        let result = self.store().update(
            id,
            EntryFields {
                service,
                username,
                password,
                notes,
            },
        );
        self.cache = None;
        result.inspect_err(|e| self.failed("Update entry", e))
    }

    pub fn delete_entry(&mut self, id: EntryId) -> Result<bool, SecurePassError> {
        let result = self.store().delete(id);
        self.cache = None;
        result.inspect_err(|e| self.failed("Delete entry", e))
    }

    pub fn count(&self) -> Result<usize, SecurePassError> {
        if !self.engine.is_ready() {
            return Err(SecurePassError::EncryptionNotInitialized);
        }
        self.store().count()
    }

    /// Up to `limit` audit events, most recent first. Requires an unlocked
    /// session.
    pub fn recent_events(&self, limit: usize) -> Result<Vec<AuditEvent>, SecurePassError> {
        if !self.engine.is_ready() {
            return Err(SecurePassError::EncryptionNotInitialized);
        }
        self.audit().recent(limit)
    }

    /// Seal every entry into an export container.
    ///
    /// `destination` only labels the audit event.
    pub fn export(&self, destination: &str) -> Result<ExportContainer, SecurePassError> {
        let (container, count) = export::export(&self.db, &self.engine)?;
        self.audit().append(
            AuditAction::DataExported,
            &format!("File: {destination}, Entries: {count}"),
        )?;
        Ok(container)
    }

    /// Export to a file, written atomically. Returns the entry count.
    pub fn export_to_path(&self, path: &Path) -> Result<usize, SecurePassError> {
        let (container, count) = export::export(&self.db, &self.engine)?;
        export::write_container(path, &container)?;
        self.audit().append(
            AuditAction::DataExported,
            &format!("File: {}, Entries: {count}", path.display()),
        )?;
        info!(count, path = %path.display(), "vault exported");
        Ok(count)
    }

    /// Add every record of `container`. All-or-nothing.
    ///
    /// Failures are audited as "Import failed" naming `source`.
    pub fn import(
        &mut self,
        container: &ExportContainer,
        source: &str,
    ) -> Result<usize, SecurePassError> {
        let result = export::import(&self.db, &self.engine, container, source);
        self.cache = None;
        match result {
            Ok(count) => {
                info!(count, source, "vault imported");
                Ok(count)
            }
            Err(e) => {
                self.import_failed(source, &e);
                Err(e)
            }
        }
    }

    /// Read and import an export file.
    pub fn import_from_path(&mut self, path: &Path) -> Result<usize, SecurePassError> {
        let source = path.display().to_string();
        match export::read_container(path) {
            Ok(container) => self.import(&container, &source),
            Err(e) => {
                self.import_failed(&source, &e);
                Err(e)
            }
        }
    }

    fn import_failed(&self, source: &str, err: &SecurePassError) {
        warn!(source, error = %err, "import failed");
        self.audit().record_failure(
            AuditAction::ImportFailed,
            &format!("File: {source}, Error: {err}"),
        );
    }

    /// Rotate the master passphrase and re-encrypt every entry.
    ///
    /// Returns `false` if `current` does not verify. The new hash, salt and
    /// every re-encrypted entry commit in one transaction; the session only
    /// switches keys after that commit succeeds.
    pub fn change_passphrase(
        &mut self,
        current: &SecretString,
        new: &SecretString,
    ) -> Result<bool, SecurePassError> {
        if !self.engine.is_ready() {
            return Err(SecurePassError::EncryptionNotInitialized);
        }
        let new = new.expose_secret();
        if new.is_empty() {
            return Err(SecurePassError::InvalidInput(
                "master passphrase must not be empty".to_string(),
            ));
        }
        let record = queries::master_auth::get(self.db.connection())?
            .ok_or(SecurePassError::NotInitialized)?;
        let hash = PassphraseHash::from_stored(record.password_hash.as_str());
        if !self.authenticator.verify(current.expose_secret(), &hash)? {
            self.audit().append(AuditAction::FailedPassphraseChange, "")?;
            warn!("passphrase change rejected: current passphrase did not verify");
            return Ok(false);
        }

        let result = self.rotate(&record, new);
        self.cache = None;
        match result {
            Ok(next) => {
                self.engine = next;
                info!("master passphrase changed");
                Ok(true)
            }
            Err(e) => {
                self.failed("Change passphrase", &e);
                Err(e)
            }
        }
    }

    fn rotate(
        &self,
        previous: &MasterAuthRecord,
        new: &str,
    ) -> Result<EncryptionEngine, SecurePassError> {
        let entries = self.store().get_all()?;

        let salt = kdf::generate_salt()?;
        let iterations = self.config.kdf_iterations;
        let key = kdf::derive_key(new.as_bytes(), &salt, iterations)?;
        let mut next = EncryptionEngine::new();
        next.setup(key);
        let next_store = CredentialStore::new(&self.db, &next);

        let record = MasterAuthRecord {
            password_hash: self.authenticator.hash(new)?.as_str().to_string(),
            encryption_salt: salt.to_vec(),
            kdf_iterations: iterations,
            created_at: previous.created_at.clone(),
            updated_at: timestamp::after(&previous.updated_at),
        };

        let tx = self.db.transaction()?;
        queries::master_auth::replace(&tx, &record)?;
        for entry in &entries {
            let encrypted = next_store.encrypt_fields(EntryFields {
                service: &entry.service,
                username: &entry.username,
                password: &entry.password,
                notes: &entry.notes,
            })?;
            queries::credentials::rewrite(&tx, entry.id, &encrypted)?;
        }
        append_in(
            &tx,
            AuditAction::MasterPasswordChanged,
            &format!("Entries: {}", entries.len()),
        )?;
        tx.commit().map_err(map_sql_err)?;
        Ok(next)
    }

    /// Read one setting. Works while locked.
    pub fn get_setting(&self, key: &str) -> Result<Option<String>, SecurePassError> {
        queries::settings::get(self.db.connection(), key)
    }

    /// Insert or overwrite one setting. Works while locked.
    pub fn set_setting(&self, key: &str, value: &str) -> Result<(), SecurePassError> {
        if key.trim().is_empty() {
            return Err(SecurePassError::InvalidInput(
                "setting key must not be empty".to_string(),
            ));
        }
        let tx = self.db.transaction()?;
        queries::settings::set(&tx, key, value)?;
        append_in(&tx, AuditAction::SettingChanged, &format!("Key: {key}"))?;
        tx.commit().map_err(map_sql_err)?;
        Ok(())
    }

    /// All settings sorted by key. Works while locked.
    pub fn settings(&self) -> Result<Vec<(String, String)>, SecurePassError> {
        queries::settings::list(self.db.connection())
    }

    /// Lock and close the vault file.
    pub fn close(mut self) -> Result<(), SecurePassError> {
        self.lock();
        self.db.close()
    }
}

/// Mask a secret for display, e.g. `"hunt...ter2"`.
///
/// Shows up to four characters at each end. Values shorter than ten
/// characters are fully masked as `"****"`.
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count < 10 {
        return "****".to_string();
    }
    let prefix: String = value.chars().take(4).collect();
    let suffix: String = value.chars().skip(count - 4).collect();
    format!("{prefix}...{suffix}")
}
