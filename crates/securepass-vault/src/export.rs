// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Encrypted export containers.
//!
//! The whole record set is serialized to JSON and sealed as ONE ciphertext
//! token under the session key, then wrapped in a small plaintext envelope:
//!
//! ```json
//! { "format": "securepass-export", "version": 1, "data": "<token>" }
//! ```
//!
//! Import is strictly additive and all-or-nothing.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use securepass_core::{CredentialEntry, SecurePassError};
use securepass_storage::database::map_sql_err;
use securepass_storage::{Database, queries, timestamp};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::audit::{AuditAction, append_in};
use crate::engine::EncryptionEngine;
use crate::store::{CredentialStore, EntryFields};

/// Marker identifying a SecurePass export.
pub const EXPORT_FORMAT: &str = "securepass-export";

/// Current container version.
pub const EXPORT_VERSION: u32 = 1;

/// Conventional file extension for export files.
pub const EXPORT_FILE_EXTENSION: &str = ".spx";

/// The plaintext envelope written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportContainer {
    pub format: String,
    pub version: u32,
    /// Ciphertext token of the JSON-encoded [`ExportDocument`].
    pub data: String,
}

impl ExportContainer {
    pub fn to_json(&self) -> Result<String, SecurePassError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SecurePassError::Internal(format!("export serialization failed: {e}")))
    }

    /// Parse and check the envelope. Does not decrypt.
    pub fn from_json(json: &str) -> Result<Self, SecurePassError> {
        let container: Self = serde_json::from_str(json)
            .map_err(|e| SecurePassError::ImportFormat(format!("not an export container: {e}")))?;
        container.check()?;
        Ok(container)
    }

    fn check(&self) -> Result<(), SecurePassError> {
        if self.format != EXPORT_FORMAT {
            return Err(SecurePassError::ImportFormat(format!(
                "unexpected format marker {:?}",
                self.format
            )));
        }
        if self.version != EXPORT_VERSION {
            return Err(SecurePassError::ImportFormat(format!(
                "unsupported export version {}",
                self.version
            )));
        }
        Ok(())
    }
}

/// Decrypted payload of a container. Wiped on drop.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ExportDocument {
    pub passwords: Vec<ExportRecord>,
    pub exported_at: String,
}

/// One credential inside an [`ExportDocument`].
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ExportRecord {
    pub service: String,
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl From<&CredentialEntry> for ExportRecord {
    fn from(entry: &CredentialEntry) -> Self {
        Self {
            service: entry.service.clone(),
            username: entry.username.clone(),
            password: entry.password.clone(),
            notes: entry.notes.clone(),
            created_at: entry.created_at.clone(),
            updated_at: entry.updated_at.clone(),
        }
    }
}

/// Seal every entry into a container. Returns it with the entry count.
pub fn export(
    db: &Database,
    engine: &EncryptionEngine,
) -> Result<(ExportContainer, usize), SecurePassError> {
    let entries = CredentialStore::new(db, engine).get_all()?;
    let document = ExportDocument {
        passwords: entries.iter().map(ExportRecord::from).collect(),
        exported_at: timestamp::now(),
    };
    let json = Zeroizing::new(
        serde_json::to_string(&document)
            .map_err(|e| SecurePassError::Internal(format!("export serialization failed: {e}")))?,
    );
    let container = ExportContainer {
        format: EXPORT_FORMAT.to_string(),
        version: EXPORT_VERSION,
        data: engine.encrypt(&json)?,
    };
    Ok((container, entries.len()))
}

/// Decrypt `container` and add every record in one transaction.
///
/// Each record gets fresh ids and timestamps and its own "Password added"
/// event. A final "Data imported" event names `source`. On any error nothing
/// is added; logging the failure is left to the caller.
pub fn import(
    db: &Database,
    engine: &EncryptionEngine,
    container: &ExportContainer,
    source: &str,
) -> Result<usize, SecurePassError> {
    if !engine.is_ready() {
        return Err(SecurePassError::EncryptionNotInitialized);
    }
    container.check()?;

    let json = Zeroizing::new(engine.decrypt(&container.data)?);
    let document: ExportDocument = serde_json::from_str(&json)
        .map_err(|e| SecurePassError::ImportFormat(format!("export payload is malformed: {e}")))?;

    let store = CredentialStore::new(db, engine);
    let tx = db.transaction()?;
    let now = timestamp::now();
    for record in &document.passwords {
        let encrypted = store
            .encrypt_fields(EntryFields {
                service: &record.service,
                username: &record.username,
                password: &record.password,
                notes: &record.notes,
            })
            .map_err(|e| match e {
                SecurePassError::InvalidInput(msg) => {
                    SecurePassError::ImportFormat(format!("invalid export record: {msg}"))
                }
                other => other,
            })?;
        queries::credentials::insert(&tx, &encrypted, &now)?;
        append_in(
            &tx,
            AuditAction::PasswordAdded,
            &format!("Service: {}", record.service),
        )?;
    }
    let count = document.passwords.len();
    append_in(
        &tx,
        AuditAction::DataImported,
        &format!("File: {source}, Entries: {count}"),
    )?;
    tx.commit().map_err(map_sql_err)?;

    debug!(count, "import committed");
    Ok(count)
}

/// Write `container` to `path` atomically (temp file in the same directory,
/// then rename).
pub fn write_container(path: &Path, container: &ExportContainer) -> Result<(), SecurePassError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let json = container.to_json()?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(SecurePassError::storage)?;
    tmp.write_all(json.as_bytes())
        .map_err(SecurePassError::storage)?;
    tmp.as_file().sync_all().map_err(SecurePassError::storage)?;
    tmp.persist(path)
        .map_err(|e| SecurePassError::storage(e.error))?;
    Ok(())
}

/// Read and parse a container file.
pub fn read_container(path: &Path) -> Result<ExportContainer, SecurePassError> {
    let json = std::fs::read_to_string(path).map_err(SecurePassError::storage)?;
    ExportContainer::from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kdf::{SALT_LEN, derive_key};
    use securepass_config::model::StorageConfig;
    use tempfile::{TempDir, tempdir};

    fn open(pass: &str) -> (Database, EncryptionEngine, TempDir) {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("v.db"), &StorageConfig::default()).unwrap();
        let mut engine = EncryptionEngine::new();
        engine.setup(derive_key(pass.as_bytes(), &[4u8; SALT_LEN], 1000).unwrap());
        (db, engine, dir)
    }

    fn add(db: &Database, engine: &EncryptionEngine, service: &str) {
        CredentialStore::new(db, engine)
            .add(EntryFields {
                service,
                username: "user",
                password: "pw",
                notes: "n",
            })
            .unwrap();
    }

    #[test]
    fn container_envelope_is_checked() {
        let (db, engine, _dir) = open("pass");
        let (container, count) = export(&db, &engine).unwrap();
        assert_eq!(count, 0);
        assert_eq!(container.format, EXPORT_FORMAT);

        let foreign = r#"{"format":"other","version":1,"data":"x"}"#;
        assert!(matches!(
            ExportContainer::from_json(foreign),
            Err(SecurePassError::ImportFormat(_))
        ));
        let future = r#"{"format":"securepass-export","version":9,"data":"x"}"#;
        assert!(matches!(
            ExportContainer::from_json(future),
            Err(SecurePassError::ImportFormat(_))
        ));
        assert!(matches!(
            ExportContainer::from_json("{\"data\": 1}"),
            Err(SecurePassError::ImportFormat(_))
        ));
    }

    #[test]
    fn same_key_round_trip_is_additive() {
        let (db, engine, _dir) = open("pass");
        add(&db, &engine, "GitHub");
        add(&db, &engine, "Example");

        let (container, count) = export(&db, &engine).unwrap();
        assert_eq!(count, 2);
        assert_eq!(import(&db, &engine, &container, "backup.spx").unwrap(), 2);

        let services: Vec<String> = CredentialStore::new(&db, &engine)
            .get_all()
            .unwrap()
            .iter()
            .map(|e| e.service.clone())
            .collect();
        assert_eq!(services, ["GitHub", "Example", "GitHub", "Example"]);

        let last = queries::audit::recent(db.connection(), 1).unwrap();
        assert_eq!(last[0].action, "Data imported");
        assert_eq!(last[0].details, "File: backup.spx, Entries: 2");
    }

    #[test]
    fn foreign_key_adds_nothing() {
        let (src_db, src_engine, _a) = open("alpha");
        add(&src_db, &src_engine, "GitHub");
        let (container, _) = export(&src_db, &src_engine).unwrap();

        let (db, engine, _b) = open("beta");
        let result = import(&db, &engine, &container, "x.spx");
        assert!(matches!(result, Err(SecurePassError::IntegrityViolation(_))));
        assert_eq!(queries::credentials::count(db.connection()).unwrap(), 0);
    }

    #[test]
    fn payload_that_is_not_a_document_is_a_format_error() {
        let (db, engine, _dir) = open("pass");
        let container = ExportContainer {
            format: EXPORT_FORMAT.to_string(),
            version: EXPORT_VERSION,
            data: engine.encrypt("[1, 2, 3]").unwrap(),
        };
        assert!(matches!(
            import(&db, &engine, &container, "x"),
            Err(SecurePassError::ImportFormat(_))
        ));
    }

    #[test]
    fn bad_record_after_good_one_rolls_back_everything() {
        let (db, engine, _dir) = open("pass");
        let record = |service: &str| ExportRecord {
            service: service.to_string(),
            username: "user".to_string(),
            password: "pw".to_string(),
            notes: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
        };
        let document = ExportDocument {
            passwords: vec![record("GitHub"), record("")],
            exported_at: timestamp::now(),
        };
        let container = ExportContainer {
            format: EXPORT_FORMAT.to_string(),
            version: EXPORT_VERSION,
            data: engine
                .encrypt(&serde_json::to_string(&document).unwrap())
                .unwrap(),
        };

        assert!(matches!(
            import(&db, &engine, &container, "mixed.spx"),
            Err(SecurePassError::ImportFormat(_))
        ));
        assert_eq!(queries::credentials::count(db.connection()).unwrap(), 0);
        assert_eq!(queries::audit::count(db.connection()).unwrap(), 0);
    }

    #[test]
    fn files_are_written_atomically_and_read_back() {
        let (db, engine, dir) = open("pass");
        add(&db, &engine, "GitHub");
        let (container, _) = export(&db, &engine).unwrap();

        let path = dir.path().join(format!("backup{EXPORT_FILE_EXTENSION}"));
        write_container(&path, &container).unwrap();
        assert_eq!(read_container(&path).unwrap(), container);

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with(".tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }
}
