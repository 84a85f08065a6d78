// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end vault flows against a real file.

use secrecy::SecretString;
use securepass_config::SecurePassConfig;
use securepass_core::SecurePassError;
use securepass_vault::{EXPORT_FILE_EXTENSION, VaultSession};
use tempfile::{TempDir, tempdir};

/// Low-cost settings so the suite stays fast.
fn test_config() -> SecurePassConfig {
    let mut config = SecurePassConfig::default();
    config.vault.kdf_iterations = 1000;
    config.vault.hash_memory_cost = 8;
    config.vault.hash_iterations = 1;
    config.vault.hash_parallelism = 1;
    config
}

fn open_in(dir: &TempDir, name: &str) -> VaultSession {
    VaultSession::open_path(dir.path().join(name), &test_config()).unwrap()
}

fn secret(s: &str) -> SecretString {
    SecretString::from(s.to_string())
}

#[test]
fn setup_unlock_and_wrong_passphrase() {
    let dir = tempdir().unwrap();
    {
        let mut session = open_in(&dir, "vault.db");
        assert!(!session.has_master_auth().unwrap());
        session.setup(&secret("correcthorsebatterystaple")).unwrap();
        assert!(session.is_unlocked());
        session
            .add_entry("GitHub", "octocat", "hunter2", "work account")
            .unwrap();
        session.close().unwrap();
    }

    let mut session = open_in(&dir, "vault.db");
    assert!(session.has_master_auth().unwrap());
    assert!(!session.is_unlocked());

    assert!(!session.unlock(&secret("wrongpass")).unwrap());
    assert!(!session.is_unlocked());
    assert!(matches!(
        session.get_all(),
        Err(SecurePassError::EncryptionNotInitialized)
    ));

    assert!(session.unlock(&secret("correcthorsebatterystaple")).unwrap());
    let entries = session.get_all().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].password, "hunter2");
    assert_eq!(entries[0].notes, "work account");

    let actions: Vec<String> = session
        .recent_events(10)
        .unwrap()
        .into_iter()
        .map(|e| e.action)
        .collect();
    assert_eq!(
        actions,
        [
            "Successful login",
            "Failed login attempt",
            "Password added",
            "Master password set",
        ]
    );
}

#[test]
fn search_git_keeps_insertion_order() {
    let dir = tempdir().unwrap();
    let mut session = open_in(&dir, "vault.db");
    session.setup(&secret("pass")).unwrap();
    session.add_entry("GitHub", "a@example.com", "p1", "").unwrap();
    session.add_entry("gitlab", "b@example.com", "p2", "").unwrap();
    session.add_entry("Example", "c@example.com", "p3", "").unwrap();

    let hits = session.search("git").unwrap();
    let services: Vec<&str> = hits.iter().map(|e| e.service.as_str()).collect();
    assert_eq!(services, ["GitHub", "gitlab"]);

    let by_user = session.search("C@EXAMPLE").unwrap();
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0].service, "Example");
}

#[test]
fn update_strictly_increases_updated_at() {
    let dir = tempdir().unwrap();
    let mut session = open_in(&dir, "vault.db");
    session.setup(&secret("pass")).unwrap();
    let id = session.add_entry("GitHub", "octocat", "old", "").unwrap();
    let before = session.get_entry(id).unwrap().unwrap();
    assert_eq!(before.created_at, before.updated_at);

    for password in ["one", "two", "three"] {
        let prev = session.get_entry(id).unwrap().unwrap().updated_at.clone();
        assert!(session.update_entry(id, "GitHub", "octocat", password, "").unwrap());
        let now = session.get_entry(id).unwrap().unwrap();
        assert!(now.updated_at > prev);
        assert_eq!(now.created_at, before.created_at);
        assert_eq!(now.password, password);
    }
    assert!(!session.update_entry(9999, "x", "y", "z", "").unwrap());
    assert!(session.delete_entry(id).unwrap());
    assert!(!session.delete_entry(id).unwrap());
    assert_eq!(session.count().unwrap(), 0);
}

#[test]
fn export_import_across_vaults() {
    let dir = tempdir().unwrap();
    let export_path = dir.path().join(format!("backup{EXPORT_FILE_EXTENSION}"));

    let mut source = open_in(&dir, "source.db");
    source.setup(&secret("alpha")).unwrap();
    source.add_entry("GitHub", "octocat", "hunter2", "").unwrap();
    source.add_entry("Example", "me", "pw", "notes").unwrap();
    assert_eq!(source.export_to_path(&export_path).unwrap(), 2);

    // Same passphrase, different salt: the container was sealed under a
    // different key, so nothing may be imported.
    let mut other = open_in(&dir, "other.db");
    other.setup(&secret("alpha")).unwrap();
    let err = other.import_from_path(&export_path).unwrap_err();
    assert!(matches!(err, SecurePassError::IntegrityViolation(_)));
    assert_eq!(other.count().unwrap(), 0);
    let events = other.recent_events(1).unwrap();
    let last = &events[0];
    assert_eq!(last.action, "Import failed");
    assert!(last.details.contains("backup.spx"));

    // The originating session can import its own export additively.
    assert_eq!(source.import_from_path(&export_path).unwrap(), 2);
    assert_eq!(source.count().unwrap(), 4);
}

#[test]
fn import_of_garbage_file_is_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("junk.spx");
    std::fs::write(&path, "not json at all").unwrap();

    let mut session = open_in(&dir, "vault.db");
    session.setup(&secret("pass")).unwrap();
    assert!(matches!(
        session.import_from_path(&path),
        Err(SecurePassError::ImportFormat(_))
    ));
    assert_eq!(session.recent_events(1).unwrap()[0].action, "Import failed");
}

#[test]
fn passphrase_rotation_reencrypts_everything() {
    let dir = tempdir().unwrap();
    let mut session = open_in(&dir, "vault.db");
    session.setup(&secret("old-pass")).unwrap();
    let id = session.add_entry("GitHub", "octocat", "hunter2", "n").unwrap();
    let before = session.get_entry(id).unwrap().unwrap();

    assert!(
        !session
            .change_passphrase(&secret("not-it"), &secret("new-pass"))
            .unwrap()
    );
    assert_eq!(
        session.recent_events(1).unwrap()[0].action,
        "Failed passphrase change"
    );

    assert!(
        session
            .change_passphrase(&secret("old-pass"), &secret("new-pass"))
            .unwrap()
    );
    assert_eq!(session.get_entry(id).unwrap().unwrap().password, "hunter2");
    session.close().unwrap();

    let mut reopened = open_in(&dir, "vault.db");
    assert!(!reopened.unlock(&secret("old-pass")).unwrap());
    assert!(reopened.unlock(&secret("new-pass")).unwrap());
    let after = reopened.get_entry(id).unwrap().unwrap();
    assert_eq!(after.password, "hunter2");
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.updated_at, before.updated_at);
}

#[test]
fn settings_work_while_locked() {
    let dir = tempdir().unwrap();
    let mut session = open_in(&dir, "vault.db");
    session.setup(&secret("pass")).unwrap();
    session.lock();

    assert_eq!(session.get_setting("theme").unwrap(), None);
    session.set_setting("theme", "dark").unwrap();
    session.set_setting("theme", "light").unwrap();
    assert_eq!(session.get_setting("theme").unwrap().as_deref(), Some("light"));
    assert_eq!(session.settings().unwrap().len(), 1);

    // Audit reads need the key.
    assert!(matches!(
        session.recent_events(5),
        Err(SecurePassError::EncryptionNotInitialized)
    ));
    assert!(session.unlock(&secret("pass")).unwrap());
    let events = session.recent_events(5).unwrap();
    assert_eq!(events[1].action, "Setting changed");
    assert_eq!(events[1].details, "Key: theme");
}
