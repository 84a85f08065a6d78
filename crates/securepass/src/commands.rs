// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command handlers. Each one runs against an open session and writes
//! human-readable output to `out`.

use std::io::Write;
use std::path::Path;

use securepass_core::{AuditEvent, CredentialEntry, EntryId, SecurePassError};
use securepass_vault::{EXPORT_FILE_EXTENSION, VaultSession, mask_secret};

fn io_err(e: std::io::Error) -> SecurePassError {
    SecurePassError::Internal(format!("failed to write output: {e}"))
}

/// One listing line: id, service, username and a masked or revealed password.
pub fn format_entry(entry: &CredentialEntry, reveal: bool) -> String {
    let password = if reveal {
        entry.password.clone()
    } else {
        mask_secret(&entry.password)
    };
    format!(
        "{:>4}  {:<24} {:<28} {}",
        entry.id, entry.service, entry.username, password
    )
}

pub fn format_event(event: &AuditEvent) -> String {
    if event.details.is_empty() {
        format!("{}  {}", event.timestamp, event.action)
    } else {
        format!("{}  {}  ({})", event.timestamp, event.action, event.details)
    }
}

fn write_entries(
    out: &mut impl Write,
    entries: &[CredentialEntry],
    reveal: bool,
) -> Result<(), SecurePassError> {
    if entries.is_empty() {
        writeln!(out, "No entries.").map_err(io_err)?;
        return Ok(());
    }
    for entry in entries {
        writeln!(out, "{}", format_entry(entry, reveal)).map_err(io_err)?;
    }
    Ok(())
}

pub fn list(session: &mut VaultSession, reveal: bool, out: &mut impl Write) -> Result<(), SecurePassError> {
    write_entries(out, &session.get_all()?, reveal)
}

pub fn search(
    session: &mut VaultSession,
    query: &str,
    reveal: bool,
    out: &mut impl Write,
) -> Result<(), SecurePassError> {
    write_entries(out, &session.search(query)?, reveal)
}

pub fn show(
    session: &mut VaultSession,
    id: EntryId,
    reveal: bool,
    out: &mut impl Write,
) -> Result<(), SecurePassError> {
    let Some(entry) = session.get_entry(id)? else {
        writeln!(out, "No entry with id {id}.").map_err(io_err)?;
        return Ok(());
    };
    let password = if reveal {
        entry.password.clone()
    } else {
        mask_secret(&entry.password)
    };
    writeln!(out, "Service:  {}", entry.service).map_err(io_err)?;
    writeln!(out, "Username: {}", entry.username).map_err(io_err)?;
    writeln!(out, "Password: {password}").map_err(io_err)?;
    if !entry.notes.is_empty() {
        writeln!(out, "Notes:    {}", entry.notes).map_err(io_err)?;
    }
    writeln!(out, "Created:  {}", entry.created_at).map_err(io_err)?;
    writeln!(out, "Updated:  {}", entry.updated_at).map_err(io_err)?;
    Ok(())
}

pub fn add(
    session: &mut VaultSession,
    service: &str,
    username: &str,
    password: &str,
    notes: &str,
    out: &mut impl Write,
) -> Result<(), SecurePassError> {
    let id = session.add_entry(service, username, password, notes)?;
    writeln!(out, "Added entry {id} ({service}).").map_err(io_err)
}

/// Partial update: fields left as `None` keep their current value.
pub struct UpdateArgs {
    pub id: EntryId,
    pub service: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub notes: Option<String>,
}

pub fn update(
    session: &mut VaultSession,
    args: UpdateArgs,
    out: &mut impl Write,
) -> Result<(), SecurePassError> {
    let Some(current) = session.get_entry(args.id)? else {
        writeln!(out, "No entry with id {}.", args.id).map_err(io_err)?;
        return Ok(());
    };
    let service = args.service.as_deref().unwrap_or(&current.service);
    let username = args.username.as_deref().unwrap_or(&current.username);
    let password = args.password.as_deref().unwrap_or(&current.password);
    let notes = args.notes.as_deref().unwrap_or(&current.notes);

    if session.update_entry(args.id, service, username, password, notes)? {
        writeln!(out, "Updated entry {}.", args.id).map_err(io_err)
    } else {
        writeln!(out, "No entry with id {}.", args.id).map_err(io_err)
    }
}

pub fn delete(session: &mut VaultSession, id: EntryId, out: &mut impl Write) -> Result<(), SecurePassError> {
    if session.delete_entry(id)? {
        writeln!(out, "Deleted entry {id}.").map_err(io_err)
    } else {
        writeln!(out, "No entry with id {id}.").map_err(io_err)
    }
}

pub fn log(session: &VaultSession, limit: usize, out: &mut impl Write) -> Result<(), SecurePassError> {
    for event in session.recent_events(limit)? {
        writeln!(out, "{}", format_event(&event)).map_err(io_err)?;
    }
    Ok(())
}

pub fn export(session: &VaultSession, path: &Path, out: &mut impl Write) -> Result<(), SecurePassError> {
    let has_extension = path
        .extension()
        .is_some_and(|ext| format!(".{}", ext.to_string_lossy()) == EXPORT_FILE_EXTENSION);
    let path = if has_extension {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(EXPORT_FILE_EXTENSION);
        name.into()
    };
    let count = session.export_to_path(&path)?;
    writeln!(out, "Exported {count} entries to {}.", path.display()).map_err(io_err)
}

pub fn import(session: &mut VaultSession, path: &Path, out: &mut impl Write) -> Result<(), SecurePassError> {
    let count = session.import_from_path(path)?;
    writeln!(out, "Imported {count} entries from {}.", path.display()).map_err(io_err)
}

pub fn settings_get(session: &VaultSession, key: &str, out: &mut impl Write) -> Result<(), SecurePassError> {
    match session.get_setting(key)? {
        Some(value) => writeln!(out, "{value}").map_err(io_err),
        None => writeln!(out, "{key} is not set.").map_err(io_err),
    }
}

pub fn settings_set(
    session: &VaultSession,
    key: &str,
    value: &str,
    out: &mut impl Write,
) -> Result<(), SecurePassError> {
    session.set_setting(key, value)?;
    writeln!(out, "{key} = {value}").map_err(io_err)
}

pub fn settings_list(session: &VaultSession, out: &mut impl Write) -> Result<(), SecurePassError> {
    for (key, value) in session.settings()? {
        writeln!(out, "{key} = {value}").map_err(io_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use securepass_config::SecurePassConfig;
    use tempfile::{TempDir, tempdir};

    fn unlocked() -> (VaultSession, TempDir) {
        let dir = tempdir().unwrap();
        let mut config = SecurePassConfig::default();
        config.vault.kdf_iterations = 1000;
        config.vault.hash_memory_cost = 8;
        config.vault.hash_iterations = 1;
        let mut session = VaultSession::open_path(dir.path().join("v.db"), &config).unwrap();
        session.setup(&SecretString::from("pass".to_string())).unwrap();
        (session, dir)
    }

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<(), SecurePassError>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn list_masks_unless_revealed() {
        let (mut session, _dir) = unlocked();
        session
            .add_entry("GitHub", "octocat", "correcthorsebattery", "")
            .unwrap();

        let masked = output(|out| list(&mut session, false, out));
        assert!(masked.contains("GitHub"));
        assert!(masked.contains("corr...tery"));
        assert!(!masked.contains("correcthorsebattery"));

        let revealed = output(|out| list(&mut session, true, out));
        assert!(revealed.contains("correcthorsebattery"));
    }

    #[test]
    fn update_keeps_unspecified_fields() {
        let (mut session, _dir) = unlocked();
        let id = session.add_entry("GitHub", "octocat", "pw", "keep me").unwrap();

        output(|out| {
            update(
                &mut session,
                UpdateArgs {
                    id,
                    service: None,
                    username: Some("hubot".to_string()),
                    password: None,
                    notes: None,
                },
                out,
            )
        });
        let entry = session.get_entry(id).unwrap().unwrap();
        assert_eq!(entry.username, "hubot");
        assert_eq!(entry.password, "pw");
        assert_eq!(entry.notes, "keep me");
    }

    #[test]
    fn export_appends_extension() {
        let (session, dir) = unlocked();
        let text = output(|out| export(&session, &dir.path().join("backup"), out));
        assert!(text.contains("backup.spx"));
        assert!(dir.path().join("backup.spx").exists());
    }

    #[test]
    fn missing_entry_is_reported_not_failed() {
        let (mut session, _dir) = unlocked();
        let text = output(|out| delete(&mut session, 42, out));
        assert_eq!(text.trim(), "No entry with id 42.");
    }

    #[test]
    fn event_formatting() {
        let event = AuditEvent {
            action: "Password added".to_string(),
            details: "Service: GitHub".to_string(),
            timestamp: "2026-01-01T00:00:00.000000Z".to_string(),
        };
        assert_eq!(
            format_event(&event),
            "2026-01-01T00:00:00.000000Z  Password added  (Service: GitHub)"
        );
    }
}
