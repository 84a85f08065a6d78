// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use securepass_config::model::StorageConfig;
use tempfile::{TempDir, tempdir};

use crate::Database;

/// A freshly migrated vault file in its own temp directory.
///
/// Keep the returned `TempDir` alive for as long as the database is used.
pub(crate) fn open_test_db() -> (Database, TempDir) {
    let dir = tempdir().unwrap();
    let db = Database::open(dir.path().join("vault.db"), &StorageConfig::default()).unwrap();
    (db, dir)
}
