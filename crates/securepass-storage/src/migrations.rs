// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedded schema migrations using refinery.
//!
//! SQL files under `migrations/` are compiled into the binary and applied on
//! every open. Statements use `IF NOT EXISTS`, so a vault created before
//! refinery tracked it still migrates cleanly.

use securepass_core::SecurePassError;

mod embedded {
    use refinery::embed_migrations;
    embed_migrations!("migrations");
}

/// Apply all pending migrations.
pub fn run_migrations(conn: &mut rusqlite::Connection) -> Result<(), SecurePassError> {
    let report = embedded::migrations::runner()
        .run(conn)
        .map_err(SecurePassError::storage)?;
    for migration in report.applied_migrations() {
        tracing::info!(migration = %migration, "migration applied");
    }
    Ok(())
}
