// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Append-only activity log: insert and read, no update or delete.

use rusqlite::{Connection, params};
use securepass_core::{AuditEvent, SecurePassError};

use crate::database::map_sql_err;

/// Append one event.
pub fn append(
    conn: &Connection,
    action: &str,
    details: &str,
    timestamp: &str,
) -> Result<(), SecurePassError> {
    conn.execute(
        "INSERT INTO audit_log (action, details, timestamp) VALUES (?1, ?2, ?3)",
        params![action, details, timestamp],
    )
    .map_err(map_sql_err)?;
    Ok(())
}

/// Up to `limit` events, most recent first.
///
/// Ties on timestamp fall back to insertion order so the result is stable.
pub fn recent(conn: &Connection, limit: usize) -> Result<Vec<AuditEvent>, SecurePassError> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let mut stmt = conn
        .prepare(
            "SELECT action, details, timestamp FROM audit_log
             ORDER BY timestamp DESC, id DESC LIMIT ?1",
        )
        .map_err(map_sql_err)?;
    let events = stmt
        .query_map(params![limit], |row| {
            Ok(AuditEvent {
                action: row.get(0)?,
                details: row.get(1)?,
                timestamp: row.get(2)?,
            })
        })
        .map_err(map_sql_err)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(map_sql_err)?;
    Ok(events)
}

/// Total number of events.
pub fn count(conn: &Connection) -> Result<usize, SecurePassError> {
    let n: i64 = conn
        .query_row("SELECT COUNT(*) FROM audit_log", [], |row| row.get(0))
        .map_err(map_sql_err)?;
    Ok(n.max(0) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::open_test_db;

    #[test]
    fn recent_is_newest_first_and_limited() {
        let (db, _dir) = open_test_db();
        let conn = db.connection();
        append(conn, "first", "", "2026-01-01T00:00:00.000000Z").unwrap();
        append(conn, "second", "x", "2026-01-01T00:00:01.000000Z").unwrap();
        append(conn, "third", "y", "2026-01-01T00:00:02.000000Z").unwrap();

        let events = recent(conn, 2).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].action, "third");
        assert_eq!(events[1].action, "second");

        assert_eq!(recent(conn, 10).unwrap().len(), 3);
        assert_eq!(count(conn).unwrap(), 3);
    }

    #[test]
    fn same_timestamp_orders_by_insertion() {
        let (db, _dir) = open_test_db();
        let conn = db.connection();
        let ts = "2026-01-01T00:00:00.000000Z";
        append(conn, "a", "", ts).unwrap();
        append(conn, "b", "", ts).unwrap();

        let events = recent(conn, 5).unwrap();
        assert_eq!(events[0].action, "b");
        assert_eq!(events[1].action, "a");
    }

    #[test]
    fn zero_limit_returns_nothing() {
        let (db, _dir) = open_test_db();
        append(db.connection(), "a", "", "2026-01-01T00:00:00.000000Z").unwrap();
        assert!(recent(db.connection(), 0).unwrap().is_empty());
    }
}
