// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixed-width UTC timestamps that sort lexicographically.

use chrono::{DateTime, Duration, SecondsFormat, SubsecRound, Utc};

/// Current time as `YYYY-MM-DDTHH:MM:SS.ffffffZ`.
pub fn now() -> String {
    format(Utc::now())
}

/// Current time, or one microsecond after `previous` if the clock has not
/// moved past it. Keeps `updated_at` strictly increasing across updates.
pub fn after(previous: &str) -> String {
    // Compare at the stored precision, not the clock's.
    let now = Utc::now().trunc_subsecs(6);
    match DateTime::parse_from_rfc3339(previous) {
        Ok(prev) => {
            let prev = prev.with_timezone(&Utc);
            if now > prev {
                format(now)
            } else {
                format(prev + Duration::microseconds(1))
            }
        }
        Err(_) => format(now),
    }
}

fn format(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}
