// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for the SecurePass vault.
//!
//! This crate knows nothing about keys or plaintext. It stores the master
//! auth record, encrypted credential rows, the audit log and settings, and
//! hands back exactly what was stored.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod timestamp;

#[cfg(test)]
mod test_support;

pub use database::Database;
pub use models::{EncryptedFields, MasterAuthRecord, StoredEntry};
