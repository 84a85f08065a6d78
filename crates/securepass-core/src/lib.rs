// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the SecurePass credential vault.
//!
//! Provides the error taxonomy and the plain domain types that cross crate
//! boundaries. Nothing in here touches storage or key material.

pub mod error;
pub mod types;

pub use error::{Result, SecurePassError};
pub use types::{AuditEvent, CredentialEntry, EntryId};
