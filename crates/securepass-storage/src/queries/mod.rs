// SPDX-FileCopyrightText: 2026 SecurePass Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query functions, one module per table.
//!
//! Every function takes a plain `&Connection`, so it runs equally against
//! the bare connection or inside a `Transaction` (which derefs to one).

pub mod audit;
pub mod credentials;
pub mod master_auth;
pub mod settings;
