// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! ## Module Organization
//!
//! - `audit`: Audit event persistence
//! - `entities`: Inserts, deletes and single-row updates
//!
//! ## Backend-Specific Code
//!
//! Backend-specific helpers (e.g., `get_last_insert_rowid()`) come from the
//! `PersistenceBackend` trait. All other code uses Diesel DSL exclusively.

pub mod audit;
pub mod entities;
