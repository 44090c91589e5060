// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates backend-specific initialization, migration,
//! transaction and locking helpers that cannot be expressed in
//! backend-agnostic Diesel DSL.
//!
//! ## Backend Support
//!
//! - `sqlite`: `SQLite` backend (default for development and testing)
//! - `mysql`: MySQL/MariaDB backend (validated via opt-in tests)
//!
//! ## Locking Protocol
//!
//! Every write transaction that changes booking counts takes its row locks
//! before its first plain read, in this order:
//!
//! 1. stops, by id
//! 2. bus assignments, by id
//! 3. trips, by id
//!
//! Any writer that changes a trip counter holds the lock on that trip's bus
//! assignment, so holding a bus assignment lock freezes every counter on
//! that bus. On `SQLite` the write transaction itself holds the database
//! write lock from `BEGIN IMMEDIATE`, and the row lock calls are no-ops.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};
use fleetdesk_domain::{BusAssignmentId, RegistrationId, StopId, TripId};

use crate::error::PersistenceError;

/// Trait for backend-specific operations.
///
/// This trait provides a unified interface for operations that cannot be
/// expressed in backend-agnostic Diesel DSL, such as retrieving the last
/// inserted row ID, opening a write transaction, or locking rows.
///
/// This trait is implemented for both `SqliteConnection` and `MysqlConnection`.
pub trait PersistenceBackend: Connection {
    /// Retrieves the last inserted row ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;

    /// Runs `f` inside a transaction that may write booking counts.
    ///
    /// Commits when `f` returns `Ok`, rolls back otherwise.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or a database error converted into `E`.
    fn write_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>;

    /// Locks stop rows for the rest of the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn lock_stops(&mut self, ids: &[StopId]) -> Result<(), PersistenceError>;

    /// Locks bus assignment rows for the rest of the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn lock_bus_assignments(&mut self, ids: &[BusAssignmentId]) -> Result<(), PersistenceError>;

    /// Locks every bus assignment of a registration.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn lock_registration_bus_assignments(
        &mut self,
        registration_id: RegistrationId,
    ) -> Result<(), PersistenceError>;

    /// Locks trip rows for the rest of the transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn lock_trips(&mut self, ids: &[TripId]) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn write_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>,
    {
        self.immediate_transaction(f)
    }

    fn lock_stops(&mut self, _ids: &[StopId]) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn lock_bus_assignments(&mut self, _ids: &[BusAssignmentId]) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn lock_registration_bus_assignments(
        &mut self,
        _registration_id: RegistrationId,
    ) -> Result<(), PersistenceError> {
        Ok(())
    }

    fn lock_trips(&mut self, _ids: &[TripId]) -> Result<(), PersistenceError> {
        Ok(())
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn write_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>,
    {
        mysql::set_repeatable_read(self)?;
        self.transaction(f)
    }

    fn lock_stops(&mut self, ids: &[StopId]) -> Result<(), PersistenceError> {
        mysql::lock_stops(self, ids)
    }

    fn lock_bus_assignments(&mut self, ids: &[BusAssignmentId]) -> Result<(), PersistenceError> {
        mysql::lock_bus_assignments(self, ids)
    }

    fn lock_registration_bus_assignments(
        &mut self,
        registration_id: RegistrationId,
    ) -> Result<(), PersistenceError> {
        mysql::lock_registration_bus_assignments(self, registration_id)
    }

    fn lock_trips(&mut self, ids: &[TripId]) -> Result<(), PersistenceError> {
        mysql::lock_trips(self, ids)
    }
}
