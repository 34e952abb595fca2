// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! This module isolates the pieces that cannot be expressed in
//! backend-agnostic Diesel DSL:
//!
//! - Connection initialization and migration execution
//! - Backend configuration (PRAGMA, engine settings)
//! - Last-insert id retrieval
//! - Exclusive transactions and row locks
//! - The counter upsert, whose conflict clause differs per backend
//!
//! ## Locking
//!
//! `MySQL`/`MariaDB` locks the target row with `SELECT ... FOR UPDATE`.
//! `SQLite` has no row locks, so every coordinator transaction is opened with
//! `BEGIN IMMEDIATE`, which takes the database write lock up front. The lock
//! helpers on `SQLite` are therefore plain reads.

pub mod mysql;
pub mod sqlite;

use diesel::{Connection, MysqlConnection, SqliteConnection};

use crate::error::PersistenceError;
use crate::rows::{DispatchGuideRow, WorkOrderRow};

/// Trait for backend-specific operations.
///
/// Implemented for both `SqliteConnection` and `MysqlConnection` so that the
/// transaction coordinator can be written once, generic over the backend.
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

    /// Runs `f` inside a transaction that serializes against other writers.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or the failure to begin or commit.
    fn exclusive_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>;

    /// Loads a work order, holding its row lock until the transaction ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn lock_work_order(&mut self, ot_id: i64) -> Result<Option<WorkOrderRow>, PersistenceError>;

    /// Loads a dispatch guide, holding its row lock until the transaction ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn lock_dispatch_guide(
        &mut self,
        guide_id: i64,
    ) -> Result<Option<DispatchGuideRow>, PersistenceError>;

    /// Adds one to a rotation counter in a single upsert, inserting it at 1
    /// when the worker has none yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the statement fails.
    fn upsert_assignment_counter(
        &mut self,
        worker_id: i64,
        category: &str,
        now: &str,
    ) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }

    fn exclusive_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>,
    {
        self.immediate_transaction(f)
    }

    fn lock_work_order(&mut self, ot_id: i64) -> Result<Option<WorkOrderRow>, PersistenceError> {
        sqlite::lock_work_order(self, ot_id)
    }

    fn lock_dispatch_guide(
        &mut self,
        guide_id: i64,
    ) -> Result<Option<DispatchGuideRow>, PersistenceError> {
        sqlite::lock_dispatch_guide(self, guide_id)
    }

    fn upsert_assignment_counter(
        &mut self,
        worker_id: i64,
        category: &str,
        now: &str,
    ) -> Result<(), PersistenceError> {
        sqlite::upsert_assignment_counter(self, worker_id, category, now)
    }
}

impl PersistenceBackend for MysqlConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        mysql::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        mysql::verify_foreign_key_enforcement(self)
    }

    fn exclusive_transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<diesel::result::Error>,
    {
        self.transaction(f)
    }

    fn lock_work_order(&mut self, ot_id: i64) -> Result<Option<WorkOrderRow>, PersistenceError> {
        mysql::lock_work_order(self, ot_id)
    }

    fn lock_dispatch_guide(
        &mut self,
        guide_id: i64,
    ) -> Result<Option<DispatchGuideRow>, PersistenceError> {
        mysql::lock_dispatch_guide(self, guide_id)
    }

    fn upsert_assignment_counter(
        &mut self,
        worker_id: i64,
        category: &str,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mysql::upsert_assignment_counter(self, worker_id, category, now)
    }
}
