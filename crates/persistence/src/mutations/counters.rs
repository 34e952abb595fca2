// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rotation counter bookkeeping.
//!
//! Counters are created lazily on first assignment and never drop below
//! zero. Every change is a single statement whose arithmetic the database
//! evaluates, so concurrent writers on MySQL cannot lose an increment. The
//! follow-up read returns the value this transaction wrote, so callers must
//! run both inside their transaction.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use despacho_domain::RoleCategory;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::assignment_counters;
use crate::error::PersistenceError;

backend_fn! {
/// Records an assignment, creating the counter at 1 if it does not exist.
///
/// Returns the new counter value.
///
/// # Errors
///
/// Returns an error if the upsert or read fails.
pub fn record_assignment(
    conn: &mut _,
    worker_id: i64,
    category: RoleCategory,
    now: &str,
) -> Result<i64, PersistenceError> {
    conn.upsert_assignment_counter(worker_id, category.as_str(), now)?;

    let next: i64 = assignment_counters::table
        .filter(assignment_counters::worker_id.eq(worker_id))
        .filter(assignment_counters::category.eq(category.as_str()))
        .select(assignment_counters::counter)
        .first(conn)?;

    debug!(worker_id, category = category.as_str(), counter = next, "Recorded assignment");
    Ok(next)
}
}

backend_fn! {
/// Records a reassignment away from a worker.
///
/// The decrement only applies to rows above zero, which floors the counter
/// without reading it first. A worker without a counter has nothing to
/// release. Returns the new counter value, if one exists.
///
/// # Errors
///
/// Returns an error if the update or read fails.
pub fn record_release(
    conn: &mut _,
    worker_id: i64,
    category: RoleCategory,
    now: &str,
) -> Result<Option<i64>, PersistenceError> {
    diesel::update(
        assignment_counters::table
            .filter(assignment_counters::worker_id.eq(worker_id))
            .filter(assignment_counters::category.eq(category.as_str()))
            .filter(assignment_counters::counter.gt(0_i64)),
    )
    .set((
        assignment_counters::counter.eq(assignment_counters::counter - 1_i64),
        assignment_counters::updated_at.eq(now),
    ))
    .execute(conn)?;

    let next: Option<i64> = assignment_counters::table
        .filter(assignment_counters::worker_id.eq(worker_id))
        .filter(assignment_counters::category.eq(category.as_str()))
        .select(assignment_counters::counter)
        .first(conn)
        .optional()?;

    debug!(worker_id, category = category.as_str(), counter = ?next, "Recorded release");
    Ok(next)
}
}
