// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rotation counters and pending-load statistics.

use std::collections::HashMap;

use diesel::dsl::count_star;
use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use despacho_domain::{Candidate, GuideState, OtState, RoleCategory};
use num_traits::ToPrimitive;

use crate::data_models::BalanceEntry;
use crate::diesel_schema::{assignment_counters, dispatch_guides, work_orders};
use crate::error::PersistenceError;

const PENDING_WORK_ORDER_STATES: [OtState; 3] =
    [OtState::Created, OtState::Assigned, OtState::InProgress];

/// Joins a rotation pool with per-employee pending counts, lightest load first.
///
/// # Errors
///
/// Returns an error if a count is negative.
pub fn balance_entries(
    pool: Vec<Candidate>,
    pending: &HashMap<i64, i64>,
) -> Result<Vec<BalanceEntry>, PersistenceError> {
    let mut entries: Vec<BalanceEntry> = pool
        .into_iter()
        .map(|candidate| {
            let count: i64 = pending.get(&candidate.worker_id).copied().unwrap_or(0);
            let pending: u64 = count.to_u64().ok_or_else(|| {
                PersistenceError::Other(format!("Negative pending count: {count}"))
            })?;
            Ok(BalanceEntry {
                employee_id: candidate.worker_id,
                name: candidate.display_name,
                pending,
                counter: candidate.counter,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    entries.sort_by_key(|entry| (entry.pending, entry.employee_id));
    Ok(entries)
}

backend_fn! {
/// Returns the rotation counter for a worker under a category.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the worker was never assigned under `category`.
pub fn find_counter(
    conn: &mut _,
    worker_id: i64,
    category: RoleCategory,
) -> Result<Option<i64>, PersistenceError> {
    Ok(assignment_counters::table
        .filter(assignment_counters::worker_id.eq(worker_id))
        .filter(assignment_counters::category.eq(category.as_str()))
        .select(assignment_counters::counter)
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Counts each picker's work orders that are created, assigned or in progress.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn pending_work_order_loads(conn: &mut _) -> Result<HashMap<i64, i64>, PersistenceError> {
    let pending_states: Vec<&str> = PENDING_WORK_ORDER_STATES
        .iter()
        .map(OtState::as_str)
        .collect();

    let loads: Vec<(Option<i64>, i64)> = work_orders::table
        .filter(work_orders::state.eq_any(pending_states))
        .filter(work_orders::worker_id.is_not_null())
        .group_by(work_orders::worker_id)
        .select((work_orders::worker_id, count_star()))
        .load(conn)?;

    Ok(loads
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count)))
        .collect())
}
}

backend_fn! {
/// Counts each courier company's guides that are not yet delivered.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn pending_guide_loads(conn: &mut _) -> Result<HashMap<i64, i64>, PersistenceError> {
    let loads: Vec<(Option<i64>, i64)> = dispatch_guides::table
        .filter(dispatch_guides::state.ne(GuideState::Entregada.as_str()))
        .filter(dispatch_guides::courier_id.is_not_null())
        .group_by(dispatch_guides::courier_id)
        .select((dispatch_guides::courier_id, count_star()))
        .load(conn)?;

    Ok(loads
        .into_iter()
        .filter_map(|(id, count)| id.map(|id| (id, count)))
        .collect())
}
}
