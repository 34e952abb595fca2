// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work order mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use despacho::{WorkOrderChanges, WorkOrderPlan};
use despacho_domain::OtState;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::work_orders;
use crate::error::PersistenceError;

/// Column values for a partial work order update.
#[derive(AsChangeset)]
#[diesel(table_name = work_orders)]
struct WorkOrderChangeset<'a> {
    worker_id: Option<i64>,
    fecha: Option<&'a str>,
    state: Option<&'a str>,
    notes: Option<Option<&'a str>>,
}

impl<'a> From<&'a WorkOrderChanges> for WorkOrderChangeset<'a> {
    fn from(changes: &'a WorkOrderChanges) -> Self {
        Self {
            worker_id: changes.worker_id,
            fecha: changes.fecha.as_deref(),
            state: changes.state.as_ref().map(OtState::as_str),
            notes: changes.notes.as_ref().map(Option::as_deref),
        }
    }
}

backend_fn! {
/// Inserts the work order described by a creation plan.
///
/// # Errors
///
/// Returns an error if the insert fails, including when the sales order
/// already has a work order.
pub fn insert_work_order(conn: &mut _, plan: &WorkOrderPlan) -> Result<i64, PersistenceError> {
    diesel::insert_into(work_orders::table)
        .values((
            work_orders::originating_order_id.eq(plan.order_id),
            work_orders::worker_id.eq(plan.worker.as_ref().map(|w| w.worker_id)),
            work_orders::fecha.eq(&plan.created_at),
            work_orders::state.eq(plan.state.as_str()),
            work_orders::notes.eq(&plan.notes),
        ))
        .execute(conn)?;

    let ot_id: i64 = conn.get_last_insert_rowid()?;
    debug!(ot_id, order_id = plan.order_id, "Inserted work order");
    Ok(ot_id)
}
}

backend_fn! {
/// Writes the changed columns of a work order.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_work_order(
    conn: &mut _,
    ot_id: i64,
    changes: &WorkOrderChanges,
) -> Result<(), PersistenceError> {
    if changes.is_empty() {
        return Ok(());
    }

    diesel::update(work_orders::table.filter(work_orders::ot_id.eq(ot_id)))
        .set(WorkOrderChangeset::from(changes))
        .execute(conn)?;

    debug!(ot_id, "Updated work order");
    Ok(())
}
}
