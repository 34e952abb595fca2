// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work order queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use despacho_domain::{OtState, full_name};

use crate::data_models::WorkOrderData;
use crate::diesel_schema::{employees, work_orders};
use crate::error::PersistenceError;
use crate::rows::WorkOrderRow;

type ListedWorkOrder = (WorkOrderRow, Option<(String, Option<String>)>);

fn to_data((row, worker): ListedWorkOrder) -> WorkOrderData {
    WorkOrderData {
        ot_id: row.ot_id,
        originating_order_id: row.originating_order_id,
        worker_id: row.worker_id,
        worker_name: worker.map(|(first, last)| full_name(&first, last.as_deref())),
        fecha: row.fecha,
        state: row.state,
        notes: row.notes,
    }
}

backend_fn! {
/// Returns the work order already created for a sales order, if any.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_work_order_for_order(
    conn: &mut _,
    order_id: i64,
) -> Result<Option<i64>, PersistenceError> {
    Ok(work_orders::table
        .filter(work_orders::originating_order_id.eq(order_id))
        .select(work_orders::ot_id)
        .first(conn)
        .optional()?)
}
}

backend_fn! {
/// Returns the state of a work order.
///
/// Returns `Ok(None)` if the work order is missing or its state is unreadable.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn work_order_state(conn: &mut _, ot_id: i64) -> Result<Option<OtState>, PersistenceError> {
    let state: Option<String> = work_orders::table
        .filter(work_orders::ot_id.eq(ot_id))
        .select(work_orders::state)
        .first(conn)
        .optional()?;
    Ok(state.and_then(|s| s.parse::<OtState>().ok()))
}
}

backend_fn! {
/// Lists every work order, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_work_orders(conn: &mut _) -> Result<Vec<WorkOrderData>, PersistenceError> {
    let rows: Vec<ListedWorkOrder> = work_orders::table
        .left_join(
            employees::table.on(work_orders::worker_id.eq(employees::employee_id.nullable())),
        )
        .order(work_orders::ot_id.desc())
        .select((
            WorkOrderRow::as_select(),
            (employees::first_name, employees::last_name).nullable(),
        ))
        .load(conn)?;
    Ok(rows.into_iter().map(to_data).collect())
}
}

backend_fn! {
/// Lists the work orders owned by a worker, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_work_orders_for_worker(
    conn: &mut _,
    worker_id: i64,
) -> Result<Vec<WorkOrderData>, PersistenceError> {
    let rows: Vec<ListedWorkOrder> = work_orders::table
        .left_join(
            employees::table.on(work_orders::worker_id.eq(employees::employee_id.nullable())),
        )
        .filter(work_orders::worker_id.eq(worker_id))
        .order(work_orders::ot_id.desc())
        .select((
            WorkOrderRow::as_select(),
            (employees::first_name, employees::last_name).nullable(),
        ))
        .load(conn)?;
    Ok(rows.into_iter().map(to_data).collect())
}
}

backend_fn! {
/// Retrieves one work order.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the work order is not found.
pub fn get_work_order(conn: &mut _, ot_id: i64) -> Result<Option<WorkOrderData>, PersistenceError> {
    let row: Option<ListedWorkOrder> = work_orders::table
        .left_join(
            employees::table.on(work_orders::worker_id.eq(employees::employee_id.nullable())),
        )
        .filter(work_orders::ot_id.eq(ot_id))
        .select((
            WorkOrderRow::as_select(),
            (employees::first_name, employees::last_name).nullable(),
        ))
        .first(conn)
        .optional()?;
    Ok(row.map(to_data))
}
}
