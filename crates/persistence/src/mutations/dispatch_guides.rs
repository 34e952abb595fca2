// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dispatch guide mutations.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use despacho::{GuideChanges, WorkOrderPlan};
use despacho_domain::GuideState;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::dispatch_guides;
use crate::error::PersistenceError;

/// Column values for a partial guide update.
#[derive(AsChangeset)]
#[diesel(table_name = dispatch_guides)]
struct GuideChangeset<'a> {
    courier_id: Option<Option<i64>>,
    fecha: Option<Option<&'a str>>,
    state: Option<&'a str>,
    handler_id: Option<Option<i64>>,
}

impl<'a> From<&'a GuideChanges> for GuideChangeset<'a> {
    fn from(changes: &'a GuideChanges) -> Self {
        Self {
            courier_id: changes.courier_id,
            fecha: changes.fecha.as_ref().map(Option::as_deref),
            state: changes.state.as_ref().map(GuideState::as_str),
            handler_id: changes.handler_id,
        }
    }
}

backend_fn! {
/// Inserts the guide paired with a freshly inserted work order.
///
/// The guide starts without a date and without a handler.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_dispatch_guide(
    conn: &mut _,
    ot_id: i64,
    plan: &WorkOrderPlan,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(dispatch_guides::table)
        .values((
            dispatch_guides::ot_id.eq(ot_id),
            dispatch_guides::courier_id.eq(plan.courier.as_ref().map(|c| c.worker_id)),
            dispatch_guides::delivery_address.eq(plan.delivery_address.as_deref()),
            dispatch_guides::state.eq(plan.guide_state.as_str()),
        ))
        .execute(conn)?;

    let guide_id: i64 = conn.get_last_insert_rowid()?;
    debug!(guide_id, ot_id, "Inserted dispatch guide");
    Ok(guide_id)
}
}

backend_fn! {
/// Writes the changed columns of a guide.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_dispatch_guide(
    conn: &mut _,
    guide_id: i64,
    changes: &GuideChanges,
) -> Result<(), PersistenceError> {
    if changes.is_empty() {
        return Ok(());
    }

    diesel::update(dispatch_guides::table.filter(dispatch_guides::guide_id.eq(guide_id)))
        .set(GuideChangeset::from(changes))
        .execute(conn)?;

    debug!(guide_id, "Updated dispatch guide");
    Ok(())
}
}

backend_fn! {
/// Resets the guide of a just-completed work order to `POR_ASIGNAR`,
/// clearing its handler and date.
///
/// Returns the number of guides reset.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn reset_guide_for_work_order(conn: &mut _, ot_id: i64) -> Result<usize, PersistenceError> {
    let guides = dispatch_guides::table.filter(dispatch_guides::ot_id.eq(ot_id));
    let reset: usize = diesel::update(guides)
        .set((
            dispatch_guides::state.eq(GuideState::PorAsignar.as_str()),
            dispatch_guides::handler_id.eq(None::<i64>),
            dispatch_guides::fecha.eq(None::<String>),
        ))
        .execute(conn)?;

    debug!(ot_id, reset, "Reset dispatch guide after completion");
    Ok(reset)
}
}
