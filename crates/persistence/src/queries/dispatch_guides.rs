// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dispatch guide queries.
//!
//! Guides are listed with their courier company's name, their handler's
//! name and the state of the work order they belong to.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use despacho_domain::full_name;

use crate::data_models::DispatchGuideData;
use crate::diesel_schema::{courier_handlers, dispatch_guides, employees, work_orders};
use crate::error::PersistenceError;
use crate::rows::DispatchGuideRow;

type ListedGuide = (
    DispatchGuideRow,
    String,
    Option<(String, Option<String>)>,
    Option<(String, String)>,
);

fn to_data((row, ot_state, courier, handler): ListedGuide) -> DispatchGuideData {
    DispatchGuideData {
        guide_id: row.guide_id,
        ot_id: row.ot_id,
        ot_state,
        courier_id: row.courier_id,
        courier_name: courier.map(|(first, last)| full_name(&first, last.as_deref())),
        handler_id: row.handler_id,
        handler_name: handler.map(|(first, last)| full_name(&first, Some(&last))),
        delivery_address: row.delivery_address,
        fecha: row.fecha,
        state: row.state,
    }
}

/// Every guide joined to its work order, courier company and handler.
macro_rules! listed_guides {
    () => {
        dispatch_guides::table
            .inner_join(work_orders::table)
            .left_join(
                employees::table
                    .on(dispatch_guides::courier_id.eq(employees::employee_id.nullable())),
            )
            .left_join(
                courier_handlers::table
                    .on(dispatch_guides::handler_id.eq(courier_handlers::handler_id.nullable())),
            )
            .select((
                DispatchGuideRow::as_select(),
                work_orders::state,
                (employees::first_name, employees::last_name).nullable(),
                (courier_handlers::first_name, courier_handlers::last_name).nullable(),
            ))
    };
}

backend_fn! {
/// Lists every dispatch guide, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_dispatch_guides(conn: &mut _) -> Result<Vec<DispatchGuideData>, PersistenceError> {
    let rows: Vec<ListedGuide> = listed_guides!()
        .order(dispatch_guides::guide_id.desc())
        .load(conn)?;
    Ok(rows.into_iter().map(to_data).collect())
}
}

backend_fn! {
/// Lists the guides assigned to a courier company, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_dispatch_guides_for_courier(
    conn: &mut _,
    courier_id: i64,
) -> Result<Vec<DispatchGuideData>, PersistenceError> {
    let rows: Vec<ListedGuide> = listed_guides!()
        .filter(dispatch_guides::courier_id.eq(courier_id))
        .order(dispatch_guides::guide_id.desc())
        .load(conn)?;
    Ok(rows.into_iter().map(to_data).collect())
}
}

backend_fn! {
/// Retrieves one dispatch guide.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the guide is not found.
pub fn get_dispatch_guide(
    conn: &mut _,
    guide_id: i64,
) -> Result<Option<DispatchGuideData>, PersistenceError> {
    let row: Option<ListedGuide> = listed_guides!()
        .filter(dispatch_guides::guide_id.eq(guide_id))
        .first(conn)
        .optional()?;
    Ok(row.map(to_data))
}
}
