// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory seeding and session bookkeeping.
//!
//! In production these rows come from the HR, sales and authentication
//! collaborators. The inserts here let a deployment seed a directory and let
//! tests build fixtures.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{courier_handlers, employees, sales_orders, sessions};
use crate::error::PersistenceError;

backend_fn! {
/// Inserts an employee.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_employee(
    conn: &mut _,
    role: &str,
    first_name: &str,
    last_name: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(employees::table)
        .values((
            employees::role.eq(role),
            employees::first_name.eq(first_name),
            employees::last_name.eq(last_name),
        ))
        .execute(conn)?;

    let employee_id: i64 = conn.get_last_insert_rowid()?;
    info!(employee_id, role, "Employee created");
    Ok(employee_id)
}
}

backend_fn! {
/// Inserts a sales order.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_sales_order(
    conn: &mut _,
    customer_name: &str,
    customer_last_name: Option<&str>,
    delivery_address: Option<&str>,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sales_orders::table)
        .values((
            sales_orders::customer_name.eq(customer_name),
            sales_orders::customer_last_name.eq(customer_last_name),
            sales_orders::delivery_address.eq(delivery_address),
        ))
        .execute(conn)?;

    let order_id: i64 = conn.get_last_insert_rowid()?;
    info!(order_id, "Sales order created");
    Ok(order_id)
}
}

backend_fn! {
/// Registers a courier handler under a company.
///
/// # Errors
///
/// Returns an error if the insert fails or the handler is already registered.
pub fn register_handler(
    conn: &mut _,
    handler_id: i64,
    company_id: i64,
    first_name: &str,
    last_name: &str,
) -> Result<(), PersistenceError> {
    diesel::insert_into(courier_handlers::table)
        .values((
            courier_handlers::handler_id.eq(handler_id),
            courier_handlers::company_id.eq(company_id),
            courier_handlers::first_name.eq(first_name),
            courier_handlers::last_name.eq(last_name),
        ))
        .execute(conn)?;

    info!(handler_id, company_id, "Handler registered");
    Ok(())
}
}

backend_fn! {
/// Creates a session for an employee.
///
/// # Errors
///
/// Returns an error if the session cannot be created.
pub fn create_session(
    conn: &mut _,
    session_token: &str,
    employee_id: i64,
    now: &str,
    expires_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(sessions::table)
        .values((
            sessions::session_token.eq(session_token),
            sessions::employee_id.eq(employee_id),
            sessions::created_at.eq(now),
            sessions::last_activity_at.eq(now),
            sessions::expires_at.eq(expires_at),
        ))
        .execute(conn)?;

    let session_id: i64 = conn.get_last_insert_rowid()?;
    debug!(session_id, employee_id, "Session created");
    Ok(session_id)
}
}

backend_fn! {
/// Updates the last activity timestamp for a session.
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_session_activity(
    conn: &mut _,
    session_id: i64,
    now: &str,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
        .set(sessions::last_activity_at.eq(now))
        .execute(conn)?;
    Ok(())
}
}
