// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Directory queries.
//!
//! Employees, sales orders, courier handlers and sessions are owned by
//! external collaborators. The engine only reads them.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use despacho_domain::{
    Candidate, EmployeeRole, HandlerRegistration, RoleCategory, SalesOrder, Worker, full_name,
};
use tracing::debug;

use crate::data_models::{HandlerData, SessionData};
use crate::diesel_schema::{
    assignment_counters, courier_handlers, employees, sales_orders, sessions,
};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
struct EmployeeRow {
    employee_id: i64,
    role: String,
    first_name: String,
    last_name: Option<String>,
}

impl From<EmployeeRow> for Worker {
    fn from(row: EmployeeRow) -> Self {
        Self {
            worker_id: row.employee_id,
            role: row.role,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = courier_handlers)]
struct HandlerRow {
    handler_id: i64,
    company_id: i64,
    employee_id: Option<i64>,
    first_name: String,
    last_name: String,
    phone: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = sessions)]
struct SessionRow {
    session_id: i64,
    session_token: String,
    employee_id: i64,
    created_at: String,
    last_activity_at: String,
    expires_at: String,
}

backend_fn! {
/// Retrieves an employee by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the employee is not found.
pub fn find_employee(conn: &mut _, employee_id: i64) -> Result<Option<Worker>, PersistenceError> {
    let row: Option<EmployeeRow> = employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?;
    Ok(row.map(Worker::from))
}
}

backend_fn! {
/// Retrieves a sales order by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the order is not found.
pub fn find_sales_order(
    conn: &mut _,
    order_id: i64,
) -> Result<Option<SalesOrder>, PersistenceError> {
    let row: Option<(i64, String, Option<String>, Option<String>)> = sales_orders::table
        .filter(sales_orders::order_id.eq(order_id))
        .select((
            sales_orders::order_id,
            sales_orders::customer_name,
            sales_orders::customer_last_name,
            sales_orders::delivery_address,
        ))
        .first(conn)
        .optional()?;

    Ok(row.map(
        |(order_id, customer_name, customer_last_name, delivery_address)| SalesOrder {
            order_id,
            customer_name,
            customer_last_name,
            delivery_address,
        },
    ))
}
}

backend_fn! {
/// Retrieves a handler's registration.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the handler is not registered.
pub fn find_handler(
    conn: &mut _,
    handler_id: i64,
) -> Result<Option<HandlerRegistration>, PersistenceError> {
    let row: Option<(i64, i64)> = courier_handlers::table
        .filter(courier_handlers::handler_id.eq(handler_id))
        .select((courier_handlers::handler_id, courier_handlers::company_id))
        .first(conn)
        .optional()?;
    Ok(row.map(|(handler_id, company_id)| HandlerRegistration {
        handler_id,
        company_id,
    }))
}
}

backend_fn! {
/// Lists the handlers registered to a courier company, by last name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_company_handlers(
    conn: &mut _,
    company_id: i64,
) -> Result<Vec<HandlerData>, PersistenceError> {
    let rows: Vec<HandlerRow> = courier_handlers::table
        .filter(courier_handlers::company_id.eq(company_id))
        .order((courier_handlers::last_name.asc(), courier_handlers::handler_id.asc()))
        .select(HandlerRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| HandlerData {
            handler_id: row.handler_id,
            company_id: row.company_id,
            employee_id: row.employee_id,
            first_name: row.first_name,
            last_name: row.last_name,
            phone: row.phone,
        })
        .collect())
}
}

backend_fn! {
/// Loads the rotation pool for a role category.
///
/// Every employee whose directory role maps to `category` is returned with
/// their counter for that category, or `None` if they have never been
/// assigned under it.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn eligible_candidates(
    conn: &mut _,
    category: RoleCategory,
) -> Result<Vec<Candidate>, PersistenceError> {
    let eligible: EmployeeRole = category.eligible_role();

    let rows: Vec<(i64, String, String, Option<String>, Option<i64>)> = employees::table
        .left_join(
            assignment_counters::table.on(assignment_counters::worker_id
                .eq(employees::employee_id)
                .and(assignment_counters::category.eq(category.as_str()))),
        )
        .select((
            employees::employee_id,
            employees::role,
            employees::first_name,
            employees::last_name,
            assignment_counters::counter.nullable(),
        ))
        .load(conn)?;

    let pool: Vec<Candidate> = rows
        .into_iter()
        .filter(|(_, role, _, _, _)| EmployeeRole::parse_directory_role(role) == Some(eligible))
        .map(|(employee_id, _, first_name, last_name, counter)| {
            Candidate::new(
                employee_id,
                counter,
                full_name(&first_name, last_name.as_deref()),
            )
        })
        .collect();

    debug!(
        category = category.as_str(),
        pool = pool.len(),
        "Loaded rotation pool"
    );
    Ok(pool)
}
}

backend_fn! {
/// Retrieves a session by token.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the session is not found.
pub fn get_session_by_token(
    conn: &mut _,
    session_token: &str,
) -> Result<Option<SessionData>, PersistenceError> {
    debug!("Looking up session by token");

    let row: Option<SessionRow> = sessions::table
        .filter(sessions::session_token.eq(session_token))
        .select(SessionRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(|row| SessionData {
        session_id: row.session_id,
        session_token: row.session_token,
        employee_id: row.employee_id,
        created_at: row.created_at,
        last_activity_at: row.last_activity_at,
        expires_at: row.expires_at,
    }))
}
}
