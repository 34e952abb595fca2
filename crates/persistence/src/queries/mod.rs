// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Query modules for the persistence layer.
//!
//! ## Module Organization
//!
//! - `directory`: Employees, sales orders, handlers and sessions
//! - `work_orders`: Work order lookups and listings
//! - `dispatch_guides`: Dispatch guide listings
//! - `balance`: Rotation counters and pending-load statistics
//!
//! ## Backend-Specific Functions
//!
//! All query functions are generated in backend-specific monomorphic versions:
//! - Functions suffixed with `_sqlite` for `SQLite`
//! - Functions suffixed with `_mysql` for `MySQL`/`MariaDB`

pub mod balance;
pub mod directory;
pub mod dispatch_guides;
pub mod work_orders;

pub use balance::{
    balance_entries, find_counter_mysql, find_counter_sqlite, pending_guide_loads_mysql,
    pending_guide_loads_sqlite, pending_work_order_loads_mysql, pending_work_order_loads_sqlite,
};
pub use directory::{
    eligible_candidates_mysql, eligible_candidates_sqlite, find_employee_mysql,
    find_employee_sqlite, find_handler_mysql, find_handler_sqlite, find_sales_order_mysql,
    find_sales_order_sqlite, get_session_by_token_mysql, get_session_by_token_sqlite,
    list_company_handlers_mysql, list_company_handlers_sqlite,
};
pub use dispatch_guides::{
    get_dispatch_guide_mysql, get_dispatch_guide_sqlite, list_dispatch_guides_for_courier_mysql,
    list_dispatch_guides_for_courier_sqlite, list_dispatch_guides_mysql,
    list_dispatch_guides_sqlite,
};
pub use work_orders::{
    find_work_order_for_order_mysql, find_work_order_for_order_sqlite, get_work_order_mysql,
    get_work_order_sqlite, list_work_orders_for_worker_mysql, list_work_orders_for_worker_sqlite,
    list_work_orders_mysql, list_work_orders_sqlite, work_order_state_mysql,
    work_order_state_sqlite,
};
