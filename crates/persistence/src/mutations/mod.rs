// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend-agnostic mutation modules.
//!
//! ## Module Organization
//!
//! - `work_orders`: Work order inserts and column updates
//! - `dispatch_guides`: Guide inserts, column updates and the completion reset
//! - `counters`: Rotation counter bookkeeping
//! - `directory`: Directory seeding and session bookkeeping
//!
//! Backend-specific helpers (e.g., `get_last_insert_rowid()`) come from the
//! `backend` module. All other code uses Diesel DSL exclusively.

pub mod counters;
pub mod directory;
pub mod dispatch_guides;
pub mod work_orders;

pub use counters::{
    record_assignment_mysql, record_assignment_sqlite, record_release_mysql,
    record_release_sqlite,
};
pub use directory::{
    create_session_mysql, create_session_sqlite, insert_employee_mysql, insert_employee_sqlite,
    insert_sales_order_mysql, insert_sales_order_sqlite, register_handler_mysql,
    register_handler_sqlite, update_session_activity_mysql, update_session_activity_sqlite,
};
pub use dispatch_guides::{
    insert_dispatch_guide_mysql, insert_dispatch_guide_sqlite, reset_guide_for_work_order_mysql,
    reset_guide_for_work_order_sqlite, update_dispatch_guide_mysql, update_dispatch_guide_sqlite,
};
pub use work_orders::{
    insert_work_order_mysql, insert_work_order_sqlite, update_work_order_mysql,
    update_work_order_sqlite,
};
