// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The storage operations the transaction coordinator needs.
//!
//! `Store` is implemented for both backend connections by delegating to the
//! monomorphic `_sqlite` / `_mysql` functions generated by `backend_fn!`.

use std::collections::HashMap;

use diesel::{MysqlConnection, SqliteConnection};
use despacho::{GuideChanges, WorkOrderChanges, WorkOrderPlan};
use despacho_domain::{Candidate, HandlerRegistration, OtState, RoleCategory, SalesOrder, Worker};

use crate::backend::PersistenceBackend;
use crate::error::PersistenceError;
use crate::{mutations, queries};

pub trait Store: PersistenceBackend {
    fn find_sales_order(&mut self, order_id: i64) -> Result<Option<SalesOrder>, PersistenceError>;
    fn find_work_order_for_order(&mut self, order_id: i64) -> Result<Option<i64>, PersistenceError>;
    fn eligible_candidates(
        &mut self,
        category: RoleCategory,
    ) -> Result<Vec<Candidate>, PersistenceError>;
    fn find_employee(&mut self, employee_id: i64) -> Result<Option<Worker>, PersistenceError>;
    fn find_handler(
        &mut self,
        handler_id: i64,
    ) -> Result<Option<HandlerRegistration>, PersistenceError>;
    fn work_order_state(&mut self, ot_id: i64) -> Result<Option<OtState>, PersistenceError>;
    fn insert_work_order(&mut self, plan: &WorkOrderPlan) -> Result<i64, PersistenceError>;
    fn insert_dispatch_guide(
        &mut self,
        ot_id: i64,
        plan: &WorkOrderPlan,
    ) -> Result<i64, PersistenceError>;
    fn update_work_order(
        &mut self,
        ot_id: i64,
        changes: &WorkOrderChanges,
    ) -> Result<(), PersistenceError>;
    fn update_dispatch_guide(
        &mut self,
        guide_id: i64,
        changes: &GuideChanges,
    ) -> Result<(), PersistenceError>;
    fn reset_guide_for_work_order(&mut self, ot_id: i64) -> Result<usize, PersistenceError>;
    fn record_assignment(
        &mut self,
        worker_id: i64,
        category: RoleCategory,
        now: &str,
    ) -> Result<i64, PersistenceError>;
    fn record_release(
        &mut self,
        worker_id: i64,
        category: RoleCategory,
        now: &str,
    ) -> Result<Option<i64>, PersistenceError>;
    fn pending_work_order_loads(&mut self) -> Result<HashMap<i64, i64>, PersistenceError>;
    fn pending_guide_loads(&mut self) -> Result<HashMap<i64, i64>, PersistenceError>;
}

macro_rules! impl_store {
    ($conn:ty, $backend:ident) => {
        pastey::paste! {
            impl Store for $conn {
                fn find_sales_order(
                    &mut self,
                    order_id: i64,
                ) -> Result<Option<SalesOrder>, PersistenceError> {
                    queries::[<find_sales_order_ $backend>](self, order_id)
                }

                fn find_work_order_for_order(
                    &mut self,
                    order_id: i64,
                ) -> Result<Option<i64>, PersistenceError> {
                    queries::[<find_work_order_for_order_ $backend>](self, order_id)
                }

                fn eligible_candidates(
                    &mut self,
                    category: RoleCategory,
                ) -> Result<Vec<Candidate>, PersistenceError> {
                    queries::[<eligible_candidates_ $backend>](self, category)
                }

                fn find_employee(
                    &mut self,
                    employee_id: i64,
                ) -> Result<Option<Worker>, PersistenceError> {
                    queries::[<find_employee_ $backend>](self, employee_id)
                }

                fn find_handler(
                    &mut self,
                    handler_id: i64,
                ) -> Result<Option<HandlerRegistration>, PersistenceError> {
                    queries::[<find_handler_ $backend>](self, handler_id)
                }

                fn work_order_state(
                    &mut self,
                    ot_id: i64,
                ) -> Result<Option<OtState>, PersistenceError> {
                    queries::[<work_order_state_ $backend>](self, ot_id)
                }

                fn insert_work_order(
                    &mut self,
                    plan: &WorkOrderPlan,
                ) -> Result<i64, PersistenceError> {
                    mutations::[<insert_work_order_ $backend>](self, plan)
                }

                fn insert_dispatch_guide(
                    &mut self,
                    ot_id: i64,
                    plan: &WorkOrderPlan,
                ) -> Result<i64, PersistenceError> {
                    mutations::[<insert_dispatch_guide_ $backend>](self, ot_id, plan)
                }

                fn update_work_order(
                    &mut self,
                    ot_id: i64,
                    changes: &WorkOrderChanges,
                ) -> Result<(), PersistenceError> {
                    mutations::[<update_work_order_ $backend>](self, ot_id, changes)
                }

                fn update_dispatch_guide(
                    &mut self,
                    guide_id: i64,
                    changes: &GuideChanges,
                ) -> Result<(), PersistenceError> {
                    mutations::[<update_dispatch_guide_ $backend>](self, guide_id, changes)
                }

                fn reset_guide_for_work_order(
                    &mut self,
                    ot_id: i64,
                ) -> Result<usize, PersistenceError> {
                    mutations::[<reset_guide_for_work_order_ $backend>](self, ot_id)
                }

                fn record_assignment(
                    &mut self,
                    worker_id: i64,
                    category: RoleCategory,
                    now: &str,
                ) -> Result<i64, PersistenceError> {
                    mutations::[<record_assignment_ $backend>](self, worker_id, category, now)
                }

                fn record_release(
                    &mut self,
                    worker_id: i64,
                    category: RoleCategory,
                    now: &str,
                ) -> Result<Option<i64>, PersistenceError> {
                    mutations::[<record_release_ $backend>](self, worker_id, category, now)
                }

                fn pending_work_order_loads(
                    &mut self,
                ) -> Result<HashMap<i64, i64>, PersistenceError> {
                    queries::[<pending_work_order_loads_ $backend>](self)
                }

                fn pending_guide_loads(&mut self) -> Result<HashMap<i64, i64>, PersistenceError> {
                    queries::[<pending_guide_loads_ $backend>](self)
                }
            }
        }
    };
}

impl_store!(SqliteConnection, sqlite);
impl_store!(MysqlConnection, mysql);
