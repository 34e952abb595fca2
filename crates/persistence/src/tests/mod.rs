// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod dispatch_guide_tests;

use despacho::WorkOrderPatch;
use despacho_domain::EmployeeRole;

use crate::{EngineError, Persistence};

/// Employee ids seeded by `seed_directory`.
pub struct Directory {
    pub chief: i64,
    pub pickers: [i64; 2],
    pub couriers: [i64; 2],
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Seeds one supervisor, two pickers and two courier companies.
///
/// Ids are assigned in insertion order, so pickers and couriers each sort
/// in the order listed.
pub fn seed_directory(persistence: &mut Persistence) -> Directory {
    let chief = persistence
        .insert_employee("JEFE_LOGISTICA", "Marta", Some("Soto"))
        .unwrap();
    let picker_a = persistence
        .insert_employee("EMPLEADO_LOGISTICA", "Pedro", Some("Lagos"))
        .unwrap();
    let picker_b = persistence
        .insert_employee("empleado_logistica", "Lucia", Some("Vera"))
        .unwrap();
    let courier_a = persistence
        .insert_employee("TRANSPORTISTA", "Rapido Sur", None)
        .unwrap();
    let courier_b = persistence
        .insert_employee("TRANSPORTISTA", "Carga Norte", None)
        .unwrap();

    Directory {
        chief,
        pickers: [picker_a, picker_b],
        couriers: [courier_a, courier_b],
    }
}

pub fn create_test_order(persistence: &mut Persistence) -> i64 {
    persistence
        .insert_sales_order("Ana", Some("Rojas"), Some("Av. Matta 123"))
        .unwrap()
}

/// Creates an order and its work order, returning `(ot_id, guide_id)`.
pub fn create_test_work_order(persistence: &mut Persistence) -> (i64, i64) {
    let order_id = create_test_order(persistence);
    let created = persistence.create_work_order(order_id).unwrap();
    (created.ot_id, created.guide_id)
}

/// Marks a work order completed as the logistics supervisor.
pub fn complete_work_order(persistence: &mut Persistence, ot_id: i64) {
    let mut patch = WorkOrderPatch::new(ot_id);
    patch.estado = Some(String::from("COMPLETED"));
    persistence
        .update_work_orders(EmployeeRole::JefeLogistica, &[patch])
        .unwrap();
}

/// The rule code of a rejection; panics on any other failure.
pub fn rejection_code(err: &EngineError) -> &'static str {
    err.domain_error()
        .map(despacho_domain::DomainError::code)
        .unwrap_or_else(|| panic!("expected a rule rejection, got {err}"))
}
