// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use despacho_domain::EmployeeRole;
use despacho_persistence::Persistence;

use crate::{
    AuthenticatedActor, CreateWorkOrderRequest, UpdateResponse, WorkOrderUpdate,
    create_work_order, update_work_order,
};

/// The seeded directory, as actors.
pub struct Staff {
    pub chief: AuthenticatedActor,
    pub picker: AuthenticatedActor,
    pub courier: AuthenticatedActor,
    pub other_courier: AuthenticatedActor,
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

/// Seeds a supervisor, one picker and two courier companies.
pub fn seed_staff(persistence: &mut Persistence) -> Staff {
    let mut add = |role: EmployeeRole, first: &str, last: Option<&str>| {
        let employee_id = persistence
            .insert_employee(role.as_str(), first, last)
            .unwrap();
        let name = despacho_domain::full_name(first, last);
        AuthenticatedActor::new(employee_id, role, name)
    };

    Staff {
        chief: add(EmployeeRole::JefeLogistica, "Marta", Some("Soto")),
        picker: add(EmployeeRole::EmpleadoLogistica, "Pedro", Some("Lagos")),
        courier: add(EmployeeRole::Transportista, "Rapido Sur", None),
        other_courier: add(EmployeeRole::Transportista, "Carga Norte", None),
    }
}

pub fn create_test_order(persistence: &mut Persistence) -> i64 {
    persistence
        .insert_sales_order("Ana", Some("Rojas"), Some("Av. Matta 123"))
        .unwrap()
}

/// Creates an order and its work order through the API, returning
/// `(ot_id, guide_id)`.
pub fn create_test_work_order(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> (i64, i64) {
    let order_id = create_test_order(persistence);
    let response =
        create_work_order(persistence, actor, &CreateWorkOrderRequest { order_id }).unwrap();
    (response.ot_id, response.guide_id)
}

/// Marks a work order completed as the supervisor.
pub fn complete_work_order(
    persistence: &mut Persistence,
    chief: &AuthenticatedActor,
    ot_id: i64,
) -> UpdateResponse {
    let update = WorkOrderUpdate {
        estado: Some(String::from("COMPLETED")),
        ..WorkOrderUpdate::default()
    };
    update_work_order(persistence, chief, ot_id, update).unwrap()
}
