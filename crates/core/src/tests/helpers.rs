// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use despacho_domain::{
    GuideSnapshot, GuideState, HandlerRegistration, OtState, SalesOrder, WorkOrderSnapshot, Worker,
};

pub const NOW: &str = "2026-03-10T12:00:00.000Z";

pub fn create_test_order() -> SalesOrder {
    SalesOrder {
        order_id: 42,
        customer_name: String::from("Ana"),
        customer_last_name: Some(String::from("Rojas")),
        delivery_address: Some(String::from("Av. Matta 123")),
    }
}

pub fn create_test_work_order(state: OtState) -> WorkOrderSnapshot {
    WorkOrderSnapshot {
        ot_id: 1,
        worker_id: Some(10),
        fecha: Some(String::from("2026-03-10T08:00:00.000Z")),
        state,
        notes: Some(String::from("Pedido: PV-000042")),
    }
}

pub fn create_test_guide(state: GuideState) -> GuideSnapshot {
    GuideSnapshot {
        guide_id: 7,
        ot_id: 1,
        courier_id: Some(30),
        handler_id: None,
        fecha: None,
        state,
    }
}

pub fn create_test_picker(worker_id: i64) -> Worker {
    Worker {
        worker_id,
        role: String::from("EMPLEADO_LOGISTICA"),
        first_name: String::from("Marta"),
        last_name: Some(String::from("Soto")),
    }
}

pub const fn create_test_handler(handler_id: i64, company_id: i64) -> HandlerRegistration {
    HandlerRegistration {
        handler_id,
        company_id,
    }
}
