// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use despacho_domain::{DomainError, EmployeeRole, OtState, Reassignment, Worker};

use super::helpers::{create_test_picker, create_test_work_order};
use crate::{WorkOrderContext, WorkOrderPatch, apply_work_order_patch};

fn code_of(result: Result<crate::WorkOrderTransition, crate::CoreError>) -> &'static str {
    result.unwrap_err().domain_error().unwrap().code()
}

#[test]
fn test_supervisor_reassigns_worker() {
    let current = create_test_work_order(OtState::Assigned);
    let picker = create_test_picker(12);
    let mut patch = WorkOrderPatch::new(1);
    patch.worker_id = Some(12);

    let transition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::JefeLogistica,
            proposed_worker: Some(&picker),
        },
        &patch,
    )
    .unwrap();

    assert_eq!(transition.changes.worker_id, Some(12));
    assert_eq!(
        transition.reassignment,
        Some(Reassignment {
            from: Some(10),
            to: Some(12),
        })
    );
    assert!(!transition.reset_guide);
}

#[test]
fn test_worker_field_ignored_for_picker_role() {
    let current = create_test_work_order(OtState::Assigned);
    let mut patch = WorkOrderPatch::new(1);
    patch.worker_id = Some(99);

    let transition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::EmpleadoLogistica,
            proposed_worker: None,
        },
        &patch,
    )
    .unwrap();

    assert!(transition.changes.is_empty());
    assert!(transition.reassignment.is_none());
}

#[test]
fn test_same_worker_is_a_no_op() {
    let current = create_test_work_order(OtState::Assigned);
    let mut patch = WorkOrderPatch::new(1);
    patch.worker_id = Some(10);

    let transition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::JefeLogistica,
            proposed_worker: None,
        },
        &patch,
    )
    .unwrap();

    assert!(transition.changes.is_empty());
}

#[test]
fn test_unknown_worker_is_rejected() {
    let current = create_test_work_order(OtState::Assigned);
    let mut patch = WorkOrderPatch::new(1);
    patch.worker_id = Some(404);

    let result = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::JefeLogistica,
            proposed_worker: None,
        },
        &patch,
    );

    assert_eq!(code_of(result), "INVALID_WORKER");
}

#[test]
fn test_worker_with_wrong_role_is_rejected() {
    let current = create_test_work_order(OtState::Assigned);
    let courier = Worker {
        worker_id: 20,
        role: String::from("TRANSPORTISTA"),
        first_name: String::from("Pablo"),
        last_name: None,
    };
    let mut patch = WorkOrderPatch::new(1);
    patch.worker_id = Some(20);

    let err = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::JefeLogistica,
            proposed_worker: Some(&courier),
        },
        &patch,
    )
    .unwrap_err();

    assert!(matches!(
        err.domain_error(),
        Some(DomainError::InvalidWorker { worker_id: 20, .. })
    ));
}

#[test]
fn test_date_is_normalized() {
    let current = create_test_work_order(OtState::InProgress);
    let mut patch = WorkOrderPatch::new(1);
    patch.fecha = Some(String::from("2026-03-11 09:30"));

    let transition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::EmpleadoLogistica,
            proposed_worker: None,
        },
        &patch,
    )
    .unwrap();

    assert_eq!(
        transition.changes.fecha.as_deref(),
        Some("2026-03-11T09:30:00.000Z")
    );
}

#[test]
fn test_date_within_drift_tolerance_is_accepted() {
    let current = create_test_work_order(OtState::InProgress);
    let mut patch = WorkOrderPatch::new(1);
    patch.fecha = Some(String::from("2026-03-09T10:00:00Z"));

    let transition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::JefeLogistica,
            proposed_worker: None,
        },
        &patch,
    )
    .unwrap();

    assert_eq!(
        transition.changes.fecha.as_deref(),
        Some("2026-03-09T10:00:00.000Z")
    );
}

#[test]
fn test_date_beyond_drift_tolerance_is_rejected() {
    let current = create_test_work_order(OtState::InProgress);
    let mut patch = WorkOrderPatch::new(1);
    patch.fecha = Some(String::from("2026-03-08T07:59:00Z"));

    let err = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::JefeLogistica,
            proposed_worker: None,
        },
        &patch,
    )
    .unwrap_err();

    assert!(matches!(
        err.domain_error(),
        Some(DomainError::DateBeforeRecorded { .. })
    ));
    assert_eq!(err.domain_error().unwrap().code(), "INVALID_DATE");
}

#[test]
fn test_unparseable_date_is_rejected() {
    let current = create_test_work_order(OtState::InProgress);
    let mut patch = WorkOrderPatch::new(1);
    patch.fecha = Some(String::from("mañana"));

    let result = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::JefeLogistica,
            proposed_worker: None,
        },
        &patch,
    );

    assert_eq!(code_of(result), "INVALID_DATE");
}

#[test]
fn test_completing_requests_guide_reset() {
    let current = create_test_work_order(OtState::InProgress);
    let mut patch = WorkOrderPatch::new(1);
    patch.estado = Some(String::from("completada"));

    let transition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::EmpleadoLogistica,
            proposed_worker: None,
        },
        &patch,
    )
    .unwrap();

    assert_eq!(transition.changes.state, Some(OtState::Completed));
    assert!(transition.reset_guide);
}

#[test]
fn test_recompleting_does_not_reset_guide() {
    let current = create_test_work_order(OtState::Completed);
    let mut patch = WorkOrderPatch::new(1);
    patch.estado = Some(String::from("COMPLETED"));

    let transition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::JefeLogistica,
            proposed_worker: None,
        },
        &patch,
    )
    .unwrap();

    assert!(!transition.reset_guide);
}

#[test]
fn test_unknown_state_is_rejected() {
    let current = create_test_work_order(OtState::Assigned);
    let mut patch = WorkOrderPatch::new(1);
    patch.estado = Some(String::from("ARCHIVED"));

    let result = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::JefeLogistica,
            proposed_worker: None,
        },
        &patch,
    );

    assert_eq!(code_of(result), "INVALID_STATE");
}

#[test]
fn test_courier_role_changes_nothing_on_work_orders() {
    let current = create_test_work_order(OtState::Assigned);
    let mut patch = WorkOrderPatch::new(1);
    patch.estado = Some(String::from("COMPLETED"));
    patch.notes = Some(None);

    let transition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::Transportista,
            proposed_worker: None,
        },
        &patch,
    )
    .unwrap();

    assert!(transition.changes.is_empty());
    assert!(!transition.reset_guide);
}

#[test]
fn test_notes_can_be_cleared() {
    let current = create_test_work_order(OtState::Assigned);
    let mut patch = WorkOrderPatch::new(1);
    patch.notes = Some(None);

    let transition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role: EmployeeRole::EmpleadoLogistica,
            proposed_worker: None,
        },
        &patch,
    )
    .unwrap();

    assert_eq!(transition.changes.notes, Some(None));
}
