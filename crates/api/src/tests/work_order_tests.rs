// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    complete_work_order, create_test_order, create_test_persistence, create_test_work_order,
    seed_staff,
};
use crate::{
    ApiError, CreateWorkOrderRequest, UpdateWorkOrdersRequest, WorkOrderUpdate,
    create_work_order, get_work_order, list_my_work_orders, list_work_orders, update_work_order,
    update_work_orders,
};

#[test]
fn test_create_work_order_reports_rotation_picks() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);
    let order_id = create_test_order(&mut persistence);

    let response =
        create_work_order(&mut persistence, &staff.chief, &CreateWorkOrderRequest { order_id })
            .unwrap();

    assert_eq!(response.order_number, format!("PV-{order_id:06}"));
    let worker = response.assigned_worker.unwrap();
    assert_eq!(worker.id, staff.picker.employee_id);
    assert_eq!(worker.name, "Pedro Lagos");
    let courier = response.assigned_courier.unwrap();
    assert_eq!(courier.id, staff.courier.employee_id);
    assert!(response.message.contains(&response.order_number));
}

#[test]
fn test_second_work_order_for_order_is_duplicate() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);
    let order_id = create_test_order(&mut persistence);
    let request = CreateWorkOrderRequest { order_id };
    create_work_order(&mut persistence, &staff.chief, &request).unwrap();

    let err = create_work_order(&mut persistence, &staff.chief, &request).unwrap_err();

    assert!(matches!(err, ApiError::DomainRuleViolation { .. }));
    assert_eq!(err.code(), "DUPLICATE");
}

#[test]
fn test_create_for_missing_order_is_not_found() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);

    let err = create_work_order(
        &mut persistence,
        &staff.chief,
        &CreateWorkOrderRequest { order_id: 4242 },
    )
    .unwrap_err();

    assert_eq!(err.code(), "ORDER_NOT_FOUND");
}

#[test]
fn test_single_update_rejects_mismatched_body_id() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);
    let (ot_id, _) = create_test_work_order(&mut persistence, &staff.chief);

    let update = WorkOrderUpdate {
        ot_id: Some(ot_id + 1),
        estado: Some(String::from("IN_PROGRESS")),
        ..WorkOrderUpdate::default()
    };
    let err = update_work_order(&mut persistence, &staff.chief, ot_id, update).unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
}

#[test]
fn test_single_update_returns_updated_id() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);
    let (ot_id, _) = create_test_work_order(&mut persistence, &staff.chief);

    let update = WorkOrderUpdate {
        estado: Some(String::from("en proceso")),
        ..WorkOrderUpdate::default()
    };
    let response = update_work_order(&mut persistence, &staff.picker, ot_id, update).unwrap();

    assert_eq!(response.updated_ids, vec![ot_id]);
    let work_order = get_work_order(&mut persistence, &staff.picker, ot_id).unwrap();
    assert_eq!(work_order.state, "IN_PROGRESS");
}

#[test]
fn test_empty_batch_is_rejected() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);

    let err = update_work_orders(
        &mut persistence,
        &staff.chief,
        UpdateWorkOrdersRequest { updates: vec![] },
    )
    .unwrap_err();

    assert_eq!(err.code(), "INVALID_INPUT");
}

#[test]
fn test_batch_item_without_id_is_rejected_before_any_write() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);
    let (ot_id, _) = create_test_work_order(&mut persistence, &staff.chief);

    let request = UpdateWorkOrdersRequest {
        updates: vec![
            WorkOrderUpdate {
                ot_id: Some(ot_id),
                estado: Some(String::from("COMPLETED")),
                ..WorkOrderUpdate::default()
            },
            WorkOrderUpdate {
                estado: Some(String::from("COMPLETED")),
                ..WorkOrderUpdate::default()
            },
        ],
    };
    let err = update_work_orders(&mut persistence, &staff.chief, request).unwrap_err();

    match err {
        ApiError::InvalidInput { field, .. } => assert_eq!(field, "updates[1].ot_id"),
        other => panic!("expected InvalidInput, got {other:?}"),
    }
    let work_order = get_work_order(&mut persistence, &staff.chief, ot_id).unwrap();
    assert_eq!(work_order.state, "ASSIGNED");
}

#[test]
fn test_batch_rolls_back_on_failing_item() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);
    let (first, _) = create_test_work_order(&mut persistence, &staff.chief);

    let request = UpdateWorkOrdersRequest {
        updates: vec![
            WorkOrderUpdate {
                ot_id: Some(first),
                estado: Some(String::from("COMPLETED")),
                ..WorkOrderUpdate::default()
            },
            WorkOrderUpdate {
                ot_id: Some(first + 100),
                estado: Some(String::from("COMPLETED")),
                ..WorkOrderUpdate::default()
            },
        ],
    };
    let err = update_work_orders(&mut persistence, &staff.chief, request).unwrap_err();

    assert_eq!(err.code(), "NOT_FOUND");
    let work_order = get_work_order(&mut persistence, &staff.chief, first).unwrap();
    assert_eq!(work_order.state, "ASSIGNED");
}

#[test]
fn test_get_missing_work_order_is_not_found() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);

    let err = get_work_order(&mut persistence, &staff.chief, 99).unwrap_err();

    assert!(matches!(err, ApiError::ResourceNotFound { .. }));
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn test_listings_scope_to_actor() {
    let mut persistence = create_test_persistence();
    let staff = seed_staff(&mut persistence);
    let (ot_id, _) = create_test_work_order(&mut persistence, &staff.chief);
    complete_work_order(&mut persistence, &staff.chief, ot_id);

    let all = list_work_orders(&mut persistence, &staff.chief).unwrap();
    let mine = list_my_work_orders(&mut persistence, &staff.picker).unwrap();
    let none = list_my_work_orders(&mut persistence, &staff.chief).unwrap();

    assert_eq!(all.work_orders.len(), 1);
    assert_eq!(mine.work_orders[0].ot_id, ot_id);
    assert_eq!(mine.work_orders[0].state, "COMPLETED");
    assert!(none.work_orders.is_empty());
}
