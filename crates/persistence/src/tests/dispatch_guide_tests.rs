// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use despacho::GuidePatch;
use despacho_domain::{EmployeeRole, RoleCategory};

use super::{
    Directory, complete_work_order, create_test_persistence, create_test_work_order,
    rejection_code, seed_directory,
};
use crate::Persistence;

const OWN_HANDLER: i64 = 501;
const FOREIGN_HANDLER: i64 = 502;

struct Fixture {
    persistence: Persistence,
    directory: Directory,
    guide_id: i64,
}

/// A guide whose work order is completed, owned by the first courier, with
/// one handler registered under each courier company.
fn completed_guide() -> Fixture {
    let mut persistence = create_test_persistence();
    let directory = seed_directory(&mut persistence);
    let (ot_id, guide_id) = create_test_work_order(&mut persistence);
    complete_work_order(&mut persistence, ot_id);

    persistence
        .register_handler(OWN_HANDLER, directory.couriers[0], "Jose", "Mora")
        .unwrap();
    persistence
        .register_handler(FOREIGN_HANDLER, directory.couriers[1], "Raul", "Diaz")
        .unwrap();

    Fixture {
        persistence,
        directory,
        guide_id,
    }
}

fn set_handler(guide_id: i64, handler_id: Option<i64>) -> GuidePatch {
    GuidePatch {
        handler_id: Some(handler_id),
        ..GuidePatch::new(guide_id)
    }
}

#[test]
fn test_guide_is_frozen_while_picking() {
    let mut persistence = create_test_persistence();
    let directory = seed_directory(&mut persistence);
    let (_, guide_id) = create_test_work_order(&mut persistence);

    let patch = GuidePatch {
        estado: Some(String::from("POR_ASIGNAR")),
        ..GuidePatch::new(guide_id)
    };
    let err = persistence
        .update_dispatch_guides(directory.chief, EmployeeRole::JefeLogistica, &[patch])
        .unwrap_err();

    assert_eq!(rejection_code(&err), "OT_NOT_COMPLETED");
    let guide = persistence.get_dispatch_guide(guide_id).unwrap().unwrap();
    assert_eq!(guide.state, "EN_PICKING");
}

#[test]
fn test_courier_assigning_own_handler_auto_promotes() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();

    persistence
        .update_dispatch_guides(
            directory.couriers[0],
            EmployeeRole::Transportista,
            &[set_handler(guide_id, Some(OWN_HANDLER))],
        )
        .unwrap();

    let guide = persistence.get_dispatch_guide(guide_id).unwrap().unwrap();
    assert_eq!(guide.state, "ASIGNADA");
    assert_eq!(guide.handler_id, Some(OWN_HANDLER));
    assert_eq!(guide.handler_name.as_deref(), Some("Jose Mora"));
    assert!(guide.fecha.is_some());
    assert_eq!(
        persistence
            .counter(OWN_HANDLER, RoleCategory::Courier)
            .unwrap(),
        Some(1)
    );
}

#[test]
fn test_courier_cannot_assign_handler_from_other_company() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();

    let err = persistence
        .update_dispatch_guides(
            directory.couriers[0],
            EmployeeRole::Transportista,
            &[set_handler(guide_id, Some(FOREIGN_HANDLER))],
        )
        .unwrap_err();

    assert_eq!(rejection_code(&err), "INVALID_HANDLER_COMPANY");
    let guide = persistence.get_dispatch_guide(guide_id).unwrap().unwrap();
    assert_eq!(guide.handler_id, None);
}

#[test]
fn test_courier_registered_with_handler_company_may_assign() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();
    // The acting courier is itself registered as a handler of the second company.
    persistence
        .register_handler(directory.couriers[0], directory.couriers[1], "Rapido", "Sur")
        .unwrap();

    persistence
        .update_dispatch_guides(
            directory.couriers[0],
            EmployeeRole::Transportista,
            &[set_handler(guide_id, Some(FOREIGN_HANDLER))],
        )
        .unwrap();

    let guide = persistence.get_dispatch_guide(guide_id).unwrap().unwrap();
    assert_eq!(guide.handler_id, Some(FOREIGN_HANDLER));
}

#[test]
fn test_unregistered_handler_is_rejected_for_every_role() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();

    let courier = persistence
        .update_dispatch_guides(
            directory.couriers[0],
            EmployeeRole::Transportista,
            &[set_handler(guide_id, Some(999))],
        )
        .unwrap_err();
    let chief = persistence
        .update_dispatch_guides(
            directory.chief,
            EmployeeRole::JefeLogistica,
            &[set_handler(guide_id, Some(999))],
        )
        .unwrap_err();

    assert_eq!(rejection_code(&courier), "INVALID_HANDLER");
    assert_eq!(rejection_code(&chief), "INVALID_HANDLER");
}

#[test]
fn test_clearing_handler_returns_guide_to_por_asignar() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();
    persistence
        .update_dispatch_guides(
            directory.chief,
            EmployeeRole::JefeLogistica,
            &[set_handler(guide_id, Some(OWN_HANDLER))],
        )
        .unwrap();

    persistence
        .update_dispatch_guides(
            directory.chief,
            EmployeeRole::JefeLogistica,
            &[set_handler(guide_id, None)],
        )
        .unwrap();

    let guide = persistence.get_dispatch_guide(guide_id).unwrap().unwrap();
    assert_eq!(guide.state, "POR_ASIGNAR");
    assert_eq!(guide.handler_id, None);
    assert_eq!(
        persistence
            .counter(OWN_HANDLER, RoleCategory::Courier)
            .unwrap(),
        Some(0)
    );
}

#[test]
fn test_handler_round_trip_leaves_counters_unchanged() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();
    persistence
        .update_dispatch_guides(
            directory.chief,
            EmployeeRole::JefeLogistica,
            &[set_handler(guide_id, Some(OWN_HANDLER))],
        )
        .unwrap();
    let own_before = persistence.counter(OWN_HANDLER, RoleCategory::Courier).unwrap();

    for handler in [FOREIGN_HANDLER, OWN_HANDLER, FOREIGN_HANDLER, OWN_HANDLER] {
        persistence
            .update_dispatch_guides(
                directory.chief,
                EmployeeRole::JefeLogistica,
                &[set_handler(guide_id, Some(handler))],
            )
            .unwrap();
    }

    assert_eq!(
        persistence.counter(OWN_HANDLER, RoleCategory::Courier).unwrap(),
        own_before
    );
    assert_eq!(
        persistence
            .counter(FOREIGN_HANDLER, RoleCategory::Courier)
            .unwrap(),
        Some(0)
    );
}

#[test]
fn test_requesting_asignada_without_handler_is_rejected() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();

    let patch = GuidePatch {
        estado: Some(String::from("ASIGNADA")),
        ..GuidePatch::new(guide_id)
    };
    let err = persistence
        .update_dispatch_guides(directory.chief, EmployeeRole::JefeLogistica, &[patch])
        .unwrap_err();

    assert_eq!(rejection_code(&err), "MISSING_ENCARGADO");
}

#[test]
fn test_regression_to_picking_is_rejected() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();

    let patch = GuidePatch {
        estado: Some(String::from("EN_PICKING")),
        ..GuidePatch::new(guide_id)
    };
    let err = persistence
        .update_dispatch_guides(directory.chief, EmployeeRole::JefeLogistica, &[patch])
        .unwrap_err();

    assert_eq!(rejection_code(&err), "INVALID_TRANSITION");
}

#[test]
fn test_delivered_guide_is_immutable() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();
    let deliver = GuidePatch {
        estado: Some(String::from("ENTREGADA")),
        ..GuidePatch::new(guide_id)
    };
    persistence
        .update_dispatch_guides(directory.chief, EmployeeRole::JefeLogistica, &[deliver])
        .unwrap();

    let err = persistence
        .update_dispatch_guides(
            directory.chief,
            EmployeeRole::JefeLogistica,
            &[set_handler(guide_id, Some(OWN_HANDLER))],
        )
        .unwrap_err();

    assert_eq!(rejection_code(&err), "ALREADY_DELIVERED");
    let guide = persistence.get_dispatch_guide(guide_id).unwrap().unwrap();
    assert_eq!(guide.state, "ENTREGADA");
    assert_eq!(guide.handler_id, None);
}

#[test]
fn test_picker_sending_date_with_state_change_is_forbidden() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();

    let patch = GuidePatch {
        estado: Some(String::from("ENTREGADA")),
        fecha: Some(String::from("2099-01-01T00:00:00Z")),
        ..GuidePatch::new(guide_id)
    };
    let err = persistence
        .update_dispatch_guides(
            directory.pickers[0],
            EmployeeRole::EmpleadoLogistica,
            &[patch],
        )
        .unwrap_err();

    assert_eq!(rejection_code(&err), "FORBIDDEN_FECHA");
}

#[test]
fn test_courier_cannot_move_guide_to_another_company() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();

    let patch = GuidePatch {
        courier_id: Some(Some(directory.couriers[1])),
        ..GuidePatch::new(guide_id)
    };
    persistence
        .update_dispatch_guides(directory.couriers[0], EmployeeRole::Transportista, &[patch])
        .unwrap();

    let guide = persistence.get_dispatch_guide(guide_id).unwrap().unwrap();
    assert_eq!(guide.courier_id, Some(directory.couriers[0]));
}

#[test]
fn test_guide_batch_stops_at_first_rejection() {
    let Fixture {
        mut persistence,
        directory,
        guide_id,
    } = completed_guide();

    let err = persistence
        .update_dispatch_guides(
            directory.chief,
            EmployeeRole::JefeLogistica,
            &[
                set_handler(guide_id, Some(OWN_HANDLER)),
                GuidePatch::new(4040),
            ],
        )
        .unwrap_err();

    assert_eq!(rejection_code(&err), "NOT_FOUND");
    let guide = persistence.get_dispatch_guide(guide_id).unwrap().unwrap();
    assert_eq!(guide.handler_id, None);
    assert_eq!(guide.state, "POR_ASIGNAR");
}

#[test]
fn test_courier_listing_only_shows_own_guides() {
    let mut persistence = create_test_persistence();
    let directory = seed_directory(&mut persistence);
    let (_, first) = create_test_work_order(&mut persistence);
    let (_, second) = create_test_work_order(&mut persistence);

    let own = persistence
        .list_dispatch_guides_for_courier(directory.couriers[0])
        .unwrap();
    let other = persistence
        .list_dispatch_guides_for_courier(directory.couriers[1])
        .unwrap();

    assert_eq!(own.iter().map(|g| g.guide_id).collect::<Vec<_>>(), vec![first]);
    assert_eq!(other.iter().map(|g| g.guide_id).collect::<Vec<_>>(), vec![second]);
    assert_eq!(own[0].courier_name.as_deref(), Some("Rapido Sur"));
}
