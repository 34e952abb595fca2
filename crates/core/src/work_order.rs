// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Work order (OT) state machine.

use despacho_domain::dates::{format_instant, is_before_tolerance, parse_instant};
use despacho_domain::{
    Candidate, DomainError, EmployeeRole, Entity, Field, FieldPermissions, GuideState, OtState,
    Reassignment, SalesOrder, WorkOrderSnapshot, Worker, select_assignee,
};

use crate::command::WorkOrderPatch;
use crate::error::CoreError;
use crate::state::{WorkOrderChanges, WorkOrderPlan, WorkOrderTransition};

/// Plans the creation of a work order for `order`.
///
/// # Arguments
///
/// * `order` - The originating sales order
/// * `existing_ot_id` - A work order already referencing the order, if any
/// * `workers` - Eligible pickers with their rotation counters
/// * `couriers` - Eligible couriers with their rotation counters
/// * `now` - Canonical creation timestamp
///
/// # Errors
///
/// Returns `DomainError::DuplicateWorkOrder` if the order already has a work order.
pub fn plan_work_order(
    order: &SalesOrder,
    existing_ot_id: Option<i64>,
    workers: &[Candidate],
    couriers: &[Candidate],
    now: &str,
) -> Result<WorkOrderPlan, CoreError> {
    if let Some(existing_ot_id) = existing_ot_id {
        return Err(CoreError::DomainViolation(
            DomainError::DuplicateWorkOrder {
                order_id: order.order_id,
                existing_ot_id,
            },
        ));
    }

    let worker: Option<Candidate> = select_assignee(workers).cloned();
    let state: OtState = if worker.is_some() {
        OtState::Assigned
    } else {
        OtState::Created
    };

    Ok(WorkOrderPlan {
        order_id: order.order_id,
        order_number: order.order_number(),
        customer: order.customer(),
        notes: order.work_order_notes(),
        created_at: now.to_string(),
        state,
        worker,
        courier: select_assignee(couriers).cloned(),
        guide_state: GuideState::initial_for(state),
        delivery_address: order.delivery_address.clone(),
    })
}

/// What the coordinator loaded for one work order update.
#[derive(Debug, Clone, Copy)]
pub struct WorkOrderContext<'a> {
    /// The locked row.
    pub current: &'a WorkOrderSnapshot,
    /// The acting employee's role.
    pub actor_role: EmployeeRole,
    /// Directory entry for `patch.worker_id`, if it exists.
    pub proposed_worker: Option<&'a Worker>,
}

/// Applies a patch to a locked work order.
///
/// Fields the actor's role may not edit are ignored. Checks run in field
/// order: worker, date, state, notes.
///
/// # Errors
///
/// - `InvalidWorker` if the new worker is unknown or not a picker
/// - `InvalidDate` if the date cannot be parsed
/// - `DateBeforeRecorded` if the date moves back more than the drift tolerance
/// - `InvalidState` if the state is unknown
pub fn apply_work_order_patch(
    ctx: WorkOrderContext<'_>,
    patch: &WorkOrderPatch,
) -> Result<WorkOrderTransition, CoreError> {
    let perms: FieldPermissions =
        FieldPermissions::for_role(ctx.actor_role, Entity::WorkOrder);
    let current: &WorkOrderSnapshot = ctx.current;
    let mut changes: WorkOrderChanges = WorkOrderChanges::default();
    let mut reassignment: Option<Reassignment> = None;

    if let Some(new_worker) = patch.worker_id
        && perms.allows(Field::Worker)
        && current.worker_id != Some(new_worker)
    {
        validate_picker(new_worker, ctx.proposed_worker)?;
        changes.worker_id = Some(new_worker);
        reassignment = Reassignment::between(current.worker_id, Some(new_worker));
    }

    if let Some(raw) = patch.fecha.as_deref()
        && perms.allows(Field::Date)
    {
        changes.fecha = Some(checked_date(raw, current.fecha.as_deref())?);
    }

    if let Some(raw) = patch.estado.as_deref()
        && perms.allows(Field::State)
    {
        changes.state = Some(raw.parse::<OtState>()?);
    }

    if let Some(notes) = &patch.notes
        && perms.allows(Field::Notes)
    {
        changes.notes = Some(notes.clone());
    }

    let reset_guide: bool =
        changes.state == Some(OtState::Completed) && current.state != OtState::Completed;

    Ok(WorkOrderTransition {
        ot_id: current.ot_id,
        changes,
        reset_guide,
        reassignment,
    })
}

fn validate_picker(worker_id: i64, worker: Option<&Worker>) -> Result<(), DomainError> {
    let worker: &Worker = worker
        .filter(|w| w.worker_id == worker_id)
        .ok_or_else(|| DomainError::InvalidWorker {
            worker_id,
            reason: String::from("employee not found"),
        })?;

    if worker.known_role() != Some(EmployeeRole::EmpleadoLogistica) {
        return Err(DomainError::InvalidWorker {
            worker_id,
            reason: format!(
                "role '{}' is not {}",
                worker.role,
                EmployeeRole::EmpleadoLogistica
            ),
        });
    }
    Ok(())
}

/// Normalizes `raw` and rejects it if it moves more than the drift
/// tolerance before `recorded`.
fn checked_date(raw: &str, recorded: Option<&str>) -> Result<String, DomainError> {
    let invalid = |error| DomainError::InvalidDate {
        input: raw.to_string(),
        error,
    };

    let requested = parse_instant(raw).map_err(invalid)?;
    let normalized: String = format_instant(requested).map_err(invalid)?;

    // An unreadable stored date cannot anchor the check.
    if let Some(recorded) = recorded
        && let Ok(recorded_instant) = parse_instant(recorded)
        && is_before_tolerance(recorded_instant, requested)
    {
        return Err(DomainError::DateBeforeRecorded {
            requested: normalized,
            recorded: recorded.to_string(),
        });
    }

    Ok(normalized)
}
