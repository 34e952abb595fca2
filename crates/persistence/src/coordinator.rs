// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transaction coordinator.
//!
//! Every operation here runs in one exclusive transaction: rows are locked
//! in the order they are supplied, the pure state machines decide what
//! changes, and any rejection rolls the whole unit back. The coordinator is
//! written once, generic over `Store`, and runs unchanged on both backends.
//!
//! Counter bookkeeping is the one exception to all-or-nothing. It runs in a
//! nested savepoint, and a failure there is logged and swallowed.

use despacho::{
    CoreError, GuideContext, GuidePatch, GuideTransition, WorkOrderContext, WorkOrderPatch,
    WorkOrderPlan, WorkOrderTransition, apply_guide_patch, apply_work_order_patch,
    plan_work_order,
};
use despacho_domain::{
    Candidate, DomainError, EmployeeRole, GuideSnapshot, HandlerRegistration, Reassignment,
    RoleCategory, SalesOrder, WorkOrderSnapshot, Worker,
};
use tracing::{error, info, warn};

use crate::data_models::{AssignedPerson, BalanceStats, CreatedWorkOrder};
use crate::error::{EngineError, PersistenceError};
use crate::queries::balance_entries;
use crate::store::Store;

/// Creates a work order for a sales order, together with its guide.
///
/// # Errors
///
/// - `SalesOrderNotFound` if the order does not exist
/// - `DuplicateWorkOrder` if the order already has a work order
/// - `EngineError::Persistence` if the datastore fails
pub fn create_work_order<C: Store>(
    conn: &mut C,
    order_id: i64,
    now: &str,
) -> Result<CreatedWorkOrder, EngineError> {
    let result: Result<CreatedWorkOrder, EngineError> =
        conn.exclusive_transaction(|conn| -> Result<CreatedWorkOrder, EngineError> {
            let order: SalesOrder = conn
                .find_sales_order(order_id)?
                .ok_or(DomainError::SalesOrderNotFound(order_id))?;
            let existing: Option<i64> = conn.find_work_order_for_order(order_id)?;
            let workers: Vec<Candidate> =
                conn.eligible_candidates(RoleCategory::WorkerLogistics)?;
            let couriers: Vec<Candidate> = conn.eligible_candidates(RoleCategory::Courier)?;

            let plan: WorkOrderPlan = plan_work_order(&order, existing, &workers, &couriers, now)?;

            let ot_id: i64 = conn.insert_work_order(&plan)?;
            let guide_id: i64 = conn.insert_dispatch_guide(ot_id, &plan)?;

            if let Some(worker) = &plan.worker {
                best_effort(conn, "worker assignment", |conn| {
                    conn.record_assignment(worker.worker_id, RoleCategory::WorkerLogistics, now)
                        .map(|_| ())
                });
            }
            if let Some(courier) = &plan.courier {
                best_effort(conn, "courier assignment", |conn| {
                    conn.record_assignment(courier.worker_id, RoleCategory::Courier, now)
                        .map(|_| ())
                });
            }

            info!(
                ot_id,
                guide_id,
                order_id,
                worker_id = plan.worker.as_ref().map(|w| w.worker_id),
                courier_id = plan.courier.as_ref().map(|c| c.worker_id),
                state = plan.state.as_str(),
                "Work order created"
            );

            Ok(CreatedWorkOrder {
                ot_id,
                guide_id,
                order_number: plan.order_number,
                worker: plan.worker.map(assigned_person),
                courier: plan.courier.map(assigned_person),
            })
        });

    log_failure("create_work_order", &result);
    result
}

/// Applies a batch of work order patches, in the order supplied.
///
/// Returns the updated ids. The first failure rolls back the whole batch.
///
/// # Errors
///
/// - `WorkOrderNotFound` for a missing work order
/// - any rule violation raised by the work order state machine
/// - `EngineError::Persistence` if the datastore fails
pub fn update_work_orders<C: Store>(
    conn: &mut C,
    actor_role: EmployeeRole,
    patches: &[WorkOrderPatch],
    now: &str,
) -> Result<Vec<i64>, EngineError> {
    let result: Result<Vec<i64>, EngineError> =
        conn.exclusive_transaction(|conn| -> Result<Vec<i64>, EngineError> {
            patches
                .iter()
                .map(|patch| update_work_order(conn, actor_role, patch, now))
                .collect()
        });

    log_failure("update_work_orders", &result);
    result
}

fn update_work_order<C: Store>(
    conn: &mut C,
    actor_role: EmployeeRole,
    patch: &WorkOrderPatch,
    now: &str,
) -> Result<i64, EngineError> {
    let current: WorkOrderSnapshot = conn
        .lock_work_order(patch.ot_id)?
        .ok_or(DomainError::WorkOrderNotFound(patch.ot_id))?
        .into_snapshot()?;

    let proposed_worker: Option<Worker> = match patch.worker_id {
        Some(worker_id) => conn.find_employee(worker_id)?,
        None => None,
    };

    let transition: WorkOrderTransition = apply_work_order_patch(
        WorkOrderContext {
            current: &current,
            actor_role,
            proposed_worker: proposed_worker.as_ref(),
        },
        patch,
    )?;
    let ot_id: i64 = transition.ot_id;

    conn.update_work_order(ot_id, &transition.changes)?;

    if transition.reset_guide {
        let reset: usize = conn.reset_guide_for_work_order(ot_id)?;
        info!(ot_id, reset, "Work order completed; dispatch guide reset");
    }

    if let Some(reassignment) = transition.reassignment {
        best_effort(conn, "worker reassignment", |conn| {
            settle(conn, reassignment, RoleCategory::WorkerLogistics, now)
        });
    }

    info!(ot_id, role = actor_role.as_str(), "Work order updated");
    Ok(ot_id)
}

/// Applies a batch of dispatch guide patches, in the order supplied.
///
/// Processing stops at the first rejected guide, and the whole batch is
/// rolled back.
///
/// # Errors
///
/// - `DispatchGuideNotFound` for a missing guide
/// - any rule violation raised by the dispatch guide state machine
/// - `EngineError::Persistence` if the datastore fails
pub fn update_dispatch_guides<C: Store>(
    conn: &mut C,
    actor_id: i64,
    actor_role: EmployeeRole,
    patches: &[GuidePatch],
    now: &str,
) -> Result<Vec<i64>, EngineError> {
    let result: Result<Vec<i64>, EngineError> =
        conn.exclusive_transaction(|conn| -> Result<Vec<i64>, EngineError> {
            let actor_registration: Option<HandlerRegistration> =
                if actor_role == EmployeeRole::Transportista {
                    conn.find_handler(actor_id)?
                } else {
                    None
                };

            patches
                .iter()
                .map(|patch| {
                    update_dispatch_guide(
                        conn,
                        actor_id,
                        actor_role,
                        actor_registration.as_ref(),
                        patch,
                        now,
                    )
                })
                .collect()
        });

    log_failure("update_dispatch_guides", &result);
    result
}

fn update_dispatch_guide<C: Store>(
    conn: &mut C,
    actor_id: i64,
    actor_role: EmployeeRole,
    actor_registration: Option<&HandlerRegistration>,
    patch: &GuidePatch,
    now: &str,
) -> Result<i64, EngineError> {
    let current: GuideSnapshot = conn
        .lock_dispatch_guide(patch.guide_id)?
        .ok_or(DomainError::DispatchGuideNotFound(patch.guide_id))?
        .into_snapshot()?;

    let ot_state = conn.work_order_state(current.ot_id)?;
    let proposed_handler: Option<HandlerRegistration> = match patch.proposed_handler() {
        Some(handler_id) => conn.find_handler(handler_id)?,
        None => None,
    };

    let transition: GuideTransition = apply_guide_patch(
        GuideContext {
            current: &current,
            ot_state,
            actor_id,
            actor_role,
            proposed_handler: proposed_handler.as_ref(),
            actor_registration,
            now,
        },
        patch,
    )?;
    let guide_id: i64 = transition.guide_id;

    // Couriers are checked by the state machine; supervisors only here.
    if let Some(Some(handler_id)) = transition.changes.handler_id
        && proposed_handler.is_none()
    {
        return Err(DomainError::InvalidHandler(handler_id).into());
    }

    conn.update_dispatch_guide(guide_id, &transition.changes)?;

    if let Some(reassignment) = transition.handler_reassignment {
        best_effort(conn, "handler reassignment", |conn| {
            settle_handlers(conn, reassignment, now)
        });
    }

    info!(
        guide_id,
        role = actor_role.as_str(),
        state = transition.changes.state.map(|s| s.as_str()),
        "Dispatch guide updated"
    );
    Ok(guide_id)
}

/// Computes pending load for every picker and courier.
///
/// # Errors
///
/// Returns an error if the datastore fails.
pub fn balance_stats<C: Store>(conn: &mut C) -> Result<BalanceStats, PersistenceError> {
    let workers: Vec<Candidate> = conn.eligible_candidates(RoleCategory::WorkerLogistics)?;
    let couriers: Vec<Candidate> = conn.eligible_candidates(RoleCategory::Courier)?;
    let worker_loads = conn.pending_work_order_loads()?;
    let courier_loads = conn.pending_guide_loads()?;

    Ok(BalanceStats {
        workers: balance_entries(workers, &worker_loads)?,
        couriers: balance_entries(couriers, &courier_loads)?,
    })
}

fn assigned_person(candidate: Candidate) -> AssignedPerson {
    AssignedPerson {
        id: candidate.worker_id,
        name: candidate.display_name,
    }
}

/// Moves one unit of rotation load from `reassignment.from` to `reassignment.to`.
fn settle<C: Store>(
    conn: &mut C,
    reassignment: Reassignment,
    category: RoleCategory,
    now: &str,
) -> Result<(), PersistenceError> {
    if let Some(from) = reassignment.from {
        conn.record_release(from, category, now)?;
    }
    if let Some(to) = reassignment.to {
        conn.record_assignment(to, category, now)?;
    }
    Ok(())
}

/// Like `settle`, but only handlers present in the registry are counted.
fn settle_handlers<C: Store>(
    conn: &mut C,
    reassignment: Reassignment,
    now: &str,
) -> Result<(), PersistenceError> {
    let mut registered = |handler_id: Option<i64>| -> Result<Option<i64>, PersistenceError> {
        match handler_id {
            Some(id) => Ok(conn.find_handler(id)?.map(|h| h.handler_id)),
            None => Ok(None),
        }
    };
    let from: Option<i64> = registered(reassignment.from)?;
    let to: Option<i64> = registered(reassignment.to)?;

    settle(conn, Reassignment { from, to }, RoleCategory::Courier, now)
}

/// Runs counter bookkeeping in a savepoint; failures are logged and dropped.
fn best_effort<C, F>(conn: &mut C, what: &'static str, f: F)
where
    C: Store,
    F: FnOnce(&mut C) -> Result<(), PersistenceError>,
{
    if let Err(err) = conn.transaction(f) {
        warn!(error = %err, "Counter bookkeeping for {what} failed; continuing");
    }
}

fn log_failure<T>(operation: &'static str, result: &Result<T, EngineError>) {
    match result {
        Ok(_) => {}
        Err(EngineError::Rejected(CoreError::DomainViolation(err))) => {
            info!(operation, code = err.code(), "Request rejected: {err}");
        }
        Err(err) => {
            error!(operation, error = %err, "Request failed");
        }
    }
}
