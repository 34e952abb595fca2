// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations.
//!
//! Each operation takes an already resolved actor. Single and batch updates
//! share one path: a single update is a batch of one.

use despacho::{GuidePatch, WorkOrderPatch};
use despacho_persistence::{
    BalanceStats, CreatedWorkOrder, DispatchGuideData, HandlerData, Persistence, WorkOrderData,
};
use tracing::info;

use crate::auth::AuthenticatedActor;
use crate::error::{
    ApiError, translate_domain_error, translate_engine_error, translate_persistence_error,
};
use crate::request_response::{
    BalanceStatsResponse, CreateWorkOrderRequest, CreateWorkOrderResponse, DispatchGuideUpdate,
    ListDispatchGuidesResponse, ListHandlersResponse, ListWorkOrdersResponse,
    UpdateDispatchGuidesRequest, UpdateResponse, UpdateWorkOrdersRequest, WorkOrderUpdate,
};

/// Creates the work order for a sales order, along with its dispatch guide.
///
/// # Errors
///
/// Returns an error if:
/// - The sales order does not exist (`ORDER_NOT_FOUND`)
/// - The sales order already has a work order (`DUPLICATE`)
/// - Database operations fail
pub fn create_work_order(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: &CreateWorkOrderRequest,
) -> Result<CreateWorkOrderResponse, ApiError> {
    info!(
        employee_id = actor.employee_id,
        order_id = request.order_id,
        "Handling create_work_order request"
    );

    let created: CreatedWorkOrder = persistence
        .create_work_order(request.order_id)
        .map_err(translate_engine_error)?;

    Ok(CreateWorkOrderResponse::from(created))
}

/// Updates one work order.
///
/// # Errors
///
/// Returns an error if the work order does not exist, a rule rejects the
/// change, or database operations fail.
pub fn update_work_order(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    ot_id: i64,
    update: WorkOrderUpdate,
) -> Result<UpdateResponse, ApiError> {
    if let Some(body_id) = update.ot_id
        && body_id != ot_id
    {
        return Err(ApiError::invalid_input(
            "ot_id",
            format!("Body targets work order {body_id} but the path targets {ot_id}"),
        ));
    }

    apply_work_order_patches(persistence, actor, vec![update.into_patch(ot_id)])
}

/// Updates several work orders atomically, in the order supplied.
///
/// # Errors
///
/// Returns an error if:
/// - The batch is empty or an item has no `ot_id`
/// - Any item fails; no item is applied in that case
/// - Database operations fail
pub fn update_work_orders(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: UpdateWorkOrdersRequest,
) -> Result<UpdateResponse, ApiError> {
    if request.updates.is_empty() {
        return Err(ApiError::invalid_input("updates", "No updates provided"));
    }

    let patches: Vec<WorkOrderPatch> = request
        .updates
        .into_iter()
        .enumerate()
        .map(|(index, update)| {
            let ot_id: i64 = update.ot_id.ok_or_else(|| {
                ApiError::invalid_input(&format!("updates[{index}].ot_id"), "Missing work order id")
            })?;
            Ok(update.into_patch(ot_id))
        })
        .collect::<Result<_, ApiError>>()?;

    apply_work_order_patches(persistence, actor, patches)
}

fn apply_work_order_patches(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    patches: Vec<WorkOrderPatch>,
) -> Result<UpdateResponse, ApiError> {
    info!(
        employee_id = actor.employee_id,
        role = actor.role.as_str(),
        count = patches.len(),
        "Handling work order update"
    );

    let updated_ids: Vec<i64> = persistence
        .update_work_orders(actor.role, &patches)
        .map_err(translate_engine_error)?;

    Ok(UpdateResponse {
        message: format!("{} work order(s) updated", updated_ids.len()),
        updated_ids,
    })
}

/// Updates one dispatch guide.
///
/// # Errors
///
/// Returns an error if the guide does not exist, a rule rejects the change,
/// or database operations fail.
pub fn update_dispatch_guide(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    guide_id: i64,
    update: DispatchGuideUpdate,
) -> Result<UpdateResponse, ApiError> {
    if let Some(body_id) = update.guide_id
        && body_id != guide_id
    {
        return Err(ApiError::invalid_input(
            "guide_id",
            format!("Body targets dispatch guide {body_id} but the path targets {guide_id}"),
        ));
    }

    apply_guide_patches(persistence, actor, vec![update.into_patch(guide_id)])
}

/// Updates several dispatch guides atomically, in the order supplied.
///
/// Processing stops at the first rejected guide.
///
/// # Errors
///
/// Returns an error if:
/// - The batch is empty or an item has no `guide_id`
/// - Any item fails; no item is applied in that case
/// - Database operations fail
pub fn update_dispatch_guides(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    request: UpdateDispatchGuidesRequest,
) -> Result<UpdateResponse, ApiError> {
    if request.updates.is_empty() {
        return Err(ApiError::invalid_input("updates", "No updates provided"));
    }

    let patches: Vec<GuidePatch> = request
        .updates
        .into_iter()
        .enumerate()
        .map(|(index, update)| {
            let guide_id: i64 = update.guide_id.ok_or_else(|| {
                ApiError::invalid_input(
                    &format!("updates[{index}].guide_id"),
                    "Missing dispatch guide id",
                )
            })?;
            Ok(update.into_patch(guide_id))
        })
        .collect::<Result<_, ApiError>>()?;

    apply_guide_patches(persistence, actor, patches)
}

fn apply_guide_patches(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    patches: Vec<GuidePatch>,
) -> Result<UpdateResponse, ApiError> {
    info!(
        employee_id = actor.employee_id,
        role = actor.role.as_str(),
        count = patches.len(),
        "Handling dispatch guide update"
    );

    let updated_ids: Vec<i64> = persistence
        .update_dispatch_guides(actor.employee_id, actor.role, &patches)
        .map_err(translate_engine_error)?;

    Ok(UpdateResponse {
        message: format!("{} dispatch guide(s) updated", updated_ids.len()),
        updated_ids,
    })
}

/// Returns pending load per picker and per courier.
///
/// # Errors
///
/// Returns an error if database operations fail.
pub fn get_balance_stats(
    persistence: &mut Persistence,
    _actor: &AuthenticatedActor,
) -> Result<BalanceStatsResponse, ApiError> {
    let stats: BalanceStats = persistence
        .balance_stats()
        .map_err(translate_persistence_error)?;
    Ok(BalanceStatsResponse::from(stats))
}

/// # Errors
///
/// Returns an error if database operations fail.
pub fn list_work_orders(
    persistence: &mut Persistence,
    _actor: &AuthenticatedActor,
) -> Result<ListWorkOrdersResponse, ApiError> {
    let work_orders: Vec<WorkOrderData> = persistence
        .list_work_orders()
        .map_err(translate_persistence_error)?;
    Ok(ListWorkOrdersResponse { work_orders })
}

/// Lists the work orders owned by the acting employee.
///
/// # Errors
///
/// Returns an error if database operations fail.
pub fn list_my_work_orders(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListWorkOrdersResponse, ApiError> {
    let work_orders: Vec<WorkOrderData> = persistence
        .list_work_orders_for_worker(actor.employee_id)
        .map_err(translate_persistence_error)?;
    Ok(ListWorkOrdersResponse { work_orders })
}

/// # Errors
///
/// Returns `NOT_FOUND` if the work order does not exist, or an internal
/// error if database operations fail.
pub fn get_work_order(
    persistence: &mut Persistence,
    _actor: &AuthenticatedActor,
    ot_id: i64,
) -> Result<WorkOrderData, ApiError> {
    persistence
        .get_work_order(ot_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            translate_domain_error(despacho_domain::DomainError::WorkOrderNotFound(ot_id))
        })
}

/// # Errors
///
/// Returns an error if database operations fail.
pub fn list_dispatch_guides(
    persistence: &mut Persistence,
    _actor: &AuthenticatedActor,
) -> Result<ListDispatchGuidesResponse, ApiError> {
    let dispatch_guides: Vec<DispatchGuideData> = persistence
        .list_dispatch_guides()
        .map_err(translate_persistence_error)?;
    Ok(ListDispatchGuidesResponse { dispatch_guides })
}

/// Lists the dispatch guides whose courier is the acting employee.
///
/// # Errors
///
/// Returns an error if database operations fail.
pub fn list_my_dispatch_guides(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
) -> Result<ListDispatchGuidesResponse, ApiError> {
    let dispatch_guides: Vec<DispatchGuideData> = persistence
        .list_dispatch_guides_for_courier(actor.employee_id)
        .map_err(translate_persistence_error)?;
    Ok(ListDispatchGuidesResponse { dispatch_guides })
}

/// # Errors
///
/// Returns `NOT_FOUND` if the guide does not exist, or an internal error if
/// database operations fail.
pub fn get_dispatch_guide(
    persistence: &mut Persistence,
    _actor: &AuthenticatedActor,
    guide_id: i64,
) -> Result<DispatchGuideData, ApiError> {
    persistence
        .get_dispatch_guide(guide_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| {
            translate_domain_error(despacho_domain::DomainError::DispatchGuideNotFound(guide_id))
        })
}

/// Lists the handlers registered under a courier company.
///
/// # Errors
///
/// Returns an error if database operations fail.
pub fn list_company_handlers(
    persistence: &mut Persistence,
    _actor: &AuthenticatedActor,
    company_id: i64,
) -> Result<ListHandlersResponse, ApiError> {
    let handlers: Vec<HandlerData> = persistence
        .list_company_handlers(company_id)
        .map_err(translate_persistence_error)?;
    Ok(ListHandlersResponse {
        company_id,
        handlers,
    })
}
