// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Dispatch guide state machine.
//!
//! A guide is frozen while its work order is being picked, and frozen again
//! once delivered. Between those points a handler is assigned, which moves
//! the guide to `ASIGNADA`, and every state change stamps the guide's date.

use despacho_domain::dates::normalize_instant;
use despacho_domain::{
    DomainError, EmployeeRole, Entity, Field, FieldPermissions, GuideSnapshot, GuideState,
    HandlerRegistration, OtState, Reassignment,
};

use crate::command::GuidePatch;
use crate::error::CoreError;
use crate::state::{GuideChanges, GuideTransition};

/// What the coordinator loaded for one guide update.
#[derive(Debug, Clone, Copy)]
pub struct GuideContext<'a> {
    /// The locked row.
    pub current: &'a GuideSnapshot,
    /// State of the paired work order; `None` if it could not be read.
    pub ot_state: Option<OtState>,
    /// The acting employee's id.
    pub actor_id: i64,
    /// The acting employee's role.
    pub actor_role: EmployeeRole,
    /// Registry entry for the handler the patch sets, if registered.
    pub proposed_handler: Option<&'a HandlerRegistration>,
    /// Registry entry for the actor, if the actor is a registered handler.
    pub actor_registration: Option<&'a HandlerRegistration>,
    /// Canonical "now", used to stamp state changes.
    pub now: &'a str,
}

/// Applies a patch to a locked dispatch guide.
///
/// # Errors
///
/// In evaluation order:
/// - `WorkOrderNotCompleted` if a dispatch field is touched before picking finished
/// - `InvalidHandler` / `HandlerCompanyMismatch` for couriers assigning a handler
/// - `AlreadyDelivered` if state, courier or handler is touched on a delivered guide
/// - `InvalidState` for unknown states
/// - `RegressionToPicking` when asking for `EN_PICKING` after leaving it
/// - `MissingHandler` when asking for `ASIGNADA` without any handler
/// - `DateChangeForbidden` when a role without date rights sends a date with a state change
/// - `InvalidDate` for unparseable dates
pub fn apply_guide_patch(
    ctx: GuideContext<'_>,
    patch: &GuidePatch,
) -> Result<GuideTransition, CoreError> {
    let current: &GuideSnapshot = ctx.current;
    let guide_id: i64 = current.guide_id;
    let perms: FieldPermissions =
        FieldPermissions::for_role(ctx.actor_role, Entity::DispatchGuide);
    let ot_completed: bool = ctx.ot_state == Some(OtState::Completed);

    if !ot_completed && patch.touches_dispatch_fields() {
        return Err(DomainError::WorkOrderNotCompleted { guide_id }.into());
    }

    if ctx.actor_role == EmployeeRole::Transportista
        && let Some(handler_id) = patch.proposed_handler()
    {
        check_handler_company(&ctx, handler_id)?;
    }

    if current.state.is_terminal() {
        reject_delivered_edits(guide_id, patch)?;
    }

    let requested: Option<GuideState> = patch
        .estado
        .as_deref()
        .map(str::parse::<GuideState>)
        .transpose()?;

    if requested == Some(GuideState::EnPicking) && current.state != GuideState::EnPicking {
        return Err(DomainError::RegressionToPicking {
            guide_id,
            current: current.state.as_str().to_string(),
        }
        .into());
    }

    let mut target: Option<GuideState> = requested;
    if patch.clears_handler() {
        target = Some(GuideState::PorAsignar);
    }

    let wants_asignada: bool = requested == Some(GuideState::Asignada);
    let awaiting_handler: bool = current.state == GuideState::EnPicking
        || (ot_completed && current.state == GuideState::PorAsignar);

    let auto_promoted: bool = patch.proposed_handler().is_some()
        && perms.allows(Field::Handler)
        && !wants_asignada
        && awaiting_handler;
    if auto_promoted {
        target = Some(GuideState::Asignada);
    }

    if wants_asignada
        && awaiting_handler
        && current.handler_id.is_none()
        && patch.proposed_handler().is_none()
    {
        return Err(DomainError::MissingHandler { guide_id }.into());
    }

    let state_will_change: bool =
        requested.is_some_and(|state| state != current.state) || auto_promoted;

    let mut changes: GuideChanges = GuideChanges::default();

    if state_will_change {
        if patch.fecha.is_some() && !perms.allows(Field::Date) {
            return Err(DomainError::DateChangeForbidden { guide_id }.into());
        }
        if perms.allows(Field::State) || auto_promoted {
            changes.fecha = Some(Some(ctx.now.to_string()));
            changes.state = target;
        }
    } else {
        if let Some(raw) = patch.fecha.as_deref()
            && perms.allows(Field::Date)
        {
            let normalized: String =
                normalize_instant(raw).map_err(|error| DomainError::InvalidDate {
                    input: raw.to_string(),
                    error,
                })?;
            changes.fecha = Some(Some(normalized));
        }
        if let Some(state) = target
            && state != current.state
            && perms.allows(Field::State)
        {
            changes.state = Some(state);
        }
    }

    if let Some(courier_id) = patch.courier_id
        && perms.allows(Field::Courier)
    {
        changes.courier_id = Some(courier_id);
    }

    let mut handler_reassignment: Option<Reassignment> = None;
    if let Some(handler_id) = patch.handler_id
        && perms.allows(Field::Handler)
    {
        changes.handler_id = Some(handler_id);
        handler_reassignment = Reassignment::between(current.handler_id, handler_id);
    }

    Ok(GuideTransition {
        guide_id,
        changes,
        handler_reassignment,
    })
}

/// A courier may only hand a guide to someone from the guide's company,
/// or from a company the courier is registered with as well.
fn check_handler_company(ctx: &GuideContext<'_>, handler_id: i64) -> Result<(), DomainError> {
    let handler: &HandlerRegistration = ctx
        .proposed_handler
        .filter(|h| h.handler_id == handler_id)
        .ok_or(DomainError::InvalidHandler(handler_id))?;

    let Some(guide_company_id) = ctx.current.courier_id else {
        return Ok(());
    };
    if handler.company_id == guide_company_id {
        return Ok(());
    }

    match ctx.actor_registration {
        Some(own) if own.handler_id == ctx.actor_id && own.company_id == handler.company_id => {
            Ok(())
        }
        _ => Err(DomainError::HandlerCompanyMismatch {
            handler_id,
            handler_company_id: handler.company_id,
            guide_company_id,
        }),
    }
}

fn reject_delivered_edits(guide_id: i64, patch: &GuidePatch) -> Result<(), DomainError> {
    let frozen: [(bool, Field); 3] = [
        (patch.estado.is_some(), Field::State),
        (patch.courier_id.is_some(), Field::Courier),
        (patch.handler_id.is_some(), Field::Handler),
    ];
    match frozen.iter().find(|(present, _)| *present) {
        Some((_, field)) => Err(DomainError::AlreadyDelivered {
            guide_id,
            field: field.as_str(),
        }),
        None => Ok(()),
    }
}
