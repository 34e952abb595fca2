// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the dispatch engine.
//!
//! Resolves actors from session tokens, turns requests into patches, calls
//! the persistence coordinator and translates every failure into an
//! [`ApiError`] carrying a stable code.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, IssuedSession, SESSION_LIFETIME};
pub use error::{
    ApiError, ApiErrorCategory, AuthError, translate_core_error, translate_domain_error,
    translate_engine_error, translate_persistence_error,
};
pub use handlers::{
    create_work_order, get_balance_stats, get_dispatch_guide, get_work_order,
    list_company_handlers, list_dispatch_guides, list_my_dispatch_guides, list_my_work_orders,
    list_work_orders, update_dispatch_guide, update_dispatch_guides, update_work_order,
    update_work_orders,
};
pub use request_response::{
    BalanceStatsResponse, CreateWorkOrderRequest, CreateWorkOrderResponse, DispatchGuideUpdate,
    ListDispatchGuidesResponse, ListHandlersResponse, ListWorkOrdersResponse,
    UpdateDispatchGuidesRequest, UpdateResponse, UpdateWorkOrdersRequest, WorkOrderUpdate,
};
