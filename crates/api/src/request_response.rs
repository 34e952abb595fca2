// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API layer.
//!
//! Field names follow what clients already send (`fecha`, `estado`). Fields
//! that may be cleared are `Option<Option<T>>`: absent is `None`, an explicit
//! `null` is `Some(None)`. `fecha` decodes the same way so that a `null` date
//! reaches validation as an empty date and is rejected as `INVALID_DATE`
//! instead of being dropped.

use despacho::{GuidePatch, WorkOrderPatch};
use despacho_persistence::{
    AssignedPerson, BalanceEntry, BalanceStats, CreatedWorkOrder, DispatchGuideData, HandlerData,
    WorkOrderData,
};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Request to create the work order for a sales order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkOrderRequest {
    /// The originating sales order.
    pub order_id: i64,
}

/// Response for a successful work order creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateWorkOrderResponse {
    pub ot_id: i64,
    pub guide_id: i64,
    pub order_number: String,
    /// The picker chosen by rotation, if any was eligible.
    pub assigned_worker: Option<AssignedPerson>,
    /// The courier chosen by rotation, if any was eligible.
    pub assigned_courier: Option<AssignedPerson>,
    pub message: String,
}

impl From<CreatedWorkOrder> for CreateWorkOrderResponse {
    fn from(created: CreatedWorkOrder) -> Self {
        let message: String = format!(
            "Work order {} created for {}",
            created.ot_id, created.order_number
        );
        Self {
            ot_id: created.ot_id,
            guide_id: created.guide_id,
            order_number: created.order_number,
            assigned_worker: created.worker,
            assigned_courier: created.courier,
            message,
        }
    }
}

/// A requested change to one work order.
///
/// `ot_id` is taken from the path for single updates and is required for
/// each item of a batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ot_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub worker_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub fecha: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<Option<String>>,
}

impl WorkOrderUpdate {
    /// Converts the request into a patch for `ot_id`.
    #[must_use]
    pub fn into_patch(self, ot_id: i64) -> WorkOrderPatch {
        WorkOrderPatch {
            ot_id,
            worker_id: self.worker_id,
            fecha: date_input(self.fecha),
            estado: self.estado,
            notes: self.notes,
        }
    }
}

/// Batch form of [`WorkOrderUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWorkOrdersRequest {
    pub updates: Vec<WorkOrderUpdate>,
}

/// A requested change to one dispatch guide.
///
/// `handler_id` (also accepted as `encargado_id`) may be a number, a numeric
/// string, or `""`/`null` to clear the handler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchGuideUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_id: Option<i64>,
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub courier_id: Option<Option<i64>>,
    #[serde(
        default,
        deserialize_with = "clearable",
        skip_serializing_if = "Option::is_none"
    )]
    pub fecha: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estado: Option<String>,
    #[serde(
        default,
        alias = "encargado_id",
        deserialize_with = "handler_reference",
        skip_serializing_if = "Option::is_none"
    )]
    pub handler_id: Option<Option<i64>>,
}

impl DispatchGuideUpdate {
    /// Converts the request into a patch for `guide_id`.
    #[must_use]
    pub fn into_patch(self, guide_id: i64) -> GuidePatch {
        GuidePatch {
            guide_id,
            courier_id: self.courier_id,
            fecha: date_input(self.fecha),
            estado: self.estado,
            handler_id: self.handler_id,
        }
    }
}

/// Batch form of [`DispatchGuideUpdate`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateDispatchGuidesRequest {
    pub updates: Vec<DispatchGuideUpdate>,
}

/// Response for a successful single or batch update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    /// The ids that were updated, in request order.
    pub updated_ids: Vec<i64>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListWorkOrdersResponse {
    pub work_orders: Vec<WorkOrderData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDispatchGuidesResponse {
    pub dispatch_guides: Vec<DispatchGuideData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListHandlersResponse {
    pub company_id: i64,
    pub handlers: Vec<HandlerData>,
}

/// Pending load per picker and per courier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceStatsResponse {
    pub workers: Vec<BalanceEntry>,
    pub couriers: Vec<BalanceEntry>,
}

impl From<BalanceStats> for BalanceStatsResponse {
    fn from(stats: BalanceStats) -> Self {
        Self {
            workers: stats.workers,
            couriers: stats.couriers,
        }
    }
}

/// Distinguishes an explicit `null` from an absent field.
///
/// Used together with `#[serde(default)]`, so an absent field never reaches
/// this function.
/// A date cannot be cleared; an explicit `null` becomes an empty date.
fn date_input(fecha: Option<Option<String>>) -> Option<String> {
    fecha.map(Option::unwrap_or_default)
}

fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum HandlerReference {
    Id(i64),
    Text(String),
}

fn handler_reference<'de, D>(deserializer: D) -> Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<HandlerReference>::deserialize(deserializer)? {
        None => Ok(Some(None)),
        Some(HandlerReference::Id(handler_id)) => Ok(Some(Some(handler_id))),
        Some(HandlerReference::Text(text)) => {
            let trimmed: &str = text.trim();
            if trimmed.is_empty() {
                return Ok(Some(None));
            }
            trimmed
                .parse::<i64>()
                .map(|handler_id| Some(Some(handler_id)))
                .map_err(|_| D::Error::custom(format!("invalid handler id '{trimmed}'")))
        }
    }
}
