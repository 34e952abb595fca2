// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// A session issued by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub employee_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Someone picked by rotation at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedPerson {
    pub id: i64,
    pub name: String,
}

/// The outcome of creating a work order and its guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedWorkOrder {
    pub ot_id: i64,
    pub guide_id: i64,
    pub order_number: String,
    pub worker: Option<AssignedPerson>,
    pub courier: Option<AssignedPerson>,
}

/// A work order as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderData {
    pub ot_id: i64,
    pub originating_order_id: i64,
    pub worker_id: Option<i64>,
    pub worker_name: Option<String>,
    pub fecha: String,
    pub state: String,
    pub notes: Option<String>,
}

/// A dispatch guide as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchGuideData {
    pub guide_id: i64,
    pub ot_id: i64,
    pub ot_state: String,
    pub courier_id: Option<i64>,
    pub courier_name: Option<String>,
    pub handler_id: Option<i64>,
    pub handler_name: Option<String>,
    pub delivery_address: Option<String>,
    pub fecha: Option<String>,
    pub state: String,
}

/// A registered courier handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerData {
    pub handler_id: i64,
    pub company_id: i64,
    pub employee_id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
}

/// Pending load for one employee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceEntry {
    pub employee_id: i64,
    pub name: String,
    pub pending: u64,
    pub counter: Option<i64>,
}

/// Pending load across pickers and couriers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceStats {
    pub workers: Vec<BalanceEntry>,
    pub couriers: Vec<BalanceEntry>,
}
