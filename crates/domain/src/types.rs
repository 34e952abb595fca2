// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::roles::EmployeeRole;
use crate::states::{GuideState, OtState};

/// An employee as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Worker {
    /// Employee identifier.
    pub worker_id: i64,
    /// Raw directory role.
    pub role: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: Option<String>,
}

impl Worker {
    /// The directory role if the engine recognizes it.
    #[must_use]
    pub fn known_role(&self) -> Option<EmployeeRole> {
        EmployeeRole::parse_directory_role(&self.role)
    }

    /// `first last`, trimmed.
    #[must_use]
    pub fn display_name(&self) -> String {
        full_name(&self.first_name, self.last_name.as_deref())
    }
}

/// Joins a first and optional last name.
#[must_use]
pub fn full_name(first: &str, last: Option<&str>) -> String {
    format!("{first} {}", last.unwrap_or_default())
        .trim()
        .to_string()
}

/// An originating sales order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesOrder {
    /// Sales order identifier.
    pub order_id: i64,
    /// Customer first name.
    pub customer_name: String,
    /// Customer last name.
    pub customer_last_name: Option<String>,
    /// Where the goods go.
    pub delivery_address: Option<String>,
}

impl SalesOrder {
    /// The human-facing order number, e.g. `PV-000042`.
    #[must_use]
    pub fn order_number(&self) -> String {
        format!("PV-{:06}", self.order_id)
    }

    /// The customer's full name.
    #[must_use]
    pub fn customer(&self) -> String {
        full_name(&self.customer_name, self.customer_last_name.as_deref())
    }

    /// Notes recorded on the work order created for this sales order.
    #[must_use]
    pub fn work_order_notes(&self) -> String {
        format!(
            "Pedido: {} | Cliente: {} | Dirección: {}",
            self.order_number(),
            self.customer(),
            self.delivery_address
                .as_deref()
                .unwrap_or("No especificada")
        )
    }
}

/// Current values of a work order, as loaded under lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderSnapshot {
    /// Work order identifier.
    pub ot_id: i64,
    /// Owning worker.
    pub worker_id: Option<i64>,
    /// Canonical stored date.
    pub fecha: Option<String>,
    /// Lifecycle state.
    pub state: OtState,
    /// Notes.
    pub notes: Option<String>,
}

/// Current values of a dispatch guide, as loaded under lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideSnapshot {
    /// Guide identifier.
    pub guide_id: i64,
    /// Paired work order.
    pub ot_id: i64,
    /// Courier company.
    pub courier_id: Option<i64>,
    /// Individual handler.
    pub handler_id: Option<i64>,
    /// Canonical stored date.
    pub fecha: Option<String>,
    /// Lifecycle state.
    pub state: GuideState,
}

/// A handler's courier registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRegistration {
    /// Handler identifier.
    pub handler_id: i64,
    /// Courier company the handler works for.
    pub company_id: i64,
}
