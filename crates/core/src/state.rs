// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use despacho_domain::{Candidate, GuideState, OtState, Reassignment};

/// Column changes for one work order.
///
/// Every `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkOrderChanges {
    /// New owning worker.
    pub worker_id: Option<i64>,
    /// New canonical date.
    pub fecha: Option<String>,
    /// New state.
    pub state: Option<OtState>,
    /// New notes; `Some(None)` clears them.
    pub notes: Option<Option<String>>,
}

impl WorkOrderChanges {
    /// Returns true if nothing is written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.worker_id.is_none()
            && self.fecha.is_none()
            && self.state.is_none()
            && self.notes.is_none()
    }
}

/// The outcome of applying a patch to a work order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderTransition {
    /// The work order.
    pub ot_id: i64,
    /// Columns to write.
    pub changes: WorkOrderChanges,
    /// The paired guide must be reset to `POR_ASIGNAR`, clearing handler and date.
    pub reset_guide: bool,
    /// Worker counter bookkeeping to perform.
    pub reassignment: Option<Reassignment>,
}

/// Column changes for one dispatch guide.
///
/// Every `None` leaves the stored value untouched; `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuideChanges {
    /// New courier company.
    pub courier_id: Option<Option<i64>>,
    /// New canonical date.
    pub fecha: Option<Option<String>>,
    /// New state.
    pub state: Option<GuideState>,
    /// New handler.
    pub handler_id: Option<Option<i64>>,
}

impl GuideChanges {
    /// Returns true if nothing is written.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.courier_id.is_none()
            && self.fecha.is_none()
            && self.state.is_none()
            && self.handler_id.is_none()
    }
}

/// The outcome of applying a patch to a dispatch guide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideTransition {
    /// The guide.
    pub guide_id: i64,
    /// Columns to write.
    pub changes: GuideChanges,
    /// Handler counter bookkeeping to perform.
    pub handler_reassignment: Option<Reassignment>,
}

/// Everything needed to insert a work order and its guide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkOrderPlan {
    /// The originating sales order.
    pub order_id: i64,
    /// Human-facing order number, e.g. `PV-000042`.
    pub order_number: String,
    /// Customer display name.
    pub customer: String,
    /// Notes carrying the order back-reference.
    pub notes: String,
    /// Canonical creation timestamp.
    pub created_at: String,
    /// Initial work order state.
    pub state: OtState,
    /// The picker chosen by rotation.
    pub worker: Option<Candidate>,
    /// The courier chosen by rotation.
    pub courier: Option<Candidate>,
    /// Initial guide state.
    pub guide_state: GuideState,
    /// Delivery address copied from the order.
    pub delivery_address: Option<String>,
}
