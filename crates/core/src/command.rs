// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Requested changes.
//!
//! A patch records which fields were present in a request. `None` means the
//! field was absent. For clearable fields, `Some(None)` means the request
//! explicitly cleared the field.

/// A requested change to one work order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkOrderPatch {
    /// The targeted work order.
    pub ot_id: i64,
    /// New owning worker.
    pub worker_id: Option<i64>,
    /// New date, as sent by the client.
    pub fecha: Option<String>,
    /// New state, as sent by the client.
    pub estado: Option<String>,
    /// New notes, or `Some(None)` to clear them.
    pub notes: Option<Option<String>>,
}

impl WorkOrderPatch {
    /// An empty patch for `ot_id`.
    #[must_use]
    pub fn new(ot_id: i64) -> Self {
        Self {
            ot_id,
            ..Self::default()
        }
    }
}

/// A requested change to one dispatch guide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuidePatch {
    /// The targeted guide.
    pub guide_id: i64,
    /// New courier company, or `Some(None)` to clear it.
    pub courier_id: Option<Option<i64>>,
    /// New date, as sent by the client.
    pub fecha: Option<String>,
    /// New state, as sent by the client.
    pub estado: Option<String>,
    /// New handler, or `Some(None)` to clear it.
    pub handler_id: Option<Option<i64>>,
}

impl GuidePatch {
    /// An empty patch for `guide_id`.
    #[must_use]
    pub fn new(guide_id: i64) -> Self {
        Self {
            guide_id,
            ..Self::default()
        }
    }

    /// Returns true if the patch touches a field that is frozen while
    /// the work order is still being picked.
    #[must_use]
    pub const fn touches_dispatch_fields(&self) -> bool {
        self.courier_id.is_some()
            || self.fecha.is_some()
            || self.estado.is_some()
            || self.handler_id.is_some()
    }

    /// The handler being set, if the patch sets one.
    #[must_use]
    pub const fn proposed_handler(&self) -> Option<i64> {
        match self.handler_id {
            Some(Some(handler_id)) => Some(handler_id),
            _ => None,
        }
    }

    /// Returns true if the patch explicitly clears the handler.
    #[must_use]
    pub const fn clears_handler(&self) -> bool {
        matches!(self.handler_id, Some(None))
    }
}
