// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::dates::DateParseError;

/// Broad classification of a rule failure.
///
/// Every `DomainError` belongs to exactly one category. The outer layers
/// use the category to decide how a failure is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing or malformed input.
    Validation,
    /// Missing or insufficient actor.
    Auth,
    /// A lifecycle or uniqueness rule rejected the request.
    Conflict,
    /// The referenced record does not exist.
    NotFound,
}

/// Errors that can occur while applying domain rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A work order already references the originating sales order.
    DuplicateWorkOrder {
        /// The originating sales order.
        order_id: i64,
        /// The work order that already references it.
        existing_ot_id: i64,
    },
    /// The originating sales order does not exist.
    SalesOrderNotFound(i64),
    /// The work order does not exist.
    WorkOrderNotFound(i64),
    /// The dispatch guide does not exist.
    DispatchGuideNotFound(i64),
    /// The requested worker cannot own a work order.
    InvalidWorker {
        /// The requested worker.
        worker_id: i64,
        /// Why the worker was rejected.
        reason: String,
    },
    /// A date could not be understood.
    InvalidDate {
        /// The raw input.
        input: String,
        /// The parse failure.
        error: DateParseError,
    },
    /// A date moves the record further back than the drift tolerance allows.
    DateBeforeRecorded {
        /// The normalized requested date.
        requested: String,
        /// The date currently stored on the record.
        recorded: String,
    },
    /// A state string does not name a known state.
    InvalidState {
        /// The entity the state was meant for.
        entity: &'static str,
        /// The raw input.
        value: String,
    },
    /// The proposed handler is not in the courier registry.
    InvalidHandler(i64),
    /// The guide cannot be edited while its work order is still being picked.
    WorkOrderNotCompleted {
        /// The guide that was targeted.
        guide_id: i64,
    },
    /// The guide was delivered; the named field is frozen.
    AlreadyDelivered {
        /// The guide that was targeted.
        guide_id: i64,
        /// The field the request tried to change.
        field: &'static str,
    },
    /// The guide already left `EN_PICKING` and cannot return to it.
    RegressionToPicking {
        /// The guide that was targeted.
        guide_id: i64,
        /// The state the guide is in.
        current: String,
    },
    /// `ASIGNADA` was requested without any handler.
    MissingHandler {
        /// The guide that was targeted.
        guide_id: i64,
    },
    /// The actor may not set the date alongside a state change.
    DateChangeForbidden {
        /// The guide that was targeted.
        guide_id: i64,
    },
    /// The proposed handler works for a company the actor cannot assign from.
    HandlerCompanyMismatch {
        /// The proposed handler.
        handler_id: i64,
        /// The handler's company.
        handler_company_id: i64,
        /// The courier company on the guide.
        guide_company_id: i64,
    },
}

impl DomainError {
    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::DuplicateWorkOrder { .. } => "DUPLICATE",
            Self::SalesOrderNotFound(_) => "ORDER_NOT_FOUND",
            Self::WorkOrderNotFound(_) | Self::DispatchGuideNotFound(_) => "NOT_FOUND",
            Self::InvalidWorker { .. } => "INVALID_WORKER",
            Self::InvalidDate { .. } | Self::DateBeforeRecorded { .. } => "INVALID_DATE",
            Self::InvalidState { .. } => "INVALID_STATE",
            Self::InvalidHandler(_) => "INVALID_HANDLER",
            Self::WorkOrderNotCompleted { .. } => "OT_NOT_COMPLETED",
            Self::AlreadyDelivered { .. } => "ALREADY_DELIVERED",
            Self::RegressionToPicking { .. } => "INVALID_TRANSITION",
            Self::MissingHandler { .. } => "MISSING_ENCARGADO",
            Self::DateChangeForbidden { .. } => "FORBIDDEN_FECHA",
            Self::HandlerCompanyMismatch { .. } => "INVALID_HANDLER_COMPANY",
        }
    }

    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::SalesOrderNotFound(_)
            | Self::WorkOrderNotFound(_)
            | Self::DispatchGuideNotFound(_) => ErrorCategory::NotFound,
            Self::InvalidWorker { .. }
            | Self::InvalidDate { .. }
            | Self::DateBeforeRecorded { .. }
            | Self::InvalidState { .. }
            | Self::InvalidHandler(_) => ErrorCategory::Validation,
            Self::DuplicateWorkOrder { .. }
            | Self::WorkOrderNotCompleted { .. }
            | Self::AlreadyDelivered { .. }
            | Self::RegressionToPicking { .. }
            | Self::MissingHandler { .. }
            | Self::DateChangeForbidden { .. }
            | Self::HandlerCompanyMismatch { .. } => ErrorCategory::Conflict,
        }
    }

    /// Returns true if the rule is reported as forbidden (403) rather than
    /// as a bad request.
    #[must_use]
    pub const fn is_forbidden(&self) -> bool {
        matches!(
            self,
            Self::WorkOrderNotCompleted { .. }
                | Self::AlreadyDelivered { .. }
                | Self::DateChangeForbidden { .. }
                | Self::HandlerCompanyMismatch { .. }
        )
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateWorkOrder {
                order_id,
                existing_ot_id,
            } => write!(
                f,
                "A work order already exists for sales order {order_id} (OT #{existing_ot_id})"
            ),
            Self::SalesOrderNotFound(order_id) => {
                write!(f, "Sales order #{order_id} not found")
            }
            Self::WorkOrderNotFound(ot_id) => write!(f, "Work order {ot_id} not found"),
            Self::DispatchGuideNotFound(guide_id) => {
                write!(f, "Dispatch guide {guide_id} not found")
            }
            Self::InvalidWorker { worker_id, reason } => {
                write!(f, "Invalid worker {worker_id}: {reason}")
            }
            Self::InvalidDate { input, error } => write!(f, "Invalid date '{input}': {error}"),
            Self::DateBeforeRecorded {
                requested,
                recorded,
            } => write!(
                f,
                "Date {requested} cannot be earlier than the recorded date {recorded}"
            ),
            Self::InvalidState { entity, value } => {
                write!(f, "Unknown {entity} state: '{value}'")
            }
            Self::InvalidHandler(handler_id) => {
                write!(f, "Handler {handler_id} is not a registered courier")
            }
            Self::WorkOrderNotCompleted { guide_id } => write!(
                f,
                "Guide {guide_id} cannot be edited until its work order is completed"
            ),
            Self::AlreadyDelivered { guide_id, field } => write!(
                f,
                "Guide {guide_id} was already delivered; '{field}' cannot change"
            ),
            Self::RegressionToPicking { guide_id, current } => write!(
                f,
                "Guide {guide_id} is {current} and cannot return to EN_PICKING"
            ),
            Self::MissingHandler { guide_id } => {
                write!(f, "Guide {guide_id} needs a handler to become ASIGNADA")
            }
            Self::DateChangeForbidden { guide_id } => write!(
                f,
                "Not allowed to set the date of guide {guide_id} together with its state"
            ),
            Self::HandlerCompanyMismatch {
                handler_id,
                handler_company_id,
                guide_company_id,
            } => write!(
                f,
                "Handler {handler_id} belongs to company {handler_company_id}, \
                 not to the guide's company {guide_company_id}"
            ),
        }
    }
}

impl std::error::Error for DomainError {}
