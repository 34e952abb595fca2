// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use despacho::CoreError;
use despacho_domain::DomainError;
use despacho_persistence::{EngineError, PersistenceError};

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No valid session was presented.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The session belongs to an employee whose role cannot act here.
    Unauthorized {
        /// The employee behind the session.
        employee_id: i64,
        /// The directory role that was rejected.
        role: String,
    },
    /// The session store could not be consulted.
    Unavailable {
        /// What failed.
        reason: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { employee_id, role } => {
                write!(
                    f,
                    "Unauthorized: employee {employee_id} has role '{role}', \
                     which cannot act on dispatch records"
                )
            }
            Self::Unavailable { reason } => write!(f, "Session lookup failed: {reason}"),
        }
    }
}

impl std::error::Error for AuthError {}

/// Broad classification of an API failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Missing or malformed input.
    Validation,
    /// Missing or insufficient actor.
    Auth,
    /// A lifecycle or uniqueness rule rejected the request.
    Conflict,
    /// The referenced record does not exist.
    NotFound,
    /// An unexpected datastore failure.
    Internal,
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant carries a stable machine-readable code, see [`ApiError::code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The actor is authenticated but may not act.
    Unauthorized {
        /// Why the actor was turned away.
        reason: String,
    },
    /// A lifecycle or uniqueness rule was violated.
    DomainRuleViolation {
        /// The rule code.
        rule: &'static str,
        /// A human-readable description of the violation.
        message: String,
    },
    /// A rule was violated that the actor is forbidden from overriding.
    Forbidden {
        /// The rule code.
        rule: &'static str,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The rule code.
        rule: &'static str,
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The rule code.
        rule: &'static str,
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Malformed request input that no domain rule covers.
    #[must_use]
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            rule: "INVALID_INPUT",
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Returns the stable machine-readable code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => "UNAUTHENTICATED",
            Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::DomainRuleViolation { rule, .. }
            | Self::Forbidden { rule, .. }
            | Self::InvalidInput { rule, .. }
            | Self::ResourceNotFound { rule, .. } => *rule,
            Self::Internal { .. } => "INTERNAL",
        }
    }

    #[must_use]
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::AuthenticationFailed { .. } | Self::Unauthorized { .. } => ApiErrorCategory::Auth,
            Self::DomainRuleViolation { .. } | Self::Forbidden { .. } => ApiErrorCategory::Conflict,
            Self::InvalidInput { .. } => ApiErrorCategory::Validation,
            Self::ResourceNotFound { .. } => ApiErrorCategory::NotFound,
            Self::Internal { .. } => ApiErrorCategory::Internal,
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized { reason } => write!(f, "Unauthorized: {reason}"),
            Self::DomainRuleViolation { message, .. } | Self::Forbidden { message, .. } => {
                write!(f, "{message}")
            }
            Self::InvalidInput { field, message, .. } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
                ..
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            err @ AuthError::Unauthorized { .. } => Self::Unauthorized {
                reason: err.to_string(),
            },
            AuthError::Unavailable { reason } => Self::Internal { message: reason },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let rule: &'static str = err.code();
    let message: String = err.to_string();

    match err {
        DomainError::DuplicateWorkOrder { .. }
        | DomainError::RegressionToPicking { .. }
        | DomainError::MissingHandler { .. } => ApiError::DomainRuleViolation { rule, message },
        DomainError::WorkOrderNotCompleted { .. }
        | DomainError::AlreadyDelivered { .. }
        | DomainError::DateChangeForbidden { .. }
        | DomainError::HandlerCompanyMismatch { .. } => ApiError::Forbidden { rule, message },
        DomainError::SalesOrderNotFound(order_id) => ApiError::ResourceNotFound {
            rule,
            resource_type: String::from("Sales order"),
            message: format!("Sales order {order_id} does not exist"),
        },
        DomainError::WorkOrderNotFound(ot_id) => ApiError::ResourceNotFound {
            rule,
            resource_type: String::from("Work order"),
            message: format!("Work order {ot_id} does not exist"),
        },
        DomainError::DispatchGuideNotFound(guide_id) => ApiError::ResourceNotFound {
            rule,
            resource_type: String::from("Dispatch guide"),
            message: format!("Dispatch guide {guide_id} does not exist"),
        },
        DomainError::InvalidWorker { .. } => ApiError::InvalidInput {
            rule,
            field: String::from("worker_id"),
            message,
        },
        DomainError::InvalidDate { .. } | DomainError::DateBeforeRecorded { .. } => {
            ApiError::InvalidInput {
                rule,
                field: String::from("fecha"),
                message,
            }
        }
        DomainError::InvalidState { .. } => ApiError::InvalidInput {
            rule,
            field: String::from("estado"),
            message,
        },
        DomainError::InvalidHandler(_) => ApiError::InvalidInput {
            rule,
            field: String::from("handler_id"),
            message,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Datastore failures are never the caller's fault.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    ApiError::Internal {
        message: err.to_string(),
    }
}

/// Translates a coordinator error into an API error.
#[must_use]
pub fn translate_engine_error(err: EngineError) -> ApiError {
    match err {
        EngineError::Rejected(core_err) => translate_core_error(core_err),
        EngineError::Persistence(persistence_err) => translate_persistence_error(persistence_err),
    }
}
