// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor resolution.
//!
//! Sessions are issued by the authentication collaborator and stored in the
//! `sessions` table. A request carries the session token; resolving it yields
//! the employee behind it and that employee's role.

use despacho_domain::{EmployeeRole, Worker, dates};
use despacho_persistence::{Persistence, PersistenceError, SessionData};
use time::{Duration, OffsetDateTime};
use tracing::debug;

use crate::error::AuthError;

/// How long an issued session stays valid.
pub const SESSION_LIFETIME: Duration = Duration::days(30);

/// An authenticated employee with a role the engine understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The employee behind the session.
    pub employee_id: i64,
    /// The employee's role.
    pub role: EmployeeRole,
    /// `first last`, for logging.
    pub display_name: String,
}

impl AuthenticatedActor {
    #[must_use]
    pub const fn new(employee_id: i64, role: EmployeeRole, display_name: String) -> Self {
        Self {
            employee_id,
            role,
            display_name,
        }
    }
}

/// A freshly issued session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedSession {
    pub session_token: String,
    pub expires_at: String,
}

/// Authentication service for session handling.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Issues a session for an employee.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The employee does not exist
    /// - Database operations fail
    pub fn issue_session(
        persistence: &mut Persistence,
        employee_id: i64,
    ) -> Result<IssuedSession, AuthError> {
        persistence
            .find_employee(employee_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: format!("Employee {employee_id} not found"),
            })?;

        let session_token: String = Self::generate_session_token();
        let expires_at: String = dates::format_instant(OffsetDateTime::now_utc() + SESSION_LIFETIME)
            .map_err(|e| AuthError::Unavailable {
                reason: format!("Failed to compute session expiration: {e}"),
            })?;

        persistence
            .create_session(&session_token, employee_id, &expires_at)
            .map_err(Self::map_persistence_error)?;

        debug!(employee_id, "Session issued");
        Ok(IssuedSession {
            session_token,
            expires_at,
        })
    }

    /// Validates a session token and resolves the actor behind it.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token is unknown or the session has expired
    /// - The employee no longer exists
    /// - The employee's role is not one the engine understands
    /// - Database operations fail
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedActor, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime =
            dates::parse_instant(&session.expires_at).map_err(|e| {
                AuthError::AuthenticationFailed {
                    reason: format!("Failed to parse session expiration: {e}"),
                }
            })?;

        if OffsetDateTime::now_utc() > expires_at {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let employee: Worker = persistence
            .find_employee(session.employee_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Employee not found"),
            })?;

        let role: EmployeeRole = employee
            .known_role()
            .ok_or_else(|| AuthError::Unauthorized {
                employee_id: employee.worker_id,
                role: employee.role.clone(),
            })?;

        persistence
            .update_session_activity(session.session_id)
            .map_err(Self::map_persistence_error)?;

        Ok(AuthenticatedActor::new(
            employee.worker_id,
            role,
            employee.display_name(),
        ))
    }

    fn generate_session_token() -> String {
        let timestamp: i128 = OffsetDateTime::now_utc().unix_timestamp_nanos();
        format!("session_{timestamp}_{:016x}", rand::random::<u64>())
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        AuthError::Unavailable {
            reason: err.to_string(),
        }
    }
}
