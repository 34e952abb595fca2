// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction at the server boundary.
//!
//! Every endpoint except the health check takes a [`SessionActor`], which
//! resolves `Authorization: Bearer <token>` to an employee with a known role.

use axum::{extract::FromRequestParts, http::request::Parts};
use despacho_api::{ApiError, AuthenticatedActor, AuthenticationService};
use tracing::{debug, warn};

use crate::{AppState, HttpError};

/// Extractor for the authenticated employee.
///
/// # Errors
///
/// Rejects with `UNAUTHENTICATED` (401) if the header is missing or
/// malformed, or the session is unknown or expired. Rejects with
/// `UNAUTHORIZED` (403) if the employee's role is not one the engine
/// understands.
pub struct SessionActor(pub AuthenticatedActor);

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = HttpError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header: &str = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                unauthenticated("Missing Authorization header")
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                unauthenticated("Invalid Authorization header encoding")
            })?;

        let token: &str = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            unauthenticated("Invalid Authorization header format. Expected: 'Bearer <token>'")
        })?;

        let mut persistence = state.persistence.lock().await;
        let actor: AuthenticatedActor =
            AuthenticationService::validate_session(&mut persistence, token.trim()).map_err(
                |e| {
                    warn!(error = %e, "Session validation failed");
                    HttpError::from(ApiError::from(e))
                },
            )?;
        drop(persistence);

        debug!(
            employee_id = actor.employee_id,
            role = actor.role.as_str(),
            "Session validated"
        );

        Ok(Self(actor))
    }
}

fn unauthenticated(reason: &str) -> HttpError {
    HttpError::from(ApiError::AuthenticationFailed {
        reason: reason.to_string(),
    })
}
