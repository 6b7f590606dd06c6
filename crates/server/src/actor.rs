// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor extraction at the server boundary.
//!
//! The identity collaborator authenticates the caller and forwards the staff
//! key in the `x-actor-id` header. These extractors turn that key into an
//! active `StaffActor` before a handler runs. Calls made by the collaborator
//! itself carry the shared token in `x-identity-token`.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use legaltrack_api::{AuthenticationService, TransitionCode};
use legaltrack_domain::StaffActor;
use tracing::{debug, warn};

use crate::{AppState, ErrorResponse};

/// Header carrying the caller's staff key.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Header carrying the identity collaborator's shared token.
pub const IDENTITY_TOKEN_HEADER: &str = "x-identity-token";

/// Extractor for an authenticated staff member.
///
/// ```ignore
/// async fn my_handler(CurrentActor(actor): CurrentActor) -> ... { }
/// ```
///
/// # Errors
///
/// Rejects with HTTP 401 if the header is missing or malformed, or if the
/// staff account does not exist or is not active.
pub struct CurrentActor(pub StaffActor);

impl FromRequestParts<AppState> for CurrentActor {
    type Rejection = ActorError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let staff_pk: i64 = staff_key(parts)?.ok_or_else(|| {
            debug!("Missing actor header");
            ActorError::MissingActorHeader
        })?;
        resolve(state, staff_pk).await.map(Self)
    }
}

/// Extractor for endpoints open to anonymous callers.
///
/// A missing header yields `None`; a present but invalid one is rejected.
pub struct OptionalActor(pub Option<StaffActor>);

impl FromRequestParts<AppState> for OptionalActor {
    type Rejection = ActorError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match staff_key(parts)? {
            Some(staff_pk) => resolve(state, staff_pk).await.map(|a| Self(Some(a))),
            None => Ok(Self(None)),
        }
    }
}

/// Extractor for calls made by the identity collaborator itself.
///
/// The request must present the token configured at startup. With no token
/// configured every call is rejected.
pub struct IdentityCollaborator;

impl FromRequestParts<AppState> for IdentityCollaborator {
    type Rejection = ActorError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.identity_token.as_deref() else {
            warn!("Identity collaborator call rejected: no token configured");
            return Err(ActorError::CollaboratorDisabled);
        };
        let presented: &str = parts
            .headers
            .get(IDENTITY_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or(ActorError::InvalidIdentityToken)?;
        if !tokens_match(presented.trim().as_bytes(), expected.as_bytes()) {
            warn!("Identity collaborator call rejected: token mismatch");
            return Err(ActorError::InvalidIdentityToken);
        }
        Ok(Self)
    }
}

fn tokens_match(presented: &[u8], expected: &[u8]) -> bool {
    presented.len() == expected.len()
        && presented
            .iter()
            .zip(expected)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn staff_key(parts: &Parts) -> Result<Option<i64>, ActorError> {
    let Some(value) = parts.headers.get(ACTOR_HEADER) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(Some)
        .ok_or_else(|| {
            warn!("Malformed actor header");
            ActorError::InvalidActorHeader
        })
}

async fn resolve(state: &AppState, staff_pk: i64) -> Result<StaffActor, ActorError> {
    let mut persistence = state.persistence.lock().await;
    let actor: StaffActor = AuthenticationService::resolve_actor(&mut persistence, staff_pk)
        .map_err(|e| {
            warn!(staff_pk, error = %e, "Actor resolution failed");
            ActorError::UnknownActor(e.to_string())
        })?;

    debug!(staff_id = %actor.staff_id, role = actor.role.as_str(), "Actor resolved");
    Ok(actor)
}

/// Actor extraction errors, all reported as HTTP 401.
#[derive(Debug)]
pub enum ActorError {
    /// The actor header is missing.
    MissingActorHeader,
    /// The actor header is not a staff key.
    InvalidActorHeader,
    /// No active staff account has that key.
    UnknownActor(String),
    /// The identity token is missing or wrong.
    InvalidIdentityToken,
    /// The server was started without an identity token.
    CollaboratorDisabled,
}

impl IntoResponse for ActorError {
    fn into_response(self) -> Response {
        let message: String = match self {
            Self::MissingActorHeader => format!("Missing {ACTOR_HEADER} header"),
            Self::InvalidActorHeader => format!("{ACTOR_HEADER} must be a numeric staff key"),
            Self::UnknownActor(reason) => reason,
            Self::InvalidIdentityToken => format!("Missing or invalid {IDENTITY_TOKEN_HEADER}"),
            Self::CollaboratorDisabled => {
                String::from("Identity collaborator endpoints are not configured")
            }
        };

        (
            StatusCode::UNAUTHORIZED,
            axum::Json(ErrorResponse {
                error: true,
                code: TransitionCode::UnauthorizedRole.as_str().to_string(),
                message,
            }),
        )
            .into_response()
    }
}
