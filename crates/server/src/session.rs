// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bearer-session handling for the server.
//!
//! Tokens are opaque and minted at login; credential mechanics are out of
//! scope, so a known email is the whole login check. The extractor
//! validates the `Authorization: Bearer <token>` header and yields the
//! participant the token was minted for.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use cabride::ActorRole;
use cabride_domain::ParticipantId;
use chrono::Utc;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::AppState;

/// The participant a session token was minted for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    /// The participant id.
    pub participant_id: ParticipantId,
    /// Whether the session belongs to a rider or a driver.
    pub role: ActorRole,
}

/// Token to participant map for all live sessions.
#[derive(Debug, Default)]
pub struct Sessions {
    tokens: HashMap<String, SessionData>,
}

impl Sessions {
    /// Mints a fresh opaque token for a participant.
    pub fn mint(&mut self, participant_id: ParticipantId, role: ActorRole) -> String {
        let token: String = format!("session_{}_{}", Utc::now().timestamp(), rand::random::<u64>());
        self.tokens
            .insert(token.clone(), SessionData {
                participant_id,
                role,
            });
        token
    }

    #[must_use]
    pub fn validate(&self, token: &str) -> Option<SessionData> {
        self.tokens.get(token).cloned()
    }

    pub fn revoke(&mut self, token: &str) {
        self.tokens.remove(token);
    }
}

/// Extractor for the authenticated session participant.
///
/// # Errors
///
/// Rejects with HTTP 401 when the Authorization header is missing,
/// malformed, or carries an unknown token.
pub struct SessionActor(pub SessionData);

impl FromRequestParts<AppState> for SessionActor {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .ok_or_else(|| {
                debug!("Missing Authorization header");
                SessionError::MissingAuthorizationHeader
            })?
            .to_str()
            .map_err(|_| {
                warn!("Invalid Authorization header encoding");
                SessionError::InvalidAuthorizationHeader
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            warn!("Authorization header does not start with 'Bearer '");
            SessionError::InvalidAuthorizationHeader
        })?;

        let sessions = state.sessions.lock().await;
        let data = sessions.validate(token).ok_or_else(|| {
            warn!("Unknown session token");
            SessionError::InvalidSession
        })?;
        drop(sessions);

        debug!(
            participant_id = data.participant_id.value(),
            role = ?data.role,
            "Session validated"
        );
        Ok(Self(data))
    }
}

/// Session extraction errors, converted straight to HTTP responses.
#[derive(Debug)]
pub enum SessionError {
    /// Authorization header is missing.
    MissingAuthorizationHeader,
    /// Authorization header format is invalid.
    InvalidAuthorizationHeader,
    /// The token is not a live session.
    InvalidSession,
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        let message = match self {
            Self::MissingAuthorizationHeader => "Missing Authorization header",
            Self::InvalidAuthorizationHeader => {
                "Invalid Authorization header format. Expected: 'Bearer <token>'"
            }
            Self::InvalidSession => "Session validation failed: unknown token",
        };
        let body: Json<crate::ErrorBody> = Json(crate::ErrorBody {
            message: message.to_string(),
        });
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
