// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Identity resolution.
//!
//! The backend never returns "who am I" directly. A session holds a
//! contact email from login, and the participant id behind it has to be
//! recovered by scanning the participant collection. The resolved id is
//! cached for the lifetime of the session; every ride operation depends
//! on it.

use crate::backend::RideBackend;
use crate::error::EngineError;
use crate::wire::{self, ParticipantRecord};
use cabride_domain::ParticipantId;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

/// Stored session credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Contact email used at login.
    pub email: String,
    /// Bearer token minted at login.
    pub token: String,
}

/// A participant identity recovered from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    /// The canonical participant id.
    pub id: ParticipantId,
    /// A name suitable for display.
    pub display_name: String,
}

/// Resolves and caches the session's participant identity.
pub struct IdentityResolver<B> {
    backend: Arc<B>,
    cached: Mutex<Option<ResolvedIdentity>>,
}

impl<B: RideBackend> IdentityResolver<B> {
    /// Creates a resolver with an empty cache.
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            cached: Mutex::new(None),
        }
    }

    /// Resolves the participant id behind the stored credentials.
    ///
    /// The first successful resolution is cached; later calls return the
    /// cached identity without touching the backend.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Unauthenticated` when no credentials are
    /// stored or no participant record matches the contact email, and the
    /// mapped backend error when the participant listing fails.
    pub async fn resolve(
        &self,
        credentials: Option<&Credentials>,
    ) -> Result<ResolvedIdentity, EngineError> {
        let Some(credentials) = credentials else {
            return Err(EngineError::Unauthenticated {
                reason: "no stored session credentials".to_string(),
            });
        };
        if credentials.email.trim().is_empty() {
            return Err(EngineError::Unauthenticated {
                reason: "no stored session credentials".to_string(),
            });
        }

        let mut cached = self.cached.lock().await;
        if let Some(identity) = cached.as_ref() {
            return Ok(identity.clone());
        }

        let payload = self
            .backend
            .list_participants()
            .await
            .map_err(|err| EngineError::from_backend(err, "participants"))?;
        let records: Vec<ParticipantRecord> =
            wire::decode(payload).map_err(|err| EngineError::from_backend(err, "participants"))?;

        let Some(record) = records
            .iter()
            .find(|record| record.matches_contact(&credentials.email))
        else {
            return Err(EngineError::Unauthenticated {
                reason: format!("no participant profile matches {}", credentials.email),
            });
        };
        let Some(id) = record.canonical_id() else {
            return Err(EngineError::Backend {
                message: format!(
                    "participant record for {} carries no identifier",
                    credentials.email
                ),
            });
        };

        let identity = ResolvedIdentity {
            id,
            display_name: record.display_name(),
        };
        info!("Resolved participant identity: {id}");
        *cached = Some(identity.clone());
        Ok(identity)
    }

    /// Drops the cached identity, e.g. on logout.
    pub async fn invalidate(&self) {
        let mut cached = self.cached.lock().await;
        *cached = None;
    }
}
