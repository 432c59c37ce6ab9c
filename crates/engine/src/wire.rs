// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Response-shape normalization.
//!
//! Backend responses come in two envelopes: a bare value, or a wrapper of
//! shape `{"data": <value>}`. Participant records additionally carry their
//! identifier under one of three legacy keys. Everything is unified here,
//! before any business logic runs, so the rest of the engine never
//! branches on shape.

use crate::backend::BackendError;
use cabride_domain::{ParticipantId, RideId, RideStatus};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Either a bare payload or a `{data: ...}` wrapper.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } => data,
            Self::Bare(value) => value,
        }
    }
}

/// Decodes a backend payload, accepting both envelope shapes.
///
/// # Errors
///
/// Returns `BackendError::Malformed` if the payload fits neither shape.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, BackendError> {
    serde_json::from_value::<Envelope<T>>(value)
        .map(Envelope::into_inner)
        .map_err(|err| BackendError::Malformed {
            message: err.to_string(),
        })
}

/// A participant entry as returned by the backend.
///
/// The identifier arrives under `id`, `userId`, or `driverId` depending
/// on the record's vintage; [`Self::canonical_id`] prefers them in that
/// order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRecord {
    /// Modern identifier key.
    #[serde(default)]
    pub id: Option<i64>,
    /// Legacy rider identifier key.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Legacy driver identifier key.
    #[serde(default)]
    pub driver_id: Option<i64>,
    /// Display name, when present.
    #[serde(default)]
    pub name: Option<String>,
    /// Contact identifier.
    #[serde(default)]
    pub email: Option<String>,
}

impl ParticipantRecord {
    /// The canonical id, preferring the first identifier key present.
    #[must_use]
    pub fn canonical_id(&self) -> Option<ParticipantId> {
        self.id
            .or(self.user_id)
            .or(self.driver_id)
            .map(ParticipantId::new)
    }

    /// Whether this record belongs to the given contact identifier.
    #[must_use]
    pub fn matches_contact(&self, email: &str) -> bool {
        self.email
            .as_deref()
            .is_some_and(|candidate| candidate.eq_ignore_ascii_case(email.trim()))
    }

    /// A display name for the session, falling back to the contact
    /// identifier.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.email.clone())
            .unwrap_or_default()
    }
}

/// A ride record as observed by a polling session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideSnapshot {
    /// The ride identifier.
    pub ride_id: i64,
    /// Pickup location.
    pub source: String,
    /// Drop location.
    pub destination: String,
    /// The fare, once priced.
    #[serde(default)]
    pub fare: Option<f64>,
    /// Current lifecycle status.
    pub status: RideStatus,
    /// Assigned driver's display name, when known.
    #[serde(default)]
    pub driver_name: Option<String>,
    /// Assigned driver's vehicle descriptor, when known.
    #[serde(default)]
    pub vehicle_details: Option<String>,
    /// Booking timestamp, when known.
    #[serde(default)]
    pub booking_time: Option<DateTime<Utc>>,
}

impl RideSnapshot {
    /// The typed ride identifier.
    #[must_use]
    pub const fn id(&self) -> RideId {
        RideId::new(self.ride_id)
    }
}
