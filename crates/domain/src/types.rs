// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};

/// The backend-assigned canonical identifier for a participant.
///
/// This is distinct from the contact identifier (email), which is only
/// used to look a participant up during identity resolution.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(i64);

impl ParticipantId {
    /// Creates a new participant identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The backend-assigned identifier for a ride record.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RideId(i64);

impl RideId {
    /// Creates a new ride identifier.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw identifier value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for RideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered rider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rider {
    /// The canonical identifier.
    pub id: ParticipantId,
    /// The rider's display name.
    pub name: String,
    /// The contact identifier used for identity resolution.
    pub email: String,
    /// The rider's phone number.
    pub phone: String,
}

impl Rider {
    /// Creates a new rider record.
    #[must_use]
    pub const fn new(id: ParticipantId, name: String, email: String, phone: String) -> Self {
        Self {
            id,
            name,
            email,
            phone,
        }
    }
}

/// A registered driver.
///
/// Availability is never stored directly: `opted_in` records the driver's
/// own shift toggle, and the effective status is derived from that flag
/// plus the presence of an active ride. See [`crate::derive_status`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    /// The canonical identifier.
    pub id: ParticipantId,
    /// The driver's display name.
    pub name: String,
    /// The contact identifier used for identity resolution.
    pub email: String,
    /// The driver's phone number.
    pub phone: String,
    /// The driver's license number.
    pub license_number: String,
    /// A human-readable vehicle descriptor (model and plate).
    pub vehicle_details: String,
    /// Whether the driver has opted in to receive ride assignments.
    pub opted_in: bool,
}

impl Driver {
    /// Creates a new driver record. New drivers start off shift.
    #[must_use]
    pub const fn new(
        id: ParticipantId,
        name: String,
        email: String,
        phone: String,
        license_number: String,
        vehicle_details: String,
    ) -> Self {
        Self {
            id,
            name,
            email,
            phone,
            license_number,
            vehicle_details,
            opted_in: false,
        }
    }
}
