// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ride records and status transition logic.
//!
//! Status only ever advances forward through the defined ordering; no
//! transition function may move it backward. `PAID` is the terminal
//! lifecycle marker (the backend finalizes payment in the same step that
//! ends the ride), after which only rating remains.

use crate::error::DomainError;
use crate::receipt::Receipt;
use crate::types::{ParticipantId, RideId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Ride status states, in lifecycle order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RideStatus {
    /// Booking accepted, no driver assigned yet
    Requested,
    /// Driver search underway or confirmed, waiting for pickup
    Booked,
    /// A driver has been bound to the ride
    Assigned,
    /// Passenger picked up, driving to destination
    InProgress,
    /// Ride ended and payment finalized
    Paid,
    /// Passenger feedback recorded
    Rated,
}

impl RideStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Requested => "REQUESTED",
            Self::Booked => "BOOKED",
            Self::Assigned => "ASSIGNED",
            Self::InProgress => "IN_PROGRESS",
            Self::Paid => "PAID",
            Self::Rated => "RATED",
        }
    }

    /// Parses a status from its string representation.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "REQUESTED" => Ok(Self::Requested),
            "BOOKED" => Ok(Self::Booked),
            "ASSIGNED" => Ok(Self::Assigned),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "PAID" => Ok(Self::Paid),
            "RATED" => Ok(Self::Rated),
            _ => Err(DomainError::InvalidRideStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Position of this status in the lifecycle ordering.
    #[must_use]
    pub const fn rank(&self) -> u8 {
        match self {
            Self::Requested => 0,
            Self::Booked => 1,
            Self::Assigned => 2,
            Self::InProgress => 3,
            Self::Paid => 4,
            Self::Rated => 5,
        }
    }

    /// Returns true if no further lifecycle transition is expected
    /// except rating.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Rated)
    }

    /// Returns true while the ride is in flight from the rider's point
    /// of view (booked through in-progress).
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Booked | Self::Assigned | Self::InProgress)
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not allowed.
    pub fn validate_transition(&self, new_status: Self) -> Result<(), DomainError> {
        if new_status.rank() <= self.rank() {
            return Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "status may only advance forward".to_string(),
            });
        }

        let valid = match self {
            Self::Requested => matches!(new_status, Self::Booked | Self::Assigned),
            Self::Booked => matches!(new_status, Self::Assigned | Self::InProgress | Self::Paid),
            Self::Assigned => matches!(new_status, Self::InProgress | Self::Paid),
            Self::InProgress => matches!(new_status, Self::Paid),
            Self::Paid => matches!(new_status, Self::Rated),
            Self::Rated => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: self.as_str().to_string(),
                to: new_status.as_str().to_string(),
                reason: "transition not permitted by ride lifecycle rules".to_string(),
            })
        }
    }
}

impl FromStr for RideStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// A ride record.
///
/// Created once at booking, mutated only through validated lifecycle
/// transitions, and never deleted — terminal rides stay in history.
#[derive(Debug, Clone, PartialEq)]
pub struct Ride {
    /// The ride identifier.
    pub id: RideId,
    /// The rider who requested the ride.
    pub rider_id: ParticipantId,
    /// The assigned driver. `None` only before assignment.
    pub driver_id: Option<ParticipantId>,
    /// Canonical pickup location.
    pub source: String,
    /// Canonical drop location.
    pub destination: String,
    /// The fare. `None` only while the ride is `Requested`; fixed once
    /// the ride reaches `Paid` and immutable afterward.
    pub fare: Option<f64>,
    /// Current lifecycle status.
    pub status: RideStatus,
    /// When the ride was booked.
    pub booked_at: DateTime<Utc>,
    /// When the ride ended, if it has.
    pub ended_at: Option<DateTime<Utc>>,
}

impl Ride {
    /// Returns true while the ride occupies its driver.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Derives the informational fare breakdown for a concluded ride.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::FareNotFinalized` if the ride has not reached
    /// a terminal status or carries no fixed fare yet.
    pub fn receipt(&self) -> Result<Receipt, DomainError> {
        if !self.status.is_terminal() {
            return Err(DomainError::FareNotFinalized {
                ride_id: self.id.value(),
            });
        }
        let fare: f64 = self.fare.ok_or(DomainError::FareNotFinalized {
            ride_id: self.id.value(),
        })?;
        Ok(Receipt::from_fare(fare))
    }
}
