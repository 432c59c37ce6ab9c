// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cabride_domain::DomainError;

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// The ride id named no known ride.
    RideNotFound {
        /// The missing ride.
        ride_id: i64,
    },
    /// The rider already has an unterminated ride.
    OngoingRideExists,
    /// Assignment was attempted on a ride that already has a driver.
    DriverAlreadyAssigned {
        /// The ride in question.
        ride_id: i64,
    },
    /// A trip command arrived before any driver was bound.
    NoDriverAssigned {
        /// The ride in question.
        ride_id: i64,
    },
    /// The acting participant is not a party to this ride.
    UnauthorizedActor {
        /// The ride in question.
        ride_id: i64,
        /// Why the actor was rejected.
        reason: String,
    },
    /// A ride reached its end command without a fare to finalize.
    MissingFare {
        /// The ride in question.
        ride_id: i64,
    },
    /// Feedback was already recorded for this ride.
    AlreadyRated {
        /// The ride in question.
        ride_id: i64,
    },
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::RideNotFound { ride_id } => write!(f, "Ride not found with ID: {ride_id}"),
            Self::OngoingRideExists => write!(
                f,
                "You already have an ongoing ride! Complete it before booking a new one."
            ),
            Self::DriverAlreadyAssigned { ride_id } => {
                write!(f, "Ride {ride_id} already has a driver assigned")
            }
            Self::NoDriverAssigned { ride_id } => {
                write!(f, "Ride {ride_id} has no driver assigned yet")
            }
            Self::UnauthorizedActor { ride_id, reason } => {
                write!(f, "Not a party to ride {ride_id}: {reason}")
            }
            Self::MissingFare { ride_id } => {
                write!(f, "Ride {ride_id} cannot conclude without a fare")
            }
            Self::AlreadyRated { ride_id } => {
                write!(f, "You have already rated ride {ride_id}.")
            }
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
