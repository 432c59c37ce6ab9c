// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A route endpoint was left empty.
    EmptyLocation {
        /// Which endpoint was empty.
        field: &'static str,
    },
    /// A location named no covered service area.
    UnknownLocation(String),
    /// Source and destination name the same location.
    SameSourceAndDestination,
    /// A ride status string could not be parsed.
    InvalidRideStatus {
        /// The unparseable status.
        status: String,
    },
    /// A status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was rejected.
        reason: String,
    },
    /// A driver status string could not be parsed.
    InvalidDriverStatus {
        /// The unparseable status.
        status: String,
    },
    /// The shift toggle was used while an active ride exists.
    DriverBusy,
    /// A receipt was requested before the fare was fixed.
    FareNotFinalized {
        /// The ride in question.
        ride_id: i64,
    },
    /// A feedback score outside 1..=5.
    InvalidRating {
        /// The rejected score.
        score: u8,
    },
    /// Participant name is empty or malformed.
    InvalidName(String),
    /// Contact email is malformed.
    InvalidEmail(String),
    /// Phone number is malformed.
    InvalidPhone(String),
    /// Driver license number is malformed.
    InvalidLicense(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyLocation { field } => write!(f, "Please select a {field} location"),
            Self::UnknownLocation(input) => write!(f, "Invalid location: {input}"),
            Self::SameSourceAndDestination => {
                write!(f, "Source and destination must be different")
            }
            Self::InvalidRideStatus { status } => write!(f, "Invalid ride status: {status}"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot move ride from {from} to {to}: {reason}")
            }
            Self::InvalidDriverStatus { status } => {
                write!(f, "Invalid driver status: {status}. Use AVAILABLE or OFFLINE")
            }
            Self::DriverBusy => {
                write!(f, "Driver is busy with an active ride; finish it first")
            }
            Self::FareNotFinalized { ride_id } => {
                write!(f, "Ride {ride_id} has no finalized fare yet")
            }
            Self::InvalidRating { score } => {
                write!(f, "Rating must be between 1 and 5, got {score}")
            }
            Self::InvalidName(reason)
            | Self::InvalidPhone(reason)
            | Self::InvalidLicense(reason) => write!(f, "{reason}"),
            Self::InvalidEmail(email) => write!(f, "Invalid email format: {email}"),
        }
    }
}

impl std::error::Error for DomainError {}
