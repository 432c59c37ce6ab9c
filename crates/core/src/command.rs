// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cabride_domain::ParticipantId;

/// The lifecycle role of the session invoking a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorRole {
    /// The rider who booked the ride.
    Rider,
    /// The driver assigned to the ride.
    Driver,
}

/// The authenticated participant invoking a lifecycle command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// The participant's canonical id.
    pub id: ParticipantId,
    /// The participant's role.
    pub role: ActorRole,
}

impl Actor {
    /// Creates a new actor.
    #[must_use]
    pub const fn new(id: ParticipantId, role: ActorRole) -> Self {
        Self { id, role }
    }
}

/// A validated booking intent, before any ride record exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// The resolved rider. Never unresolved: identity resolution must
    /// succeed before a booking may be attempted.
    pub rider_id: ParticipantId,
    /// Requested pickup location (raw input; normalized during booking).
    pub source: String,
    /// Requested drop location (raw input; normalized during booking).
    pub destination: String,
}

/// A command represents participant or backend intent as data only.
///
/// Commands are the only way to request a ride state change after booking.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Bind a driver to the ride. Assignment is authoritative backend
    /// behavior and immutable once set.
    AssignDriver {
        /// The driver being bound.
        driver_id: ParticipantId,
    },
    /// The driver picked the passenger up.
    StartTrip,
    /// Conclude the ride, fixing the fare. Idempotent: ending an already
    /// concluded ride yields a benign outcome, because both the rider and
    /// driver sessions independently offer this action.
    EndRide {
        /// Who is ending the ride.
        actor: Actor,
    },
    /// Record passenger feedback for a concluded ride.
    SubmitRating {
        /// Who is rating; must be the ride's rider.
        actor: Actor,
        /// Score in 1..=5.
        score: u8,
    },
}
