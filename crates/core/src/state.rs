// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cabride_domain::{ParticipantId, Ride};

/// What a successful transition did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionOutcome {
    /// A driver was bound to the ride.
    DriverAssigned {
        /// The bound driver.
        driver_id: ParticipantId,
    },
    /// The trip moved to in-progress.
    TripStarted,
    /// The ride concluded and the fare is now fixed.
    Completed {
        /// The finalized fare.
        fare: f64,
    },
    /// The ride was already concluded when the end command arrived.
    /// A benign repeat, not a failure.
    AlreadyCompleted,
    /// Feedback was recorded.
    Rated {
        /// The recorded score.
        score: u8,
    },
}

impl TransitionOutcome {
    /// Returns true for outcomes that repeat an effect already applied.
    #[must_use]
    pub const fn is_benign_repeat(&self) -> bool {
        matches!(self, Self::AlreadyCompleted)
    }
}

/// The result of a successful state transition.
///
/// Transitions are atomic: they either succeed completely or fail without
/// side effects. The input ride is never mutated in place.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionResult {
    /// The ride after the transition.
    pub new_ride: Ride,
    /// What the transition did.
    pub outcome: TransitionOutcome,
}
