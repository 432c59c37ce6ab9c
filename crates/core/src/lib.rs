// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod state;

#[cfg(test)]
mod tests;

use cabride_domain::RideId;

// Re-export public types and functions
pub use apply::{apply, book_ride};
pub use command::{Actor, ActorRole, BookingRequest, Command};
pub use error::CoreError;
pub use state::{TransitionOutcome, TransitionResult};

/// Validates that a rider is clear to book a new ride.
///
/// The backend enforces one in-flight ride per rider: a rider with an
/// unterminated ride must complete it before booking again.
///
/// # Errors
///
/// Returns `CoreError::OngoingRideExists` if an unterminated ride exists.
pub const fn validate_no_ongoing_ride(has_ongoing_ride: bool) -> Result<(), CoreError> {
    if has_ongoing_ride {
        return Err(CoreError::OngoingRideExists);
    }
    Ok(())
}

/// Validates that a ride id refers to a known ride.
///
/// This is a read-only validation used by the backend before dispatching
/// a lifecycle command.
///
/// # Errors
///
/// Returns `CoreError::RideNotFound` if the lookup came back empty.
pub const fn validate_ride_exists(
    ride_id: RideId,
    found: bool,
) -> Result<(), CoreError> {
    if !found {
        return Err(CoreError::RideNotFound {
            ride_id: ride_id.value(),
        });
    }
    Ok(())
}
