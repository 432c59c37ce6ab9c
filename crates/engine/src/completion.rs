// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ride completion.
//!
//! Either party may conclude a ride, and both may race to do so. A
//! conflict from the backend means the other party already won; that is
//! the expected outcome of the race, not an error.

use crate::backend::{BackendError, RideBackend};
use crate::error::EngineError;
use crate::wire::{self, RideSnapshot};
use cabride_domain::RideId;
use tracing::info;

/// Result of an end-ride request.
#[derive(Debug, Clone, PartialEq)]
pub enum EndRideOutcome {
    /// This session concluded the ride.
    Completed(RideSnapshot),
    /// The other party concluded it first.
    AlreadyCompleted,
}

/// Concludes a ride, treating a lost completion race as success.
///
/// # Errors
///
/// Returns the mapped backend error for anything other than a conflict.
pub async fn end_ride<B: RideBackend>(
    backend: &B,
    ride_id: RideId,
) -> Result<EndRideOutcome, EngineError> {
    match backend.end_ride(ride_id).await {
        Ok(payload) => {
            let snapshot: RideSnapshot =
                wire::decode(payload).map_err(|err| EngineError::from_backend(err, "ride"))?;
            info!("Ride {ride_id} completed");
            Ok(EndRideOutcome::Completed(snapshot))
        }
        Err(BackendError::Status { code: 409, .. }) => {
            info!("Ride {ride_id} was already completed by the other party");
            Ok(EndRideOutcome::AlreadyCompleted)
        }
        Err(err) => Err(EngineError::from_backend(err, "ride")),
    }
}
