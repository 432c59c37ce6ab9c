// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking submission.
//!
//! The submitter enforces the client-side preconditions first, so obvious
//! mistakes never reach the wire, and surfaces backend rejections
//! verbatim. A confirmation is only produced when the backend returned a
//! priced ride.

use crate::backend::{BookRideRequest, RideBackend};
use crate::error::EngineError;
use crate::estimate::FareEstimate;
use crate::identity::ResolvedIdentity;
use crate::wire::{self, RideSnapshot};
use cabride_domain::RideId;
use tracing::info;

/// A confirmed booking as acknowledged by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct RideConfirmation {
    /// The created ride.
    pub ride_id: RideId,
    /// The locked-in fare.
    pub fare: f64,
    /// Assigned driver's display name, when a driver was available.
    pub driver_name: Option<String>,
    /// Assigned driver's vehicle descriptor, when known.
    pub vehicle_details: Option<String>,
}

/// Submits booking requests on behalf of a resolved rider.
pub struct RideRequestSubmitter<B> {
    backend: B,
}

impl<B: RideBackend> RideRequestSubmitter<B> {
    /// Creates a submitter over the given backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Submits a booking for the given route.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Validation` when the route is incomplete,
    /// degenerate, or no priced estimate is in hand, and the mapped
    /// backend error when the backend rejects the booking.
    pub async fn submit(
        &self,
        identity: &ResolvedIdentity,
        source: &str,
        destination: &str,
        estimate: FareEstimate,
    ) -> Result<RideConfirmation, EngineError> {
        let source = source.trim();
        let destination = destination.trim();
        if source.is_empty() {
            return Err(EngineError::Validation {
                field: "source".to_string(),
                message: "Pickup location is required".to_string(),
            });
        }
        if destination.is_empty() {
            return Err(EngineError::Validation {
                field: "destination".to_string(),
                message: "Drop location is required".to_string(),
            });
        }
        if source.eq_ignore_ascii_case(destination) {
            return Err(EngineError::Validation {
                field: "destination".to_string(),
                message: "Pickup and drop locations must differ".to_string(),
            });
        }
        if !estimate.is_available() {
            return Err(EngineError::Validation {
                field: "estimate".to_string(),
                message: "A fare estimate is required before booking".to_string(),
            });
        }

        let request = BookRideRequest {
            source: source.to_string(),
            destination: destination.to_string(),
            rider_id: identity.id.value(),
        };
        let payload = self
            .backend
            .book_ride(&request)
            .await
            .map_err(|err| EngineError::from_backend(err, "booking"))?;
        let snapshot: RideSnapshot =
            wire::decode(payload).map_err(|err| EngineError::from_backend(err, "booking"))?;
        let Some(fare) = snapshot.fare else {
            return Err(EngineError::Backend {
                message: format!("booked ride {} carries no fare", snapshot.ride_id),
            });
        };

        info!("Booked ride {} at fare {fare}", snapshot.ride_id);
        Ok(RideConfirmation {
            ride_id: snapshot.id(),
            fare,
            driver_name: snapshot.driver_name,
            vehicle_details: snapshot.vehicle_details,
        })
    }
}
