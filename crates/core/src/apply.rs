// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Actor, ActorRole, BookingRequest, Command};
use crate::error::CoreError;
use crate::state::{TransitionOutcome, TransitionResult};
use cabride_domain::{Ride, RideId, RideStatus, validate_rating, validate_route};
use chrono::{DateTime, Utc};

/// Creates a ride record from a validated booking.
///
/// The route is normalized and validated here, so callers may pass raw
/// input. When the backend prices the ride up front, the record lands in
/// `Booked` with the fare fixed; a backend that defers pricing creates a
/// `Requested` ride with no fare.
///
/// # Arguments
///
/// * `request` - The booking intent (rider already resolved)
/// * `ride_id` - The identifier assigned by the backend
/// * `fare` - The fare, if priced at booking time
/// * `booked_at` - The booking timestamp
///
/// # Errors
///
/// Returns an error if the route is empty, unknown, or degenerate
/// (source equals destination).
pub fn book_ride(
    request: &BookingRequest,
    ride_id: RideId,
    fare: Option<f64>,
    booked_at: DateTime<Utc>,
) -> Result<Ride, CoreError> {
    let (source, destination): (String, String) =
        validate_route(&request.source, &request.destination)?;

    let status: RideStatus = if fare.is_some() {
        RideStatus::Booked
    } else {
        RideStatus::Requested
    };

    Ok(Ride {
        id: ride_id,
        rider_id: request.rider_id,
        driver_id: None,
        source,
        destination,
        fare,
        status,
        booked_at,
        ended_at: None,
    })
}

/// Applies a lifecycle command to a ride, producing the transitioned ride.
///
/// Pure and atomic: the input ride is never mutated, and a failed command
/// leaves no partial effect.
///
/// # Arguments
///
/// * `ride` - The current ride record (immutable)
/// * `command` - The command to apply
/// * `now` - The clock reading recorded for timestamped transitions
///
/// # Errors
///
/// Returns an error if the command violates a guard or the status
/// lifecycle. Ending an already concluded ride is NOT an error; it yields
/// `TransitionOutcome::AlreadyCompleted`.
pub fn apply(
    ride: &Ride,
    command: Command,
    now: DateTime<Utc>,
) -> Result<TransitionResult, CoreError> {
    match command {
        Command::AssignDriver { driver_id } => {
            if ride.driver_id.is_some() {
                return Err(CoreError::DriverAlreadyAssigned {
                    ride_id: ride.id.value(),
                });
            }
            ride.status.validate_transition(RideStatus::Assigned)?;

            let mut new_ride: Ride = ride.clone();
            new_ride.driver_id = Some(driver_id);
            new_ride.status = RideStatus::Assigned;

            Ok(TransitionResult {
                new_ride,
                outcome: TransitionOutcome::DriverAssigned { driver_id },
            })
        }
        Command::StartTrip => {
            if ride.driver_id.is_none() {
                return Err(CoreError::NoDriverAssigned {
                    ride_id: ride.id.value(),
                });
            }
            ride.status.validate_transition(RideStatus::InProgress)?;

            let mut new_ride: Ride = ride.clone();
            new_ride.status = RideStatus::InProgress;

            Ok(TransitionResult {
                new_ride,
                outcome: TransitionOutcome::TripStarted,
            })
        }
        Command::EndRide { actor } => {
            // Benign repeat: a concurrent completion already landed.
            if ride.status.is_terminal() {
                return Ok(TransitionResult {
                    new_ride: ride.clone(),
                    outcome: TransitionOutcome::AlreadyCompleted,
                });
            }

            validate_end_actor(ride, actor)?;
            ride.status.validate_transition(RideStatus::Paid)?;

            // Conclusion is the point where the fare becomes fixed; a ride
            // with nothing to fix cannot conclude.
            let fare: f64 = ride.fare.ok_or(CoreError::MissingFare {
                ride_id: ride.id.value(),
            })?;

            let mut new_ride: Ride = ride.clone();
            new_ride.status = RideStatus::Paid;
            new_ride.ended_at = Some(now);

            Ok(TransitionResult {
                new_ride,
                outcome: TransitionOutcome::Completed { fare },
            })
        }
        Command::SubmitRating { actor, score } => {
            if ride.status == RideStatus::Rated {
                return Err(CoreError::AlreadyRated {
                    ride_id: ride.id.value(),
                });
            }
            if actor.role != ActorRole::Rider || actor.id != ride.rider_id {
                return Err(CoreError::UnauthorizedActor {
                    ride_id: ride.id.value(),
                    reason: "only the rider who took this ride may rate it".to_string(),
                });
            }
            validate_rating(score)?;
            ride.status.validate_transition(RideStatus::Rated)?;

            let mut new_ride: Ride = ride.clone();
            new_ride.status = RideStatus::Rated;

            Ok(TransitionResult {
                new_ride,
                outcome: TransitionOutcome::Rated { score },
            })
        }
    }
}

/// An end command must come from a party to the ride: its rider, or the
/// driver currently bound to it.
fn validate_end_actor(ride: &Ride, actor: Actor) -> Result<(), CoreError> {
    let authorized: bool = match actor.role {
        ActorRole::Rider => actor.id == ride.rider_id,
        ActorRole::Driver => ride.driver_id == Some(actor.id),
    };
    if authorized {
        Ok(())
    } else {
        Err(CoreError::UnauthorizedActor {
            ride_id: ride.id.value(),
            reason: "actor is neither the rider nor the assigned driver".to_string(),
        })
    }
}
