// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Driver-side polling loop.
//!
//! A driver session polls its active-ride endpoint on a fixed cadence and
//! mirrors the authoritative assignment into local session state. The
//! displayed driver status is never stored; it is derived on read from
//! the opt-in flag and the presence of an active ride. An observed ride
//! forces BUSY regardless of opt-in, and the disappearance of a ride the
//! session was busy with is the only automatic BUSY to AVAILABLE path.

use crate::backend::RideBackend;
use crate::completion::{self, EndRideOutcome};
use crate::error::EngineError;
use crate::wire::{self, RideSnapshot};
use cabride_domain::{DriverStatus, ParticipantId, derive_status};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Cadence of the driver's active-ride poll.
pub const DRIVER_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Mutable state of a driver session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DriverSession {
    /// Whether the driver has opted in to receive assignments.
    pub opted_in: bool,
    /// The assignment observed on the last successful poll.
    pub active_ride: Option<RideSnapshot>,
}

impl DriverSession {
    /// The derived status for display.
    #[must_use]
    pub const fn status(&self) -> DriverStatus {
        derive_status(self.opted_in, self.active_ride.is_some())
    }
}

/// Handle to a running driver watch task.
pub struct DriverWatchHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl DriverWatchHandle {
    /// Signals the loop to stop after its current iteration.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Waits for the loop task to finish.
    pub async fn stopped(self) {
        let _ = self.task.await;
    }
}

/// Spawns the driver polling loop.
///
/// The loop runs until [`DriverWatchHandle::stop`] is called. A missed
/// tick is delayed rather than burst so a slow backend never causes a
/// poll storm.
pub fn spawn<B: RideBackend + 'static>(
    backend: Arc<B>,
    driver_id: ParticipantId,
    session: Arc<Mutex<DriverSession>>,
    poll_interval: Duration,
) -> DriverWatchHandle {
    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    poll_once(backend.as_ref(), driver_id, &session).await;
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });
    DriverWatchHandle { shutdown, task }
}

/// Runs one poll iteration against the active-ride endpoint.
///
/// Failures leave the session untouched; last-known-good state survives
/// transient backend outages.
async fn poll_once<B: RideBackend>(
    backend: &B,
    driver_id: ParticipantId,
    session: &Mutex<DriverSession>,
) {
    let payload = match backend.active_ride(driver_id).await {
        Ok(payload) => payload,
        Err(err) => {
            warn!("Driver poll failed, keeping last known state: {err}");
            return;
        }
    };
    let observed = match decode_active(payload) {
        Ok(observed) => observed,
        Err(err) => {
            warn!("Driver poll returned malformed payload: {err}");
            return;
        }
    };

    let mut session = session.lock().await;
    match observed {
        Some(ride) => {
            if session
                .active_ride
                .as_ref()
                .is_none_or(|current| current.ride_id != ride.ride_id)
            {
                info!("Driver {driver_id} assigned ride {}", ride.ride_id);
            }
            session.active_ride = Some(ride);
        }
        None => {
            if session.status() == DriverStatus::Busy {
                info!("Ride for driver {driver_id} concluded, returning to AVAILABLE");
                session.active_ride = None;
                session.opted_in = true;
            }
        }
    }
}

/// The no-assignment response is a bare `null` or an enveloped `null`;
/// anything else must decode as a ride.
fn decode_active(payload: Value) -> Result<Option<RideSnapshot>, EngineError> {
    if payload.is_null() {
        return Ok(None);
    }
    if let Value::Object(fields) = &payload {
        if fields.get("data").is_some_and(Value::is_null) {
            return Ok(None);
        }
    }
    wire::decode::<RideSnapshot>(payload)
        .map(Some)
        .map_err(|err| EngineError::from_backend(err, "ride"))
}

/// Concludes the session's active ride without waiting for the next poll.
///
/// On success the assignment is cleared and the driver returns to the
/// AVAILABLE pool immediately.
///
/// # Errors
///
/// Returns `EngineError::Validation` when no assignment is held and the
/// mapped backend error when the conclusion fails.
pub async fn end_active_ride<B: RideBackend>(
    backend: &B,
    session: &Mutex<DriverSession>,
) -> Result<EndRideOutcome, EngineError> {
    let ride_id = {
        let session = session.lock().await;
        let Some(ride) = session.active_ride.as_ref() else {
            return Err(EngineError::Validation {
                field: "ride".to_string(),
                message: "no active ride to end".to_string(),
            });
        };
        ride.id()
    };

    let outcome = completion::end_ride(backend, ride_id).await?;
    let mut session = session.lock().await;
    session.active_ride = None;
    session.opted_in = true;
    Ok(outcome)
}
