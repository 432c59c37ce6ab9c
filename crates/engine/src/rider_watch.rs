// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Rider-side completion watch.
//!
//! After booking, a rider session polls its ride history waiting for the
//! latest booking to conclude. The watch fires exactly one completion
//! event and then stops on its own; a ride observed already rated stops
//! the watch silently, since the feedback window has passed.

use crate::backend::RideBackend;
use crate::wire::{self, RideSnapshot};
use cabride_domain::{RideId, RideStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// Cadence of the rider's history poll.
pub const RIDER_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Emitted once when the watched ride concludes.
#[derive(Debug, Clone, PartialEq)]
pub struct RideCompleted {
    /// The concluded ride.
    pub ride_id: RideId,
    /// The final fare, when the history record carries one.
    pub fare: Option<f64>,
}

/// Handle to a running rider watch task.
pub struct RiderWatchHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RiderWatchHandle {
    /// Signals the loop to stop after its current iteration.
    pub fn stop(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Waits for the loop task to finish.
    pub async fn stopped(self) {
        let _ = self.task.await;
    }
}

/// Spawns the rider completion watch.
///
/// The returned receiver yields at most one [`RideCompleted`] event; the
/// loop stops itself once a conclusion is observed.
pub fn spawn<B: RideBackend + 'static>(
    backend: Arc<B>,
    poll_interval: Duration,
) -> (RiderWatchHandle, mpsc::Receiver<RideCompleted>) {
    let (shutdown, mut shutdown_rx) = watch::channel(false);
    let (events, receiver) = mpsc::channel(1);
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if poll_once(backend.as_ref(), &events).await {
                        break;
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });
    (RiderWatchHandle { shutdown, task }, receiver)
}

/// Runs one history poll. Returns true when the watch should stop.
async fn poll_once<B: RideBackend>(backend: &B, events: &mpsc::Sender<RideCompleted>) -> bool {
    let payload = match backend.ride_history().await {
        Ok(payload) => payload,
        Err(err) => {
            warn!("Rider poll failed, retrying on next tick: {err}");
            return false;
        }
    };
    let rides: Vec<RideSnapshot> = match wire::decode(payload) {
        Ok(rides) => rides,
        Err(err) => {
            warn!("Rider poll returned malformed payload: {err}");
            return false;
        }
    };

    let Some(latest) = latest_booking(&rides) else {
        return false;
    };
    match latest.status {
        RideStatus::Paid => {
            info!("Ride {} concluded at fare {:?}", latest.ride_id, latest.fare);
            let _ = events
                .send(RideCompleted {
                    ride_id: latest.id(),
                    fare: latest.fare,
                })
                .await;
            true
        }
        // Already rated elsewhere; the feedback window has passed.
        RideStatus::Rated => true,
        _ => false,
    }
}

/// The most recent booking in a history listing.
///
/// Ordered by booking time with ride id as the tiebreaker, so records
/// without timestamps still resolve deterministically.
fn latest_booking(rides: &[RideSnapshot]) -> Option<&RideSnapshot> {
    rides
        .iter()
        .max_by_key(|ride| (ride.booking_time, ride.ride_id))
}
