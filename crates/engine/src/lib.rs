// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client-session side of the ride lifecycle.
//!
//! A rider session and a driver session never talk to each other; the only
//! synchronization primitive is periodic polling of the shared backend.
//! This crate owns everything a session needs to stay in agreement with
//! the authoritative ride record: identity resolution, fare estimation,
//! booking, and the two polling loops that observe transitions made by
//! the other party.

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

mod backend;
mod booking;
mod completion;
pub mod driver_watch;
mod error;
mod estimate;
mod feedback;
mod identity;
pub mod rider_watch;
mod wire;

#[cfg(test)]
mod tests;

pub use backend::{BackendError, BookRideRequest, RatingSubmission, RideBackend};
pub use booking::{RideConfirmation, RideRequestSubmitter};
pub use completion::{EndRideOutcome, end_ride};
pub use driver_watch::{DRIVER_POLL_INTERVAL, DriverSession, DriverWatchHandle, end_active_ride};
pub use error::EngineError;
pub use estimate::{FareEstimate, FareEstimator};
pub use feedback::submit_rating;
pub use identity::{Credentials, IdentityResolver, ResolvedIdentity};
pub use rider_watch::{RIDER_POLL_INTERVAL, RideCompleted, RiderWatchHandle};
pub use wire::{ParticipantRecord, RideSnapshot, decode};
