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

mod driver_status;
mod error;
mod fare;
mod receipt;
mod ride;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use driver_status::{DriverStatus, derive_status, validate_status_toggle};
pub use error::DomainError;
pub use fare::{
    available_locations, calculate_fare, normalize_location, rate_per_km, round_to_paise,
    route_distance,
};
pub use receipt::Receipt;
pub use ride::{Ride, RideStatus};
pub use types::{Driver, ParticipantId, RideId, Rider};
pub use validation::{
    validate_driver_registration, validate_rating, validate_rider_registration, validate_route,
};
