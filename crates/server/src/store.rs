// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The authoritative in-memory ride store.
//!
//! All lifecycle transitions go through the pure core (`cabride::apply`);
//! this module only owns the collections, identifier allocation, and the
//! cross-record rules that need visibility over every ride (one ongoing
//! ride per rider, first-available driver assignment).

use cabride::{Actor, BookingRequest, Command, CoreError, TransitionResult};
use cabride_domain::{
    DomainError, Driver, DriverStatus, ParticipantId, Ride, RideId, Rider, calculate_fare,
    derive_status, validate_driver_registration, validate_rider_registration,
    validate_status_toggle,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;
use tracing::info;

/// Errors produced by store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A domain rule was violated.
    Domain(DomainError),
    /// A lifecycle rule was violated.
    Core(CoreError),
    /// The email is already registered.
    DuplicateEmail(String),
    /// No driver is currently in the AVAILABLE pool.
    NoDriverAvailable,
    /// No participant exists with the given id.
    ParticipantNotFound(i64),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(err) => write!(f, "{err}"),
            Self::Core(err) => write!(f, "{err}"),
            Self::DuplicateEmail(email) => {
                write!(f, "A participant is already registered with email: {email}")
            }
            Self::NoDriverAvailable => {
                write!(f, "No cabs available right now! Please try again later.")
            }
            Self::ParticipantNotFound(id) => write!(f, "Participant not found with ID: {id}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<DomainError> for StoreError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

/// A recorded rating for a concluded ride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingRecord {
    /// Score in 1..=5.
    pub score: u8,
    /// Free-form comments.
    pub comments: String,
}

/// The in-memory backend state.
#[derive(Debug, Default)]
pub struct Store {
    riders: BTreeMap<i64, Rider>,
    drivers: BTreeMap<i64, Driver>,
    rides: BTreeMap<i64, Ride>,
    ratings: BTreeMap<i64, RatingRecord>,
    next_participant_id: i64,
    next_ride_id: i64,
}

impl Store {
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_participant_id: 1,
            next_ride_id: 1,
            ..Self::default()
        }
    }

    fn allocate_participant_id(&mut self) -> ParticipantId {
        let id = ParticipantId::new(self.next_participant_id);
        self.next_participant_id += 1;
        id
    }

    /// Registers a rider after field validation.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields and
    /// `StoreError::DuplicateEmail` for a reused email.
    pub fn register_rider(
        &mut self,
        name: &str,
        email: &str,
        phone: &str,
    ) -> Result<Rider, StoreError> {
        validate_rider_registration(name, email, phone)?;
        self.ensure_email_unused(email)?;
        let id = self.allocate_participant_id();
        let rider = Rider::new(
            id,
            name.trim().to_string(),
            email.trim().to_string(),
            phone.trim().to_string(),
        );
        self.riders.insert(id.value(), rider.clone());
        info!("Registered rider {id}");
        Ok(rider)
    }

    /// Registers a driver after field validation. Drivers start OFFLINE.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields and
    /// `StoreError::DuplicateEmail` for a reused email.
    pub fn register_driver(
        &mut self,
        name: &str,
        email: &str,
        phone: &str,
        license_number: &str,
        vehicle_details: &str,
    ) -> Result<Driver, StoreError> {
        validate_driver_registration(name, email, phone, license_number)?;
        self.ensure_email_unused(email)?;
        let id = self.allocate_participant_id();
        let driver = Driver::new(
            id,
            name.trim().to_string(),
            email.trim().to_string(),
            phone.trim().to_string(),
            license_number.trim().to_string(),
            vehicle_details.trim().to_string(),
        );
        self.drivers.insert(id.value(), driver.clone());
        info!("Registered driver {id}");
        Ok(driver)
    }

    fn ensure_email_unused(&self, email: &str) -> Result<(), StoreError> {
        let email = email.trim();
        let taken = self
            .riders
            .values()
            .any(|rider| rider.email.eq_ignore_ascii_case(email))
            || self
                .drivers
                .values()
                .any(|driver| driver.email.eq_ignore_ascii_case(email));
        if taken {
            return Err(StoreError::DuplicateEmail(email.to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn rider_by_email(&self, email: &str) -> Option<&Rider> {
        self.riders
            .values()
            .find(|rider| rider.email.eq_ignore_ascii_case(email.trim()))
    }

    #[must_use]
    pub fn driver_by_email(&self, email: &str) -> Option<&Driver> {
        self.drivers
            .values()
            .find(|driver| driver.email.eq_ignore_ascii_case(email.trim()))
    }

    pub fn riders(&self) -> impl Iterator<Item = &Rider> {
        self.riders.values()
    }

    pub fn drivers(&self) -> impl Iterator<Item = &Driver> {
        self.drivers.values()
    }

    fn rider(&self, id: ParticipantId) -> Result<&Rider, StoreError> {
        self.riders
            .get(&id.value())
            .ok_or(StoreError::ParticipantNotFound(id.value()))
    }

    fn driver(&self, id: ParticipantId) -> Result<&Driver, StoreError> {
        self.drivers
            .get(&id.value())
            .ok_or(StoreError::ParticipantNotFound(id.value()))
    }

    #[must_use]
    pub fn driver_name(&self, id: ParticipantId) -> Option<&str> {
        self.drivers
            .get(&id.value())
            .map(|driver| driver.name.as_str())
    }

    #[must_use]
    pub fn driver_vehicle(&self, id: ParticipantId) -> Option<&str> {
        self.drivers
            .get(&id.value())
            .map(|driver| driver.vehicle_details.as_str())
    }

    fn driver_has_active_ride(&self, driver_id: ParticipantId) -> bool {
        self.rides
            .values()
            .any(|ride| ride.driver_id == Some(driver_id) && ride.status.is_active())
    }

    fn rider_has_ongoing_ride(&self, rider_id: ParticipantId) -> bool {
        self.rides
            .values()
            .any(|ride| ride.rider_id == rider_id && !ride.status.is_terminal())
    }

    /// The derived status of a driver.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ParticipantNotFound` for an unknown driver.
    pub fn driver_status(&self, driver_id: ParticipantId) -> Result<DriverStatus, StoreError> {
        let driver = self.driver(driver_id)?;
        Ok(derive_status(
            driver.opted_in,
            self.driver_has_active_ride(driver_id),
        ))
    }

    /// Applies an opt-in toggle for a driver.
    ///
    /// # Errors
    ///
    /// Rejects the toggle while the driver is BUSY with an active ride.
    pub fn set_driver_opt_in(
        &mut self,
        driver_id: ParticipantId,
        opted_in: bool,
    ) -> Result<DriverStatus, StoreError> {
        self.driver(driver_id)?;
        validate_status_toggle(self.driver_has_active_ride(driver_id))?;
        if let Some(driver) = self.drivers.get_mut(&driver_id.value()) {
            driver.opted_in = opted_in;
        }
        self.driver_status(driver_id)
    }

    /// First driver in the AVAILABLE pool, lowest id wins.
    fn first_available_driver(&self) -> Option<ParticipantId> {
        self.drivers
            .values()
            .map(|driver| driver.id)
            .find(|id| self.driver_status(*id) == Ok(DriverStatus::Available))
    }

    /// Books a ride for a rider, auto-assigning the first available driver.
    ///
    /// The fare is fixed from the fare table at booking time and the ride
    /// lands ASSIGNED.
    ///
    /// # Errors
    ///
    /// Returns route/ongoing-ride violations and
    /// `StoreError::NoDriverAvailable` when the pool is empty.
    pub fn book_ride(
        &mut self,
        rider_id: ParticipantId,
        source: &str,
        destination: &str,
        now: DateTime<Utc>,
    ) -> Result<Ride, StoreError> {
        self.rider(rider_id)?;
        cabride::validate_no_ongoing_ride(self.rider_has_ongoing_ride(rider_id))?;
        let fare: f64 = calculate_fare(source, destination)?;

        let request = BookingRequest {
            rider_id,
            source: source.to_string(),
            destination: destination.to_string(),
        };
        let ride_id = RideId::new(self.next_ride_id);
        let booked: Ride = cabride::book_ride(&request, ride_id, Some(fare), now)?;

        let Some(driver_id) = self.first_available_driver() else {
            return Err(StoreError::NoDriverAvailable);
        };
        let result: TransitionResult =
            cabride::apply(&booked, Command::AssignDriver { driver_id }, now)?;

        self.next_ride_id += 1;
        self.rides
            .insert(ride_id.value(), result.new_ride.clone());
        info!("Booked ride {ride_id} for rider {rider_id}, driver {driver_id}");
        Ok(result.new_ride)
    }

    fn ride(&self, ride_id: RideId) -> Result<&Ride, StoreError> {
        let found = self.rides.get(&ride_id.value());
        cabride::validate_ride_exists(ride_id, found.is_some())?;
        found.ok_or(StoreError::Core(CoreError::RideNotFound {
            ride_id: ride_id.value(),
        }))
    }

    /// Marks an assigned ride IN_PROGRESS.
    ///
    /// # Errors
    ///
    /// Returns lifecycle violations from the transition rules.
    pub fn start_trip(&mut self, ride_id: RideId, now: DateTime<Utc>) -> Result<Ride, StoreError> {
        let ride = self.ride(ride_id)?.clone();
        let result: TransitionResult = cabride::apply(&ride, Command::StartTrip, now)?;
        self.rides.insert(ride_id.value(), result.new_ride.clone());
        Ok(result.new_ride)
    }

    /// Concludes a ride on behalf of either party.
    ///
    /// Idempotent: ending a ride that is already terminal returns the
    /// stored terminal record unchanged.
    ///
    /// # Errors
    ///
    /// Returns authorization and lifecycle violations.
    pub fn end_ride(
        &mut self,
        ride_id: RideId,
        actor: Actor,
        now: DateTime<Utc>,
    ) -> Result<Ride, StoreError> {
        let ride = self.ride(ride_id)?.clone();
        let result: TransitionResult = cabride::apply(&ride, Command::EndRide { actor }, now)?;
        if !result.outcome.is_benign_repeat() {
            self.rides.insert(ride_id.value(), result.new_ride.clone());
            info!("Ride {ride_id} concluded");
        }
        Ok(result.new_ride)
    }

    /// Records a rating for a concluded ride.
    ///
    /// # Errors
    ///
    /// Returns authorization, score, and duplicate-rating violations.
    pub fn submit_rating(
        &mut self,
        ride_id: RideId,
        rater_id: ParticipantId,
        score: u8,
        comments: &str,
        now: DateTime<Utc>,
    ) -> Result<Ride, StoreError> {
        let ride = self.ride(ride_id)?.clone();
        let actor = Actor::new(rater_id, cabride::ActorRole::Rider);
        let result: TransitionResult =
            cabride::apply(&ride, Command::SubmitRating { actor, score }, now)?;
        self.rides.insert(ride_id.value(), result.new_ride.clone());
        self.ratings.insert(
            ride_id.value(),
            RatingRecord {
                score,
                comments: comments.to_string(),
            },
        );
        info!("Ride {ride_id} rated {score}");
        Ok(result.new_ride)
    }

    #[must_use]
    pub fn rating(&self, ride_id: RideId) -> Option<&RatingRecord> {
        self.ratings.get(&ride_id.value())
    }

    /// A rider's rides, oldest first.
    #[must_use]
    pub fn rider_history(&self, rider_id: ParticipantId) -> Vec<&Ride> {
        self.rides
            .values()
            .filter(|ride| ride.rider_id == rider_id)
            .collect()
    }

    /// A driver's rides, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ParticipantNotFound` for an unknown driver.
    pub fn driver_history(&self, driver_id: ParticipantId) -> Result<Vec<&Ride>, StoreError> {
        self.driver(driver_id)?;
        Ok(self
            .rides
            .values()
            .filter(|ride| ride.driver_id == Some(driver_id))
            .collect())
    }

    /// The driver's current assignment, if any.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::ParticipantNotFound` for an unknown driver.
    pub fn active_ride(&self, driver_id: ParticipantId) -> Result<Option<&Ride>, StoreError> {
        self.driver(driver_id)?;
        Ok(self
            .rides
            .values()
            .find(|ride| ride.driver_id == Some(driver_id) && ride.status.is_active()))
    }
}
