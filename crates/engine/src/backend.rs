// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The backend port.
//!
//! The engine never constructs HTTP requests itself; it speaks to an
//! implementation of [`RideBackend`], one method per backend contract
//! operation. Methods return raw JSON values on purpose: response shapes
//! vary between backend generations (bare vs. enveloped payloads, legacy
//! identifier keys), and the [`crate::wire`] module is the single place
//! that normalizes them.

use cabride_domain::{ParticipantId, RideId};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

/// Failures crossing the backend boundary, before any normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The request never completed (connection refused, timeout, ...).
    #[error("transport failure: {message}")]
    Transport {
        /// What went wrong.
        message: String,
    },
    /// The backend answered with a non-success status.
    #[error("backend returned {code}: {message}")]
    Status {
        /// The HTTP status code.
        code: u16,
        /// The backend's message, verbatim.
        message: String,
    },
    /// The response arrived but could not be understood.
    #[error("malformed backend payload: {message}")]
    Malformed {
        /// What failed to parse.
        message: String,
    },
}

/// Wire request to create a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRideRequest {
    /// Pickup location.
    pub source: String,
    /// Drop location.
    pub destination: String,
    /// The resolved rider id.
    pub rider_id: i64,
}

/// Wire request to record feedback for a concluded ride.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingSubmission {
    /// The concluded ride.
    pub ride_id: i64,
    /// The rating rider.
    pub rater_id: i64,
    /// Score in 1..=5.
    pub score: u8,
    /// Free-form comments.
    pub comments: String,
}

/// The minimal backend contract this engine depends on.
///
/// Implementations carry the bearer credential themselves; the engine
/// only ever deals in resolved participant ids.
pub trait RideBackend: Send + Sync {
    /// `GET /participants` — the full participant collection, used for
    /// identity resolution.
    fn list_participants(&self) -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// `GET /rides/estimate` — a fare value, bare or enveloped.
    fn fare_estimate(
        &self,
        source: &str,
        destination: &str,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// `POST /rides/book` — the created ride.
    fn book_ride(
        &self,
        request: &BookRideRequest,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// `GET /rides/history` — the calling rider's ride list.
    fn ride_history(&self) -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// `GET /rides/history/{driver_id}` — a driver's ride list.
    fn driver_ride_history(
        &self,
        driver_id: ParticipantId,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// `GET /rides/active-request/{driver_id}` — the driver's active
    /// ride, or null.
    fn active_ride(
        &self,
        driver_id: ParticipantId,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// `PUT /rides/{id}/end` — the finalized ride.
    fn end_ride(&self, ride_id: RideId)
    -> impl Future<Output = Result<Value, BackendError>> + Send;

    /// `POST /ratings/submit` — record feedback.
    fn submit_rating(
        &self,
        submission: &RatingSubmission,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send;
}

impl<B: RideBackend> RideBackend for &B {
    fn list_participants(&self) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).list_participants()
    }

    fn fare_estimate(
        &self,
        source: &str,
        destination: &str,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).fare_estimate(source, destination)
    }

    fn book_ride(
        &self,
        request: &BookRideRequest,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).book_ride(request)
    }

    fn ride_history(&self) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).ride_history()
    }

    fn driver_ride_history(
        &self,
        driver_id: ParticipantId,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).driver_ride_history(driver_id)
    }

    fn active_ride(
        &self,
        driver_id: ParticipantId,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).active_ride(driver_id)
    }

    fn end_ride(
        &self,
        ride_id: RideId,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).end_ride(ride_id)
    }

    fn submit_rating(
        &self,
        submission: &RatingSubmission,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).submit_rating(submission)
    }
}

impl<B: RideBackend> RideBackend for std::sync::Arc<B> {
    fn list_participants(&self) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).list_participants()
    }

    fn fare_estimate(
        &self,
        source: &str,
        destination: &str,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).fare_estimate(source, destination)
    }

    fn book_ride(
        &self,
        request: &BookRideRequest,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).book_ride(request)
    }

    fn ride_history(&self) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).ride_history()
    }

    fn driver_ride_history(
        &self,
        driver_id: ParticipantId,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).driver_ride_history(driver_id)
    }

    fn active_ride(
        &self,
        driver_id: ParticipantId,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).active_ride(driver_id)
    }

    fn end_ride(
        &self,
        ride_id: RideId,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).end_ride(ride_id)
    }

    fn submit_rating(
        &self,
        submission: &RatingSubmission,
    ) -> impl Future<Output = Result<Value, BackendError>> + Send {
        (**self).submit_rating(submission)
    }
}
