// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::backend::{BackendError, BookRideRequest, RatingSubmission, RideBackend};
use cabride_domain::{ParticipantId, RideId};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::Mutex;

pub const RIDER_ID: i64 = 10;
pub const DRIVER_ID: i64 = 20;
pub const RIDE_ID: i64 = 1;

type Scripted = Result<Value, BackendError>;

/// One backend endpoint with a queue of scripted responses.
///
/// Responses are served in order; once the queue is drained the last
/// served response repeats, so a polling loop can be scripted with a
/// finite prefix.
#[derive(Default)]
pub struct Endpoint {
    responses: Mutex<VecDeque<Scripted>>,
    last: Mutex<Option<Scripted>>,
    calls: Mutex<usize>,
}

impl Endpoint {
    pub fn push(&self, response: Scripted) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }

    fn next(&self) -> Scripted {
        *self.calls.lock().unwrap() += 1;
        if let Some(response) = self.responses.lock().unwrap().pop_front() {
            *self.last.lock().unwrap() = Some(response.clone());
            return response;
        }
        self.last
            .lock()
            .unwrap()
            .clone()
            .unwrap_or(Err(BackendError::Transport {
                message: "no scripted response".to_string(),
            }))
    }
}

/// A backend whose every endpoint is scripted from the test body.
#[derive(Default)]
pub struct FakeBackend {
    pub participants: Endpoint,
    pub estimates: Endpoint,
    pub bookings: Endpoint,
    pub history: Endpoint,
    pub driver_history: Endpoint,
    pub active: Endpoint,
    pub endings: Endpoint,
    pub ratings: Endpoint,
}

impl RideBackend for FakeBackend {
    async fn list_participants(&self) -> Result<Value, BackendError> {
        self.participants.next()
    }

    async fn fare_estimate(&self, _source: &str, _destination: &str) -> Result<Value, BackendError> {
        self.estimates.next()
    }

    async fn book_ride(&self, _request: &BookRideRequest) -> Result<Value, BackendError> {
        self.bookings.next()
    }

    async fn ride_history(&self) -> Result<Value, BackendError> {
        self.history.next()
    }

    async fn driver_ride_history(
        &self,
        _driver_id: ParticipantId,
    ) -> Result<Value, BackendError> {
        self.driver_history.next()
    }

    async fn active_ride(&self, _driver_id: ParticipantId) -> Result<Value, BackendError> {
        self.active.next()
    }

    async fn end_ride(&self, _ride_id: RideId) -> Result<Value, BackendError> {
        self.endings.next()
    }

    async fn submit_rating(&self, _submission: &RatingSubmission) -> Result<Value, BackendError> {
        self.ratings.next()
    }
}

pub fn transport(message: &str) -> BackendError {
    BackendError::Transport {
        message: message.to_string(),
    }
}

pub fn status(code: u16, message: &str) -> BackendError {
    BackendError::Status {
        code,
        message: message.to_string(),
    }
}

pub fn ride_json(ride_id: i64, status: &str, fare: Option<f64>) -> Value {
    json!({
        "rideId": ride_id,
        "source": "Adyar",
        "destination": "Guindy",
        "fare": fare,
        "status": status,
        "driverName": "Dhanush",
        "vehicleDetails": "TN-09-1234 Swift",
        "bookingTime": "2026-08-27T09:00:00Z",
    })
}

pub fn participants_json() -> Value {
    json!({
        "data": [
            { "userId": RIDER_ID, "name": "Meera", "email": "meera@example.com" },
            { "id": DRIVER_ID, "name": "Dhanush", "email": "dhanush@example.com" },
        ]
    })
}
