// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Actor, ActorRole, BookingRequest};
use cabride_domain::{ParticipantId, Ride, RideId, RideStatus};
use chrono::{DateTime, Utc};

pub const RIDER_ID: ParticipantId = ParticipantId::new(10);
pub const DRIVER_ID: ParticipantId = ParticipantId::new(20);

pub fn booked_at() -> DateTime<Utc> {
    Utc::now()
}

pub fn create_test_request() -> BookingRequest {
    BookingRequest {
        rider_id: RIDER_ID,
        source: String::from("Adyar"),
        destination: String::from("Guindy"),
    }
}

pub fn create_test_ride(status: RideStatus) -> Ride {
    Ride {
        id: RideId::new(1),
        rider_id: RIDER_ID,
        driver_id: match status {
            RideStatus::Requested | RideStatus::Booked => None,
            _ => Some(DRIVER_ID),
        },
        source: String::from("Adyar"),
        destination: String::from("Guindy"),
        fare: match status {
            RideStatus::Requested => None,
            _ => Some(70.0),
        },
        status,
        booked_at: booked_at(),
        ended_at: status.is_terminal().then(Utc::now),
    }
}

pub fn rider_actor() -> Actor {
    Actor::new(RIDER_ID, ActorRole::Rider)
}

pub fn driver_actor() -> Actor {
    Actor::new(DRIVER_ID, ActorRole::Driver)
}
