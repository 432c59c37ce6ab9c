// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Driver availability as a derived projection.
//!
//! Availability is a pure function of the driver's shift toggle and the
//! presence of an active ride, never an independently settable field.
//! Modeling it this way prevents the toggle and the assignment state from
//! drifting apart.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Effective driver availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DriverStatus {
    /// On shift with no active assignment
    Available,
    /// An active ride exists for this driver
    Busy,
    /// Off shift
    Offline,
}

impl DriverStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Busy => "BUSY",
            Self::Offline => "OFFLINE",
        }
    }

    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "AVAILABLE" => Ok(Self::Available),
            "BUSY" => Ok(Self::Busy),
            "OFFLINE" => Ok(Self::Offline),
            _ => Err(DomainError::InvalidDriverStatus {
                status: s.to_string(),
            }),
        }
    }
}

impl FromStr for DriverStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

/// Derives the effective status from the shift toggle and assignment state.
///
/// An active ride forces `Busy` regardless of the toggle; otherwise the
/// toggle decides between `Available` and `Offline`.
#[must_use]
pub const fn derive_status(opted_in: bool, has_active_ride: bool) -> DriverStatus {
    if has_active_ride {
        DriverStatus::Busy
    } else if opted_in {
        DriverStatus::Available
    } else {
        DriverStatus::Offline
    }
}

/// Validates that the shift toggle may be flipped in the current state.
///
/// Toggling is only permitted while no active ride exists; a busy driver
/// must finish (or have the backend finish) the ride first.
///
/// # Errors
///
/// Returns `DomainError::DriverBusy` while an active ride exists.
pub const fn validate_status_toggle(has_active_ride: bool) -> Result<(), DomainError> {
    if has_active_ride {
        return Err(DomainError::DriverBusy);
    }
    Ok(())
}
