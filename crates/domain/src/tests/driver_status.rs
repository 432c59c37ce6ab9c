// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{DomainError, DriverStatus, derive_status, validate_status_toggle};
use std::str::FromStr;

#[test]
fn test_status_string_round_trip() {
    for status in [
        DriverStatus::Available,
        DriverStatus::Busy,
        DriverStatus::Offline,
    ] {
        assert_eq!(DriverStatus::from_str(status.as_str()).unwrap(), status);
    }
}

#[test]
fn test_invalid_status_string() {
    assert!(DriverStatus::from_str("NAPPING").is_err());
}

#[test]
fn test_busy_iff_active_ride_exists() {
    // An active ride forces BUSY regardless of the shift toggle.
    assert_eq!(derive_status(true, true), DriverStatus::Busy);
    assert_eq!(derive_status(false, true), DriverStatus::Busy);
    assert_eq!(derive_status(true, false), DriverStatus::Available);
    assert_eq!(derive_status(false, false), DriverStatus::Offline);
}

#[test]
fn test_toggle_rejected_while_busy() {
    assert_eq!(validate_status_toggle(true), Err(DomainError::DriverBusy));
    assert!(validate_status_toggle(false).is_ok());
}
