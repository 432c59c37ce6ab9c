// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Field-level validation rules.
//!
//! These run both client-side (before a request leaves the engine) and
//! server-side (the backend does not trust the client).

use crate::error::DomainError;
use crate::fare::normalize_location;

/// Validates a route and returns both endpoints in canonical spelling.
///
/// # Errors
///
/// Returns an error if either endpoint is empty or unknown, or if the
/// endpoints name the same location.
pub fn validate_route(source: &str, destination: &str) -> Result<(String, String), DomainError> {
    if source.trim().is_empty() {
        return Err(DomainError::EmptyLocation { field: "source" });
    }
    if destination.trim().is_empty() {
        return Err(DomainError::EmptyLocation {
            field: "destination",
        });
    }

    let src: String = normalize_location(source)?;
    let dest: String = normalize_location(destination)?;

    if src == dest {
        return Err(DomainError::SameSourceAndDestination);
    }

    Ok((src, dest))
}

/// Validates a feedback score.
///
/// # Errors
///
/// Returns an error unless the score is between 1 and 5 inclusive.
pub fn validate_rating(score: u8) -> Result<(), DomainError> {
    if !(1..=5).contains(&score) {
        return Err(DomainError::InvalidRating { score });
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.len() < 3 || trimmed.len() > 30 {
        return Err(DomainError::InvalidName(
            "name should be between 3 and 30 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), DomainError> {
    let trimmed: &str = email.trim();
    let valid: bool = trimmed
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if valid {
        Ok(())
    } else {
        Err(DomainError::InvalidEmail(trimmed.to_string()))
    }
}

fn validate_phone(phone: &str) -> Result<(), DomainError> {
    let trimmed: &str = phone.trim();
    if trimmed.len() != 10 || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(DomainError::InvalidPhone(
            "provide a valid 10-digit phone number".to_string(),
        ));
    }
    Ok(())
}

/// Validates rider registration fields.
///
/// # Errors
///
/// Returns the first field violation found.
pub fn validate_rider_registration(
    name: &str,
    email: &str,
    phone: &str,
) -> Result<(), DomainError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_phone(phone)?;
    Ok(())
}

/// Validates driver registration fields.
///
/// # Errors
///
/// Returns the first field violation found.
pub fn validate_driver_registration(
    name: &str,
    email: &str,
    phone: &str,
    license_number: &str,
) -> Result<(), DomainError> {
    validate_name(name)?;
    validate_email(email)?;
    validate_phone(phone)?;
    if license_number.trim().len() < 5 {
        return Err(DomainError::InvalidLicense(
            "invalid license number format".to_string(),
        ));
    }
    Ok(())
}
