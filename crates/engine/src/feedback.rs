// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Feedback submission for concluded rides.

use crate::backend::{RatingSubmission, RideBackend};
use crate::error::EngineError;
use cabride_domain::validate_rating;
use tracing::info;

/// Submits a rating for a concluded ride.
///
/// The score bound is checked locally before anything reaches the wire;
/// authorization and terminal-status checks remain with the backend.
///
/// # Errors
///
/// Returns `EngineError::Validation` for an out-of-range score and the
/// mapped backend error when the backend rejects the submission.
pub async fn submit_rating<B: RideBackend>(
    backend: &B,
    submission: &RatingSubmission,
) -> Result<(), EngineError> {
    validate_rating(submission.score).map_err(|err| EngineError::Validation {
        field: "score".to_string(),
        message: err.to_string(),
    })?;

    backend
        .submit_rating(submission)
        .await
        .map_err(|err| EngineError::from_backend(err, "rating"))?;
    info!(
        "Rating {} recorded for ride {}",
        submission.score, submission.ride_id
    );
    Ok(())
}
