// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fare estimation.
//!
//! An estimate is advisory and never blocks the session: any failure at
//! all collapses to [`FareEstimate::Unavailable`]. The booking path is
//! the gate that refuses to proceed without a priced estimate.

use crate::backend::RideBackend;
use crate::wire;
use tracing::debug;

/// Result of a fare estimate request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FareEstimate {
    /// No usable estimate could be produced.
    Unavailable,
    /// A positive fare amount.
    Priced(f64),
}

impl FareEstimate {
    /// Whether a priced amount is present.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Priced(_))
    }

    /// The priced amount, if any.
    #[must_use]
    pub const fn amount(&self) -> Option<f64> {
        match self {
            Self::Priced(amount) => Some(*amount),
            Self::Unavailable => None,
        }
    }
}

/// Produces advisory fare estimates for candidate routes.
pub struct FareEstimator<B> {
    backend: B,
}

impl<B: RideBackend> FareEstimator<B> {
    /// Creates an estimator over the given backend.
    pub const fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Estimates the fare for a candidate route.
    ///
    /// Infallible by design: an incomplete route, an equal source and
    /// destination, a backend failure, or a non-positive amount all yield
    /// [`FareEstimate::Unavailable`].
    pub async fn estimate(&self, source: &str, destination: &str) -> FareEstimate {
        let source = source.trim();
        let destination = destination.trim();
        if source.is_empty() || destination.is_empty() {
            return FareEstimate::Unavailable;
        }
        if source.eq_ignore_ascii_case(destination) {
            return FareEstimate::Unavailable;
        }

        let payload = match self.backend.fare_estimate(source, destination).await {
            Ok(payload) => payload,
            Err(err) => {
                debug!("Fare estimate unavailable: {err}");
                return FareEstimate::Unavailable;
            }
        };
        match wire::decode::<f64>(payload) {
            Ok(fare) if fare > 0.0 => FareEstimate::Priced(fare),
            Ok(_) => FareEstimate::Unavailable,
            Err(err) => {
                debug!("Fare estimate unavailable: {err}");
                FareEstimate::Unavailable
            }
        }
    }
}
