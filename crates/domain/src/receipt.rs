// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Informational fare breakdown for concluded rides.
//!
//! The three components are sub-totals of the already-fixed fare, not
//! additive charges: the shares sum to 1.00, so base + tax + service fee
//! reproduces the fare up to paise rounding. Nothing here prices a ride.

use crate::fare::round_to_paise;
use serde::Serialize;

/// Share of the fare attributed to the base charge.
const BASE_SHARE: f64 = 0.80;
/// Share of the fare attributed to tax.
const TAX_SHARE: f64 = 0.18;
/// Share of the fare attributed to the service fee.
const SERVICE_FEE_SHARE: f64 = 0.02;

/// A derived fare breakdown, computed on demand and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Receipt {
    /// Base charge component.
    pub base: f64,
    /// Tax component.
    pub tax: f64,
    /// Service fee component.
    pub service_fee: f64,
    /// The fare itself.
    pub total: f64,
}

impl Receipt {
    /// Decomposes a fixed fare into its display components, each rounded
    /// to whole paise.
    #[must_use]
    pub fn from_fare(fare: f64) -> Self {
        Self {
            base: round_to_paise(fare * BASE_SHARE),
            tax: round_to_paise(fare * TAX_SHARE),
            service_fee: round_to_paise(fare * SERVICE_FEE_SHARE),
            total: round_to_paise(fare),
        }
    }
}
