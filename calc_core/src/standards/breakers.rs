//! Standard Circuit Breaker Ratings
//!
//! Preferred rated currents (In) for MCBs (AS/NZS 60898) and MCCBs
//! (AS/NZS 60947.2). Large DC chargers push circuits into the MCCB range,
//! so the table runs up to 2000 A.

use serde::{Deserialize, Serialize};

use super::{select_ceiling, validate_ascending, Selection};
use crate::equations::StandardReference;
use crate::errors::CalcResult;

/// Standard breaker ratings (A), ascending
pub const AS_NZS_BREAKER_RATINGS_A: [u32; 24] = [
    6, 10, 16, 20, 25, 32, 40, 50, 63, 80, 100, 125, 160, 200,
    250, 315, 400, 500, 630, 800, 1000, 1200, 1600, 2000,
];

/// Largest rating still supplied as a miniature circuit breaker
pub const MCB_MAX_RATING_A: u32 = 100;

/// Ordered breaker rating table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BreakerTable {
    /// Rated currents in amperes, strictly ascending
    pub ratings_a: Vec<u32>,
}

impl Default for BreakerTable {
    fn default() -> Self {
        Self::as_nzs()
    }
}

impl BreakerTable {
    /// The AS/NZS preferred ratings
    pub fn as_nzs() -> Self {
        BreakerTable {
            ratings_a: AS_NZS_BREAKER_RATINGS_A.to_vec(),
        }
    }

    /// Check the table is non-empty and strictly ascending
    pub fn validate(&self) -> CalcResult<()> {
        validate_ascending("breakers", self.ratings_a.iter().map(|&r| f64::from(r)))
    }

    /// Smallest rating ≥ `required_a`
    pub fn select(&self, required_a: f64) -> Selection<u32> {
        select_ceiling(&self.ratings_a, |&r| f64::from(r), required_a)
    }

    /// Largest rating not above `limit_a`, 0 when every rating is above it
    pub fn largest_at_most(&self, limit_a: f64) -> u32 {
        self.ratings_a
            .iter()
            .rev()
            .copied()
            .find(|&r| f64::from(r) <= limit_a)
            .unwrap_or(0)
    }
}

/// Construction class of a protective device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakerClass {
    /// Miniature circuit breaker
    #[serde(rename = "MCB")]
    Mcb,
    /// Moulded case circuit breaker
    #[serde(rename = "MCCB")]
    Mccb,
}

impl BreakerClass {
    /// Device class for a rated current
    pub fn for_rating(rating_a: u32) -> Self {
        if rating_a > MCB_MAX_RATING_A {
            BreakerClass::Mccb
        } else {
            BreakerClass::Mcb
        }
    }

    /// Abbreviation used on drawings
    pub fn code(&self) -> &'static str {
        match self {
            BreakerClass::Mcb => "MCB",
            BreakerClass::Mccb => "MCCB",
        }
    }

    /// Product standard the device is built to
    pub fn reference(&self) -> StandardReference {
        match self {
            BreakerClass::Mcb => StandardReference::MiniatureCircuitBreakers,
            BreakerClass::Mccb => StandardReference::MouldedCaseCircuitBreakers,
        }
    }
}
