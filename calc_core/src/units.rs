//! # Unit Types
//!
//! Type-safe wrappers for the electrical quantities used in sizing. They are
//! plain `f64` newtypes so JSON stays clean (just numbers) while the equation
//! signatures say what they take.
//!
//! ## SI Units
//!
//! - Power: watts (W), kilowatts (kW)
//! - Apparent power: kilovolt-amperes (kVA)
//! - Voltage: volts (V)
//! - Current: amperes (A)
//!
//! ## Example
//!
//! ```rust
//! use calc_core::units::{Kilowatts, Watts};
//!
//! let rated = Kilowatts(22.0);
//! let watts: Watts = rated.into();
//! assert_eq!(watts.0, 22_000.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

// ============================================================================
// Power Units
// ============================================================================

/// Real power in watts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Watts(pub f64);

/// Real power in kilowatts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kilowatts(pub f64);

/// Apparent power in kilovolt-amperes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Kva(pub f64);

impl From<Kilowatts> for Watts {
    fn from(kw: Kilowatts) -> Self {
        Watts(kw.0 * 1000.0)
    }
}

impl From<Watts> for Kilowatts {
    fn from(w: Watts) -> Self {
        Kilowatts(w.0 / 1000.0)
    }
}

impl Kilowatts {
    /// Apparent power S = P / pf
    pub fn to_kva(self, power_factor: f64) -> Kva {
        Kva(self.0 / power_factor)
    }
}

// ============================================================================
// Voltage / Current
// ============================================================================

/// Electric potential in volts
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volts(pub f64);

/// Electric current in amperes
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amps(pub f64);

// ============================================================================
// Arithmetic Implementations (macro to reduce boilerplate)
// ============================================================================

macro_rules! impl_arithmetic {
    ($type:ty) => {
        impl Add for $type {
            type Output = Self;
            fn add(self, rhs: Self) -> Self::Output {
                Self(self.0 + rhs.0)
            }
        }

        impl Sub for $type {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self::Output {
                Self(self.0 - rhs.0)
            }
        }

        impl Mul<f64> for $type {
            type Output = Self;
            fn mul(self, rhs: f64) -> Self::Output {
                Self(self.0 * rhs)
            }
        }

        impl Div<f64> for $type {
            type Output = Self;
            fn div(self, rhs: f64) -> Self::Output {
                Self(self.0 / rhs)
            }
        }

        impl $type {
            /// Get the raw f64 value
            pub fn value(self) -> f64 {
                self.0
            }

            /// Create from raw f64 value
            pub fn new(value: f64) -> Self {
                Self(value)
            }
        }
    };
}

impl_arithmetic!(Watts);
impl_arithmetic!(Kilowatts);
impl_arithmetic!(Kva);
impl_arithmetic!(Volts);
impl_arithmetic!(Amps);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kilowatts_to_watts() {
        let w: Watts = Kilowatts(7.0).into();
        assert_eq!(w.0, 7000.0);
        let back: Kilowatts = w.into();
        assert_eq!(back.0, 7.0);
    }

    #[test]
    fn test_apparent_power() {
        let kva = Kilowatts(95.0).to_kva(0.95);
        assert!((kva.0 - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_arithmetic() {
        let a = Amps(10.0);
        let b = Amps(5.0);
        assert_eq!((a + b).0, 15.0);
        assert_eq!((a - b).0, 5.0);
        assert_eq!((a * 1.25).0, 12.5);
        assert_eq!((a / 2.0).0, 5.0);
    }

    #[test]
    fn test_serialization() {
        let amps = Amps(126.5);
        let json = serde_json::to_string(&amps).unwrap();
        assert_eq!(json, "126.5");

        let roundtrip: Amps = serde_json::from_str(&json).unwrap();
        assert_eq!(amps, roundtrip);
    }
}
