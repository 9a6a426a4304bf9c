//! # Load Current Formulas
//!
//! Current drawn by a charger at its rated power, for each supply arrangement.
//!
//! ## Notation
//!
//! - `P` = Rated real power (kW)
//! - `V` = Supply voltage (phase-to-neutral for single-phase, line-to-line for three-phase)
//! - `pf` = Power factor
//! - `η` = Conversion efficiency (DC chargers)
//! - `I` = Line current (A)
//!
//! ## References
//!
//! - AS/NZS 3000:2018 Clause 2.5.7.2 (continuous load factor)
//! - AS/NZS 3008.1.1:2017 (current-carrying capacity)

use crate::units::{Amps, Kilowatts, Volts, Watts};

/// √3, the line-to-phase ratio of a balanced three-phase system
pub const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Single-phase AC line current.
///
/// # Formula
/// - I = P / (V × pf)
#[inline]
pub fn single_phase_current(power: Kilowatts, voltage: Volts, power_factor: f64) -> Amps {
    let watts: Watts = power.into();
    Amps(watts.0 / (voltage.0 * power_factor))
}

/// Balanced three-phase AC line current.
///
/// # Formula
/// - I = P / (√3 × V_LL × pf)
#[inline]
pub fn three_phase_current(power: Kilowatts, line_voltage: Volts, power_factor: f64) -> Amps {
    let watts: Watts = power.into();
    Amps(watts.0 / (SQRT_3 * line_voltage.0 * power_factor))
}

/// DC output current of a DC charger.
///
/// # Formula
/// - I = P / V_dc
#[inline]
pub fn dc_current(power: Kilowatts, dc_voltage: Volts) -> Amps {
    let watts: Watts = power.into();
    Amps(watts.0 / dc_voltage.0)
}

/// Three-phase AC input current of a DC charger.
///
/// The rectifier draws more than its rated output: the input real power is
/// `P / η`, and the input current is further inflated by the power factor.
///
/// # Formula
/// - P_in = P / (η × pf)
/// - I = P_in / (√3 × V_LL)
#[inline]
pub fn dc_charger_ac_input_current(
    power: Kilowatts,
    efficiency: f64,
    power_factor: f64,
    line_voltage: Volts,
) -> Amps {
    let input_kw = Kilowatts(power.0 / (efficiency * power_factor));
    three_phase_current(input_kw, line_voltage, 1.0)
}

/// Apply a multiplicative factor (safety or diversity) to a current.
#[inline]
pub fn apply_factor(current: Amps, factor: f64) -> Amps {
    current * factor
}

/// Round a value up to the next multiple of `step`.
///
/// Zero stays zero; a value already on a step boundary is unchanged.
#[inline]
pub fn round_up_to_step(value: f64, step: f64) -> f64 {
    (value / step).ceil() * step
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-6;

    #[test]
    fn test_single_phase_current() {
        // 22 kW / (230 V × 0.95) = 100.686 A
        let i = single_phase_current(Kilowatts(22.0), Volts(230.0), 0.95);
        assert!((i.0 - 100.686).abs() < 0.001);
    }

    #[test]
    fn test_three_phase_current_unity_pf() {
        // 22 kW / (√3 × 400 V) = 31.754 A
        let i = three_phase_current(Kilowatts(22.0), Volts(400.0), 1.0);
        assert!((i.0 - 31.754).abs() < 0.001);
    }

    #[test]
    fn test_dc_current() {
        let i = dc_current(Kilowatts(50.0), Volts(500.0));
        assert!((i.0 - 100.0).abs() < EPSILON);
    }

    #[test]
    fn test_dc_input_current_matches_reference() {
        // 100 kW DC at 95% / 0.95 pf ≈ 160 A AC input at 400 V
        let i = dc_charger_ac_input_current(Kilowatts(100.0), 0.95, 0.95, Volts(400.0));
        assert!((i.0 - 159.93).abs() < 0.01);
    }

    #[test]
    fn test_round_up_to_step() {
        assert_eq!(round_up_to_step(0.0, 100.0), 0.0);
        assert_eq!(round_up_to_step(100.0, 100.0), 100.0);
        assert_eq!(round_up_to_step(100.1, 100.0), 200.0);
        assert_eq!(round_up_to_step(499.0, 100.0), 500.0);
    }
}
