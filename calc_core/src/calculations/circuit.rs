//! # Charger Circuit Sizing
//!
//! Sizes the final sub-circuit of one charger line: load current, design
//! current after the continuous-load factor, protective device and cable.
//!
//! ## Method
//!
//! 1. Circuit current from the supply arrangement
//!    - single-phase AC: I = P / (V × pf)
//!    - three-phase AC: I = P / (√3 × V_LL × pf)
//!    - DC output: I = P / V_dc
//! 2. Design current I_B = I × safety factor
//! 3. Breaker I_n = smallest standard rating ≥ I_B
//! 4. Cable: smallest conductor whose ampacity I_z ≥ I_n
//!
//! A breaker is only selected when a standard cable can carry it. If the
//! selected rating is above every cable in the table, the breaker is reported
//! as exceeding the standard range too, against the largest rating the cable
//! table can still protect.
//!
//! The AC input current (what the MSB sees) equals the circuit current for AC
//! chargers; for DC chargers it is the rectifier input at the AC line voltage.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::circuit::size_circuit;
//! use calc_core::charger::{ChargerSpec, SupplyPhase};
//! use calc_core::params::CalculationParameters;
//! use calc_core::standards::AS_NZS_TABLES;
//!
//! let spec = ChargerSpec::ac(22.0, 1);
//! let result = size_circuit(&spec, &CalculationParameters::default(), &AS_NZS_TABLES);
//! assert_eq!(result.phase, SupplyPhase::Single);
//! assert_eq!(result.breaker_a(), Some(160));
//! ```

use serde::{Deserialize, Serialize};

use crate::charger::{ChargerKind, ChargerSpec, SupplyPhase};
use crate::equations::{self, StandardReference};
use crate::params::CalculationParameters;
use crate::standards::{BreakerClass, CableCores, CableEntry, Selection, StandardTables};
use crate::units::{Kilowatts, Volts};

/// Results for one charger line (per unit; multiply by `spec.quantity` for totals).
///
/// ## JSON Example
///
/// ```json
/// {
///   "spec": { "kind": "AC", "power_kw": 22.0, "quantity": 1, "phase": "Three" },
///   "phase": "Three",
///   "voltage_v": 400.0,
///   "full_load_current_a": 33.4,
///   "design_current_a": 41.8,
///   "ac_input_current_a": 33.4,
///   "design_ac_input_current_a": 41.8,
///   "breaker": { "status": "standard", "selection": 50 },
///   "cable_cores": "4C",
///   "cable": { "status": "standard", "selection": { "size_mm2": 16.0, "ampacity_a": 49.0 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitResult {
    /// The charger line this circuit feeds
    pub spec: ChargerSpec,

    /// Supply arrangement of the sub-circuit
    pub phase: SupplyPhase,

    /// Circuit voltage (V)
    pub voltage_v: f64,

    /// Circuit current at rated power (A)
    pub full_load_current_a: f64,

    /// Circuit current × safety factor (A)
    pub design_current_a: f64,

    /// Current drawn from the AC system (A)
    pub ac_input_current_a: f64,

    /// AC input current × safety factor (A)
    pub design_ac_input_current_a: f64,

    /// Protective device rating
    pub breaker: Selection<u32>,

    /// Core configuration of the sub-circuit cable
    pub cable_cores: CableCores,

    /// Sub-circuit cable
    pub cable: Selection<CableEntry>,
}

impl CircuitResult {
    /// Selected breaker rating (A)
    pub fn breaker_a(&self) -> Option<u32> {
        self.breaker.standard().copied()
    }

    /// Selected cable size (mm²)
    pub fn cable_size_mm2(&self) -> Option<f64> {
        self.cable.standard().map(|c| c.size_mm2)
    }

    /// True when any component is beyond the standard tables
    pub fn exceeds_standard_range(&self) -> bool {
        self.breaker.is_exceeded() || self.cable.is_exceeded()
    }

    /// MCB or MCCB, once a rating is selected
    pub fn breaker_class(&self) -> Option<BreakerClass> {
        self.breaker_a().map(BreakerClass::for_rating)
    }

    /// Product standard of the protective device
    pub fn breaker_reference(&self) -> StandardReference {
        match (self.spec.kind, self.breaker_class()) {
            (ChargerKind::Dc, _) | (_, Some(BreakerClass::Mccb)) => StandardReference::MouldedCaseCircuitBreakers,
            _ => StandardReference::MiniatureCircuitBreakers,
        }
    }

    /// Device description, e.g. "AS/NZS 60898, C-curve, 50A, 400V AC, 3P"
    pub fn breaker_description(&self) -> String {
        self.breaker.describe(|rating| match self.phase {
            SupplyPhase::Dc => format!(
                "{}, {}A, {}V DC",
                StandardReference::MouldedCaseCircuitBreakers.citation(),
                rating,
                self.voltage_v
            ),
            phase => format!(
                "{}, C-curve, {}A, {}V AC, {}",
                self.breaker_reference().citation(),
                rating,
                self.voltage_v,
                phase.poles()
            ),
        })
    }

    /// Cable description, e.g. "16mm² 4C PVC/XLPE Cu (49A)"
    pub fn cable_description(&self) -> String {
        self.cable.describe(|cable| {
            format!(
                "{}mm² {} PVC/XLPE Cu ({}A)",
                cable.size_mm2, self.cable_cores, cable.ampacity_a
            )
        })
    }
}

/// Size the sub-circuit for one charger line.
///
/// Pure: the result depends only on the arguments. `spec` is expected to have
/// passed [`ChargerSpec::validate`].
pub fn size_circuit(spec: &ChargerSpec, params: &CalculationParameters, tables: &StandardTables) -> CircuitResult {
    let power = Kilowatts(spec.power_kw);
    let phase = spec.supply_phase();

    let (voltage, circuit_current, ac_input_current) = match phase {
        SupplyPhase::Single => {
            let v = Volts(params.single_phase_voltage);
            let i = equations::single_phase_current(power, v, params.power_factor);
            (v, i, i)
        }
        SupplyPhase::Three => {
            let v = Volts(params.ac_voltage);
            let i = equations::three_phase_current(power, v, params.power_factor);
            (v, i, i)
        }
        SupplyPhase::Dc => {
            let v = Volts(params.dc_voltage);
            let i = equations::dc_current(power, v);
            let input = equations::dc_charger_ac_input_current(
                power,
                params.dc_efficiency,
                params.power_factor,
                Volts(params.ac_voltage),
            );
            (v, i, input)
        }
    };

    let design_current = equations::apply_factor(circuit_current, params.safety_factor);
    let design_ac_input = equations::apply_factor(ac_input_current, params.safety_factor);

    let cable_cores = phase.cable_cores();
    let (breaker, cable) = select_protection(tables, cable_cores, design_current.value());

    tracing::debug!(
        charger = %spec.label(),
        phase = phase.display_name(),
        design_current_a = design_current.value(),
        breaker = ?breaker.standard(),
        "sized charger circuit"
    );
    if breaker.is_exceeded() || cable.is_exceeded() {
        tracing::warn!(
            charger = %spec.label(),
            design_current_a = design_current.value(),
            "charger circuit exceeds standard range"
        );
    }

    CircuitResult {
        spec: spec.clone(),
        phase,
        voltage_v: voltage.value(),
        full_load_current_a: circuit_current.value(),
        design_current_a: design_current.value(),
        ac_input_current_a: ac_input_current.value(),
        design_ac_input_current_a: design_ac_input.value(),
        breaker,
        cable_cores,
        cable,
    }
}

/// Breaker and cable for a design current, coordinated so the cable covers
/// the breaker rating.
fn select_protection(
    tables: &StandardTables,
    cores: CableCores,
    design_current_a: f64,
) -> (Selection<u32>, Selection<CableEntry>) {
    let breaker = tables.breakers.select(design_current_a);
    let Selection::Standard(rating) = breaker else {
        // No device to coordinate with: report the cable against the design current
        let cable = tables.cables.select(cores, design_current_a);
        return (breaker, cable);
    };

    let cable = tables.cables.select(cores, f64::from(rating));
    match cable {
        Selection::ExceedsStandardRange { largest_a, .. } => {
            let breaker = Selection::ExceedsStandardRange {
                required_a: design_current_a,
                largest_a: f64::from(tables.breakers.largest_at_most(largest_a)),
            };
            (breaker, cable)
        }
        _ => (breaker, cable),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standards::AS_NZS_TABLES;

    fn size(spec: ChargerSpec) -> CircuitResult {
        size_circuit(&spec, &CalculationParameters::default(), &AS_NZS_TABLES)
    }

    #[test]
    fn test_single_phase_22kw_reference_case() {
        // (22000 / (230 × 0.95)) × 1.25 = 125.86 A -> 160 A breaker
        let result = size(ChargerSpec::ac(22.0, 1));
        assert_eq!(result.phase, SupplyPhase::Single);
        assert!((result.design_current_a - 125.86).abs() < 0.01);
        assert_eq!(result.breaker_a(), Some(160));
        // 160 A on 2C: 95 mm² (189 A)
        assert_eq!(result.cable_size_mm2(), Some(95.0));
        assert_eq!(result.cable_cores, CableCores::Two);
    }

    #[test]
    fn test_three_phase_22kw() {
        // 22000 / (√3 × 400 × 0.95) = 33.43 A, × 1.25 = 41.78 A -> 50 A
        let result = size(ChargerSpec::ac(22.0, 1).with_phase(SupplyPhase::Three));
        assert_eq!(result.phase, SupplyPhase::Three);
        assert!((result.full_load_current_a - 33.43).abs() < 0.01);
        assert_eq!(result.breaker_a(), Some(50));
        // 50 A on 4C: 16 mm² is 49 A, so 25 mm² (64 A)
        assert_eq!(result.cable_size_mm2(), Some(25.0));
        assert_eq!(result.ac_input_current_a, result.full_load_current_a);
    }

    #[test]
    fn test_single_phase_7kw() {
        // 7000 / (230 × 0.95) = 32.04 A, × 1.25 = 40.05 A -> 50 A
        let result = size(ChargerSpec::ac(7.0, 1));
        assert_eq!(result.phase, SupplyPhase::Single);
        assert_eq!(result.breaker_a(), Some(50));
        // 2C: 10 mm² is 46 A, 16 mm² is 61 A
        assert_eq!(result.cable_size_mm2(), Some(16.0));
    }

    #[test]
    fn test_dc_charger_circuit_and_input() {
        // 50 kW at 500 V DC = 100 A, × 1.25 = 125 A -> 125 A exactly
        let result = size(ChargerSpec::dc(50.0, 1));
        assert_eq!(result.phase, SupplyPhase::Dc);
        assert!((result.design_current_a - 125.0).abs() < 1e-9);
        assert_eq!(result.breaker_a(), Some(125));
        // AC input: 50 / 0.9025 = 55.40 kW over √3 × 400 V = 79.97 A
        assert!((result.ac_input_current_a - 79.97).abs() < 0.01);
        assert_eq!(result.breaker_class(), Some(BreakerClass::Mccb));
        assert_eq!(result.breaker_description(), "AS/NZS 60947.2, 125A, 500V DC");
    }

    #[test]
    fn test_oversized_dc_charger_exceeds_range() {
        // 500 kW at 500 V: 1250 A design. 1600 A is in the breaker table but no
        // 2C cable carries it, so neither device is a standard selection.
        let result = size(ChargerSpec::dc(500.0, 1));
        assert!(result.exceeds_standard_range());
        assert_eq!(result.breaker_a(), None);
        assert_eq!(
            result.breaker,
            Selection::ExceedsStandardRange {
                required_a: 1250.0,
                largest_a: 630.0
            }
        );
        assert_eq!(result.breaker_class(), None);
        assert!(result.breaker_description().starts_with("exceeds standard range"));
        assert_eq!(result.cable_size_mm2(), None);
        assert!(result.cable_description().starts_with("exceeds standard range"));
    }

    #[test]
    fn test_largest_coordinated_dc_charger_is_standard() {
        // 250 kW: 625 A design -> 630 A breaker on 630 mm² 2C (674 A)
        let result = size(ChargerSpec::dc(250.0, 1));
        assert_eq!(result.breaker_a(), Some(630));
        assert_eq!(result.cable_size_mm2(), Some(630.0));
        assert!(!result.exceeds_standard_range());
    }

    #[test]
    fn test_breaker_beyond_table_reports_cable_against_design_current() {
        // 1200 kW DC: 3000 A design, above the 2000 A breaker
        let result = size(ChargerSpec::dc(1200.0, 1));
        assert!(result.breaker.is_exceeded());
        assert_eq!(
            result.cable,
            Selection::ExceedsStandardRange {
                required_a: result.design_current_a,
                largest_a: 674.0
            }
        );
    }

    #[test]
    fn test_ac_breaker_description() {
        let result = size(ChargerSpec::ac(22.0, 1).with_phase(SupplyPhase::Three));
        assert_eq!(result.breaker_description(), "AS/NZS 60898, C-curve, 50A, 400V AC, 3P");
        assert_eq!(result.cable_description(), "25mm² 4C PVC/XLPE Cu (64A)");

        let result = size(ChargerSpec::ac(7.0, 1));
        assert_eq!(result.breaker_description(), "AS/NZS 60898, C-curve, 50A, 230V AC, 1P");
        assert_eq!(result.cable_description(), "16mm² 2C PVC/XLPE Cu (61A)");
    }

    #[test]
    fn test_ceiling_property_over_power_sweep() {
        let tables = &*AS_NZS_TABLES;
        let params = CalculationParameters::default();
        let mut power = 1.0;
        while power <= 400.0 {
            for spec in [
                ChargerSpec::ac(power, 1),
                ChargerSpec::ac(power, 1).with_phase(SupplyPhase::Three),
                ChargerSpec::dc(power, 1),
            ] {
                let result = size_circuit(&spec, &params, tables);
                let Some(rating) = result.breaker_a() else {
                    assert!(result.exceeds_standard_range(), "{}", spec.label());
                    continue;
                };
                assert!(f64::from(rating) >= result.design_current_a);
                // The next smaller rating would not suffice
                if let Some(smaller) = tables.breakers.ratings_a.iter().rev().find(|&&r| r < rating) {
                    assert!(f64::from(*smaller) < result.design_current_a);
                }

                // A standard breaker always comes with a standard cable
                let cable = result.cable.standard().copied();
                let Some(cable) = cable else {
                    panic!("{}: {}A breaker without a cable", spec.label(), rating);
                };
                assert!(cable.ampacity_a >= f64::from(rating));
                let entries = tables.cables.entries(result.cable_cores);
                if let Some(smaller) = entries.iter().rev().find(|e| e.size_mm2 < cable.size_mm2) {
                    assert!(smaller.ampacity_a < f64::from(rating), "{}", spec.label());
                }
            }
            power += 2.5;
        }
    }
}
