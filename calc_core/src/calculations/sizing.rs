//! # Installation Sizing
//!
//! Entry point of the sizing engine: takes the charger schedule and the
//! calculation parameters and produces every circuit, the MSB, the supply
//! transformer and the engineering notes in one [`SizingResult`].
//!
//! Lines with zero quantity are skipped, so a zero-quantity entry gives the
//! same result as leaving it out. The function is pure; calling it twice with
//! the same inputs gives equal results.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::calculations::size_installation;
//! use calc_core::charger::ChargerSpec;
//! use calc_core::params::CalculationParameters;
//! use calc_core::standards::AS_NZS_TABLES;
//!
//! let chargers = [ChargerSpec::ac(22.0, 4), ChargerSpec::dc(150.0, 2)];
//! let result = size_installation(&chargers, &CalculationParameters::default(), &AS_NZS_TABLES);
//! assert_eq!(result.circuits.len(), 2);
//! assert!(result.msb.main_breaker.is_standard());
//! ```

use serde::{Deserialize, Serialize};

use super::circuit::{size_circuit, CircuitResult};
use super::msb::{size_msb, size_transformer, MsbResult, TransformerResult};
use crate::charger::ChargerSpec;
use crate::equations::StandardReference;
use crate::params::CalculationParameters;
use crate::standards::StandardTables;

/// One line of the technical notes printed under the results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeringNote {
    /// Short heading, e.g. "Safety Factor"
    pub topic: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<StandardReference>,
}

impl EngineeringNote {
    fn new(topic: &str, text: String, reference: Option<StandardReference>) -> Self {
        Self {
            topic: topic.to_string(),
            text,
            reference,
        }
    }
}

impl std::fmt::Display for EngineeringNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.topic, self.text)?;
        if let Some(reference) = self.reference {
            write!(f, " ({})", reference)?;
        }
        Ok(())
    }
}

/// Complete sizing of an installation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    /// Parameters the result was computed with
    pub params: CalculationParameters,

    /// Edition label of the tables used
    pub edition: String,

    /// One circuit per charger line with non-zero quantity, in schedule order
    pub circuits: Vec<CircuitResult>,

    pub msb: MsbResult,

    pub transformer: TransformerResult,

    pub notes: Vec<EngineeringNote>,
}

impl SizingResult {
    /// True when any circuit or MSB component is beyond the standard tables
    pub fn exceeds_standard_range(&self) -> bool {
        self.msb.exceeds_standard_range() || self.circuits.iter().any(CircuitResult::exceeds_standard_range)
    }

    /// Total number of charger units
    pub fn charger_count(&self) -> u32 {
        self.circuits.iter().map(|c| c.spec.quantity).sum()
    }
}

/// Size a full installation.
pub fn size_installation(
    chargers: &[ChargerSpec],
    params: &CalculationParameters,
    tables: &StandardTables,
) -> SizingResult {
    let circuits: Vec<CircuitResult> = chargers
        .iter()
        .filter(|spec| spec.quantity > 0)
        .map(|spec| size_circuit(spec, params, tables))
        .collect();

    let msb = size_msb(&circuits, params, tables);
    let transformer = size_transformer(msb.total_connected_kw, params, tables);

    tracing::debug!(
        lines = circuits.len(),
        total_connected_kw = msb.total_connected_kw,
        transformer_kva = transformer.rating_kva,
        "sized installation"
    );

    SizingResult {
        params: params.clone(),
        edition: tables.edition.clone(),
        circuits,
        msb,
        transformer,
        notes: engineering_notes(params),
    }
}

/// Technical notes describing the factors a result was computed with
pub fn engineering_notes(params: &CalculationParameters) -> Vec<EngineeringNote> {
    vec![
        EngineeringNote::new(
            "Safety Factor",
            format!("{}x for continuous loads", params.safety_factor),
            Some(StandardReference::ContinuousLoadFactor),
        ),
        EngineeringNote::new(
            "Diversity Factor",
            format!("{} applied to the MSB load", params.diversity_factor),
            Some(StandardReference::MaximumDemand),
        ),
        EngineeringNote::new(
            "DC Charger AC Input",
            format!(
                "{}% efficiency and {} power factor",
                params.dc_efficiency * 100.0,
                params.power_factor
            ),
            None,
        ),
        EngineeringNote::new(
            "System Voltages",
            format!(
                "{}V AC three-phase, {}V AC single-phase, {}V DC",
                params.ac_voltage, params.single_phase_voltage, params.dc_voltage
            ),
            None,
        ),
        EngineeringNote::new(
            "Cables",
            "Cu PVC/XLPE, reference method C, 40°C ambient".to_string(),
            Some(StandardReference::CableCurrentCapacity),
        ),
        EngineeringNote::new(
            "Protection",
            "RCD protection required for AC charger outlets".to_string(),
            Some(StandardReference::EvRcdProtection),
        ),
        EngineeringNote::new(
            "MSB",
            "Busbar rated at 1 A/mm² copper current density".to_string(),
            Some(StandardReference::SwitchgearAssemblies),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charger::SupplyPhase;
    use crate::standards::{Selection, AS_NZS_TABLES};
    use pretty_assertions::assert_eq;

    fn size(chargers: &[ChargerSpec]) -> SizingResult {
        size_installation(chargers, &CalculationParameters::default(), &AS_NZS_TABLES)
    }

    #[test]
    fn test_deterministic() {
        let chargers = [ChargerSpec::ac(7.0, 6), ChargerSpec::dc(150.0, 2)];
        assert_eq!(size(&chargers), size(&chargers));
    }

    #[test]
    fn test_zero_quantity_equals_omission() {
        let with_zero = [ChargerSpec::ac(22.0, 2), ChargerSpec::dc(350.0, 0)];
        let without = [ChargerSpec::ac(22.0, 2)];
        assert_eq!(size(&with_zero), size(&without));
    }

    #[test]
    fn test_empty_schedule() {
        let result = size(&[]);
        assert!(result.circuits.is_empty());
        assert_eq!(result.msb.total_connected_kw, 0.0);
        assert_eq!(result.msb.main_breaker, Selection::NoLoad);
        assert_eq!(result.msb.configuration, Selection::NoLoad);
        assert_eq!(result.msb.incomer_cable, Selection::NoLoad);
        assert_eq!(result.transformer.rating_kva, 0.0);
        assert!(result.transformer.is_no_load());
        assert!(!result.exceeds_standard_range());
        assert_eq!(result.charger_count(), 0);
    }

    #[test]
    fn test_single_phase_reference_case() {
        // Default AC supply, SF 1.25, pf 0.95
        let result = size(&[ChargerSpec::ac(22.0, 1)]);
        let circuit = &result.circuits[0];
        assert_eq!(circuit.phase, SupplyPhase::Single);
        assert!((circuit.design_current_a - 125.9).abs() < 0.05);
        assert_eq!(circuit.breaker_a(), Some(160));
    }

    #[test]
    fn test_500kw_dc_exceeds_standard_range() {
        let result = size(&[ChargerSpec::dc(500.0, 1)]);
        let circuit = &result.circuits[0];
        assert!(circuit.breaker.is_exceeded());
        assert_eq!(circuit.breaker_a(), None);
        assert!(circuit.cable.is_exceeded());
        assert!(result.exceeds_standard_range());
    }

    /// Breaker or cable capacity of the first circuit; exceeded sorts above every standard size
    fn capacities(result: &SizingResult) -> (f64, f64) {
        let circuit = &result.circuits[0];
        let breaker = circuit.breaker_a().map(f64::from).unwrap_or(f64::INFINITY);
        let cable = circuit.cable.standard().map(|c| c.ampacity_a).unwrap_or(f64::INFINITY);
        (breaker, cable)
    }

    fn assert_monotonic_in_power(charger: impl Fn(f64) -> ChargerSpec, max_kw: f64) {
        let mut previous: Option<SizingResult> = None;
        let mut power = 0.5;
        while power <= max_kw {
            let result = size(&[charger(power), ChargerSpec::ac(7.0, 2)]);
            if let Some(prev) = &previous {
                let label = charger(power).label();
                let (breaker, cable) = capacities(&result);
                let (prev_breaker, prev_cable) = capacities(prev);
                assert!(breaker >= prev_breaker, "breaker dropped at {}", label);
                assert!(cable >= prev_cable, "cable dropped at {}", label);
                assert!(result.msb.diversified_current_a >= prev.msb.diversified_current_a);
                assert!(result.transformer.rating_kva >= prev.transformer.rating_kva);
                if let (Some(now), Some(before)) = (result.msb.main_breaker_a(), prev.msb.main_breaker_a()) {
                    assert!(now >= before);
                }
            }
            previous = Some(result);
            power += 0.5;
        }
    }

    #[test]
    fn test_monotonic_in_ac_power() {
        // Crosses the old 7.4 kW single-phase limit and the 22 kW example
        assert_monotonic_in_power(|kw| ChargerSpec::ac(kw, 1), 150.0);
        assert_monotonic_in_power(|kw| ChargerSpec::ac(kw, 1).with_phase(SupplyPhase::Three), 150.0);
    }

    #[test]
    fn test_monotonic_in_dc_power() {
        assert_monotonic_in_power(|kw| ChargerSpec::dc(kw, 2), 400.0);
    }

    #[test]
    fn test_counts_and_edition() {
        let result = size(&[ChargerSpec::ac(7.0, 3), ChargerSpec::dc(50.0, 2)]);
        assert_eq!(result.charger_count(), 5);
        assert_eq!(result.msb.total_connected_kw, 121.0);
        assert_eq!(result.edition, AS_NZS_TABLES.edition);
    }

    #[test]
    fn test_notes_follow_params() {
        let params = CalculationParameters {
            diversity_factor: 0.8,
            ..Default::default()
        };
        let notes = engineering_notes(&params);
        assert_eq!(notes[1].to_string(), "Diversity Factor: 0.8 applied to the MSB load (AS/NZS 3000:2018 Clause 2.2)");
        assert_eq!(notes[0].reference, Some(StandardReference::ContinuousLoadFactor));
    }

    #[test]
    fn test_result_serializes() {
        let result = size(&[ChargerSpec::dc(500.0, 1)]);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["circuits"][0]["cable"]["status"], "exceeds_standard_range");
        let back: SizingResult = serde_json::from_value(json).unwrap();
        assert_eq!(back.circuits.len(), 1);
        assert_eq!(back.msb.main_breaker, result.msb.main_breaker);
    }
}
