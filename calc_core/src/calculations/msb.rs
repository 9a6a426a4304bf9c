//! # Main Switchboard and Supply Sizing
//!
//! Aggregates the charger circuits into the main switchboard (MSB) load and
//! sizes the main breaker, MSB configuration, busbar, incomer cable and
//! supply transformer.
//!
//! ## Method
//!
//! 1. Total design AC current I_T = Σ (design AC input current × quantity)
//! 2. Diversified current I_D = I_T × diversity factor (AS/NZS 3000 Cl. 2.2)
//! 3. Main breaker: smallest standard rating ≥ I_D
//! 4. MSB: first configuration with busbar rating ≥ I_D (AS/NZS 3439)
//! 5. Busbar rating: I_D rounded up to the next 100 A (copper, 1 A/mm²)
//! 6. Incomer: 4C cable size from the incomer schedule band covering I_D, in
//!    as many parallel runs as needed for the ampacity to cover I_D
//! 7. Transformer: S = Σ P / pf, rounded up to the next step, never below the
//!    site minimum (AS/NZS 60076)
//!
//! An installation with no load yields zero currents, `NoLoad` selections and
//! a zero transformer rating.

use serde::{Deserialize, Serialize};

use super::circuit::CircuitResult;
use crate::equations::round_up_to_step;
use crate::params::CalculationParameters;
use crate::standards::{IncomerCable, MsbConfig, Selection, StandardTables};
use crate::units::Kilowatts;

/// Busbar ratings are rounded up to this step (A)
pub const BUSBAR_STEP_A: f64 = 100.0;

/// Aggregate MSB results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MsbResult {
    /// Σ rated power × quantity (kW)
    pub total_connected_kw: f64,

    /// Σ design AC input current × quantity (A)
    pub total_design_ac_current_a: f64,

    /// Diversity factor applied
    pub diversity_factor: f64,

    /// Total × diversity (A)
    pub diversified_current_a: f64,

    /// MSB main breaker
    pub main_breaker: Selection<u32>,

    /// Prefabricated switchboard configuration
    pub configuration: Selection<MsbConfig>,

    /// Busbar rating, diversified current rounded up to 100 A (A)
    pub busbar_rating_a: f64,

    /// Incomer cable (4C) from the transformer
    pub incomer_cable: Selection<IncomerCable>,
}

impl MsbResult {
    /// True when nothing is connected
    pub fn is_no_load(&self) -> bool {
        self.configuration.is_no_load()
    }

    /// True when any MSB component is beyond the standard tables
    pub fn exceeds_standard_range(&self) -> bool {
        self.main_breaker.is_exceeded() || self.configuration.is_exceeded() || self.incomer_cable.is_exceeded()
    }

    /// Selected main breaker rating (A)
    pub fn main_breaker_a(&self) -> Option<u32> {
        self.main_breaker.standard().copied()
    }

    /// Description of the selected configuration
    pub fn configuration_description(&self) -> String {
        self.configuration
            .describe(|c| format!("{} ({} mm, {}A busbar)", c.designation(), c.dimensions_mm, c.busbar_a))
    }

    pub fn incomer_description(&self) -> String {
        self.incomer_cable.describe(IncomerCable::description)
    }
}

/// Supply transformer sizing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformerResult {
    /// Apparent power of the connected load (kVA)
    pub apparent_power_kva: f64,

    /// Recommended rating (kVA), 0 when nothing is connected
    pub rating_kva: f64,

    /// Nameplate voltage ratio, e.g. "11kV/415V ±5%"
    pub voltage_ratio: String,

    /// Percentage impedance
    pub impedance_percent: f64,

    /// Winding vector group
    pub vector_group: String,
}

impl TransformerResult {
    pub fn is_no_load(&self) -> bool {
        self.rating_kva == 0.0
    }

    /// e.g. "500 kVA, 11kV/415V ±5%, 6% impedance, Dyn11"
    pub fn description(&self) -> String {
        if self.is_no_load() {
            return "no load".to_string();
        }
        format!(
            "{} kVA, {}, {}% impedance, {}",
            self.rating_kva, self.voltage_ratio, self.impedance_percent, self.vector_group
        )
    }
}

/// Aggregate charger circuits into the MSB load.
pub fn size_msb(circuits: &[CircuitResult], params: &CalculationParameters, tables: &StandardTables) -> MsbResult {
    let total_connected_kw: f64 = circuits.iter().map(|c| c.spec.connected_kw()).sum();
    let total_design_ac_current_a: f64 = circuits
        .iter()
        .map(|c| c.design_ac_input_current_a * f64::from(c.spec.quantity))
        .sum();
    let diversified_current_a = total_design_ac_current_a * params.diversity_factor;

    let main_breaker = tables.breakers.select(diversified_current_a);
    let configuration = tables.select_msb(diversified_current_a);
    let incomer_cable = tables.select_incomer(diversified_current_a);
    let busbar_rating_a = round_up_to_step(diversified_current_a, BUSBAR_STEP_A);

    tracing::debug!(
        total_connected_kw,
        total_design_ac_current_a,
        diversified_current_a,
        main_breaker = ?main_breaker.standard(),
        "sized main switchboard"
    );
    if main_breaker.is_exceeded() || configuration.is_exceeded() || incomer_cable.is_exceeded() {
        tracing::warn!(diversified_current_a, "main switchboard load exceeds standard range");
    }

    MsbResult {
        total_connected_kw,
        total_design_ac_current_a,
        diversity_factor: params.diversity_factor,
        diversified_current_a,
        main_breaker,
        configuration,
        busbar_rating_a,
        incomer_cable,
    }
}

/// Size the supply transformer for the connected load.
pub fn size_transformer(total_connected_kw: f64, params: &CalculationParameters, tables: &StandardTables) -> TransformerResult {
    let rules = &tables.transformer;
    let apparent_power = Kilowatts(total_connected_kw).to_kva(params.power_factor);
    let rating_kva = if total_connected_kw > 0.0 {
        round_up_to_step(apparent_power.value(), rules.step_kva).max(rules.minimum_kva)
    } else {
        0.0
    };

    TransformerResult {
        apparent_power_kva: apparent_power.value(),
        rating_kva,
        voltage_ratio: rules.voltage_ratio(),
        impedance_percent: rules.impedance_percent,
        vector_group: rules.vector_group.clone(),
    }
}
