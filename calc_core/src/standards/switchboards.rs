//! Main Switchboard, Incomer and Transformer Data
//!
//! Common Australian main switchboard (MSB) configurations to AS/NZS 3439,
//! the incomer cable schedule from the supply transformer, and the
//! distribution transformer sizing rules (AS/NZS 60076).

use serde::{Deserialize, Serialize};

use super::{select_ceiling, validate_ascending, CableEntry, Selection};
use crate::errors::{CalcError, CalcResult};

/// One prefabricated MSB configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MsbConfig {
    /// Nominal switchboard rating (A)
    pub rating_a: u32,
    /// Enclosure dimensions, H x W x D (mm)
    pub dimensions_mm: String,
    /// Busbar rating (A)
    pub busbar_a: u32,
}

impl MsbConfig {
    pub fn new(rating_a: u32, dimensions_mm: impl Into<String>, busbar_a: u32) -> Self {
        Self {
            rating_a,
            dimensions_mm: dimensions_mm.into(),
            busbar_a,
        }
    }

    /// Designation used in schedules, e.g. "400A Main Switchboard"
    pub fn designation(&self) -> String {
        format!("{}A Main Switchboard", self.rating_a)
    }
}

/// AS/NZS 3439 configurations, ascending by busbar rating
pub fn as_nzs_msb_configs() -> Vec<MsbConfig> {
    vec![
        MsbConfig::new(100, "300x200x150", 100),
        MsbConfig::new(200, "400x250x200", 200),
        MsbConfig::new(400, "600x300x250", 400),
        MsbConfig::new(600, "800x400x300", 600),
        MsbConfig::new(800, "1000x500x350", 800),
        MsbConfig::new(1000, "1200x600x400", 1000),
        MsbConfig::new(1200, "1500x700x450", 1200),
        MsbConfig::new(1600, "1800x800x500", 1600),
        MsbConfig::new(2000, "2000x1000x600", 2000),
        MsbConfig::new(2500, "2200x1200x700", 2500),
        MsbConfig::new(3000, "2500x1500x800", 3000),
    ]
}

/// Smallest configuration whose busbar rating covers `required_a`
pub fn select_msb(configs: &[MsbConfig], required_a: f64) -> Selection<MsbConfig> {
    select_ceiling(configs, |c| f64::from(c.busbar_a), required_a)
}

pub(crate) fn validate_msb_configs(configs: &[MsbConfig]) -> CalcResult<()> {
    validate_ascending("switchboards", configs.iter().map(|c| f64::from(c.busbar_a)))
}

/// One band of the incomer cable schedule.
///
/// The incomer is a 4C copper PVC/SWA/PVC cable; currents above
/// `max_current_a` of the previous band and up to this band's limit use
/// `size_mm2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncomerBand {
    /// Upper limit of the band (A, inclusive)
    pub max_current_a: f64,
    /// Conductor size for the band (mm²)
    pub size_mm2: f64,
}

impl IncomerBand {
    pub const fn new(max_current_a: f64, size_mm2: f64) -> Self {
        Self { max_current_a, size_mm2 }
    }
}

/// Incomer schedule, transformer to MSB
pub fn as_nzs_incomer_schedule() -> Vec<IncomerBand> {
    vec![
        IncomerBand::new(250.0, 120.0),
        IncomerBand::new(400.0, 185.0),
        IncomerBand::new(600.0, 300.0),
        IncomerBand::new(800.0, 400.0),
        IncomerBand::new(3000.0, 500.0),
    ]
}

/// Band covering `current_a`
pub fn select_incomer(schedule: &[IncomerBand], current_a: f64) -> Selection<IncomerBand> {
    select_ceiling(schedule, |b| b.max_current_a, current_a)
}

pub(crate) fn validate_incomer_schedule(schedule: &[IncomerBand], four_core: &[CableEntry]) -> CalcResult<()> {
    validate_ascending("incomer_cables", schedule.iter().map(|b| b.max_current_a))?;
    validate_ascending("incomer_cables", schedule.iter().map(|b| b.size_mm2))?;
    match schedule
        .iter()
        .find(|b| !four_core.iter().any(|e| e.size_mm2 == b.size_mm2))
    {
        Some(band) => Err(CalcError::invalid_table(
            "incomer_cables",
            format!("{}mm² is not in the 4C cable table", band.size_mm2),
        )),
        None => Ok(()),
    }
}

/// Incomer cable for a load: the schedule size, run in parallel until the
/// combined 4C ampacity covers the load.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomerCable {
    /// Conductor size from the schedule (mm²)
    pub size_mm2: f64,
    /// Parallel 4C runs
    pub runs: u32,
    /// 4C ampacity of one run (A)
    pub ampacity_per_run_a: f64,
}

impl IncomerCable {
    /// Fewest runs of `size_mm2` carrying `current_a`, at least one.
    /// `ampacity_per_run_a` must be positive.
    pub fn for_load(size_mm2: f64, ampacity_per_run_a: f64, current_a: f64) -> Self {
        let runs = (current_a / ampacity_per_run_a).ceil().max(1.0) as u32;
        Self {
            size_mm2,
            runs,
            ampacity_per_run_a,
        }
    }

    /// Combined ampacity of all runs (A)
    pub fn ampacity_a(&self) -> f64 {
        self.ampacity_per_run_a * f64::from(self.runs)
    }

    /// e.g. "4C x 185mm² (240A)" or "2 x 4C x 185mm² (480A)"
    pub fn description(&self) -> String {
        if self.runs == 1 {
            format!("4C x {}mm² ({}A)", self.size_mm2, self.ampacity_a())
        } else {
            format!("{} x 4C x {}mm² ({}A)", self.runs, self.size_mm2, self.ampacity_a())
        }
    }
}

/// Distribution transformer sizing rules and nameplate defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformerRules {
    /// Smallest transformer offered for an EV site (kVA)
    pub minimum_kva: f64,
    /// Ratings are rounded up to a multiple of this step (kVA)
    pub step_kva: f64,
    /// High-voltage side (kV)
    pub primary_kv: f64,
    /// Low-voltage side (V)
    pub secondary_v: f64,
    /// Percentage impedance
    pub impedance_percent: f64,
    /// Winding vector group
    pub vector_group: String,
}

impl Default for TransformerRules {
    fn default() -> Self {
        Self {
            minimum_kva: 500.0,
            step_kva: 100.0,
            primary_kv: 11.0,
            secondary_v: 415.0,
            impedance_percent: 6.0,
            vector_group: "Dyn11".to_string(),
        }
    }
}

impl TransformerRules {
    pub(crate) fn validate(&self) -> CalcResult<()> {
        if !self.step_kva.is_finite() || self.step_kva <= 0.0 {
            return Err(CalcError::invalid_table("transformer", "step_kva must be positive"));
        }
        if !self.minimum_kva.is_finite() || self.minimum_kva < 0.0 {
            return Err(CalcError::invalid_table("transformer", "minimum_kva cannot be negative"));
        }
        Ok(())
    }

    /// Voltage ratio for nameplates, e.g. "11kV/415V ±5%"
    pub fn voltage_ratio(&self) -> String {
        format!("{}kV/{}V ±5%", self.primary_kv, self.secondary_v)
    }
}
