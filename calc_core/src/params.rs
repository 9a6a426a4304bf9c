//! # Calculation Parameters
//!
//! User-adjustable factors and system voltages that feed every sizing run.
//! Defaults follow AS/NZS 3000:2018 practice for EV installations.
//!
//! Parameters load from TOML; fields a file leaves out keep their defaults,
//! unknown keys are rejected.
//!
//! ## TOML Example
//!
//! ```toml
//! safety_factor = 1.25
//! diversity_factor = 0.8
//! ac_voltage = 415
//! ```

use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::equations::StandardReference;
use crate::errors::{CalcError, CalcResult};

/// Inputs shared by every charger in a sizing run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculationParameters {
    /// Continuous-load multiplier on circuit currents (AS/NZS 3000 Cl. 2.5.7.2)
    pub safety_factor: f64,

    /// Multiplier on the summed MSB load, < 1 (AS/NZS 3000 Cl. 2.2)
    pub diversity_factor: f64,

    /// DC charger AC-to-DC conversion efficiency
    pub dc_efficiency: f64,

    /// Power factor of charger input stages
    pub power_factor: f64,

    /// Three-phase line-to-line voltage (V)
    pub ac_voltage: f64,

    /// DC charger output voltage (V)
    pub dc_voltage: f64,

    /// Single-phase phase-to-neutral voltage (V)
    pub single_phase_voltage: f64,
}

impl Default for CalculationParameters {
    fn default() -> Self {
        Self {
            safety_factor: 1.25,
            diversity_factor: 0.9,
            dc_efficiency: 0.95,
            power_factor: 0.95,
            ac_voltage: 400.0,
            dc_voltage: 500.0,
            single_phase_voltage: 230.0,
        }
    }
}

/// A named, range-checked parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parameter {
    SafetyFactor,
    DiversityFactor,
    DcEfficiency,
    PowerFactor,
    AcVoltage,
    DcVoltage,
    SinglePhaseVoltage,
}

impl Parameter {
    pub const ALL: [Parameter; 7] = [
        Parameter::SafetyFactor,
        Parameter::DiversityFactor,
        Parameter::DcEfficiency,
        Parameter::PowerFactor,
        Parameter::AcVoltage,
        Parameter::DcVoltage,
        Parameter::SinglePhaseVoltage,
    ];

    /// Field name, as used in TOML files and `set` commands
    pub fn name(&self) -> &'static str {
        match self {
            Parameter::SafetyFactor => "safety_factor",
            Parameter::DiversityFactor => "diversity_factor",
            Parameter::DcEfficiency => "dc_efficiency",
            Parameter::PowerFactor => "power_factor",
            Parameter::AcVoltage => "ac_voltage",
            Parameter::DcVoltage => "dc_voltage",
            Parameter::SinglePhaseVoltage => "single_phase_voltage",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Parameter::SafetyFactor => "Safety Factor (continuous loads)",
            Parameter::DiversityFactor => "Diversity Factor",
            Parameter::DcEfficiency => "DC Charger Efficiency",
            Parameter::PowerFactor => "Power Factor",
            Parameter::AcVoltage => "AC System Voltage (V)",
            Parameter::DcVoltage => "DC Charger Voltage (V)",
            Parameter::SinglePhaseVoltage => "Single-Phase Voltage (V)",
        }
    }

    /// Accepted range, inclusive
    pub fn range(&self) -> RangeInclusive<f64> {
        match self {
            Parameter::SafetyFactor => 1.0..=2.0,
            Parameter::DiversityFactor => 0.1..=1.0,
            Parameter::DcEfficiency => 0.8..=1.0,
            Parameter::PowerFactor => 0.8..=1.0,
            Parameter::AcVoltage => 100.0..=500.0,
            Parameter::DcVoltage => 100.0..=1000.0,
            Parameter::SinglePhaseVoltage => 100.0..=500.0,
        }
    }

    /// Clause the default is taken from, where there is one
    pub fn reference(&self) -> Option<StandardReference> {
        match self {
            Parameter::SafetyFactor => Some(StandardReference::ContinuousLoadFactor),
            Parameter::DiversityFactor => Some(StandardReference::MaximumDemand),
            _ => None,
        }
    }

    /// Check `value` against [`Parameter::range`]
    pub fn check(&self, value: f64) -> CalcResult<()> {
        let range = self.range();
        if !value.is_finite() || !range.contains(&value) {
            return Err(CalcError::invalid_input(
                self.name(),
                value.to_string(),
                format!("must be between {} and {}", range.start(), range.end()),
            ));
        }
        Ok(())
    }
}

impl std::str::FromStr for Parameter {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Parameter::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| CalcError::invalid_input("parameter", s, "Unknown parameter name"))
    }
}

impl CalculationParameters {
    /// Current value of a parameter
    pub fn get(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::SafetyFactor => self.safety_factor,
            Parameter::DiversityFactor => self.diversity_factor,
            Parameter::DcEfficiency => self.dc_efficiency,
            Parameter::PowerFactor => self.power_factor,
            Parameter::AcVoltage => self.ac_voltage,
            Parameter::DcVoltage => self.dc_voltage,
            Parameter::SinglePhaseVoltage => self.single_phase_voltage,
        }
    }

    /// Set one parameter, rejecting out-of-range values without modifying `self`
    pub fn set(&mut self, parameter: Parameter, value: f64) -> CalcResult<()> {
        parameter.check(value)?;
        let slot = match parameter {
            Parameter::SafetyFactor => &mut self.safety_factor,
            Parameter::DiversityFactor => &mut self.diversity_factor,
            Parameter::DcEfficiency => &mut self.dc_efficiency,
            Parameter::PowerFactor => &mut self.power_factor,
            Parameter::AcVoltage => &mut self.ac_voltage,
            Parameter::DcVoltage => &mut self.dc_voltage,
            Parameter::SinglePhaseVoltage => &mut self.single_phase_voltage,
        };
        *slot = value;
        Ok(())
    }

    /// Every out-of-range field (empty when valid)
    pub fn validate(&self) -> Vec<CalcError> {
        Parameter::ALL
            .into_iter()
            .filter_map(|p| p.check(self.get(p)).err())
            .collect()
    }

    /// First validation failure, for `?` at the input boundary
    pub fn ensure_valid(&self) -> CalcResult<()> {
        match self.validate().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Parse a TOML parameter file and validate it
    pub fn from_toml_str(s: &str) -> CalcResult<Self> {
        let params: CalculationParameters = toml::from_str(s)?;
        params.ensure_valid()?;
        Ok(params)
    }

    /// Load a TOML parameter file from disk
    pub fn from_toml_file(path: &Path) -> CalcResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let params = Self::from_toml_str(&content)?;
        tracing::info!(path = %path.display(), "loaded calculation parameters");
        Ok(params)
    }
}
