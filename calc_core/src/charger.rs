//! # Charger Specifications
//!
//! A [`ChargerSpec`] is one line of the charger schedule: a charger type, its
//! rated power and how many identical units are installed.
//!
//! ## Supply Arrangement
//!
//! AC chargers are fed single-phase at the phase voltage unless `3p` is given
//! explicitly. The default does not depend on the rating, so raising a
//! charger's power never moves it onto a different supply arrangement. DC
//! chargers always draw from the three-phase AC system, so an explicit phase
//! on a DC charger is rejected.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::charger::{ChargerSpec, SupplyPhase};
//!
//! let wallbox = ChargerSpec::ac(7.0, 4);
//! assert_eq!(wallbox.supply_phase(), SupplyPhase::Single);
//!
//! let fast = ChargerSpec::dc(150.0, 2);
//! assert!(fast.validate().is_ok());
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};
use crate::standards::CableCores;

/// Output type of a charger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChargerKind {
    /// AC (Mode 3) charger; the vehicle's on-board charger rectifies
    #[serde(rename = "AC")]
    Ac,
    /// DC fast charger with its own rectifier
    #[serde(rename = "DC")]
    Dc,
}

impl ChargerKind {
    /// Typical market ratings offered in the schedule (kW)
    pub fn catalog_kw(&self) -> &'static [f64] {
        match self {
            ChargerKind::Ac => &[7.0, 22.0],
            ChargerKind::Dc => &[25.0, 50.0, 75.0, 100.0, 120.0, 150.0, 300.0, 350.0],
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ChargerKind::Ac => "AC",
            ChargerKind::Dc => "DC",
        }
    }
}

impl std::fmt::Display for ChargerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.code())
    }
}

impl std::str::FromStr for ChargerKind {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ac" => Ok(ChargerKind::Ac),
            "dc" => Ok(ChargerKind::Dc),
            other => Err(CalcError::invalid_input("kind", other, "Charger type must be AC or DC")),
        }
    }
}

/// How the charger circuit is supplied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SupplyPhase {
    /// Active + neutral at phase voltage
    Single,
    /// Three actives + neutral at line voltage
    Three,
    /// DC output circuit
    #[serde(rename = "DC")]
    Dc,
}

impl SupplyPhase {
    /// Cable core configuration for the final sub-circuit
    pub fn cable_cores(&self) -> CableCores {
        match self {
            SupplyPhase::Single => CableCores::Two,
            SupplyPhase::Three => CableCores::Four,
            SupplyPhase::Dc => CableCores::Two,
        }
    }

    /// Breaker poles
    pub fn poles(&self) -> &'static str {
        match self {
            SupplyPhase::Single => "1P",
            SupplyPhase::Three => "3P",
            SupplyPhase::Dc => "2P",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SupplyPhase::Single => "Single",
            SupplyPhase::Three => "Three",
            SupplyPhase::Dc => "DC",
        }
    }
}

impl std::str::FromStr for SupplyPhase {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1p" | "1" | "single" => Ok(SupplyPhase::Single),
            "3p" | "3" | "three" => Ok(SupplyPhase::Three),
            other => Err(CalcError::invalid_input("phase", other, "Phase must be 1p or 3p")),
        }
    }
}

/// One charger line in the schedule.
///
/// ## JSON Example
///
/// ```json
/// { "kind": "AC", "power_kw": 22.0, "quantity": 2, "phase": "Three" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargerSpec {
    /// AC or DC
    pub kind: ChargerKind,

    /// Rated output power per unit (kW)
    pub power_kw: f64,

    /// Number of identical units
    pub quantity: u32,

    /// Explicit AC supply arrangement; `None` is single-phase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<SupplyPhase>,
}

impl ChargerSpec {
    pub fn new(kind: ChargerKind, power_kw: f64, quantity: u32) -> Self {
        Self {
            kind,
            power_kw,
            quantity,
            phase: None,
        }
    }

    /// AC charger, single-phase unless overridden
    pub fn ac(power_kw: f64, quantity: u32) -> Self {
        Self::new(ChargerKind::Ac, power_kw, quantity)
    }

    /// DC fast charger
    pub fn dc(power_kw: f64, quantity: u32) -> Self {
        Self::new(ChargerKind::Dc, power_kw, quantity)
    }

    /// Force the AC supply arrangement
    pub fn with_phase(mut self, phase: SupplyPhase) -> Self {
        self.phase = Some(phase);
        self
    }

    /// Validate at the input boundary. The sizing engine assumes this passed.
    pub fn validate(&self) -> CalcResult<()> {
        if !self.power_kw.is_finite() || self.power_kw <= 0.0 {
            return Err(CalcError::invalid_input(
                "power_kw",
                self.power_kw.to_string(),
                "Power must be a positive number",
            ));
        }
        if self.quantity == 0 {
            return Err(CalcError::invalid_input(
                "quantity",
                "0",
                "Quantity must be at least 1",
            ));
        }
        match (self.kind, self.phase) {
            (ChargerKind::Dc, Some(phase)) => Err(CalcError::invalid_input(
                "phase",
                phase.display_name(),
                "DC chargers are always fed three-phase; remove the phase",
            )),
            (ChargerKind::Ac, Some(SupplyPhase::Dc)) => Err(CalcError::invalid_input(
                "phase",
                "DC",
                "AC chargers are single- or three-phase",
            )),
            _ => Ok(()),
        }
    }

    /// Supply arrangement of the final sub-circuit
    pub fn supply_phase(&self) -> SupplyPhase {
        match (self.kind, self.phase) {
            (ChargerKind::Dc, _) => SupplyPhase::Dc,
            (ChargerKind::Ac, Some(phase)) => phase,
            (ChargerKind::Ac, None) => SupplyPhase::Single,
        }
    }

    /// Installed power of the line, `power_kw × quantity`
    pub fn connected_kw(&self) -> f64 {
        self.power_kw * f64::from(self.quantity)
    }

    /// Short label, e.g. "22kW AC x2"
    pub fn label(&self) -> String {
        format!("{}kW {} x{}", self.power_kw, self.kind, self.quantity)
    }
}

impl std::str::FromStr for ChargerSpec {
    type Err = CalcError;

    /// Parse `<ac|dc>:<kW>[:<qty>[:<1p|3p>]]`, e.g. `dc:150:2` or `ac:22:1:1p`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(':');
        let kind: ChargerKind = parts
            .next()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| CalcError::missing_field("kind"))?
            .parse()?;
        let power = parts.next().ok_or_else(|| CalcError::missing_field("power_kw"))?;
        let power_kw: f64 = power
            .trim()
            .parse()
            .map_err(|_| CalcError::invalid_input("power_kw", power, "Power must be a number"))?;
        let quantity = match parts.next() {
            Some(q) => q
                .trim()
                .parse()
                .map_err(|_| CalcError::invalid_input("quantity", q, "Quantity must be a whole number"))?,
            None => 1,
        };
        let phase = parts.next().map(str::parse::<SupplyPhase>).transpose()?;
        if let Some(extra) = parts.next() {
            return Err(CalcError::invalid_input("charger", extra, "Unexpected trailing field"));
        }

        let spec = ChargerSpec {
            kind,
            power_kw,
            quantity,
            phase,
        };
        spec.validate()?;
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_phase_ignores_rating() {
        for kw in [3.7, 7.0, 7.4, 7.5, 11.0, 22.0, 43.0] {
            assert_eq!(ChargerSpec::ac(kw, 1).supply_phase(), SupplyPhase::Single, "{} kW", kw);
        }
        assert_eq!(ChargerSpec::dc(50.0, 1).supply_phase(), SupplyPhase::Dc);
    }

    #[test]
    fn test_explicit_phase_wins() {
        let spec = ChargerSpec::ac(22.0, 1).with_phase(SupplyPhase::Three);
        assert_eq!(spec.supply_phase(), SupplyPhase::Three);
        assert_eq!(spec.supply_phase().cable_cores(), CableCores::Four);
    }

    #[test]
    fn test_validation() {
        assert!(ChargerSpec::ac(22.0, 1).validate().is_ok());
        assert!(ChargerSpec::ac(0.0, 1).validate().is_err());
        assert!(ChargerSpec::ac(-7.0, 1).validate().is_err());
        assert!(ChargerSpec::ac(f64::NAN, 1).validate().is_err());
        assert!(ChargerSpec::dc(50.0, 0).validate().is_err());
        assert!(ChargerSpec::dc(50.0, 1).with_phase(SupplyPhase::Three).validate().is_err());
        assert!(ChargerSpec::ac(7.0, 1).with_phase(SupplyPhase::Dc).validate().is_err());
    }

    #[test]
    fn test_parse() {
        let spec: ChargerSpec = "dc:150:2".parse().unwrap();
        assert_eq!(spec, ChargerSpec::dc(150.0, 2));

        let spec: ChargerSpec = "AC:22:1:1p".parse().unwrap();
        assert_eq!(spec, ChargerSpec::ac(22.0, 1).with_phase(SupplyPhase::Single));

        let spec: ChargerSpec = "ac:7".parse().unwrap();
        assert_eq!(spec.quantity, 1);
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("hv:22".parse::<ChargerSpec>().is_err());
        assert!("ac".parse::<ChargerSpec>().is_err());
        assert!("ac:abc".parse::<ChargerSpec>().is_err());
        assert!("ac:22:0".parse::<ChargerSpec>().is_err());
        assert!("ac:22:1:3p:extra".parse::<ChargerSpec>().is_err());
        assert!("dc:50:1:3p".parse::<ChargerSpec>().is_err());
    }

    #[test]
    fn test_connected_kw_and_label() {
        let spec = ChargerSpec::ac(22.0, 3);
        assert_eq!(spec.connected_kw(), 66.0);
        assert_eq!(spec.label(), "22kW AC x3");
    }

    #[test]
    fn test_serialization() {
        let spec = ChargerSpec::ac(22.0, 2).with_phase(SupplyPhase::Three);
        let json = serde_json::to_string(&spec).unwrap();
        assert_eq!(json, r#"{"kind":"AC","power_kw":22.0,"quantity":2,"phase":"Three"}"#);
        let roundtrip: ChargerSpec = serde_json::from_str(&json).unwrap();
        assert_eq!(spec, roundtrip);
    }
}
