//! Cable Current-Carrying Capacity
//!
//! Copper conductor ampacities per AS/NZS 3008.1.2:2017 for PVC/XLPE
//! insulated cables, reference installation method C (enclosed in conduit
//! on a wall), 40 °C ambient.
//!
//! ## Core Configurations
//!
//! - **1C**: single-core cables run as a group
//! - **2C**: active + neutral (single-phase AC) or positive + negative (DC)
//! - **3C**: three actives
//! - **4C**: three actives + neutral (three-phase AC)

use serde::{Deserialize, Serialize};

use super::{select_ceiling, validate_ascending, Selection};
use crate::errors::CalcResult;

/// Number of insulated cores in a multicore cable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CableCores {
    #[serde(rename = "1C")]
    One,
    #[serde(rename = "2C")]
    Two,
    #[serde(rename = "3C")]
    Three,
    #[serde(rename = "4C")]
    Four,
}

impl CableCores {
    /// All configurations, in table order
    pub const ALL: [CableCores; 4] = [CableCores::One, CableCores::Two, CableCores::Three, CableCores::Four];

    /// Designation used on schedules ("2C", "4C", ...)
    pub fn code(&self) -> &'static str {
        match self {
            CableCores::One => "1C",
            CableCores::Two => "2C",
            CableCores::Three => "3C",
            CableCores::Four => "4C",
        }
    }
}

impl std::fmt::Display for CableCores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// One row of an ampacity table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CableEntry {
    /// Conductor cross-section (mm²)
    pub size_mm2: f64,
    /// Current-carrying capacity (A)
    pub ampacity_a: f64,
}

impl CableEntry {
    pub const fn new(size_mm2: f64, ampacity_a: f64) -> Self {
        Self { size_mm2, ampacity_a }
    }
}

/// Ampacity tables for every core configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CableTable {
    pub one_core: Vec<CableEntry>,
    pub two_core: Vec<CableEntry>,
    pub three_core: Vec<CableEntry>,
    pub four_core: Vec<CableEntry>,
}

/// Standard conductor sizes (mm²), shared by every configuration
const SIZES_MM2: [f64; 19] = [
    1.5, 2.5, 4.0, 6.0, 10.0, 16.0, 25.0, 35.0, 50.0, 70.0,
    95.0, 120.0, 150.0, 185.0, 240.0, 300.0, 400.0, 500.0, 630.0,
];

const ONE_CORE_A: [f64; 19] = [
    17.5, 23.0, 30.0, 39.0, 53.0, 70.0, 92.0, 115.0, 142.0, 179.0,
    217.0, 254.0, 292.0, 336.0, 392.0, 451.0, 527.0, 600.0, 696.0,
];

const TWO_CORE_A: [f64; 19] = [
    15.0, 20.0, 26.0, 34.0, 46.0, 61.0, 80.0, 99.0, 123.0, 155.0,
    189.0, 221.0, 255.0, 292.0, 352.0, 409.0, 489.0, 569.0, 674.0,
];

const THREE_CORE_A: [f64; 19] = [
    13.5, 17.5, 23.0, 30.0, 40.0, 53.0, 70.0, 87.0, 108.0, 136.0,
    166.0, 194.0, 225.0, 260.0, 310.0, 360.0, 429.0, 495.0, 588.0,
];

const FOUR_CORE_A: [f64; 19] = [
    12.0, 16.0, 21.0, 27.0, 37.0, 49.0, 64.0, 80.0, 99.0, 125.0,
    152.0, 178.0, 207.0, 240.0, 287.0, 334.0, 400.0, 464.0, 555.0,
];

fn rows(ampacities: &[f64; 19]) -> Vec<CableEntry> {
    SIZES_MM2
        .iter()
        .zip(ampacities.iter())
        .map(|(&size, &amps)| CableEntry::new(size, amps))
        .collect()
}

impl Default for CableTable {
    fn default() -> Self {
        Self::as_nzs_3008()
    }
}

impl CableTable {
    /// AS/NZS 3008.1.2:2017 copper, method C, 40 °C
    pub fn as_nzs_3008() -> Self {
        CableTable {
            one_core: rows(&ONE_CORE_A),
            two_core: rows(&TWO_CORE_A),
            three_core: rows(&THREE_CORE_A),
            four_core: rows(&FOUR_CORE_A),
        }
    }

    /// Rows for one core configuration
    pub fn entries(&self, cores: CableCores) -> &[CableEntry] {
        match cores {
            CableCores::One => &self.one_core,
            CableCores::Two => &self.two_core,
            CableCores::Three => &self.three_core,
            CableCores::Four => &self.four_core,
        }
    }

    /// Ampacity of a given size, if the size is in the table
    pub fn ampacity(&self, cores: CableCores, size_mm2: f64) -> Option<f64> {
        self.entries(cores)
            .iter()
            .find(|e| e.size_mm2 == size_mm2)
            .map(|e| e.ampacity_a)
    }

    /// Smallest cable whose ampacity ≥ `required_a`
    pub fn select(&self, cores: CableCores, required_a: f64) -> Selection<CableEntry> {
        select_ceiling(self.entries(cores), |e| e.ampacity_a, required_a)
    }

    /// Check every configuration is non-empty and ascending in both size and ampacity
    pub fn validate(&self) -> CalcResult<()> {
        for cores in CableCores::ALL {
            let name = format!("cables.{}", cores.code());
            let entries = self.entries(cores);
            validate_ascending(&name, entries.iter().map(|e| e.ampacity_a))?;
            validate_ascending(&name, entries.iter().map(|e| e.size_mm2))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_is_valid() {
        assert!(CableTable::as_nzs_3008().validate().is_ok());
    }

    #[test]
    fn test_lookup_ampacity() {
        let table = CableTable::as_nzs_3008();
        assert_eq!(table.ampacity(CableCores::Four, 120.0), Some(178.0));
        assert_eq!(table.ampacity(CableCores::Two, 95.0), Some(189.0));
        assert_eq!(table.ampacity(CableCores::Two, 7.0), None);
    }

    #[test]
    fn test_select_against_breaker_rating() {
        let table = CableTable::as_nzs_3008();
        // 160 A breaker on a 2C circuit: 70 mm² (155 A) is too small, 95 mm² (189 A) fits
        assert_eq!(table.select(CableCores::Two, 160.0), Selection::Standard(CableEntry::new(95.0, 189.0)));
        // Exact match selects that size
        assert_eq!(table.select(CableCores::Four, 49.0), Selection::Standard(CableEntry::new(16.0, 49.0)));
    }

    #[test]
    fn test_exceeds_largest_cable() {
        let table = CableTable::as_nzs_3008();
        let selection = table.select(CableCores::Two, 1600.0);
        assert!(selection.is_exceeded());
        assert_eq!(selection.largest_a(), Some(674.0));
    }

    #[test]
    fn test_core_serialization() {
        assert_eq!(serde_json::to_string(&CableCores::Four).unwrap(), "\"4C\"");
        let cores: CableCores = serde_json::from_str("\"2C\"").unwrap();
        assert_eq!(cores, CableCores::Two);
    }
}
