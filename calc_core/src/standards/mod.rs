//! # Standard Tables
//!
//! Ordered, immutable lookup tables the sizing engine selects discrete ratings
//! from. Tables are data, not branching logic: an edition can be loaded from a
//! TOML or JSON file and swapped in without touching the engine.
//!
//! ## Tables
//!
//! - [`breakers`] - Preferred circuit breaker ratings (AS/NZS 60898 / 60947.2)
//! - [`cables`] - Copper cable ampacities per core configuration (AS/NZS 3008.1.2)
//! - [`switchboards`] - MSB configurations, incomer schedule, transformer rules
//!
//! ## Selection Policy
//!
//! Ceiling selection: the first entry (ascending) whose capacity is greater
//! than or equal to the requirement. A requirement exactly on a boundary
//! selects that entry. A requirement above the last entry yields
//! [`Selection::ExceedsStandardRange`]; a zero requirement yields
//! [`Selection::NoLoad`].
//!
//! ## Example
//!
//! ```rust
//! use calc_core::standards::{Selection, StandardTables};
//!
//! let tables = StandardTables::as_nzs();
//! assert_eq!(tables.breakers.select(126.0), Selection::Standard(160));
//! assert!(tables.breakers.select(2500.0).is_exceeded());
//! ```

pub mod breakers;
pub mod cables;
pub mod switchboards;

pub use breakers::{BreakerClass, BreakerTable, AS_NZS_BREAKER_RATINGS_A};
pub use cables::{CableCores, CableEntry, CableTable};
pub use switchboards::{IncomerBand, IncomerCable, MsbConfig, TransformerRules};

use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{CalcError, CalcResult};

/// Edition label of the built-in tables
pub const AS_NZS_EDITION: &str = "AS/NZS 3000:2018 + AS/NZS 3008.1.2:2017";

/// The built-in AS/NZS tables, built once on first use.
pub static AS_NZS_TABLES: Lazy<StandardTables> = Lazy::new(StandardTables::as_nzs);

// ============================================================================
// Selection
// ============================================================================

/// Outcome of a ceiling lookup in a standard table.
///
/// ## JSON Serialization
///
/// ```json
/// { "status": "standard", "selection": 160 }
/// { "status": "exceeds_standard_range", "selection": { "required_a": 2500.0, "largest_a": 2000.0 } }
/// { "status": "no_load" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "selection", rename_all = "snake_case")]
pub enum Selection<T> {
    /// Nothing to size (zero requirement)
    NoLoad,
    /// Smallest standard entry that satisfies the requirement
    Standard(T),
    /// Requirement above the largest entry; requires custom design
    ExceedsStandardRange {
        /// What the entry had to carry (A)
        required_a: f64,
        /// Capacity of the largest entry in the table (A)
        largest_a: f64,
    },
}

impl<T> Selection<T> {
    /// The selected entry, if a standard one was found
    pub fn standard(&self) -> Option<&T> {
        match self {
            Selection::Standard(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_standard(&self) -> bool {
        matches!(self, Selection::Standard(_))
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(self, Selection::ExceedsStandardRange { .. })
    }

    pub fn is_no_load(&self) -> bool {
        matches!(self, Selection::NoLoad)
    }

    /// Largest table capacity, when the requirement exceeded it
    pub fn largest_a(&self) -> Option<f64> {
        match self {
            Selection::ExceedsStandardRange { largest_a, .. } => Some(*largest_a),
            _ => None,
        }
    }

    /// Human-readable description, formatting a standard entry with `f`
    pub fn describe(&self, f: impl FnOnce(&T) -> String) -> String {
        match self {
            Selection::NoLoad => "no load".to_string(),
            Selection::Standard(value) => f(value),
            Selection::ExceedsStandardRange { required_a, largest_a } => format!(
                "exceeds standard range ({:.1} A > {:.0} A) - requires custom design",
                required_a, largest_a
            ),
        }
    }
}

/// First entry whose capacity ≥ `required_a`.
///
/// `entries` must be ascending by capacity (checked by [`validate_ascending`]
/// when a table is loaded).
pub fn select_ceiling<T: Clone>(entries: &[T], capacity: impl Fn(&T) -> f64, required_a: f64) -> Selection<T> {
    if required_a <= 0.0 {
        return Selection::NoLoad;
    }
    match entries.iter().find(|&entry| capacity(entry) >= required_a) {
        Some(entry) => Selection::Standard(entry.clone()),
        None => Selection::ExceedsStandardRange {
            required_a,
            largest_a: entries.last().map(&capacity).unwrap_or(0.0),
        },
    }
}

/// Check a column of capacities is non-empty, finite, positive and strictly ascending.
pub fn validate_ascending(table: &str, capacities: impl Iterator<Item = f64>) -> CalcResult<()> {
    let mut previous: Option<f64> = None;
    let mut count = 0usize;
    for value in capacities {
        count += 1;
        if !value.is_finite() || value <= 0.0 {
            return Err(CalcError::invalid_table(
                table,
                format!("entry {} has non-positive capacity {}", count, value),
            ));
        }
        if let Some(prev) = previous {
            if value <= prev {
                return Err(CalcError::invalid_table(
                    table,
                    format!("entry {} ({}) is not greater than the previous entry ({})", count, value, prev),
                ));
            }
        }
        previous = Some(value);
    }
    if count == 0 {
        return Err(CalcError::invalid_table(table, "table is empty"));
    }
    Ok(())
}

// ============================================================================
// Table Set
// ============================================================================

/// A complete, versioned set of standard tables.
///
/// Partial TOML/JSON files inherit the AS/NZS defaults for any table they
/// omit.
///
/// ## TOML Example
///
/// ```toml
/// edition = "Site standard rev B"
///
/// [breakers]
/// ratings_a = [16, 32, 63, 125, 250, 400, 630]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StandardTables {
    /// Label of the standard revision these tables were taken from
    pub edition: String,
    pub breakers: BreakerTable,
    pub cables: CableTable,
    /// MSB configurations, ascending by busbar rating
    pub switchboards: Vec<MsbConfig>,
    /// Incomer cable schedule, ascending by band limit
    pub incomer_cables: Vec<IncomerBand>,
    pub transformer: TransformerRules,
}

impl Default for StandardTables {
    fn default() -> Self {
        Self::as_nzs()
    }
}

impl StandardTables {
    /// The built-in AS/NZS edition
    pub fn as_nzs() -> Self {
        StandardTables {
            edition: AS_NZS_EDITION.to_string(),
            breakers: BreakerTable::as_nzs(),
            cables: CableTable::as_nzs_3008(),
            switchboards: switchboards::as_nzs_msb_configs(),
            incomer_cables: switchboards::as_nzs_incomer_schedule(),
            transformer: TransformerRules::default(),
        }
    }

    /// Check every table is usable for ceiling selection
    pub fn validate(&self) -> CalcResult<()> {
        self.breakers.validate()?;
        self.cables.validate()?;
        switchboards::validate_msb_configs(&self.switchboards)?;
        switchboards::validate_incomer_schedule(&self.incomer_cables, &self.cables.four_core)?;
        self.transformer.validate()
    }

    /// Smallest MSB configuration whose busbar covers `required_a`
    pub fn select_msb(&self, required_a: f64) -> Selection<MsbConfig> {
        switchboards::select_msb(&self.switchboards, required_a)
    }

    /// Incomer cable for `current_a`: the schedule band's size in as many
    /// parallel runs as the 4C ampacity needs.
    pub fn select_incomer(&self, current_a: f64) -> Selection<IncomerCable> {
        match switchboards::select_incomer(&self.incomer_cables, current_a) {
            Selection::Standard(band) => match self.cables.ampacity(CableCores::Four, band.size_mm2) {
                Some(per_run) => Selection::Standard(IncomerCable::for_load(band.size_mm2, per_run, current_a)),
                // Size missing from the 4C table; rejected by validate()
                None => Selection::ExceedsStandardRange {
                    required_a: current_a,
                    largest_a: 0.0,
                },
            },
            Selection::NoLoad => Selection::NoLoad,
            Selection::ExceedsStandardRange { required_a, largest_a } => {
                Selection::ExceedsStandardRange { required_a, largest_a }
            }
        }
    }

    /// Parse and validate a TOML table file
    pub fn from_toml_str(s: &str) -> CalcResult<Self> {
        let tables: StandardTables = toml::from_str(s)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Parse and validate a JSON table file
    pub fn from_json_str(s: &str) -> CalcResult<Self> {
        let tables: StandardTables = serde_json::from_str(s)?;
        tables.validate()?;
        Ok(tables)
    }

    /// Load from disk; `.json` files are parsed as JSON, anything else as TOML.
    pub fn from_file(path: &Path) -> CalcResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;
        let tables = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            _ => Self::from_toml_str(&content)?,
        };
        tracing::info!(edition = %tables.edition, path = %path.display(), "loaded standard tables");
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_tables_validate() {
        assert!(AS_NZS_TABLES.validate().is_ok());
        assert_eq!(AS_NZS_TABLES.edition, AS_NZS_EDITION);
    }

    #[test]
    fn test_select_ceiling_policy() {
        let entries = [(10.0, "a"), (20.0, "b"), (20.0, "c"), (40.0, "d")];
        let capacity = |e: &(f64, &str)| e.0;
        assert_eq!(select_ceiling(&entries, capacity, 15.0), Selection::Standard((20.0, "b")));
        // Exact boundary selects the entry; ties go to the first ascending match
        assert_eq!(select_ceiling(&entries, capacity, 20.0), Selection::Standard((20.0, "b")));
        assert_eq!(select_ceiling(&entries, capacity, 0.0), Selection::NoLoad);
        assert_eq!(
            select_ceiling(&entries, capacity, 41.0),
            Selection::ExceedsStandardRange {
                required_a: 41.0,
                largest_a: 40.0
            }
        );
    }

    #[test]
    fn test_selection_nan_is_not_selected() {
        let entries = [10.0, 20.0];
        assert!(select_ceiling(&entries, |&e| e, f64::NAN).is_exceeded());
    }

    #[test]
    fn test_validate_ascending() {
        assert!(validate_ascending("t", [1.0, 2.0, 3.0].into_iter()).is_ok());
        assert!(validate_ascending("t", [1.0, 1.0].into_iter()).is_err());
        assert!(validate_ascending("t", [0.0, 1.0].into_iter()).is_err());
        assert!(validate_ascending("t", std::iter::empty()).is_err());
    }

    #[test]
    fn test_selection_json_shape() {
        let json = serde_json::to_value(Selection::Standard(160u32)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "standard", "selection": 160 }));

        let json = serde_json::to_value(Selection::<u32>::NoLoad).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "no_load" }));
    }

    #[test]
    fn test_selection_describe() {
        assert_eq!(Selection::Standard(160u32).describe(|a| format!("{}A", a)), "160A");
        assert_eq!(Selection::<u32>::NoLoad.describe(|a| format!("{}A", a)), "no load");
        let exceeded = Selection::<u32>::ExceedsStandardRange {
            required_a: 2500.0,
            largest_a: 2000.0,
        };
        assert!(exceeded.describe(|a| format!("{}A", a)).starts_with("exceeds standard range"));
    }

    #[test]
    fn test_partial_toml_inherits_defaults() {
        let toml = r#"
edition = "Site standard rev B"

[breakers]
ratings_a = [16, 32, 63, 125, 250, 400, 630]
"#;
        let tables = StandardTables::from_toml_str(toml).unwrap();
        assert_eq!(tables.edition, "Site standard rev B");
        assert_eq!(tables.breakers.select(126.0), Selection::Standard(250));
        assert_eq!(tables.cables, CableTable::as_nzs_3008());
        assert_eq!(tables.switchboards.len(), 11);
    }

    #[test]
    fn test_toml_rejects_unordered_table() {
        let toml = r#"
[breakers]
ratings_a = [32, 16]
"#;
        let err = StandardTables::from_toml_str(toml).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_TABLE");
    }

    #[test]
    fn test_incomer_capacity_covers_load() {
        let tables = StandardTables::as_nzs();
        let mut current = 10.0;
        while current <= 3000.0 {
            match tables.select_incomer(current) {
                Selection::Standard(incomer) => {
                    assert!(incomer.ampacity_a() >= current, "{} A", current);
                    // One run fewer would not carry the load
                    let fewer = incomer.ampacity_per_run_a * f64::from(incomer.runs - 1);
                    assert!(fewer < current, "{} A", current);
                }
                other => panic!("{} A: {:?}", current, other),
            }
            current += 7.5;
        }
        assert!(tables.select_incomer(3000.5).is_exceeded());
        assert!(tables.select_incomer(0.0).is_no_load());
    }

    #[test]
    fn test_toml_rejects_unknown_field() {
        let err = StandardTables::from_toml_str("bogus = 1").unwrap_err();
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    #[test]
    fn test_json_roundtrip_of_builtin_edition() {
        let json = serde_json::to_string(&*AS_NZS_TABLES).unwrap();
        let tables = StandardTables::from_json_str(&json).unwrap();
        assert_eq!(tables, *AS_NZS_TABLES);
    }
}
