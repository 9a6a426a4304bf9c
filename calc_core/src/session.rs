//! # Design Session
//!
//! The `Session` is the charger registry: an ordered schedule of charger lines
//! plus the parameters they are sized with. It is an explicit value owned by
//! the front end; there is no global state.
//!
//! ## Structure
//!
//! ```text
//! Session
//! ├── meta: SessionMetadata (version, title, design date, timestamps)
//! ├── params: CalculationParameters
//! └── chargers: Vec<ChargerEntry> (insertion order, UUID per line)
//! ```
//!
//! Every mutation validates first and leaves the session untouched on error.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::charger::ChargerSpec;
//! use calc_core::session::Session;
//!
//! let mut session = Session::new("Depot charging");
//! session.add_charger(ChargerSpec::dc(150.0, 2)).unwrap();
//! session.add_charger(ChargerSpec::ac(22.0, 6)).unwrap();
//!
//! let result = session.calculate();
//! assert_eq!(result.charger_count(), 8);
//! ```

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calculations::{size_installation, SizingResult};
use crate::charger::ChargerSpec;
use crate::errors::{CalcError, CalcResult};
use crate::params::{CalculationParameters, Parameter};
use crate::standards::{StandardTables, AS_NZS_TABLES};

/// Current schema version for exported sessions
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Root session container, serialized as JSON by `--json` and `json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub meta: SessionMetadata,

    pub params: CalculationParameters,

    /// Charger schedule in insertion order
    pub chargers: Vec<ChargerEntry>,
}

/// Session metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project title printed on the report and diagram
    pub title: String,

    /// Design date shown on outputs
    pub design_date: NaiveDate,

    pub created: DateTime<Utc>,

    pub modified: DateTime<Utc>,
}

/// One registered charger line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargerEntry {
    pub id: Uuid,
    #[serde(flatten)]
    pub spec: ChargerSpec,
}

impl Session {
    /// Create an empty session dated today.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Session {
            meta: SessionMetadata {
                version: SCHEMA_VERSION.to_string(),
                title: title.into(),
                design_date: Local::now().date_naive(),
                created: now,
                modified: now,
            },
            params: CalculationParameters::default(),
            chargers: Vec::new(),
        }
    }

    /// Create an empty session with the given parameters
    pub fn with_params(title: impl Into<String>, params: CalculationParameters) -> CalcResult<Self> {
        params.ensure_valid()?;
        let mut session = Session::new(title);
        session.params = params;
        Ok(session)
    }

    /// Register a charger line.
    ///
    /// Returns the UUID assigned to the line.
    pub fn add_charger(&mut self, spec: ChargerSpec) -> CalcResult<Uuid> {
        spec.validate()?;
        let id = Uuid::new_v4();
        tracing::info!(%id, charger = %spec.label(), "added charger");
        self.chargers.push(ChargerEntry { id, spec });
        self.touch();
        Ok(id)
    }

    /// Remove a charger line by UUID.
    pub fn remove_charger(&mut self, id: &Uuid) -> CalcResult<ChargerSpec> {
        let index = self
            .chargers
            .iter()
            .position(|entry| &entry.id == id)
            .ok_or_else(|| CalcError::charger_not_found(id.to_string()))?;
        Ok(self.remove_index(index))
    }

    /// Remove a charger line by its 1-based position in the schedule.
    pub fn remove_at(&mut self, position: usize) -> CalcResult<ChargerSpec> {
        if position == 0 || position > self.chargers.len() {
            return Err(CalcError::charger_not_found(format!("#{}", position)));
        }
        Ok(self.remove_index(position - 1))
    }

    fn remove_index(&mut self, index: usize) -> ChargerSpec {
        let entry = self.chargers.remove(index);
        tracing::info!(id = %entry.id, charger = %entry.spec.label(), "removed charger");
        self.touch();
        entry.spec
    }

    /// Remove every charger line.
    pub fn clear(&mut self) {
        let count = self.chargers.len();
        self.chargers.clear();
        tracing::info!(count, "cleared charger schedule");
        self.touch();
    }

    pub fn charger_count(&self) -> usize {
        self.chargers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chargers.is_empty()
    }

    /// Charger specs in schedule order
    pub fn specs(&self) -> Vec<ChargerSpec> {
        self.chargers.iter().map(|e| e.spec.clone()).collect()
    }

    /// Replace all parameters. Rejected as a whole if any field is out of range.
    pub fn set_params(&mut self, params: CalculationParameters) -> CalcResult<()> {
        params.ensure_valid()?;
        self.params = params;
        tracing::info!("replaced calculation parameters");
        self.touch();
        Ok(())
    }

    /// Set one parameter by name, e.g. `("diversity_factor", 0.8)`.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> CalcResult<()> {
        let parameter: Parameter = name.parse()?;
        self.params.set(parameter, value)?;
        tracing::info!(parameter = parameter.name(), value, "set calculation parameter");
        self.touch();
        Ok(())
    }

    /// Size the installation with the built-in AS/NZS tables.
    pub fn calculate(&self) -> SizingResult {
        self.calculate_with(&AS_NZS_TABLES)
    }

    /// Size the installation with the given tables.
    pub fn calculate_with(&self, tables: &StandardTables) -> SizingResult {
        let specs = self.specs();
        size_installation(&specs, &self.params, tables)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Pretty JSON export
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Import a session exported with [`Session::to_json`], revalidating every line
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let session: Session = serde_json::from_str(json)?;
        session.params.ensure_valid()?;
        for entry in &session.chargers {
            entry.spec.validate()?;
        }
        Ok(session)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new("EV Charging Infrastructure")
    }
}
