//! # calc_core - EV Charger Infrastructure Sizing Engine
//!
//! `calc_core` sizes the electrical infrastructure of an EV charging site to
//! AS/NZS practice: the final sub-circuit of every charger (breaker and
//! cable), the main switchboard (main breaker, configuration, busbar,
//! incomer) and the supply transformer. All inputs and outputs are
//! JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure sizing**: the engine is a function of the charger schedule, the
//!   parameters and the standard tables
//! - **Data-driven standards**: breaker, cable and switchboard tables are data
//!   that can be swapped by edition without code changes
//! - **No silent clamping**: a load beyond a table is reported as
//!   [`Selection::ExceedsStandardRange`], never as the largest entry
//! - **Rich Errors**: structured error types, not strings
//!
//! ## Quick Start
//!
//! ```rust
//! use calc_core::{ChargerSpec, Session};
//!
//! let mut session = Session::new("Depot");
//! session.add_charger(ChargerSpec::ac(7.0, 4)).unwrap();
//! session.add_charger(ChargerSpec::dc(50.0, 2)).unwrap();
//!
//! let result = session.calculate();
//! assert_eq!(result.msb.main_breaker_a(), Some(400));
//! ```
//!
//! ## Modules
//!
//! - [`session`] - charger registry and parameters
//! - [`charger`] - charger specifications and supply arrangement
//! - [`params`] - calculation parameters
//! - [`calculations`] - the sizing engine
//! - [`standards`] - breaker, cable, switchboard and transformer tables
//! - [`equations`] - electrical formulas and standard references
//! - [`diagram`] - single line diagram (Graphviz DOT)
//! - [`pdf`] - PDF sizing report
//! - [`units`] - type-safe unit wrappers
//! - [`errors`] - structured error types

pub mod calculations;
pub mod charger;
pub mod diagram;
pub mod equations;
pub mod errors;
pub mod params;
pub mod pdf;
pub mod session;
pub mod standards;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{size_installation, CircuitResult, MsbResult, SizingResult, TransformerResult};
pub use charger::{ChargerKind, ChargerSpec, SupplyPhase};
pub use errors::{CalcError, CalcResult};
pub use params::{CalculationParameters, Parameter};
pub use session::{ChargerEntry, Session, SessionMetadata};
pub use standards::{Selection, StandardTables, AS_NZS_TABLES};
