//! # Sizing Engine
//!
//! Pure functions from a charger schedule and [`CalculationParameters`] to
//! JSON-serializable results. Nothing here keeps state or touches I/O.
//!
//! - [`circuit`] - per-charger final sub-circuit (current, breaker, cable)
//! - [`msb`] - main switchboard aggregation and supply transformer
//! - [`sizing`] - whole-installation entry point
//!
//! [`CalculationParameters`]: crate::params::CalculationParameters

pub mod circuit;
pub mod msb;
pub mod sizing;

pub use circuit::{size_circuit, CircuitResult};
pub use msb::{size_msb, size_transformer, MsbResult, TransformerResult};
pub use sizing::{engineering_notes, size_installation, EngineeringNote, SizingResult};
