//! # Electrical Equations
//!
//! Every formula the sizing engine uses, in one place, so each can be checked
//! against its reference independently of the table lookups.
//!
//! ## Modules
//!
//! - [`electrical`] - Load current for single-phase, three-phase and DC supplies
//! - [`references`] - AS/NZS clause citations used by notes, diagram and report
//!
//! ## Conventions
//!
//! - Three-phase voltages are line-to-line; single-phase voltages are phase-to-neutral
//! - Currents are RMS line currents
//! - Factors (safety, diversity) multiply currents, never ratings
//!
//! ## References
//!
//! - AS/NZS 3000:2018 Wiring Rules
//! - AS/NZS 3008.1.1:2017 Selection of cables

pub mod electrical;
pub mod references;

pub use electrical::{
    apply_factor,
    dc_charger_ac_input_current,
    dc_current,
    round_up_to_step,
    single_phase_current,
    three_phase_current,
    SQRT_3,
};

pub use references::StandardReference;
