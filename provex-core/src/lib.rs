//! Core validation engine for Provex
//!
//! Wraps every numeric quantity in an exergy analysis with mandatory
//! provenance metadata, and aborts computation — rather than producing a
//! silently wrong number — whenever a precondition for physical or
//! epistemic validity is not met.
//!
//! Key principles:
//! - No bare floats: values cross tool boundaries only as
//!   provenance-tagged [`ValueSpec`]s.
//! - Refusal over guessing: missing T0, ambiguous kWh, or a second-law
//!   violation yields a structured [`Refusal`], never a best-guess number.
//! - Immutable by construction: every transformation returns a new value;
//!   originals are retained for audit.
//!
//! ```rust
//! use provex_core::{
//!     exergy::thermal_exergy_of_heat,
//!     values::{assumption_value, Meta},
//! };
//! use serde_json::Value;
//!
//! let mut note = Meta::new();
//! note.insert("note".into(), Value::from("design point"));
//!
//! let q = assumption_value(3.6e6, "J", Some(note.clone()));
//! let tb = assumption_value(353.15, "K", Some(note.clone()));
//! let t0 = assumption_value(293.15, "K", Some(note));
//!
//! let ex = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap();
//! assert_eq!(ex.unit(), "J");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod constants;
pub mod errors;
pub mod exergy;
pub mod guardrails;
pub mod provenance;
pub mod scenario;
pub mod stage;
pub mod units;
pub mod values;

// Public API
pub use errors::{Error, Refusal, RefusalCode, ToolResult, ValidationError, ValidationResult};
pub use provenance::require_source;
pub use scenario::{AnalysisIntent, Scenario, ScenarioBuilder};
pub use stage::{compute_chain_totals, compute_stage, Stage, StageChain, StageType};
pub use values::{
    assumption_value, computed_value, evidence_value, evidence_value_from_pdf, external_value,
    Citation, Meta, Provenance, ValueSpec,
};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
