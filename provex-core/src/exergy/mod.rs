//! Exergy Computation Tools
//!
//! Deterministic, side-effect-free physics over provenance-tagged values.
//! Every tool follows the same discipline:
//!
//! 1. validate provenance ([`require_source`](crate::provenance::require_source)),
//! 2. normalize units where the tool accepts convertible input,
//! 3. run the guardrail predicates its preconditions require,
//! 4. compute, and return a `Computed`-tagged [`ValueSpec`](crate::values::ValueSpec)
//!    whose metadata embeds the inputs' value/unit/provenance for audit.
//!
//! Any failed precondition surfaces as a structured refusal instead of a
//! number. There is no partial success: a tool either returns a fully
//! audited value or refuses entirely.

mod balance;
mod efficiency;
mod heat;

pub use balance::{exergy_destruction_balance, exergy_destruction_balance_full};
pub use efficiency::exergy_efficiency;
pub use heat::thermal_exergy_of_heat;
