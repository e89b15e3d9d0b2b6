//! Error Types for Provenance Validation and Second-Law Refusals
//!
//! ## Design Philosophy
//!
//! Provex keeps two *disjoint* failure taxonomies, and the type system keeps
//! them apart:
//!
//! 1. **Structural errors** ([`ValidationError`]) — a malformed input: a
//!    value tagged `Evidence` without a citation, a `Computed` value missing
//!    its `meta["tool"]`, a NaN. These are caller bugs. They are local,
//!    immediate, and not retryable; the caller fixes the input and resubmits.
//!
//! 2. **Refusals** ([`Refusal`]) — the *designed* terminal output of a
//!    validation path. The inputs are well-formed, but a precondition for a
//!    physically or epistemically valid result is not met (no reference
//!    temperature, ambiguous kWh, negative exergy destruction). A refusal is
//!    not a bug; it is the engine declining to produce a silently wrong
//!    number.
//!
//! Every tool returns `Result<_, Error>` where [`Error`] is the union of the
//! two classes, so call sites are forced to branch rather than lump them
//! together:
//!
//! ```rust
//! use provex_core::errors::Error;
//! use provex_core::values::{assumption_value, computed_value};
//! use provex_core::exergy::thermal_exergy_of_heat;
//!
//! let q = computed_value(3.6e6, "J", "demo", None);
//! let tb = assumption_value(353.15, "K", None); // missing meta["note"]
//!
//! match thermal_exergy_of_heat(&q, &tb, None) {
//!     Ok(ex) => println!("Ex = {} J", ex.value()),
//!     Err(Error::Refused(r)) => println!("{}: {}", r.code, r.user_message),
//!     Err(Error::Validation(e)) => panic!("fix the caller: {e}"),
//! }
//! ```
//!
//! ## Refusal Wire Contract
//!
//! Every refusal carries the same four-part shape, and new rules must follow
//! it:
//!
//! - `code` — stable machine-readable identifier (`REFUSE_*`) for
//!   programmatic branching,
//! - `user_message` — safe to display verbatim,
//! - `why` — the audit/education rationale,
//! - `missing` — the preconditions that would unlock the computation,
//! - `details` — optional structured payload for debugging.
//!
//! Refusals serialize with their `REFUSE_*` strings, so the JSON form is the
//! wire contract across process boundaries.

use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for structural (per-value) validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Result type for computation tools: either a fully audited value or one of
/// the two failure classes.
pub type ToolResult<T> = Result<T, Error>;

/// Structural validation errors — the programmer-error class.
///
/// These indicate a malformed `ValueSpec` reaching the engine. They are never
/// shown to end users as refusals and must not be caught as such.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value is NaN or infinite.
    #[error("value is not a finite number")]
    NotFinite,

    /// Evidence-tagged value has no citation at all.
    #[error("evidence value must carry a citation (pdf_name, page)")]
    CitationMissing,

    /// Citation exists but its `pdf_name` is empty.
    #[error("evidence citation requires a non-empty pdf_name")]
    PdfNameEmpty,

    /// A raw citation page could not be coerced to an integer.
    #[error("citation page {got:?} is not coercible to an integer")]
    PageNotCoercible {
        /// Textual rendering of the rejected page value.
        got: String,
    },

    /// Computed value without `meta["tool"]`.
    #[error("computed value requires meta[\"tool\"] as a non-empty string")]
    ToolMissing,

    /// Assumption value without `meta["note"]`.
    #[error("assumption value requires meta[\"note\"] as a non-empty string")]
    NoteMissing,

    /// External value without `meta["source"]`.
    #[error("external value requires meta[\"source\"] as a non-empty string")]
    SourceMissing,

    /// External value without `meta["time_range"]`.
    #[error("external value requires meta[\"time_range\"] as a non-empty string")]
    TimeRangeMissing,

    /// Negative heat quantity passed to the exergy-of-heat shortcut.
    #[error("heat quantity must be >= 0, got {value} J")]
    NegativeHeat {
        /// The rejected heat quantity in Joule.
        value: f64,
    },
}

/// Stable machine-readable refusal codes — the closed rule catalogue.
///
/// Each variant maps 1:1 to a `REFUSE_*` string used in logs, JSON payloads
/// and user-facing reports. Adding a rule means adding a variant here, which
/// keeps every `match` over the catalogue exhaustiveness-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefusalCode {
    /// Reference environment temperature is absent.
    #[serde(rename = "REFUSE_T0_MISSING")]
    T0Missing,
    /// The useful-output boundary is absent.
    #[serde(rename = "REFUSE_DELIVERY_BOUNDARY_MISSING")]
    DeliveryBoundaryMissing,
    /// The useful-output boundary has no name/label.
    #[serde(rename = "REFUSE_DELIVERY_BOUNDARY_NAME_MISSING")]
    DeliveryBoundaryNameMissing,
    /// A temperature used in the exergy-of-heat shortcut is not in Kelvin.
    #[serde(rename = "REFUSE_TEMP_UNIT_NOT_K")]
    TempUnitNotKelvin,
    /// Boundary temperature is not strictly greater than T0.
    #[serde(rename = "REFUSE_TB_BELOW_OR_EQUAL_T0")]
    TbBelowOrEqualT0,
    /// Energy basis declared but not one of thermal/electric/LHV/HHV.
    #[serde(rename = "REFUSE_UNIT_AMBIGUOUS")]
    UnitAmbiguous,
    /// Wh/kWh/MWh quantity with no declared energy basis.
    #[serde(rename = "REFUSE_ENERGY_KIND_MISSING")]
    EnergyKindMissing,
    /// Absolute temperature <= 0 K.
    #[serde(rename = "REFUSE_TEMPERATURE_NOT_POSITIVE")]
    TemperatureNotPositive,
    /// Temperature unit outside {K, °C}.
    #[serde(rename = "REFUSE_TEMP_UNIT_UNKNOWN")]
    TempUnitUnknown,
    /// Computed exergy destruction negative beyond tolerance.
    #[serde(rename = "REFUSE_NEGATIVE_EXERGY_DESTRUCTION")]
    NegativeExergyDestruction,
    /// An exergy term is not expressed in Joule.
    #[serde(rename = "REFUSE_EXERGY_UNIT_NOT_J")]
    ExergyUnitNotJoule,
    /// A chain roll-up term is not expressed in Joule.
    #[serde(rename = "REFUSE_CHAIN_TERM_UNIT_NOT_J")]
    ChainTermUnitNotJoule,
    /// A term of the full exergy balance is not expressed in Joule.
    #[serde(rename = "REFUSE_EXERGY_TERM_UNIT")]
    ExergyTermUnit,
    /// Exergy efficiency denominator <= 0.
    #[serde(rename = "REFUSE_EXERGY_INPUT_NONPOSITIVE")]
    ExergyInputNonpositive,
    /// Scenario version is below 1.
    #[serde(rename = "REFUSE_SCENARIO_VERSION_INVALID")]
    ScenarioVersionInvalid,
    /// Scenario has no location.
    #[serde(rename = "REFUSE_SCENARIO_LOCATION_MISSING")]
    ScenarioLocationMissing,
    /// Scenario time range is incomplete.
    #[serde(rename = "REFUSE_SCENARIO_TIME_RANGE_MISSING")]
    ScenarioTimeRangeMissing,
    /// Scenario time range ends before it starts.
    #[serde(rename = "REFUSE_SCENARIO_TIME_RANGE_INVALID")]
    ScenarioTimeRangeInvalid,
    /// Scenario reference temperature T0 is absent.
    #[serde(rename = "REFUSE_SCENARIO_T0_MISSING")]
    ScenarioT0Missing,
    /// Scenario T0 is not in Kelvin.
    #[serde(rename = "REFUSE_SCENARIO_T0_UNIT")]
    ScenarioT0Unit,
    /// District-heating supply/return temperatures are absent.
    #[serde(rename = "REFUSE_SCENARIO_DH_TEMPS_MISSING")]
    ScenarioDhTempsMissing,
    /// District-heating supply/return temperatures are not in Kelvin.
    #[serde(rename = "REFUSE_SCENARIO_DH_TEMPS_UNIT")]
    ScenarioDhTempsUnit,
    /// Scenario has no analysis intent.
    #[serde(rename = "REFUSE_SCENARIO_INTENT_MISSING")]
    ScenarioIntentMissing,
    /// Stage chain has no stages.
    #[serde(rename = "REFUSE_STAGECHAIN_EMPTY")]
    StageChainEmpty,
    /// Stage chain does not terminate in a DELIVER stage.
    #[serde(rename = "REFUSE_STAGECHAIN_NO_DELIVER")]
    StageChainNoDeliver,
    /// No stage reports an exergy-destruction term for the roll-up.
    #[serde(rename = "REFUSE_CHAIN_EX_DEST_MISSING")]
    ChainExDestMissing,
    /// DELIVER stage is missing `heat_in` or its boundary temperature.
    #[serde(rename = "REFUSE_STAGE_DELIVER_INPUTS_MISSING")]
    StageDeliverInputsMissing,
}

impl RefusalCode {
    /// The stable `REFUSE_*` identifier for this rule.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::T0Missing => "REFUSE_T0_MISSING",
            Self::DeliveryBoundaryMissing => "REFUSE_DELIVERY_BOUNDARY_MISSING",
            Self::DeliveryBoundaryNameMissing => "REFUSE_DELIVERY_BOUNDARY_NAME_MISSING",
            Self::TempUnitNotKelvin => "REFUSE_TEMP_UNIT_NOT_K",
            Self::TbBelowOrEqualT0 => "REFUSE_TB_BELOW_OR_EQUAL_T0",
            Self::UnitAmbiguous => "REFUSE_UNIT_AMBIGUOUS",
            Self::EnergyKindMissing => "REFUSE_ENERGY_KIND_MISSING",
            Self::TemperatureNotPositive => "REFUSE_TEMPERATURE_NOT_POSITIVE",
            Self::TempUnitUnknown => "REFUSE_TEMP_UNIT_UNKNOWN",
            Self::NegativeExergyDestruction => "REFUSE_NEGATIVE_EXERGY_DESTRUCTION",
            Self::ExergyUnitNotJoule => "REFUSE_EXERGY_UNIT_NOT_J",
            Self::ChainTermUnitNotJoule => "REFUSE_CHAIN_TERM_UNIT_NOT_J",
            Self::ExergyTermUnit => "REFUSE_EXERGY_TERM_UNIT",
            Self::ExergyInputNonpositive => "REFUSE_EXERGY_INPUT_NONPOSITIVE",
            Self::ScenarioVersionInvalid => "REFUSE_SCENARIO_VERSION_INVALID",
            Self::ScenarioLocationMissing => "REFUSE_SCENARIO_LOCATION_MISSING",
            Self::ScenarioTimeRangeMissing => "REFUSE_SCENARIO_TIME_RANGE_MISSING",
            Self::ScenarioTimeRangeInvalid => "REFUSE_SCENARIO_TIME_RANGE_INVALID",
            Self::ScenarioT0Missing => "REFUSE_SCENARIO_T0_MISSING",
            Self::ScenarioT0Unit => "REFUSE_SCENARIO_T0_UNIT",
            Self::ScenarioDhTempsMissing => "REFUSE_SCENARIO_DH_TEMPS_MISSING",
            Self::ScenarioDhTempsUnit => "REFUSE_SCENARIO_DH_TEMPS_UNIT",
            Self::ScenarioIntentMissing => "REFUSE_SCENARIO_INTENT_MISSING",
            Self::StageChainEmpty => "REFUSE_STAGECHAIN_EMPTY",
            Self::StageChainNoDeliver => "REFUSE_STAGECHAIN_NO_DELIVER",
            Self::ChainExDestMissing => "REFUSE_CHAIN_EX_DEST_MISSING",
            Self::StageDeliverInputsMissing => "REFUSE_STAGE_DELIVER_INPUTS_MISSING",
        }
    }
}

impl fmt::Display for RefusalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured refusal: the engine declining to compute.
///
/// Refusals must be presented verbatim (`user_message` + `why`), never
/// swallowed or converted into a best-guess number. Resolution always means
/// the caller supplies the missing precondition and resubmits.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{code}: {user_message}")]
pub struct Refusal {
    /// Stable machine-readable rule identifier.
    pub code: RefusalCode,
    /// User-facing message, safe to display directly.
    pub user_message: String,
    /// Rationale for audit and education.
    pub why: String,
    /// Preconditions whose absence triggered the refusal.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing: Vec<String>,
    /// Optional structured payload for debugging.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl Refusal {
    /// Build a refusal with code, user-facing message and rationale.
    pub fn new(
        code: RefusalCode,
        user_message: impl Into<String>,
        why: impl Into<String>,
    ) -> Self {
        Self {
            code,
            user_message: user_message.into(),
            why: why.into(),
            missing: Vec::new(),
            details: None,
        }
    }

    /// Attach the list of missing preconditions.
    pub fn with_missing<I, S>(mut self, missing: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.missing = missing.into_iter().map(Into::into).collect();
        self
    }

    /// Attach a structured debugging payload.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Union of the two failure classes, used by every computation tool.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Structural error: the caller submitted a malformed value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Domain refusal: preconditions for a second-law-safe result unmet.
    #[error(transparent)]
    Refused(#[from] Refusal),
}

impl Error {
    /// The refusal, if this error is one.
    pub fn refusal(&self) -> Option<&Refusal> {
        match self {
            Self::Refused(r) => Some(r),
            Self::Validation(_) => None,
        }
    }

    /// Whether this error is a domain refusal (as opposed to a caller bug).
    pub fn is_refusal(&self) -> bool {
        matches!(self, Self::Refused(_))
    }
}
