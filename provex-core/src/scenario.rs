//! Scenario: Shared Reference Context for a Comparison Run
//!
//! A [`Scenario`] pins down everything two systems must agree on before
//! their exergy numbers can be compared: where and when the analysis
//! applies, the reference environment temperature T0, the district-heating
//! supply/return temperatures, and what kind of analysis is being run.
//!
//! A scenario is constructed once per analysis run (via
//! [`ScenarioBuilder`]), validated with [`Scenario::validate`] before any
//! dependent computation, and never mutated afterwards — a new version is a
//! new instance produced by [`Scenario::next_version`], keeping the same
//! generated `scenario_id`.
//!
//! `validate()` is one atomic pass that refuses at the *first* violated
//! rule, in fixed order: version → location → time range → T0 presence →
//! T0 source/unit → Ts/Tr presence → Ts/Tr source/unit → analysis intent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Error, Refusal, RefusalCode};
use crate::provenance::require_source;
use crate::units::KELVIN;
use crate::values::ValueSpec;

/// What the analysis is for. Determines how results should be read, so it
/// is part of the completeness gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisIntent {
    /// Cross-system comparison against a shared functional unit.
    Comparison,
    /// Feasibility screening of a single system.
    Feasibility,
    /// Sensitivity study over parameter ranges.
    Sensitivity,
    /// Educational walkthrough.
    Teaching,
}

/// Shared reference context for a comparison run. Immutable after
/// construction; see the module docs for the lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    location: Option<String>,
    time_start: Option<DateTime<Utc>>,
    time_end: Option<DateTime<Utc>>,
    scenario_id: Uuid,
    scenario_version: u32,
    t0_k: Option<ValueSpec>,
    ts_k: Option<ValueSpec>,
    tr_k: Option<ValueSpec>,
    analysis_intent: Option<AnalysisIntent>,
}

impl Scenario {
    /// Start building a scenario with the given name.
    pub fn builder(name: impl Into<String>) -> ScenarioBuilder {
        ScenarioBuilder {
            name: name.into(),
            location: None,
            time_start: None,
            time_end: None,
            scenario_version: 1,
            t0_k: None,
            ts_k: None,
            tr_k: None,
            analysis_intent: None,
        }
    }

    /// Scenario name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geographic location the analysis applies to.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Start of the analysis time range.
    pub fn time_start(&self) -> Option<DateTime<Utc>> {
        self.time_start
    }

    /// End of the analysis time range.
    pub fn time_end(&self) -> Option<DateTime<Utc>> {
        self.time_end
    }

    /// Generated, immutable scenario identifier.
    pub fn scenario_id(&self) -> Uuid {
        self.scenario_id
    }

    /// Version of this scenario instance (>= 1 once valid).
    pub fn scenario_version(&self) -> u32 {
        self.scenario_version
    }

    /// Reference environment temperature, in Kelvin once valid.
    pub fn t0_k(&self) -> Option<&ValueSpec> {
        self.t0_k.as_ref()
    }

    /// District-heating supply temperature.
    pub fn ts_k(&self) -> Option<&ValueSpec> {
        self.ts_k.as_ref()
    }

    /// District-heating return temperature.
    pub fn tr_k(&self) -> Option<&ValueSpec> {
        self.tr_k.as_ref()
    }

    /// Declared analysis intent.
    pub fn analysis_intent(&self) -> Option<AnalysisIntent> {
        self.analysis_intent
    }

    /// New instance with `scenario_version + 1` and the same `scenario_id`.
    /// The original is untouched.
    pub fn next_version(&self) -> Self {
        let mut next = self.clone();
        next.scenario_version += 1;
        next
    }

    /// Scenario-level completeness gate.
    ///
    /// Checks refuse in fixed order (first violation wins): version →
    /// location → time range → T0 presence → T0 source/unit → Ts/Tr
    /// presence → Ts/Tr source/unit → analysis intent. Source-tagging
    /// failures surface as structural errors, everything else as
    /// `REFUSE_SCENARIO_*` refusals.
    pub fn validate(&self) -> Result<(), Error> {
        if self.scenario_version < 1 {
            return Err(Refusal::new(
                RefusalCode::ScenarioVersionInvalid,
                "Cannot run scenario because its version is invalid.",
                "Scenario versions start at 1; a lower version means the \
                 scenario was never properly constructed.",
            )
            .with_missing(["scenario.scenario_version >= 1"])
            .into());
        }

        if self.location.as_deref().map_or(true, |l| l.trim().is_empty()) {
            return Err(Refusal::new(
                RefusalCode::ScenarioLocationMissing,
                "Cannot run scenario because its location is missing.",
                "Reference conditions (T0, climate) are location-dependent; \
                 results without a location cannot be audited.",
            )
            .with_missing(["scenario.location"])
            .into());
        }

        let (start, end) = match (self.time_start, self.time_end) {
            (Some(start), Some(end)) => (start, end),
            _ => {
                return Err(Refusal::new(
                    RefusalCode::ScenarioTimeRangeMissing,
                    "Cannot run scenario because its time range is missing.",
                    "External data (prices, weather) and the functional unit \
                     are only meaningful over a declared time range.",
                )
                .with_missing(["scenario.time_start", "scenario.time_end"])
                .into());
            }
        };
        if end <= start {
            return Err(Refusal::new(
                RefusalCode::ScenarioTimeRangeInvalid,
                "Cannot run scenario because its time range ends before it starts.",
                "A non-positive analysis window makes every aggregated \
                 quantity undefined.",
            )
            .with_missing(["scenario.time_end > scenario.time_start"])
            .into());
        }

        let t0 = self.t0_k.as_ref().ok_or_else(|| {
            Refusal::new(
                RefusalCode::ScenarioT0Missing,
                "Cannot run scenario because reference temperature T0 is missing.",
                "Exergy calculations require an explicit reference environment \
                 temperature (T0).",
            )
            .with_missing(["scenario.T0_K"])
        })?;
        require_source(t0)?;
        if t0.unit() != KELVIN {
            return Err(Refusal::new(
                RefusalCode::ScenarioT0Unit,
                "T0 must be provided in Kelvin (K).",
                "Reference temperature must be in Kelvin for exergy calculations.",
            )
            .with_missing(["scenario.T0_K.unit = K"])
            .into());
        }

        let (ts, tr) = match (self.ts_k.as_ref(), self.tr_k.as_ref()) {
            (Some(ts), Some(tr)) => (ts, tr),
            _ => {
                return Err(Refusal::new(
                    RefusalCode::ScenarioDhTempsMissing,
                    "Cannot run scenario because district-heating supply/return \
                     temperatures are missing.",
                    "The delivery boundary is defined by its supply and return \
                     temperatures; without them delivered exergy is undefined.",
                )
                .with_missing(["scenario.Ts_K", "scenario.Tr_K"])
                .into());
            }
        };
        require_source(ts)?;
        require_source(tr)?;
        if ts.unit() != KELVIN || tr.unit() != KELVIN {
            return Err(Refusal::new(
                RefusalCode::ScenarioDhTempsUnit,
                "Ts and Tr must be provided in Kelvin (K).",
                "Boundary temperatures must be in Kelvin for exergy calculations.",
            )
            .with_missing(["scenario.Ts_K.unit = K", "scenario.Tr_K.unit = K"])
            .into());
        }

        if self.analysis_intent.is_none() {
            return Err(Refusal::new(
                RefusalCode::ScenarioIntentMissing,
                "Cannot run scenario because its analysis intent is missing.",
                "Comparison, feasibility, sensitivity and teaching runs are \
                 read differently; the intent must be declared up front.",
            )
            .with_missing(["scenario.analysis_intent"])
            .into());
        }

        Ok(())
    }
}

/// Builder for [`Scenario`]. Incomplete scenarios are constructible on
/// purpose — [`Scenario::validate`] is the gate, not the constructor.
#[derive(Debug, Clone)]
pub struct ScenarioBuilder {
    name: String,
    location: Option<String>,
    time_start: Option<DateTime<Utc>>,
    time_end: Option<DateTime<Utc>>,
    scenario_version: u32,
    t0_k: Option<ValueSpec>,
    ts_k: Option<ValueSpec>,
    tr_k: Option<ValueSpec>,
    analysis_intent: Option<AnalysisIntent>,
}

impl ScenarioBuilder {
    /// Set the location.
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the analysis time range.
    pub fn time_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.time_start = Some(start);
        self.time_end = Some(end);
        self
    }

    /// Override the version (defaults to 1).
    pub fn version(mut self, version: u32) -> Self {
        self.scenario_version = version;
        self
    }

    /// Set the reference environment temperature.
    pub fn t0_k(mut self, t0_k: ValueSpec) -> Self {
        self.t0_k = Some(t0_k);
        self
    }

    /// Set the district-heating supply and return temperatures.
    pub fn dh_temperatures(mut self, ts_k: ValueSpec, tr_k: ValueSpec) -> Self {
        self.ts_k = Some(ts_k);
        self.tr_k = Some(tr_k);
        self
    }

    /// Set the analysis intent.
    pub fn intent(mut self, intent: AnalysisIntent) -> Self {
        self.analysis_intent = Some(intent);
        self
    }

    /// Finalize, generating the immutable `scenario_id`.
    pub fn build(self) -> Scenario {
        Scenario {
            name: self.name,
            location: self.location,
            time_start: self.time_start,
            time_end: self.time_end,
            scenario_id: Uuid::new_v4(),
            scenario_version: self.scenario_version,
            t0_k: self.t0_k,
            ts_k: self.ts_k,
            tr_k: self.tr_k,
            analysis_intent: self.analysis_intent,
        }
    }
}
