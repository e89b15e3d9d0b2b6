//! Refusal Rule Catalogue
//!
//! ## Overview
//!
//! Each function here is one named, independently callable guardrail. A
//! guardrail checks a single domain precondition and, when it fails, builds
//! the structured [`Refusal`] for that rule — code, user-facing message,
//! rationale, missing preconditions, optional details. Guardrails never
//! produce structural errors; that class belongs to
//! [`require_source`](crate::provenance::require_source), which computation
//! tools run *before* any guardrail.
//!
//! ## Catalogue
//!
//! | Predicate | Code |
//! |-----------|------|
//! | [`refuse_if_t0_missing`] | `REFUSE_T0_MISSING` |
//! | [`refuse_if_delivery_boundary_missing`] | `REFUSE_DELIVERY_BOUNDARY_MISSING` / `..._NAME_MISSING` |
//! | [`refuse_if_temp_unit_not_kelvin`] | `REFUSE_TEMP_UNIT_NOT_K` |
//! | [`refuse_if_temp_unit_unknown`] | `REFUSE_TEMP_UNIT_UNKNOWN` |
//! | [`refuse_if_temperature_not_positive`] | `REFUSE_TEMPERATURE_NOT_POSITIVE` |
//! | [`refuse_if_tb_not_above_t0`] | `REFUSE_TB_BELOW_OR_EQUAL_T0` |
//! | [`refuse_if_unit_ambiguous_energy`] | `REFUSE_ENERGY_KIND_MISSING` / `REFUSE_UNIT_AMBIGUOUS` |
//! | [`refuse_if_exergy_unit_not_joule`] | `REFUSE_EXERGY_UNIT_NOT_J` |
//! | [`refuse_if_chain_term_not_joule`] | `REFUSE_CHAIN_TERM_UNIT_NOT_J` |
//! | [`refuse_if_exergy_term_not_joule`] | `REFUSE_EXERGY_TERM_UNIT` |
//! | [`refuse_if_negative_exergy_destruction`] | `REFUSE_NEGATIVE_EXERGY_DESTRUCTION` |
//! | [`refuse_if_exergy_input_nonpositive`] | `REFUSE_EXERGY_INPUT_NONPOSITIVE` |
//!
//! Scenario- and chain-level rules (`REFUSE_SCENARIO_*`,
//! `REFUSE_STAGECHAIN_*`) live with their aggregates in
//! [`scenario`](crate::scenario) and [`stage`](crate::stage).
//!
//! Presence-style predicates return the unwrapped reference on success so
//! call sites need no second unwrap.

use serde_json::json;

use crate::config::BoundarySpec;
use crate::constants::EX_DEST_TOLERANCE_J;
use crate::errors::{Refusal, RefusalCode};
use crate::units::{EnergyKind, AMBIGUOUS_ENERGY_UNITS, KELVIN, TEMPERATURE_UNITS};
use crate::values::ValueSpec;

/// Refuse when the reference environment temperature is absent. Without T0
/// no second-law-consistent exergy value exists.
pub fn refuse_if_t0_missing(t0_k: Option<&ValueSpec>) -> Result<&ValueSpec, Refusal> {
    t0_k.ok_or_else(|| {
        Refusal::new(
            RefusalCode::T0Missing,
            "Cannot compute because reference temperature (T0) is missing.",
            "Exergy calculations require a reference environment temperature (T0). \
             Without T0, second-law-consistent results are not possible.",
        )
        .with_missing(["T0_K"])
    })
}

/// Refuse when the useful-output boundary is absent or unnamed. Comparisons
/// across systems are meaningless without a shared boundary definition.
pub fn refuse_if_delivery_boundary_missing(
    boundary: Option<&BoundarySpec>,
) -> Result<&BoundarySpec, Refusal> {
    let boundary = boundary.ok_or_else(|| {
        Refusal::new(
            RefusalCode::DeliveryBoundaryMissing,
            "Cannot compute because the system delivery boundary is not defined.",
            "To compare systems fairly, all systems must define the same \
             'useful output boundary'. Without it, comparisons are invalid.",
        )
        .with_missing(["delivery_boundary"])
    })?;

    if boundary.name.trim().is_empty() {
        return Err(Refusal::new(
            RefusalCode::DeliveryBoundaryNameMissing,
            "Cannot compute because the delivery boundary has no name or label.",
            "Without a delivery boundary name, it is unclear which output \
             is considered the useful system output.",
        )
        .with_missing(["delivery_boundary.name"]));
    }

    Ok(boundary)
}

/// Refuse when a temperature that must be in Kelvin is not.
pub fn refuse_if_temp_unit_not_kelvin(v: &ValueSpec, label: &str) -> Result<(), Refusal> {
    if v.unit() != KELVIN {
        return Err(Refusal::new(
            RefusalCode::TempUnitNotKelvin,
            format!("Cannot compute because {label} is not in Kelvin (K)."),
            "The exergy-of-heat shortcut Ex = Q*(1 - T0/Tb) is only valid on \
             the absolute temperature scale.",
        )
        .with_missing([format!("{label}.unit=K")])
        .with_details(json!({"got_unit": v.unit()})));
    }
    Ok(())
}

/// Refuse when a temperature unit is outside the supported set {K, °C}.
pub fn refuse_if_temp_unit_unknown(unit: &str, label: &str) -> Result<(), Refusal> {
    if !TEMPERATURE_UNITS.contains(&unit) {
        return Err(Refusal::new(
            RefusalCode::TempUnitUnknown,
            format!("Cannot interpret {label}: temperature unit '{unit}' is not recognized."),
            "Only Kelvin (K) and Celsius (°C) temperatures can be normalized \
             safely; guessing another scale risks silently wrong results.",
        )
        .with_missing([format!("{label}.unit in {{K, °C}}")])
        .with_details(json!({"got_unit": unit})));
    }
    Ok(())
}

/// Refuse when an absolute temperature is not strictly positive.
pub fn refuse_if_temperature_not_positive(kelvin: f64, label: &str) -> Result<(), Refusal> {
    if kelvin <= 0.0 {
        return Err(Refusal::new(
            RefusalCode::TemperatureNotPositive,
            format!("Cannot compute because {label} is not above absolute zero."),
            "Absolute temperatures must be strictly positive; 0 K or below \
             has no physical meaning here.",
        )
        .with_missing([format!("{label} > 0 K")])
        .with_details(json!({"kelvin": kelvin})));
    }
    Ok(())
}

/// Refuse when the boundary temperature is not strictly above T0. The
/// shortcut `Ex = Q*(1 - T0/Tb)` is undefined or non-physical otherwise.
pub fn refuse_if_tb_not_above_t0(tb_k: f64, t0_k: f64) -> Result<(), Refusal> {
    if tb_k <= t0_k {
        return Err(Refusal::new(
            RefusalCode::TbBelowOrEqualT0,
            "Cannot compute because boundary temperature Tb is not above T0.",
            "The exergy-of-heat shortcut requires Tb > T0; at or below the \
             reference temperature the delivered heat carries no work potential \
             in this formulation.",
        )
        .with_missing(["Tb_K > T0_K"])
        .with_details(json!({"Tb_K": tb_k, "T0_K": t0_k})));
    }
    Ok(())
}

/// Refuse when a Wh/kWh/MWh quantity lacks an unambiguous energy basis.
///
/// Missing `meta["energy_kind"]` refuses with `REFUSE_ENERGY_KIND_MISSING`;
/// a declared but unrecognized basis refuses with `REFUSE_UNIT_AMBIGUOUS`.
/// Units outside Wh/kWh/MWh pass unchecked.
pub fn refuse_if_unit_ambiguous_energy(v: &ValueSpec) -> Result<(), Refusal> {
    let unit = v.unit().trim();
    if !AMBIGUOUS_ENERGY_UNITS.contains(&unit) {
        return Ok(());
    }

    let Some(kind) = v.meta_str("energy_kind") else {
        return Err(Refusal::new(
            RefusalCode::EnergyKindMissing,
            format!("Cannot compute because '{unit}' does not declare an energy kind."),
            "If you provide MWh/kWh/Wh, you must declare whether it is thermal, \
             electric, LHV or HHV energy. Otherwise efficiency chains and exergy \
             results can be wrong.",
        )
        .with_missing([format!("{unit}.meta.energy_kind")])
        .with_details(json!({
            "unit": unit,
            "required": ["meta.energy_kind in {thermal, electric, LHV, HHV}"],
        })));
    };

    if EnergyKind::parse(kind).is_none() {
        return Err(Refusal::new(
            RefusalCode::UnitAmbiguous,
            format!("Cannot compute because '{unit}' carries an unknown energy kind '{kind}'."),
            "The declared energy kind must be one of thermal, electric, LHV or \
             HHV for downstream chains to be interpreted unambiguously.",
        )
        .with_missing([format!("{unit}.meta.energy_kind in {{thermal, electric, LHV, HHV}}")])
        .with_details(json!({"unit": unit, "got_energy_kind": kind})));
    }

    Ok(())
}

fn not_joule(code: RefusalCode, v: &ValueSpec, label: &str, why: &str) -> Result<(), Refusal> {
    if v.unit() != "J" {
        return Err(Refusal::new(
            code,
            format!("Cannot compute because {label} is not in Joule (J)."),
            why,
        )
        .with_missing([format!("{label}.unit=J")])
        .with_details(json!({"got_unit": v.unit()})));
    }
    Ok(())
}

/// Refuse when an exergy quantity is not expressed in Joule.
pub fn refuse_if_exergy_unit_not_joule(v: &ValueSpec, label: &str) -> Result<(), Refusal> {
    not_joule(
        RefusalCode::ExergyUnitNotJoule,
        v,
        label,
        "Exergy balances and efficiencies require strict unit agreement in Joule (J).",
    )
}

/// Refuse when a chain roll-up term is not expressed in Joule.
pub fn refuse_if_chain_term_not_joule(v: &ValueSpec, label: &str) -> Result<(), Refusal> {
    not_joule(
        RefusalCode::ChainTermUnitNotJoule,
        v,
        label,
        "Chain roll-up requires all exergy and loss terms in Joule.",
    )
}

/// Refuse when a term of the full exergy balance is not expressed in Joule.
pub fn refuse_if_exergy_term_not_joule(v: &ValueSpec, label: &str) -> Result<(), Refusal> {
    not_joule(
        RefusalCode::ExergyTermUnit,
        v,
        label,
        "All exergy/work terms must be in Joule for the balance.",
    )
}

/// Enforce the second law on a computed exergy destruction (J).
///
/// Below `-1e-9` refuses; within `[-1e-9, 0)` the value is treated as
/// floating-point noise and clamped to exactly `0.0`. Returns the (possibly
/// clamped) destruction on success.
pub fn refuse_if_negative_exergy_destruction(
    ex_dest: f64,
    details: serde_json::Value,
) -> Result<f64, Refusal> {
    if ex_dest < -EX_DEST_TOLERANCE_J {
        return Err(Refusal::new(
            RefusalCode::NegativeExergyDestruction,
            "Cannot compute because exergy destruction becomes negative.",
            "According to the second law of thermodynamics, exergy destruction \
             can never be negative. This indicates a boundary or definition mismatch.",
        )
        .with_details(details));
    }

    if ex_dest < 0.0 {
        log::warn!("clamping exergy destruction {ex_dest} J to 0.0 (numerical noise)");
        return Ok(0.0);
    }

    Ok(ex_dest)
}

/// Refuse when an exergy efficiency denominator is not strictly positive.
pub fn refuse_if_exergy_input_nonpositive(ex_in: f64) -> Result<(), Refusal> {
    if ex_in <= 0.0 {
        return Err(Refusal::new(
            RefusalCode::ExergyInputNonpositive,
            "Cannot compute exergy efficiency because Ex_in <= 0.",
            "Efficiency requires a positive exergy input.",
        )
        .with_missing(["Ex_in > 0"])
        .with_details(json!({"Ex_in": ex_in})));
    }
    Ok(())
}
