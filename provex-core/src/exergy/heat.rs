//! Exergy of heat delivered at a boundary temperature.

use serde_json::json;

use crate::errors::{ToolResult, ValidationError};
use crate::guardrails::{
    refuse_if_exergy_unit_not_joule, refuse_if_t0_missing, refuse_if_tb_not_above_t0,
    refuse_if_temp_unit_not_kelvin, refuse_if_unit_ambiguous_energy,
};
use crate::provenance::require_source;
use crate::units::{convert_energy_to_j, normalize_temperature_to_k, JOULE};
use crate::values::{computed_value, Meta, ValueSpec};

const TOOL_NAME: &str = "thermal_exergy_of_heat";

/// Exergy of heat `Q` delivered at boundary temperature `Tb` against
/// reference environment `T0`:
///
/// ```text
/// Ex = Q * (1 - T0/Tb)
/// ```
///
/// Accepts temperatures in K or °C (normalized internally) and heat in J or
/// in Wh/kWh/MWh with a declared `energy_kind`. Preconditions, in order:
///
/// - `T0` present (`REFUSE_T0_MISSING`),
/// - all three inputs provenance-tagged (structural error otherwise),
/// - temperatures normalizable and positive (`REFUSE_TEMP_UNIT_UNKNOWN`,
///   `REFUSE_TEMPERATURE_NOT_POSITIVE`), Kelvin after normalization
///   (`REFUSE_TEMP_UNIT_NOT_K`),
/// - `Q` unambiguous and in Joule after conversion
///   (`REFUSE_ENERGY_KIND_MISSING` / `REFUSE_UNIT_AMBIGUOUS` /
///   `REFUSE_EXERGY_UNIT_NOT_J`), non-negative,
/// - `Tb > T0` (`REFUSE_TB_BELOW_OR_EQUAL_T0`).
///
/// The result is `Computed`, in Joule, with the three *original* inputs'
/// lineage embedded in its metadata.
pub fn thermal_exergy_of_heat(
    q: &ValueSpec,
    tb_k: &ValueSpec,
    t0_k: Option<&ValueSpec>,
) -> ToolResult<ValueSpec> {
    let t0_k = refuse_if_t0_missing(t0_k)?;

    require_source(q)?;
    require_source(tb_k)?;
    require_source(t0_k)?;

    let tb = normalize_temperature_to_k(tb_k)?;
    let t0 = normalize_temperature_to_k(t0_k)?;
    refuse_if_temp_unit_not_kelvin(&tb, "Tb_K")?;
    refuse_if_temp_unit_not_kelvin(&t0, "T0_K")?;

    refuse_if_unit_ambiguous_energy(q)?;
    let q_j = convert_energy_to_j(q)?;
    refuse_if_exergy_unit_not_joule(&q_j, "Q")?;
    if q_j.value() < 0.0 {
        return Err(ValidationError::NegativeHeat { value: q_j.value() }.into());
    }

    refuse_if_tb_not_above_t0(tb.value(), t0.value())?;

    let ex = q_j.value() * (1.0 - t0.value() / tb.value());
    log::debug!(
        "{TOOL_NAME}: Q={} J, Tb={} K, T0={} K -> Ex={} J",
        q_j.value(),
        tb.value(),
        t0.value(),
        ex
    );

    let mut meta = Meta::new();
    meta.insert(
        "inputs".to_string(),
        json!({
            "Q": q.lineage(),
            "Tb_K": tb_k.lineage(),
            "T0_K": t0_k.lineage(),
        }),
    );
    Ok(computed_value(ex, JOULE, TOOL_NAME, Some(meta)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{Error, RefusalCode};
    use crate::values::{assumption_value, external_value, Meta};
    use serde_json::Value;

    fn noted(value: f64, unit: &str, note: &str) -> ValueSpec {
        let mut m = Meta::new();
        m.insert("note".into(), Value::from(note));
        assumption_value(value, unit, Some(m))
    }

    fn refusal_code(err: Error) -> RefusalCode {
        err.refusal().expect("expected refusal").code
    }

    #[test]
    fn computes_carnot_factor_exactly() {
        let q = noted(1000.0, "J", "delivered heat");
        let tb = noted(400.0, "K", "Tb");
        let t0 = noted(300.0, "K", "T0");

        let ex = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap();
        assert!((ex.value() - 250.0).abs() < 1e-9);
        assert_eq!(ex.unit(), "J");
        assert_eq!(ex.meta_str("tool"), Some(TOOL_NAME));
    }

    #[test]
    fn embeds_input_lineage() {
        let q = noted(1000.0, "J", "q");
        let tb = noted(400.0, "K", "tb");
        let t0 = noted(300.0, "K", "t0");

        let ex = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap();
        let inputs = &ex.meta()["inputs"];
        assert_eq!(inputs["Q"]["unit"], "J");
        assert_eq!(inputs["Tb_K"]["provenance"], "Assumption");
        assert_eq!(inputs["T0_K"]["value"], 300.0);
    }

    #[test]
    fn missing_t0_refuses() {
        let q = noted(1000.0, "J", "q");
        let tb = noted(400.0, "K", "tb");
        let err = thermal_exergy_of_heat(&q, &tb, None).unwrap_err();
        assert_eq!(refusal_code(err), RefusalCode::T0Missing);
    }

    #[test]
    fn tb_at_or_below_t0_refuses() {
        let q = noted(1000.0, "J", "q");
        let t0 = noted(300.0, "K", "t0");

        for tb_val in [300.0, 299.9] {
            let tb = noted(tb_val, "K", "tb");
            let err = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap_err();
            assert_eq!(refusal_code(err), RefusalCode::TbBelowOrEqualT0);
        }
    }

    #[test]
    fn accepts_celsius_and_kwh() {
        let mut m = Meta::new();
        m.insert("source".into(), Value::from("meter"));
        m.insert("time_range".into(), Value::from("2025-01"));
        m.insert("energy_kind".into(), Value::from("thermal"));
        let q = external_value(1.0, "kWh", Some(m));
        let tb = noted(80.0, "°C", "supply");
        let t0 = noted(20.0, "°C", "reference");

        let ex = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap();
        assert_eq!(ex.unit(), "J");
        let expected = 3.6e6 * (1.0 - 293.15 / 353.15);
        assert!((ex.value() - expected).abs() < 1e-6);
    }

    #[test]
    fn kwh_without_energy_kind_refuses() {
        let mut m = Meta::new();
        m.insert("source".into(), Value::from("meter"));
        m.insert("time_range".into(), Value::from("2025-01"));
        let q = external_value(1.0, "kWh", Some(m));
        let tb = noted(353.15, "K", "tb");
        let t0 = noted(293.15, "K", "t0");

        let err = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap_err();
        assert_eq!(refusal_code(err), RefusalCode::EnergyKindMissing);
    }

    #[test]
    fn unknown_temperature_unit_refuses() {
        let q = noted(1000.0, "J", "q");
        let tb = noted(660.0, "°R", "tb");
        let t0 = noted(293.15, "K", "t0");

        let err = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap_err();
        assert_eq!(refusal_code(err), RefusalCode::TempUnitUnknown);
    }

    #[test]
    fn untagged_input_is_a_structural_error() {
        let q = assumption_value(1000.0, "J", None); // missing note
        let tb = noted(400.0, "K", "tb");
        let t0 = noted(300.0, "K", "t0");

        let err = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap_err();
        assert!(!err.is_refusal());
    }

    #[test]
    fn negative_heat_is_a_structural_error() {
        let q = noted(-5.0, "J", "q");
        let tb = noted(400.0, "K", "tb");
        let t0 = noted(300.0, "K", "t0");

        let err = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap_err();
        assert_eq!(
            err,
            Error::Validation(ValidationError::NegativeHeat { value: -5.0 })
        );
    }

    #[test]
    fn non_energy_unit_for_q_refuses_joule_rule() {
        let q = noted(5.0, "kg", "q");
        let tb = noted(400.0, "K", "tb");
        let t0 = noted(300.0, "K", "t0");

        let err = thermal_exergy_of_heat(&q, &tb, Some(&t0)).unwrap_err();
        assert_eq!(refusal_code(err), RefusalCode::ExergyUnitNotJoule);
    }
}
