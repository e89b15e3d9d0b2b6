//! Exergy efficiency.

use serde_json::{json, Value};

use crate::constants::EFFICIENCY_WARN_MAX;
use crate::errors::ToolResult;
use crate::guardrails::{refuse_if_exergy_input_nonpositive, refuse_if_exergy_unit_not_joule};
use crate::provenance::require_source;
use crate::values::{computed_value, Meta, ValueSpec};

const TOOL_NAME: &str = "exergy_efficiency";

/// Exergy efficiency:
///
/// ```text
/// eta = Ex_out / Ex_in
/// ```
///
/// Both terms must be provenance-tagged and in Joule
/// (`REFUSE_EXERGY_UNIT_NOT_J`); `Ex_in <= 0` refuses with
/// `REFUSE_EXERGY_INPUT_NONPOSITIVE`. An efficiency below 0 or above 1.2 is
/// *not* refused — it signals a likely boundary-definition error without
/// being strictly impossible — so a non-fatal warning is attached to the
/// result metadata instead.
pub fn exergy_efficiency(ex_out: &ValueSpec, ex_in: &ValueSpec) -> ToolResult<ValueSpec> {
    require_source(ex_out)?;
    require_source(ex_in)?;

    refuse_if_exergy_unit_not_joule(ex_out, "Ex_out")?;
    refuse_if_exergy_unit_not_joule(ex_in, "Ex_in")?;

    refuse_if_exergy_input_nonpositive(ex_in.value())?;

    let eta = ex_out.value() / ex_in.value();

    let mut meta = Meta::new();
    meta.insert(
        "inputs".to_string(),
        json!({
            "Ex_out": ex_out.lineage(),
            "Ex_in": ex_in.lineage(),
        }),
    );
    if !(0.0..=EFFICIENCY_WARN_MAX).contains(&eta) {
        log::warn!("{TOOL_NAME}: eta={eta} outside [0, {EFFICIENCY_WARN_MAX}]");
        meta.insert(
            "warning".to_string(),
            Value::from(
                "Exergy efficiency outside expected range; check boundary/definitions.",
            ),
        );
    }

    Ok(computed_value(eta, "-", TOOL_NAME, Some(meta)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RefusalCode;

    fn joules(v: f64) -> ValueSpec {
        computed_value(v, "J", "test_fixture", None)
    }

    #[test]
    fn plausible_efficiency_has_no_warning() {
        let eta = exergy_efficiency(&joules(400.0), &joules(1000.0)).unwrap();
        assert_eq!(eta.value(), 0.4);
        assert_eq!(eta.unit(), "-");
        assert!(eta.meta().get("warning").is_none());
    }

    #[test]
    fn implausible_efficiency_carries_warning() {
        let eta = exergy_efficiency(&joules(1300.0), &joules(1000.0)).unwrap();
        assert_eq!(eta.value(), 1.3);
        assert!(eta.meta_str("warning").is_some());
    }

    #[test]
    fn negative_efficiency_carries_warning() {
        let eta = exergy_efficiency(&joules(-10.0), &joules(1000.0)).unwrap();
        assert!(eta.value() < 0.0);
        assert!(eta.meta_str("warning").is_some());
    }

    #[test]
    fn nonpositive_input_refuses() {
        for ex_in in [0.0, -5.0] {
            let err = exergy_efficiency(&joules(100.0), &joules(ex_in)).unwrap_err();
            assert_eq!(
                err.refusal().unwrap().code,
                RefusalCode::ExergyInputNonpositive
            );
        }
    }

    #[test]
    fn non_joule_units_refuse() {
        let mwh = computed_value(1.0, "MWh", "test_fixture", None);
        let err = exergy_efficiency(&mwh, &joules(1000.0)).unwrap_err();
        assert_eq!(
            err.refusal().unwrap().code,
            RefusalCode::ExergyUnitNotJoule
        );
    }
}
