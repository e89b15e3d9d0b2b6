//! Exergy destruction balances.

use serde_json::{json, Value};

use crate::errors::ToolResult;
use crate::guardrails::{
    refuse_if_exergy_term_not_joule, refuse_if_exergy_unit_not_joule,
    refuse_if_negative_exergy_destruction,
};
use crate::provenance::require_source;
use crate::units::JOULE;
use crate::values::{computed_value, Meta, ValueSpec};

/// Simple exergy destruction balance:
///
/// ```text
/// Ex_destr = Ex_in - Ex_out
/// ```
///
/// Both terms must be provenance-tagged and in Joule
/// (`REFUSE_EXERGY_UNIT_NOT_J`). A destruction below `-1e-9` J refuses with
/// `REFUSE_NEGATIVE_EXERGY_DESTRUCTION`; within `[-1e-9, 0)` it is clamped
/// to exactly `0.0` as numerical noise.
pub fn exergy_destruction_balance(ex_in: &ValueSpec, ex_out: &ValueSpec) -> ToolResult<ValueSpec> {
    require_source(ex_in)?;
    require_source(ex_out)?;

    refuse_if_exergy_unit_not_joule(ex_in, "Ex_in")?;
    refuse_if_exergy_unit_not_joule(ex_out, "Ex_out")?;

    let ex_destr = ex_in.value() - ex_out.value();
    let ex_destr = refuse_if_negative_exergy_destruction(
        ex_destr,
        json!({
            "Ex_in": ex_in.value(),
            "Ex_out": ex_out.value(),
            "Ex_destr": ex_destr,
        }),
    )?;

    let mut meta = Meta::new();
    meta.insert(
        "inputs".to_string(),
        json!({
            "Ex_in": ex_in.lineage(),
            "Ex_out": ex_out.lineage(),
        }),
    );
    Ok(computed_value(
        ex_destr,
        JOULE,
        "exergy_destruction_balance",
        Some(meta),
    ))
}

/// Generalized exergy destruction balance:
///
/// ```text
/// Ex_dest = Ex_in + W_in - Ex_out - W_out - Ex_loss
/// ```
///
/// Optional work and loss terms are each unit-checked in Joule when present
/// (`REFUSE_EXERGY_TERM_UNIT`). Same negative-clamp policy as
/// [`exergy_destruction_balance`].
pub fn exergy_destruction_balance_full(
    ex_in: &ValueSpec,
    ex_out: &ValueSpec,
    w_in: Option<&ValueSpec>,
    w_out: Option<&ValueSpec>,
    ex_loss: Option<&ValueSpec>,
) -> ToolResult<ValueSpec> {
    require_source(ex_in)?;
    require_source(ex_out)?;

    refuse_if_exergy_term_not_joule(ex_in, "Ex_in")?;
    refuse_if_exergy_term_not_joule(ex_out, "Ex_out")?;

    let mut total = ex_in.value() - ex_out.value();

    if let Some(w_in) = w_in {
        require_source(w_in)?;
        refuse_if_exergy_term_not_joule(w_in, "W_in")?;
        total += w_in.value();
    }
    if let Some(w_out) = w_out {
        require_source(w_out)?;
        refuse_if_exergy_term_not_joule(w_out, "W_out")?;
        total -= w_out.value();
    }
    if let Some(ex_loss) = ex_loss {
        require_source(ex_loss)?;
        refuse_if_exergy_term_not_joule(ex_loss, "Ex_loss")?;
        total -= ex_loss.value();
    }

    let total = refuse_if_negative_exergy_destruction(total, json!({"Ex_dest": total}))?;

    let optional = |v: Option<&ValueSpec>| v.map_or(Value::Null, |v| v.lineage());
    let mut meta = Meta::new();
    meta.insert(
        "inputs".to_string(),
        json!({
            "Ex_in": ex_in.lineage(),
            "Ex_out": ex_out.lineage(),
            "W_in": optional(w_in),
            "W_out": optional(w_out),
            "Ex_loss": optional(ex_loss),
        }),
    );
    Ok(computed_value(
        total,
        JOULE,
        "exergy_destruction_balance_full",
        Some(meta),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RefusalCode;
    use crate::values::computed_value;

    fn joules(v: f64) -> ValueSpec {
        computed_value(v, "J", "test_fixture", None)
    }

    #[test]
    fn simple_balance_subtracts() {
        let d = exergy_destruction_balance(&joules(1000.0), &joules(400.0)).unwrap();
        assert_eq!(d.value(), 600.0);
        assert_eq!(d.unit(), "J");
        assert_eq!(d.meta_str("tool"), Some("exergy_destruction_balance"));
    }

    #[test]
    fn negative_destruction_refuses_beyond_tolerance() {
        let err = exergy_destruction_balance(&joules(400.0), &joules(1000.0)).unwrap_err();
        let refusal = err.refusal().unwrap();
        assert_eq!(refusal.code, RefusalCode::NegativeExergyDestruction);
        assert_eq!(refusal.details.as_ref().unwrap()["Ex_destr"], -600.0);
    }

    #[test]
    fn noise_deficit_clamps_to_zero() {
        let d = exergy_destruction_balance(&joules(1000.0), &joules(1000.0 + 5e-10)).unwrap();
        assert_eq!(d.value(), 0.0);
    }

    #[test]
    fn non_joule_terms_refuse() {
        let kwh = computed_value(1.0, "kWh", "test_fixture", None);
        let err = exergy_destruction_balance(&kwh, &joules(0.0)).unwrap_err();
        assert_eq!(
            err.refusal().unwrap().code,
            RefusalCode::ExergyUnitNotJoule
        );
    }

    #[test]
    fn full_balance_combines_all_terms() {
        // 1000 + 200 - 400 - 100 - 300 = 400
        let d = exergy_destruction_balance_full(
            &joules(1000.0),
            &joules(400.0),
            Some(&joules(200.0)),
            Some(&joules(100.0)),
            Some(&joules(300.0)),
        )
        .unwrap();
        assert_eq!(d.value(), 400.0);
        assert_eq!(d.meta()["inputs"]["W_in"]["value"], 200.0);
        assert_eq!(d.meta()["inputs"]["Ex_loss"]["value"], 300.0);
    }

    #[test]
    fn full_balance_without_optional_terms_matches_simple() {
        let full =
            exergy_destruction_balance_full(&joules(1000.0), &joules(400.0), None, None, None)
                .unwrap();
        assert_eq!(full.value(), 600.0);
        assert_eq!(full.meta()["inputs"]["W_in"], Value::Null);
    }

    #[test]
    fn full_balance_checks_optional_term_units() {
        let w = computed_value(1.0, "kWh", "test_fixture", None);
        let err = exergy_destruction_balance_full(
            &joules(1000.0),
            &joules(400.0),
            Some(&w),
            None,
            None,
        )
        .unwrap_err();
        assert_eq!(err.refusal().unwrap().code, RefusalCode::ExergyTermUnit);
    }

    #[test]
    fn full_balance_refuses_second_law_violation() {
        let err = exergy_destruction_balance_full(
            &joules(1000.0),
            &joules(400.0),
            None,
            Some(&joules(700.0)),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err.refusal().unwrap().code,
            RefusalCode::NegativeExergyDestruction
        );
    }
}
