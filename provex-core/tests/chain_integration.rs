//! Integration tests for the full analysis flow
//!
//! Exercises the complete path a calling workflow takes: build a scenario,
//! validate it, assemble a stage chain, run the stage computations, attach
//! the destruction balance, and roll up chain totals — plus the refusal
//! wire contract a UI layer depends on.

use chrono::{TimeZone, Utc};
use serde_json::Value;

use provex_core::{
    assumption_value, compute_chain_totals, compute_stage,
    errors::{Error, RefusalCode},
    evidence_value,
    exergy::{exergy_destruction_balance, exergy_efficiency, thermal_exergy_of_heat},
    stage::library::{heat_exchanger_to_dh_stage, storage_hold_stage},
    AnalysisIntent, Citation, Meta, Scenario, StageChain, ValueSpec,
};

fn noted(value: f64, unit: &str, note: &str) -> ValueSpec {
    let mut m = Meta::new();
    m.insert("note".into(), Value::from(note));
    assumption_value(value, unit, Some(m))
}

fn scenario() -> Scenario {
    let t0 = evidence_value(
        293.15,
        "K",
        Citation::new("dh_reference_conditions.pdf", 12).with_short_quote("T0 = 20 °C"),
        None,
    );
    Scenario::builder("pit storage vs hydrogen loop")
        .location("Aalborg, DK")
        .time_range(
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap(),
        )
        .t0_k(t0)
        .dh_temperatures(noted(353.15, "K", "design supply"), noted(313.15, "K", "design return"))
        .intent(AnalysisIntent::Comparison)
        .build()
}

#[test]
fn full_chain_analysis_flow() {
    let scenario = scenario();
    scenario.validate().expect("scenario must be complete");

    // Storage stage loses some heat; delivery stage hands 1 GJ to the DH net.
    let store = storage_hold_stage("pit_storage", noted(1.2e9, "J", "charged energy"))
        .with_loss("thermal_leak", noted(2.0e8, "J", "winter standby loss"));
    let deliver = heat_exchanger_to_dh_stage(
        "hx_to_dh",
        noted(1.0e9, "J", "heat handed to DH"),
        noted(353.15, "K", "supply temperature"),
    )
    .with_loss("thermal_leak", noted(5.0e7, "J", "exchanger loss"));

    // Stage computation fills in delivered exergy.
    let store = compute_stage(&store, &scenario).unwrap();
    let deliver = compute_stage(&deliver, &scenario).unwrap();
    let ex_out = deliver.computed()["Ex_out"].clone();
    let expected_ex_out = 1.0e9 * (1.0 - 293.15 / 353.15);
    assert!((ex_out.value() - expected_ex_out).abs() < 1.0);

    // Destruction balance over the delivery step, attached to the stage.
    let ex_in = thermal_exergy_of_heat(
        &noted(1.2e9, "J", "exergy carried into delivery"),
        &noted(363.15, "K", "upstream temperature"),
        scenario.t0_k(),
    )
    .unwrap();
    let ex_dest = exergy_destruction_balance(&ex_in, &ex_out).unwrap();
    let deliver = deliver.with_computed_entry("Ex_dest", ex_dest.clone());

    // Roll-up: totals come back on a new chain, the original is untouched.
    let chain = StageChain::new(vec![store, deliver]);
    let totals = compute_chain_totals(&chain).unwrap();
    assert!(chain.total_exergy_destruction().is_none());

    assert_eq!(totals.total_losses()["thermal_leak"].value(), 2.5e8);
    assert_eq!(
        totals.total_exergy_destruction().unwrap().value(),
        ex_dest.value()
    );

    // Efficiency over the chain boundary, with full audit trail.
    let eta = exergy_efficiency(&ex_out, &ex_in).unwrap();
    assert!(eta.value() > 0.0 && eta.value() < 1.0);
    assert!(eta.meta().get("warning").is_none());
    assert_eq!(eta.meta()["inputs"]["Ex_in"]["provenance"], "Computed");
}

#[test]
fn computed_values_carry_full_lineage() {
    let scenario = scenario();
    let deliver = heat_exchanger_to_dh_stage(
        "hx",
        noted(1000.0, "J", "q"),
        noted(353.15, "K", "tb"),
    );
    let computed = compute_stage(&deliver, &scenario).unwrap();

    let ex_out = &computed.computed()["Ex_out"];
    assert_eq!(ex_out.meta_str("tool"), Some("thermal_exergy_of_heat"));
    let inputs = &ex_out.meta()["inputs"];
    assert_eq!(inputs["T0_K"]["provenance"], "Evidence");
    assert_eq!(inputs["Tb_K"]["unit"], "K");
    assert_eq!(inputs["Q"]["value"], 1000.0);
}

#[test]
fn refusals_surface_verbatim_and_serializable() {
    let scenario = scenario();
    // DELIVER stage without heat_in: the workflow must get a displayable refusal.
    let bare = provex_core::Stage::new("broken", provex_core::StageType::Deliver);
    let err = compute_stage(&bare, &scenario).unwrap_err();

    let Error::Refused(refusal) = err else {
        panic!("expected a refusal, got a structural error");
    };
    assert_eq!(refusal.code, RefusalCode::StageDeliverInputsMissing);
    assert!(!refusal.user_message.is_empty());
    assert!(!refusal.why.is_empty());

    let wire = serde_json::to_value(&refusal).unwrap();
    assert_eq!(wire["code"], "REFUSE_STAGE_DELIVER_INPUTS_MISSING");
    assert_eq!(wire["missing"][0], "stage.inputs.heat_in");
}

#[test]
fn incomplete_scenario_blocks_the_run() {
    let s = Scenario::builder("missing everything").build();
    let err = s.validate().unwrap_err();
    // fixed order: version (ok, defaults to 1) -> location first
    assert_eq!(
        err.refusal().unwrap().code,
        RefusalCode::ScenarioLocationMissing
    );
}

#[test]
fn scenario_versioning_is_copy_on_write() {
    let s1 = scenario();
    let s2 = s1.next_version();
    assert_eq!(s1.scenario_version(), 1);
    assert_eq!(s2.scenario_version(), 2);
    assert_eq!(s1.scenario_id(), s2.scenario_id());
    s2.validate().unwrap();
}
