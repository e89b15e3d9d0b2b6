//! Stage-level computation and chain roll-up.

use std::collections::BTreeMap;

use serde_json::json;

use crate::errors::{Refusal, RefusalCode, ToolResult};
use crate::exergy::thermal_exergy_of_heat;
use crate::guardrails::refuse_if_chain_term_not_joule;
use crate::provenance::require_source;
use crate::scenario::Scenario;
use crate::units::JOULE;
use crate::values::{computed_value, Meta, ValueSpec};

use super::chain::{StageChain, EX_DEST_KEYS};
use super::{Stage, StageType};

const ROLLUP_TOOL: &str = "compute_chain_totals";

/// Compute a stage's derived fields against a scenario, returning a new
/// stage with its `computed` map extended (the input stage is untouched).
///
/// Currently only `Deliver` stages have a defined computation: delivered
/// exergy from `inputs["heat_in"]` and the stage boundary temperature
/// against the scenario's T0, written to `computed["Ex_out"]`. Both must be
/// present (`REFUSE_STAGE_DELIVER_INPUTS_MISSING`). Other stage types pass
/// through unchanged; they are extension points, not finished behavior.
pub fn compute_stage(stage: &Stage, scenario: &Scenario) -> ToolResult<Stage> {
    match stage.stage_type() {
        StageType::Deliver => {
            let (Some(q), Some(tb)) = (stage.inputs().get("heat_in"), stage.tb_k()) else {
                return Err(Refusal::new(
                    RefusalCode::StageDeliverInputsMissing,
                    "Cannot compute DELIVER stage because required inputs are missing.",
                    "A DELIVER stage requires heat_in and Tb_K to compute the \
                     exergy of delivered heat.",
                )
                .with_missing(["stage.inputs.heat_in", "stage.Tb_K"])
                .with_details(json!({"stage": stage.name()}))
                .into());
            };

            let ex_out = thermal_exergy_of_heat(q, tb, scenario.t0_k())?;
            Ok(stage.with_computed_entry("Ex_out", ex_out))
        }
        StageType::Charge | StageType::Store | StageType::Convert | StageType::Aux => {
            Ok(stage.clone())
        }
    }
}

/// Seeded Joule accumulator for the roll-up: the first contribution starts
/// the total (no zero seed), later ones add to it. Every term is
/// provenance-checked and must be in Joule (`REFUSE_CHAIN_TERM_UNIT_NOT_J`).
fn sum_joules(acc: Option<&ValueSpec>, term: &ValueSpec, label: &str) -> ToolResult<ValueSpec> {
    require_source(term)?;
    refuse_if_chain_term_not_joule(term, label)?;

    let mut meta = Meta::new();
    meta.insert("rollup".to_string(), serde_json::Value::Bool(true));

    match acc {
        None => {
            meta.insert("init_from".to_string(), serde_json::Value::from(label));
            Ok(computed_value(term.value(), JOULE, ROLLUP_TOOL, Some(meta)))
        }
        Some(acc) => {
            meta.insert("sum_with".to_string(), serde_json::Value::from(label));
            Ok(computed_value(
                acc.value() + term.value(),
                JOULE,
                ROLLUP_TOOL,
                Some(meta),
            ))
        }
    }
}

/// Roll up system totals across the chain, returning a new chain with
/// `total_losses` and `total_exergy_destruction` filled.
///
/// Validates the chain structurally first. Losses are summed per loss key
/// across all stages; exergy destruction is gathered by scanning each
/// stage's computed map for the keys in
/// [`EX_DEST_KEYS`](super::chain::EX_DEST_KEYS) (first match wins per
/// stage). At least one stage must contribute a destruction term
/// (`REFUSE_CHAIN_EX_DEST_MISSING`).
pub fn compute_chain_totals(chain: &StageChain) -> ToolResult<StageChain> {
    chain.validate()?;

    let mut total_losses: BTreeMap<String, ValueSpec> = BTreeMap::new();
    for (i, stage) in chain.stages().iter().enumerate() {
        for (loss_key, loss) in stage.losses() {
            let label = format!("stage[{}].losses[\"{}\"]", i + 1, loss_key);
            let next = sum_joules(total_losses.get(loss_key), loss, &label)?;
            total_losses.insert(loss_key.clone(), next);
        }
    }

    let mut total_ex_dest: Option<ValueSpec> = None;
    for (i, stage) in chain.stages().iter().enumerate() {
        let found = EX_DEST_KEYS
            .iter()
            .find_map(|key| stage.computed().get(*key).map(|v| (*key, v)));
        let Some((key, term)) = found else {
            continue;
        };

        let label = format!("stage[{}].computed[\"{}\"]", i + 1, key);
        total_ex_dest = Some(sum_joules(total_ex_dest.as_ref(), term, &label)?);
    }

    let Some(total_ex_dest) = total_ex_dest else {
        return Err(Refusal::new(
            RefusalCode::ChainExDestMissing,
            "Cannot compute chain exergy destruction because no stage provides \
             an Ex_dest term.",
            "At least one stage must compute exergy destruction for the chain \
             roll-up.",
        )
        .with_missing([format!("stage[i].computed one of {EX_DEST_KEYS:?}")])
        .into());
    };

    log::debug!(
        "{ROLLUP_TOOL}: {} loss keys, total Ex_dest = {} J",
        total_losses.len(),
        total_ex_dest.value()
    );
    Ok(chain.with_totals(total_losses, total_ex_dest))
}
