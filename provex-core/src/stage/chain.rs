//! Ordered stage pipelines and their structural invariants.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{Refusal, RefusalCode};
use crate::values::ValueSpec;

use super::{Stage, StageType};

/// Computed-map keys recognized as an exergy-destruction term during chain
/// roll-up, scanned in order (first match wins per stage). `Ex_dest` is the
/// canonical key; the aliases tolerate naming drift across stage
/// implementations.
pub const EX_DEST_KEYS: [&str; 3] = ["Ex_dest", "Ex_destr", "Exergy_destruction"];

/// An ordered pipeline of stages, plus the roll-up totals computed over it.
///
/// Totals start empty; [`compute_chain_totals`](super::compute_chain_totals)
/// returns a *new* chain with them filled — an existing chain is never
/// mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageChain {
    stages: Vec<Stage>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    total_losses: BTreeMap<String, ValueSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    total_exergy_destruction: Option<ValueSpec>,
}

impl StageChain {
    /// Chain over the given stages, with empty totals.
    pub fn new(stages: Vec<Stage>) -> Self {
        Self {
            stages,
            total_losses: BTreeMap::new(),
            total_exergy_destruction: None,
        }
    }

    /// The stages, in pipeline order.
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Per-loss-key totals across all stages, in Joule.
    pub fn total_losses(&self) -> &BTreeMap<String, ValueSpec> {
        &self.total_losses
    }

    /// Total exergy destruction across all stages, in Joule.
    pub fn total_exergy_destruction(&self) -> Option<&ValueSpec> {
        self.total_exergy_destruction.as_ref()
    }

    /// Structural invariants: the chain must be non-empty
    /// (`REFUSE_STAGECHAIN_EMPTY`) and must terminate in a `Deliver` stage
    /// (`REFUSE_STAGECHAIN_NO_DELIVER`), because the functional unit is
    /// useful heat delivered at the boundary.
    pub fn validate(&self) -> Result<(), Refusal> {
        let Some(last) = self.stages.last() else {
            return Err(Refusal::new(
                RefusalCode::StageChainEmpty,
                "Cannot build system because the stage chain has no stages.",
                "A system must contain at least one stage.",
            )
            .with_missing(["stage_chain.stages"]));
        };

        if last.stage_type() != StageType::Deliver {
            return Err(Refusal::new(
                RefusalCode::StageChainNoDeliver,
                "Cannot build system because the stage chain does not end with a \
                 DELIVER stage.",
                "The functional unit requires delivered useful heat at the \
                 boundary, so the chain must end with DELIVER.",
            )
            .with_missing(["last_stage.stage_type = DELIVER"]));
        }

        Ok(())
    }

    /// New chain with the roll-up totals filled; used by
    /// [`compute_chain_totals`](super::compute_chain_totals).
    pub(crate) fn with_totals(
        &self,
        total_losses: BTreeMap<String, ValueSpec>,
        total_exergy_destruction: ValueSpec,
    ) -> Self {
        Self {
            stages: self.stages.clone(),
            total_losses,
            total_exergy_destruction: Some(total_exergy_destruction),
        }
    }
}
