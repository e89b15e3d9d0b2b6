//! Stages and Stage Chains
//!
//! ## Overview
//!
//! A [`Stage`] is one step of an energy conversion/storage/delivery
//! pipeline: named input, output and loss quantities, an optional boundary
//! temperature, and a `computed` map filled in by the computation tools. A
//! [`StageChain`](chain::StageChain) is the ordered pipeline; it must end in
//! a `Deliver` stage because the functional unit is "useful heat delivered
//! at the boundary".
//!
//! ## Immutability
//!
//! Stages follow the derived-copy pattern: the `with_*` methods used during
//! construction consume and return the stage, and computation produces a
//! *new* stage via [`Stage::with_computed_entry`] — `inputs`, `outputs` and
//! `losses` are never rewritten in place. A stage belongs to exactly one
//! chain at a time; chains own their stages.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::values::ValueSpec;

pub mod chain;
pub mod compute;
pub mod library;

pub use chain::StageChain;
pub use compute::{compute_chain_totals, compute_stage};

/// Role of a stage within the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StageType {
    /// Takes energy into the system (e.g. electricity into an electrolyser).
    Charge,
    /// Holds energy over time.
    Store,
    /// Converts between carriers.
    Convert,
    /// Delivers useful output at the boundary. A chain must end here.
    Deliver,
    /// Auxiliary consumption (pumps, compressors).
    Aux,
}

/// One step of an energy pipeline. See the module docs for the
/// immutability contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    name: String,
    stage_type: StageType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    inputs: BTreeMap<String, ValueSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<String, ValueSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    losses: BTreeMap<String, ValueSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tb_k: Option<ValueSpec>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    computed: BTreeMap<String, ValueSpec>,
}

impl Stage {
    /// Empty stage of the given type.
    pub fn new(name: impl Into<String>, stage_type: StageType) -> Self {
        Self {
            name: name.into(),
            stage_type,
            inputs: BTreeMap::new(),
            outputs: BTreeMap::new(),
            losses: BTreeMap::new(),
            tb_k: None,
            computed: BTreeMap::new(),
        }
    }

    /// Add a named input quantity (construction-time builder).
    pub fn with_input(mut self, name: impl Into<String>, value: ValueSpec) -> Self {
        self.inputs.insert(name.into(), value);
        self
    }

    /// Add a named output quantity (construction-time builder).
    pub fn with_output(mut self, name: impl Into<String>, value: ValueSpec) -> Self {
        self.outputs.insert(name.into(), value);
        self
    }

    /// Add a named loss quantity (construction-time builder).
    pub fn with_loss(mut self, name: impl Into<String>, value: ValueSpec) -> Self {
        self.losses.insert(name.into(), value);
        self
    }

    /// Set the boundary temperature (construction-time builder).
    pub fn with_tb_k(mut self, tb_k: ValueSpec) -> Self {
        self.tb_k = Some(tb_k);
        self
    }

    /// Derived copy with one computed entry added. The original stage is
    /// untouched; this is how computation tools attach their results.
    pub fn with_computed_entry(&self, name: impl Into<String>, value: ValueSpec) -> Self {
        let mut next = self.clone();
        next.computed.insert(name.into(), value);
        next
    }

    /// Stage name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage role.
    pub fn stage_type(&self) -> StageType {
        self.stage_type
    }

    /// Named input quantities.
    pub fn inputs(&self) -> &BTreeMap<String, ValueSpec> {
        &self.inputs
    }

    /// Named output quantities.
    pub fn outputs(&self) -> &BTreeMap<String, ValueSpec> {
        &self.outputs
    }

    /// Named loss quantities.
    pub fn losses(&self) -> &BTreeMap<String, ValueSpec> {
        &self.losses
    }

    /// Boundary temperature, where the stage has one.
    pub fn tb_k(&self) -> Option<&ValueSpec> {
        self.tb_k.as_ref()
    }

    /// Results attached by the computation tools.
    pub fn computed(&self) -> &BTreeMap<String, ValueSpec> {
        &self.computed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::computed_value;

    #[test]
    fn builder_accumulates_maps() {
        let stage = Stage::new("hx", StageType::Deliver)
            .with_input("heat_in", computed_value(1000.0, "J", "t", None))
            .with_loss("friction", computed_value(10.0, "J", "t", None))
            .with_tb_k(computed_value(353.15, "K", "t", None));

        assert_eq!(stage.inputs().len(), 1);
        assert_eq!(stage.losses()["friction"].value(), 10.0);
        assert!(stage.tb_k().is_some());
        assert!(stage.computed().is_empty());
    }

    #[test]
    fn with_computed_entry_leaves_original_untouched() {
        let stage = Stage::new("hx", StageType::Deliver);
        let derived = stage.with_computed_entry("Ex_out", computed_value(1.0, "J", "t", None));

        assert!(stage.computed().is_empty());
        assert_eq!(derived.computed()["Ex_out"].value(), 1.0);
        assert_eq!(derived.name(), stage.name());
    }

    #[test]
    fn stage_type_serializes_screaming() {
        let json = serde_json::to_value(StageType::Deliver).unwrap();
        assert_eq!(json, "DELIVER");
    }
}
