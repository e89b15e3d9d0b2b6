//! Canned stage constructors for common pipeline steps.
//!
//! Thin conveniences over [`Stage::new`]: they pin the stage type and the
//! conventional input names so chains assembled from them line up with what
//! the computation tools expect (notably `heat_in` on DELIVER stages).

use crate::values::ValueSpec;

use super::{Stage, StageType};

/// Electrolysis step: electricity in, hydrogen out.
pub fn electricity_to_hydrogen_stage(name: impl Into<String>, electricity_in: ValueSpec) -> Stage {
    Stage::new(name, StageType::Convert).with_input("electricity_in", electricity_in)
}

/// Direct electric heating step.
pub fn electricity_to_heat_stage(name: impl Into<String>, electricity_in: ValueSpec) -> Stage {
    Stage::new(name, StageType::Convert).with_input("electricity_in", electricity_in)
}

/// Storage hold step.
pub fn storage_hold_stage(name: impl Into<String>, stored_energy: ValueSpec) -> Stage {
    Stage::new(name, StageType::Store).with_input("stored_energy", stored_energy)
}

/// Auxiliary compressor step.
pub fn aux_compressor_stage(name: impl Into<String>, electric_power_in: ValueSpec) -> Stage {
    Stage::new(name, StageType::Aux).with_input("electric_power_in", electric_power_in)
}

/// Fuel cell step: fuel in, electricity and heat out.
pub fn fuel_cell_stage(name: impl Into<String>, fuel_in: ValueSpec) -> Stage {
    Stage::new(name, StageType::Convert).with_input("fuel_in", fuel_in)
}

/// Heat exchanger delivering to the district-heating boundary. This is the
/// DELIVER stage every chain must end with; `heat_in` and `tb_k` are exactly
/// what [`compute_stage`](super::compute_stage) requires.
pub fn heat_exchanger_to_dh_stage(
    name: impl Into<String>,
    heat_in: ValueSpec,
    tb_k: ValueSpec,
) -> Stage {
    Stage::new(name, StageType::Deliver)
        .with_input("heat_in", heat_in)
        .with_tb_k(tb_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{assumption_value, Meta};
    use serde_json::Value;

    fn noted(value: f64, unit: &str, note: &str) -> ValueSpec {
        let mut m = Meta::new();
        m.insert("note".into(), Value::from(note));
        assumption_value(value, unit, Some(m))
    }

    #[test]
    fn library_stages_have_expected_shapes() {
        let hx = heat_exchanger_to_dh_stage(
            "hx",
            noted(1000.0, "J", "q"),
            noted(353.15, "K", "tb"),
        );
        assert_eq!(hx.stage_type(), StageType::Deliver);
        assert!(hx.inputs().contains_key("heat_in"));
        assert!(hx.tb_k().is_some());

        let tank = storage_hold_stage("tank", noted(5000.0, "J", "held"));
        assert_eq!(tank.stage_type(), StageType::Store);
        assert!(tank.inputs().contains_key("stored_energy"));

        let aux = aux_compressor_stage("comp", noted(10.0, "J", "el"));
        assert_eq!(aux.stage_type(), StageType::Aux);

        let fc = fuel_cell_stage("fc", noted(20.0, "J", "h2"));
        let ely = electricity_to_hydrogen_stage("ely", noted(30.0, "J", "el"));
        let eh = electricity_to_heat_stage("boiler", noted(40.0, "J", "el"));
        for s in [&fc, &ely, &eh] {
            assert_eq!(s.stage_type(), StageType::Convert);
        }
    }
}
