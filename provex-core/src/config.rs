//! Frozen Science Configuration
//!
//! The comparison basis every analysis shares: the functional unit ("what is
//! one unit of useful output?") and the delivery boundary ("where is useful
//! output counted?"). Both are frozen value objects injected by the caller
//! at startup — never module-level mutable state — so the core stays
//! testable with alternate functional-unit definitions.

use serde::{Deserialize, Serialize};

/// The fixed basis of comparison all compared systems must share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionalUnit {
    /// Useful heat delivered at the boundary, in MWh.
    pub delivered_heat_mwh: f64,
    /// Human-readable definition of the basis.
    pub description: String,
}

impl Default for FunctionalUnit {
    fn default() -> Self {
        Self {
            delivered_heat_mwh: 1.0,
            description: "1 MWh useful heat delivered to DH delivery boundary".to_string(),
        }
    }
}

/// Delivery boundary specification: the named interface at which a system's
/// useful output is counted. Ts/Tr carry units only; the actual temperature
/// values belong to the [`Scenario`](crate::scenario::Scenario).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundarySpec {
    /// Boundary name/label. Must be non-empty for computations to proceed.
    pub name: String,
    /// Unit of the supply temperature at this boundary.
    pub ts_unit: String,
    /// Unit of the return temperature at this boundary.
    pub tr_unit: String,
}

impl BoundarySpec {
    /// Boundary with the given name and Kelvin supply/return units.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ts_unit: "K".to_string(),
            tr_unit: "K".to_string(),
        }
    }
}

impl Default for BoundarySpec {
    fn default() -> Self {
        Self::named("district_heating_delivery_boundary")
    }
}

/// Bundle of the frozen comparison definitions, injected at startup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScienceConfig {
    /// The shared comparison basis.
    pub functional_unit: FunctionalUnit,
    /// The shared useful-output boundary.
    pub boundary: BoundarySpec,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_one_mwh_at_dh_boundary() {
        let cfg = ScienceConfig::default();
        assert_eq!(cfg.functional_unit.delivered_heat_mwh, 1.0);
        assert_eq!(cfg.boundary.name, "district_heating_delivery_boundary");
        assert_eq!(cfg.boundary.ts_unit, "K");
    }
}
