//! Unit and Temperature Normalization
//!
//! ## Overview
//!
//! Safe, refusal-guarded conversion of tagged quantities into the units the
//! computation tools require: Kelvin for temperatures, Joule for energy.
//! Conversions never guess — an unrecognized temperature scale or an
//! undeclared energy basis is refused, not interpreted.
//!
//! Both tools return a **new** [`ValueSpec`] with the converted value and
//! unit while preserving provenance, citation and metadata; the original is
//! left untouched for audit.
//!
//! ## Policy
//!
//! - Temperatures: `K` passes through (after a positivity check); `°C`
//!   converts via `K = C + 273.15`; anything else refuses with
//!   `REFUSE_TEMP_UNIT_UNKNOWN`.
//! - Energy: `Wh`/`kWh`/`MWh` convert with exact factors once
//!   `meta["energy_kind"]` declares a basis; `J` passes through; any other
//!   unit passes through *unchanged* — refusal responsibility belongs to the
//!   downstream tool that requires Joule.

use serde::{Deserialize, Serialize};

use crate::constants::{
    CELSIUS_TO_KELVIN_OFFSET, JOULES_PER_KILOWATT_HOUR, JOULES_PER_MEGAWATT_HOUR,
    JOULES_PER_WATT_HOUR,
};
use crate::errors::Refusal;
use crate::guardrails::{
    refuse_if_temp_unit_unknown, refuse_if_temperature_not_positive,
    refuse_if_unit_ambiguous_energy,
};
use crate::values::ValueSpec;

/// The Kelvin unit string.
pub const KELVIN: &str = "K";

/// The Joule unit string.
pub const JOULE: &str = "J";

/// Temperature units the normalizer understands. `"C"` is accepted as a
/// plain-ASCII spelling of `"°C"`.
pub const TEMPERATURE_UNITS: [&str; 3] = ["K", "°C", "C"];

/// Energy units that are ambiguous without a declared basis.
pub const AMBIGUOUS_ENERGY_UNITS: [&str; 3] = ["Wh", "kWh", "MWh"];

/// Declared basis of a Wh/kWh/MWh quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyKind {
    /// Heat.
    Thermal,
    /// Electricity.
    Electric,
    /// Fuel energy on a lower-heating-value basis.
    Lhv,
    /// Fuel energy on a higher-heating-value basis.
    Hhv,
}

impl EnergyKind {
    /// Parse a declared `meta["energy_kind"]` string. Case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "thermal" => Some(Self::Thermal),
            "electric" => Some(Self::Electric),
            "lhv" => Some(Self::Lhv),
            "hhv" => Some(Self::Hhv),
            _ => None,
        }
    }

    /// Canonical spelling used in metadata.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Thermal => "thermal",
            Self::Electric => "electric",
            Self::Lhv => "LHV",
            Self::Hhv => "HHV",
        }
    }
}

/// Normalize a temperature to Kelvin.
///
/// Accepts `K` or `°C` (`K = C + 273.15`), validates positivity, and returns
/// a new [`ValueSpec`] in Kelvin preserving provenance, citation and
/// metadata. Refuses with `REFUSE_TEMP_UNIT_UNKNOWN` for any other unit and
/// `REFUSE_TEMPERATURE_NOT_POSITIVE` for results at or below 0 K.
pub fn normalize_temperature_to_k(v: &ValueSpec) -> Result<ValueSpec, Refusal> {
    let unit = v.unit().trim();
    refuse_if_temp_unit_unknown(unit, "temperature")?;

    let kelvin = if unit == KELVIN {
        v.value()
    } else {
        v.value() + CELSIUS_TO_KELVIN_OFFSET
    };
    refuse_if_temperature_not_positive(kelvin, "temperature")?;

    if unit != KELVIN {
        log::debug!("normalized {} {} to {} K", v.value(), unit, kelvin);
    }
    Ok(v.converted(kelvin, KELVIN))
}

/// Convert an energy quantity to Joule.
///
/// `Wh`/`kWh`/`MWh` require an unambiguous `meta["energy_kind"]` and convert
/// with exact factors (`×3600`, `×3.6e6`, `×3.6e9`); `J` passes through;
/// any other unit passes through unchanged — no implicit guessing.
pub fn convert_energy_to_j(v: &ValueSpec) -> Result<ValueSpec, Refusal> {
    let factor = match v.unit().trim() {
        "Wh" => JOULES_PER_WATT_HOUR,
        "kWh" => JOULES_PER_KILOWATT_HOUR,
        "MWh" => JOULES_PER_MEGAWATT_HOUR,
        _ => return Ok(v.clone()),
    };

    refuse_if_unit_ambiguous_energy(v)?;
    let joules = v.value() * factor;
    log::debug!("converted {} {} to {} J", v.value(), v.unit(), joules);
    Ok(v.converted(joules, JOULE))
}
