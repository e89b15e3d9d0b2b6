//! Physical Constants and Policy Tolerances
//!
//! Conversion factors and numerical tolerances used across the engine.
//! All values are exact SI definitions or explicit policy choices; nothing
//! here is tunable at runtime (runtime-injected configuration lives in
//! [`config`](crate::config)).

// ===== TEMPERATURE =====

/// Offset between the Celsius and Kelvin scales (K).
///
/// `T[K] = T[°C] + 273.15`. Exact by definition of the Celsius scale.
///
/// Source: BIPM SI Brochure, 9th edition (2019)
pub const CELSIUS_TO_KELVIN_OFFSET: f64 = 273.15;

// ===== ENERGY CONVERSION =====

/// Joules per watt-hour (J/Wh). Exact: 1 Wh = 3600 J.
pub const JOULES_PER_WATT_HOUR: f64 = 3.6e3;

/// Joules per kilowatt-hour (J/kWh). Exact: 1 kWh = 3.6 MJ.
pub const JOULES_PER_KILOWATT_HOUR: f64 = 3.6e6;

/// Joules per megawatt-hour (J/MWh). Exact: 1 MWh = 3.6 GJ.
pub const JOULES_PER_MEGAWATT_HOUR: f64 = 3.6e9;

// ===== POLICY TOLERANCES =====

/// Numerical-noise tolerance for exergy destruction (J).
///
/// A computed destruction in `[-EX_DEST_TOLERANCE_J, 0)` is treated as
/// floating-point noise and clamped to exactly `0.0`; anything below the
/// tolerance is a second-law violation and is refused.
pub const EX_DEST_TOLERANCE_J: f64 = 1e-9;

/// Upper bound above which an exergy efficiency triggers a non-fatal
/// warning in the result metadata.
///
/// Values slightly above 1 can be legitimate under mismatched boundary
/// definitions, so this is a warning threshold, not a refusal.
pub const EFFICIENCY_WARN_MAX: f64 = 1.2;
