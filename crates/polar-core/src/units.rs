//! Speed unit mode and the fixed resampling grid.
//!
//! The unit mode is process-wide, explicit state: it is set once (at
//! startup, before any polar is built) via [`set_speed_unit`] and read
//! through [`speed_unit`], which defaults to km/h when never set. The
//! `_in` variants take the unit as a parameter and carry the actual
//! arithmetic; the mode-reading wrappers delegate to them.

use std::fmt;
use std::sync::OnceLock;

use thiserror::Error;

/// Factor to convert km/h to m/s.
pub const KM_H_TO_M_S: f64 = 3.6;

/// Resampling grid lower bound, km/h.
pub const CURVE_START_KM_H: f64 = 50.0;
/// Resampling grid upper bound, km/h.
pub const CURVE_END_KM_H: f64 = 230.0;

/// Grid spacing used to derive the sample count, in grid units.
const GRID_STEP: f64 = 5.0;

/// Unit of every speed crossing the public API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedUnit {
    /// Kilometres per hour (historical polar databases).
    KmH,
    /// Metres per second.
    Ms,
}

impl fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedUnit::KmH => f.write_str("km/h"),
            SpeedUnit::Ms => f.write_str("m/s"),
        }
    }
}

#[derive(Debug, Error)]
#[error("speed unit already set to {current}, cannot switch to {requested}")]
pub struct UnitModeError {
    pub current: SpeedUnit,
    pub requested: SpeedUnit,
}

static SPEED_UNIT: OnceLock<SpeedUnit> = OnceLock::new();

/// Selects the process-wide speed unit. First call wins; a later call
/// with a different unit errors. Call before constructing any polar.
pub fn set_speed_unit(unit: SpeedUnit) -> Result<(), UnitModeError> {
    let current = *SPEED_UNIT.get_or_init(|| unit);
    if current == unit {
        Ok(())
    } else {
        Err(UnitModeError { current, requested: unit })
    }
}

/// The active speed unit; km/h unless [`set_speed_unit`] chose otherwise.
pub fn speed_unit() -> SpeedUnit {
    *SPEED_UNIT.get().unwrap_or(&SpeedUnit::KmH)
}

/// Converts a km/h calibration speed into `unit`.
pub fn normalize_speed_in(unit: SpeedUnit, speed: f64) -> f64 {
    match unit {
        SpeedUnit::KmH => speed,
        SpeedUnit::Ms => speed / KM_H_TO_M_S,
    }
}

/// [`normalize_speed_in`] for the active unit mode.
pub fn normalize_speed(speed: f64) -> f64 {
    normalize_speed_in(speed_unit(), speed)
}

/// Denominator applied to the sink rate when forming a glide ratio,
/// so the ratio is always speed[m/s] over sink[m/s].
pub fn glide_ratio_factor() -> f64 {
    match speed_unit() {
        SpeedUnit::KmH => KM_H_TO_M_S,
        SpeedUnit::Ms => 1.0,
    }
}

/// Grid lower bound in the active unit mode.
pub fn curve_start() -> f64 {
    normalize_speed(CURVE_START_KM_H)
}

/// Grid upper bound in the active unit mode.
pub fn curve_end() -> f64 {
    normalize_speed(CURVE_END_KM_H)
}

fn sample_count_in(unit: SpeedUnit) -> usize {
    let span = normalize_speed_in(unit, CURVE_END_KM_H) - normalize_speed_in(unit, CURVE_START_KM_H);
    (span / GRID_STEP).floor() as usize + 1
}

/// Number of samples on the fixed resampling grid. Independent of wing
/// loading; depends only on the unit mode.
pub fn sample_count() -> usize {
    sample_count_in(speed_unit())
}

/// Evenly spaced speeds between the grid bounds, in `unit`.
pub fn sample_grid_in(unit: SpeedUnit) -> Vec<f64> {
    let start = normalize_speed_in(unit, CURVE_START_KM_H);
    let end = normalize_speed_in(unit, CURVE_END_KM_H);
    let n = sample_count_in(unit);
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

/// [`sample_grid_in`] for the active unit mode.
pub fn sample_grid() -> Vec<f64> {
    sample_grid_in(speed_unit())
}
