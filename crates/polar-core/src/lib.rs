//! polar-core
//!
//! Core speed-polar math:
//! - Quadratic sink-rate model with least-squares fitting
//! - Speed unit mode (km/h vs m/s) and the fixed resampling grid
//! - Tangent solvers: horizontal tangent (minimum sink) and tangent
//!   through the origin (best glide), closed-form and iterative
//!
//! The polar convention throughout: sink rate is negative (descending),
//! so a realistic polar has `a < 0` and its vertex is the point of least
//! sink. All speed-domain values are in the active unit mode unless a
//! function says otherwise.

mod error;
mod quadratic;
mod roots;
mod tangent;
mod units;

pub use error::{CurveError, FitError, RootError};
pub use quadratic::Quadratic;
pub use roots::find_root;
pub use tangent::{horizontal_tangent_line, intersection, origin_tangent_line, TangentLine};
pub use units::{
    curve_end, curve_start, glide_ratio_factor, normalize_speed, normalize_speed_in, sample_count,
    sample_grid, sample_grid_in, set_speed_unit, speed_unit, SpeedUnit, UnitModeError,
    CURVE_END_KM_H, CURVE_START_KM_H, KM_H_TO_M_S,
};
