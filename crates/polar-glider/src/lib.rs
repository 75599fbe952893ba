//! polar-glider
//!
//! The glider polar entity on top of `polar-core`:
//! - the JSON record schema polar databases use
//! - the two fitting methods ("3-points" and "ABC")
//! - construction with physical-parameter validation
//! - wing-loading rescaling and the derived performance metrics
//!   (minimum sink rate, maximum glide ratio)

mod config;
mod error;
mod glider;

pub use config::{Method, PolarRecord};
pub use error::{ConfigError, GliderError, ValidationError};
pub use glider::{Calibration, GliderPolar, Performance, TangentOverlay};
