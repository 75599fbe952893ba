use thiserror::Error;

use polar_core::{CurveError, FitError, RootError};

// The polar's data source is plain identity data, so the field is
// named `source_name`: thiserror reserves `source` for chained errors.

/// Bad or incomplete polar record.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown glider polar method {value:?}")]
    UnknownMethod { value: String },
    #[error("{method} polar {name} / {source_name} is missing field {field:?}")]
    MissingField {
        name: String,
        source_name: String,
        method: &'static str,
        field: &'static str,
    },
    #[error("field {field:?} of {name} / {source_name} must hold exactly 3 values, got {got}")]
    BadArity {
        name: String,
        source_name: String,
        field: &'static str,
        got: usize,
    },
}

/// Physically invalid parameters.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("invalid wing area {value} m2 (must be > 0)")]
    WingArea { value: f64 },
    #[error("invalid max ballast {value} kg (must be >= 0)")]
    MaxBallast { value: f64 },
    #[error("either wing_loading or weight must be given for glider {name} / {source_name}")]
    MissingLoading { name: String, source_name: String },
    #[error(
        "{name} / {source_name}: wing loading is {wing_loading} kg/m2 instead of {derived:.2} kg/m2 \
         for a weight of {weight} kg and a wing area of {wing_area} m2"
    )]
    InconsistentLoading {
        name: String,
        source_name: String,
        wing_loading: f64,
        derived: f64,
        weight: f64,
        wing_area: f64,
    },
    #[error("invalid wing loading {value} kg/m2 (must be > 0)")]
    WingLoading { value: f64 },
}

/// Anything that can go wrong constructing or operating a glider polar.
#[derive(Debug, Error)]
pub enum GliderError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Fit(#[from] FitError),
    #[error(transparent)]
    Curve(#[from] CurveError),
    #[error(transparent)]
    Root(#[from] RootError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn identity_fields_are_data_not_chained_sources() {
        let err = ValidationError::InconsistentLoading {
            name: "LS4".into(),
            source_name: "factory".into(),
            wing_loading: 9.0,
            derived: 8.0,
            weight: 80.0,
            wing_area: 10.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("LS4 / factory"), "message was {msg:?}");
        assert!(msg.contains("instead of 8.00"), "message was {msg:?}");
        // The data source is identity text, not an error chain.
        assert!(err.source().is_none());

        let err = ConfigError::MissingField {
            name: "ASW 19".into(),
            source_name: "xcsoar".into(),
            method: "ABC",
            field: "C",
        };
        assert!(err.to_string().contains("ASW 19 / xcsoar"));
        assert!(err.source().is_none());
    }
}
