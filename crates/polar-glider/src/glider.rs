//! Glider polar entity: construction, rescaling, derived metrics.

use polar_core::{
    glide_ratio_factor, horizontal_tangent_line, intersection, normalize_speed,
    origin_tangent_line, sample_grid, Quadratic, TangentLine,
};

use crate::config::{Method, PolarRecord};
use crate::error::{ConfigError, GliderError, ValidationError};

/// The ABC form is quadratic in speed/100 ("hundred km/h" units).
const ABC_SPEED_DIVISOR: f64 = 100.0;

/// Tolerance for the weight vs wing-loading consistency check: the
/// databases round wing loading to two decimals.
const LOADING_TOL: f64 = 5e-3 + 1e-9;

/// One characteristic point of the polar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Performance {
    pub speed: f64,
    pub sink_rate: f64,
    pub glide_ratio: f64,
}

/// A tangent line sampled for rendering, with its touch point.
#[derive(Clone, Debug, PartialEq)]
pub struct TangentOverlay {
    /// Line values at the requested speeds.
    pub line: Vec<f64>,
    /// Speed where the line touches the curve (display units).
    pub touch_speed: f64,
    /// Sink rate at the touch point.
    pub touch_sink: f64,
}

/// Raw calibration data, kept for display and debugging.
#[derive(Clone, Debug, PartialEq)]
pub enum Calibration {
    ThreePoints {
        /// As given, before unit normalization.
        speeds: [f64; 3],
        sink_rates: [f64; 3],
    },
    Abc { a: f64, b: f64, c: f64 },
}

/// A glider's speed polar with its identity and physical parameters.
///
/// `model` is mutated in place by [`rescale`](Self::rescale);
/// `init_model` and `init_wing_loading` are the construction-time
/// baseline and never change afterwards.
#[derive(Clone, Debug)]
pub struct GliderPolar {
    name: String,
    source: String,
    method: Method,
    calibration: Calibration,
    wing_area: f64,
    max_ballast: f64,
    weight: f64,
    wing_loading: f64,
    init_wing_loading: f64,
    model: Quadratic,
    init_model: Quadratic,
}

impl GliderPolar {
    /// Builds the entity from a database record, fitting its initial
    /// model. Fails loudly on unknown methods, missing variant fields,
    /// and physically invalid parameters.
    pub fn from_record(record: &PolarRecord) -> Result<Self, GliderError> {
        let method = Method::parse(&record.method).ok_or_else(|| ConfigError::UnknownMethod {
            value: record.method.clone(),
        })?;

        if record.wing_area <= 0.0 {
            return Err(ValidationError::WingArea { value: record.wing_area }.into());
        }
        if record.max_ballast < 0.0 {
            return Err(ValidationError::MaxBallast { value: record.max_ballast }.into());
        }
        let (weight, wing_loading) = resolve_loading(record)?;

        let (calibration, model) = match method {
            Method::ThreePoints => {
                let speeds = three(record, "speed", record.speed.as_deref())?;
                let sinks = three(record, "sink_rate", record.sink_rate.as_deref())?;
                let normalized: Vec<f64> = speeds.iter().map(|&s| normalize_speed(s)).collect();
                let model = Quadratic::fit(&normalized, &sinks)?;
                (Calibration::ThreePoints { speeds, sink_rates: sinks }, model)
            }
            Method::Abc => {
                let a = scalar(record, "A", record.a)?;
                let b = scalar(record, "B", record.b)?;
                let c = scalar(record, "C", record.c)?;
                // Sign-inverted so sink rate points down.
                let model = Quadratic::new(-a, -b, -c)?;
                (Calibration::Abc { a, b, c }, model)
            }
        };

        Ok(Self {
            name: record.name.clone(),
            source: record.source.clone(),
            method,
            calibration,
            wing_area: record.wing_area,
            max_ballast: record.max_ballast,
            weight,
            wing_loading,
            init_wing_loading: wing_loading,
            model,
            init_model: model,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn wing_area(&self) -> f64 {
        self.wing_area
    }

    pub fn max_ballast(&self) -> f64 {
        self.max_ballast
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn wing_loading(&self) -> f64 {
        self.wing_loading
    }

    pub fn init_wing_loading(&self) -> f64 {
        self.init_wing_loading
    }

    /// Sink rate of the current model at one speed (display units).
    pub fn curve_at(&self, speed: f64) -> f64 {
        self.model.eval(self.to_model_x(speed))
    }

    /// Sink rates of the current model over a speed range.
    pub fn curve(&self, speeds: &[f64]) -> Vec<f64> {
        speeds.iter().map(|&s| self.curve_at(s)).collect()
    }

    /// Sink rate of the construction-time reference model.
    pub fn init_curve_at(&self, speed: f64) -> f64 {
        self.init_model.eval(self.to_model_x(speed))
    }

    /// Sink rates of the reference model over a speed range.
    pub fn init_curve(&self, speeds: &[f64]) -> Vec<f64> {
        speeds.iter().map(|&s| self.init_curve_at(s)).collect()
    }

    /// Rescales the polar to a new wing loading.
    ///
    /// Samples the *current* curve on the fixed grid, scales speeds and
    /// sink rates by √(new/current), and refits. Repeated calls
    /// compound, so rescaling to W1 then W2 lands on the same curve as
    /// rescaling straight to W2 (within fit tolerance).
    pub fn rescale(&mut self, new_wing_loading: f64) -> Result<(), GliderError> {
        if !new_wing_loading.is_finite() || new_wing_loading <= 0.0 {
            return Err(ValidationError::WingLoading { value: new_wing_loading }.into());
        }

        let speeds = sample_grid();
        let sinks = self.curve(&speeds);
        let factor = (new_wing_loading / self.wing_loading).sqrt();

        // Refit happens in the model's native units, so ABC speeds go
        // through the /100 first.
        let new_x: Vec<f64> = speeds.iter().map(|&v| self.to_model_x(v) * factor).collect();
        let new_y: Vec<f64> = sinks.iter().map(|&vz| vz * factor).collect();

        self.model = Quadratic::fit(&new_x, &new_y)?;
        self.wing_loading = new_wing_loading;
        Ok(())
    }

    /// Minimum sink rate: the horizontal-tangent (vertex) point of the
    /// current model. Infallible because a live model always has a
    /// usable leading coefficient.
    pub fn min_sink_rate(&self) -> Performance {
        let (x, sink) = self.model.vertex();
        let speed = self.from_model_x(x);
        Performance { speed, sink_rate: sink, glide_ratio: glide_ratio(speed, sink) }
    }

    /// Maximum glide ratio: the point where the line through the origin
    /// is tangent to the current model.
    pub fn max_glide_ratio(&self) -> Result<Performance, GliderError> {
        let x = self.model.origin_tangent_speed()?;
        let sink = self.model.eval(x);
        let speed = self.from_model_x(x);
        Ok(Performance { speed, sink_rate: sink, glide_ratio: glide_ratio(speed, sink) })
    }

    /// Horizontal tangent sampled at `speeds`, for chart overlays.
    pub fn tangent_horizontal(&self, speeds: &[f64]) -> Result<TangentOverlay, GliderError> {
        let seed = self.tangent_seed();
        let (_, line) = horizontal_tangent_line(
            |x| self.model.eval(x),
            |x| self.model.slope(x),
            seed,
        )?;
        self.overlay(line, speeds, seed)
    }

    /// Tangent through the origin sampled at `speeds`, for chart
    /// overlays.
    pub fn tangent_at_origin(&self, speeds: &[f64]) -> Result<TangentOverlay, GliderError> {
        let seed = self.tangent_seed();
        let (_, line) = origin_tangent_line(
            |x| self.model.eval(x),
            |x| self.model.slope(x),
            seed,
        )?;
        self.overlay(line, speeds, seed)
    }

    fn overlay(
        &self,
        line: TangentLine,
        speeds: &[f64],
        seed: f64,
    ) -> Result<TangentOverlay, GliderError> {
        let (ix, iy) = intersection(line, |x| self.model.eval(x), seed)?;
        let ys: Vec<f64> = speeds.iter().map(|&s| line.eval(self.to_model_x(s))).collect();
        Ok(TangentOverlay { line: ys, touch_speed: self.from_model_x(ix), touch_sink: iy })
    }

    /// Display-unit speed -> model-unit abscissa.
    fn to_model_x(&self, speed: f64) -> f64 {
        match self.method {
            Method::Abc => speed / ABC_SPEED_DIVISOR,
            Method::ThreePoints => speed,
        }
    }

    /// Model-unit abscissa -> display-unit speed.
    fn from_model_x(&self, x: f64) -> f64 {
        match self.method {
            Method::Abc => x * ABC_SPEED_DIVISOR,
            Method::ThreePoints => x,
        }
    }

    /// Root-finder seed at the 100 km/h order of magnitude, in model
    /// units, so the physically meaningful root is selected.
    fn tangent_seed(&self) -> f64 {
        match self.method {
            Method::Abc => 1.0,
            Method::ThreePoints => normalize_speed(100.0),
        }
    }
}

fn glide_ratio(speed: f64, sink: f64) -> f64 {
    -speed / (glide_ratio_factor() * sink)
}

fn resolve_loading(record: &PolarRecord) -> Result<(f64, f64), GliderError> {
    match (record.weight, record.wing_loading) {
        (None, None) => Err(ValidationError::MissingLoading {
            name: record.name.clone(),
            source_name: record.source.clone(),
        }
        .into()),
        (Some(weight), Some(wing_loading)) => {
            let derived = weight / record.wing_area;
            if (derived - wing_loading).abs() > LOADING_TOL {
                return Err(ValidationError::InconsistentLoading {
                    name: record.name.clone(),
                    source_name: record.source.clone(),
                    wing_loading,
                    derived,
                    weight,
                    wing_area: record.wing_area,
                }
                .into());
            }
            Ok((weight, wing_loading))
        }
        (Some(weight), None) => {
            // Databases round derived wing loading to two decimals.
            let wing_loading = (weight / record.wing_area * 100.0).round() / 100.0;
            Ok((weight, wing_loading))
        }
        (None, Some(wing_loading)) => Ok((wing_loading * record.wing_area, wing_loading)),
    }
}

fn three(
    record: &PolarRecord,
    field: &'static str,
    values: Option<&[f64]>,
) -> Result<[f64; 3], GliderError> {
    let values = values.ok_or_else(|| missing(record, field))?;
    <[f64; 3]>::try_from(values).map_err(|_| {
        ConfigError::BadArity {
            name: record.name.clone(),
            source_name: record.source.clone(),
            field,
            got: values.len(),
        }
        .into()
    })
}

fn scalar(
    record: &PolarRecord,
    field: &'static str,
    value: Option<f64>,
) -> Result<f64, GliderError> {
    value.ok_or_else(|| missing(record, field))
}

fn missing(record: &PolarRecord, field: &'static str) -> GliderError {
    ConfigError::MissingField {
        name: record.name.clone(),
        source_name: record.source.clone(),
        method: if record.method == "ABC" { "ABC" } else { "3-points" },
        field,
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn three_point_record() -> PolarRecord {
        PolarRecord {
            name: "Test 3pt".into(),
            source: "unit".into(),
            method: "3-points".into(),
            wing_area: 10.0,
            max_ballast: 100.0,
            wing_loading: None,
            weight: Some(330.0),
            speed: Some(vec![90.0, 120.0, 160.0]),
            sink_rate: Some(vec![-0.6, -0.65, -1.1]),
            a: None,
            b: None,
            c: None,
        }
    }

    fn abc_record() -> PolarRecord {
        PolarRecord {
            name: "Test ABC".into(),
            source: "unit".into(),
            method: "ABC".into(),
            wing_area: 11.0,
            max_ballast: 120.0,
            wing_loading: Some(31.0),
            weight: None,
            speed: None,
            sink_rate: None,
            a: Some(1.2),
            b: Some(-2.4),
            c: Some(2.0),
        }
    }

    #[test]
    fn derives_wing_loading_from_weight() {
        let glider = GliderPolar::from_record(&three_point_record()).unwrap();
        assert_relative_eq!(glider.wing_loading(), 33.0);
        assert_relative_eq!(glider.init_wing_loading(), 33.0);
        assert_relative_eq!(glider.weight(), 330.0);
        assert_eq!(glider.method(), Method::ThreePoints);
    }

    #[test]
    fn derives_weight_from_wing_loading() {
        let glider = GliderPolar::from_record(&abc_record()).unwrap();
        assert_relative_eq!(glider.weight(), 31.0 * 11.0);
    }

    #[test]
    fn rejects_non_positive_wing_area() {
        let mut rec = three_point_record();
        rec.wing_area = 0.0;
        let err = GliderPolar::from_record(&rec).unwrap_err();
        assert!(matches!(
            err,
            GliderError::Validation(ValidationError::WingArea { .. })
        ));
    }

    #[test]
    fn rejects_inconsistent_weight_and_loading() {
        let mut rec = three_point_record();
        rec.weight = Some(80.0);
        rec.wing_area = 10.0;
        rec.wing_loading = Some(9.0); // derived would be 8.0
        let err = GliderPolar::from_record(&rec).unwrap_err();
        assert!(matches!(
            err,
            GliderError::Validation(ValidationError::InconsistentLoading { .. })
        ));
    }

    #[test]
    fn accepts_consistent_weight_and_loading() {
        let mut rec = three_point_record();
        rec.wing_loading = Some(33.0);
        assert!(GliderPolar::from_record(&rec).is_ok());
    }

    #[test]
    fn rejects_missing_loading_and_weight() {
        let mut rec = three_point_record();
        rec.weight = None;
        let err = GliderPolar::from_record(&rec).unwrap_err();
        assert!(matches!(
            err,
            GliderError::Validation(ValidationError::MissingLoading { .. })
        ));
    }

    #[test]
    fn rejects_unknown_method() {
        let mut rec = three_point_record();
        rec.method = "by-hand".into();
        let err = GliderPolar::from_record(&rec).unwrap_err();
        match err {
            GliderError::Config(ConfigError::UnknownMethod { value }) => {
                assert_eq!(value, "by-hand");
            }
            other => panic!("expected UnknownMethod, got {other}"),
        }
    }

    #[test]
    fn rejects_missing_abc_coefficient() {
        let mut rec = abc_record();
        rec.c = None;
        let err = GliderPolar::from_record(&rec).unwrap_err();
        assert!(matches!(
            err,
            GliderError::Config(ConfigError::MissingField { field: "C", .. })
        ));
    }

    #[test]
    fn rejects_wrong_speed_arity() {
        let mut rec = three_point_record();
        rec.speed = Some(vec![90.0, 120.0]);
        let err = GliderPolar::from_record(&rec).unwrap_err();
        assert!(matches!(
            err,
            GliderError::Config(ConfigError::BadArity { field: "speed", got: 2, .. })
        ));
    }

    #[test]
    fn three_point_curve_passes_through_the_calibration_points() {
        let glider = GliderPolar::from_record(&three_point_record()).unwrap();
        assert_relative_eq!(glider.curve_at(90.0), -0.6, epsilon = 1e-9);
        assert_relative_eq!(glider.curve_at(120.0), -0.65, epsilon = 1e-9);
        assert_relative_eq!(glider.curve_at(160.0), -1.1, epsilon = 1e-9);
    }

    #[test]
    fn abc_curve_matches_the_analytic_form() {
        let glider = GliderPolar::from_record(&abc_record()).unwrap();
        let (a, b, c) = (1.2, -2.4, 2.0);
        for speed in [60.0, 100.0, 150.0, 200.0] {
            let u = speed / 100.0;
            let expected = -a * u * u - b * u - c;
            assert_relative_eq!(glider.curve_at(speed), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn min_sink_lies_near_the_lowest_sink_sample() {
        let glider = GliderPolar::from_record(&three_point_record()).unwrap();
        let msr = glider.min_sink_rate();
        assert!(msr.speed > 90.0 && msr.speed < 130.0, "speed {}", msr.speed);
        assert!(msr.sink_rate > -0.7 && msr.sink_rate < -0.5, "sink {}", msr.sink_rate);
        assert!(msr.glide_ratio > 0.0);
    }

    #[test]
    fn max_glide_beats_the_vertex_glide() {
        let glider = GliderPolar::from_record(&three_point_record()).unwrap();
        let msr = glider.min_sink_rate();
        let mgr = glider.max_glide_ratio().unwrap();
        assert!(mgr.glide_ratio > msr.glide_ratio);
        assert!(mgr.speed > msr.speed);
    }

    #[test]
    fn abc_metrics_come_back_in_display_units() {
        let glider = GliderPolar::from_record(&abc_record()).unwrap();
        let msr = glider.min_sink_rate();
        // Vertex of −1.2u²+2.4u−2.0 is at u = 1, i.e. 100 km/h.
        assert_relative_eq!(msr.speed, 100.0, epsilon = 1e-9);
        assert_relative_eq!(msr.sink_rate, -0.8, epsilon = 1e-12);
    }

    #[test]
    fn rescale_rejects_non_positive_loading() {
        let mut glider = GliderPolar::from_record(&three_point_record()).unwrap();
        for bad in [0.0, -5.0, f64::NAN] {
            let err = glider.rescale(bad).unwrap_err();
            assert!(matches!(
                err,
                GliderError::Validation(ValidationError::WingLoading { .. })
            ));
        }
    }

    #[test]
    fn rescale_to_the_current_loading_is_a_no_op() {
        let mut glider = GliderPolar::from_record(&three_point_record()).unwrap();
        let before = glider.min_sink_rate();
        glider.rescale(glider.wing_loading()).unwrap();
        let after = glider.min_sink_rate();
        assert_relative_eq!(before.speed, after.speed, epsilon = 1e-6);
        assert_relative_eq!(before.sink_rate, after.sink_rate, epsilon = 1e-6);
    }

    #[test]
    fn rescale_keeps_the_initial_model() {
        let mut glider = GliderPolar::from_record(&three_point_record()).unwrap();
        let init_before = glider.init_curve_at(120.0);
        glider.rescale(40.0).unwrap();
        assert_relative_eq!(glider.init_curve_at(120.0), init_before);
        assert_relative_eq!(glider.init_wing_loading(), 33.0);
        assert_relative_eq!(glider.wing_loading(), 40.0);
        // Heavier glider sinks faster at the same speed.
        assert!(glider.curve_at(120.0) < init_before);
    }

    #[test]
    fn tangent_overlays_touch_the_curve() {
        let glider = GliderPolar::from_record(&three_point_record()).unwrap();
        let speeds: Vec<f64> = (50..=230).step_by(5).map(f64::from).collect();

        let horiz = glider.tangent_horizontal(&speeds).unwrap();
        let msr = glider.min_sink_rate();
        assert_relative_eq!(horiz.touch_speed, msr.speed, epsilon = 1e-2);
        assert_relative_eq!(horiz.line[0], msr.sink_rate, epsilon = 1e-9);

        let origin = glider.tangent_at_origin(&speeds).unwrap();
        let mgr = glider.max_glide_ratio().unwrap();
        assert_relative_eq!(origin.touch_speed, mgr.speed, epsilon = 1e-1);
        // The curve is concave, so the origin tangent stays above it.
        for (&s, &y) in speeds.iter().zip(&origin.line) {
            assert!(y >= glider.curve_at(s) - 1e-6, "line below curve at {s}");
        }
    }
}
