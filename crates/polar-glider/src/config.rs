//! Polar record schema and the fitting-method tag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fitting methods this core can build a model from.
///
/// Stores may hold records of other methods (historical databases carry
/// e.g. "by-hand" entries); those stay listable as raw records but
/// cannot be turned into a [`GliderPolar`](crate::GliderPolar).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Quadratic through three measured (speed, sink rate) pairs.
    ThreePoints,
    /// Historical analytic form: sink = −A·(v/100)² − B·(v/100) − C.
    Abc,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::ThreePoints => "3-points",
            Method::Abc => "ABC",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "3-points" => Some(Method::ThreePoints),
            "ABC" => Some(Method::Abc),
            _ => None,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a polar database, as stored on disk.
///
/// The schema mirrors the historical JSON files, including the space in
/// the `"max ballast"` key. `method` stays a free string here; it is
/// resolved to a [`Method`] when the entity is constructed. Exactly one
/// of `wing_loading`/`weight` is required (both allowed when mutually
/// consistent); the variant fields (`speed`/`sink_rate` vs `A`/`B`/`C`)
/// are optional at this level and checked at construction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PolarRecord {
    pub name: String,
    pub source: String,
    pub method: String,
    pub wing_area: f64,
    #[serde(rename = "max ballast")]
    pub max_ballast: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wing_loading: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sink_rate: Option<Vec<f64>>,
    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
    #[serde(rename = "B", default, skip_serializing_if = "Option::is_none")]
    pub b: Option<f64>,
    #[serde(rename = "C", default, skip_serializing_if = "Option::is_none")]
    pub c: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_three_point_record() {
        let json = r#"{
            "name": "LS4", "source": "factory", "method": "3-points",
            "wing_area": 10.5, "max ballast": 121.0, "weight": 345.0,
            "speed": [90.0, 120.0, 160.0], "sink_rate": [-0.6, -0.65, -1.1]
        }"#;
        let rec: PolarRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.method, "3-points");
        assert_eq!(rec.max_ballast, 121.0);
        assert_eq!(rec.speed.as_deref(), Some(&[90.0, 120.0, 160.0][..]));
        assert!(rec.wing_loading.is_none());
    }

    #[test]
    fn parses_an_abc_record_and_round_trips() {
        let json = r#"{
            "name": "ASW 19", "source": "xcsoar", "method": "ABC",
            "wing_area": 11.0, "max ballast": 125.0, "wing_loading": 31.0,
            "A": 1.2, "B": -2.4, "C": 2.0
        }"#;
        let rec: PolarRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.a, Some(1.2));

        // The historical key spelling survives serialization.
        let out = serde_json::to_value(&rec).unwrap();
        assert!(out.get("max ballast").is_some());
        assert!(out.get("speed").is_none());
    }

    #[test]
    fn method_tag_round_trips() {
        assert_eq!(Method::parse("3-points"), Some(Method::ThreePoints));
        assert_eq!(Method::parse("ABC"), Some(Method::Abc));
        assert_eq!(Method::parse("by-hand"), None);
        assert_eq!(Method::ThreePoints.to_string(), "3-points");
    }
}
