// src/scoring.rs
//! Safety score: a fixed linear penalty over geofence risk and anomaly count.
//!
//! score = 100 - (geofence_risk * 10 + anomalies * 20), floored at 0.
//!
//! Integer inputs stay on exact integer arithmetic so the response carries a JSON
//! integer; any fractional input switches the whole computation to `f64`.
//!
//! serde_json without `arbitrary_precision` hands integers beyond the i64/u64
//! range over as `f64`, so e.g. `-100000000000000000000` is scored on the float
//! path (`1e21`) rather than as an exact integer.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ScoreError;

pub const BASE_SCORE: i128 = 100;
pub const GEOFENCE_WEIGHT: i128 = 10;
pub const ANOMALY_WEIGHT: i128 = 20;

pub const DEFAULT_GEOFENCE_RISK: Numeric = Numeric::Whole(1);
pub const DEFAULT_ANOMALIES: Numeric = Numeric::Whole(0);

/// A JSON number as the formula sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Whole(i128),
    Fractional(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Whole(n) => n as f64,
            Numeric::Fractional(x) => x,
        }
    }

    fn from_json(field: &'static str, value: &Value) -> Result<Self, ScoreError> {
        let Value::Number(n) = value else {
            return Err(ScoreError::InvalidInput {
                field,
                found: json_kind(value).to_string(),
            });
        };
        if let Some(i) = n.as_i64() {
            Ok(Numeric::Whole(i128::from(i)))
        } else if let Some(u) = n.as_u64() {
            Ok(Numeric::Whole(i128::from(u)))
        } else {
            // integers past u64/i64 land here too, already rounded to f64
            // serde_json only yields finite floats here
            Ok(Numeric::Fractional(n.as_f64().unwrap_or_default()))
        }
    }
}

impl Serialize for Numeric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Numeric::Whole(n) => {
                if let Ok(i) = i64::try_from(n) {
                    serializer.serialize_i64(i)
                } else if let Ok(u) = u64::try_from(n) {
                    serializer.serialize_u64(u)
                } else {
                    serializer.serialize_f64(n as f64)
                }
            }
            Numeric::Fractional(x) => serializer.serialize_f64(x),
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Parsed `/calculate` payload with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreRequest {
    /// Accepted and carried along; not part of the formula.
    pub telemetry: Value,
    pub geofence_risk: Numeric,
    pub anomalies: Numeric,
}

impl Default for ScoreRequest {
    fn default() -> Self {
        Self {
            telemetry: Value::Object(Map::new()),
            geofence_risk: DEFAULT_GEOFENCE_RISK,
            anomalies: DEFAULT_ANOMALIES,
        }
    }
}

impl ScoreRequest {
    /// Pull the known keys out of a loose JSON object. Absent keys take their
    /// defaults; a key that is present must hold a number (explicit `null` is rejected).
    pub fn from_payload(payload: &Map<String, Value>) -> Result<Self, ScoreError> {
        let mut req = Self::default();
        if let Some(t) = payload.get("telemetry") {
            req.telemetry = t.clone();
        }
        if let Some(v) = payload.get("geofence_risk") {
            req.geofence_risk = Numeric::from_json("geofence_risk", v)?;
        }
        if let Some(v) = payload.get("anomalies") {
            req.anomalies = Numeric::from_json("anomalies", v)?;
        }
        Ok(req)
    }

    pub fn has_telemetry(&self) -> bool {
        match &self.telemetry {
            Value::Null => false,
            Value::Object(m) => !m.is_empty(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreResponse {
    pub safety_score: Numeric,
}

/// Apply the formula. Never negative; unbounded above.
///
/// Float inputs near `f64::MAX` can overflow to `+inf` or cancel into `NaN`;
/// neither is a number JSON can carry, so they come back as `OutOfRange`.
/// An overflow to `-inf` still clamps to 0.
pub fn safety_score(req: &ScoreRequest) -> Result<Numeric, ScoreError> {
    match (req.geofence_risk, req.anomalies) {
        (Numeric::Whole(g), Numeric::Whole(a)) => {
            // i128 holds any JSON integer times the weights without overflow
            let raw = BASE_SCORE - (g * GEOFENCE_WEIGHT + a * ANOMALY_WEIGHT);
            Ok(Numeric::Whole(raw.max(0)))
        }
        (g, a) => {
            let raw = BASE_SCORE as f64
                - (g.as_f64() * GEOFENCE_WEIGHT as f64 + a.as_f64() * ANOMALY_WEIGHT as f64);
            if raw < 0.0 {
                Ok(Numeric::Whole(0))
            } else if raw.is_finite() {
                Ok(Numeric::Fractional(raw))
            } else {
                Err(ScoreError::OutOfRange {
                    geofence_risk: g.as_f64(),
                    anomalies: a.as_f64(),
                })
            }
        }
    }
}

/// Parse the payload and score it.
pub fn calculate(payload: &Map<String, Value>) -> Result<ScoreResponse, ScoreError> {
    let req = ScoreRequest::from_payload(payload)?;
    let score = safety_score(&req)?;
    debug!(
        geofence_risk = ?req.geofence_risk,
        anomalies = ?req.anomalies,
        telemetry = req.has_telemetry(),
        safety_score = ?score,
        "scored factors"
    );
    Ok(ScoreResponse {
        safety_score: score,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn score_of(v: Value) -> Numeric {
        let Value::Object(map) = v else {
            panic!("test payload must be an object");
        };
        calculate(&map).expect("numeric payload").safety_score
    }

    fn calculate_json(v: Value) -> Result<ScoreResponse, ScoreError> {
        let Value::Object(map) = v else {
            panic!("test payload must be an object");
        };
        calculate(&map)
    }

    #[test]
    fn empty_payload_uses_defaults() {
        assert_eq!(score_of(json!({})), Numeric::Whole(90));
    }

    #[test]
    fn exact_zero_and_negative_both_clamp() {
        assert_eq!(
            score_of(json!({"geofence_risk": 10, "anomalies": 0})),
            Numeric::Whole(0)
        );
        assert_eq!(
            score_of(json!({"geofence_risk": 20, "anomalies": 5})),
            Numeric::Whole(0)
        );
    }

    #[test]
    fn formula_holds_over_a_grid() {
        for g in -5..=12i64 {
            for a in -3..=6i64 {
                let expected = (100 - (10 * g + 20 * a)).max(0);
                let got = score_of(json!({"geofence_risk": g, "anomalies": a}));
                assert_eq!(got, Numeric::Whole(i128::from(expected)), "g={g} a={a}");
            }
        }
    }

    #[test]
    fn negative_factors_push_above_hundred() {
        assert_eq!(
            score_of(json!({"geofence_risk": -2, "anomalies": 0})),
            Numeric::Whole(120)
        );
    }

    #[test]
    fn fractional_factor_switches_to_float() {
        let s = score_of(json!({"geofence_risk": 2.5, "anomalies": 1}));
        assert_eq!(s, Numeric::Fractional(55.0));
        assert_eq!(serde_json::to_value(s).unwrap(), json!(55.0));
    }

    #[test]
    fn fractional_negative_clamps_to_integer_zero() {
        let s = score_of(json!({"geofence_risk": 9.5, "anomalies": 0.5}));
        assert_eq!(s, Numeric::Whole(0));
        assert_eq!(serde_json::to_value(s).unwrap(), json!(0));
    }

    #[test]
    fn huge_integers_do_not_overflow() {
        let s = score_of(json!({"geofence_risk": i64::MIN, "anomalies": 0}));
        let Numeric::Whole(n) = s else {
            panic!("expected whole score");
        };
        assert!(n > i128::from(i64::MAX));
        assert_eq!(
            score_of(json!({"geofence_risk": u64::MAX, "anomalies": 0})),
            Numeric::Whole(0)
        );
    }

    #[test]
    fn telemetry_is_accepted_but_ignored() {
        let with = score_of(json!({"telemetry": {"hr": 180, "spo2": 80}, "anomalies": 1}));
        let without = score_of(json!({"anomalies": 1}));
        assert_eq!(with, without);
    }

    #[test]
    fn non_numeric_factor_is_invalid_input() {
        for bad in [json!("3"), json!(true), Value::Null, json!([1]), json!({})] {
            let payload = json!({ "anomalies": bad });
            let Value::Object(map) = payload else { unreachable!() };
            match calculate(&map) {
                Err(ScoreError::InvalidInput { field, .. }) => assert_eq!(field, "anomalies"),
                other => panic!("expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn float_overflow_to_infinity_is_out_of_range() {
        let res = calculate_json(json!({"geofence_risk": -1e308}));
        assert!(
            matches!(res, Err(ScoreError::OutOfRange { .. })),
            "got {res:?}"
        );
    }

    #[test]
    fn infinite_cancellation_is_out_of_range() {
        let res = calculate_json(json!({"geofence_risk": 1e308, "anomalies": -1e308}));
        assert!(
            matches!(res, Err(ScoreError::OutOfRange { .. })),
            "got {res:?}"
        );
    }

    #[test]
    fn float_overflow_to_negative_infinity_clamps() {
        assert_eq!(score_of(json!({"geofence_risk": 1e308})), Numeric::Whole(0));
    }

    #[test]
    fn successful_scores_always_serialise_as_numbers() {
        for payload in [
            json!({"geofence_risk": 1e307}),
            json!({"geofence_risk": -1e306, "anomalies": 0.5}),
            json!({"anomalies": -3}),
        ] {
            if let Ok(resp) = calculate_json(payload.clone()) {
                let v = serde_json::to_value(resp).unwrap();
                assert!(v["safety_score"].is_number(), "{payload} -> {v}");
            }
        }
    }

    #[test]
    fn integers_beyond_u64_take_the_float_path() {
        assert_eq!(
            score_of(json!({"geofence_risk": -1e20})),
            Numeric::Fractional(100.0 + 1e21)
        );
        let Value::Object(map) =
            serde_json::from_str::<Value>(r#"{"geofence_risk": -100000000000000000000}"#).unwrap()
        else {
            unreachable!()
        };
        assert!(matches!(
            calculate(&map).unwrap().safety_score,
            Numeric::Fractional(_)
        ));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        assert_eq!(score_of(json!({"zone": "A", "foo": [1, 2]})), Numeric::Whole(90));
    }

    #[test]
    fn has_telemetry_reflects_content() {
        assert!(!ScoreRequest::default().has_telemetry());
        let Value::Object(map) = json!({"telemetry": {"x": 1}}) else { unreachable!() };
        assert!(ScoreRequest::from_payload(&map).unwrap().has_telemetry());
    }
}
