//! Validity evaluator: scanned text + now → tri-state verdict.
//!
//! Parsing is an explicit schema check over a JSON object. Every required
//! field is checked for presence and type before a [`PassPayload`] is built,
//! and any deviation becomes [`Verdict::Malformed`]. Nothing in here returns
//! an error or touches I/O.
//!
//! Passes written by earlier issuers used different field names
//! (`fullName`, `icNumber`, `carPlate`, `blockNumber`, `lotNumber`,
//! `unitNumber`, `timestamp`); those are accepted as aliases.

use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::clock::Clock;
use crate::enums::{Outcome, VerdictKind};
use crate::pass::{NO_VEHICLE_PLATE, PassPayload};

/// 24 hours. A pass whose age exceeds this is expired.
pub const VALIDITY_WINDOW_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Outcome of evaluating one scanned string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "verdict", content = "pass", rename_all = "snake_case")]
pub enum Verdict {
    Valid(PassPayload),
    /// Outside the validity window. The payload is kept for display.
    Expired(PassPayload),
    Malformed {
        reason: String,
    },
}

impl Verdict {
    #[must_use]
    pub const fn kind(&self) -> VerdictKind {
        match self {
            Self::Valid(_) => VerdictKind::Valid,
            Self::Expired(_) => VerdictKind::Expired,
            Self::Malformed { .. } => VerdictKind::Malformed,
        }
    }

    #[must_use]
    pub const fn payload(&self) -> Option<&PassPayload> {
        match self {
            Self::Valid(payload) | Self::Expired(payload) => Some(payload),
            Self::Malformed { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.kind().outcome()
    }
}

/// Why scanned text was not accepted as a pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("not a JSON document: {0}")]
    NotJson(String),

    #[error("expected a JSON object")]
    NotObject,

    #[error("missing required field `{0}`")]
    Missing(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field `{0}` must not be blank")]
    Blank(&'static str),
}

/// Evaluate raw scanned text at `now_millis`.
#[must_use]
pub fn evaluate(raw: &str, now_millis: i64) -> Verdict {
    match parse_payload(raw) {
        Err(violation) => Verdict::Malformed {
            reason: violation.to_string(),
        },
        Ok(payload) if payload.age_millis(now_millis) > VALIDITY_WINDOW_MILLIS => {
            Verdict::Expired(payload)
        }
        // Future-dated passes (negative age) are accepted.
        Ok(payload) => Verdict::Valid(payload),
    }
}

/// Evaluate raw scanned text against an injected clock.
#[must_use]
pub fn evaluate_with(raw: &str, clock: &dyn Clock) -> Verdict {
    evaluate(raw, clock.now_millis())
}

/// Check the shape of scanned text and build a payload from it.
///
/// # Errors
///
/// Returns the first [`SchemaViolation`] found.
pub fn parse_payload(raw: &str) -> Result<PassPayload, SchemaViolation> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| SchemaViolation::NotJson(e.to_string()))?;
    let Value::Object(obj) = value else {
        return Err(SchemaViolation::NotObject);
    };

    let visitor_full_name = required_text(&obj, "visitorFullName", "fullName")?;
    let id_number = required_text(&obj, "idNumber", "icNumber")?;
    let block_code = required_text(&obj, "blockCode", "blockNumber")?;
    let lot_code = required_text(&obj, "lotCode", "lotNumber")?;
    let unit_code = required_text(&obj, "unitCode", "unitNumber")?;
    let issued_at_millis = required_integer(&obj, "issuedAtMillis", "timestamp")?;
    let phone_number = optional_text(&obj, "phoneNumber", "phoneNumber")?.unwrap_or_default();
    let vehicle_plate = optional_text(&obj, "vehiclePlate", "carPlate")?
        .filter(|plate| !plate.trim().is_empty())
        .unwrap_or_else(|| NO_VEHICLE_PLATE.to_string());

    Ok(PassPayload::from_parts(
        visitor_full_name,
        phone_number,
        id_number,
        vehicle_plate,
        block_code,
        lot_code,
        unit_code,
        issued_at_millis,
    ))
}

/// `null` counts as absent, so a null current-name key still falls back to the
/// legacy alias.
fn lookup<'a>(obj: &'a Map<String, Value>, name: &str, legacy: &str) -> Option<&'a Value> {
    let present = move |key: &str| obj.get(key).filter(|v| !v.is_null());
    present(name).or_else(|| present(legacy))
}

fn required_text(
    obj: &Map<String, Value>,
    name: &'static str,
    legacy: &str,
) -> Result<String, SchemaViolation> {
    let value = lookup(obj, name, legacy).ok_or(SchemaViolation::Missing(name))?;
    let text = value.as_str().ok_or(SchemaViolation::WrongType {
        field: name,
        expected: "a string",
    })?;
    if text.trim().is_empty() {
        return Err(SchemaViolation::Blank(name));
    }
    Ok(text.to_string())
}

fn optional_text(
    obj: &Map<String, Value>,
    name: &'static str,
    legacy: &str,
) -> Result<Option<String>, SchemaViolation> {
    lookup(obj, name, legacy)
        .map(|value| {
            value
                .as_str()
                .map(str::to_string)
                .ok_or(SchemaViolation::WrongType {
                    field: name,
                    expected: "a string",
                })
        })
        .transpose()
}

fn required_integer(
    obj: &Map<String, Value>,
    name: &'static str,
    legacy: &str,
) -> Result<i64, SchemaViolation> {
    let value = lookup(obj, name, legacy).ok_or(SchemaViolation::Missing(name))?;
    value.as_i64().ok_or(SchemaViolation::WrongType {
        field: name,
        expected: "an integer",
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::clock::FixedClock;

    const T: i64 = 1_700_000_000_000;

    fn sample(issued: i64) -> String {
        json!({
            "visitorFullName": "Ali",
            "phoneNumber": "0123456789",
            "idNumber": "901020105555",
            "vehiclePlate": "ABC 123",
            "blockCode": "A",
            "lotCode": "10",
            "unitCode": "05",
            "issuedAtMillis": issued,
        })
        .to_string()
    }

    #[test]
    fn within_window_is_valid() {
        let verdict = evaluate(&sample(T), T + 1_000);
        assert_eq!(verdict.kind(), VerdictKind::Valid);
        assert_eq!(verdict.payload().unwrap().visitor_full_name(), "Ali");
    }

    #[test]
    fn window_boundary_is_inclusive() {
        assert!(evaluate(&sample(T), T + VALIDITY_WINDOW_MILLIS).is_valid());
        assert_eq!(
            evaluate(&sample(T), T + VALIDITY_WINDOW_MILLIS + 1).kind(),
            VerdictKind::Expired
        );
    }

    #[test]
    fn expired_keeps_payload() {
        let verdict = evaluate(&sample(T), T + 86_400_001);
        let Verdict::Expired(payload) = verdict else {
            panic!("expected expired verdict");
        };
        assert_eq!(payload.id_number(), "901020105555");
        assert_eq!(payload.destination_label(), "Blk A - 10 - 05");
    }

    #[test]
    fn future_dated_pass_is_valid() {
        assert!(evaluate(&sample(T + 3_600_000), T).is_valid());
    }

    #[test]
    fn extreme_timestamps_do_not_overflow() {
        assert!(evaluate(&sample(i64::MAX), i64::MIN).is_valid());
        assert_eq!(
            evaluate(&sample(i64::MIN), i64::MAX).kind(),
            VerdictKind::Expired
        );
    }

    #[test]
    fn legacy_field_names_are_accepted() {
        let raw = json!({
            "fullName": "Ali",
            "phoneNumber": "0123456789",
            "icNumber": "901020105555",
            "carPlate": "N/A",
            "blockNumber": "A",
            "lotNumber": "10",
            "unitNumber": "05",
            "timestamp": T,
        })
        .to_string();

        let verdict = evaluate(&raw, T + 1);
        let payload = verdict.payload().unwrap();
        assert_eq!(payload.id_number(), "901020105555");
        assert_eq!(payload.block_code(), "A");
        assert_eq!(payload.issued_at_millis(), T);
    }

    #[test]
    fn null_current_name_falls_back_to_legacy_alias() {
        let raw = json!({
            "visitorFullName": null,
            "fullName": "Ali",
            "idNumber": "901020105555",
            "blockCode": "A",
            "lotCode": "10",
            "unitCode": "05",
            "issuedAtMillis": null,
            "timestamp": T,
            "vehiclePlate": null,
            "carPlate": "wxy 1",
        })
        .to_string();

        let verdict = evaluate(&raw, T);
        let payload = verdict.payload().unwrap();
        assert_eq!(payload.visitor_full_name(), "Ali");
        assert_eq!(payload.issued_at_millis(), T);
        assert_eq!(payload.vehicle_plate(), "wxy 1");
    }

    #[test]
    fn null_without_alias_is_missing() {
        let mut value: Value = serde_json::from_str(&sample(T)).unwrap();
        value["idNumber"] = Value::Null;
        assert_eq!(
            parse_payload(&value.to_string()).unwrap_err(),
            SchemaViolation::Missing("idNumber")
        );
    }

    #[test]
    fn optional_fields_default() {
        let raw = json!({
            "visitorFullName": "Ali",
            "idNumber": "901020105555",
            "blockCode": "A",
            "lotCode": "10",
            "unitCode": "05",
            "issuedAtMillis": T,
        })
        .to_string();

        let verdict = evaluate(&raw, T);
        let payload = verdict.payload().unwrap();
        assert_eq!(payload.phone_number(), "");
        assert_eq!(payload.vehicle_plate(), NO_VEHICLE_PLATE);
    }

    #[test]
    fn violations_are_specific() {
        assert_eq!(parse_payload("[]").unwrap_err(), SchemaViolation::NotObject);
        assert!(matches!(
            parse_payload("{\"visitorFullName\":").unwrap_err(),
            SchemaViolation::NotJson(_)
        ));

        let mut value: Value = serde_json::from_str(&sample(T)).unwrap();
        value["issuedAtMillis"] = json!("1700000000000");
        assert_eq!(
            parse_payload(&value.to_string()).unwrap_err(),
            SchemaViolation::WrongType {
                field: "issuedAtMillis",
                expected: "an integer",
            }
        );

        value["issuedAtMillis"] = json!(T);
        value["lotCode"] = json!("  ");
        assert_eq!(
            parse_payload(&value.to_string()).unwrap_err(),
            SchemaViolation::Blank("lotCode")
        );
    }

    #[test]
    fn malformed_carries_reason() {
        let verdict = evaluate("{}", T);
        assert_eq!(
            verdict,
            Verdict::Malformed {
                reason: "missing required field `visitorFullName`".to_string()
            }
        );
        assert_eq!(verdict.outcome(), Outcome::Denied);
    }

    #[test]
    fn evaluate_with_reads_clock() {
        let clock = FixedClock::new(T + 1_000);
        assert!(evaluate_with(&sample(T), &clock).is_valid());

        clock.set(T + 86_400_001);
        assert_eq!(
            evaluate_with(&sample(T), &clock).kind(),
            VerdictKind::Expired
        );
    }

    #[test]
    fn verdict_serializes_with_tag() {
        let value = serde_json::to_value(evaluate(&sample(T), T)).unwrap();
        assert_eq!(value["verdict"], "valid");
        assert_eq!(value["pass"]["blockCode"], "A");

        let value = serde_json::to_value(evaluate("", T)).unwrap();
        assert_eq!(value["verdict"], "malformed");
        assert!(value["pass"]["reason"].is_string());
    }
}
