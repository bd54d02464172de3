//! Serialized records and verdicts validate against their exported schemas.

use chrono::DateTime;
use gate_core::clock::FixedClock;
use gate_core::enums::Outcome;
use gate_core::pass::{PassPayload, VisitorDetails, issue_pass};
use gate_core::record::CheckInRecord;
use gate_core::validity::{Verdict, evaluate};
use schemars::schema_for;

fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

fn pass() -> PassPayload {
    let details = VisitorDetails {
        full_name: "Ali".to_string(),
        phone_number: "0123456789".to_string(),
        id_number: "901020105555".to_string(),
        vehicle_plate: Some("wa 1234 x".to_string()),
        block_code: "a".to_string(),
        lot_code: "10".to_string(),
        unit_code: "05".to_string(),
    };
    issue_pass(&details, &FixedClock::new(1_760_000_000_000)).unwrap()
}

#[test]
fn record_matches_schema() {
    let record = CheckInRecord::from_pass(
        "2b1c7c0e-3f7e-4c53-9a55-1f2d7f3e9b10".to_string(),
        &pass(),
        Outcome::Granted,
        DateTime::from_timestamp(1_760_000_600, 0).unwrap(),
        "Visitor Ali checked in to Blk A - 10 - 05.".to_string(),
    );

    let schema = serde_json::to_value(schema_for!(CheckInRecord)).unwrap();
    let instance = serde_json::to_value(&record).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "record schema errors: {errors:?}");
}

#[test]
fn record_with_unknown_outcome_is_rejected() {
    let schema = serde_json::to_value(schema_for!(CheckInRecord)).unwrap();
    let instance = serde_json::json!({
        "id": "x",
        "visitorFullName": "Ali",
        "idNumber": "901020105555",
        "vehiclePlate": "N/A",
        "destinationLabel": "Blk A - 10 - 05",
        "checkInTimeIso": "2025-10-09T08:50:00Z",
        "outcome": "MAYBE",
        "note": ""
    });
    assert!(!validate_against_schema(&schema, &instance).is_empty());
}

#[test]
fn encoded_pass_matches_payload_schema() {
    let schema = serde_json::to_value(schema_for!(PassPayload)).unwrap();
    let instance: serde_json::Value = serde_json::from_str(&pass().encode().unwrap()).unwrap();
    let errors = validate_against_schema(&schema, &instance);
    assert!(errors.is_empty(), "pass schema errors: {errors:?}");
}

#[test]
fn verdicts_match_schema() {
    let schema = serde_json::to_value(schema_for!(Verdict)).unwrap();
    let text = pass().encode().unwrap();

    for verdict in [
        evaluate(&text, 1_760_000_001_000),
        evaluate(&text, 1_770_000_000_000),
        evaluate("garbage", 0),
    ] {
        let instance = serde_json::to_value(&verdict).unwrap();
        let errors = validate_against_schema(&schema, &instance);
        assert!(errors.is_empty(), "{:?}: {errors:?}", verdict.kind());
    }
}
