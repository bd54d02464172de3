use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Outcome;
use crate::pass::PassPayload;

/// A confirmed check-in. Appended once to the log store, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub id: String,
    pub visitor_full_name: String,
    pub id_number: String,
    pub vehicle_plate: String,
    pub destination_label: String,
    pub check_in_time_iso: DateTime<Utc>,
    pub outcome: Outcome,
    pub note: String,
}

impl CheckInRecord {
    /// Snapshot a scanned pass at confirmation time.
    #[must_use]
    pub fn from_pass(
        id: String,
        payload: &PassPayload,
        outcome: Outcome,
        check_in_time_iso: DateTime<Utc>,
        note: String,
    ) -> Self {
        Self {
            id,
            visitor_full_name: payload.visitor_full_name().to_string(),
            id_number: payload.id_number().to_string(),
            vehicle_plate: payload.vehicle_plate().to_string(),
            destination_label: payload.destination_label(),
            check_in_time_iso,
            outcome,
            note,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::pass::{VisitorDetails, issue_pass};

    #[test]
    fn from_pass_copies_fields() {
        let clock = FixedClock::new(1_700_000_000_000);
        let details = VisitorDetails {
            full_name: "Ali".to_string(),
            phone_number: "0123".to_string(),
            id_number: "901020105555".to_string(),
            vehicle_plate: None,
            block_code: "A".to_string(),
            lot_code: "10".to_string(),
            unit_code: "05".to_string(),
        };
        let pass = issue_pass(&details, &clock).unwrap();
        clock.advance(60_000);

        let record = CheckInRecord::from_pass(
            "rec-1".to_string(),
            &pass,
            Outcome::Granted,
            clock.now(),
            "ok".to_string(),
        );

        assert_eq!(record.visitor_full_name, "Ali");
        assert_eq!(record.vehicle_plate, "N/A");
        assert_eq!(record.destination_label, "Blk A - 10 - 05");
        assert_eq!(record.check_in_time_iso.timestamp_millis(), 1_700_000_060_000);
    }

    #[test]
    fn serializes_camel_case_with_iso_time() {
        let record = CheckInRecord {
            id: "rec-1".to_string(),
            visitor_full_name: "Ali".to_string(),
            id_number: "901020105555".to_string(),
            vehicle_plate: "N/A".to_string(),
            destination_label: "Blk A - 10 - 05".to_string(),
            check_in_time_iso: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            outcome: Outcome::Expired,
            note: String::new(),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["checkInTimeIso"], "2023-11-14T22:13:20Z");
        assert_eq!(value["outcome"], "EXPIRED");

        let back: CheckInRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }
}
