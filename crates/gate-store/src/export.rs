//! CSV export of check-in records.
//!
//! Columns: `ID,Visitor Name,IC Number,Car Plate,Destination,Check-In Time,Status`.
//! The note column is left out. Text fields are always quoted.

use chrono::{NaiveDate, TimeZone};
use gate_core::pass::NO_VEHICLE_PLATE;
use gate_core::record::CheckInRecord;

pub const CSV_HEADER: &str = "ID,Visitor Name,IC Number,Car Plate,Destination,Check-In Time,Status";

/// Render records as CSV, check-in times shown in `tz`. Lines end with `\n`.
pub fn export_csv<Tz: TimeZone>(records: &[CheckInRecord], tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for record in records {
        let plate = if record.vehicle_plate.trim().is_empty() {
            NO_VEHICLE_PLATE
        } else {
            record.vehicle_plate.as_str()
        };
        let time = record
            .check_in_time_iso
            .with_timezone(tz)
            .format("%Y-%m-%d %H:%M:%S");
        let row = [
            quote_if_needed(&record.id),
            quote(&record.visitor_full_name),
            quote(&record.id_number),
            quote(plate),
            quote(&record.destination_label),
            time.to_string(),
            record.outcome.as_str().to_string(),
        ];
        out.push_str(&row.join(","));
        out.push('\n');
    }
    out
}

/// Default download name, e.g. `visitor_logs_2026-03-02.csv`.
pub fn default_file_name(day: NaiveDate) -> String {
    format!("visitor_logs_{}.csv", day.format("%Y-%m-%d"))
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn quote_if_needed(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        quote(field)
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, FixedOffset, Utc};
    use gate_core::enums::Outcome;
    use pretty_assertions::assert_eq;

    use super::*;

    fn record(name: &str, plate: &str) -> CheckInRecord {
        CheckInRecord {
            id: "7d3f0c2a-1b2c-4d5e-8f90-123456789abc".to_string(),
            visitor_full_name: name.to_string(),
            id_number: "901020105555".to_string(),
            vehicle_plate: plate.to_string(),
            destination_label: "Blk A - 10 - 05".to_string(),
            check_in_time_iso: DateTime::parse_from_rfc3339("2026-03-02T01:15:00Z")
                .unwrap()
                .with_timezone(&Utc),
            outcome: Outcome::Granted,
            note: "not exported".to_string(),
        }
    }

    #[test]
    fn empty_export_is_header_only() {
        assert_eq!(export_csv::<Utc>(&[], &Utc), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn row_layout() {
        let csv = export_csv(&[record("Ali", "WXY 1234")], &Utc);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(
            lines[1],
            "7d3f0c2a-1b2c-4d5e-8f90-123456789abc,\"Ali\",\"901020105555\",\"WXY 1234\",\"Blk A - 10 - 05\",2026-03-02 01:15:00,GRANTED"
        );
        assert!(!csv.contains("not exported"));
    }

    #[test]
    fn embedded_quotes_and_commas_are_escaped() {
        let csv = export_csv(&[record("Ali \"Boss\", Jr", "")], &Utc);
        assert!(csv.contains("\"Ali \"\"Boss\"\", Jr\""));
        assert!(csv.contains("\"N/A\""));
    }

    #[test]
    fn times_render_in_zone() {
        let myt = FixedOffset::east_opt(8 * 3600).unwrap();
        let csv = export_csv(&[record("Ali", "N/A")], &myt);
        assert!(csv.contains("2026-03-02 09:15:00"));
    }

    #[test]
    fn file_name_uses_date() {
        let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        assert_eq!(default_file_name(day), "visitor_logs_2026-03-02.csv");
    }
}
