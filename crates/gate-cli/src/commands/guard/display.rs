//! Text shown to the guard at the terminal.

use chrono::{DateTime, TimeZone};
use gate_core::pass::PassPayload;
use gate_core::record::CheckInRecord;
use gate_core::validity::Verdict;

/// Multi-line summary of a scanned pass.
pub fn verdict_card<Tz: TimeZone>(verdict: &Verdict, now_millis: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match verdict {
        Verdict::Valid(pass) => {
            let left = pass.valid_until_millis().saturating_sub(now_millis);
            format!(
                "VALID  {}\n{}\n  issued {}, valid for another {}",
                pass.visitor_full_name(),
                details_line(pass),
                issued_at(pass, tz),
                human_duration(left)
            )
        }
        Verdict::Expired(pass) => {
            let over = now_millis.saturating_sub(pass.valid_until_millis());
            format!(
                "EXPIRED  {}\n{}\n  issued {}, expired {} ago",
                pass.visitor_full_name(),
                details_line(pass),
                issued_at(pass, tz),
                human_duration(over)
            )
        }
        Verdict::Malformed { reason } => format!("INVALID PASS  {reason}"),
    }
}

/// One-line confirmation after a record is saved.
pub fn logged_line<Tz: TimeZone>(record: &CheckInRecord, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "Logged {} for {} to {} at {}",
        record.outcome,
        record.visitor_full_name,
        record.destination_label,
        record.check_in_time_iso.with_timezone(tz).format("%H:%M:%S")
    )
}

fn details_line(pass: &PassPayload) -> String {
    format!(
        "  IC {} | plate {} | {}",
        pass.id_number(),
        pass.vehicle_plate(),
        pass.destination_label()
    )
}

fn issued_at<Tz: TimeZone>(pass: &PassPayload, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    DateTime::from_timestamp_millis(pass.issued_at_millis()).map_or_else(
        || "at an unreadable time".to_string(),
        |at| at.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// `1d 2h`, `3h 5m`, `42s`.
pub fn human_duration(millis: i64) -> String {
    let secs = millis.max(0) / 1000;
    let (days, hours, minutes) = (secs / 86_400, secs % 86_400 / 3600, secs % 3600 / 60);
    if days > 0 {
        format!("{days}d {hours}h")
    } else if hours > 0 {
        format!("{hours}h {minutes}m")
    } else if minutes > 0 {
        format!("{minutes}m")
    } else {
        format!("{secs}s")
    }
}
