//! Log review: search, outcome and date filters, day grouping.
//!
//! Calendar days are evaluated in a caller-supplied time zone. The CLI uses
//! `chrono::Local`; tests pin `Utc`.

use chrono::{NaiveDate, TimeZone};
use gate_core::enums::Outcome;
use gate_core::record::CheckInRecord;
use serde::Serialize;

/// Which calendar days to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateFilter {
    #[default]
    All,
    Today,
}

/// Guard-facing log filter. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Free-text search over name, id number, plate and destination.
    pub search: String,
    /// Keep only this outcome; `None` keeps all.
    pub outcome: Option<Outcome>,
    pub date: DateFilter,
}

impl LogFilter {
    /// Whether `record` passes every criterion. `today` is the current
    /// calendar day in `tz`.
    pub fn matches<Tz: TimeZone>(&self, record: &CheckInRecord, today: NaiveDate, tz: &Tz) -> bool {
        self.matches_search(record)
            && self.outcome.is_none_or(|o| o == record.outcome)
            && match self.date {
                DateFilter::All => true,
                DateFilter::Today => day_of(record, tz) == today,
            }
    }

    fn matches_search(&self, record: &CheckInRecord) -> bool {
        let term = self.search.trim();
        if term.is_empty() {
            return true;
        }
        let lower = term.to_lowercase();
        record.visitor_full_name.to_lowercase().contains(&lower)
            // id numbers are digits; match them as typed
            || record.id_number.contains(term)
            || record.vehicle_plate.to_lowercase().contains(&lower)
            || record.destination_label.to_lowercase().contains(&lower)
    }
}

/// Calendar day of a record's check-in time in `tz`.
pub fn day_of<Tz: TimeZone>(record: &CheckInRecord, tz: &Tz) -> NaiveDate {
    record.check_in_time_iso.with_timezone(tz).date_naive()
}

/// Records passing `filter`, in input order.
pub fn filter_records<Tz: TimeZone>(
    records: &[CheckInRecord],
    filter: &LogFilter,
    today: NaiveDate,
    tz: &Tz,
) -> Vec<CheckInRecord> {
    records
        .iter()
        .filter(|r| filter.matches(r, today, tz))
        .cloned()
        .collect()
}

/// Records checked in on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    pub day: NaiveDate,
    pub records: Vec<CheckInRecord>,
}

/// Group records by calendar day, newest day first. Records within a day
/// keep their input order.
pub fn group_by_day<Tz: TimeZone>(records: &[CheckInRecord], tz: &Tz) -> Vec<DayGroup> {
    let mut groups: Vec<DayGroup> = Vec::new();
    for record in records {
        let day = day_of(record, tz);
        match groups.iter_mut().find(|g| g.day == day) {
            Some(group) => group.records.push(record.clone()),
            None => groups.push(DayGroup {
                day,
                records: vec![record.clone()],
            }),
        }
    }
    groups.sort_by(|a, b| b.day.cmp(&a.day));
    groups
}

/// Number of records checked in on `day`.
pub fn count_on_day<Tz: TimeZone>(records: &[CheckInRecord], day: NaiveDate, tz: &Tz) -> usize {
    records.iter().filter(|r| day_of(r, tz) == day).count()
}
