//! A ready-made `@date` namespace.
//!
//! Time of day is the most common thing templates branch on, so the crate
//! ships a namespace built from a reference time:
//!
//! ```text
//! @date.hours      0..=23
//! @date.minutes    0..=59
//! @date.meridiem   "am" | "pm"
//! @date.weekday    "monday" .. "sunday"
//! @date.weekend    true on saturday/sunday
//! @date.part       "morning" | "afternoon" | "evening" | "night"
//! @date::getTime[...]   same fields as a record, plus the bound arguments
//! ```
//!
//! The namespace is a snapshot. Callers wanting live time rebuild it per pass
//! (the CLI uses `Local::now()` unless `--reference` is given).

use crate::{Map, Value};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};

/// Build the `@date` namespace for `reference`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use hoist::{ContextStore, clock::date_namespace, resolve_address};
///
/// let at = NaiveDate::from_ymd_opt(2013, 2, 12).unwrap().and_hms_opt(18, 5, 0).unwrap();
/// let store = ContextStore::new().with_namespace("@date", date_namespace(at));
/// let meridiem = resolve_address(&store, "@date.meridiem").unwrap().unwrap();
/// assert_eq!(meridiem.as_str(), Some("pm"));
/// ```
pub fn date_namespace(reference: NaiveDateTime) -> Value {
    let mut namespace = time_fields(reference);
    namespace.insert(
        "getTime".to_string(),
        Value::probe(move |args| {
            let mut record = time_fields(reference);
            for (key, value) in args {
                record.insert(key.clone(), value.clone());
            }
            Value::Object(record)
        }),
    );
    Value::Object(namespace)
}

fn time_fields(at: NaiveDateTime) -> Map {
    let hours = at.hour();
    let mut fields = Map::new();
    fields.insert("hours".to_string(), Value::from(hours));
    fields.insert("minutes".to_string(), Value::from(at.minute()));
    fields.insert("meridiem".to_string(), Value::from(if hours < 12 { "am" } else { "pm" }));
    fields.insert("weekday".to_string(), Value::from(weekday_name(at.weekday())));
    fields.insert("weekend".to_string(), Value::from(matches!(at.weekday(), Weekday::Sat | Weekday::Sun)));
    fields.insert("part".to_string(), Value::from(part_of_day(hours)));
    fields
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}

fn part_of_day(hours: u32) -> &'static str {
    match hours {
        5..=11 => "morning",
        12..=16 => "afternoon",
        17..=21 => "evening",
        _ => "night",
    }
}
