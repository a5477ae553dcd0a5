//! Conversion between [`Schedule`] and its persisted document shape.
//!
//! The document store keeps a schedule as a nested map:
//!
//! ```json
//! {
//!   "regularHours": {
//!     "MONDAY": [{"startHour": 9, "startMinute": 0, "endHour": 17, "endMinute": 0}]
//!   },
//!   "_exceptions": [
//!     {"timestamp": "2026-03-16T00:00:00", "timeSlots": []}
//!   ]
//! }
//! ```
//!
//! Decoding is total. Malformed entries are logged and skipped so that one bad
//! slot never hides the rest of a provider's hours:
//!
//! - a malformed slot is dropped from its list;
//! - an unknown weekday key is dropped;
//! - an exception without a readable timestamp is dropped (it could never
//!   match a date), while one with missing or malformed `timeSlots` becomes a
//!   closed day;
//! - weekday keys that differ only in case are merged into one weekday;
//! - a root that is not a map decodes to the empty schedule.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use tracing::warn;

use crate::schedule::{Schedule, ScheduleException};
use crate::time_slot::TimeSlot;
use crate::weekday::DayOfWeek;

pub const REGULAR_HOURS: &str = "regularHours";
pub const EXCEPTIONS: &str = "_exceptions";
pub const TIMESTAMP: &str = "timestamp";
pub const TIME_SLOTS: &str = "timeSlots";

/// Format used when writing exception timestamps. The fraction is only
/// written when non-zero.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Outcome of decoding one persisted slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotEntry {
    Slot(TimeSlot),
    /// The entry was malformed; carries the reason.
    Skip(String),
}

impl SlotEntry {
    pub fn from_value(value: &Value) -> Self {
        match TimeSlot::deserialize(value) {
            Ok(slot) => SlotEntry::Slot(slot),
            Err(e) => SlotEntry::Skip(e.to_string()),
        }
    }

    pub fn into_slot(self) -> Option<TimeSlot> {
        match self {
            SlotEntry::Slot(slot) => Some(slot),
            SlotEntry::Skip(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a schedule into its document shape.
pub fn encode(schedule: &Schedule) -> Value {
    let regular_hours: Map<String, Value> = schedule
        .regular_hours
        .iter()
        .map(|(day, slots)| (day.as_str().to_string(), encode_slots(slots)))
        .collect();

    let exceptions: Vec<Value> = schedule
        .exceptions
        .iter()
        .map(|exception| {
            let mut entry = Map::new();
            entry.insert(
                TIMESTAMP.to_string(),
                Value::String(exception.timestamp.format(TIMESTAMP_FORMAT).to_string()),
            );
            entry.insert(TIME_SLOTS.to_string(), encode_slots(&exception.time_slots));
            Value::Object(entry)
        })
        .collect();

    let mut root = Map::new();
    root.insert(REGULAR_HOURS.to_string(), Value::Object(regular_hours));
    root.insert(EXCEPTIONS.to_string(), Value::Array(exceptions));
    Value::Object(root)
}

fn encode_slots(slots: &[TimeSlot]) -> Value {
    slots
        .iter()
        .map(|slot| {
            json!({
                "startHour": slot.start_hour(),
                "startMinute": slot.start_minute(),
                "endHour": slot.end_hour(),
                "endMinute": slot.end_minute(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a schedule from its document shape. Never fails; see the module docs.
///
/// Store timestamp objects and epoch milliseconds are read as UTC dates. Use
/// [`decode_in`] when the provider lives in another zone.
pub fn decode(value: &Value) -> Schedule {
    decode_in(value, &Utc)
}

/// Like [`decode`], but store timestamp objects and epoch milliseconds are
/// converted to the wall clock of `tz` before their date is taken.
///
/// String timestamps are unaffected: naive strings already are wall-clock
/// times and RFC 3339 strings keep the wall clock of their own offset.
pub fn decode_in<Tz: TimeZone>(value: &Value, tz: &Tz) -> Schedule {
    let root = match value {
        Value::Object(root) => root,
        Value::Null => return Schedule::default(),
        other => {
            warn!(kind = value_kind(other), "schedule document is not a map; using empty schedule");
            return Schedule::default();
        }
    };

    let regular_hours = root
        .get(REGULAR_HOURS)
        .map(decode_regular_hours)
        .unwrap_or_default();
    let exceptions = root
        .get(EXCEPTIONS)
        .map(|exceptions| decode_exceptions(exceptions, tz))
        .unwrap_or_default();

    Schedule::new(regular_hours, exceptions)
}

fn decode_regular_hours(value: &Value) -> BTreeMap<DayOfWeek, Vec<TimeSlot>> {
    if value.is_null() {
        return BTreeMap::new();
    }
    let Some(days) = value.as_object() else {
        warn!(kind = value_kind(value), "regular hours are not a map; treating as closed");
        return BTreeMap::new();
    };

    let mut regular_hours: BTreeMap<DayOfWeek, Vec<TimeSlot>> = BTreeMap::new();
    for (key, slots) in days {
        let day = match key.parse::<DayOfWeek>() {
            Ok(day) => day,
            Err(e) => {
                warn!(weekday = %key, reason = %e, "skipping regular hours entry");
                continue;
            }
        };
        let slots = decode_slots(slots, key);
        match regular_hours.entry(day) {
            Entry::Vacant(vacant) => {
                vacant.insert(slots);
            }
            // Keys differing only in case name the same weekday; merge them.
            Entry::Occupied(mut occupied) => {
                warn!(weekday = %key, %day, "duplicate weekday key; merging its slots");
                occupied.get_mut().extend(slots);
            }
        }
    }
    regular_hours
}

fn decode_exceptions<Tz: TimeZone>(value: &Value, tz: &Tz) -> Vec<ScheduleException> {
    if value.is_null() {
        return Vec::new();
    }
    let Some(entries) = value.as_array() else {
        warn!(kind = value_kind(value), "exceptions are not a list; ignoring");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let timestamp = entry
                .get(TIMESTAMP)
                .and_then(|timestamp| parse_timestamp_in(timestamp, tz));
            let Some(timestamp) = timestamp else {
                warn!(index, "skipping exception without a readable timestamp");
                return None;
            };
            let owner = timestamp.date().to_string();
            let time_slots = entry
                .get(TIME_SLOTS)
                .map(|slots| decode_slots(slots, &owner))
                .unwrap_or_default();
            Some(ScheduleException::new(timestamp, time_slots))
        })
        .collect()
}

/// Decode a slot list, keeping only well-formed slots. `owner` names the
/// weekday or exception date for log context.
fn decode_slots(value: &Value, owner: &str) -> Vec<TimeSlot> {
    let Some(entries) = value.as_array() else {
        warn!(owner, kind = value_kind(value), "time slots are not a list; treating as closed");
        return Vec::new();
    };

    entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let entry = SlotEntry::from_value(entry);
            if let SlotEntry::Skip(reason) = &entry {
                warn!(owner, index, %reason, "skipping malformed time slot");
            }
            entry.into_slot()
        })
        .collect()
}

/// Read an exception timestamp.
///
/// Accepted forms:
/// - RFC 3339 string (the wall-clock part is kept, the offset dropped)
/// - `YYYY-MM-DDTHH:MM:SS[.fff]` or `YYYY-MM-DD HH:MM:SS` string
/// - `YYYY-MM-DD` string (midnight)
/// - `{"seconds": i64, "nanoseconds": u32}` object, also with `_seconds` /
///   `_nanoseconds` keys (UTC)
/// - integer epoch milliseconds (UTC)
///
/// See [`parse_timestamp_in`] for reading the last two in another zone.
pub fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    parse_timestamp_in(value, &Utc)
}

/// Like [`parse_timestamp`], but object and epoch-millisecond forms are
/// converted to the wall clock of `tz`.
pub fn parse_timestamp_in<Tz: TimeZone>(value: &Value, tz: &Tz) -> Option<NaiveDateTime> {
    let instant: Option<DateTime<Utc>> = match value {
        Value::String(s) => return parse_timestamp_str(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::Object(fields) => {
            let seconds = fields
                .get("seconds")
                .or_else(|| fields.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = fields
                .get("nanoseconds")
                .or_else(|| fields.get("_nanoseconds"))
                .and_then(Value::as_u64)
                .map_or(Some(0), |n| u32::try_from(n).ok())?;
            DateTime::from_timestamp(seconds, nanos)
        }
        _ => None,
    };
    instant.map(|instant| instant.with_timezone(tz).naive_local())
}

fn parse_timestamp_str(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ndt);
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(ndt);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// serde integration
// ---------------------------------------------------------------------------

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        encode(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Schedule {
    /// Tolerant: any well-formed value decodes, malformed entries are skipped.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(decode(&value))
    }
}
