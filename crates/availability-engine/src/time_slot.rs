//! A contiguous interval of working time within a single day.
//!
//! Slots are half-open: a slot `09:00-17:00` contains 09:00 and 16:59:59 but
//! not 17:00. A slot never wraps past midnight, so the end time-of-day must be
//! strictly later than the start.

use std::fmt;

use chrono::{Duration, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{AvailabilityError, Result};

/// An immutable `[start, end)` interval of whole minutes within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawTimeSlot", into = "RawTimeSlot")]
pub struct TimeSlot {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeSlot {
    /// Build a slot from two times of day.
    ///
    /// Seconds and sub-second parts of the inputs are dropped; slots are
    /// defined on hour/minute boundaries.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidTimeSlot` if `end` is not strictly after `start`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self> {
        let start = truncate_to_minute(start);
        let end = truncate_to_minute(end);
        if end <= start {
            return Err(AvailabilityError::InvalidTimeSlot { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a slot from hour/minute components.
    ///
    /// # Errors
    /// Returns `AvailabilityError::InvalidTime` if an hour is outside `0..=23` or a
    /// minute outside `0..=59`, and `AvailabilityError::InvalidTimeSlot` if the end
    /// is not strictly after the start.
    pub fn from_hm(start_hour: u32, start_minute: u32, end_hour: u32, end_minute: u32) -> Result<Self> {
        Self::new(
            time_of_day(start_hour, start_minute)?,
            time_of_day(end_hour, end_minute)?,
        )
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    pub fn start_hour(&self) -> u32 {
        self.start.hour()
    }

    pub fn start_minute(&self) -> u32 {
        self.start.minute()
    }

    pub fn end_hour(&self) -> u32 {
        self.end.hour()
    }

    pub fn end_minute(&self) -> u32 {
        self.end.minute()
    }

    /// Length of the slot. Always positive.
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether `time` falls inside `[start, end)`.
    pub fn contains(&self, time: NaiveTime) -> bool {
        self.start <= time && time < self.end
    }

    /// Whether the two slots share at least one instant. Adjacent slots
    /// (`09:00-12:00` and `12:00-13:00`) do not overlap.
    pub fn overlaps(&self, other: &TimeSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl Default for TimeSlot {
    /// One hour starting at midnight: `00:00-01:00`.
    fn default() -> Self {
        Self {
            start: NaiveTime::MIN,
            end: NaiveTime::MIN + Duration::hours(1),
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }
}

fn time_of_day(hour: u32, minute: u32) -> Result<NaiveTime> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(AvailabilityError::InvalidTime { hour, minute })
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(time)
}

// ---------------------------------------------------------------------------
// Persisted shape: {startHour, startMinute, endHour, endMinute}
// ---------------------------------------------------------------------------

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeSlot {
    start_hour: u32,
    start_minute: u32,
    end_hour: u32,
    end_minute: u32,
}

impl TryFrom<RawTimeSlot> for TimeSlot {
    type Error = AvailabilityError;

    fn try_from(raw: RawTimeSlot) -> Result<Self> {
        TimeSlot::from_hm(raw.start_hour, raw.start_minute, raw.end_hour, raw.end_minute)
    }
}

impl From<TimeSlot> for RawTimeSlot {
    fn from(slot: TimeSlot) -> Self {
        Self {
            start_hour: slot.start_hour(),
            start_minute: slot.start_minute(),
            end_hour: slot.end_hour(),
            end_minute: slot.end_minute(),
        }
    }
}
