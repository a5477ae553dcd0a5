//! A provider's recurring weekly hours plus date-specific overrides.
//!
//! Every update returns a new [`Schedule`]; nothing mutates in place, so a
//! schedule value can be shared across readers without coordination.
//!
//! Availability resolution for a date-time `at`:
//!
//! 1. The first exception (in insertion order) whose date equals `at`'s date
//!    decides on its own. An exception with no slots closes the whole day,
//!    even when the weekday normally has hours.
//! 2. Otherwise the regular hours for `at`'s weekday apply. A weekday with no
//!    entry is closed.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use tracing::debug;

use crate::time_slot::TimeSlot;
use crate::weekday::DayOfWeek;

/// Hours that replace the regular weekly pattern on one calendar date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleException {
    /// Only the date portion is used for matching; the time-of-day is ignored.
    pub timestamp: NaiveDateTime,
    /// Open slots for the date. Empty means closed all day.
    pub time_slots: Vec<TimeSlot>,
}

impl ScheduleException {
    pub fn new(timestamp: NaiveDateTime, time_slots: Vec<TimeSlot>) -> Self {
        Self {
            timestamp,
            time_slots,
        }
    }

    /// A day off: no open slots on `date`.
    pub fn closed(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN), Vec::new())
    }

    /// An override for `date` with the given open slots.
    pub fn on_date(date: NaiveDate, time_slots: Vec<TimeSlot>) -> Self {
        Self::new(date.and_time(NaiveTime::MIN), time_slots)
    }

    /// The calendar date this exception applies to.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn is_closed(&self) -> bool {
        self.time_slots.is_empty()
    }
}

/// Weekly regular hours plus per-date exceptions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub regular_hours: BTreeMap<DayOfWeek, Vec<TimeSlot>>,
    pub exceptions: Vec<ScheduleException>,
}

impl Schedule {
    pub fn new(
        regular_hours: BTreeMap<DayOfWeek, Vec<TimeSlot>>,
        exceptions: Vec<ScheduleException>,
    ) -> Self {
        Self {
            regular_hours,
            exceptions,
        }
    }

    /// Return a copy with `exception` appended. Regular hours are carried over.
    ///
    /// Existing exceptions on the same date are kept; the earliest one added
    /// keeps precedence.
    pub fn add_exception(&self, exception: ScheduleException) -> Schedule {
        let mut next = self.clone();
        next.exceptions.push(exception);
        next
    }

    /// Return a copy whose regular hours for `day` are `slots`.
    ///
    /// An empty `slots` removes the weekday, which reads as closed.
    pub fn with_regular_hours(&self, day: DayOfWeek, slots: Vec<TimeSlot>) -> Schedule {
        let mut next = self.clone();
        if slots.is_empty() {
            next.regular_hours.remove(&day);
        } else {
            next.regular_hours.insert(day, slots);
        }
        next
    }

    /// The regular slots for a weekday; empty when the weekday has no entry.
    pub fn regular_hours_for(&self, day: DayOfWeek) -> &[TimeSlot] {
        self.regular_hours.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First exception recorded for `date`, if any.
    pub fn exception_on(&self, date: NaiveDate) -> Option<&ScheduleException> {
        self.exceptions.iter().find(|e| e.date() == date)
    }

    /// The slots in effect on `date` after applying exception precedence.
    pub fn slots_on(&self, date: NaiveDate) -> &[TimeSlot] {
        match self.exception_on(date) {
            Some(exception) => {
                debug!(
                    %date,
                    slots = exception.time_slots.len(),
                    "exception overrides regular hours"
                );
                &exception.time_slots
            }
            None => self.regular_hours_for(DayOfWeek::of(date)),
        }
    }

    /// Whether no slot is open at any time on `date`.
    pub fn is_closed_on(&self, date: NaiveDate) -> bool {
        self.slots_on(date).is_empty()
    }

    /// Whether the provider is open at the wall-clock date-time `at`.
    pub fn is_available(&self, at: NaiveDateTime) -> bool {
        let time = at.time();
        self.slots_on(at.date())
            .iter()
            .any(|slot| slot.contains(time))
    }

    /// Whether the provider is open at an absolute instant, judged by the
    /// wall clock of the instant's own time zone.
    ///
    /// Pass the instant already converted into the provider's zone, e.g.
    /// `utc.with_timezone(&chrono_tz::Europe::Berlin)`.
    pub fn is_available_at<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> bool {
        self.is_available(instant.naive_local())
    }

    pub fn is_empty(&self) -> bool {
        self.regular_hours.is_empty() && self.exceptions.is_empty()
    }
}
