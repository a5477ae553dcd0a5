//! # availability-engine
//!
//! Provider availability for a service marketplace: recurring weekly working
//! hours, date-specific overrides, and the "is this provider open at T?" query
//! that UI indicators are built on.
//!
//! All types are immutable values. Updates such as
//! [`Schedule::add_exception`] return a new schedule, so a schedule can be
//! read from many threads without locking.
//!
//! ```rust
//! use availability_engine::{DayOfWeek, Schedule, ScheduleException, TimeSlot};
//! use chrono::NaiveDate;
//!
//! let schedule = Schedule::default()
//!     .with_regular_hours(DayOfWeek::Monday, vec![TimeSlot::from_hm(9, 0, 17, 0).unwrap()]);
//!
//! let monday = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
//! assert!(schedule.is_available(monday.and_hms_opt(10, 0, 0).unwrap()));
//!
//! // A day off overrides the regular Monday hours.
//! let schedule = schedule.add_exception(ScheduleException::closed(monday));
//! assert!(!schedule.is_available(monday.and_hms_opt(10, 0, 0).unwrap()));
//! ```
//!
//! ## Modules
//!
//! - [`time_slot`] — `[start, end)` interval within one day
//! - [`weekday`] — the seven weekday keys of regular hours
//! - [`schedule`] — regular hours, exceptions, availability queries
//! - [`document`] — tolerant encode/decode of the persisted map shape
//! - [`error`] — Error types

pub mod document;
pub mod error;
pub mod schedule;
pub mod time_slot;
pub mod weekday;

pub use document::{decode, decode_in, encode, SlotEntry};
pub use error::{AvailabilityError, Result};
pub use schedule::{Schedule, ScheduleException};
pub use time_slot::TimeSlot;
pub use weekday::DayOfWeek;
