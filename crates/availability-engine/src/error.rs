//! Error types for availability-engine operations.

use chrono::NaiveTime;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AvailabilityError {
    /// An hour or minute component is outside `0..=23` / `0..=59`.
    #[error("Invalid time of day: {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },

    /// The slot end is not strictly after its start.
    #[error("Invalid time slot: end {end} must be after start {start}")]
    InvalidTimeSlot { start: NaiveTime, end: NaiveTime },

    #[error("Unknown weekday name: {0:?}")]
    UnknownWeekday(String),
}

pub type Result<T> = std::result::Result<T, AvailabilityError>;
