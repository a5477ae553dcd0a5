//! Property-based tests for time slots and availability resolution.

use availability_engine::{AvailabilityError, DayOfWeek, Schedule, ScheduleException, TimeSlot};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// (hour, minute) pairs of valid times of day.
fn arb_hm() -> impl Strategy<Value = (u32, u32)> {
    (0u32..=23, 0u32..=59)
}

/// A valid slot, built from two distinct times ordered ascending.
fn arb_slot() -> impl Strategy<Value = TimeSlot> {
    (arb_hm(), arb_hm())
        .prop_filter("start and end must differ", |(a, b)| a != b)
        .prop_map(|(a, b)| {
            let (start, end) = if a < b { (a, b) } else { (b, a) };
            TimeSlot::from_hm(start.0, start.1, end.0, end.1).unwrap()
        })
}

fn arb_day() -> impl Strategy<Value = DayOfWeek> {
    prop::sample::select(DayOfWeek::ALL.to_vec())
}

/// Dates in 2025-2027. Day capped at 28 to avoid invalid month/day combos.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (2025i32..=2027, 1u32..=12, 1u32..=28)
        .prop_map(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn arb_datetime() -> impl Strategy<Value = NaiveDateTime> {
    (arb_date(), arb_hm(), 0u32..=59).prop_map(|(date, (h, m), s)| date.and_hms_opt(h, m, s).unwrap())
}

fn arb_schedule() -> impl Strategy<Value = Schedule> {
    (
        prop::collection::btree_map(arb_day(), prop::collection::vec(arb_slot(), 0..4), 0..7),
        prop::collection::vec(
            (arb_date(), prop::collection::vec(arb_slot(), 0..3))
                .prop_map(|(date, slots)| ScheduleException::on_date(date, slots)),
            0..4,
        ),
    )
        .prop_map(|(regular_hours, exceptions)| Schedule::new(regular_hours, exceptions))
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Property 1: valid components construct and round-trip
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn ordered_components_construct(a in arb_hm(), b in arb_hm()) {
        prop_assume!(a < b);
        let slot = TimeSlot::from_hm(a.0, a.1, b.0, b.1).unwrap();
        prop_assert_eq!((slot.start_hour(), slot.start_minute()), a);
        prop_assert_eq!((slot.end_hour(), slot.end_minute()), b);
        prop_assert_eq!(slot.start(), NaiveTime::from_hms_opt(a.0, a.1, 0).unwrap());
        prop_assert_eq!(slot.end(), NaiveTime::from_hms_opt(b.0, b.1, 0).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Property 2: end <= start always fails with InvalidTimeSlot
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn unordered_components_fail(a in arb_hm(), b in arb_hm()) {
        prop_assume!(b <= a);
        let result = TimeSlot::from_hm(a.0, a.1, b.0, b.1);
        let is_invalid_slot = matches!(result, Err(AvailabilityError::InvalidTimeSlot { .. }));
        prop_assert!(is_invalid_slot);
    }
}

// ---------------------------------------------------------------------------
// Property 3: add_exception is a pure append
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn add_exception_appends(
        schedule in arb_schedule(),
        date in arb_date(),
        slots in prop::collection::vec(arb_slot(), 0..3),
    ) {
        let exception = ScheduleException::on_date(date, slots);
        let updated = schedule.add_exception(exception.clone());

        let mut expected = schedule.exceptions.clone();
        expected.push(exception);
        prop_assert_eq!(&updated.exceptions, &expected);
        prop_assert_eq!(&updated.regular_hours, &schedule.regular_hours);
    }
}

// ---------------------------------------------------------------------------
// Property 4: a closed exception wins over any regular hours on its date
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn closed_exception_closes_whole_day(
        schedule in arb_schedule(),
        at in arb_datetime(),
    ) {
        // Prepend so it is the first exception for the date.
        let mut exceptions = vec![ScheduleException::closed(at.date())];
        exceptions.extend(schedule.exceptions.iter().cloned());
        let closed = Schedule::new(schedule.regular_hours.clone(), exceptions);

        prop_assert!(!closed.is_available(at));
    }
}

// ---------------------------------------------------------------------------
// Property 5: availability equals containment in the effective slots
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn availability_matches_effective_slots(
        schedule in arb_schedule(),
        at in arb_datetime(),
    ) {
        let expected = match schedule.exceptions.iter().find(|e| e.date() == at.date()) {
            Some(exception) => exception.time_slots.iter().any(|s| s.contains(at.time())),
            None => schedule
                .regular_hours
                .get(&DayOfWeek::of(at.date()))
                .is_some_and(|slots| slots.iter().any(|s| s.contains(at.time()))),
        };
        prop_assert_eq!(schedule.is_available(at), expected);
    }
}

// ---------------------------------------------------------------------------
// Property 6: encode then decode preserves the schedule
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(config())]

    #[test]
    fn document_preserves_schedule(schedule in arb_schedule()) {
        let decoded = availability_engine::decode(&availability_engine::encode(&schedule));
        prop_assert_eq!(decoded, schedule);
    }
}
