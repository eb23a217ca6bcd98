//! Reservation records and schedule-format validation.
//!
//! Only format rules live here; overlap detection between reservations is
//! out of scope for this layer.

use std::fmt::{Display, Formatter};

use chrono::NaiveDate;

use crate::table::TableId;
use crate::validation::{FieldViolations, validate_time_of_day};
use crate::venue::VenueId;

/// Wire format for reservation dates, e.g. `28.02.2026`.
pub const RESERVATION_DATE_FORMAT: &str = "%d.%m.%Y";

/// Minimum party size.
pub const PERSON_COUNT_MIN: u8 = 1;
/// Maximum party size.
pub const PERSON_COUNT_MAX: u8 = 70;

/// Unique identifier for a reservation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReservationId(i64);

impl ReservationId {
    /// Wraps a raw numeric reservation identifier.
    #[must_use]
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Display for ReservationId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Persisted reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    /// Reservation identifier.
    pub id: ReservationId,
    /// Reserved table.
    pub table_id: TableId,
    /// Venue owning the table (denormalized for listing).
    pub venue_id: VenueId,
    /// Reservation day.
    pub date: NaiveDate,
    /// Start time, `H:MM`.
    pub from_time: String,
    /// End time, `H:MM`.
    pub to_time: String,
    /// Party size, 1–70.
    pub persons: u8,
    /// Optional guest name.
    pub guest: Option<String>,
    /// Optional staff comment.
    pub comment: Option<String>,
}

/// Validates the date/time portion of a reservation request: both times
/// must match the `H:MM` sublanguage and the date must parse as
/// `DD.MM.YYYY`.
pub fn validate_reservation_schedule(
    date: &str,
    from_time: &str,
    to_time: &str,
    errors: &mut FieldViolations,
) {
    validate_time_of_day("from_time", from_time, errors);
    validate_time_of_day("to_time", to_time, errors);

    if parse_reservation_date(date).is_none() {
        errors.push("date", format!("'{date}' is not a valid DD.MM.YYYY date"));
    }
}

/// Validates a party size.
pub fn validate_person_count(field: &'static str, value: u8, errors: &mut FieldViolations) {
    if !(PERSON_COUNT_MIN..=PERSON_COUNT_MAX).contains(&value) {
        errors.push(
            field,
            format!("must be between {PERSON_COUNT_MIN} and {PERSON_COUNT_MAX}"),
        );
    }
}

/// Parses a wire-format reservation date.
#[must_use]
pub fn parse_reservation_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, RESERVATION_DATE_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_schedule_passes() {
        let mut errors = FieldViolations::default();
        validate_reservation_schedule("28.02.2026", "18:00", "20:30", &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn bad_date_and_times_accumulate() {
        let mut errors = FieldViolations::default();
        validate_reservation_schedule("2026-02-28", "25:00", "99:99", &mut errors);
        assert_eq!(errors.violations().len(), 3);
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        assert!(parse_reservation_date("31.02.2026").is_none());
        assert!(parse_reservation_date("29.02.2024").is_some());
    }

    #[test]
    fn person_count_bounds() {
        let mut errors = FieldViolations::default();
        validate_person_count("persons", 0, &mut errors);
        validate_person_count("persons", 71, &mut errors);
        validate_person_count("persons", 35, &mut errors);
        assert_eq!(errors.violations().len(), 2);
    }
}
