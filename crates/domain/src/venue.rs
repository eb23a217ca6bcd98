//! Venue profile aggregate, weekly work hours, and the sparse update patch.

use std::fmt::{Display, Formatter};

use tabern_core::{AccountId, Patch};

use crate::validation::{
    FieldViolations, is_time_of_day, validate_email, validate_length, validate_phone,
    validate_present,
};

/// Minimum venue name length.
pub const NAME_MIN_LENGTH: usize = 3;
/// Maximum venue name length.
pub const NAME_MAX_LENGTH: usize = 50;
/// Maximum venue email length.
pub const EMAIL_MAX_LENGTH: usize = 30;
/// Maximum venue description length.
pub const DESCRIPTION_MAX_LENGTH: usize = 400;
/// Maximum venue address length.
pub const ADDRESS_MAX_LENGTH: usize = 100;
/// Maximum number of work-hours entries in one schedule.
pub const WORK_HOURS_MAX_ENTRIES: usize = 7;

/// Unique identifier for a venue record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VenueId(i64);

impl VenueId {
    /// Wraps a raw numeric venue identifier.
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

impl Display for VenueId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// One weekday's opening and closing time pair.
///
/// `weekday` is 1..=7 (Monday-first); `from`/`to` are 24-hour `H:MM`
/// strings. No ordering between `from` and `to` is enforced, so overnight
/// ranges like `22:00`-`02:00` stay representable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkHours {
    /// Weekday index, 1..=7.
    pub weekday: u8,
    /// Opening time.
    pub from: String,
    /// Closing time.
    pub to: String,
}

impl WorkHours {
    /// Creates a work-hours entry from raw parts.
    #[must_use]
    pub fn new(weekday: u8, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            weekday,
            from: from.into(),
            to: to.into(),
        }
    }

    /// Returns true when the entry satisfies the weekday and time rules.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        (1..=7).contains(&self.weekday)
            && is_time_of_day(self.from.as_str())
            && is_time_of_day(self.to.as_str())
    }
}

/// Validates a full work-hours list: entry-count bound plus per-entry
/// weekday and time rules. Any bad entry fails the whole list.
pub fn validate_work_hours(field: &'static str, entries: &[WorkHours], errors: &mut FieldViolations) {
    if entries.len() > WORK_HOURS_MAX_ENTRIES {
        errors.push(
            field,
            format!("must not contain more than {WORK_HOURS_MAX_ENTRIES} entries"),
        );
    }

    for (index, entry) in entries.iter().enumerate() {
        if !(1..=7).contains(&entry.weekday) {
            errors.push(
                field,
                format!("entry {index}: weekday must be between 1 and 7"),
            );
        }
        if !is_time_of_day(entry.from.as_str()) {
            errors.push(
                field,
                format!("entry {index}: '{}' is not a valid HH:MM time", entry.from),
            );
        }
        if !is_time_of_day(entry.to.as_str()) {
            errors.push(
                field,
                format!("entry {index}: '{}' is not a valid HH:MM time", entry.to),
            );
        }
    }
}

/// Persisted venue profile aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Venue {
    /// Venue identifier.
    pub id: VenueId,
    /// Account that owns this venue.
    pub owner_id: AccountId,
    /// Contact email.
    pub email: String,
    /// Contact phone, 11 digits.
    pub phone: String,
    /// Display name, unique per owner.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// Optional logo location.
    pub logo_url: Option<String>,
    /// Whether clients can see the venue.
    pub is_visible: bool,
    /// Accounts administering this venue (derived).
    pub admin_ids: Vec<AccountId>,
    /// Weekly opening schedule.
    pub work_hours: Vec<WorkHours>,
}

/// Sparse venue profile update.
///
/// Every scalar field is tri-state: absent means "keep the persisted
/// value", an explicit `null` is rejected during validation, and a value is
/// validated by that field's rule. `work_hours` is provided-or-absent as a
/// whole list; providing it replaces the full schedule (an empty list is a
/// real replace-with-empty, not a no-op).
#[derive(Debug, Clone, Default)]
pub struct UpdateVenuePatch {
    /// Contact email, ≤30 chars, structurally valid.
    pub email: Patch<String>,
    /// Contact phone, exactly 11 digits.
    pub phone: Patch<String>,
    /// Display name, 3–50 chars, unique per owner.
    pub name: Patch<String>,
    /// Long-form description, ≤400 chars.
    pub description: Patch<String>,
    /// Street address, ≤100 chars.
    pub address: Patch<String>,
    /// Full replacement schedule, at most 7 entries.
    pub work_hours: Patch<Vec<WorkHours>>,
    /// Client visibility flag.
    pub is_visible: Patch<bool>,
}

impl UpdateVenuePatch {
    /// Validates every present field, accumulating all violations.
    pub fn validate(&self) -> tabern_core::AppResult<()> {
        let mut errors = FieldViolations::default();

        validate_present("email", &self.email, &mut errors, |value, errors| {
            validate_email("email", value, errors);
            validate_length("email", value, 0, EMAIL_MAX_LENGTH, errors);
        });
        validate_present("phone", &self.phone, &mut errors, |value, errors| {
            validate_phone("phone", value, errors);
        });
        validate_present("name", &self.name, &mut errors, |value, errors| {
            validate_length("name", value, NAME_MIN_LENGTH, NAME_MAX_LENGTH, errors);
        });
        validate_present(
            "description",
            &self.description,
            &mut errors,
            |value, errors| {
                validate_length("description", value, 0, DESCRIPTION_MAX_LENGTH, errors);
            },
        );
        validate_present("address", &self.address, &mut errors, |value, errors| {
            validate_length("address", value, 0, ADDRESS_MAX_LENGTH, errors);
        });
        validate_present(
            "work_hours",
            &self.work_hours,
            &mut errors,
            |entries, errors| {
                validate_work_hours("work_hours", entries, errors);
            },
        );
        validate_present(
            "is_visible_to_user",
            &self.is_visible,
            &mut errors,
            |_, _| {},
        );

        errors.into_result()
    }
}
