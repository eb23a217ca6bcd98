//! Venue table records and their sparse update patch.

use std::fmt::{Display, Formatter};

use tabern_core::{AppResult, Patch};

use crate::validation::{FieldViolations, validate_length, validate_present};
use crate::venue::VenueId;

/// Minimum table name length.
pub const TABLE_NAME_MIN_LENGTH: usize = 1;
/// Maximum table name length.
pub const TABLE_NAME_MAX_LENGTH: usize = 30;
/// Maximum table description length.
pub const TABLE_DESCRIPTION_MAX_LENGTH: usize = 400;
/// Minimum seat capacity.
pub const TABLE_CAPACITY_MIN: u8 = 1;
/// Maximum seat capacity.
pub const TABLE_CAPACITY_MAX: u8 = 70;

/// Unique identifier for a table record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(i64);

impl TableId {
    /// Wraps a raw numeric table identifier.
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

impl Display for TableId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Persisted venue table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Table identifier.
    pub id: TableId,
    /// Venue this table belongs to.
    pub venue_id: VenueId,
    /// Display name, 1–30 chars.
    pub name: String,
    /// Optional description, ≤400 chars.
    pub description: Option<String>,
    /// Seat capacity, 1–70.
    pub capacity: u8,
}

/// Validates a table name.
pub fn validate_table_name(field: &'static str, value: &str, errors: &mut FieldViolations) {
    validate_length(
        field,
        value,
        TABLE_NAME_MIN_LENGTH,
        TABLE_NAME_MAX_LENGTH,
        errors,
    );
}

/// Validates a seat capacity.
pub fn validate_table_capacity(field: &'static str, value: u8, errors: &mut FieldViolations) {
    if !(TABLE_CAPACITY_MIN..=TABLE_CAPACITY_MAX).contains(&value) {
        errors.push(
            field,
            format!("must be between {TABLE_CAPACITY_MIN} and {TABLE_CAPACITY_MAX}"),
        );
    }
}

/// Sparse table update.
///
/// `description` is the one nullable column of the record, so an explicit
/// `null` clears it; `name` and `capacity` reject `null`.
#[derive(Debug, Clone, Default)]
pub struct UpdateTablePatch {
    /// Display name, 1–30 chars.
    pub name: Patch<String>,
    /// Description, ≤400 chars; `null` clears it.
    pub description: Patch<String>,
    /// Seat capacity, 1–70.
    pub capacity: Patch<u8>,
}

impl UpdateTablePatch {
    /// Validates every present field, accumulating all violations.
    pub fn validate(&self) -> AppResult<()> {
        let mut errors = FieldViolations::default();

        validate_present("name", &self.name, &mut errors, |value, errors| {
            validate_table_name("name", value, errors);
        });
        if let Patch::Value(value) = &self.description {
            validate_length(
                "description",
                value,
                0,
                TABLE_DESCRIPTION_MAX_LENGTH,
                &mut errors,
            );
        }
        validate_present("capacity", &self.capacity, &mut errors, |value, errors| {
            validate_table_capacity("capacity", *value, errors);
        });

        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use tabern_core::Patch;

    use super::*;

    #[test]
    fn empty_patch_is_valid() {
        assert!(UpdateTablePatch::default().validate().is_ok());
    }

    #[test]
    fn null_description_is_a_valid_clear() {
        let patch = UpdateTablePatch {
            description: Patch::Null,
            ..UpdateTablePatch::default()
        };
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn null_name_is_rejected() {
        let patch = UpdateTablePatch {
            name: Patch::Null,
            ..UpdateTablePatch::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn capacity_over_seventy_is_rejected() {
        let patch = UpdateTablePatch {
            capacity: Patch::Value(71),
            ..UpdateTablePatch::default()
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn single_character_name_is_allowed() {
        let patch = UpdateTablePatch {
            name: Patch::Value("7".to_owned()),
            ..UpdateTablePatch::default()
        };
        assert!(patch.validate().is_ok());
    }
}
