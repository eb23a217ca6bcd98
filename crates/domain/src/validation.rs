//! Composable field validators with an error accumulator.
//!
//! Every validator appends to a [`FieldViolations`] accumulator instead of
//! failing on the first violation, so a request reports all of its problems
//! at once. Validators are pure: no persistence access, no side effects.

use tabern_core::{AppError, AppResult, Patch};

/// A single field-scoped validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire name of the offending field.
    pub field: &'static str,
    /// Human-readable description of the violation.
    pub message: String,
}

/// Accumulator for field-scoped validation failures.
#[derive(Debug, Default)]
pub struct FieldViolations {
    violations: Vec<FieldViolation>,
}

impl FieldViolations {
    /// Records a violation against a field.
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.violations.push(FieldViolation {
            field,
            message: message.into(),
        });
    }

    /// Returns true when no violations were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns the recorded violations.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        self.violations.as_slice()
    }

    /// Converts the accumulated violations into a result, joining every
    /// violation into one `Validation` error message.
    pub fn into_result(self) -> AppResult<()> {
        if self.violations.is_empty() {
            return Ok(());
        }

        let message = self
            .violations
            .iter()
            .map(|violation| format!("{}: {}", violation.field, violation.message))
            .collect::<Vec<_>>()
            .join("; ");

        Err(AppError::Validation(message))
    }
}

/// Applies a validator to a patch field only when a value is present.
///
/// An explicit `null` is a violation in its own right unless the caller
/// handles `Patch::Null` before delegating here; absent fields are skipped.
pub fn validate_present<T>(
    field: &'static str,
    patch: &Patch<T>,
    errors: &mut FieldViolations,
    check: impl FnOnce(&T, &mut FieldViolations),
) {
    match patch {
        Patch::Absent => {}
        Patch::Null => errors.push(field, "must not be null"),
        Patch::Value(value) => check(value, errors),
    }
}

/// Validates basic email structure: exactly one `@`, non-empty local part,
/// dotted domain. Length bounds are composed separately.
pub fn validate_email(field: &'static str, value: &str, errors: &mut FieldViolations) {
    let Some((local, domain)) = value.split_once('@') else {
        errors.push(field, "must contain exactly one '@'");
        return;
    };

    if local.is_empty() || domain.contains('@') {
        errors.push(field, "must contain exactly one '@'");
        return;
    }

    if domain.is_empty() || !domain.contains('.') {
        errors.push(field, "domain must contain at least one '.'");
    }
}

/// Validates an all-numeric phone number of exactly 11 digits.
pub fn validate_phone(field: &'static str, value: &str, errors: &mut FieldViolations) {
    if value.len() != 11 || !value.bytes().all(|byte| byte.is_ascii_digit()) {
        errors.push(field, "must be exactly 11 digits");
    }
}

/// Validates a character-count bound on a string field.
pub fn validate_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
    errors: &mut FieldViolations,
) {
    let length = value.chars().count();
    if length < min {
        errors.push(field, format!("must be at least {min} characters"));
    }
    if length > max {
        errors.push(field, format!("must not exceed {max} characters"));
    }
}

/// Checks a 24-hour `H:MM`/`HH:MM` time-of-day string.
///
/// Accepts single-digit hours (`9:30`); minutes are always two digits.
#[must_use]
pub fn is_time_of_day(value: &str) -> bool {
    let Some((hours, minutes)) = value.split_once(':') else {
        return false;
    };

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return false;
    }

    if !hours.bytes().all(|byte| byte.is_ascii_digit())
        || !minutes.bytes().all(|byte| byte.is_ascii_digit())
    {
        return false;
    }

    let hour_in_range = hours.parse::<u8>().map(|hour| hour <= 23).unwrap_or(false);
    let minute_in_range = minutes
        .parse::<u8>()
        .map(|minute| minute <= 59)
        .unwrap_or(false);

    hour_in_range && minute_in_range
}

/// Validates a time-of-day field against the `H:MM` sublanguage.
pub fn validate_time_of_day(field: &'static str, value: &str, errors: &mut FieldViolations) {
    if !is_time_of_day(value) {
        errors.push(field, format!("'{value}' is not a valid HH:MM time"));
    }
}
