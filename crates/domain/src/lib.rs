//! Domain types and validation rules for Tabern.

#![forbid(unsafe_code)]

mod reservation;
mod table;
mod validation;
mod venue;

pub use reservation::{
    PERSON_COUNT_MAX, PERSON_COUNT_MIN, RESERVATION_DATE_FORMAT, Reservation, ReservationId,
    parse_reservation_date, validate_person_count, validate_reservation_schedule,
};
pub use table::{
    TABLE_CAPACITY_MAX, TABLE_CAPACITY_MIN, TABLE_DESCRIPTION_MAX_LENGTH, TABLE_NAME_MAX_LENGTH,
    TABLE_NAME_MIN_LENGTH, Table, TableId, UpdateTablePatch, validate_table_capacity,
    validate_table_name,
};
pub use validation::{
    FieldViolation, FieldViolations, is_time_of_day, validate_email, validate_length,
    validate_phone, validate_present, validate_time_of_day,
};
pub use venue::{
    ADDRESS_MAX_LENGTH, DESCRIPTION_MAX_LENGTH, EMAIL_MAX_LENGTH, NAME_MAX_LENGTH,
    NAME_MIN_LENGTH, UpdateVenuePatch, Venue, VenueId, WORK_HOURS_MAX_ENTRIES, WorkHours,
    validate_work_hours,
};
