//! Application services and ports for Tabern.

#![forbid(unsafe_code)]

mod account_service;
mod reservation_service;
mod table_service;
mod venue_service;

pub use account_service::{
    AccountRecord, AccountRepository, AccountService, AuthOutcome, NewAccount,
    PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, PasswordHasher, RegisterOwnerParams,
};
pub use reservation_service::{
    CreateReservationInput, NewReservation, ReservationRepository, ReservationService,
};
pub use table_service::{
    CreateTableInput, NewTable, TableRepository, TableService, UpdateTableCommand,
};
pub use venue_service::{
    CreateVenueInput, NewVenue, UpdateVenueCommand, VenueRepository, VenueService, WorkHoursRow,
    reconcile_work_hours,
};
