//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod postgres_account_repository;
mod postgres_reservation_repository;
mod postgres_table_repository;
mod postgres_venue_repository;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use postgres_account_repository::PostgresAccountRepository;
pub use postgres_reservation_repository::PostgresReservationRepository;
pub use postgres_table_repository::PostgresTableRepository;
pub use postgres_venue_repository::PostgresVenueRepository;
