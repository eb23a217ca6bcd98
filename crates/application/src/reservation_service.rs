//! Reservation ports and application service.
//!
//! Creation validates formats and ownership only; overlap detection between
//! reservations on the same table is deliberately out of scope here.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use tabern_core::{AccountIdentity, AppError, AppResult};
use tabern_domain::{
    FieldViolations, Reservation, TableId, VenueId, parse_reservation_date,
    validate_person_count, validate_reservation_schedule,
};

use crate::table_service::TableRepository;
use crate::venue_service::VenueRepository;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Fields for a new reservation record.
#[derive(Debug, Clone)]
pub struct NewReservation {
    /// Reserved table.
    pub table_id: TableId,
    /// Venue owning the table.
    pub venue_id: VenueId,
    /// Reservation day.
    pub date: NaiveDate,
    /// Start time.
    pub from_time: String,
    /// End time.
    pub to_time: String,
    /// Party size.
    pub persons: u8,
    /// Optional guest name.
    pub guest: Option<String>,
    /// Optional staff comment.
    pub comment: Option<String>,
}

/// Repository port for reservation persistence.
#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Persists a new reservation. Returns the record.
    async fn create(&self, reservation: NewReservation) -> AppResult<Reservation>;

    /// Lists a venue's reservations for one day.
    async fn list_for_venue_on_date(
        &self,
        venue_id: VenueId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>>;
}

/// Parameters for reservation creation.
#[derive(Debug, Clone)]
pub struct CreateReservationInput {
    /// Table to reserve.
    pub table_id: TableId,
    /// Reservation day, `DD.MM.YYYY`.
    pub date: String,
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

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for reservations.
#[derive(Clone)]
pub struct ReservationService {
    reservation_repository: Arc<dyn ReservationRepository>,
    table_repository: Arc<dyn TableRepository>,
    venue_repository: Arc<dyn VenueRepository>,
}

impl ReservationService {
    /// Creates a new reservation service.
    #[must_use]
    pub fn new(
        reservation_repository: Arc<dyn ReservationRepository>,
        table_repository: Arc<dyn TableRepository>,
        venue_repository: Arc<dyn VenueRepository>,
    ) -> Self {
        Self {
            reservation_repository,
            table_repository,
            venue_repository,
        }
    }

    /// Books a table in a venue the caller owns.
    pub async fn create_reservation(
        &self,
        identity: &AccountIdentity,
        input: CreateReservationInput,
    ) -> AppResult<Reservation> {
        let mut errors = FieldViolations::default();
        validate_reservation_schedule(
            input.date.as_str(),
            input.from_time.as_str(),
            input.to_time.as_str(),
            &mut errors,
        );
        validate_person_count("persons", input.persons, &mut errors);
        errors.into_result()?;

        let table = self
            .table_repository
            .find_by_id(input.table_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no table with id {}", input.table_id)))?;

        self.require_owned_venue(identity, table.venue_id).await?;

        // Validated above; a parse failure past that point is ours, not the
        // client's.
        let date = parse_reservation_date(input.date.as_str()).ok_or_else(|| {
            AppError::Internal(format!("reservation date '{}' failed re-parsing", input.date))
        })?;

        self.reservation_repository
            .create(NewReservation {
                table_id: table.id,
                venue_id: table.venue_id,
                date,
                from_time: input.from_time,
                to_time: input.to_time,
                persons: input.persons,
                guest: input.guest,
                comment: input.comment,
            })
            .await
    }

    /// Lists one day of reservations for a venue the caller owns.
    pub async fn reservations_for_venue(
        &self,
        identity: &AccountIdentity,
        venue_id: VenueId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        self.require_owned_venue(identity, venue_id).await?;
        self.reservation_repository
            .list_for_venue_on_date(venue_id, date)
            .await
    }

    async fn require_owned_venue(
        &self,
        identity: &AccountIdentity,
        venue_id: VenueId,
    ) -> AppResult<()> {
        let venue = self
            .venue_repository
            .find_by_id(venue_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no venue with id {venue_id}")))?;

        if venue.owner_id != identity.account_id() {
            return Err(AppError::Forbidden(format!(
                "venue {venue_id} is not administered by this account"
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
