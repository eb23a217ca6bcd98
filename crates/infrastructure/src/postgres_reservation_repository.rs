use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use tabern_application::{NewReservation, ReservationRepository};
use tabern_core::{AppError, AppResult};
use tabern_domain::{Reservation, ReservationId, TableId, VenueId};

/// PostgreSQL-backed reservation repository.
#[derive(Clone)]
pub struct PostgresReservationRepository {
    pool: PgPool,
}

impl PostgresReservationRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ReservationRow {
    id: i64,
    table_id: i64,
    venue_id: i64,
    reserved_on: NaiveDate,
    from_time: String,
    to_time: String,
    persons: i16,
    guest: Option<String>,
    comment: Option<String>,
}

impl ReservationRow {
    fn into_reservation(self) -> AppResult<Reservation> {
        let persons = u8::try_from(self.persons).map_err(|_| {
            AppError::Internal(format!(
                "reservation '{}' has a corrupt person count '{}'",
                self.id, self.persons
            ))
        })?;

        Ok(Reservation {
            id: ReservationId::new(self.id),
            table_id: TableId::new(self.table_id),
            venue_id: VenueId::new(self.venue_id),
            date: self.reserved_on,
            from_time: self.from_time,
            to_time: self.to_time,
            persons,
            guest: self.guest,
            comment: self.comment,
        })
    }
}

const RESERVATION_COLUMNS: &str =
    "id, table_id, venue_id, reserved_on, from_time, to_time, persons, guest, comment";

#[async_trait]
impl ReservationRepository for PostgresReservationRepository {
    async fn create(&self, reservation: NewReservation) -> AppResult<Reservation> {
        let row = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
            INSERT INTO reservations
                (table_id, venue_id, reserved_on, from_time, to_time, persons, guest, comment)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {RESERVATION_COLUMNS}
            "#
        ))
        .bind(reservation.table_id.value())
        .bind(reservation.venue_id.value())
        .bind(reservation.date)
        .bind(reservation.from_time.as_str())
        .bind(reservation.to_time.as_str())
        .bind(i16::from(reservation.persons))
        .bind(reservation.guest.as_deref())
        .bind(reservation.comment.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create reservation: {error}")))?;

        row.into_reservation()
    }

    async fn list_for_venue_on_date(
        &self,
        venue_id: VenueId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        let rows = sqlx::query_as::<_, ReservationRow>(&format!(
            r#"
            SELECT {RESERVATION_COLUMNS}
            FROM reservations
            WHERE venue_id = $1 AND reserved_on = $2
            ORDER BY from_time, id
            "#
        ))
        .bind(venue_id.value())
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list reservations for venue '{venue_id}': {error}"
            ))
        })?;

        rows.into_iter()
            .map(ReservationRow::into_reservation)
            .collect()
    }
}
