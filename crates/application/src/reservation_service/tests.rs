use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use tabern_core::{AccountId, AccountIdentity, AccountRole, AppError, AppResult};
use tabern_domain::{Reservation, ReservationId, Table, TableId, Venue, VenueId};

use crate::table_service::{NewTable, TableRepository, UpdateTableCommand};
use crate::venue_service::{NewVenue, UpdateVenueCommand, VenueRepository};

use super::{CreateReservationInput, NewReservation, ReservationRepository, ReservationService};

#[derive(Default)]
struct FakeVenueRepository {
    venues: Mutex<HashMap<i64, Venue>>,
}

#[async_trait]
impl VenueRepository for FakeVenueRepository {
    async fn find_by_id(&self, venue_id: VenueId) -> AppResult<Option<Venue>> {
        Ok(self.venues.lock().await.get(&venue_id.value()).cloned())
    }

    async fn list_by_owner(&self, owner_id: AccountId) -> AppResult<Vec<Venue>> {
        Ok(self
            .venues
            .lock()
            .await
            .values()
            .filter(|venue| venue.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn is_name_taken_by_another_owner(
        &self,
        _owner_id: AccountId,
        _name: &str,
    ) -> AppResult<bool> {
        Ok(false)
    }

    async fn create(&self, _venue: NewVenue) -> AppResult<Venue> {
        Err(AppError::Internal("not used in reservation tests".to_owned()))
    }

    async fn update(
        &self,
        _command: UpdateVenueCommand,
        _previous: &Venue,
    ) -> AppResult<Option<Venue>> {
        Err(AppError::Internal("not used in reservation tests".to_owned()))
    }
}

#[derive(Default)]
struct FakeTableRepository {
    tables: Mutex<HashMap<i64, Table>>,
}

#[async_trait]
impl TableRepository for FakeTableRepository {
    async fn find_by_id(&self, table_id: TableId) -> AppResult<Option<Table>> {
        Ok(self.tables.lock().await.get(&table_id.value()).cloned())
    }

    async fn list_by_venue(&self, venue_id: VenueId) -> AppResult<Vec<Table>> {
        Ok(self
            .tables
            .lock()
            .await
            .values()
            .filter(|table| table.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn create(&self, _table: NewTable) -> AppResult<Table> {
        Err(AppError::Internal("not used in reservation tests".to_owned()))
    }

    async fn update(
        &self,
        _command: UpdateTableCommand,
        _previous: &Table,
    ) -> AppResult<Option<Table>> {
        Err(AppError::Internal("not used in reservation tests".to_owned()))
    }
}

#[derive(Default)]
struct FakeReservationRepository {
    reservations: Mutex<Vec<Reservation>>,
    next_id: Mutex<i64>,
}

#[async_trait]
impl ReservationRepository for FakeReservationRepository {
    async fn create(&self, reservation: NewReservation) -> AppResult<Reservation> {
        let mut next_id = self.next_id.lock().await;
        *next_id += 1;

        let record = Reservation {
            id: ReservationId::new(*next_id),
            table_id: reservation.table_id,
            venue_id: reservation.venue_id,
            date: reservation.date,
            from_time: reservation.from_time,
            to_time: reservation.to_time,
            persons: reservation.persons,
            guest: reservation.guest,
            comment: reservation.comment,
        };
        self.reservations.lock().await.push(record.clone());

        Ok(record)
    }

    async fn list_for_venue_on_date(
        &self,
        venue_id: VenueId,
        date: NaiveDate,
    ) -> AppResult<Vec<Reservation>> {
        Ok(self
            .reservations
            .lock()
            .await
            .iter()
            .filter(|reservation| reservation.venue_id == venue_id && reservation.date == date)
            .cloned()
            .collect())
    }
}

fn owner_identity(account_id: i64) -> AccountIdentity {
    AccountIdentity::new(
        AccountId::new(account_id),
        "Sam Keeper",
        "sam@example.com",
        AccountRole::Owner,
    )
}

async fn build_service() -> ReservationService {
    let venue_repository = Arc::new(FakeVenueRepository::default());
    venue_repository.venues.lock().await.insert(
        42,
        Venue {
            id: VenueId::new(42),
            owner_id: AccountId::new(7),
            email: "bar@example.com".to_owned(),
            phone: "79001234567".to_owned(),
            name: "The Rusty Tap".to_owned(),
            description: "Quiet cellar bar".to_owned(),
            address: "12 Brewery Lane".to_owned(),
            logo_url: None,
            is_visible: true,
            admin_ids: Vec::new(),
            work_hours: Vec::new(),
        },
    );

    let table_repository = Arc::new(FakeTableRepository::default());
    table_repository.tables.lock().await.insert(
        5,
        Table {
            id: TableId::new(5),
            venue_id: VenueId::new(42),
            name: "Window booth".to_owned(),
            description: None,
            capacity: 4,
        },
    );

    ReservationService::new(
        Arc::new(FakeReservationRepository::default()),
        table_repository,
        venue_repository,
    )
}

fn booking(table_id: i64) -> CreateReservationInput {
    CreateReservationInput {
        table_id: TableId::new(table_id),
        date: "28.02.2026".to_owned(),
        from_time: "18:00".to_owned(),
        to_time: "20:30".to_owned(),
        persons: 4,
        guest: Some("Morgan".to_owned()),
        comment: None,
    }
}

#[tokio::test]
async fn reservation_is_created_for_an_owned_table() -> AppResult<()> {
    let service = build_service().await;

    let reservation = service
        .create_reservation(&owner_identity(7), booking(5))
        .await?;

    assert_eq!(reservation.venue_id.value(), 42);
    assert_eq!(reservation.table_id.value(), 5);
    assert_eq!(reservation.date.format("%d.%m.%Y").to_string(), "28.02.2026");
    Ok(())
}

#[tokio::test]
async fn unknown_table_is_not_found() {
    let service = build_service().await;

    let result = service
        .create_reservation(&owner_identity(7), booking(999))
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn foreign_owner_cannot_book() {
    let service = build_service().await;

    let result = service
        .create_reservation(&owner_identity(9), booking(5))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn malformed_date_and_times_are_validation_errors() {
    let service = build_service().await;

    let result = service
        .create_reservation(
            &owner_identity(7),
            CreateReservationInput {
                date: "2026-02-28".to_owned(),
                from_time: "25:00".to_owned(),
                ..booking(5)
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(AppError::Validation(message))
            if message.contains("date") && message.contains("from_time")
    ));
}

#[tokio::test]
async fn listing_returns_only_the_requested_day() -> AppResult<()> {
    let service = build_service().await;
    service
        .create_reservation(&owner_identity(7), booking(5))
        .await?;
    service
        .create_reservation(
            &owner_identity(7),
            CreateReservationInput {
                date: "01.03.2026".to_owned(),
                ..booking(5)
            },
        )
        .await?;

    let date = NaiveDate::from_ymd_opt(2026, 2, 28)
        .ok_or_else(|| AppError::Internal("bad test date".to_owned()))?;
    let listed = service
        .reservations_for_venue(&owner_identity(7), VenueId::new(42), date)
        .await?;

    assert_eq!(listed.len(), 1);
    Ok(())
}
