use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tabern_core::{AccountId, AccountIdentity, AccountRole, AppError, AppResult, Patch};
use tabern_domain::{UpdateVenuePatch, Venue, VenueId, WorkHours};

use super::{
    CreateVenueInput, NewVenue, UpdateVenueCommand, VenueRepository, VenueService,
    reconcile_work_hours,
};

#[derive(Default)]
struct FakeVenueRepository {
    venues: Mutex<HashMap<i64, Venue>>,
    next_id: Mutex<i64>,
    update_calls: Mutex<usize>,
    fail_uniqueness_check: bool,
    return_none_on_update: bool,
}

impl FakeVenueRepository {
    async fn insert(&self, venue: Venue) {
        self.venues.lock().await.insert(venue.id.value(), venue);
    }

    async fn stored(&self, venue_id: VenueId) -> Option<Venue> {
        self.venues.lock().await.get(&venue_id.value()).cloned()
    }

    async fn update_call_count(&self) -> usize {
        *self.update_calls.lock().await
    }
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
        owner_id: AccountId,
        name: &str,
    ) -> AppResult<bool> {
        if self.fail_uniqueness_check {
            return Err(AppError::Internal("uniqueness index unavailable".to_owned()));
        }

        Ok(self
            .venues
            .lock()
            .await
            .values()
            .any(|venue| venue.owner_id != owner_id && venue.name == name))
    }

    async fn create(&self, venue: NewVenue) -> AppResult<Venue> {
        let mut next_id = self.next_id.lock().await;
        *next_id += 1;
        let id = VenueId::new(*next_id);

        let aggregate = Venue {
            id,
            owner_id: venue.owner_id,
            email: venue.email,
            phone: venue.phone,
            name: venue.name,
            description: venue.description,
            address: venue.address,
            logo_url: None,
            is_visible: false,
            admin_ids: Vec::new(),
            work_hours: venue.work_hours,
        };
        self.venues
            .lock()
            .await
            .insert(id.value(), aggregate.clone());

        Ok(aggregate)
    }

    async fn update(
        &self,
        command: UpdateVenueCommand,
        _previous: &Venue,
    ) -> AppResult<Option<Venue>> {
        *self.update_calls.lock().await += 1;

        if self.return_none_on_update {
            return Ok(None);
        }

        let mut venues = self.venues.lock().await;
        let Some(venue) = venues.get_mut(&command.venue_id.value()) else {
            return Ok(None);
        };

        if let Some(email) = command.email {
            venue.email = email;
        }
        if let Some(phone) = command.phone {
            venue.phone = phone;
        }
        if let Some(name) = command.name {
            venue.name = name;
        }
        if let Some(description) = command.description {
            venue.description = description;
        }
        if let Some(address) = command.address {
            venue.address = address;
        }
        if let Some(is_visible) = command.is_visible {
            venue.is_visible = is_visible;
        }
        if let Some(rows) = command.work_hours {
            venue.work_hours = rows
                .into_iter()
                .map(|row| WorkHours::new(row.weekday, row.from, row.to))
                .collect();
        }

        Ok(Some(venue.clone()))
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

fn seeded_venue(venue_id: i64, owner_id: i64, name: &str) -> Venue {
    Venue {
        id: VenueId::new(venue_id),
        owner_id: AccountId::new(owner_id),
        email: "bar@example.com".to_owned(),
        phone: "79001234567".to_owned(),
        name: name.to_owned(),
        description: "Quiet cellar bar".to_owned(),
        address: "12 Brewery Lane".to_owned(),
        logo_url: None,
        is_visible: true,
        admin_ids: vec![AccountId::new(owner_id)],
        work_hours: vec![
            WorkHours::new(1, "09:00", "17:00"),
            WorkHours::new(2, "09:00", "17:00"),
            WorkHours::new(3, "09:00", "17:00"),
        ],
    }
}

#[tokio::test]
async fn all_absent_patch_leaves_venue_unchanged() -> AppResult<()> {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository.clone());

    let before = repository.stored(VenueId::new(42)).await;
    let updated = service
        .update_venue(&owner_identity(7), VenueId::new(42), UpdateVenuePatch::default())
        .await?;

    assert_eq!(Some(updated), before);
    Ok(())
}

#[tokio::test]
async fn patch_updates_name_and_replaces_work_hours() -> AppResult<()> {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository.clone());

    let patch = UpdateVenuePatch {
        name: Patch::Value("New Name".to_owned()),
        work_hours: Patch::Value(vec![WorkHours::new(1, "09:00", "17:00")]),
        ..UpdateVenuePatch::default()
    };
    let updated = service
        .update_venue(&owner_identity(7), VenueId::new(42), patch)
        .await?;

    assert_eq!(updated.id.value(), 42);
    assert_eq!(updated.name, "New Name");
    assert_eq!(updated.work_hours, vec![WorkHours::new(1, "09:00", "17:00")]);
    // Untouched fields keep their persisted values.
    assert_eq!(updated.email, "bar@example.com");
    assert_eq!(updated.address, "12 Brewery Lane");
    assert!(updated.is_visible);
    Ok(())
}

#[tokio::test]
async fn empty_work_hours_list_is_a_real_replace_with_empty() -> AppResult<()> {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository.clone());

    let patch = UpdateVenuePatch {
        work_hours: Patch::Value(Vec::new()),
        ..UpdateVenuePatch::default()
    };
    service
        .update_venue(&owner_identity(7), VenueId::new(42), patch)
        .await?;

    let stored = repository.stored(VenueId::new(42)).await;
    assert_eq!(stored.map(|venue| venue.work_hours.len()), Some(0));
    Ok(())
}

#[tokio::test]
async fn absent_work_hours_leaves_schedule_untouched() -> AppResult<()> {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository.clone());

    let patch = UpdateVenuePatch {
        description: Patch::Value("Now with darts".to_owned()),
        ..UpdateVenuePatch::default()
    };
    service
        .update_venue(&owner_identity(7), VenueId::new(42), patch)
        .await?;

    let stored = repository.stored(VenueId::new(42)).await;
    assert_eq!(stored.map(|venue| venue.work_hours.len()), Some(3));
    Ok(())
}

#[tokio::test]
async fn missing_venue_is_not_found() {
    let repository = Arc::new(FakeVenueRepository::default());
    let service = VenueService::new(repository);

    let result = service
        .update_venue(&owner_identity(7), VenueId::new(999), UpdateVenuePatch::default())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn foreign_owner_is_forbidden_and_nothing_is_written() {
    let repository = Arc::new(FakeVenueRepository::default());
    let service = VenueService::new(repository.clone());

    let seeded = seeded_venue(42, 7, "Old Name");
    repository.insert(seeded.clone()).await;

    let patch = UpdateVenuePatch {
        name: Patch::Value("Hijacked".to_owned()),
        ..UpdateVenuePatch::default()
    };
    let result = service
        .update_venue(&owner_identity(9), VenueId::new(42), patch)
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert_eq!(repository.stored(VenueId::new(42)).await, Some(seeded));
    assert_eq!(repository.update_call_count().await, 0);
}

#[tokio::test]
async fn rename_to_own_current_name_is_not_a_conflict() -> AppResult<()> {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Same Name")).await;
    let service = VenueService::new(repository);

    let patch = UpdateVenuePatch {
        name: Patch::Value("Same Name".to_owned()),
        ..UpdateVenuePatch::default()
    };
    let updated = service
        .update_venue(&owner_identity(7), VenueId::new(42), patch)
        .await?;

    assert_eq!(updated.name, "Same Name");
    Ok(())
}

#[tokio::test]
async fn name_taken_by_another_owner_is_a_conflict_without_a_write() {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Mine")).await;
    repository.insert(seeded_venue(43, 8, "Taken")).await;
    let service = VenueService::new(repository.clone());

    let patch = UpdateVenuePatch {
        name: Patch::Value("Taken".to_owned()),
        ..UpdateVenuePatch::default()
    };
    let result = service
        .update_venue(&owner_identity(7), VenueId::new(42), patch)
        .await;

    assert!(matches!(
        result,
        Err(AppError::Conflict(message)) if message.contains("Taken")
    ));
    assert_eq!(repository.update_call_count().await, 0);
}

#[tokio::test]
async fn invalid_weekday_fails_validation_without_a_write() {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository.clone());

    let patch = UpdateVenuePatch {
        work_hours: Patch::Value(vec![WorkHours::new(8, "09:00", "17:00")]),
        ..UpdateVenuePatch::default()
    };
    let result = service
        .update_venue(&owner_identity(7), VenueId::new(42), patch)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(repository.update_call_count().await, 0);
}

#[tokio::test]
async fn invalid_opening_time_fails_validation_without_a_write() {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository.clone());

    let patch = UpdateVenuePatch {
        work_hours: Patch::Value(vec![WorkHours::new(1, "25:00", "17:00")]),
        ..UpdateVenuePatch::default()
    };
    let result = service
        .update_venue(&owner_identity(7), VenueId::new(42), patch)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(repository.update_call_count().await, 0);
}

#[tokio::test]
async fn same_patch_twice_is_idempotent() -> AppResult<()> {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository.clone());

    let patch = UpdateVenuePatch {
        name: Patch::Value("New Name".to_owned()),
        work_hours: Patch::Value(vec![WorkHours::new(6, "12:00", "23:00")]),
        is_visible: Patch::Value(false),
        ..UpdateVenuePatch::default()
    };

    let first = service
        .update_venue(&owner_identity(7), VenueId::new(42), patch.clone())
        .await?;
    let second = service
        .update_venue(&owner_identity(7), VenueId::new(42), patch)
        .await?;

    assert_eq!(first, second);
    assert_eq!(repository.stored(VenueId::new(42)).await, Some(second));
    Ok(())
}

#[tokio::test]
async fn uniqueness_index_failure_is_internal_not_validation() {
    let repository = Arc::new(FakeVenueRepository {
        fail_uniqueness_check: true,
        ..FakeVenueRepository::default()
    });
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository);

    let patch = UpdateVenuePatch {
        name: Patch::Value("New Name".to_owned()),
        ..UpdateVenuePatch::default()
    };
    let result = service
        .update_venue(&owner_identity(7), VenueId::new(42), patch)
        .await;

    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[tokio::test]
async fn vanished_row_after_update_is_internal() {
    let repository = Arc::new(FakeVenueRepository {
        return_none_on_update: true,
        ..FakeVenueRepository::default()
    });
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository);

    let result = service
        .update_venue(&owner_identity(7), VenueId::new(42), UpdateVenuePatch::default())
        .await;

    assert!(matches!(
        result,
        Err(AppError::Internal(message)) if message.contains("no venue found after update")
    ));
}

#[tokio::test]
async fn create_venue_rejects_duplicate_name_of_another_owner() {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 8, "Taken")).await;
    let service = VenueService::new(repository);

    let result = service
        .create_venue(
            &owner_identity(7),
            CreateVenueInput {
                email: "new@example.com".to_owned(),
                phone: "79001234567".to_owned(),
                name: "Taken".to_owned(),
                description: "A fine place".to_owned(),
                address: "2 Side St".to_owned(),
                work_hours: vec![WorkHours::new(1, "10:00", "22:00")],
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn create_venue_accumulates_all_field_violations() {
    let repository = Arc::new(FakeVenueRepository::default());
    let service = VenueService::new(repository);

    let result = service
        .create_venue(
            &owner_identity(7),
            CreateVenueInput {
                email: "not-an-email".to_owned(),
                phone: "123".to_owned(),
                name: "Ab".to_owned(),
                description: String::new(),
                address: String::new(),
                work_hours: Vec::new(),
            },
        )
        .await;

    assert!(matches!(
        result,
        Err(AppError::Validation(message))
            if message.contains("email")
                && message.contains("phone")
                && message.contains("name")
                && message.contains("work_hours")
    ));
}

#[tokio::test]
async fn venue_by_id_enforces_ownership() {
    let repository = Arc::new(FakeVenueRepository::default());
    repository.insert(seeded_venue(42, 7, "Old Name")).await;
    let service = VenueService::new(repository);

    assert!(matches!(
        service.venue_by_id(&owner_identity(9), VenueId::new(42)).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        service.venue_by_id(&owner_identity(7), VenueId::new(999)).await,
        Err(AppError::NotFound(_))
    ));
}

#[test]
fn reconciler_stamps_rows_with_the_venue_id() -> AppResult<()> {
    let rows = reconcile_work_hours(
        VenueId::new(42),
        &[
            WorkHours::new(1, "09:00", "17:00"),
            WorkHours::new(2, "10:00", "18:00"),
        ],
    )?;

    assert_eq!(rows.len(), 2);
    assert!(rows.iter().all(|row| row.venue_id == VenueId::new(42)));
    assert_eq!(rows[0].weekday, 1);
    assert_eq!(rows[0].from, "09:00");
    assert_eq!(rows[0].to, "17:00");
    Ok(())
}

#[test]
fn reconciler_rejects_malformed_entries_as_internal() {
    let result = reconcile_work_hours(VenueId::new(42), &[WorkHours::new(9, "09:00", "17:00")]);
    assert!(matches!(result, Err(AppError::Internal(_))));
}

#[test]
fn reconciler_maps_an_empty_list_to_zero_rows() -> AppResult<()> {
    let rows = reconcile_work_hours(VenueId::new(42), &[])?;
    assert!(rows.is_empty());
    Ok(())
}
