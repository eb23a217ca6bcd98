//! Venue profile ports and application service.
//!
//! Owns the venue update pipeline: resolution, owner authorization, the
//! per-owner name uniqueness rule, work-hours reconciliation, and the
//! partial-update command handed to persistence.

use std::sync::Arc;

use async_trait::async_trait;

use tabern_core::{AccountId, AccountIdentity, AppError, AppResult, Patch};
use tabern_domain::{
    ADDRESS_MAX_LENGTH, DESCRIPTION_MAX_LENGTH, EMAIL_MAX_LENGTH, FieldViolations,
    NAME_MAX_LENGTH, NAME_MIN_LENGTH, UpdateVenuePatch, Venue, VenueId, WorkHours, validate_email,
    validate_length, validate_phone, validate_work_hours,
};

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Venue-scoped work-hours row ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkHoursRow {
    /// Venue the row belongs to.
    pub venue_id: VenueId,
    /// Weekday index, 1..=7.
    pub weekday: u8,
    /// Opening time.
    pub from: String,
    /// Closing time.
    pub to: String,
}

/// Fields for a new venue profile.
#[derive(Debug, Clone)]
pub struct NewVenue {
    /// Owning account.
    pub owner_id: AccountId,
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// Initial weekly schedule.
    pub work_hours: Vec<WorkHours>,
}

/// Update command carrying only the fields present in the patch.
///
/// `None` fields must not overwrite persisted values. When `work_hours` is
/// `Some`, the full schedule is replaced (an empty vector deletes every
/// row); `None` leaves the schedule untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateVenueCommand {
    /// Target venue.
    pub venue_id: VenueId,
    /// New contact email, if changed.
    pub email: Option<String>,
    /// New contact phone, if changed.
    pub phone: Option<String>,
    /// New display name, if changed.
    pub name: Option<String>,
    /// New description, if changed.
    pub description: Option<String>,
    /// New address, if changed.
    pub address: Option<String>,
    /// New visibility flag, if changed.
    pub is_visible: Option<bool>,
    /// Full replacement schedule, if provided.
    pub work_hours: Option<Vec<WorkHoursRow>>,
}

/// Repository port for venue persistence.
///
/// `update` must apply the command and the work-hours replacement in one
/// transaction and return the post-update aggregate; a `None` result after
/// the service has already confirmed existence is treated as an internal
/// error by the caller.
#[async_trait]
pub trait VenueRepository: Send + Sync {
    /// Finds a venue aggregate by id.
    async fn find_by_id(&self, venue_id: VenueId) -> AppResult<Option<Venue>>;

    /// Lists every venue owned by an account.
    async fn list_by_owner(&self, owner_id: AccountId) -> AppResult<Vec<Venue>>;

    /// Returns true when a different owner already uses this venue name.
    async fn is_name_taken_by_another_owner(
        &self,
        owner_id: AccountId,
        name: &str,
    ) -> AppResult<bool>;

    /// Persists a new venue and its initial schedule. Returns the aggregate.
    async fn create(&self, venue: NewVenue) -> AppResult<Venue>;

    /// Applies a partial update atomically. Returns the updated aggregate,
    /// or `None` when the row vanished between resolution and commit.
    async fn update(
        &self,
        command: UpdateVenueCommand,
        previous: &Venue,
    ) -> AppResult<Option<Venue>>;
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Parameters for venue creation; every field is required.
#[derive(Debug, Clone)]
pub struct CreateVenueInput {
    /// Contact email.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: String,
    /// Street address.
    pub address: String,
    /// Initial weekly schedule, 1–7 entries.
    pub work_hours: Vec<WorkHours>,
}

// ---------------------------------------------------------------------------
// Work-hours reconciler
// ---------------------------------------------------------------------------

/// Maps patch-level work hours into venue-scoped replacement rows.
///
/// Pure with respect to persistence. Field validation has already accepted
/// the entries; a malformed entry reaching this point is an internal error,
/// not a client error.
pub fn reconcile_work_hours(
    venue_id: VenueId,
    entries: &[WorkHours],
) -> AppResult<Vec<WorkHoursRow>> {
    entries
        .iter()
        .map(|entry| {
            if !entry.is_well_formed() {
                return Err(AppError::Internal(format!(
                    "work-hours entry for weekday {} failed reconciliation",
                    entry.weekday
                )));
            }

            Ok(WorkHoursRow {
                venue_id,
                weekday: entry.weekday,
                from: entry.from.clone(),
                to: entry.to.clone(),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for venue profiles.
#[derive(Clone)]
pub struct VenueService {
    venue_repository: Arc<dyn VenueRepository>,
}

impl VenueService {
    /// Creates a new venue service.
    #[must_use]
    pub fn new(venue_repository: Arc<dyn VenueRepository>) -> Self {
        Self { venue_repository }
    }

    /// Creates a venue owned by the caller.
    pub async fn create_venue(
        &self,
        identity: &AccountIdentity,
        input: CreateVenueInput,
    ) -> AppResult<Venue> {
        let mut errors = FieldViolations::default();
        validate_email("email", input.email.as_str(), &mut errors);
        validate_length("email", input.email.as_str(), 1, EMAIL_MAX_LENGTH, &mut errors);
        validate_phone("phone", input.phone.as_str(), &mut errors);
        validate_length(
            "name",
            input.name.as_str(),
            NAME_MIN_LENGTH,
            NAME_MAX_LENGTH,
            &mut errors,
        );
        validate_length(
            "description",
            input.description.as_str(),
            1,
            DESCRIPTION_MAX_LENGTH,
            &mut errors,
        );
        validate_length(
            "address",
            input.address.as_str(),
            1,
            ADDRESS_MAX_LENGTH,
            &mut errors,
        );
        if input.work_hours.is_empty() {
            errors.push("work_hours", "must not be empty");
        }
        validate_work_hours("work_hours", input.work_hours.as_slice(), &mut errors);
        errors.into_result()?;

        let taken = self
            .venue_repository
            .is_name_taken_by_another_owner(identity.account_id(), input.name.as_str())
            .await?;
        if taken {
            return Err(AppError::Conflict(format!(
                "venue name '{}' is already used by another owner",
                input.name
            )));
        }

        self.venue_repository
            .create(NewVenue {
                owner_id: identity.account_id(),
                email: input.email,
                phone: input.phone,
                name: input.name,
                description: input.description,
                address: input.address,
                work_hours: input.work_hours,
            })
            .await
    }

    /// Applies a sparse profile patch to a venue the caller owns.
    ///
    /// Pipeline: field validation, resolution, owner authorization, the
    /// per-owner name uniqueness pre-check, work-hours reconciliation, and
    /// one atomic persistence command built from the present fields only.
    pub async fn update_venue(
        &self,
        identity: &AccountIdentity,
        venue_id: VenueId,
        patch: UpdateVenuePatch,
    ) -> AppResult<Venue> {
        patch.validate()?;

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

        if let Some(name) = patch.name.as_value() {
            let taken = self
                .venue_repository
                .is_name_taken_by_another_owner(venue.owner_id, name.as_str())
                .await?;
            if taken {
                return Err(AppError::Conflict(format!(
                    "venue name '{name}' is already used by another owner"
                )));
            }
        }

        let work_hours = match &patch.work_hours {
            Patch::Value(entries) => Some(reconcile_work_hours(venue.id, entries.as_slice())?),
            Patch::Absent | Patch::Null => None,
        };

        let command = UpdateVenueCommand {
            venue_id: venue.id,
            email: patch.email.into_value(),
            phone: patch.phone.into_value(),
            name: patch.name.into_value(),
            description: patch.description.into_value(),
            address: patch.address.into_value(),
            is_visible: patch.is_visible.into_value(),
            work_hours,
        };

        self.venue_repository
            .update(command, &venue)
            .await?
            .ok_or_else(|| AppError::Internal("no venue found after update".to_owned()))
    }

    /// Returns a venue the caller owns.
    pub async fn venue_by_id(
        &self,
        identity: &AccountIdentity,
        venue_id: VenueId,
    ) -> AppResult<Venue> {
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

        Ok(venue)
    }

    /// Lists every venue owned by the caller.
    pub async fn venues_for_owner(&self, identity: &AccountIdentity) -> AppResult<Vec<Venue>> {
        self.venue_repository
            .list_by_owner(identity.account_id())
            .await
    }
}

#[cfg(test)]
mod tests;
