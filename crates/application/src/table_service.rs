//! Table ports and application service.
//!
//! Tables are authorized through their owning venue: every mutation
//! resolves the venue first and requires the caller to own it.

use std::sync::Arc;

use async_trait::async_trait;

use tabern_core::{AccountIdentity, AppError, AppResult, Patch};
use tabern_domain::{
    FieldViolations, TABLE_DESCRIPTION_MAX_LENGTH, Table, TableId, UpdateTablePatch, VenueId,
    validate_length, validate_table_capacity, validate_table_name,
};

use crate::venue_service::VenueRepository;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Fields for a new table record.
#[derive(Debug, Clone)]
pub struct NewTable {
    /// Venue the table belongs to.
    pub venue_id: VenueId,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Seat capacity.
    pub capacity: u8,
}

/// Update command carrying only the fields present in the patch.
///
/// `description` is doubly optional: the outer `Option` is presence, the
/// inner one distinguishes a new value from an explicit clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTableCommand {
    /// Target table.
    pub table_id: TableId,
    /// New display name, if changed.
    pub name: Option<String>,
    /// New description (`Some(None)` clears it), if changed.
    pub description: Option<Option<String>>,
    /// New capacity, if changed.
    pub capacity: Option<u8>,
}

/// Repository port for table persistence.
#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Finds a table by id.
    async fn find_by_id(&self, table_id: TableId) -> AppResult<Option<Table>>;

    /// Lists every table of a venue.
    async fn list_by_venue(&self, venue_id: VenueId) -> AppResult<Vec<Table>>;

    /// Persists a new table. Returns the record.
    async fn create(&self, table: NewTable) -> AppResult<Table>;

    /// Applies a partial update. Returns the updated record, or `None` when
    /// the row vanished between resolution and commit.
    async fn update(&self, command: UpdateTableCommand, previous: &Table)
    -> AppResult<Option<Table>>;
}

/// Parameters for table creation.
#[derive(Debug, Clone)]
pub struct CreateTableInput {
    /// Display name, 1–30 chars.
    pub name: String,
    /// Optional description, ≤400 chars.
    pub description: Option<String>,
    /// Seat capacity, 1–70.
    pub capacity: u8,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for venue tables.
#[derive(Clone)]
pub struct TableService {
    table_repository: Arc<dyn TableRepository>,
    venue_repository: Arc<dyn VenueRepository>,
}

impl TableService {
    /// Creates a new table service.
    #[must_use]
    pub fn new(
        table_repository: Arc<dyn TableRepository>,
        venue_repository: Arc<dyn VenueRepository>,
    ) -> Self {
        Self {
            table_repository,
            venue_repository,
        }
    }

    /// Creates a table in a venue the caller owns.
    pub async fn create_table(
        &self,
        identity: &AccountIdentity,
        venue_id: VenueId,
        input: CreateTableInput,
    ) -> AppResult<Table> {
        let mut errors = FieldViolations::default();
        validate_table_name("name", input.name.as_str(), &mut errors);
        validate_table_capacity("persons", input.capacity, &mut errors);
        if let Some(description) = input.description.as_deref() {
            validate_length(
                "description",
                description,
                0,
                TABLE_DESCRIPTION_MAX_LENGTH,
                &mut errors,
            );
        }
        errors.into_result()?;

        self.require_owned_venue(identity, venue_id).await?;

        self.table_repository
            .create(NewTable {
                venue_id,
                name: input.name,
                description: input.description,
                capacity: input.capacity,
            })
            .await
    }

    /// Lists the tables of a venue the caller owns.
    pub async fn tables_for_venue(
        &self,
        identity: &AccountIdentity,
        venue_id: VenueId,
    ) -> AppResult<Vec<Table>> {
        self.require_owned_venue(identity, venue_id).await?;
        self.table_repository.list_by_venue(venue_id).await
    }

    /// Applies a sparse patch to a table in a venue the caller owns.
    pub async fn update_table(
        &self,
        identity: &AccountIdentity,
        table_id: TableId,
        patch: UpdateTablePatch,
    ) -> AppResult<Table> {
        patch.validate()?;

        let table = self
            .table_repository
            .find_by_id(table_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no table with id {table_id}")))?;

        self.require_owned_venue(identity, table.venue_id).await?;

        let command = UpdateTableCommand {
            table_id: table.id,
            name: patch.name.into_value(),
            description: match patch.description {
                Patch::Absent => None,
                Patch::Null => Some(None),
                Patch::Value(value) => Some(Some(value)),
            },
            capacity: patch.capacity.into_value(),
        };

        self.table_repository
            .update(command, &table)
            .await?
            .ok_or_else(|| AppError::Internal("no table found after update".to_owned()))
    }

    /// Resolves a venue and requires the caller to own it.
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
