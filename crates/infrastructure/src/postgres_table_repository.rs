use async_trait::async_trait;
use sqlx::PgPool;

use tabern_application::{NewTable, TableRepository, UpdateTableCommand};
use tabern_core::{AppError, AppResult};
use tabern_domain::{Table, TableId, VenueId};

/// PostgreSQL-backed table repository.
#[derive(Clone)]
pub struct PostgresTableRepository {
    pool: PgPool,
}

impl PostgresTableRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct TableRow {
    id: i64,
    venue_id: i64,
    name: String,
    description: Option<String>,
    capacity: i16,
}

impl TableRow {
    fn into_table(self) -> AppResult<Table> {
        let capacity = u8::try_from(self.capacity).map_err(|_| {
            AppError::Internal(format!(
                "table '{}' has a corrupt capacity value '{}'",
                self.id, self.capacity
            ))
        })?;

        Ok(Table {
            id: TableId::new(self.id),
            venue_id: VenueId::new(self.venue_id),
            name: self.name,
            description: self.description,
            capacity,
        })
    }
}

#[async_trait]
impl TableRepository for PostgresTableRepository {
    async fn find_by_id(&self, table_id: TableId) -> AppResult<Option<Table>> {
        let row = sqlx::query_as::<_, TableRow>(
            r#"
            SELECT id, venue_id, name, description, capacity
            FROM venue_tables
            WHERE id = $1
            "#,
        )
        .bind(table_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to load table '{table_id}': {error}"))
        })?;

        row.map(TableRow::into_table).transpose()
    }

    async fn list_by_venue(&self, venue_id: VenueId) -> AppResult<Vec<Table>> {
        let rows = sqlx::query_as::<_, TableRow>(
            r#"
            SELECT id, venue_id, name, description, capacity
            FROM venue_tables
            WHERE venue_id = $1
            ORDER BY id
            "#,
        )
        .bind(venue_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list tables for venue '{venue_id}': {error}"
            ))
        })?;

        rows.into_iter().map(TableRow::into_table).collect()
    }

    async fn create(&self, table: NewTable) -> AppResult<Table> {
        let row = sqlx::query_as::<_, TableRow>(
            r#"
            INSERT INTO venue_tables (venue_id, name, description, capacity)
            VALUES ($1, $2, $3, $4)
            RETURNING id, venue_id, name, description, capacity
            "#,
        )
        .bind(table.venue_id.value())
        .bind(table.name.as_str())
        .bind(table.description.as_deref())
        .bind(i16::from(table.capacity))
        .fetch_one(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to create table: {error}")))?;

        row.into_table()
    }

    async fn update(
        &self,
        command: UpdateTableCommand,
        _previous: &Table,
    ) -> AppResult<Option<Table>> {
        // The doubly-optional description needs an explicit presence flag:
        // COALESCE alone cannot distinguish "keep" from "clear to NULL".
        let description_present = command.description.is_some();
        let description_value = command.description.flatten();

        let row = sqlx::query_as::<_, TableRow>(
            r#"
            UPDATE venue_tables SET
                name = COALESCE($2, name),
                description = CASE WHEN $3 THEN $4 ELSE description END,
                capacity = COALESCE($5, capacity)
            WHERE id = $1
            RETURNING id, venue_id, name, description, capacity
            "#,
        )
        .bind(command.table_id.value())
        .bind(command.name)
        .bind(description_present)
        .bind(description_value)
        .bind(command.capacity.map(i16::from))
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to update table '{}': {error}",
                command.table_id
            ))
        })?;

        row.map(TableRow::into_table).transpose()
    }
}
