use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use tabern_application::{NewVenue, UpdateVenueCommand, VenueRepository};
use tabern_core::{AccountId, AppError, AppResult};
use tabern_domain::{Venue, VenueId, WorkHours};

/// PostgreSQL-backed venue repository.
#[derive(Clone)]
pub struct PostgresVenueRepository {
    pool: PgPool,
}

impl PostgresVenueRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct VenueRow {
    id: i64,
    owner_id: i64,
    email: String,
    phone: String,
    name: String,
    description: String,
    address: String,
    logo_url: Option<String>,
    is_visible: bool,
}

/// Loads the full venue aggregate (row + schedule + admin list).
///
/// Takes a bare connection so callers can run it inside a transaction and
/// observe uncommitted writes.
async fn fetch_venue(conn: &mut PgConnection, venue_id: i64) -> AppResult<Option<Venue>> {
    let row = sqlx::query_as::<_, VenueRow>(
        r#"
        SELECT id, owner_id, email, phone, name, description, address, logo_url, is_visible
        FROM venues
        WHERE id = $1
        "#,
    )
    .bind(venue_id)
    .fetch_optional(&mut *conn)
    .await
    .map_err(|error| AppError::Internal(format!("failed to load venue '{venue_id}': {error}")))?;

    let Some(row) = row else {
        return Ok(None);
    };

    let schedule_rows = sqlx::query_as::<_, (i16, String, String)>(
        r#"
        SELECT weekday, opens_at, closes_at
        FROM venue_work_hours
        WHERE venue_id = $1
        ORDER BY weekday, opens_at
        "#,
    )
    .bind(venue_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|error| {
        AppError::Internal(format!(
            "failed to load work hours for venue '{venue_id}': {error}"
        ))
    })?;

    let work_hours = schedule_rows
        .into_iter()
        .map(|(weekday, opens_at, closes_at)| {
            let weekday = u8::try_from(weekday).map_err(|_| {
                AppError::Internal(format!(
                    "venue '{venue_id}' has a corrupt weekday value '{weekday}'"
                ))
            })?;
            Ok(WorkHours::new(weekday, opens_at, closes_at))
        })
        .collect::<AppResult<Vec<_>>>()?;

    let admin_ids = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT account_id
        FROM venue_admins
        WHERE venue_id = $1
        ORDER BY account_id
        "#,
    )
    .bind(venue_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(|error| {
        AppError::Internal(format!(
            "failed to load admins for venue '{venue_id}': {error}"
        ))
    })?;

    Ok(Some(Venue {
        id: VenueId::new(row.id),
        owner_id: AccountId::new(row.owner_id),
        email: row.email,
        phone: row.phone,
        name: row.name,
        description: row.description,
        address: row.address,
        logo_url: row.logo_url,
        is_visible: row.is_visible,
        admin_ids: admin_ids.into_iter().map(AccountId::new).collect(),
        work_hours,
    }))
}

/// Maps a write failure, translating the `(owner_id, name)` unique-index
/// violation into the conflict the pre-check would have reported.
fn translate_name_collision(error: sqlx::Error, name: &str) -> AppError {
    if let sqlx::Error::Database(ref database_error) = error
        && database_error.is_unique_violation()
    {
        return AppError::Conflict(format!("venue name '{name}' is already used"));
    }

    AppError::Internal(format!("failed to persist venue: {error}"))
}

#[async_trait]
impl VenueRepository for PostgresVenueRepository {
    async fn find_by_id(&self, venue_id: VenueId) -> AppResult<Option<Venue>> {
        let mut conn = self.pool.acquire().await.map_err(|error| {
            AppError::Internal(format!("failed to acquire connection: {error}"))
        })?;

        fetch_venue(&mut conn, venue_id.value()).await
    }

    async fn list_by_owner(&self, owner_id: AccountId) -> AppResult<Vec<Venue>> {
        let mut conn = self.pool.acquire().await.map_err(|error| {
            AppError::Internal(format!("failed to acquire connection: {error}"))
        })?;

        let venue_ids = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT id
            FROM venues
            WHERE owner_id = $1
            ORDER BY id
            "#,
        )
        .bind(owner_id.value())
        .fetch_all(&mut *conn)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to list venues for owner '{owner_id}': {error}"
            ))
        })?;

        let mut venues = Vec::with_capacity(venue_ids.len());
        for venue_id in venue_ids {
            if let Some(venue) = fetch_venue(&mut conn, venue_id).await? {
                venues.push(venue);
            }
        }

        Ok(venues)
    }

    async fn is_name_taken_by_another_owner(
        &self,
        owner_id: AccountId,
        name: &str,
    ) -> AppResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM venues
                WHERE name = $2 AND owner_id <> $1
            )
            "#,
        )
        .bind(owner_id.value())
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to check venue name '{name}' for owner '{owner_id}': {error}"
            ))
        })
    }

    async fn create(&self, venue: NewVenue) -> AppResult<Venue> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let venue_id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO venues (owner_id, email, phone, name, description, address, is_visible)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            RETURNING id
            "#,
        )
        .bind(venue.owner_id.value())
        .bind(venue.email.as_str())
        .bind(venue.phone.as_str())
        .bind(venue.name.as_str())
        .bind(venue.description.as_str())
        .bind(venue.address.as_str())
        .fetch_one(&mut *transaction)
        .await
        .map_err(|error| translate_name_collision(error, venue.name.as_str()))?;

        for entry in &venue.work_hours {
            sqlx::query(
                r#"
                INSERT INTO venue_work_hours (venue_id, weekday, opens_at, closes_at)
                VALUES ($1, $2, $3, $4)
                "#,
            )
            .bind(venue_id)
            .bind(i16::from(entry.weekday))
            .bind(entry.from.as_str())
            .bind(entry.to.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to insert work hours for venue '{venue_id}': {error}"
                ))
            })?;
        }

        let created = fetch_venue(&mut transaction, venue_id)
            .await?
            .ok_or_else(|| {
                AppError::Internal(format!("venue '{venue_id}' missing after insert"))
            })?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(created)
    }

    async fn update(
        &self,
        command: UpdateVenueCommand,
        _previous: &Venue,
    ) -> AppResult<Option<Venue>> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let renamed_to = command.name.clone().unwrap_or_default();

        sqlx::query(
            r#"
            UPDATE venues SET
                email = COALESCE($2, email),
                phone = COALESCE($3, phone),
                name = COALESCE($4, name),
                description = COALESCE($5, description),
                address = COALESCE($6, address),
                is_visible = COALESCE($7, is_visible),
                updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(command.venue_id.value())
        .bind(command.email)
        .bind(command.phone)
        .bind(command.name)
        .bind(command.description)
        .bind(command.address)
        .bind(command.is_visible)
        .execute(&mut *transaction)
        .await
        .map_err(|error| translate_name_collision(error, renamed_to.as_str()))?;

        if let Some(rows) = command.work_hours {
            sqlx::query("DELETE FROM venue_work_hours WHERE venue_id = $1")
                .bind(command.venue_id.value())
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!(
                        "failed to clear work hours for venue '{}': {error}",
                        command.venue_id
                    ))
                })?;

            for row in rows {
                sqlx::query(
                    r#"
                    INSERT INTO venue_work_hours (venue_id, weekday, opens_at, closes_at)
                    VALUES ($1, $2, $3, $4)
                    "#,
                )
                .bind(row.venue_id.value())
                .bind(i16::from(row.weekday))
                .bind(row.from.as_str())
                .bind(row.to.as_str())
                .execute(&mut *transaction)
                .await
                .map_err(|error| {
                    AppError::Internal(format!(
                        "failed to insert work hours for venue '{}': {error}",
                        row.venue_id
                    ))
                })?;
            }
        }

        let updated = fetch_venue(&mut transaction, command.venue_id.value()).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Ok(updated)
    }
}
