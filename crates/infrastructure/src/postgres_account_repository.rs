use async_trait::async_trait;
use sqlx::PgPool;

use tabern_application::{AccountRecord, AccountRepository, NewAccount};
use tabern_core::{AccountId, AccountRole, AppError, AppResult};

/// PostgreSQL-backed account repository.
#[derive(Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    phone: String,
    password_hash: String,
    name: String,
    surname: String,
    patronymic: String,
    role: String,
}

impl AccountRow {
    fn into_record(self) -> AppResult<AccountRecord> {
        Ok(AccountRecord {
            id: AccountId::new(self.id),
            email: self.email,
            phone: self.phone,
            password_hash: self.password_hash,
            name: self.name,
            surname: self.surname,
            patronymic: self.patronymic,
            role: AccountRole::parse(self.role.as_str())?,
        })
    }
}

const ACCOUNT_COLUMNS: &str = "id, email, phone, password_hash, name, surname, patronymic, role";

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    async fn find_by_email(&self, email: &str) -> AppResult<Option<AccountRecord>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE lower(email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to look up account by email: {error}"))
        })?;

        row.map(AccountRow::into_record).transpose()
    }

    async fn find_by_id(&self, account_id: AccountId) -> AppResult<Option<AccountRecord>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(account_id.value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to look up account '{account_id}': {error}"
            ))
        })?;

        row.map(AccountRow::into_record).transpose()
    }

    async fn create(&self, account: NewAccount) -> AppResult<AccountRecord> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts (email, phone, password_hash, name, surname, patronymic, role)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.email.as_str())
        .bind(account.phone.as_str())
        .bind(account.password_hash.as_str())
        .bind(account.name.as_str())
        .bind(account.surname.as_str())
        .bind(account.patronymic.as_str())
        .bind(account.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            if let sqlx::Error::Database(ref database_error) = error
                && database_error.is_unique_violation()
            {
                return AppError::Conflict(format!(
                    "email '{}' is already registered",
                    account.email
                ));
            }

            AppError::Internal(format!("failed to create account: {error}"))
        })?;

        row.into_record()
    }
}
