//! Account ports and application service.
//!
//! Owns owner registration and password login. Login failures are generic
//! to prevent account enumeration; credential hashing goes through a port
//! so the service stays free of cryptographic coupling.

use std::sync::Arc;

use async_trait::async_trait;

use tabern_core::{AccountId, AccountRole, AppError, AppResult};
use tabern_domain::{
    EMAIL_MAX_LENGTH, FieldViolations, NAME_MAX_LENGTH, NAME_MIN_LENGTH, validate_email,
    validate_length, validate_phone,
};

/// Minimum password length.
pub const PASSWORD_MIN_LENGTH: usize = 6;
/// Maximum password length.
pub const PASSWORD_MAX_LENGTH: usize = 40;

// ---------------------------------------------------------------------------
// Ports
// ---------------------------------------------------------------------------

/// Account record returned by repository queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    /// Unique account identifier.
    pub id: AccountId,
    /// Canonical email address.
    pub email: String,
    /// Contact phone, 11 digits.
    pub phone: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Patronymic.
    pub patronymic: String,
    /// Account role.
    pub role: AccountRole,
}

/// Fields for a new account record.
#[derive(Debug, Clone)]
pub struct NewAccount {
    /// Canonical email address.
    pub email: String,
    /// Contact phone.
    pub phone: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Given name.
    pub name: String,
    /// Family name.
    pub surname: String,
    /// Patronymic.
    pub patronymic: String,
    /// Account role.
    pub role: AccountRole,
}

/// Repository port for account persistence.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Finds an account by email (case-insensitive).
    async fn find_by_email(&self, email: &str) -> AppResult<Option<AccountRecord>>;

    /// Finds an account by its unique identifier.
    async fn find_by_id(&self, account_id: AccountId) -> AppResult<Option<AccountRecord>>;

    /// Creates a new account record. Returns the persisted record.
    async fn create(&self, account: NewAccount) -> AppResult<AccountRecord>;
}

/// Port for password hashing operations.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plaintext password.
    fn hash_password(&self, password: &str) -> AppResult<String>;

    /// Verifies a plaintext password against a stored hash.
    fn verify_password(&self, password: &str, hash: &str) -> AppResult<bool>;
}

// ---------------------------------------------------------------------------
// Outcomes and inputs
// ---------------------------------------------------------------------------

/// Result of a login attempt.
#[derive(Debug)]
pub enum AuthOutcome {
    /// Authentication succeeded; a session can be established.
    Authenticated(AccountRecord),
    /// Authentication failed. Generic by design: no enumeration.
    Failed,
}

/// Parameters for owner registration.
#[derive(Debug, Clone)]
pub struct RegisterOwnerParams {
    /// Email address for the new account.
    pub email: String,
    /// Contact phone, 11 digits.
    pub phone: String,
    /// Plaintext password, 6–40 chars.
    pub password: String,
    /// Given name, 3–50 chars.
    pub name: String,
    /// Family name, 3–50 chars.
    pub surname: String,
    /// Patronymic, 3–50 chars.
    pub patronymic: String,
}

// ---------------------------------------------------------------------------
// Service
// ---------------------------------------------------------------------------

/// Application service for account registration and login.
#[derive(Clone)]
pub struct AccountService {
    account_repository: Arc<dyn AccountRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
}

impl AccountService {
    /// Creates a new account service.
    #[must_use]
    pub fn new(
        account_repository: Arc<dyn AccountRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
    ) -> Self {
        Self {
            account_repository,
            password_hasher,
        }
    }

    /// Registers a new owner account.
    pub async fn register_owner(&self, params: RegisterOwnerParams) -> AppResult<AccountRecord> {
        let mut errors = FieldViolations::default();
        validate_email("email", params.email.as_str(), &mut errors);
        validate_length("email", params.email.as_str(), 1, EMAIL_MAX_LENGTH, &mut errors);
        validate_phone("phone", params.phone.as_str(), &mut errors);
        validate_length(
            "password",
            params.password.as_str(),
            PASSWORD_MIN_LENGTH,
            PASSWORD_MAX_LENGTH,
            &mut errors,
        );
        validate_length(
            "name",
            params.name.as_str(),
            NAME_MIN_LENGTH,
            NAME_MAX_LENGTH,
            &mut errors,
        );
        validate_length(
            "surname",
            params.surname.as_str(),
            NAME_MIN_LENGTH,
            NAME_MAX_LENGTH,
            &mut errors,
        );
        validate_length(
            "patronymic",
            params.patronymic.as_str(),
            NAME_MIN_LENGTH,
            NAME_MAX_LENGTH,
            &mut errors,
        );
        errors.into_result()?;

        let email = params.email.trim().to_lowercase();
        let existing = self.account_repository.find_by_email(email.as_str()).await?;
        if existing.is_some() {
            // Hash anyway to keep the timing profile uniform.
            let _ = self.password_hasher.hash_password(params.password.as_str());
            return Err(AppError::Conflict(format!(
                "email '{email}' is already registered"
            )));
        }

        let password_hash = self.password_hasher.hash_password(params.password.as_str())?;
        self.account_repository
            .create(NewAccount {
                email,
                phone: params.phone,
                password_hash,
                name: params.name,
                surname: params.surname,
                patronymic: params.patronymic,
                role: AccountRole::Owner,
            })
            .await
    }

    /// Authenticates an account with email and password.
    ///
    /// Returns `AuthOutcome::Failed` for any failure (unknown email, wrong
    /// password) so callers can answer with one generic message.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<AuthOutcome> {
        let email = email.trim().to_lowercase();
        let account = self.account_repository.find_by_email(email.as_str()).await?;

        let Some(account) = account else {
            // Hash to prevent timing side-channels even when no account exists.
            let _ = self.password_hasher.hash_password(password);
            return Ok(AuthOutcome::Failed);
        };

        let password_valid = self
            .password_hasher
            .verify_password(password, account.password_hash.as_str())?;

        if !password_valid {
            return Ok(AuthOutcome::Failed);
        }

        Ok(AuthOutcome::Authenticated(account))
    }

    /// Returns an account record by id, if it exists.
    pub async fn find_by_id(&self, account_id: AccountId) -> AppResult<Option<AccountRecord>> {
        self.account_repository.find_by_id(account_id).await
    }
}
