use serde::{Deserialize, Serialize};

use crate::{AccountId, AppError};

/// Role attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Administers one or more venues on behalf of an owner.
    Admin,
    /// Owns venues; the authorization scope for venue mutations.
    Owner,
}

impl AccountRole {
    /// Returns the storage string for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Owner => "owner",
        }
    }

    /// Parses a storage string into a role.
    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "admin" => Ok(Self::Admin),
            "owner" => Ok(Self::Owner),
            _ => Err(AppError::Validation(format!(
                "unknown account role '{value}'"
            ))),
        }
    }
}

/// Account information persisted in the authenticated session.
///
/// Supplied by the authentication boundary; the services only ever compare
/// identities, they never touch credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentity {
    account_id: AccountId,
    display_name: String,
    email: String,
    role: AccountRole,
}

impl AccountIdentity {
    /// Creates an account identity from authentication data.
    #[must_use]
    pub fn new(
        account_id: AccountId,
        display_name: impl Into<String>,
        email: impl Into<String>,
        role: AccountRole,
    ) -> Self {
        Self {
            account_id,
            display_name: display_name.into(),
            email: email.into(),
            role,
        }
    }

    /// Returns the stable account identifier.
    #[must_use]
    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    /// Returns the display name for the current account.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_str()
    }

    /// Returns the account's email address.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Returns the account's role.
    #[must_use]
    pub fn role(&self) -> AccountRole {
        self.role
    }
}
