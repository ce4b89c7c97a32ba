use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered account as stored in the `users` table.
///
/// The password hash is never serialized; API responses use [`AccountResponse`].
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Account {
    /// Unique identifier for the account (UUID v4).
    pub id: Uuid,
    /// Normalized (trimmed, lower-case) email address.
    pub email: String,
    /// bcrypt hash of the account password.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Timestamp of registration.
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Creates a new account record with a fresh id. `email` must already be normalized.
    pub fn new(email: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

/// Public view of an account returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountResponse {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            created_at: account.created_at,
        }
    }
}

/// Normalizes an email for storage and lookup so that comparison is case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
