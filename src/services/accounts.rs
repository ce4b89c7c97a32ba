use std::sync::Arc;

use uuid::Uuid;

use crate::auth::password::MAX_PASSWORD_BYTES;
use crate::auth::{PasswordHasher, TokenService};
use crate::error::AppError;
use crate::models::{normalize_email, Account};
use crate::store::{AccountStore, StoreError};

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Registration and sign-in. Every successful call returns the account together with
/// a freshly issued access token.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    hasher: PasswordHasher,
    tokens: TokenService,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>, hasher: PasswordHasher, tokens: TokenService) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Creates an account and signs it in.
    ///
    /// Fails with `DuplicateEmail` if the email is taken, `WeakPassword` if the password is
    /// shorter than [`MIN_PASSWORD_LENGTH`] and `BadRequest` if it is longer than bcrypt
    /// can read. All checks run before anything is written.
    pub async fn register(&self, email: &str, password: &str) -> Result<(Account, String), AppError> {
        let email = normalize_email(email);

        if self.store.find_account_by_email(&email).await?.is_some() {
            log::info!(target: "security", "Registration rejected: email already registered");
            return Err(AppError::DuplicateEmail);
        }

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::WeakPassword);
        }
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AppError::BadRequest(format!(
                "Password must be at most {} bytes long",
                MAX_PASSWORD_BYTES
            )));
        }

        let password_hash = self.hash_password(password).await?;
        let account = match self
            .store
            .insert_account(&Account::new(email, password_hash))
            .await
        {
            Ok(account) => account,
            // lost a race with a concurrent registration for the same email
            Err(StoreError::UniqueViolation(_)) => return Err(AppError::DuplicateEmail),
            Err(e) => return Err(e.into()),
        };

        let token = self.issue_token(&account)?;
        log::info!("Registered account {}", account.id);
        Ok((account, token))
    }

    /// Signs in with email and password.
    ///
    /// Returns `Ok(None)` for an unknown email and for a wrong password alike.
    pub async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<(Account, String)>, AppError> {
        let email = normalize_email(email);

        let account = match self.store.find_account_by_email(&email).await? {
            Some(account) => account,
            None => {
                log::warn!(target: "security", "Sign-in failed: invalid credentials");
                return Ok(None);
            }
        };
        if !self
            .verify_password(password, &account.password_hash)
            .await?
        {
            log::warn!(target: "security", "Sign-in failed: invalid credentials");
            return Ok(None);
        }

        let token = self.issue_token(&account)?;
        log::info!(target: "security", "Sign-in succeeded for account {}", account.id);
        Ok(Some((account, token)))
    }

    pub async fn find(&self, account_id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(self.store.find_account_by_id(account_id).await?)
    }

    /// Deletes the account and, through the store, all of its tasks.
    ///
    /// Outstanding tokens for the account stay verifiable until they expire; every
    /// owner-scoped query then finds nothing.
    pub async fn close(&self, account_id: Uuid) -> Result<bool, AppError> {
        let removed = self.store.delete_account(account_id).await?;
        if removed {
            log::info!(target: "security", "Closed account {}", account_id);
        }
        Ok(removed)
    }

    fn issue_token(&self, account: &Account) -> Result<String, AppError> {
        self.tokens
            .issue(account.id, &account.email, self.tokens.default_ttl())
    }

    async fn hash_password(&self, password: &str) -> Result<String, AppError> {
        let hasher = self.hasher;
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AppError> {
        let hasher = self.hasher;
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::InternalServerError(format!("Verification task failed: {}", e)))
    }
}
