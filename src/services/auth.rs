//! Domain service for account management.
//!
//! Handles signup, login and API key lifecycle. Session handling stays in the
//! HTTP layer; this service only answers identity questions.

use thiserror::Error;

use crate::config::AuthConfig;
use crate::db::{Store, User};

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email is already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("User not found")]
    UserNotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[derive(Clone)]
pub struct AuthService {
    store: Store,
}

impl AuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Register a new account. The caller is responsible for syntactic email
    /// validation; this checks the password policy and uniqueness.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        config: &AuthConfig,
    ) -> Result<User, AuthError> {
        if password.chars().count() < config.min_password_length {
            return Err(AuthError::PasswordTooShort(config.min_password_length));
        }

        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        Ok(self.store.create_user(email, password, config).await?)
    }

    /// Check credentials and return the account on success
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        self.store
            .verify_user_password(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)
    }

    pub async fn get_user(&self, user_id: i32) -> Result<User, AuthError> {
        self.store
            .get_user_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Mint a new API key, invalidating the previous one
    pub async fn regenerate_api_key(&self, user_id: i32) -> Result<String, AuthError> {
        Ok(self.store.regenerate_user_api_key(user_id).await?)
    }
}
