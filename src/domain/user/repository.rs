//! User repository trait

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email (case-insensitive, used for login)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Create a new user
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Count a failed password check and apply the lockout rule atomically.
    ///
    /// Returns the user as stored after the update.
    async fn record_failed_login(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
        max_attempts: u32,
        lockout: Duration,
    ) -> Result<User, DomainError>;

    /// Record a successful login, clearing failure bookkeeping
    async fn record_login(&self, id: &UserId, now: DateTime<Utc>) -> Result<User, DomainError>;

    /// Count all users
    async fn count(&self) -> Result<usize, DomainError>;

    /// Check if an email is already registered
    async fn email_exists(&self, email: &str) -> Result<bool, DomainError> {
        Ok(self.get_by_email(email).await?.is_some())
    }
}
