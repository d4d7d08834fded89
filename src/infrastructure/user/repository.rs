//! In-memory user repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// Users keyed by ID plus the email index, guarded together
#[derive(Debug, Default)]
struct Directory {
    users: HashMap<String, User>,
    /// Lowercased email -> user ID
    email_index: HashMap<String, String>,
}

impl Directory {
    fn get_mut(&mut self, id: &UserId) -> Result<&mut User, DomainError> {
        self.users
            .get_mut(id.as_str())
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }
}

/// In-memory implementation of UserRepository
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    directory: RwLock<Directory>,
}

fn email_key(email: &str) -> String {
    email.trim().to_lowercase()
}

impl InMemoryUserRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn get(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let directory = self.directory.read().await;
        Ok(directory.users.get(id.as_str()).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let directory = self.directory.read().await;

        Ok(directory
            .email_index
            .get(&email_key(email))
            .and_then(|user_id| directory.users.get(user_id))
            .cloned())
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        let mut directory = self.directory.write().await;

        let id = user.id().as_str().to_string();
        let key = email_key(user.email());

        if directory.users.contains_key(&id) {
            return Err(DomainError::conflict(format!(
                "User with ID '{}' already exists",
                id
            )));
        }

        if directory.email_index.contains_key(&key) {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                user.email()
            )));
        }

        directory.email_index.insert(key, id.clone());
        directory.users.insert(id, user.clone());

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let mut directory = self.directory.write().await;

        let id = user.id().as_str().to_string();

        let Some(existing) = directory.users.get(&id) else {
            return Err(DomainError::not_found(format!("User '{}' not found", id)));
        };

        let old_key = email_key(existing.email());
        let new_key = email_key(user.email());

        if old_key != new_key {
            if directory.email_index.contains_key(&new_key) {
                return Err(DomainError::conflict(format!(
                    "Email '{}' is already registered",
                    user.email()
                )));
            }

            directory.email_index.remove(&old_key);
            directory.email_index.insert(new_key, id.clone());
        }

        directory.users.insert(id, user.clone());

        Ok(user.clone())
    }

    async fn record_failed_login(
        &self,
        id: &UserId,
        now: DateTime<Utc>,
        max_attempts: u32,
        lockout: Duration,
    ) -> Result<User, DomainError> {
        let mut directory = self.directory.write().await;
        let user = directory.get_mut(id)?;

        user.record_failed_login(now, max_attempts, lockout);

        Ok(user.clone())
    }

    async fn record_login(&self, id: &UserId, now: DateTime<Utc>) -> Result<User, DomainError> {
        let mut directory = self.directory.write().await;
        let user = directory.get_mut(id)?;

        user.record_login(now);

        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.directory.read().await.users.len())
    }
}
