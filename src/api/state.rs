//! Application state for shared services

use std::sync::Arc;

use crate::domain::user::{User, UserRepository};
use crate::domain::DomainError;
use crate::infrastructure::auth::TokenCodec;
use crate::infrastructure::user::{LoginOutcome, PasswordHasher, RegisterUserRequest, UserService};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServiceTrait>,
    pub token_service: Arc<dyn TokenCodec>,
}

impl AppState {
    pub fn new(
        user_service: Arc<dyn UserServiceTrait>,
        token_service: Arc<dyn TokenCodec>,
    ) -> Self {
        Self {
            user_service,
            token_service,
        }
    }
}

/// Trait for user directory operations used by the HTTP layer
#[async_trait::async_trait]
pub trait UserServiceTrait: Send + Sync {
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError>;
    async fn seed_admin(&self, email: &str, password: &str) -> Result<Option<User>, DomainError>;
    async fn authenticate(&self, email: &str, password: &str)
        -> Result<LoginOutcome, DomainError>;
    async fn get(&self, id: &str) -> Result<Option<User>, DomainError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
    async fn count(&self) -> Result<usize, DomainError>;
    async fn deactivate(&self, id: &str) -> Result<User, DomainError>;
    fn get_roles(&self, user: &User) -> Vec<String>;
}

#[async_trait::async_trait]
impl<R, H> UserServiceTrait for UserService<R, H>
where
    R: UserRepository + 'static,
    H: PasswordHasher + 'static,
{
    async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        UserService::register(self, request).await
    }

    async fn seed_admin(&self, email: &str, password: &str) -> Result<Option<User>, DomainError> {
        UserService::seed_admin(self, email, password).await
    }

    async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, DomainError> {
        UserService::authenticate(self, email, password).await
    }

    async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        UserService::get(self, id).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        UserService::find_by_email(self, email).await
    }

    async fn count(&self) -> Result<usize, DomainError> {
        UserService::count(self).await
    }

    async fn deactivate(&self, id: &str) -> Result<User, DomainError> {
        UserService::deactivate(self, id).await
    }

    fn get_roles(&self, user: &User) -> Vec<String> {
        UserService::get_roles(self, user)
    }
}
