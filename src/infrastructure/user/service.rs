//! User directory service: registration, credential checks and lockout

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::user::{
    validate_email, validate_password, validate_profile_field, User, UserId, UserRepository,
    ADMIN_ROLE, DEFAULT_ROLE,
};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub company: String,
}

/// Failed-login lockout rules
#[derive(Debug, Clone, Copy)]
pub struct LockoutPolicy {
    pub max_failed_attempts: u32,
    pub lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_failed_attempts: 5,
            lockout_duration: Duration::minutes(5),
        }
    }
}

/// Result of a password sign-in attempt
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    Success(User),
    /// Unknown email or wrong password; the two are indistinguishable
    InvalidCredentials,
    Inactive,
    LockedOut,
}

/// User service for registration and authentication
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
    lockout: LockoutPolicy,
    /// Verified against when the email is unknown so both paths cost one hash check
    dummy_hash: Option<String>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service with the default lockout policy
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self::with_lockout_policy(repository, hasher, LockoutPolicy::default())
    }

    pub fn with_lockout_policy(
        repository: Arc<R>,
        hasher: Arc<H>,
        lockout: LockoutPolicy,
    ) -> Self {
        let dummy_hash = hasher.hash(&UserId::generate().to_string()).ok();

        Self {
            repository,
            hasher,
            lockout,
            dummy_hash,
        }
    }

    /// Register a new user with the default role
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        let mut user = self.build_user(&request).await?;
        user.add_role(DEFAULT_ROLE);

        let user = self.repository.create(user).await?;
        info!(user_id = %user.id(), email = %user.email(), "User registered");

        Ok(user)
    }

    /// Create the administrator account if the directory is empty.
    ///
    /// Returns the created user, or `None` when users already exist.
    pub async fn seed_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        if self.repository.count().await? > 0 {
            return Ok(None);
        }

        let request = RegisterUserRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: "System Administrator".to_string(),
            company: "Trade Management Inc.".to_string(),
        };

        let mut user = self.build_user(&request).await?;
        user.add_role(ADMIN_ROLE);

        let user = self.repository.create(user).await?;
        info!(user_id = %user.id(), email = %user.email(), "Administrator account created");

        Ok(Some(user))
    }

    async fn build_user(&self, request: &RegisterUserRequest) -> Result<User, DomainError> {
        let email = request.email.trim();

        validate_email(email).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_password(&request.password).map_err(|e| DomainError::validation(e.to_string()))?;
        validate_profile_field("Full name", &request.full_name)
            .map_err(|e| DomainError::validation(e.to_string()))?;
        validate_profile_field("Company", &request.company)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        if self.repository.email_exists(email).await? {
            return Err(DomainError::conflict(format!(
                "Email '{}' is already registered",
                email
            )));
        }

        let password_hash = self.hasher.hash(&request.password)?;

        Ok(User::new(
            UserId::generate(),
            email,
            request.full_name.trim(),
            request.company.trim(),
            password_hash,
        ))
    }

    /// Authenticate with email and password, applying the lockout policy
    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, DomainError> {
        self.authenticate_at(email, password, Utc::now()).await
    }

    pub async fn authenticate_at(
        &self,
        email: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, DomainError> {
        let Some(user) = self.find_by_email(email).await? else {
            if let Some(dummy_hash) = &self.dummy_hash {
                self.hasher.verify(password, dummy_hash);
            }
            return Ok(LoginOutcome::InvalidCredentials);
        };

        if !user.is_active() {
            return Ok(LoginOutcome::Inactive);
        }

        if user.is_locked_out_at(now) {
            return Ok(LoginOutcome::LockedOut);
        }

        if !self.check_password(&user, password) {
            let user = self
                .repository
                .record_failed_login(
                    user.id(),
                    now,
                    self.lockout.max_failed_attempts,
                    self.lockout.lockout_duration,
                )
                .await?;

            if user.is_locked_out_at(now) {
                warn!(user_id = %user.id(), "Login refused, account locked after repeated failures");
                return Ok(LoginOutcome::LockedOut);
            }

            return Ok(LoginOutcome::InvalidCredentials);
        }

        let user = self.repository.record_login(user.id(), now).await?;

        Ok(LoginOutcome::Success(user))
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
        self.repository.get(&user_id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.repository.get_by_email(email.trim()).await
    }

    pub fn check_password(&self, user: &User, password: &str) -> bool {
        self.hasher.verify(password, user.password_hash())
    }

    pub fn is_locked_out(&self, user: &User) -> bool {
        user.is_locked_out_at(Utc::now())
    }

    pub fn get_roles(&self, user: &User) -> Vec<String> {
        user.roles().to_vec()
    }

    /// Grant a role; granting a role the user already has is a no-op
    pub async fn add_to_role(&self, id: &str, role: &str) -> Result<User, DomainError> {
        if role.trim().is_empty() {
            return Err(DomainError::validation("Role cannot be empty"));
        }

        let mut user = self.require(id).await?;
        user.add_role(role.trim());
        self.repository.update(&user).await
    }

    pub async fn count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }

    /// Disable a user; they can no longer log in or refresh tokens
    pub async fn deactivate(&self, id: &str) -> Result<User, DomainError> {
        let mut user = self.require(id).await?;
        user.deactivate();
        self.repository.update(&user).await
    }

    async fn require(&self, id: &str) -> Result<User, DomainError> {
        self.get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("User '{}' not found", id)))
    }
}
