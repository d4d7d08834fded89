//! User entity and related types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::validation::{validate_user_id, UserValidationError};

/// Role assigned to every self-registered user
pub const DEFAULT_ROLE: &str = "Viewer";

/// Role granted to the seeded administrator
pub const ADMIN_ROLE: &str = "Admin";

/// User identifier - alphanumeric + hyphens, max 50 characters
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        validate_user_id(&id)?;
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User entity held by the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    /// Login name; compared case-insensitively
    email: String,
    full_name: String,
    company: String,
    /// Argon2 password hash - never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: String,
    is_active: bool,
    roles: Vec<String>,
    /// Consecutive failed password checks since the last success
    failed_login_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    lockout_end: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new active user with no roles
    pub fn new(
        id: UserId,
        email: impl Into<String>,
        full_name: impl Into<String>,
        company: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id,
            email: email.into(),
            full_name: full_name.into(),
            company: company.into(),
            password_hash: password_hash.into(),
            is_active: true,
            roles: Vec::new(),
            failed_login_count: 0,
            lockout_end: None,
            created_at: now,
            updated_at: now,
            last_login_at: None,
        }
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    pub fn failed_login_count(&self) -> u32 {
        self.failed_login_count
    }

    pub fn lockout_end(&self) -> Option<DateTime<Utc>> {
        self.lockout_end
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    /// Check whether a lockout is in force at the given instant
    pub fn is_locked_out_at(&self, now: DateTime<Utc>) -> bool {
        self.lockout_end.is_some_and(|end| end > now)
    }

    // Mutators

    /// Grant a role; granting an existing role is a no-op
    pub fn add_role(&mut self, role: impl Into<String>) {
        let role = role.into();
        if !self.has_role(&role) {
            self.roles.push(role);
            self.touch();
        }
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
        self.touch();
    }

    /// Count a failed password check, locking the account once
    /// `max_attempts` consecutive failures are reached.
    ///
    /// Failures while a lockout is in force are not counted.
    pub fn record_failed_login(
        &mut self,
        now: DateTime<Utc>,
        max_attempts: u32,
        lockout: Duration,
    ) {
        if self.is_locked_out_at(now) {
            return;
        }

        self.failed_login_count += 1;

        if self.failed_login_count >= max_attempts {
            self.lockout_end = Some(now + lockout);
            self.failed_login_count = 0;
        }

        self.touch();
    }

    /// Record a successful login, clearing failure bookkeeping
    pub fn record_login(&mut self, now: DateTime<Utc>) {
        self.failed_login_count = 0;
        self.lockout_end = None;
        self.last_login_at = Some(now);
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
