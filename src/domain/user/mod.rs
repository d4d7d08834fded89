//! User domain
//!
//! This module provides domain types and traits for the user directory,
//! including user entities, validation, and repository traits.

mod entity;
mod repository;
mod validation;

pub use entity::{User, UserId, ADMIN_ROLE, DEFAULT_ROLE};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_password, validate_profile_field, validate_user_id,
    UserValidationError,
};
