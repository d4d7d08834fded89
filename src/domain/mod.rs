//! Domain layer - core types, traits and errors

pub mod error;
pub mod token;
pub mod user;

pub use error::DomainError;
