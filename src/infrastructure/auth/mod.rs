//! Authentication infrastructure module
//!
//! This module provides signing configuration, JWT issuance/validation and
//! advisory lifecycle checks for bearer access tokens.

mod jwt;
mod lifecycle;
mod signing;

pub use jwt::{IssuedToken, JwtTokenService, TokenCodec};
pub use lifecycle::{is_near_expiry, is_near_expiry_at, read_expiry, NEAR_EXPIRY_WINDOW_MINUTES};
pub use signing::{
    parse_expiry_minutes, SigningConfig, SigningConfigError, DEFAULT_EXPIRY_MINUTES,
    MIN_SECRET_LENGTH,
};
