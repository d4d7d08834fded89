//! Token domain
//!
//! Claim set and rejection taxonomy for bearer access tokens.

mod claims;
mod rejection;

pub use claims::{TokenClaims, TokenIdentity};
pub use rejection::TokenRejection;
