//! Infrastructure layer - token codec, user directory and logging

pub mod auth;
pub mod logging;
pub mod user;
