//! Shared HTTP types: the error body and the JSON extractor

pub mod error;
pub mod json;

pub use error::{ApiError, ApiErrorResponse, ApiErrorType, INVALID_TOKEN_MESSAGE};
pub use json::Json;
