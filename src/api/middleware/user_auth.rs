//! Bearer token extractor

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::token::TokenClaims;

/// Extractor that requires a valid access token
///
/// Reads `Authorization: Bearer <token>` and validates signature, issuer,
/// audience and lifetime. Every rejection produces the same 401 response;
/// the specific reason is only logged.
#[derive(Debug, Clone)]
pub struct RequireUser(pub TokenClaims);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_jwt_token(&parts.headers)?;

        let claims = state.token_service.validate(&token).map_err(|rejection| {
            debug!(reason = rejection.code(), "Rejected bearer token");
            ApiError::invalid_token()
        })?;

        Ok(RequireUser(claims))
    }
}

/// Extract the JWT from the Authorization header
pub fn extract_jwt_token(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(auth_header) = headers.get(header::AUTHORIZATION) {
        let auth_str = auth_header.to_str().map_err(|_| {
            debug!("Rejected Authorization header with non-ASCII bytes");
            ApiError::invalid_token()
        })?;

        if let Some(token) = auth_str.strip_prefix("Bearer ") {
            return Ok(token.trim().to_string());
        }
    }

    Err(ApiError::unauthorized(
        "Authentication required. Provide a token via 'Authorization: Bearer <token>' header",
    ))
}
