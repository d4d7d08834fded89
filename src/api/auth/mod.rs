//! Authentication API endpoints
//!
//! Registration, login, logout, token refresh, user info and advisory token
//! status. Tokens are stateless: logout only tells the client to discard its
//! token, and refresh issues a new token without invalidating the old one.

use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use chrono::DateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::token::TokenIdentity;
use crate::domain::user::User;
use crate::domain::DomainError;
use crate::infrastructure::auth::{is_near_expiry, read_expiry};
use crate::infrastructure::user::{LoginOutcome, RegisterUserRequest};

const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh-token", post(refresh_token))
        .route("/user-info", get(user_info))
        .route("/token-status", post(token_status))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub company: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body carrying a previously issued token
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    #[serde(default)]
    pub token: String,
}

/// Issued token plus the profile it was issued for
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
    pub email: String,
    pub full_name: String,
    pub company: String,
    pub expires_at: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfoResponse {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub company: String,
    pub is_active: bool,
    pub created_date: String,
    pub roles: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenStatusResponse {
    pub near_expiry: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Register a new account with the default role
///
/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    info!(email = %request.email, "Registration request");

    let user = state
        .user_service
        .register(RegisterUserRequest {
            email: request.email,
            password: request.password,
            full_name: request.full_name,
            company: request.company,
        })
        .await
        .inspect_err(|e| warn!(error = %e, "Registration refused"))?;

    issue_for(&state, &user).map(Json)
}

/// Login with email and password
///
/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    info!(email = %request.email, "Login request");

    let outcome = state
        .user_service
        .authenticate(&request.email, &request.password)
        .await?;

    let user = match outcome {
        LoginOutcome::Success(user) => user,
        LoginOutcome::InvalidCredentials => {
            warn!(email = %request.email, "Login failed: invalid credentials");
            return Err(ApiError::unauthorized(INVALID_CREDENTIALS_MESSAGE));
        }
        LoginOutcome::Inactive => {
            warn!(email = %request.email, "Login failed: account disabled");
            return Err(ApiError::unauthorized(
                "Account is disabled, contact an administrator",
            ));
        }
        LoginOutcome::LockedOut => {
            warn!(email = %request.email, "Login failed: account locked");
            return Err(ApiError::unauthorized("Account is locked, try again later"));
        }
    };

    issue_for(&state, &user).map(Json)
}

/// Logout
///
/// POST /api/auth/logout
///
/// Tokens are not tracked server-side; the client discards its token.
pub async fn logout(RequireUser(claims): RequireUser) -> Json<MessageResponse> {
    info!(
        user_id = %claims.subject_id(),
        email = %claims.email,
        token_id = %claims.token_id(),
        "User logged out"
    );

    Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    })
}

/// Exchange a correctly signed token, expired or not, for a new one
///
/// POST /api/auth/refresh-token
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    if request.token.trim().is_empty() {
        return Err(ApiError::bad_request("Token is required"));
    }

    let identity = state
        .token_service
        .extract_claims(&request.token)
        .ok_or_else(ApiError::invalid_token)?;

    let user = find_subject(&state, &identity.subject_id)
        .await?
        .filter(User::is_active)
        .ok_or_else(|| {
            warn!(user_id = %identity.subject_id, "Refresh refused for missing or disabled user");
            ApiError::unauthorized("User does not exist or is disabled")
        })?;

    let response = issue_for(&state, &user)?;
    info!(user_id = %user.id(), "Token refreshed");

    Ok(Json(response))
}

/// Profile of the token's subject
///
/// GET /api/auth/user-info
pub async fn user_info(
    State(state): State<AppState>,
    RequireUser(claims): RequireUser,
) -> Result<Json<UserInfoResponse>, ApiError> {
    let user = find_subject(&state, claims.subject_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(UserInfoResponse {
        id: user.id().as_str().to_string(),
        email: user.email().to_string(),
        full_name: user.full_name().to_string(),
        company: user.company().to_string(),
        is_active: user.is_active(),
        created_date: user.created_at().to_rfc3339(),
        roles: state.user_service.get_roles(&user),
    }))
}

/// Advisory check whether a token should be refreshed soon.
/// The signature is not verified.
///
/// POST /api/auth/token-status
pub async fn token_status(Json(request): Json<TokenRequest>) -> Json<TokenStatusResponse> {
    let expires_at = read_expiry(&request.token)
        .and_then(|exp| DateTime::from_timestamp(exp, 0))
        .map(|at| at.to_rfc3339());

    Json(TokenStatusResponse {
        near_expiry: is_near_expiry(&request.token),
        expires_at,
    })
}

/// Look up a token subject; an id that cannot name a user counts as missing
async fn find_subject(state: &AppState, subject_id: &str) -> Result<Option<User>, ApiError> {
    match state.user_service.get(subject_id).await {
        Ok(user) => Ok(user),
        Err(DomainError::InvalidId { .. }) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn issue_for(state: &AppState, user: &User) -> Result<TokenResponse, ApiError> {
    let issued = state.token_service.issue(&TokenIdentity::from(user))?;

    info!(
        user_id = %user.id(),
        token_id = %issued.token_id,
        expires_at = %issued.expires_at,
        "Issued access token"
    );

    Ok(TokenResponse {
        token: issued.token,
        email: user.email().to_string(),
        full_name: user.full_name().to_string(),
        company: user.company().to_string(),
        expires_at: issued.expires_at.to_rfc3339(),
    })
}
