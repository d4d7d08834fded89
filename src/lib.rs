//! Trade Auth Gateway
//!
//! Authentication service for the Trade Management platform:
//! - HS256 access token issuance, validation and refresh
//! - Advisory near-expiry checks for clients
//! - An in-process user directory with Argon2 password hashing and lockout

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use api::state::{AppState, UserServiceTrait};
use config::SeedConfig;
use domain::user::validate_password;
use infrastructure::{
    auth::{JwtTokenService, SigningConfig, TokenCodec},
    user::{Argon2Hasher, InMemoryUserRepository, UserService},
};
use rand::Rng;
use tracing::{info, warn};

/// Email of the administrator created on first start when none is configured
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@trademanagement.com";

/// Create the application state with all services initialized.
///
/// Fails when the signing configuration is missing or invalid; the service
/// must not start without a usable secret.
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let signing =
        SigningConfig::from_settings(&config.jwt).context("Invalid JWT signing configuration")?;

    info!(
        issuer = %signing.issuer(),
        audience = %signing.audience(),
        expiry_minutes = signing.lifetime().num_minutes(),
        "JWT signing configured"
    );

    let token_service: Arc<dyn TokenCodec> = Arc::new(JwtTokenService::new(signing));

    let user_repository = Arc::new(InMemoryUserRepository::new());
    let password_hasher = Arc::new(Argon2Hasher::new());
    let user_service: Arc<dyn UserServiceTrait> =
        Arc::new(UserService::new(user_repository, password_hasher));

    create_initial_admin_user(user_service.as_ref(), &config.seed).await?;

    Ok(AppState::new(user_service, token_service))
}

/// Generate a random password for the initial admin user
fn generate_random_password() -> String {
    use rand::distributions::Alphanumeric;

    loop {
        let candidate: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(16)
            .map(char::from)
            .collect();

        if validate_password(&candidate).is_ok() {
            return candidate;
        }
    }
}

/// Create an initial admin user if no users exist
async fn create_initial_admin_user(
    user_service: &dyn UserServiceTrait,
    seed: &SeedConfig,
) -> anyhow::Result<()> {
    let email = seed.admin_email.as_deref().unwrap_or(DEFAULT_ADMIN_EMAIL);

    let (password, is_configured) = match seed.admin_password.as_deref() {
        Some(p) if !p.is_empty() => (p.to_string(), true),
        _ => (generate_random_password(), false),
    };

    let Some(admin) = user_service
        .seed_admin(email, &password)
        .await
        .context("Failed to create initial admin user")?
    else {
        return Ok(());
    };

    info!("===========================================");
    info!("Initial admin user created!");
    info!("Email: {}", admin.email());

    if is_configured {
        info!("Password: (set via seed.admin_password)");
    } else {
        warn!("Password: {}", password);
        warn!("Please change this password after first login.");
    }

    info!("===========================================");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JwtSettings;

    fn test_config() -> AppConfig {
        AppConfig {
            jwt: JwtSettings {
                signing_secret: Some("01234567890123456789012345678901".to_string()),
                issuer: Some("trade-api".to_string()),
                audience: Some("trade-client".to_string()),
                expiry_minutes: None,
            },
            seed: SeedConfig {
                admin_email: Some("root@example.com".to_string()),
                admin_password: Some("Admin123!".to_string()),
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn test_generated_password_meets_policy() {
        for _ in 0..20 {
            let password = generate_random_password();
            assert_eq!(password.len(), 16);
            assert!(validate_password(&password).is_ok());
        }
    }

    #[tokio::test]
    async fn test_create_app_state_seeds_admin() {
        let state = create_app_state(&test_config()).await.unwrap();

        assert_eq!(state.user_service.count().await.unwrap(), 1);

        let admin = state
            .user_service
            .find_by_email("root@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(admin.has_role(domain::user::ADMIN_ROLE));
        assert_eq!(state.token_service.lifetime().num_minutes(), 60);
    }

    #[tokio::test]
    async fn test_create_app_state_requires_secret() {
        let mut config = test_config();
        config.jwt.signing_secret = None;

        assert!(create_app_state(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_create_app_state_generates_admin_password() {
        let mut config = test_config();
        config.seed = SeedConfig::default();

        let state = create_app_state(&config).await.unwrap();

        let admin = state
            .user_service
            .find_by_email(DEFAULT_ADMIN_EMAIL)
            .await
            .unwrap();
        assert!(admin.is_some());
    }
}
