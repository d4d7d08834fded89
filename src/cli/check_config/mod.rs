//! Check-config command - validates the signing configuration and exits

use tracing::{error, info};

use crate::config::AppConfig;
use crate::infrastructure::auth::{SigningConfig, SigningConfigError};
use crate::infrastructure::logging;

/// Load configuration and fail if the service could not start with it
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    let signing =
        check(&config).inspect_err(|e| error!(error = %e, "Invalid signing configuration"))?;

    info!(
        issuer = %signing.issuer(),
        audience = %signing.audience(),
        expiry_minutes = signing.lifetime().num_minutes(),
        "Signing configuration is valid"
    );

    if config.seed.admin_password.is_none() {
        info!("No seed admin password configured; one will be generated on first start");
    }

    Ok(())
}

fn check(config: &AppConfig) -> Result<SigningConfig, SigningConfigError> {
    SigningConfig::from_settings(&config.jwt)
}
