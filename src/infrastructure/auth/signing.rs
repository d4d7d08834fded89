//! Signing configuration for access tokens

use chrono::Duration;
use thiserror::Error;

use crate::config::JwtSettings;

/// Minimum signing secret length in bytes for HS256
pub const MIN_SECRET_LENGTH: usize = 32;

/// Token lifetime used when none (or an unusable one) is configured
pub const DEFAULT_EXPIRY_MINUTES: i64 = 60;

/// Errors raised while building the signing configuration at startup
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SigningConfigError {
    #[error("JWT signing secret is not configured")]
    MissingSigningKey,

    #[error("JWT signing secret must be at least {min} bytes long (got {actual})")]
    SigningKeyTooShort { min: usize, actual: usize },

    #[error("JWT issuer is not configured")]
    MissingIssuer,

    #[error("JWT audience is not configured")]
    MissingAudience,
}

/// Validated, immutable signing configuration
#[derive(Clone)]
pub struct SigningConfig {
    secret: String,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl std::fmt::Debug for SigningConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningConfig")
            .field("secret", &"[hidden]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}

impl SigningConfig {
    /// Create a signing configuration, rejecting missing or short secrets
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        lifetime: Duration,
    ) -> Result<Self, SigningConfigError> {
        let secret = secret.into();
        let issuer = issuer.into();
        let audience = audience.into();

        if secret.trim().is_empty() {
            return Err(SigningConfigError::MissingSigningKey);
        }

        if secret.len() < MIN_SECRET_LENGTH {
            return Err(SigningConfigError::SigningKeyTooShort {
                min: MIN_SECRET_LENGTH,
                actual: secret.len(),
            });
        }

        if issuer.trim().is_empty() {
            return Err(SigningConfigError::MissingIssuer);
        }

        if audience.trim().is_empty() {
            return Err(SigningConfigError::MissingAudience);
        }

        Ok(Self {
            secret,
            issuer,
            audience,
            lifetime,
        })
    }

    /// Build from raw settings
    pub fn from_settings(settings: &JwtSettings) -> Result<Self, SigningConfigError> {
        Self::new(
            settings.signing_secret.clone().unwrap_or_default(),
            settings.issuer.clone().unwrap_or_default(),
            settings.audience.clone().unwrap_or_default(),
            Duration::minutes(parse_expiry_minutes(settings.expiry_minutes.as_deref())),
        )
    }

    pub fn secret(&self) -> &[u8] {
        self.secret.as_bytes()
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

/// Parse the configured lifetime, falling back to 60 minutes when the value
/// is absent, unparseable or not positive
pub fn parse_expiry_minutes(raw: Option<&str>) -> i64 {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|minutes| *minutes > 0)
        .unwrap_or(DEFAULT_EXPIRY_MINUTES)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "01234567890123456789012345678901";

    fn settings(secret: Option<&str>, expiry: Option<&str>) -> JwtSettings {
        JwtSettings {
            signing_secret: secret.map(str::to_string),
            issuer: Some("trade-api".to_string()),
            audience: Some("trade-client".to_string()),
            expiry_minutes: expiry.map(str::to_string),
        }
    }

    #[test]
    fn test_valid_settings() {
        let config = SigningConfig::from_settings(&settings(Some(SECRET), Some("30"))).unwrap();

        assert_eq!(config.issuer(), "trade-api");
        assert_eq!(config.audience(), "trade-client");
        assert_eq!(config.lifetime(), Duration::minutes(30));
        assert_eq!(config.secret(), SECRET.as_bytes());
    }

    #[test]
    fn test_missing_secret() {
        assert_eq!(
            SigningConfig::from_settings(&settings(None, None)).unwrap_err(),
            SigningConfigError::MissingSigningKey
        );
        assert_eq!(
            SigningConfig::from_settings(&settings(Some("   "), None)).unwrap_err(),
            SigningConfigError::MissingSigningKey
        );
    }

    #[test]
    fn test_short_secret() {
        let result = SigningConfig::from_settings(&settings(Some("too-short"), None));

        assert_eq!(
            result.unwrap_err(),
            SigningConfigError::SigningKeyTooShort { min: 32, actual: 9 }
        );
    }

    #[test]
    fn test_missing_issuer_and_audience() {
        let mut raw = settings(Some(SECRET), None);
        raw.issuer = None;
        assert_eq!(
            SigningConfig::from_settings(&raw).unwrap_err(),
            SigningConfigError::MissingIssuer
        );

        let mut raw = settings(Some(SECRET), None);
        raw.audience = Some(String::new());
        assert_eq!(
            SigningConfig::from_settings(&raw).unwrap_err(),
            SigningConfigError::MissingAudience
        );
    }

    #[test]
    fn test_expiry_fallback() {
        assert_eq!(parse_expiry_minutes(None), 60);
        assert_eq!(parse_expiry_minutes(Some("abc")), 60);
        assert_eq!(parse_expiry_minutes(Some("0")), 60);
        assert_eq!(parse_expiry_minutes(Some("-5")), 60);
        assert_eq!(parse_expiry_minutes(Some(" 15 ")), 15);
    }

    #[test]
    fn test_debug_hides_secret() {
        let config = SigningConfig::from_settings(&settings(Some(SECRET), None)).unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("trade-api"));
    }
}
