use serde::Deserialize;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub jwt: JwtSettings,
    #[serde(default)]
    pub seed: SeedConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Raw token settings as read from configuration sources
///
/// Validation happens when these are turned into a signing configuration;
/// every field stays optional here so a missing value is reported by name
/// instead of as a generic deserialization failure.
#[derive(Clone, Deserialize, Default)]
pub struct JwtSettings {
    pub signing_secret: Option<String>,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    /// Kept as text: unparseable values fall back to the default lifetime
    pub expiry_minutes: Option<String>,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("signing_secret", &self.signing_secret.as_ref().map(|_| "[hidden]"))
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiry_minutes", &self.expiry_minutes)
            .finish()
    }
}

/// Optional administrator account created when the directory is empty
#[derive(Clone, Deserialize, Default)]
pub struct SeedConfig {
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl std::fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedConfig")
            .field("admin_email", &self.admin_email)
            .field("admin_password", &self.admin_password.as_ref().map(|_| "[hidden]"))
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(Self::environment())
            .build()?;

        config.try_deserialize()
    }

    /// `APP__SECTION__KEY` variables, kept as text so secrets survive verbatim
    fn environment() -> config::Environment {
        config::Environment::with_prefix("APP").separator("__")
    }
}
