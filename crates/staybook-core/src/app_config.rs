use std::net::SocketAddr;

use crate::geo::Coordinate;
use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Settings for the geocoding provider chain.
#[derive(Clone)]
pub struct GeocodeConfig {
    pub primary_base_url: String,
    pub primary_api_key: Option<String>,
    pub fallback_base_url: String,
    pub fallback_api_key: Option<String>,
    pub timeout_secs: u64,
    pub result_limit: u32,
    pub user_agent: String,
    /// Point used when no provider resolves a query.
    pub default_coordinate: Coordinate,
}

impl std::fmt::Debug for GeocodeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodeConfig")
            .field("primary_base_url", &self.primary_base_url)
            .field(
                "primary_api_key",
                &self.primary_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("fallback_base_url", &self.fallback_base_url)
            .field(
                "fallback_api_key",
                &self.fallback_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("timeout_secs", &self.timeout_secs)
            .field("result_limit", &self.result_limit)
            .field("user_agent", &self.user_agent)
            .field("default_coordinate", &self.default_coordinate)
            .finish()
    }
}

/// Credentials for the image-storage collaborator.
///
/// Each field is optional at load time; listing creation refuses to run
/// unless all three are present.
#[derive(Clone, Default)]
pub struct ImageStorageConfig {
    pub cloud_name: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
}

impl ImageStorageConfig {
    /// Names of the env vars whose values are missing, in declaration order.
    #[must_use]
    pub fn missing_vars(&self) -> Vec<&'static str> {
        [
            ("CLOUD_NAME", &self.cloud_name),
            ("CLOUD_API_KEY", &self.api_key),
            ("CLOUD_API_SECRET", &self.api_secret),
        ]
        .into_iter()
        .filter(|(_, v)| v.as_deref().is_none_or(|s| s.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_vars().is_empty()
    }
}

impl std::fmt::Debug for ImageStorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageStorageConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key.as_ref().map(|_| "[redacted]"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    /// Only commands that open a pool need it; see [`AppConfig::require_database_url`].
    pub database_url: Option<String>,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub geocode: GeocodeConfig,
    pub image_storage: ImageStorageConfig,
    /// Bearer tokens accepted by the API, from `STAYBOOK_API_KEYS`.
    /// Trimmed, deduplicated and sorted; empty when unset.
    pub api_keys: Vec<String>,
}

impl AppConfig {
    /// Returns `DATABASE_URL`, or an error naming it when unset.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when no database URL was configured.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &self.database_url.as_ref().map(|_| "[redacted]"))
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("geocode", &self.geocode)
            .field("image_storage", &self.image_storage)
            .field("api_keys", &format_args!("[{} redacted]", self.api_keys.len()))
            .finish()
    }
}
