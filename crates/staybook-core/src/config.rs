use crate::app_config::{AppConfig, Environment, GeocodeConfig, ImageStorageConfig};
use crate::geo::Coordinate;
use crate::ConfigError;

const DEFAULT_PRIMARY_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_FALLBACK_URL: &str = "https://api.opencagedata.com/geocode/v1";
const DEFAULT_USER_AGENT: &str = "staybook/0.1 (listing-geocoder)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid. A missing `DATABASE_URL` is
/// reported later, by [`AppConfig::require_database_url`].
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so the
/// logic can be tested against a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty values count as unset so `FOO=` in a .env file disables a credential.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        or_default(var, default)
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = optional("DATABASE_URL");
    let env = parse_environment(&or_default("STAYBOOK_ENV", "development"))?;
    let bind_addr = parse_addr("STAYBOOK_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("STAYBOOK_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("STAYBOOK_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("STAYBOOK_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("STAYBOOK_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let timeout_secs = parse_u64("STAYBOOK_GEOCODE_TIMEOUT_SECS", "5")?;
    if timeout_secs == 0 {
        return Err(invalid(
            "STAYBOOK_GEOCODE_TIMEOUT_SECS",
            "must be at least 1 second".to_string(),
        ));
    }
    let result_limit = parse_u32("STAYBOOK_GEOCODE_RESULT_LIMIT", "1")?;
    if result_limit == 0 {
        return Err(invalid(
            "STAYBOOK_GEOCODE_RESULT_LIMIT",
            "must be at least 1".to_string(),
        ));
    }

    let default_latitude = parse_f64("STAYBOOK_DEFAULT_LATITUDE", "0.0")?;
    let default_longitude = parse_f64("STAYBOOK_DEFAULT_LONGITUDE", "0.0")?;
    let default_coordinate = Coordinate::new(default_latitude, default_longitude)
        .map_err(|e| invalid("STAYBOOK_DEFAULT_LATITUDE/STAYBOOK_DEFAULT_LONGITUDE", e.to_string()))?;

    let geocode = GeocodeConfig {
        primary_base_url: or_default("STAYBOOK_GEOCODE_PRIMARY_URL", DEFAULT_PRIMARY_URL),
        primary_api_key: optional("STAYBOOK_GEOCODE_PRIMARY_API_KEY"),
        fallback_base_url: or_default("STAYBOOK_GEOCODE_FALLBACK_URL", DEFAULT_FALLBACK_URL),
        fallback_api_key: optional("STAYBOOK_GEOCODE_FALLBACK_API_KEY")
            .or_else(|| optional("OPENCAGE_API_KEY")),
        timeout_secs,
        result_limit,
        user_agent: or_default("STAYBOOK_GEOCODE_USER_AGENT", DEFAULT_USER_AGENT),
        default_coordinate,
    };

    let image_storage = ImageStorageConfig {
        cloud_name: optional("CLOUD_NAME"),
        api_key: optional("CLOUD_API_KEY"),
        api_secret: optional("CLOUD_API_SECRET"),
    };

    let api_keys = parse_api_keys(&or_default("STAYBOOK_API_KEYS", ""));

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        geocode,
        image_storage,
        api_keys,
    })
}

/// Split a comma-separated token list, dropping blanks and duplicates.
#[must_use]
pub fn parse_api_keys(raw: &str) -> Vec<String> {
    let mut keys: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    keys.sort();
    keys.dedup();
    keys
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STAYBOOK_ENV".to_string(),
            reason: format!("expected development, test or production, got '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
