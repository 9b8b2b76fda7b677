use crate::app_config::{AppConfig, BulkOpenPolicy, Environment};
use crate::ConfigError;

/// Load client configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load client configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build client configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let api_url = parse_api_url(&or_default("PARTFINDER_API_URL", "http://localhost:8000"))?;
    let env = parse_environment(&or_default("PARTFINDER_ENV", "development"))?;
    let log_level = or_default("PARTFINDER_LOG_LEVEL", "warn");

    let request_timeout_secs = parse_u64("PARTFINDER_REQUEST_TIMEOUT_SECS", "30")?;
    if request_timeout_secs == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "PARTFINDER_REQUEST_TIMEOUT_SECS".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    let user_agent = or_default("PARTFINDER_USER_AGENT", "partfinder/0.1 (parts-search)");
    let history_limit = parse_u32("PARTFINDER_HISTORY_LIMIT", "20")?;
    let vendors = lookup("PARTFINDER_VENDORS").ok().and_then(|raw| parse_vendors(&raw));
    let bulk_open_policy =
        parse_bulk_open_policy(&or_default("PARTFINDER_BULK_OPEN_POLICY", "open-immediately"))?;
    let recovery_delay_ms = parse_u64("PARTFINDER_RECOVERY_DELAY_MS", "500")?;

    Ok(AppConfig {
        api_url,
        env,
        log_level,
        request_timeout_secs,
        user_agent,
        history_limit,
        vendors,
        bulk_open_policy,
        recovery_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PARTFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

fn parse_bulk_open_policy(s: &str) -> Result<BulkOpenPolicy, ConfigError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "open-immediately" | "immediate" => Ok(BulkOpenPolicy::OpenImmediately),
        "confirm-first" | "confirm" => Ok(BulkOpenPolicy::ConfirmFirst),
        other => Err(ConfigError::InvalidEnvVar {
            var: "PARTFINDER_BULK_OPEN_POLICY".to_string(),
            reason: format!("expected 'open-immediately' or 'confirm-first', got '{other}'"),
        }),
    }
}

/// Validate the backend URL scheme and strip trailing slashes so that
/// endpoint paths can be appended verbatim.
fn parse_api_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::InvalidEnvVar {
            var: "PARTFINDER_API_URL".to_string(),
            reason: format!("'{raw}' must start with http:// or https://"),
        });
    }
    Ok(trimmed.to_string())
}

/// Split a comma-separated vendor list, dropping blanks. An empty list
/// means "no filter".
fn parse_vendors(raw: &str) -> Option<Vec<String>> {
    let vendors: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect();
    if vendors.is_empty() {
        None
    } else {
        Some(vendors)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
