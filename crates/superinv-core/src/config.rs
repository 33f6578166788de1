use std::path::PathBuf;

use rust_decimal::Decimal;

use crate::app_config::AppConfig;
use crate::reconstruct::{
    DEFAULT_FALLBACK_SHARE_PRICE, DEFAULT_MATERIALITY_THRESHOLD_SHARES,
    DEFAULT_PRIMARY_FLOOR_PRICE,
};
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
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

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation are decoupled from the process environment so they
/// can be tested with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: u64| -> Result<u64, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| invalid(var, e.to_string())),
            Err(_) => Ok(default),
        }
    };

    let parse_price = |var: &str, default: u32| -> Result<Decimal, ConfigError> {
        let value = match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<Decimal>()
                .map_err(|e| invalid(var, e.to_string()))?,
            Err(_) => Decimal::from(default),
        };
        if value <= Decimal::ZERO {
            return Err(invalid(var, format!("must be positive, got {value}")));
        }
        Ok(value)
    };

    let log_level = or_default("SUPERINV_LOG_LEVEL", "info");
    let investors_path = PathBuf::from(or_default(
        "SUPERINV_INVESTORS_PATH",
        "./config/investors.yaml",
    ));
    let output_dir = PathBuf::from(or_default("SUPERINV_OUTPUT_DIR", "./data/holdings"));

    let source_base_url = or_default("SUPERINV_SOURCE_BASE_URL", "https://www.dataroma.com");
    if !(source_base_url.starts_with("http://") || source_base_url.starts_with("https://")) {
        return Err(invalid(
            "SUPERINV_SOURCE_BASE_URL",
            format!("expected an http(s) URL, got '{source_base_url}'"),
        ));
    }

    let scraper_request_timeout_secs = parse_u64("SUPERINV_SCRAPER_REQUEST_TIMEOUT_SECS", 30)?;
    if scraper_request_timeout_secs == 0 {
        return Err(invalid(
            "SUPERINV_SCRAPER_REQUEST_TIMEOUT_SECS",
            "must be at least 1".to_string(),
        ));
    }
    let scraper_user_agent = or_default("SUPERINV_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let investor_cooldown_ms = parse_u64("SUPERINV_INVESTOR_COOLDOWN_MS", 3_000)?;

    let materiality_threshold_shares = parse_u64(
        "SUPERINV_MATERIALITY_THRESHOLD_SHARES",
        DEFAULT_MATERIALITY_THRESHOLD_SHARES,
    )?;
    let primary_floor_price =
        parse_price("SUPERINV_PRIMARY_FLOOR_PRICE", DEFAULT_PRIMARY_FLOOR_PRICE)?;
    let fallback_share_price =
        parse_price("SUPERINV_FALLBACK_SHARE_PRICE", DEFAULT_FALLBACK_SHARE_PRICE)?;

    Ok(AppConfig {
        log_level,
        investors_path,
        output_dir,
        source_base_url,
        scraper_request_timeout_secs,
        scraper_user_agent,
        investor_cooldown_ms,
        materiality_threshold_shares,
        primary_floor_price,
        fallback_share_price,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
