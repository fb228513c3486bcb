use std::str::FromStr;

use crate::app_config::{AppConfig, CollectorSettings, Environment, MAX_SELECTED_LIMIT};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
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
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let gateway_url = require("COMPSCOUT_GATEWAY_URL")?;
    let llm_api_key = require("COMPSCOUT_LLM_API_KEY")?;

    let env = parse_environment(&or_default("COMPSCOUT_ENV", "development"))?;
    let log_level = or_default("COMPSCOUT_LOG_LEVEL", "info");
    let gateway_api_key = lookup("COMPSCOUT_GATEWAY_API_KEY").ok();
    let llm_base_url = or_default("COMPSCOUT_LLM_BASE_URL", "https://api.openai.com/v1");
    let llm_model = or_default("COMPSCOUT_LLM_MODEL", "gpt-4o-mini");
    let request_timeout_secs: u64 =
        parse_var(&or_default, "COMPSCOUT_REQUEST_TIMEOUT_SECS", "60")?;
    let user_agent = or_default("COMPSCOUT_USER_AGENT", "compscout/0.1 (competitive-signal)");

    let defaults = CollectorSettings::default();
    let collector = CollectorSettings {
        blog_target_count: parse_positive(
            &or_default,
            "COMPSCOUT_BLOG_TARGET_COUNT",
            defaults.blog_target_count,
        )?,
        video_search_count: parse_positive(
            &or_default,
            "COMPSCOUT_VIDEO_SEARCH_COUNT",
            defaults.video_search_count,
        )?,
        video_keep_ratio: parse_ratio(&or_default, "COMPSCOUT_VIDEO_KEEP_RATIO")?,
        video_ratio_min_pool: parse_positive(
            &or_default,
            "COMPSCOUT_VIDEO_RATIO_MIN_POOL",
            defaults.video_ratio_min_pool,
        )?,
        video_absolute_cap: parse_positive(
            &or_default,
            "COMPSCOUT_VIDEO_ABSOLUTE_CAP",
            defaults.video_absolute_cap,
        )?,
        max_selected: parse_max_selected(&or_default)?,
        transcript_target: parse_positive(
            &or_default,
            "COMPSCOUT_TRANSCRIPT_TARGET",
            defaults.transcript_target,
        )?,
        crawl_limit: parse_positive(&or_default, "COMPSCOUT_CRAWL_LIMIT", defaults.crawl_limit)?,
        min_transcript_chars: parse_var(
            &or_default,
            "COMPSCOUT_MIN_TRANSCRIPT_CHARS",
            &defaults.min_transcript_chars.to_string(),
        )?,
        max_document_chars: parse_positive(
            &or_default,
            "COMPSCOUT_MAX_DOCUMENT_CHARS",
            defaults.max_document_chars,
        )?,
    };

    Ok(AppConfig {
        env,
        log_level,
        gateway_url: gateway_url.trim_end_matches('/').to_string(),
        gateway_api_key,
        llm_base_url: llm_base_url.trim_end_matches('/').to_string(),
        llm_api_key,
        llm_model,
        request_timeout_secs,
        user_agent,
        collector,
    })
}

fn parse_var<T>(
    or_default: &dyn Fn(&str, &str) -> String,
    var: &str,
    default: &str,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    or_default(var, default)
        .trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
}

fn parse_positive(
    or_default: &dyn Fn(&str, &str) -> String,
    var: &str,
    default: usize,
) -> Result<usize, ConfigError> {
    let value: usize = parse_var(or_default, var, &default.to_string())?;
    if value == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }
    Ok(value)
}

fn parse_max_selected(or_default: &dyn Fn(&str, &str) -> String) -> Result<usize, ConfigError> {
    const VAR: &str = "COMPSCOUT_MAX_SELECTED";
    let value = parse_positive(or_default, VAR, MAX_SELECTED_LIMIT)?;
    if value > MAX_SELECTED_LIMIT {
        return Err(ConfigError::InvalidEnvVar {
            var: VAR.to_string(),
            reason: format!("{value} exceeds the limit of {MAX_SELECTED_LIMIT}"),
        });
    }
    Ok(value)
}

fn parse_ratio(
    or_default: &dyn Fn(&str, &str) -> String,
    var: &str,
) -> Result<f64, ConfigError> {
    let default = CollectorSettings::default().video_keep_ratio.to_string();
    let value: f64 = parse_var(or_default, var, &default)?;
    if !(value > 0.0 && value <= 1.0) {
        return Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("{value} is outside (0, 1]"),
        });
    }
    Ok(value)
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "COMPSCOUT_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
