use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

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
/// Every variable has a default, so an empty environment yields a usable
/// development config. The Gemini key stays `None` when unset or blank.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

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

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("REVSCOPE_ENV", "development"))?;

    let bind_addr = or_default("REVSCOPE_BIND_ADDR", "0.0.0.0:5000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("REVSCOPE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("REVSCOPE_LOG_LEVEL", "info");

    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("REVSCOPE_GEMINI_MODEL", "gemini-2.0-flash");
    let gemini_base_url = or_default(
        "REVSCOPE_GEMINI_BASE_URL",
        "https://generativelanguage.googleapis.com",
    )
    .trim_end_matches('/')
    .to_string();
    let completion_timeout_secs = parse_u64("REVSCOPE_COMPLETION_TIMEOUT_SECS", "60")?;

    let navigation_timeout_secs = parse_u64("REVSCOPE_NAVIGATION_TIMEOUT_SECS", "30")?;
    let max_review_pages = parse_usize("REVSCOPE_MAX_REVIEW_PAGES", "200")?;
    if max_review_pages == 0 {
        return Err(invalid(
            "REVSCOPE_MAX_REVIEW_PAGES",
            "must be at least 1".to_string(),
        ));
    }
    let headless = parse_bool("REVSCOPE_HEADLESS", &or_default("REVSCOPE_HEADLESS", "true"))?;
    let chrome_executable = optional("REVSCOPE_CHROME_EXECUTABLE").map(PathBuf::from);
    let output_path = PathBuf::from(or_default(
        "REVSCOPE_OUTPUT_PATH",
        "product-reviews-analysis.json",
    ));
    let product_output_path =
        PathBuf::from(or_default("REVSCOPE_PRODUCT_OUTPUT_PATH", "product.json"));

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        completion_timeout_secs,
        navigation_timeout_secs,
        max_review_pages,
        headless,
        chrome_executable,
        output_path,
        product_output_path,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "REVSCOPE_ENV".to_string(),
            reason: format!("expected development, test, or production; got {other:?}"),
        }),
    }
}

fn parse_bool(var: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: format!("expected a boolean; got {other:?}"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
