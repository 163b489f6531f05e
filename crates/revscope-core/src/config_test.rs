use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "REVSCOPE_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let result = build_app_config(lookup_from_map(&map));
    assert!(result.is_ok(), "expected Ok, got: {result:?}");
    let cfg = result.unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:5000");
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.gemini_api_key.is_none());
    assert_eq!(cfg.gemini_model, "gemini-2.0-flash");
    assert_eq!(
        cfg.gemini_base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(cfg.completion_timeout_secs, 60);
    assert_eq!(cfg.navigation_timeout_secs, 30);
    assert_eq!(cfg.max_review_pages, 200);
    assert!(cfg.headless);
    assert!(cfg.chrome_executable.is_none());
    assert_eq!(
        cfg.output_path.to_str(),
        Some("product-reviews-analysis.json")
    );
    assert_eq!(cfg.product_output_path.to_str(), Some("product.json"));
}

#[test]
fn build_app_config_reads_overrides() {
    let mut map = HashMap::new();
    map.insert("REVSCOPE_ENV", "production");
    map.insert("REVSCOPE_BIND_ADDR", "127.0.0.1:8080");
    map.insert("GEMINI_API_KEY", "secret-key");
    map.insert("REVSCOPE_GEMINI_BASE_URL", "http://localhost:9999/");
    map.insert("REVSCOPE_MAX_REVIEW_PAGES", "10");
    map.insert("REVSCOPE_HEADLESS", "false");
    map.insert("REVSCOPE_CHROME_EXECUTABLE", "/usr/bin/chromium");
    map.insert("REVSCOPE_PRODUCT_OUTPUT_PATH", "out/product.json");

    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.gemini_api_key.as_deref(), Some("secret-key"));
    assert_eq!(cfg.gemini_base_url, "http://localhost:9999");
    assert_eq!(cfg.max_review_pages, 10);
    assert!(!cfg.headless);
    assert_eq!(
        cfg.chrome_executable.as_deref().and_then(|p| p.to_str()),
        Some("/usr/bin/chromium")
    );
    assert_eq!(cfg.product_output_path.to_str(), Some("out/product.json"));
}

#[test]
fn blank_api_key_is_treated_as_missing() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.gemini_api_key.is_none());
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("REVSCOPE_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVSCOPE_BIND_ADDR"),
        "expected InvalidEnvVar(REVSCOPE_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_invalid_timeout() {
    let mut map = HashMap::new();
    map.insert("REVSCOPE_NAVIGATION_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVSCOPE_NAVIGATION_TIMEOUT_SECS"),
        "expected InvalidEnvVar(REVSCOPE_NAVIGATION_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_zero_page_cap() {
    let mut map = HashMap::new();
    map.insert("REVSCOPE_MAX_REVIEW_PAGES", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVSCOPE_MAX_REVIEW_PAGES"),
        "expected InvalidEnvVar(REVSCOPE_MAX_REVIEW_PAGES), got: {result:?}"
    );
}

#[test]
fn build_app_config_rejects_non_boolean_headless() {
    let mut map = HashMap::new();
    map.insert("REVSCOPE_HEADLESS", "maybe");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "REVSCOPE_HEADLESS"),
        "expected InvalidEnvVar(REVSCOPE_HEADLESS), got: {result:?}"
    );
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "super-secret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("super-secret"));
    assert!(rendered.contains("[redacted]"));
}
