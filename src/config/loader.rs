//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::ConfigError;

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Legacy variables (MEXC_API_KEY, MEXC_API_SECRET, PORT)
/// 2. Environment variables (prefixed with APP__)
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // Add environment variables with APP prefix, e.g. APP__RISK__MIN_NOTIONAL
    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build().map_err(|e| ConfigError(e.to_string()))?;

    let mut app: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError(e.to_string()))?;

    // config lowercases map keys; symbols are matched upper-case
    app.risk.symbols = std::mem::take(&mut app.risk.symbols)
        .into_iter()
        .map(|(symbol, rules)| (symbol.to_uppercase(), rules))
        .collect();

    apply_legacy_env(&mut app, |name| std::env::var(name).ok())?;
    validate(&app)?;

    Ok(app)
}

/// Apply the plain environment variables older deployments were configured with
fn apply_legacy_env<F>(app: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup("MEXC_API_KEY") {
        app.mexc.api_key = Some(key);
    }
    if let Some(secret) = lookup("MEXC_API_SECRET") {
        app.mexc.api_secret = Some(secret);
    }
    if let Some(port) = lookup("PORT") {
        app.server.port = port
            .trim()
            .parse()
            .map_err(|e| ConfigError(format!("Invalid PORT {:?}: {}", port, e)))?;
    }
    Ok(())
}

/// Reject settings the pipeline cannot work with
pub fn validate(app: &AppConfig) -> Result<(), ConfigError> {
    url::Url::parse(&app.mexc.rest_url)
        .map_err(|e| ConfigError(format!("Invalid mexc.rest_url: {}", e)))?;

    if let Some(ping) = app.keepalive.url.as_deref().filter(|url| !url.is_empty()) {
        url::Url::parse(ping)
            .map_err(|e| ConfigError(format!("Invalid keepalive.url: {}", e)))?;
        if app.keepalive.interval_seconds == 0 {
            return Err(ConfigError(
                "keepalive.interval_seconds must be positive".to_string(),
            ));
        }
    }

    let risk = &app.risk;
    if risk.quantity_step <= rust_decimal::Decimal::ZERO
        || risk.price_tick <= rust_decimal::Decimal::ZERO
    {
        return Err(ConfigError("Step sizes must be positive".to_string()));
    }
    if let Some((symbol, _)) = risk.symbols.iter().find(|(_, rules)| {
        rules.quantity_step <= rust_decimal::Decimal::ZERO
            || rules.price_tick <= rust_decimal::Decimal::ZERO
    }) {
        return Err(ConfigError(format!("Step sizes for {} must be positive", symbol)));
    }
    if risk.min_notional < rust_decimal::Decimal::ZERO || risk.slippage < rust_decimal::Decimal::ZERO
    {
        return Err(ConfigError(
            "risk.min_notional and risk.slippage must not be negative".to_string(),
        ));
    }
    if app.alert.formats.is_empty() {
        return Err(ConfigError("alert.formats must list at least one format".to_string()));
    }
    if app.tracker.max_checks == 0 || app.tracker.max_concurrent == 0 {
        return Err(ConfigError(
            "tracker.max_checks and tracker.max_concurrent must be positive".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_legacy_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("MEXC_API_KEY", "key"),
            ("MEXC_API_SECRET", "secret"),
            ("PORT", "8080"),
        ]
        .into_iter()
        .collect();

        let mut app = AppConfig::default();
        apply_legacy_env(&mut app, |name| vars.get(name).map(|v| v.to_string())).unwrap();

        assert_eq!(app.mexc.api_key.as_deref(), Some("key"));
        assert!(app.mexc.credentials().is_some());
        assert_eq!(app.server.port, 8080);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut app = AppConfig::default();
        let result = apply_legacy_env(&mut app, |name| {
            (name == "PORT").then(|| "not-a-port".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_defaults() {
        assert!(validate(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut app = AppConfig::default();
        app.mexc.rest_url = "not a url".to_string();
        assert!(validate(&app).is_err());

        let mut app = AppConfig::default();
        app.risk.quantity_step = rust_decimal::Decimal::ZERO;
        assert!(validate(&app).is_err());

        let mut app = AppConfig::default();
        app.alert.formats.clear();
        assert!(validate(&app).is_err());
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bridge.toml");
        std::fs::write(
            &path,
            r#"
[risk]
min_notional = 5
undersize_policy = "bump"

[alert]
formats = ["price", "quantity_price"]

[tracker]
max_checks = 3
"#,
        )
        .unwrap();

        let app = load_config(path.to_str()).unwrap();
        assert_eq!(app.risk.min_notional, rust_decimal::Decimal::from(5));
        assert_eq!(
            app.risk.undersize_policy,
            crate::config::types::UndersizePolicy::Bump
        );
        assert_eq!(app.alert.formats.len(), 2);
        assert_eq!(app.tracker.max_checks, 3);
        assert_eq!(app.tracker.poll_interval_ms, 5000);
    }
}
