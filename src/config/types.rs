//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::alert::AlertFormat;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// MEXC-specific configuration
    #[serde(default)]
    pub mexc: MexcConfig,
    /// Risk sizing policy
    #[serde(default)]
    pub risk: RiskPolicy,
    /// Accepted alert formats
    #[serde(default)]
    pub alert: AlertConfig,
    /// Background order tracking
    #[serde(default)]
    pub tracker: TrackerConfig,
    /// Webhook listener
    #[serde(default)]
    pub server: ServerConfig,
    /// CSV audit log
    #[serde(default)]
    pub audit: AuditConfig,
    /// Self-ping to keep the host awake
    #[serde(default)]
    pub keepalive: KeepaliveConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// MEXC platform configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct MexcConfig {
    /// API key for authenticated requests
    #[serde(default)]
    pub api_key: Option<String>,
    /// API secret for signing requests
    #[serde(default)]
    pub api_secret: Option<String>,
    /// Base URL for the spot REST API
    #[serde(default = "default_mexc_rest_url")]
    pub rest_url: String,
    /// Header carrying the API key
    #[serde(default = "default_api_key_header")]
    pub api_key_header: String,
    /// recvWindow sent with signed requests, in milliseconds
    #[serde(default = "default_recv_window")]
    pub recv_window_ms: u64,
    /// Timeout for market data requests in seconds
    #[serde(default = "default_market_data_timeout")]
    pub market_data_timeout_seconds: u64,
    /// Timeout for order placement and queries in seconds
    #[serde(default = "default_order_timeout")]
    pub order_timeout_seconds: u64,
}

impl MexcConfig {
    /// Credentials, when both halves are present and non-empty
    pub fn credentials(&self) -> Option<ApiCredentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some(ApiCredentials::new(key.clone(), secret.clone()))
            }
            _ => None,
        }
    }

    pub fn market_data_timeout(&self) -> Duration {
        Duration::from_secs(self.market_data_timeout_seconds)
    }

    pub fn order_timeout(&self) -> Duration {
        Duration::from_secs(self.order_timeout_seconds)
    }
}

impl Default for MexcConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_secret: None,
            rest_url: default_mexc_rest_url(),
            api_key_header: default_api_key_header(),
            recv_window_ms: default_recv_window(),
            market_data_timeout_seconds: default_market_data_timeout(),
            order_timeout_seconds: default_order_timeout(),
        }
    }
}

impl std::fmt::Debug for MexcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MexcConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "<redacted>"))
            .field("rest_url", &self.rest_url)
            .field("api_key_header", &self.api_key_header)
            .field("recv_window_ms", &self.recv_window_ms)
            .field("market_data_timeout_seconds", &self.market_data_timeout_seconds)
            .field("order_timeout_seconds", &self.order_timeout_seconds)
            .finish()
    }
}

fn default_mexc_rest_url() -> String {
    "https://api.mexc.com".to_string()
}

fn default_api_key_header() -> String {
    "X-MEXC-APIKEY".to_string()
}

fn default_recv_window() -> u64 {
    5000
}

fn default_market_data_timeout() -> u64 {
    5
}

fn default_order_timeout() -> u64 {
    10
}

/// What to do when an order comes out under the exchange's minimum notional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndersizePolicy {
    /// Refuse the order
    #[default]
    Reject,
    /// Raise the quantity to the smallest size that clears the floor
    Bump,
}

/// Step sizes for one symbol
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolRules {
    pub quantity_step: Decimal,
    pub price_tick: Decimal,
}

/// Risk policy applied by the sizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskPolicy {
    /// Position budget in quote currency
    #[serde(default = "default_max_position_notional")]
    pub max_position_notional: Decimal,
    /// Fraction of the budget risked per price-only alert
    #[serde(default = "default_risk_fraction")]
    pub risk_fraction: Decimal,
    /// Exchange floor on order value
    #[serde(default = "default_min_notional")]
    pub min_notional: Decimal,
    /// Floor applied to risk-budget quantities
    #[serde(default = "default_min_quantity")]
    pub min_quantity: Decimal,
    /// Offset from the strategy price: below for buys, above for sells
    #[serde(default)]
    pub slippage: Decimal,
    #[serde(default)]
    pub undersize_policy: UndersizePolicy,
    /// Default quantity step
    #[serde(default = "default_quantity_step")]
    pub quantity_step: Decimal,
    /// Default price tick
    #[serde(default = "default_price_tick")]
    pub price_tick: Decimal,
    /// Per-symbol overrides of the step sizes
    #[serde(default)]
    pub symbols: HashMap<String, SymbolRules>,
}

impl RiskPolicy {
    /// Step sizes for a symbol, falling back to the defaults
    pub fn rules_for(&self, symbol: &str) -> SymbolRules {
        self.symbols.get(symbol).cloned().unwrap_or(SymbolRules {
            quantity_step: self.quantity_step,
            price_tick: self.price_tick,
        })
    }

    /// Quote amount risked on a price-only alert; `None` on overflow
    pub fn risk_amount(&self) -> Option<Decimal> {
        self.max_position_notional.checked_mul(self.risk_fraction)
    }
}

impl Default for RiskPolicy {
    fn default() -> Self {
        Self {
            max_position_notional: default_max_position_notional(),
            risk_fraction: default_risk_fraction(),
            min_notional: default_min_notional(),
            min_quantity: default_min_quantity(),
            slippage: Decimal::ZERO,
            undersize_policy: UndersizePolicy::Reject,
            quantity_step: default_quantity_step(),
            price_tick: default_price_tick(),
            symbols: HashMap::new(),
        }
    }
}

fn default_max_position_notional() -> Decimal {
    dec!(50)
}

fn default_risk_fraction() -> Decimal {
    dec!(0.01)
}

fn default_min_notional() -> Decimal {
    dec!(1)
}

fn default_min_quantity() -> Decimal {
    dec!(0.001)
}

fn default_quantity_step() -> Decimal {
    dec!(0.000001)
}

fn default_price_tick() -> Decimal {
    dec!(0.00000001)
}

/// Accepted alert formats, in priority order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    #[serde(default = "default_alert_formats")]
    pub formats: Vec<AlertFormat>,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            formats: default_alert_formats(),
        }
    }
}

fn default_alert_formats() -> Vec<AlertFormat> {
    AlertFormat::default_priority().to_vec()
}

/// Order tracker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Delay between status polls in milliseconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
    /// Number of polls before giving up
    #[serde(default = "default_max_checks")]
    pub max_checks: u32,
    /// Trackers allowed to run at once
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Orders waiting for a tracker slot
    #[serde(default = "default_queue_size")]
    pub queue_size: usize,
}

impl TrackerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_checks: default_max_checks(),
            max_concurrent: default_max_concurrent(),
            queue_size: default_queue_size(),
        }
    }
}

fn default_poll_interval() -> u64 {
    5000
}

fn default_max_checks() -> u32 {
    12
}

fn default_max_concurrent() -> usize {
    64
}

fn default_queue_size() -> usize {
    crate::common::channels::DEFAULT_CHANNEL_SIZE
}

/// Webhook listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    10000
}

/// CSV audit log settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    #[serde(default = "default_audit_path")]
    pub path: String,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            path: default_audit_path(),
        }
    }
}

fn default_audit_path() -> String {
    "orders.csv".to_string()
}

/// Self-ping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepaliveConfig {
    /// URL to ping; disabled when unset
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_keepalive_interval")]
    pub interval_seconds: u64,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            url: None,
            interval_seconds: default_keepalive_interval(),
        }
    }
}

fn default_keepalive_interval() -> u64 {
    300
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Log output: "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// API credentials for authenticated requests
#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: String,
    pub api_secret: String,
}

impl ApiCredentials {
    pub fn new(api_key: String, api_secret: String) -> Self {
        Self {
            api_key,
            api_secret,
        }
    }
}

impl std::fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"<redacted>")
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_legacy_deployment() {
        let config = AppConfig::default();
        assert_eq!(config.mexc.rest_url, "https://api.mexc.com");
        assert_eq!(config.mexc.api_key_header, "X-MEXC-APIKEY");
        assert_eq!(config.mexc.recv_window_ms, 5000);
        assert_eq!(config.risk.risk_amount(), Some(dec!(0.5)));
        assert_eq!(config.tracker.max_checks, 12);
        assert_eq!(config.tracker.poll_interval(), Duration::from_secs(5));
        assert_eq!(config.server.port, 10000);
        assert!(config.keepalive.url.is_none());
    }

    #[test]
    fn test_credentials_require_both_halves() {
        let mut mexc = MexcConfig::default();
        assert!(mexc.credentials().is_none());

        mexc.api_key = Some("key".to_string());
        assert!(mexc.credentials().is_none());

        mexc.api_secret = Some(String::new());
        assert!(mexc.credentials().is_none());

        mexc.api_secret = Some("secret".to_string());
        assert!(mexc.credentials().is_some());
    }

    #[test]
    fn test_symbol_rules_override() {
        let mut policy = RiskPolicy::default();
        policy.symbols.insert(
            "BTCUSDT".to_string(),
            SymbolRules {
                quantity_step: dec!(0.0001),
                price_tick: dec!(0.01),
            },
        );

        assert_eq!(policy.rules_for("BTCUSDT").price_tick, dec!(0.01));
        assert_eq!(policy.rules_for("XRPUSDT").quantity_step, dec!(0.000001));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let mexc = MexcConfig {
            api_secret: Some("super-secret".to_string()),
            ..MexcConfig::default()
        };
        let rendered = format!("{:?}", mexc);
        assert!(!rendered.contains("super-secret"));
    }
}
