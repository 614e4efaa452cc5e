//! Configuration types

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::common::channels::DEFAULT_CHANNEL_SIZE;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Signal ingress endpoint
    #[serde(default)]
    pub server: ServerConfig,
    /// Venue (Bybit) REST configuration
    #[serde(default)]
    pub venue: VenueConfig,
    /// Telegram operator channel (optional; messages are only logged without it)
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    /// Position sizing budgets
    #[serde(default)]
    pub sizing: SizingPolicy,
    /// Order validation gate settings
    #[serde(default)]
    pub validation: ValidationConfig,
    /// Notification dispatcher settings
    #[serde(default)]
    pub notifications: NotificationConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// HTTP ingress configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind, e.g. `0.0.0.0:5000`
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "0.0.0.0:5000".to_string()
}

/// Venue REST configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueConfig {
    /// Base URL for the venue REST API
    #[serde(default = "default_venue_rest_url")]
    pub rest_url: String,
    /// Product category queried for instrument rules
    #[serde(default = "default_venue_category")]
    pub category: String,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for VenueConfig {
    fn default() -> Self {
        Self {
            rest_url: default_venue_rest_url(),
            category: default_venue_category(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_venue_rest_url() -> String {
    "https://api.bybit.com".to_string()
}

fn default_venue_category() -> String {
    "linear".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: String,
    /// Target chat (group ids are negative)
    pub chat_id: String,
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
}

pub(crate) fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

/// Active sizing budgets
///
/// Each present budget yields a candidate quantity; the smallest wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingPolicy {
    /// Dollars lost if the stop is hit
    #[serde(default)]
    pub risk_budget_usd: Option<Decimal>,
    /// Upper bound on order value at entry
    #[serde(default)]
    pub max_notional_usd: Option<Decimal>,
    /// Dollars gained if the target is hit
    #[serde(default)]
    pub reward_budget_usd: Option<Decimal>,
}

impl Default for SizingPolicy {
    fn default() -> Self {
        Self {
            risk_budget_usd: Some(dec!(10)),
            max_notional_usd: None,
            reward_budget_usd: None,
        }
    }
}

/// Validation gate configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Notional floor applied even when the venue reports a lower minimum
    #[serde(default = "default_implicit_min_notional")]
    pub implicit_min_notional_usd: Decimal,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            implicit_min_notional_usd: default_implicit_min_notional(),
        }
    }
}

fn default_implicit_min_notional() -> Decimal {
    dec!(5)
}

/// Notification dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    /// Minimum time between two deliveries in milliseconds
    #[serde(default = "default_min_interval")]
    pub min_interval_ms: u64,
    /// Pending messages kept before new ones are dropped
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl NotificationConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

fn default_min_interval() -> u64 {
    1000
}

fn default_queue_capacity() -> usize {
    DEFAULT_CHANNEL_SIZE
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Acknowledge intents locally instead of forwarding them
    #[serde(default = "default_dry_run")]
    pub dry_run: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: default_dry_run(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_dry_run() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:5000");
        assert_eq!(config.venue.category, "linear");
        assert_eq!(config.sizing.risk_budget_usd, Some(dec!(10)));
        assert_eq!(config.validation.implicit_min_notional_usd, dec!(5));
        assert_eq!(config.notifications.min_interval(), Duration::from_secs(1));
        assert!(config.telegram.is_none());
        assert!(!config.settings.dry_run);
    }

    #[test]
    fn test_sizing_policy_from_json() {
        let policy: SizingPolicy = serde_json::from_str(
            r#"{"risk_budget_usd": "100", "max_notional_usd": 2500}"#,
        )
        .unwrap();
        assert_eq!(policy.risk_budget_usd, Some(dec!(100)));
        assert_eq!(policy.max_notional_usd, Some(dec!(2500)));
        assert_eq!(policy.reward_budget_usd, None);
    }
}
