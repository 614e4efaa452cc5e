//! Configuration loader

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use std::path::Path;
use std::str::FromStr;

use super::types::{default_telegram_api_url, AppConfig, SizingPolicy, TelegramConfig};
use crate::common::errors::{ClientError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP_, nested with `__`)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| ClientError::Configuration(e.to_string()))
}

/// Load configuration from plain environment variables only
///
/// Recognized: `TELEGRAM_BOT_TOKEN`, `TELEGRAM_CHAT_ID`, `BYBIT_REST_URL`,
/// `RISK_BUDGET_USD`, `MAX_NOTIONAL_USD`, `REWARD_BUDGET_USD`,
/// `NOTIFY_INTERVAL_MS`, `MIN_NOTIONAL_FLOOR_USD`.
pub fn load_from_env() -> Result<AppConfig> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::default();

    if let Ok(url) = std::env::var("BYBIT_REST_URL") {
        config.venue.rest_url = url;
    }

    config.telegram = match (
        std::env::var("TELEGRAM_BOT_TOKEN"),
        std::env::var("TELEGRAM_CHAT_ID"),
    ) {
        (Ok(bot_token), Ok(chat_id)) => Some(TelegramConfig {
            bot_token,
            chat_id,
            api_url: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| default_telegram_api_url()),
        }),
        _ => None,
    };

    let risk = env_decimal("RISK_BUDGET_USD")?;
    let notional = env_decimal("MAX_NOTIONAL_USD")?;
    let reward = env_decimal("REWARD_BUDGET_USD")?;
    if risk.is_some() || notional.is_some() || reward.is_some() {
        config.sizing = SizingPolicy {
            risk_budget_usd: risk,
            max_notional_usd: notional,
            reward_budget_usd: reward,
        };
    }

    if let Some(floor) = env_decimal("MIN_NOTIONAL_FLOOR_USD")? {
        config.validation.implicit_min_notional_usd = floor;
    }

    if let Ok(interval) = std::env::var("NOTIFY_INTERVAL_MS") {
        config.notifications.min_interval_ms = interval.parse().map_err(|_| {
            ClientError::Configuration(format!("NOTIFY_INTERVAL_MS is not a number: {}", interval))
        })?;
    }

    Ok(config)
}

fn env_decimal(key: &str) -> Result<Option<Decimal>> {
    match std::env::var(key) {
        Ok(raw) => Decimal::from_str(raw.trim())
            .map(Some)
            .map_err(|e| ClientError::Configuration(format!("{} is not a decimal: {}", key, e))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_load_config_from_toml_file() {
        let dir = std::env::temp_dir();
        let path = dir.join(format!("signal_bridge_test_{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[server]
bind_address = "127.0.0.1:8080"

[sizing]
risk_budget_usd = "100"
max_notional_usd = "2000"

[notifications]
min_interval_ms = 2000
"#
        )
        .unwrap();

        let config = load_config(path.to_str()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.server.bind_address, "127.0.0.1:8080");
        assert_eq!(config.sizing.risk_budget_usd, Some(dec!(100)));
        assert_eq!(config.sizing.max_notional_usd, Some(dec!(2000)));
        assert_eq!(config.notifications.min_interval_ms, 2000);
        assert_eq!(config.venue.rest_url, "https://api.bybit.com");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = load_config(Some("/definitely/not/here.toml")).unwrap();
        assert_eq!(config.sizing.risk_budget_usd, Some(dec!(10)));
    }
}
