//! Telegram Bot API transport for operator notifications

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::common::errors::{ClientError, Result};
use crate::common::traits::NotificationTransport;
use crate::common::types::NotificationMessage;
use crate::config::types::TelegramConfig;

/// `sendMessage` request body
#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

/// Envelope every Bot API response is wrapped in
#[derive(Debug, Deserialize)]
struct TelegramResponse {
    ok: bool,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    #[serde(default)]
    retry_after: Option<u64>,
}

/// Delivers notifications to one Telegram chat
#[derive(Debug, Clone)]
pub struct TelegramTransport {
    client: Client,
    endpoint: Url,
    chat_id: String,
}

impl TelegramTransport {
    /// Create a transport with the default 10 second timeout
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(10))
    }

    pub fn with_timeout(config: &TelegramConfig, timeout: Duration) -> Result<Self> {
        if config.bot_token.trim().is_empty() {
            return Err(ClientError::Configuration(
                "telegram bot token is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        let endpoint = Url::parse(&format!(
            "{}/bot{}/sendMessage",
            config.api_url.trim_end_matches('/'),
            config.bot_token
        ))?;

        Ok(Self {
            client,
            endpoint,
            chat_id: config.chat_id.clone(),
        })
    }
}

#[async_trait]
impl NotificationTransport for TelegramTransport {
    #[instrument(skip(self, message))]
    async fn deliver(&self, message: &NotificationMessage) -> Result<()> {
        let payload = SendMessageRequest {
            chat_id: &self.chat_id,
            text: &message.text,
            parse_mode: "HTML",
        };

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&payload)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let parsed: TelegramResponse = serde_json::from_str(&body).map_err(|_| {
            ClientError::InvalidResponse(format!("Telegram returned status {}: {}", status, body))
        })?;

        if parsed.ok {
            debug!("Telegram message delivered");
            return Ok(());
        }

        let description = parsed.description.unwrap_or_else(|| status.to_string());
        match parsed.error_code {
            Some(429) => Err(ClientError::RateLimit {
                message: description,
                retry_after_seconds: parsed.parameters.and_then(|p| p.retry_after),
            }),
            Some(code) => Err(ClientError::Venue {
                code,
                message: description,
            }),
            None => Err(ClientError::InvalidResponse(description)),
        }
    }
}

/// Escape text for Telegram's HTML parse mode
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
