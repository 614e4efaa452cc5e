//! Bybit precision provider

use async_trait::async_trait;
use std::time::Duration;
use tracing::{info, instrument};

use super::rest::BybitRestClient;
use crate::common::errors::Result;
use crate::common::traits::PrecisionProvider;
use crate::common::types::InstrumentPrecision;
use crate::config::types::VenueConfig;

/// Bybit-backed [`PrecisionProvider`]
///
/// Every lookup goes to the venue; nothing is cached between requests.
#[derive(Debug, Clone)]
pub struct BybitClient {
    /// REST API client
    rest_client: BybitRestClient,
}

impl BybitClient {
    /// Create a new Bybit client from configuration
    pub fn new(config: &VenueConfig) -> Result<Self> {
        let rest_client = BybitRestClient::with_timeout(
            &config.rest_url,
            &config.category,
            Duration::from_secs(config.request_timeout_seconds),
        )?;
        Ok(Self { rest_client })
    }

    /// Get a reference to the REST client
    pub fn rest(&self) -> &BybitRestClient {
        &self.rest_client
    }

    /// Check that the venue answers
    pub async fn check_health(&self) -> Result<bool> {
        let server_time = self.rest_client.get_server_time().await?;
        info!("Bybit reachable, server time {}", server_time);
        Ok(server_time > 0)
    }
}

#[async_trait]
impl PrecisionProvider for BybitClient {
    #[instrument(skip(self))]
    async fn fetch_precision(&self, symbol: &str) -> Result<InstrumentPrecision> {
        self.rest_client.get_instrument_precision(symbol).await
    }

    fn venue_name(&self) -> &'static str {
        "Bybit"
    }
}
