//! REST API client for Bybit v5 market data

use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use super::messages::*;
use crate::common::errors::{ClientError, Result};
use crate::common::types::InstrumentPrecision;

/// REST API client for Bybit public market endpoints
#[derive(Debug, Clone)]
pub struct BybitRestClient {
    /// HTTP client
    client: Client,
    /// Base URL for the v5 API
    base_url: String,
    /// Product category (linear, inverse, spot)
    category: String,
}

impl BybitRestClient {
    /// Create a new REST client
    pub fn new(base_url: &str, category: &str) -> Result<Self> {
        Self::with_timeout(base_url, category, Duration::from_secs(10))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, category: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            category: category.to_string(),
        })
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    /// Get server time in seconds
    #[instrument(skip(self))]
    pub async fn get_server_time(&self) -> Result<i64> {
        let url = Url::parse(&format!("{}/v5/market/time", self.base_url))?;
        let result: ServerTimeResult = self.get(url).await?;
        result
            .time_second
            .parse()
            .map_err(|e| ClientError::InvalidResponse(format!("Invalid timestamp: {}", e)))
    }

    /// Get raw trading rules for a symbol
    #[instrument(skip(self))]
    pub async fn get_instrument_info(&self, symbol: &str) -> Result<InstrumentInfo> {
        let url = Url::parse_with_params(
            &format!("{}/v5/market/instruments-info", self.base_url),
            &[("category", self.category.as_str()), ("symbol", symbol)],
        )?;
        debug!("Fetching instrument info from: {}", url);

        let result: InstrumentsInfoResult = self.get(url).await?;
        result
            .list
            .into_iter()
            .find(|info| info.symbol.eq_ignore_ascii_case(symbol))
            .ok_or_else(|| ClientError::InstrumentNotFound(symbol.to_string()))
    }

    /// Get validated precision for a symbol
    pub async fn get_instrument_precision(&self, symbol: &str) -> Result<InstrumentPrecision> {
        let info = self.get_instrument_info(symbol).await?;
        precision_from_info(&info)
    }

    /// GET an endpoint and unwrap the v5 envelope
    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::InvalidResponse(format!(
                "Server returned status {}: {}",
                status, body
            )));
        }

        let envelope: ApiResponse<T> = response.json().await?;
        if envelope.ret_code != 0 {
            return Err(ClientError::Venue {
                code: envelope.ret_code,
                message: envelope.ret_msg,
            });
        }
        envelope
            .result
            .ok_or_else(|| ClientError::InvalidResponse("missing result".to_string()))
    }
}

/// Convert venue trading rules into a precision snapshot
///
/// Steps must be positive and limits non-negative; anything else is reported
/// as an invalid response so callers can fall back to safe defaults.
pub fn precision_from_info(info: &InstrumentInfo) -> Result<InstrumentPrecision> {
    let lot = &info.lot_size_filter;

    let tick_size = parse_field("tickSize", &info.price_filter.tick_size)?;
    let lot_size = match lot.qty_step.as_deref().or(lot.base_precision.as_deref()) {
        Some(step) => parse_field("qtyStep", step)?,
        None => {
            return Err(ClientError::InvalidResponse(format!(
                "{}: no quantity step reported",
                info.symbol
            )))
        }
    };
    let min_qty = parse_field("minOrderQty", &lot.min_order_qty)?;
    let max_qty = lot
        .max_order_qty
        .as_deref()
        .map(|v| parse_field("maxOrderQty", v))
        .transpose()?;
    let min_notional = lot
        .min_notional_value
        .as_deref()
        .or(lot.min_order_amt.as_deref())
        .map(|v| parse_field("minNotionalValue", v))
        .transpose()?
        .unwrap_or(Decimal::ZERO);

    if tick_size <= Decimal::ZERO || lot_size <= Decimal::ZERO {
        return Err(ClientError::InvalidResponse(format!(
            "{}: non-positive step (tick {}, lot {})",
            info.symbol, tick_size, lot_size
        )));
    }
    if min_qty < Decimal::ZERO || min_notional < Decimal::ZERO {
        return Err(ClientError::InvalidResponse(format!(
            "{}: negative limit",
            info.symbol
        )));
    }

    Ok(InstrumentPrecision {
        symbol: info.symbol.to_uppercase(),
        tick_size,
        lot_size,
        min_qty,
        max_qty,
        min_notional,
    })
}

fn parse_field(name: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|e| ClientError::InvalidResponse(format!("Invalid {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn info(tick: &str, step: &str) -> InstrumentInfo {
        InstrumentInfo {
            symbol: "BTCUSDT".to_string(),
            status: Some("Trading".to_string()),
            price_filter: PriceFilter {
                tick_size: tick.to_string(),
                min_price: None,
                max_price: None,
            },
            lot_size_filter: LotSizeFilter {
                qty_step: Some(step.to_string()),
                base_precision: None,
                min_order_qty: "0.001".to_string(),
                max_order_qty: Some("100.000".to_string()),
                min_notional_value: Some("5".to_string()),
                min_order_amt: None,
            },
        }
    }

    #[test]
    fn test_client_creation() {
        let client = BybitRestClient::new("https://api.bybit.com", "linear");
        assert!(client.is_ok());
    }

    #[test]
    fn test_url_normalization() {
        let client = BybitRestClient::new("https://api.bybit.com/", "linear").unwrap();
        assert!(!client.base_url.ends_with('/'));
    }

    #[test]
    fn test_precision_from_info() {
        let precision = precision_from_info(&info("0.10", "0.001")).unwrap();
        assert_eq!(precision.tick_size, dec!(0.1));
        assert_eq!(precision.lot_size, dec!(0.001));
        assert_eq!(precision.max_qty, Some(dec!(100)));
        assert_eq!(precision.min_notional, dec!(5));
    }

    #[test]
    fn test_zero_step_is_invalid_response() {
        assert!(matches!(
            precision_from_info(&info("0", "0.001")),
            Err(ClientError::InvalidResponse(_))
        ));
        assert!(matches!(
            precision_from_info(&info("0.1", "abc")),
            Err(ClientError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_spot_fields_are_used() {
        let mut spot = info("0.01", "0.001");
        spot.lot_size_filter.qty_step = None;
        spot.lot_size_filter.base_precision = Some("0.000001".to_string());
        spot.lot_size_filter.min_notional_value = None;
        spot.lot_size_filter.min_order_amt = Some("1".to_string());

        let precision = precision_from_info(&spot).unwrap();
        assert_eq!(precision.lot_size, dec!(0.000001));
        assert_eq!(precision.min_notional, dec!(1));
    }
}
