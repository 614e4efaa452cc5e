//! Bybit v5 REST message types

use serde::{Deserialize, Serialize};

/// Envelope shared by every v5 endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub ret_code: i64,
    pub ret_msg: String,
    /// Empty object (`{}`) on errors, absent on some
    pub result: Option<T>,
}

/// `GET /v5/market/time` result
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerTimeResult {
    pub time_second: String,
    #[serde(default)]
    pub time_nano: Option<String>,
}

/// `GET /v5/market/instruments-info` result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentsInfoResult {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub list: Vec<InstrumentInfo>,
}

/// Trading rules for a single instrument
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentInfo {
    pub symbol: String,
    #[serde(default)]
    pub status: Option<String>,
    pub price_filter: PriceFilter,
    pub lot_size_filter: LotSizeFilter,
}

/// Price granularity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceFilter {
    pub tick_size: String,
    #[serde(default)]
    pub min_price: Option<String>,
    #[serde(default)]
    pub max_price: Option<String>,
}

/// Quantity granularity and limits
///
/// Derivatives report `qtyStep` and `minNotionalValue`; spot reports
/// `basePrecision` and `minOrderAmt` instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotSizeFilter {
    #[serde(default)]
    pub qty_step: Option<String>,
    #[serde(default)]
    pub base_precision: Option<String>,
    pub min_order_qty: String,
    #[serde(default)]
    pub max_order_qty: Option<String>,
    #[serde(default)]
    pub min_notional_value: Option<String>,
    #[serde(default)]
    pub min_order_amt: Option<String>,
}
