//! Common test utilities and fixtures

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rust_decimal_macros::dec;
use serde_json::{json, Value};
use signal_bridge::common::traits::Notifier;
use signal_bridge::common::types::{InstrumentPrecision, NotificationMessage, RawSignal};
use signal_bridge::config::types::{SizingPolicy, ValidationConfig};
use signal_bridge::{BudgetSizeCalculator, OrderValidator, PrecisionProvider, SignalPipeline};

/// Notifier that keeps every message for later assertions
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: NotificationMessage) {
        self.messages.lock().unwrap().push(message.text);
    }
}

/// BTCUSDT linear perpetual rules
pub fn btc_precision() -> InstrumentPrecision {
    InstrumentPrecision {
        symbol: "BTCUSDT".to_string(),
        tick_size: dec!(0.10),
        lot_size: dec!(0.001),
        min_qty: dec!(0.001),
        max_qty: Some(dec!(100)),
        min_notional: dec!(5),
    }
}

/// Long BTC signal with a 500 USD risk distance
pub fn btc_long_signal() -> RawSignal {
    RawSignal::new(json!({
        "symbol": "BYBIT:BTCUSDT.P",
        "direction": "long",
        "entry": "50000",
        "stop": "49500",
        "target": "51000"
    }))
}

pub fn risk_only(budget: rust_decimal::Decimal) -> SizingPolicy {
    SizingPolicy {
        risk_budget_usd: Some(budget),
        max_notional_usd: None,
        reward_budget_usd: None,
    }
}

/// Pipeline over the given provider and budgets
pub fn build_pipeline(
    provider: Arc<dyn PrecisionProvider>,
    policy: SizingPolicy,
    notifier: Arc<RecordingNotifier>,
) -> SignalPipeline {
    SignalPipeline::new(
        provider,
        Box::new(BudgetSizeCalculator::new(policy).unwrap()),
        OrderValidator::new(ValidationConfig::default()),
        notifier,
    )
}

/// Sample Bybit v5 responses
pub mod bybit_responses {
    use super::*;

    pub fn instruments_info(symbol: &str, tick: &str, step: &str, min_qty: &str) -> Value {
        json!({
            "retCode": 0,
            "retMsg": "OK",
            "result": {
                "category": "linear",
                "list": [{
                    "symbol": symbol,
                    "contractType": "LinearPerpetual",
                    "status": "Trading",
                    "baseCoin": "BTC",
                    "quoteCoin": "USDT",
                    "priceScale": "2",
                    "priceFilter": {
                        "minPrice": "0.10",
                        "maxPrice": "1999999.80",
                        "tickSize": tick
                    },
                    "lotSizeFilter": {
                        "maxOrderQty": "1190.000",
                        "minOrderQty": min_qty,
                        "qtyStep": step,
                        "postOnlyMaxOrderQty": "1190.000",
                        "maxMktOrderQty": "500.000",
                        "minNotionalValue": "5"
                    }
                }],
                "nextPageCursor": ""
            },
            "retExtInfo": {},
            "time": 1_704_067_200_000_i64
        })
    }

    pub fn empty_list() -> Value {
        json!({
            "retCode": 0,
            "retMsg": "OK",
            "result": { "category": "linear", "list": [], "nextPageCursor": "" },
            "retExtInfo": {},
            "time": 1_704_067_200_000_i64
        })
    }

    pub fn params_error() -> Value {
        json!({
            "retCode": 10001,
            "retMsg": "params error: symbol invalid",
            "result": {},
            "retExtInfo": {},
            "time": 1_704_067_200_000_i64
        })
    }

    pub fn server_time() -> Value {
        json!({
            "retCode": 0,
            "retMsg": "OK",
            "result": { "timeSecond": "1704067200", "timeNano": "1704067200000000000" },
            "retExtInfo": {},
            "time": 1_704_067_200_000_i64
        })
    }
}
