//! Domain types shared by the pipeline stages and their collaborators

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    /// Venue order side for this direction
    pub fn order_side(&self) -> &'static str {
        match self {
            Direction::Long => "Buy",
            Direction::Short => "Sell",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Direction::Long => write!(f, "LONG"),
            Direction::Short => write!(f, "SHORT"),
        }
    }
}

/// Untyped payload as received from the signal source
#[derive(Debug, Clone, PartialEq)]
pub struct RawSignal(pub serde_json::Value);

impl RawSignal {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Parse a request body into a raw signal
    pub fn from_slice(body: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(body).map(Self)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Signal after decoding and canonicalization
///
/// `entry != stop` always holds for a value produced by the normalizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedSignal {
    /// Venue-native symbol, uppercase, prefix and perpetual suffix removed
    pub symbol: String,
    pub direction: Direction,
    pub entry: Decimal,
    pub stop: Decimal,
    pub target: Decimal,
}

/// Snapshot of a venue's trading rules for one instrument
///
/// Fetched per request and dropped afterwards; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstrumentPrecision {
    pub symbol: String,
    /// Minimum price increment
    pub tick_size: Decimal,
    /// Minimum quantity increment
    pub lot_size: Decimal,
    pub min_qty: Decimal,
    /// `None` means unbounded
    #[serde(default)]
    pub max_qty: Option<Decimal>,
    pub min_notional: Decimal,
}

impl InstrumentPrecision {
    /// Conservative defaults used when the venue cannot be consulted
    ///
    /// The quantizer and validation gate still run against these values, so a
    /// wrong guess results in a rejection rather than an illegal order.
    pub fn conservative(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            tick_size: dec!(0.01),
            lot_size: dec!(0.001),
            min_qty: dec!(0.001),
            max_qty: None,
            min_notional: dec!(5),
        }
    }
}

/// Fully validated, venue-compliant order description
///
/// Quantity carries the lot size's scale and prices carry the tick size's
/// scale, so `to_string()` on any field yields the exact wire representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderIntent {
    pub symbol: String,
    pub direction: Direction,
    pub quantity: Decimal,
    pub entry: Decimal,
    pub stop: Decimal,
    pub target: Decimal,
}

impl OrderIntent {
    /// Order value at the entry price
    ///
    /// Saturates at `Decimal::MAX`, which is above any minimum.
    pub fn notional(&self) -> Decimal {
        self.quantity.checked_mul(self.entry).unwrap_or(Decimal::MAX)
    }

    /// One-line summary for operator notifications
    pub fn summary(&self) -> String {
        format!(
            "ORDER: {} | Symbol: {} | Entry: {} | SL: {} | TP: {} | Qty: {}",
            self.direction, self.symbol, self.entry, self.stop, self.target, self.quantity
        )
    }
}

/// Acknowledgement returned by an order submission collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAck {
    /// Venue (or dry-run) order reference
    pub order_id: String,
    pub status: String,
}

/// Text destined for the operator channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationMessage {
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl NotificationMessage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_display_and_side() {
        assert_eq!(Direction::Long.to_string(), "LONG");
        assert_eq!(Direction::Short.order_side(), "Sell");
    }

    #[test]
    fn test_raw_signal_from_slice() {
        let raw = RawSignal::from_slice(br#"{"symbol":"BTCUSDT"}"#).unwrap();
        assert_eq!(raw.as_value()["symbol"], "BTCUSDT");
        assert!(RawSignal::from_slice(b"not json").is_err());
    }

    #[test]
    fn test_intent_summary_uses_wire_scale() {
        let intent = OrderIntent {
            symbol: "BTCUSDT".to_string(),
            direction: Direction::Long,
            quantity: Decimal::new(200, 3),
            entry: Decimal::new(500000, 1),
            stop: Decimal::new(495000, 1),
            target: Decimal::new(510000, 1),
        };
        assert_eq!(
            intent.summary(),
            "ORDER: LONG | Symbol: BTCUSDT | Entry: 50000.0 | SL: 49500.0 | TP: 51000.0 | Qty: 0.200"
        );
        assert_eq!(intent.notional(), dec!(10000));
    }

    #[test]
    fn test_conservative_precision_is_usable() {
        let precision = InstrumentPrecision::conservative("ETHUSDT");
        assert!(precision.tick_size > Decimal::ZERO);
        assert!(precision.lot_size > Decimal::ZERO);
        assert_eq!(precision.max_qty, None);
    }
}
