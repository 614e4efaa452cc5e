//! Signal normalization
//!
//! Turns a loosely-shaped payload into a [`NormalizedSignal`]. Payloads arrive
//! either flat (`{"symbol": .., "side": .., "entry": ..}`) or wrapped, with the
//! real signal re-encoded as a string under `content`, `message` or `text`.
//! Decoding walks [`DECODE_ORDER`] and takes the first candidate that carries
//! every required field.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tracing::debug;

use crate::common::errors::SignalError;
use crate::common::traits::Notifier;
use crate::common::types::{Direction, NormalizedSignal, NotificationMessage, RawSignal};

/// Where a candidate signal object is taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStrategy {
    /// The payload itself
    TopLevel,
    /// A string (or object) stored under an alternate key
    Nested(&'static str),
}

/// Decode strategies in priority order
pub const DECODE_ORDER: [DecodeStrategy; 4] = [
    DecodeStrategy::TopLevel,
    DecodeStrategy::Nested("content"),
    DecodeStrategy::Nested("message"),
    DecodeStrategy::Nested("text"),
];

/// Required fields and the payload keys accepted for each, first match wins
const SYMBOL_KEYS: &[&str] = &["symbol", "ticker"];
const DIRECTION_KEYS: &[&str] = &["direction", "side", "action"];
const ENTRY_KEYS: &[&str] = &["entry", "entry_price", "price"];
const STOP_KEYS: &[&str] = &["stop", "sl", "stop_loss"];
const TARGET_KEYS: &[&str] = &["target", "tp", "take_profit"];

const REQUIRED: [(&str, &[&str]); 5] = [
    ("symbol", SYMBOL_KEYS),
    ("direction", DIRECTION_KEYS),
    ("entry", ENTRY_KEYS),
    ("stop", STOP_KEYS),
    ("target", TARGET_KEYS),
];

/// Perpetual-contract suffixes appended by charting platforms
const PERPETUAL_SUFFIXES: &[&str] = &[".PERP", "-PERP", ".P"];

/// Normalize a raw payload
pub fn normalize(raw: &RawSignal) -> Result<NormalizedSignal, SignalError> {
    let object = select_candidate(raw.as_value())?;

    let symbol = canonical_symbol(text_field(&object, "symbol", SYMBOL_KEYS)?)?;
    let direction = parse_direction(text_field(&object, "direction", DIRECTION_KEYS)?)?;
    let entry = decimal_field(&object, "entry", ENTRY_KEYS)?;
    let stop = decimal_field(&object, "stop", STOP_KEYS)?;
    let target = decimal_field(&object, "target", TARGET_KEYS)?;

    // Decimal equality compares values exactly: "50000" == "50000.00".
    if entry == stop {
        return Err(SignalError::DegenerateRisk);
    }

    Ok(NormalizedSignal {
        symbol,
        direction,
        entry,
        stop,
        target,
    })
}

/// Normalize and report the resolved symbol and direction to the operator
pub fn normalize_and_notify(
    raw: &RawSignal,
    notifier: &dyn Notifier,
) -> Result<NormalizedSignal, SignalError> {
    let signal = normalize(raw)?;
    notifier.notify(NotificationMessage::new(format!(
        "Signal received: {} {}",
        signal.direction, signal.symbol
    )));
    Ok(signal)
}

/// Pick the first decode candidate carrying every required field
///
/// When nothing qualifies the top-level payload's first missing field is
/// reported, since that is the shape callers are expected to send.
fn select_candidate(payload: &Value) -> Result<Map<String, Value>, SignalError> {
    let mut top_level_error = SignalError::Missing("symbol");

    for strategy in DECODE_ORDER {
        let Some(candidate) = decode(payload, strategy) else {
            continue;
        };
        match first_missing(&candidate) {
            None => {
                debug!(?strategy, "Decoded signal payload");
                return Ok(candidate);
            }
            Some(field) if strategy == DecodeStrategy::TopLevel => {
                top_level_error = SignalError::Missing(field);
            }
            Some(_) => {}
        }
    }

    if !payload.is_object() {
        return Err(SignalError::Malformed("payload"));
    }
    Err(top_level_error)
}

fn decode(payload: &Value, strategy: DecodeStrategy) -> Option<Map<String, Value>> {
    match strategy {
        DecodeStrategy::TopLevel => payload.as_object().cloned(),
        DecodeStrategy::Nested(key) => match payload.get(key)? {
            Value::Object(map) => Some(map.clone()),
            Value::String(encoded) => decode_embedded(encoded),
            _ => None,
        },
    }
}

/// Decode a JSON object from a string, tolerating surrounding chat text
fn decode_embedded(encoded: &str) -> Option<Map<String, Value>> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(encoded.trim()) {
        return Some(map);
    }
    let start = encoded.find('{')?;
    let end = encoded.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str::<Value>(&encoded[start..=end]) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn first_missing(object: &Map<String, Value>) -> Option<&'static str> {
    REQUIRED
        .iter()
        .find(|(_, keys)| lookup(object, keys).is_none())
        .map(|(field, _)| *field)
}

fn text_field<'a>(
    object: &'a Map<String, Value>,
    field: &'static str,
    keys: &[&str],
) -> Result<&'a str, SignalError> {
    lookup(object, keys)
        .ok_or(SignalError::Missing(field))?
        .as_str()
        .ok_or(SignalError::Malformed(field))
}

fn decimal_field(
    object: &Map<String, Value>,
    field: &'static str,
    keys: &[&str],
) -> Result<Decimal, SignalError> {
    let value = lookup(object, keys).ok_or(SignalError::Missing(field))?;
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        // Needs serde_json's `arbitrary_precision`: the number keeps its
        // literal digits instead of passing through an f64.
        Value::Number(n) => n.to_string(),
        _ => return Err(SignalError::Malformed(field)),
    };
    parse_decimal(&text).ok_or(SignalError::Malformed(field))
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.is_empty() {
        return None;
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Canonicalize a symbol: `BYBIT:BTCUSDT.P` becomes `BTCUSDT`
pub fn canonical_symbol(raw: &str) -> Result<String, SignalError> {
    let without_prefix = raw.rsplit(':').next().unwrap_or(raw).trim();
    let mut symbol = without_prefix.to_uppercase();

    if let Some(suffix) = PERPETUAL_SUFFIXES.iter().find(|s| symbol.ends_with(*s)) {
        symbol.truncate(symbol.len() - suffix.len());
    }

    if symbol.is_empty() || !symbol.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(SignalError::Malformed("symbol"));
    }
    Ok(symbol)
}

/// Map a direction word onto [`Direction`]
pub fn parse_direction(raw: &str) -> Result<Direction, SignalError> {
    match raw.trim().to_lowercase().as_str() {
        "buy" | "long" => Ok(Direction::Long),
        "sell" | "short" => Ok(Direction::Short),
        _ => Err(SignalError::Malformed("direction")),
    }
}
