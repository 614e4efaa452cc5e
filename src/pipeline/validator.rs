//! Order validation gate
//!
//! Last check between a quantized candidate and an [`OrderIntent`]. Rules run
//! in a fixed order and the first violation rejects the request; nothing is
//! adjusted to make a candidate pass.

use rust_decimal::Decimal;

use crate::common::errors::ValidationError;
use crate::common::types::{Direction, InstrumentPrecision, OrderIntent};
use crate::config::types::ValidationConfig;

/// Quantized order awaiting validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentCandidate {
    pub symbol: String,
    pub direction: Direction,
    pub quantity: Decimal,
    pub entry: Decimal,
    pub stop: Decimal,
    pub target: Decimal,
}

/// Validation gate holding the notional floor
#[derive(Debug, Clone, Default)]
pub struct OrderValidator {
    config: ValidationConfig,
}

impl OrderValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Effective minimum notional for an instrument
    pub fn min_notional(&self, precision: &InstrumentPrecision) -> Decimal {
        self.config
            .implicit_min_notional_usd
            .max(precision.min_notional)
    }

    /// Validate a candidate against the venue's limits
    pub fn validate(
        &self,
        candidate: IntentCandidate,
        precision: &InstrumentPrecision,
    ) -> Result<OrderIntent, ValidationError> {
        let quantity = candidate.quantity;

        if quantity <= Decimal::ZERO {
            return Err(ValidationError::NonPositiveQuantity {
                symbol: candidate.symbol,
                quantity,
            });
        }

        if quantity < precision.min_qty {
            return Err(ValidationError::BelowMinQuantity {
                symbol: candidate.symbol,
                quantity,
                min_qty: precision.min_qty,
            });
        }

        if let Some(max_qty) = precision.max_qty {
            if quantity > max_qty {
                return Err(ValidationError::AboveMaxQuantity {
                    symbol: candidate.symbol,
                    quantity,
                    max_qty,
                });
            }
        }

        let intent = OrderIntent {
            symbol: candidate.symbol,
            direction: candidate.direction,
            quantity,
            entry: candidate.entry,
            stop: candidate.stop,
            target: candidate.target,
        };

        let min_notional = self.min_notional(precision);
        let notional = intent.notional();
        if notional < min_notional {
            return Err(ValidationError::BelowMinNotional {
                symbol: intent.symbol,
                notional,
                min_notional,
            });
        }

        Ok(intent)
    }
}
