//! Fixed-point quantization to venue step sizes
//!
//! Values snap to the nearest multiple of the step, ties away from zero. The
//! result is rescaled to the step's own decimal places (`0.001` → 3), so its
//! string form is exactly what the venue expects: lot `0.001` turns `0.2` into
//! `0.200`, tick `0.5` turns `100.26` into `100.5`.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::common::errors::QuantizeError;
use crate::common::types::InstrumentPrecision;

/// Decimal places implied by a step size
///
/// Trailing zeros in the step's representation do not count: `0.0010` → 3.
pub fn step_decimals(step: Decimal) -> u32 {
    step.normalize().scale()
}

/// Snap `value` to the nearest multiple of `step`
pub fn quantize_to_step(
    value: Decimal,
    step: Decimal,
    kind: &'static str,
) -> Result<Decimal, QuantizeError> {
    if step <= Decimal::ZERO {
        return Err(QuantizeError::InvalidStep { kind, step });
    }
    let overflow = || QuantizeError::Overflow { value, step };

    let steps = value
        .checked_div(step)
        .ok_or_else(overflow)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let mut snapped = steps.checked_mul(step).ok_or_else(overflow)?;

    // `steps * step` is exact, so rescaling only adjusts the representation.
    snapped.rescale(step_decimals(step));
    Ok(snapped)
}

/// Quantize a price to the instrument's tick size
pub fn quantize_price(price: Decimal, tick_size: Decimal) -> Result<Decimal, QuantizeError> {
    quantize_to_step(price, tick_size, "tick")
}

/// Quantize a raw quantity to the instrument's lot size
pub fn quantize(raw_qty: Decimal, precision: &InstrumentPrecision) -> Result<Decimal, QuantizeError> {
    quantize_to_step(raw_qty, precision.lot_size, "lot")
}
