use rust_decimal::Decimal;

use crate::common::errors::SizingError;
use crate::common::types::NormalizedSignal;
use crate::config::types::SizingPolicy;

/// Unrounded quantity produced by sizing, before venue quantization
pub type RawQuantity = Decimal;

/// Which budget produced a candidate quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BudgetKind {
    Risk,
    Notional,
    Reward,
}

/// Quantity allowed by a single budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeCandidate {
    pub kind: BudgetKind,
    pub quantity: Decimal,
}

/// SizeCalculator trait
///
/// Derives a raw quantity from a normalized signal. Implementations are pure:
/// no I/O and no rounding, the quantizer owns venue granularity.
///
/// # Design
///
/// Each configured budget contributes one [`SizeCandidate`]. The final
/// quantity is the smallest candidate, so no configured cap is ever exceeded.
pub trait SizeCalculator: Send + Sync {
    /// Candidate quantities for every configured budget
    fn candidates(&self, signal: &NormalizedSignal) -> Result<Vec<SizeCandidate>, SizingError>;

    /// Raw quantity: the minimum over all candidates
    fn size(&self, signal: &NormalizedSignal) -> Result<RawQuantity, SizingError> {
        self.candidates(signal)?
            .into_iter()
            .map(|c| c.quantity)
            .min()
            .ok_or(SizingError::NoBudgetConfigured)
    }
}

/// Budget-driven size calculator
#[derive(Debug, Clone)]
pub struct BudgetSizeCalculator {
    policy: SizingPolicy,
}

impl BudgetSizeCalculator {
    /// Build a calculator, rejecting policies that cannot bound a quantity
    pub fn new(policy: SizingPolicy) -> Result<Self, SizingError> {
        validate_policy(&policy)?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &SizingPolicy {
        &self.policy
    }
}

impl SizeCalculator for BudgetSizeCalculator {
    fn candidates(&self, signal: &NormalizedSignal) -> Result<Vec<SizeCandidate>, SizingError> {
        let mut candidates = Vec::with_capacity(3);

        if let Some(budget) = self.policy.risk_budget_usd {
            let distance = (signal.entry - signal.stop).abs();
            if distance.is_zero() {
                return Err(SizingError::ZeroRiskDistance);
            }
            candidates.push(SizeCandidate {
                kind: BudgetKind::Risk,
                quantity: budget.checked_div(distance).ok_or(SizingError::Overflow)?,
            });
        }

        if let Some(cap) = self.policy.max_notional_usd {
            if signal.entry.is_zero() {
                return Err(SizingError::ZeroEntryPrice);
            }
            candidates.push(SizeCandidate {
                kind: BudgetKind::Notional,
                quantity: cap
                    .checked_div(signal.entry.abs())
                    .ok_or(SizingError::Overflow)?,
            });
        }

        if let Some(budget) = self.policy.reward_budget_usd {
            let distance = (signal.target - signal.entry).abs();
            // Target at entry puts no bound on size; other budgets still apply.
            if !distance.is_zero() {
                candidates.push(SizeCandidate {
                    kind: BudgetKind::Reward,
                    quantity: budget.checked_div(distance).ok_or(SizingError::Overflow)?,
                });
            }
        }

        if candidates.is_empty() {
            return Err(SizingError::NoBudgetConfigured);
        }
        Ok(candidates)
    }
}

/// Check that at least one budget is configured and all are positive
pub fn validate_policy(policy: &SizingPolicy) -> Result<(), SizingError> {
    let budgets = [
        ("risk_budget_usd", policy.risk_budget_usd),
        ("max_notional_usd", policy.max_notional_usd),
        ("reward_budget_usd", policy.reward_budget_usd),
    ];

    if budgets.iter().all(|(_, value)| value.is_none()) {
        return Err(SizingError::NoBudgetConfigured);
    }
    for (name, value) in budgets {
        if let Some(value) = value {
            if value <= Decimal::ZERO {
                return Err(SizingError::InvalidBudget { name, value });
            }
        }
    }
    Ok(())
}

/// Boxed size calculator for dynamic dispatch
pub type BoxedSizeCalculator = Box<dyn SizeCalculator>;
