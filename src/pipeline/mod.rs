//! Pipeline module - turns raw signals into venue-compliant order intents
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    REQUEST PATH (per signal)                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  RawSignal                                                  │
//! │       │  normalizer::normalize                              │
//! │       ▼                                                     │
//! │  NormalizedSignal ──► PrecisionProvider (fresh per request) │
//! │       │  SizeCalculator::size                               │
//! │       ▼                                                     │
//! │  raw quantity                                               │
//! │       │  quantizer::quantize / quantize_price               │
//! │       ▼                                                     │
//! │  IntentCandidate                                            │
//! │       │  OrderValidator::validate                           │
//! │       ▼                                                     │
//! │  OrderIntent ──► OrderSubmitter (optional)                  │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    BACKGROUND                               │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Notifier ──► NotificationDispatcher ──► operator channel   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`normalizer`]: decodes and canonicalizes payloads
//! - [`SizeCalculator`]: derives a raw quantity from budgets
//! - [`quantizer`]: snaps prices and quantity to venue steps
//! - [`OrderValidator`]: rejects intents violating venue limits
//! - [`SignalPipeline`]: composes the stages and reports every outcome

pub mod normalizer;
pub mod quantizer;
mod size_calculator;
mod validator;

use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::common::errors::{PipelineError, SignalError};
use crate::common::traits::{Notifier, OrderSubmitter, PrecisionProvider};
use crate::common::types::{
    InstrumentPrecision, NormalizedSignal, NotificationMessage, OrderIntent, RawSignal,
    SubmissionAck,
};

pub use normalizer::{normalize, DecodeStrategy, DECODE_ORDER};
pub use quantizer::{quantize, quantize_price};
pub use size_calculator::{
    validate_policy, BoxedSizeCalculator, BudgetKind, BudgetSizeCalculator, RawQuantity,
    SizeCalculator, SizeCandidate,
};
pub use validator::{IntentCandidate, OrderValidator};

/// Where the precision snapshot of a run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PrecisionSource {
    Venue,
    /// Venue unavailable or answered garbage
    ConservativeDefaults,
}

/// Result of handing an intent to the submission collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Acknowledged(SubmissionAck),
    Failed { reason: String },
}

/// Everything a successful run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineOutcome {
    pub intent: OrderIntent,
    /// Quantity before lot quantization
    pub raw_quantity: RawQuantity,
    pub precision_source: PrecisionSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submission: Option<SubmissionOutcome>,
}

/// Signal-to-intent pipeline
///
/// Stages run synchronously inside one request; only the precision fetch and
/// the optional submission are awaited. The instance holds no per-request
/// state and can be shared across concurrent requests.
pub struct SignalPipeline {
    provider: Arc<dyn PrecisionProvider>,
    sizer: BoxedSizeCalculator,
    validator: OrderValidator,
    notifier: Arc<dyn Notifier>,
    submitter: Option<Arc<dyn OrderSubmitter>>,
}

impl SignalPipeline {
    pub fn new(
        provider: Arc<dyn PrecisionProvider>,
        sizer: BoxedSizeCalculator,
        validator: OrderValidator,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            provider,
            sizer,
            validator,
            notifier,
            submitter: None,
        }
    }

    /// Forward accepted intents to a submission collaborator
    pub fn with_submitter(mut self, submitter: Arc<dyn OrderSubmitter>) -> Self {
        self.submitter = Some(submitter);
        self
    }

    /// Notifier shared with the ingress layer
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Run one signal through every stage
    ///
    /// Rejections are logged and reported to the operator channel before being
    /// returned.
    #[instrument(skip(self, raw))]
    pub async fn process(&self, raw: &RawSignal) -> Result<PipelineOutcome, PipelineError> {
        match self.run(raw).await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                warn!(code = err.code(), "Signal rejected: {}", err);
                self.notifier.notify(NotificationMessage::new(format!(
                    "❌ Signal rejected ({}): {}",
                    err.code(),
                    err
                )));
                Err(err)
            }
        }
    }

    async fn run(&self, raw: &RawSignal) -> Result<PipelineOutcome, PipelineError> {
        let signal = normalizer::normalize_and_notify(raw, self.notifier.as_ref())?;
        let (precision, precision_source) = self.precision_for(&signal.symbol).await;

        let raw_quantity = self.sizer.size(&signal)?;
        let candidate = self.quantize_candidate(&signal, raw_quantity, &precision)?;
        let intent = self.validator.validate(candidate, &precision)?;

        info!(
            symbol = %intent.symbol,
            direction = %intent.direction,
            quantity = %intent.quantity,
            raw_quantity = %raw_quantity,
            "Order intent accepted"
        );
        self.notifier
            .notify(NotificationMessage::new(format!("✅ {}", intent.summary())));

        let submission = match &self.submitter {
            Some(submitter) => Some(self.submit(submitter.as_ref(), &intent).await),
            None => None,
        };

        Ok(PipelineOutcome {
            intent,
            raw_quantity,
            precision_source,
            submission,
        })
    }

    /// Fetch precision, degrading to conservative defaults on any failure
    async fn precision_for(&self, symbol: &str) -> (InstrumentPrecision, PrecisionSource) {
        match self.provider.fetch_precision(symbol).await {
            Ok(precision) => (precision, PrecisionSource::Venue),
            Err(e) => {
                warn!(
                    venue = self.provider.venue_name(),
                    "Precision lookup for {} failed, using defaults: {}", symbol, e
                );
                self.notifier.notify(NotificationMessage::new(format!(
                    "⚠️ {} precision unavailable for {}, using conservative defaults",
                    self.provider.venue_name(),
                    symbol
                )));
                (
                    InstrumentPrecision::conservative(symbol),
                    PrecisionSource::ConservativeDefaults,
                )
            }
        }
    }

    fn quantize_candidate(
        &self,
        signal: &NormalizedSignal,
        raw_quantity: Decimal,
        precision: &InstrumentPrecision,
    ) -> Result<IntentCandidate, PipelineError> {
        let entry = quantize_price(signal.entry, precision.tick_size)?;
        let stop = quantize_price(signal.stop, precision.tick_size)?;
        // Entry and stop inside one tick collapse onto the same price.
        if entry == stop {
            return Err(SignalError::DegenerateRisk.into());
        }

        Ok(IntentCandidate {
            symbol: signal.symbol.clone(),
            direction: signal.direction,
            quantity: quantize(raw_quantity, precision)?,
            entry,
            stop,
            target: quantize_price(signal.target, precision.tick_size)?,
        })
    }

    async fn submit(&self, submitter: &dyn OrderSubmitter, intent: &OrderIntent) -> SubmissionOutcome {
        match submitter.submit(intent).await {
            Ok(ack) => {
                info!(order_id = %ack.order_id, status = %ack.status, "Order submitted");
                self.notifier.notify(NotificationMessage::new(format!(
                    "📨 {} order {} ({})",
                    intent.symbol, ack.order_id, ack.status
                )));
                SubmissionOutcome::Acknowledged(ack)
            }
            Err(e) => {
                warn!("Order submission for {} failed: {}", intent.symbol, e);
                self.notifier.notify(NotificationMessage::new(format!(
                    "🔥 {} order submission failed: {}",
                    intent.symbol, e
                )));
                SubmissionOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }
}
