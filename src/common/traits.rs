//! Trait definitions for the pipeline's collaborators

use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::info;

use super::errors::Result;
use super::types::{InstrumentPrecision, NotificationMessage, OrderIntent, SubmissionAck};

/// Source of per-instrument trading rules (tick size, lot size, limits)
///
/// Implementations must hit the venue on every call; the pipeline relies on
/// each request seeing the venue's current limits.
#[async_trait]
pub trait PrecisionProvider: Send + Sync {
    /// Fetch the current precision snapshot for a canonical symbol
    async fn fetch_precision(&self, symbol: &str) -> Result<InstrumentPrecision>;

    /// Get the name of the venue
    fn venue_name(&self) -> &'static str;
}

/// Receives finished order intents
#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    async fn submit(&self, intent: &OrderIntent) -> Result<SubmissionAck>;
}

/// Delivers a single message to the operator channel
#[async_trait]
pub trait NotificationTransport: Send + Sync {
    async fn deliver(&self, message: &NotificationMessage) -> Result<()>;
}

/// Fire-and-forget sink used by pipeline stages
///
/// `notify` must return immediately and must never fail the caller.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: NotificationMessage);
}

/// Submitter that acknowledges intents without contacting a venue
#[derive(Debug, Default)]
pub struct DryRunSubmitter {
    sequence: AtomicU64,
}

impl DryRunSubmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderSubmitter for DryRunSubmitter {
    async fn submit(&self, intent: &OrderIntent) -> Result<SubmissionAck> {
        let n = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        info!(
            "DRY RUN: {} {} qty={} entry={} sl={} tp={}",
            intent.direction.order_side(),
            intent.symbol,
            intent.quantity,
            intent.entry,
            intent.stop,
            intent.target
        );
        Ok(SubmissionAck {
            order_id: format!("dry-run-{}", n),
            status: "accepted".to_string(),
        })
    }
}
