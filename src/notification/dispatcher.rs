//! Rate-limited notification dispatcher
//!
//! Producers call [`Notifier::notify`], which enqueues without waiting. A
//! single worker task drains the queue in FIFO order and spaces deliveries at
//! least `min_interval` apart. Failed deliveries are logged and dropped.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, trace, warn};

use crate::common::channels::create_notification_channel_with_size;
use crate::common::traits::{NotificationTransport, Notifier};
use crate::common::types::NotificationMessage;
use crate::config::types::NotificationConfig;

/// Worker state, observable through [`NotificationDispatcher::subscribe_state`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatcherState {
    /// Waiting for a message
    Idle,
    /// Holding a message until the rate limit allows delivery
    Draining,
    /// Transport call in flight
    Delivering,
    /// All producers are gone and the queue is empty
    Stopped,
}

/// Producer handle; cheap to clone and share between stages
#[derive(Debug, Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<NotificationMessage>,
    state: watch::Receiver<DispatcherState>,
}

impl NotificationDispatcher {
    /// Start the worker on the current tokio runtime
    ///
    /// The worker runs until every handle is dropped and the queue is drained.
    pub fn spawn(
        transport: Arc<dyn NotificationTransport>,
        config: &NotificationConfig,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = create_notification_channel_with_size(config.queue_capacity);
        let (state_tx, state_rx) = watch::channel(DispatcherState::Idle);

        let worker = DispatchWorker {
            receiver,
            transport,
            min_interval: config.min_interval(),
            last_delivery: None,
            state: state_tx,
        };
        let handle = tokio::spawn(worker.run());

        (
            Self {
                sender,
                state: state_rx,
            },
            handle,
        )
    }

    /// Current worker state
    pub fn state(&self) -> DispatcherState {
        *self.state.borrow()
    }

    /// Watch worker state transitions
    pub fn subscribe_state(&self) -> watch::Receiver<DispatcherState> {
        self.state.clone()
    }
}

impl Notifier for NotificationDispatcher {
    fn notify(&self, message: NotificationMessage) {
        match self.sender.try_send(message) {
            Ok(()) => {}
            Err(TrySendError::Full(message)) => {
                warn!("Notification queue full, dropping: {}", message.text);
            }
            Err(TrySendError::Closed(_)) => {
                debug!("Notification worker stopped, dropping message");
            }
        }
    }
}

struct DispatchWorker {
    receiver: mpsc::Receiver<NotificationMessage>,
    transport: Arc<dyn NotificationTransport>,
    min_interval: Duration,
    /// Start of the previous delivery attempt; owned by the worker alone
    last_delivery: Option<Instant>,
    state: watch::Sender<DispatcherState>,
}

impl DispatchWorker {
    async fn run(mut self) {
        info!(
            interval_ms = self.min_interval.as_millis() as u64,
            "Starting notification dispatcher"
        );

        loop {
            self.set_state(DispatcherState::Idle);
            let Some(message) = self.receiver.recv().await else {
                break;
            };

            if let Some(last) = self.last_delivery {
                let ready_at = last + self.min_interval;
                if Instant::now() < ready_at {
                    self.set_state(DispatcherState::Draining);
                    sleep_until(ready_at).await;
                }
            }

            self.set_state(DispatcherState::Delivering);
            self.last_delivery = Some(Instant::now());
            if let Err(e) = self.transport.deliver(&message).await {
                error!("Failed to deliver notification, dropping it: {}", e);
            }
        }

        self.set_state(DispatcherState::Stopped);
        info!("Notification channel closed. Stopping dispatcher.");
    }

    fn set_state(&self, state: DispatcherState) {
        trace!(?state, "Dispatcher state");
        self.state.send_replace(state);
    }
}
