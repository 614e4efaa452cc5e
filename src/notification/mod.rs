//! Notification module - operator channel delivery

pub mod dispatcher;
pub mod telegram;

use async_trait::async_trait;
use tracing::info;

use crate::common::errors::Result;
use crate::common::traits::NotificationTransport;
use crate::common::types::NotificationMessage;

pub use dispatcher::{DispatcherState, NotificationDispatcher};
pub use telegram::{escape_html, TelegramTransport};

/// Transport that writes notifications to the local log
///
/// Used when no operator channel is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTransport;

#[async_trait]
impl NotificationTransport for LogTransport {
    async fn deliver(&self, message: &NotificationMessage) -> Result<()> {
        info!(target: "notification", at = %message.timestamp, "{}", message.text);
        Ok(())
    }
}
