//! Channel type definitions for inter-task communication

use tokio::sync::mpsc;

use super::types::NotificationMessage;

/// Default notification queue capacity
pub const DEFAULT_CHANNEL_SIZE: usize = 256;

/// Create a notification channel with a custom buffer size
///
/// A size of zero is bumped to one since tokio rejects empty bounded channels.
pub fn create_notification_channel_with_size(
    size: usize,
) -> (
    mpsc::Sender<NotificationMessage>,
    mpsc::Receiver<NotificationMessage>,
) {
    mpsc::channel(size.max(1))
}
