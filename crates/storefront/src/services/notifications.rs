//! User-visible notification capability.
//!
//! The containers emit confirmations ("Added Lamp to wishlist") without
//! knowing where they go. Production wiring uses [`LogNotificationSender`],
//! which stands in for a real push-delivery backend by logging; tests use a
//! recording double.

/// Sink for user-visible confirmation messages.
///
/// Delivery is fire-and-forget: senders must not fail the operation that
/// triggered the message.
pub trait NotificationSender: Send + Sync {
    /// Emit a user-visible confirmation.
    fn notify(&self, message: &str);
}

/// Notification sender that logs instead of delivering.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotificationSender;

impl NotificationSender for LogNotificationSender {
    fn notify(&self, message: &str) {
        tracing::info!(target: "lookbook::notify", "{message}");
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use super::NotificationSender;

    /// Records every message for assertion.
    #[derive(Default)]
    pub struct RecordingSender {
        messages: Mutex<Vec<String>>,
    }

    impl RecordingSender {
        pub fn messages(&self) -> Vec<String> {
            self.messages
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .clone()
        }
    }

    impl NotificationSender for RecordingSender {
        fn notify(&self, message: &str) {
            self.messages
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .push(message.to_owned());
        }
    }
}
