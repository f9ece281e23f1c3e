//! Delivery stage

pub mod telegram;

use async_trait::async_trait;

use crate::error::DeliveryError;

pub use telegram::TelegramNotifier;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    /// Deliver one message. No retry; every call is a new delivery attempt.
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}
