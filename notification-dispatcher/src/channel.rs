use crate::{
    models::{DeliveryResult, Message},
    types::DeliveryError,
};
use std::fmt::Debug;

/// Transport that routes a message to subscribed devices. Implemented by
/// [`GoogleCloud`](crate::google_cloud::GoogleCloud) and stubbed out in tests.
///
/// Implementations are shared between concurrent sends and must not rely on
/// mutable state.
#[async_trait::async_trait]
pub trait DeliveryChannel: Send + Sync + Debug {
    /// Submit a single message. Exactly one attempt is made.
    async fn send(&self, message: &Message) -> Result<DeliveryResult, DeliveryError>;
}
