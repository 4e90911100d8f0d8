use notification_dispatcher::{
    channel::DeliveryChannel,
    models::{DeliveryResult, Message},
    types::DeliveryError,
};
use parking_lot::Mutex;
use reqwest::StatusCode;
use std::{collections::HashSet, sync::Arc};

/// Mock implementation of the delivery channel. Records every message it is
/// asked to send.
#[derive(Debug, Clone, Default)]
pub struct ChannelMock(Arc<Mutex<ChannelMockInner>>);

#[derive(Debug, Default)]
pub struct ChannelMockInner {
    sent:          Vec<Message>,
    reject_topics: HashSet<String>,
}

impl ChannelMock {
    /// Make sends to `topic` fail the way the service reports an unknown
    /// topic.
    pub fn stub_rejected_topic(&self, topic: &str) {
        self.0.lock().reject_topics.insert(topic.to_string());
    }

    /// All messages the channel was asked to send, in order.
    pub fn sent(&self) -> Vec<Message> { self.0.lock().sent.clone() }

    pub fn sent_topics(&self) -> Vec<String> {
        self.0.lock().sent.iter().map(|m| m.topic.clone()).collect()
    }
}

#[async_trait::async_trait]
impl DeliveryChannel for ChannelMock {
    async fn send(&self, message: &Message) -> Result<DeliveryResult, DeliveryError> {
        let mut inner = self.0.lock();
        inner.sent.push(message.clone());
        if inner.reject_topics.contains(&message.topic) {
            return Err(DeliveryError::Rejected {
                status:       StatusCode::NOT_FOUND,
                error_status: Some("NOT_FOUND".to_string()),
                message:      "Requested entity was not found.".to_string(),
            });
        }
        Ok(DeliveryResult::new(format!(
            "projects/test/messages/{}",
            inner.sent.len()
        )))
    }
}
