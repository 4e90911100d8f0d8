use crate::{
    channel::DeliveryChannel,
    models::{DeliveryResult, Message, Notification, NotificationData, NotificationRequest, Target},
    types::DispatchError,
};
use std::sync::Arc;
use tracing::{error, info};

/// Sends notifications to topics or single users over a shared delivery
/// channel. Cloning is cheap, all clones use the same channel handle.
#[derive(Clone, Debug)]
pub struct Dispatcher {
    channel: Arc<dyn DeliveryChannel>,
}

impl Dispatcher {
    pub fn new(channel: Arc<dyn DeliveryChannel>) -> Self { Self { channel } }

    /// Broadcast to every device subscribed to `topic`. The topic is used
    /// as given.
    pub async fn send_to_topic(
        &self,
        topic: &str,
        title: &str,
        body: &str,
        data: NotificationData,
    ) -> Result<DeliveryResult, DispatchError> {
        self.send(NotificationRequest::to_topic(topic, title, body).with_data(data))
            .await
    }

    /// Send to a single user through the user's personal topic, see
    /// [`user_topic_name`](crate::models::user_topic_name).
    pub async fn send_to_user(
        &self,
        user_id: &str,
        title: &str,
        body: &str,
        data: NotificationData,
    ) -> Result<DeliveryResult, DispatchError> {
        self.send(NotificationRequest::to_user(user_id, title, body).with_data(data))
            .await
    }

    pub async fn send(&self, request: NotificationRequest) -> Result<DeliveryResult, DispatchError> {
        let target = request.target.clone();
        let result = match Self::build_message(request) {
            Ok(message) => self.channel.send(&message).await.map_err(DispatchError::from),
            Err(e) => Err(e.into()),
        };
        match &result {
            Ok(delivery) => info!("Sent notification to {}: {}", target, delivery),
            Err(e) => error!("Failed to send notification to {}: {}", target, e),
        }
        result
    }

    /// Validate the request and translate it into the channel's message
    /// shape, without sending anything.
    pub fn build_message(request: NotificationRequest) -> Result<Message, DispatchError> {
        request.validate()?;
        let topic = match request.target {
            Target::Topic(topic) => topic,
            user @ Target::User(_) => user.topic_name(),
        };
        Ok(Message {
            notification: Notification {
                title: request.title,
                body:  request.body,
            },
            data: request.data,
            topic,
        })
    }
}
