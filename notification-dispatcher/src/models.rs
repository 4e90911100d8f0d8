pub mod message;
pub mod notification;

pub use message::{DeliveryResult, Message, Notification};
pub use notification::{user_topic_name, NotificationData, NotificationRequest, Target, USER_TOPIC_PREFIX};
