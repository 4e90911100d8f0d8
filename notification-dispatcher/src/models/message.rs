use super::notification::NotificationData;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub body:  String,
}

/// A message in the shape the delivery channel accepts.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Message {
    pub notification: Notification,
    pub data:         NotificationData,
    pub topic:        String,
}

/// Confirmation returned by the channel for an accepted message. The
/// content is whatever identifier the channel assigned and is not
/// interpreted further.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DeliveryResult {
    name: String,
}

impl DeliveryResult {
    pub fn new(name: impl Into<String>) -> Self { Self { name: name.into() } }

    pub fn as_str(&self) -> &str { &self.name }
}

impl fmt::Display for DeliveryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.name) }
}
