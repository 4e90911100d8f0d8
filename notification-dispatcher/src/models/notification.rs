use crate::types::ValidationError;
use serde::Serialize;
use serde_json::Value;
use std::{collections::BTreeMap, fmt};

/// Prefix of the topic every user's devices subscribe to. Existing clients
/// subscribe to `user_<id>`, so this must not change.
pub const USER_TOPIC_PREFIX: &str = "user_";

/// Keys the messaging service refuses in the data payload.
const RESERVED_DATA_KEYS: [&str; 3] = ["from", "notification", "message_type"];
const RESERVED_DATA_KEY_PREFIXES: [&str; 2] = ["google", "gcm"];

/// The topic a single user's devices are subscribed to.
pub fn user_topic_name(user_id: &str) -> String { format!("{USER_TOPIC_PREFIX}{user_id}") }

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    /// Broadcast to every device subscribed to the topic.
    Topic(String),
    /// A single user, reached through their personal topic.
    User(String),
}

impl Target {
    pub fn topic_name(&self) -> String {
        match self {
            Target::Topic(topic) => topic.clone(),
            Target::User(user_id) => user_topic_name(user_id),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Target::Topic(topic) if topic.is_empty() => Err(ValidationError::EmptyField("topic")),
            Target::User(user_id) if user_id.is_empty() => {
                Err(ValidationError::EmptyField("user id"))
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Topic(topic) => write!(f, "topic {topic}"),
            Target::User(user_id) => write!(f, "user {user_id}"),
        }
    }
}

/// Flat string-to-string payload delivered alongside the notification.
///
/// Values are accepted as anything convertible into a JSON value. Strings
/// are kept verbatim, numbers and booleans are stored in their textual
/// form, while `null`, arrays and objects are rejected.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NotificationData(BTreeMap<String, String>);

impl NotificationData {
    pub fn new() -> Self { Self::default() }

    pub fn insert<K, V>(&mut self, key: K, value: V) -> Result<(), ValidationError>
    where
        K: Into<String>,
        V: Into<Value>, {
        let key = key.into();
        validate_key(&key)?;
        let value = coerce_value(&key, value.into())?;
        self.0.insert(key, value);
        Ok(())
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with<K, V>(mut self, key: K, value: V) -> Result<Self, ValidationError>
    where
        K: Into<String>,
        V: Into<Value>, {
        self.insert(key, value)?;
        Ok(self)
    }

    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>, {
        pairs
            .into_iter()
            .try_fold(Self::new(), |data, (key, value)| data.with(key, value))
    }

    /// Build the payload from a JSON object, e.g. one read from a file or a
    /// request body.
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Result<Self, ValidationError> {
        Self::try_from_pairs(object)
    }

    pub fn get(&self, key: &str) -> Option<&str> { self.0.get(key).map(String::as_str) }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn validate_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::EmptyDataKey);
    }
    let lowercase = key.to_lowercase();
    if RESERVED_DATA_KEYS.contains(&lowercase.as_str())
        || RESERVED_DATA_KEY_PREFIXES
            .iter()
            .any(|prefix| lowercase.starts_with(prefix))
    {
        return Err(ValidationError::ReservedDataKey(key.to_string()));
    }
    Ok(())
}

fn coerce_value(key: &str, value: Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other @ (Value::Null | Value::Array(_) | Value::Object(_)) => {
            Err(ValidationError::UnsupportedDataValue {
                key:   key.to_string(),
                value: other.to_string(),
            })
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NotificationRequest {
    pub target: Target,
    pub title:  String,
    pub body:   String,
    pub data:   NotificationData,
}

impl NotificationRequest {
    pub fn new(target: Target, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            target,
            title: title.into(),
            body: body.into(),
            data: NotificationData::new(),
        }
    }

    pub fn to_topic(
        topic: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(Target::Topic(topic.into()), title, body)
    }

    pub fn to_user(
        user_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self::new(Target::User(user_id.into()), title, body)
    }

    pub fn with_data(mut self, data: NotificationData) -> Self {
        self.data = data;
        self
    }

    /// Checks the fields required before anything is sent.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.target.validate()?;
        if self.title.is_empty() {
            return Err(ValidationError::EmptyField("title"));
        }
        if self.body.is_empty() {
            return Err(ValidationError::EmptyField("body"));
        }
        Ok(())
    }
}
