use reqwest::StatusCode;

/// A request that was refused locally, before anything was handed to the
/// delivery channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("The {0} of a notification must not be empty.")]
    EmptyField(&'static str),
    #[error("Data keys must not be empty.")]
    EmptyDataKey,
    #[error("Data key `{0}` is reserved by the messaging service.")]
    ReservedDataKey(String),
    #[error("Data value for key `{key}` is not a string, number or boolean: {value}.")]
    UnsupportedDataValue { key: String, value: String },
    #[error("Invalid data entry `{0}`, expected `key=value`.")]
    MalformedDataEntry(String),
}

/// Failure reported by, or while talking to, the delivery channel.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("Message rejected with status {status}: {message}")]
    Rejected {
        status:       StatusCode,
        /// The service's own error status, e.g. `INVALID_ARGUMENT`, if the
        /// response body could be parsed.
        error_status: Option<String>,
        message:      String,
    },
    #[error("Unable to obtain an access token: {0}")]
    Authentication(#[from] gcp_auth::Error),
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Unexpected response from the messaging service: {0}")]
    MalformedResponse(String),
}

impl DeliveryError {
    /// Whether the service refused the message because of its target,
    /// i.e. an unknown or malformed topic.
    pub fn is_invalid_target(&self) -> bool {
        match self {
            DeliveryError::Rejected { error_status, .. } => matches!(
                error_status.as_deref(),
                Some("NOT_FOUND") | Some("UNREGISTERED") | Some("INVALID_ARGUMENT")
            ),
            _ => false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Invalid notification: {0}")]
    Validation(#[from] ValidationError),
    #[error("Delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}
