use crate::{
    channel::DeliveryChannel,
    models::{DeliveryResult, Message},
    types::DeliveryError,
};
use anyhow::anyhow;
use gcp_auth::{CustomServiceAccount, TokenProvider};
use reqwest::{Client, Url};
use serde_json::json;
use std::{fmt, path::PathBuf};
use tracing::{debug, error};

const SCOPES: &[&str; 1] = &["https://www.googleapis.com/auth/firebase.messaging"];

pub const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

#[derive(Clone, Debug)]
pub struct ChannelOptions {
    /// Base URL of the messaging API.
    pub endpoint:      Url,
    /// Ask the service to validate messages without delivering them.
    pub validate_only: bool,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            endpoint:      Url::parse(DEFAULT_FCM_ENDPOINT).expect("valid default endpoint"),
            validate_only: false,
        }
    }
}

enum Authenticator {
    ServiceAccount(CustomServiceAccount),
    AccessToken(String),
}

impl Authenticator {
    async fn bearer_token(&self) -> Result<String, DeliveryError> {
        match self {
            Authenticator::ServiceAccount(service_account) => {
                Ok(service_account.token(SCOPES).await?.as_str().to_string())
            }
            Authenticator::AccessToken(token) => Ok(token.clone()),
        }
    }
}

/// Firebase Cloud Messaging (HTTP v1) delivery channel.
pub struct GoogleCloud {
    client:        Client,
    authenticator: Authenticator,
    url:           String,
    validate_only: bool,
}

impl fmt::Debug for GoogleCloud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleCloud")
            .field("url", &self.url)
            .field("validate_only", &self.validate_only)
            .finish_non_exhaustive()
    }
}

impl GoogleCloud {
    /// Load the service account at `credentials_path` and build a channel
    /// for the project it belongs to.
    pub fn new(
        credentials_path: PathBuf,
        client: Client,
        options: ChannelOptions,
    ) -> anyhow::Result<Self> {
        let service_account = CustomServiceAccount::from_file(credentials_path)?;
        let project_id = service_account
            .project_id()
            .ok_or(anyhow!("Project ID not found in service account"))?
            .to_string();
        Ok(Self::build(
            Authenticator::ServiceAccount(service_account),
            &project_id,
            client,
            options,
        ))
    }

    /// Build a channel authenticating with an already issued OAuth2 access
    /// token.
    pub fn with_access_token(
        project_id: &str,
        access_token: String,
        client: Client,
        options: ChannelOptions,
    ) -> Self {
        Self::build(
            Authenticator::AccessToken(access_token),
            project_id,
            client,
            options,
        )
    }

    fn build(
        authenticator: Authenticator,
        project_id: &str,
        client: Client,
        options: ChannelOptions,
    ) -> Self {
        let url = format!(
            "{}/v1/projects/{}/messages:send",
            options.endpoint.as_str().trim_end_matches('/'),
            project_id
        );
        Self {
            client,
            authenticator,
            url,
            validate_only: options.validate_only,
        }
    }

    pub fn url(&self) -> &str { &self.url }
}

#[async_trait::async_trait]
impl DeliveryChannel for GoogleCloud {
    async fn send(&self, message: &Message) -> Result<DeliveryResult, DeliveryError> {
        let access_token = self.authenticator.bearer_token().await?;

        let payload = json!({
            "message": message,
            "validate_only": self.validate_only
        });

        debug!("Submitting message for topic {} to {}", message.topic, self.url);
        let res = self
            .client
            .post(&self.url)
            .bearer_auth(access_token)
            .json(&payload)
            .send()
            .await?;

        let status = res.status();
        let text = res.text().await.map_err(|e| {
            error!("Failed to read response: {}", e);
            e
        })?;
        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                DeliveryError::MalformedResponse(format!("{e}, body was {text}"))
            })
        } else {
            Err(rejection(status, text))
        }
    }
}

/// Turn an error response into a [`DeliveryError::Rejected`], picking up the
/// service's own status and message when the body is the usual error object.
fn rejection(status: reqwest::StatusCode, text: String) -> DeliveryError {
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => DeliveryError::Rejected {
            status,
            error_status: json["error"]["status"].as_str().map(str::to_string),
            message: json["error"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or(text),
        },
        Err(_) => DeliveryError::Rejected {
            status,
            error_status: None,
            message: text,
        },
    }
}
