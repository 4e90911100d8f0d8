use crate::{
    google_cloud::{ChannelOptions, GoogleCloud, DEFAULT_FCM_ENDPOINT},
    models::NotificationData,
    tips::DemoUser,
    types::ValidationError,
};
use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use reqwest::Url;
use std::{path::PathBuf, time::Duration};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
#[clap(arg_required_else_help(true))]
/// Send push notifications to topics and users through Firebase Cloud
/// Messaging.
pub struct DispatcherConfigs {
    #[arg(
        long = "google-application-credentials",
        help = "Service account credentials used for permitting the application to send push \
                notifications.",
        env = "NOTIFICATION_DISPATCHER_GOOGLE_APPLICATION_CREDENTIALS_PATH",
        conflicts_with = "access_token"
    )]
    pub google_application_credentials_path: Option<PathBuf>,
    #[arg(
        long = "access-token",
        help = "An already issued OAuth2 access token, used instead of a service account.",
        env = "NOTIFICATION_DISPATCHER_ACCESS_TOKEN",
        requires = "project_id"
    )]
    pub access_token: Option<String>,
    #[arg(
        long = "project-id",
        help = "Firebase project to send through when authenticating with an access token.",
        env = "NOTIFICATION_DISPATCHER_PROJECT_ID"
    )]
    pub project_id: Option<String>,
    #[arg(
        long = "fcm-endpoint",
        help = "Base URL of the messaging API.",
        env = "NOTIFICATION_DISPATCHER_FCM_ENDPOINT",
        default_value = DEFAULT_FCM_ENDPOINT
    )]
    pub fcm_endpoint: Url,
    #[arg(
        long = "validate-only",
        help = "Only validate messages with the messaging service, nothing is delivered.",
        env = "NOTIFICATION_DISPATCHER_VALIDATE_ONLY"
    )]
    pub validate_only: bool,
    #[arg(
        long = "request-timeout-secs",
        help = "Timeout of a single send request in seconds.",
        env = "NOTIFICATION_DISPATCHER_REQUEST_TIMEOUT_SECS",
        default_value_t = 30
    )]
    pub request_timeout_secs: u64,
    #[arg(
        long = "connection-timeout-secs",
        help = "Timeout for connecting to the messaging API in seconds.",
        env = "NOTIFICATION_DISPATCHER_CONNECTION_TIMEOUT_SECS",
        default_value_t = 5
    )]
    pub connection_timeout_secs: u64,
    #[arg(
        long = "log-level",
        help = "The log level [`off`, `error`, `warn`, `info`, `debug`, or `trace`]",
        default_value = "info",
        env = "NOTIFICATION_DISPATCHER_LOG_LEVEL"
    )]
    pub log_level: tracing_subscriber::filter::LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Send the full set of example tips: goal, age group, personalized,
    /// time of day and one per category.
    Demo(DemoArgs),
    /// Send a notification to a topic.
    Topic(TopicArgs),
    /// Send a notification to a single user.
    User(UserArgs),
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    #[arg(long = "user-id", help = "Recipient of the personalized tip.", default_value = "user123")]
    pub user_id:   String,
    #[arg(long = "user-name", help = "Name used to greet the user.", default_value = "John")]
    pub user_name: String,
    #[arg(long = "user-goal", help = "Goal mentioned in the tip.", default_value = "lose weight")]
    pub user_goal: String,
    #[arg(
        long = "hour",
        help = "Hour of the day selecting the time-of-day tip. Defaults to the current local hour.",
        value_parser = clap::value_parser!(u32).range(0..24)
    )]
    pub hour:      Option<u32>,
}

impl DemoArgs {
    pub fn user(&self) -> DemoUser {
        DemoUser {
            id:   self.user_id.clone(),
            name: self.user_name.clone(),
            goal: self.user_goal.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct MessageArgs {
    #[arg(long = "title", help = "Title of the notification.")]
    pub title: String,
    #[arg(long = "body", help = "Body of the notification.")]
    pub body:  String,
    #[arg(
        long = "data",
        help = "Data entry delivered with the notification, as `key=value`. May be repeated.",
        value_parser = parse_data_entry
    )]
    pub data:  Vec<(String, String)>,
}

impl MessageArgs {
    pub fn data(&self) -> Result<NotificationData, ValidationError> {
        NotificationData::try_from_pairs(self.data.iter().cloned())
    }
}

#[derive(Debug, Args)]
pub struct TopicArgs {
    #[arg(long = "topic", help = "Topic to broadcast to.")]
    pub topic:   String,
    #[command(flatten)]
    pub message: MessageArgs,
}

#[derive(Debug, Args)]
pub struct UserArgs {
    #[arg(long = "user-id", help = "User to notify.")]
    pub user_id: String,
    #[command(flatten)]
    pub message: MessageArgs,
}

/// Parse a `key=value` data entry. The value may itself contain `=`.
pub fn parse_data_entry(entry: &str) -> Result<(String, String), ValidationError> {
    match entry.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(ValidationError::MalformedDataEntry(entry.to_string())),
    }
}

impl DispatcherConfigs {
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(self.connection_timeout_secs))
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
            .context("Unable to build the HTTP client.")
    }

    /// Create the delivery channel handle. Called once at startup, the
    /// handle is then shared by every send.
    pub fn init_channel(&self) -> anyhow::Result<GoogleCloud> {
        let options = ChannelOptions {
            endpoint:      self.fcm_endpoint.clone(),
            validate_only: self.validate_only,
        };
        let client = self.http_client()?;
        match (
            &self.google_application_credentials_path,
            &self.access_token,
            &self.project_id,
        ) {
            (Some(path), None, _) => GoogleCloud::new(path.clone(), client, options)
                .with_context(|| format!("Unable to load service account from {}.", path.display())),
            (None, Some(token), Some(project_id)) => Ok(GoogleCloud::with_access_token(
                project_id,
                token.clone(),
                client,
                options,
            )),
            _ => bail!(
                "Either --google-application-credentials or --access-token together with \
                 --project-id is required."
            ),
        }
    }
}
