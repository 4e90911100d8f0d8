mod helpers;

use assert_matches::assert_matches;
use helpers::channel_mock::ChannelMock;
use notification_dispatcher::{
    dispatcher::Dispatcher,
    models::NotificationData,
    tips::{self, DemoUser},
    types::{DeliveryError, DispatchError, ValidationError},
};
use reqwest::StatusCode;
use std::sync::Arc;

fn dispatcher() -> (Dispatcher, ChannelMock) {
    let channel = ChannelMock::default();
    (Dispatcher::new(Arc::new(channel.clone())), channel)
}

fn weight_loss_data() -> NotificationData {
    NotificationData::try_from_pairs([
        ("tipId", "4"),
        ("category", "nutrition"),
        ("goal", "lose_weight"),
    ])
    .unwrap()
}

fn demo_user() -> DemoUser {
    DemoUser {
        id:   "user123".to_string(),
        name: "John".to_string(),
        goal: "lose weight".to_string(),
    }
}

#[tokio::test]
async fn test_send_to_topic() {
    let (dispatcher, channel) = dispatcher();

    let result = dispatcher
        .send_to_topic(
            "goal_lose_weight",
            "Daily Weight Loss Tip",
            "Start your day with a protein-rich breakfast.",
            weight_loss_data(),
        )
        .await
        .unwrap();

    assert_eq!(result.as_str(), "projects/test/messages/1");
    let sent = channel.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].topic, "goal_lose_weight");
    assert_eq!(sent[0].data.get("tipId"), Some("4"));
    assert_eq!(sent[0].notification.title, "Daily Weight Loss Tip");
}

#[tokio::test]
async fn test_send_to_user_uses_user_topic() {
    let (dispatcher, channel) = dispatcher();

    dispatcher
        .send_to_user("user123", "Hello John!", "Stay hydrated.", weight_loss_data())
        .await
        .unwrap();
    dispatcher
        .send_to_topic("user_user123", "Hello John!", "Stay hydrated.", weight_loss_data())
        .await
        .unwrap();

    let sent = channel.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0], sent[1]);
    assert_eq!(sent[0].topic, "user_user123");
}

#[tokio::test]
async fn test_validation_happens_before_sending() {
    let (dispatcher, channel) = dispatcher();

    let err = dispatcher
        .send_to_topic("news", "", "body", NotificationData::new())
        .await
        .unwrap_err();
    assert_matches!(err, DispatchError::Validation(ValidationError::EmptyField("title")));

    let err = dispatcher
        .send_to_topic("news", "title", "", NotificationData::new())
        .await
        .unwrap_err();
    assert_matches!(err, DispatchError::Validation(ValidationError::EmptyField("body")));

    let err = dispatcher
        .send_to_user("", "title", "body", NotificationData::new())
        .await
        .unwrap_err();
    assert_matches!(err, DispatchError::Validation(ValidationError::EmptyField("user id")));

    assert!(channel.sent().is_empty());
}

#[tokio::test]
async fn test_delivery_error_is_passed_through() {
    let (dispatcher, channel) = dispatcher();
    channel.stub_rejected_topic("no_such_topic");

    let err = dispatcher
        .send_to_topic("no_such_topic", "title", "body", NotificationData::new())
        .await
        .unwrap_err();

    assert_matches!(
        err,
        DispatchError::Delivery(DeliveryError::Rejected { status, error_status: Some(ref s), ref message })
            if status == StatusCode::NOT_FOUND
                && s == "NOT_FOUND"
                && message == "Requested entity was not found."
    );
    assert_eq!(channel.sent().len(), 1, "exactly one attempt is made");
}

#[tokio::test]
async fn test_concurrent_sends() {
    let (dispatcher, channel) = dispatcher();
    let other = dispatcher.clone();

    let (a, b) = tokio::join!(
        dispatcher.send_to_topic("sleep", "Sleep Tip", "Sleep.", NotificationData::new()),
        other.send_to_topic("exercise", "Exercise Tip", "Move.", NotificationData::new()),
    );
    assert!(a.is_ok());
    assert!(b.is_ok());

    let mut topics = channel.sent_topics();
    topics.sort();
    assert_eq!(topics, ["exercise", "sleep"]);
}

#[tokio::test]
async fn test_demo_sends_in_order() {
    let (dispatcher, channel) = dispatcher();

    let sent = tips::run_demo(&dispatcher, &demo_user(), 13).await.unwrap();

    assert_eq!(sent, 8);
    assert_eq!(channel.sent_topics(), [
        "goal_lose_weight",
        "age_26_35",
        "user_user123",
        "goal_stay_healthy",
        "nutrition",
        "exercise",
        "mental_health",
        "sleep",
    ]);
    assert_eq!(channel.sent()[3].data.get("tipId"), Some("afternoon_1"));
}

#[tokio::test]
async fn test_demo_stops_at_first_failure() {
    let (dispatcher, channel) = dispatcher();
    channel.stub_rejected_topic("user_user123");

    let err = tips::run_demo(&dispatcher, &demo_user(), 8).await.unwrap_err();

    assert_matches!(err, DispatchError::Delivery(ref e) if e.is_invalid_target());
    assert_eq!(channel.sent_topics(), [
        "goal_lose_weight",
        "age_26_35",
        "user_user123",
    ]);
}
