//! Health tips sent by the `send-tips` tool, and the sequence it sends them
//! in.

use crate::{
    dispatcher::Dispatcher,
    models::{NotificationData, NotificationRequest},
    types::{DispatchError, ValidationError},
};
use tracing::info;

/// Topic all time-of-day tips are sent to.
pub const STAY_HEALTHY_TOPIC: &str = "goal_stay_healthy";

fn data(pairs: &[(&str, &str)]) -> Result<NotificationData, ValidationError> {
    NotificationData::try_from_pairs(pairs.iter().copied())
}

/// Tip for users whose goal is to lose weight.
pub fn daily_weight_loss_tip() -> Result<NotificationRequest, ValidationError> {
    Ok(NotificationRequest::to_topic(
        "goal_lose_weight",
        "Daily Weight Loss Tip",
        "Start your day with a protein-rich breakfast to boost metabolism and reduce cravings \
         throughout the day.",
    )
    .with_data(data(&[
        ("tipId", "4"),
        ("category", "nutrition"),
        ("goal", "lose_weight"),
    ])?))
}

/// Exercise tip for users aged 26 to 35.
pub fn exercise_tip_for_age_group() -> Result<NotificationRequest, ValidationError> {
    Ok(NotificationRequest::to_topic(
        "age_26_35",
        "Fitness Tip for You",
        "Try high-intensity interval training (HIIT) for maximum fat burning in minimum time.",
    )
    .with_data(data(&[
        ("tipId", "2"),
        ("category", "exercise"),
        ("ageGroup", "26_35"),
    ])?))
}

pub fn personalized_tip(
    user_id: &str,
    user_name: &str,
    user_goal: &str,
) -> Result<NotificationRequest, ValidationError> {
    Ok(NotificationRequest::to_user(
        user_id,
        format!("Hello {user_name}!"),
        format!(
            "Here's your personalized tip for {user_goal}: Stay hydrated and drink 8-10 glasses \
             of water daily."
        ),
    )
    .with_data(data(&[
        ("tipId", "1"),
        ("category", "nutrition"),
        ("personalized", "true"),
    ])?))
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    /// Morning is `[6, 12)`, afternoon `[12, 18)` and every other hour is
    /// evening.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            6..=11 => TimeOfDay::Morning,
            12..=17 => TimeOfDay::Afternoon,
            _ => TimeOfDay::Evening,
        }
    }
}

/// The tip to send at the given hour of the day.
pub fn scheduled_tip(hour: u32) -> Result<NotificationRequest, ValidationError> {
    let (title, body, tip_id, category) = match TimeOfDay::from_hour(hour) {
        TimeOfDay::Morning => (
            "Good Morning! 🌅",
            "Start your day with 10 minutes of stretching to boost energy and flexibility.",
            "morning_1",
            "exercise",
        ),
        TimeOfDay::Afternoon => (
            "Afternoon Boost! ☀️",
            "Take a 5-minute walk to refresh your mind and improve productivity.",
            "afternoon_1",
            "mental_health",
        ),
        TimeOfDay::Evening => (
            "Evening Wellness! 🌙",
            "Practice 10 minutes of meditation before bed for better sleep quality.",
            "evening_1",
            "sleep",
        ),
    };
    Ok(NotificationRequest::to_topic(STAY_HEALTHY_TOPIC, title, body)
        .with_data(data(&[("tipId", tip_id), ("category", category)])?))
}

const CATEGORY_TIPS: [(&str, &str, &str, &str); 4] = [
    (
        "nutrition",
        "Nutrition Tip",
        "Include more vegetables in your meals for better health and weight management.",
        "nutrition_1",
    ),
    (
        "exercise",
        "Exercise Tip",
        "Aim for 150 minutes of moderate exercise per week for optimal health.",
        "exercise_1",
    ),
    (
        "mental_health",
        "Mental Health Tip",
        "Practice gratitude daily - write down 3 things you're thankful for.",
        "mental_1",
    ),
    (
        "sleep",
        "Sleep Tip",
        "Create a consistent bedtime routine to improve sleep quality.",
        "sleep_1",
    ),
];

/// One tip per category topic, in a fixed order. The category doubles as
/// the topic name.
pub fn category_tips() -> Result<Vec<NotificationRequest>, ValidationError> {
    CATEGORY_TIPS
        .iter()
        .map(
            |&(category, title, body, tip_id)| -> Result<NotificationRequest, ValidationError> {
                Ok(NotificationRequest::to_topic(category, title, body)
                    .with_data(data(&[("tipId", tip_id), ("category", category)])?))
            },
        )
        .collect()
}

/// The recipient of the personalized tip in the demo sequence.
#[derive(Clone, Debug)]
pub struct DemoUser {
    pub id:   String,
    pub name: String,
    pub goal: String,
}

/// Every tip of the demo sequence, in sending order. `hour` selects the
/// time-of-day tip.
pub fn demo_requests(
    user: &DemoUser,
    hour: u32,
) -> Result<Vec<NotificationRequest>, ValidationError> {
    let mut requests = vec![
        daily_weight_loss_tip()?,
        exercise_tip_for_age_group()?,
        personalized_tip(&user.id, &user.name, &user.goal)?,
        scheduled_tip(hour)?,
    ];
    requests.extend(category_tips()?);
    Ok(requests)
}

/// Send the demo sequence one notification at a time. Stops at the first
/// failure and returns it, the remaining notifications are not sent.
pub async fn run_demo(
    dispatcher: &Dispatcher,
    user: &DemoUser,
    hour: u32,
) -> Result<usize, DispatchError> {
    let requests = demo_requests(user, hour)?;
    let total = requests.len();
    for request in requests {
        dispatcher.send(request).await?;
    }
    info!("All {} notifications sent successfully.", total);
    Ok(total)
}
