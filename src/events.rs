use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One chat message, optionally carrying a channel point reward id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatEvent {
    pub channel: String,
    pub user: String,
    pub message: String,
    #[serde(default)]
    pub reward_id: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ChatEvent {
    pub fn new(channel: &str, user: &str, message: &str) -> Self {
        Self {
            channel: channel.to_string(),
            user: user.to_string(),
            message: message.to_string(),
            reward_id: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_reward_id(mut self, reward_id: &str) -> Self {
        self.reward_id = Some(reward_id.to_string()).filter(|id| !id.is_empty());
        self
    }
}
