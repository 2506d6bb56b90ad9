#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriberStatus {
    Subscribed,
    Unsubscribed,
}

impl SubscriberStatus {
    /// Both statuses, used as lookup filter when any known subscriber must match.
    pub const ALL: [SubscriberStatus; 2] = [SubscriberStatus::Subscribed, SubscriberStatus::Unsubscribed];

    /// Numeric code used by Mindbaz.
    pub fn code(&self) -> i32 {
        match self {
            SubscriberStatus::Subscribed => 0,
            SubscriberStatus::Unsubscribed => 1,
        }
    }

    pub fn from_code(code: i32) -> Result<SubscriberStatus, String> {
        match code {
            0 => Ok(SubscriberStatus::Subscribed),
            1 => Ok(SubscriberStatus::Unsubscribed),
            _ => Err(format!("{} is not a valid subscriber status", code)),
        }
    }
}
