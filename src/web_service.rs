use async_trait::async_trait;

use crate::domain::subscriber::SubscriberId;
use crate::domain::subscriber_status::SubscriberStatus;
use crate::encoder::CodecError;

/// Identifier Mindbaz gives to a subscriber that has not been inserted yet.
pub const UNSAVED_SUBSCRIBER_ID: SubscriberId = -1;

/// Result code returned by the oneshot service when a message was accepted.
pub const SEND_RESPONSE_OK: &str = "OK";
/// Result code returned by the oneshot service when a message was refused.
pub const SEND_RESPONSE_NOK: &str = "NOK";

/// A subscriber as Mindbaz transmits it: an identifier and a generic field list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSubscriber {
    pub id_subscriber: SubscriberId,
    pub fields: Vec<FieldData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldData {
    pub id_field: i32,
    pub value: Option<String>,
}

impl Default for RawSubscriber {
    fn default() -> Self {
        RawSubscriber {
            id_subscriber: UNSAVED_SUBSCRIBER_ID,
            fields: Vec::new(),
        }
    }
}

impl FieldData {
    pub fn new(id_field: i32, value: impl Into<String>) -> FieldData {
        FieldData {
            id_field,
            value: Some(value.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsubscribeRequest {
    pub id_subscriber: SubscriberId,
    pub id_send: Option<i64>,
    pub id_campaign: Option<i64>,
}

/// Payload of a oneshot send: one campaign rendered for one subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub id_campaign: i64,
    pub id_subscriber: SubscriberId,
    pub html_content: Option<String>,
    pub text_content: Option<String>,
    pub sender: String,
    pub subject: String,
}

#[derive(thiserror::Error)]
pub enum RemoteError {
    #[error("Failed to reach the Mindbaz web service.")]
    Http(#[from] reqwest::Error),
    #[error("Mindbaz web service answered with status {0}.")]
    Status(u16),
    #[error("Mindbaz web service returned a fault: {0}")]
    Fault(String),
    #[error("Mindbaz web service returned a malformed response: {0}")]
    MalformedResponse(String),
    #[error("Failed to decode a Mindbaz subscriber.")]
    Codec(#[from] CodecError),
}

impl std::fmt::Debug for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match std::error::Error::source(self) {
            Some(source) => write!(f, "{}\nCaused by:\n\t({})", self, source),
            None => write!(f, "{}", self),
        }
    }
}

/// Mindbaz subscriber web service.
#[async_trait]
pub trait SubscriberWebService: Send + Sync {
    async fn get_subscribers_by_email(
        &self,
        emails: &[String],
        statuses: &[SubscriberStatus],
    ) -> Result<Vec<RawSubscriber>, RemoteError>;

    /// Returns the identifier Mindbaz assigned to the new subscriber.
    async fn insert_subscriber(
        &self,
        subscriber: &RawSubscriber,
        detect_duplicates: bool,
    ) -> Result<SubscriberId, RemoteError>;

    async fn unsubscribe(&self, request: &UnsubscribeRequest) -> Result<bool, RemoteError>;
}

/// Mindbaz oneshot web service, sending a campaign to a single subscriber.
#[async_trait]
pub trait OneshotWebService: Send + Sync {
    /// Returns the raw result code, compared against [`SEND_RESPONSE_OK`].
    async fn send(&self, request: &SendRequest) -> Result<String, RemoteError>;
}
