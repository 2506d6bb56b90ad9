use std::sync::Arc;

use crate::domain::message::Message;
use crate::domain::subscriber::Subscriber;
use crate::web_service::{OneshotWebService, SendRequest, SEND_RESPONSE_OK};

/// What happened to a message sent to one subscriber.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    Sent,
    /// Mindbaz answered with a result code other than `OK`.
    Rejected { response: String },
    /// The call could not be made or did not complete.
    Failed { reason: String },
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }
}

/// Sends messages to single subscribers through the Mindbaz oneshot service.
#[derive(Clone)]
pub struct MessageManager {
    web_service: Arc<dyn OneshotWebService>,
}

impl MessageManager {
    pub fn new(web_service: Arc<dyn OneshotWebService>) -> MessageManager {
        MessageManager { web_service }
    }

    /// Never fails: every problem is logged and reported in the returned outcome.
    #[tracing::instrument(
        name = "Sending a message to a subscriber",
        skip(self, subscriber, message),
        fields(subscriber_id = ?subscriber.id, subject = %message.subject)
    )]
    pub async fn send(&self, id_campaign: i64, subscriber: &Subscriber, message: &Message) -> SendOutcome {
        let Some(id) = subscriber.id else {
            tracing::error!(
                email = ?subscriber.email(),
                "Cannot send a message to a subscriber that is not saved in Mindbaz"
            );
            return SendOutcome::Failed {
                reason: "subscriber has no Mindbaz identifier".to_string(),
            };
        };

        let request = SendRequest {
            id_campaign,
            id_subscriber: id,
            html_content: message.html_body().map(str::to_string),
            text_content: message.text_body().map(str::to_string),
            sender: message.sender.clone(),
            subject: message.subject.clone(),
        };

        match self.web_service.send(&request).await {
            Ok(response) if response == SEND_RESPONSE_OK => {
                tracing::info!(id, "Message successfully sent to subscriber");
                SendOutcome::Sent
            }
            Ok(response) => {
                tracing::error!(
                    id,
                    response = %response,
                    "An error occurred while sending the message to subscriber"
                );
                SendOutcome::Rejected { response }
            }
            Err(err) => {
                tracing::error!(
                    id,
                    "An error occurred while sending the message to subscriber: {:?}",
                    err
                );
                SendOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}
