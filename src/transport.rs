use std::collections::HashMap;

use crate::domain::message::Message;
use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber::SubscriberId;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::message_manager::{MessageManager, SendOutcome};
use crate::subscriber_manager::SubscriberManager;
use crate::web_service::RemoteError;

/// Per-subscriber result of a dispatch.
#[derive(Debug, Clone, serde::Serialize)]
pub struct DispatchOutcome {
    pub subscriber_id: Option<SubscriberId>,
    pub email: Option<String>,
    #[serde(flatten)]
    pub outcome: SendOutcome,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct DispatchReport {
    pub outcomes: Vec<DispatchOutcome>,
}

impl DispatchReport {
    /// Number of subscribers a send was attempted for, whatever Mindbaz answered.
    pub fn dispatched(&self) -> usize {
        self.outcomes.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &DispatchOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.outcome.is_sent())
    }
}

#[derive(thiserror::Error)]
pub enum TransportError {
    #[error("A valid campaign is required to send a message, got {0:?}.")]
    InvalidCampaign(Option<String>),
    #[error("Some recipients are not Mindbaz subscribers: {}", .0.join(", "))]
    MissingSubscribers(Vec<String>),
    #[error("Failed to talk to Mindbaz.")]
    Remote(#[from] RemoteError),
}

impl std::fmt::Debug for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Remote(err) => write!(f, "{}\nCaused by:\n\t({:?})", self, err),
            _ => write!(f, "{}", self),
        }
    }
}

/// Relays messages to Mindbaz subscribers through a configured campaign.
#[derive(Clone)]
pub struct MindbazTransport {
    subscriber_manager: SubscriberManager,
    message_manager: MessageManager,
    campaigns: HashMap<String, i64>,
    insert_missing_subscribers: bool,
}

impl MindbazTransport {
    pub fn new(
        subscriber_manager: SubscriberManager,
        message_manager: MessageManager,
        campaigns: HashMap<String, i64>,
        insert_missing_subscribers: bool,
    ) -> MindbazTransport {
        MindbazTransport {
            subscriber_manager,
            message_manager,
            campaigns,
            insert_missing_subscribers,
        }
    }

    pub fn subscriber_manager(&self) -> &SubscriberManager {
        &self.subscriber_manager
    }

    /// Returns how many subscribers the message was dispatched to. Rejected sends are counted.
    pub async fn send(&self, message: &Message, campaign: Option<&str>) -> Result<usize, TransportError> {
        self.dispatch(message, campaign)
            .await
            .map(|report| report.dispatched())
    }

    #[tracing::instrument(
        name = "Dispatching a message through Mindbaz",
        skip(self, message),
        fields(recipients = message.to.len(), subject = %message.subject)
    )]
    pub async fn dispatch(
        &self,
        message: &Message,
        campaign: Option<&str>,
    ) -> Result<DispatchReport, TransportError> {
        let id_campaign = campaign
            .and_then(|campaign| self.campaigns.get(campaign))
            .copied()
            .ok_or_else(|| TransportError::InvalidCampaign(campaign.map(str::to_string)))?;

        let mut recipients: Vec<SubscriberEmail> = Vec::with_capacity(message.to.len());
        for recipient in &message.to {
            if !recipients.contains(recipient) {
                recipients.push(recipient.clone());
            }
        }

        let mut subscribers = self.subscriber_manager.find_by_email(&recipients).await?;

        let missing: Vec<SubscriberEmail> = recipients
            .into_iter()
            .filter(|recipient| {
                !subscribers
                    .iter()
                    .any(|subscriber| subscriber.email() == Some(recipient.as_ref()))
            })
            .collect();

        if !missing.is_empty() && !self.insert_missing_subscribers {
            return Err(TransportError::MissingSubscribers(
                missing.iter().map(|email| email.as_ref().to_string()).collect(),
            ));
        }

        for email in missing {
            let subscriber = self
                .subscriber_manager
                .create(NewSubscriber::from(email))
                .await?;
            subscribers.push(subscriber);
        }

        let mut report = DispatchReport::default();
        for subscriber in &subscribers {
            let outcome = self
                .message_manager
                .send(id_campaign, subscriber, message)
                .await;

            report.outcomes.push(DispatchOutcome {
                subscriber_id: subscriber.id,
                email: subscriber.email().map(str::to_string),
                outcome,
            });
        }

        let failures = report.failures().count();
        if failures > 0 {
            tracing::warn!(
                dispatched = report.dispatched(),
                failures,
                "Message dispatched with failures"
            );
        }

        Ok(report)
    }
}
