use std::sync::Arc;

use crate::domain::new_subscriber::NewSubscriber;
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_status::SubscriberStatus;
use crate::encoder::SubscriberEncoder;
use crate::web_service::{RemoteError, SubscriberWebService, UnsubscribeRequest};

/// Finds, registers and unsubscribes Mindbaz subscribers.
#[derive(Clone)]
pub struct SubscriberManager {
    web_service: Arc<dyn SubscriberWebService>,
    encoder: SubscriberEncoder,
}

impl SubscriberManager {
    pub fn new(web_service: Arc<dyn SubscriberWebService>) -> SubscriberManager {
        SubscriberManager {
            web_service,
            encoder: SubscriberEncoder,
        }
    }

    /// Subscribers matching any of the addresses, whatever their status, in the order Mindbaz
    /// returns them.
    #[tracing::instrument(name = "Finding subscribers by email", skip(self, emails))]
    pub async fn find_by_email(
        &self,
        emails: &[SubscriberEmail],
    ) -> Result<Vec<Subscriber>, RemoteError> {
        let mut addresses: Vec<String> = Vec::with_capacity(emails.len());
        for email in emails {
            let address = email.as_ref().to_lowercase();
            if !addresses.contains(&address) {
                addresses.push(address);
            }
        }

        let raw_subscribers = self
            .web_service
            .get_subscribers_by_email(&addresses, &SubscriberStatus::ALL)
            .await?;

        raw_subscribers
            .iter()
            .map(|raw| self.encoder.decode(raw).map_err(RemoteError::from))
            .collect()
    }

    pub async fn find_one_by_email(
        &self,
        email: &SubscriberEmail,
    ) -> Result<Option<Subscriber>, RemoteError> {
        let subscribers = self.find_by_email(std::slice::from_ref(email)).await?;

        Ok(subscribers.into_iter().next())
    }

    /// Inserts a subscriber in Mindbaz, asking it to detect duplicates, and returns it with the
    /// identifier Mindbaz assigned.
    #[tracing::instrument(
        name = "Creating a Mindbaz subscriber",
        skip(self, new_subscriber),
        fields(subscriber_email = %new_subscriber.email)
    )]
    pub async fn create(&self, new_subscriber: NewSubscriber) -> Result<Subscriber, RemoteError> {
        let mut subscriber = Subscriber::from(new_subscriber);
        let raw_subscriber = self.encoder.encode(&subscriber);

        let id = self
            .web_service
            .insert_subscriber(&raw_subscriber, true)
            .await?;
        subscriber.id = Some(id);

        tracing::info!(id, "New subscriber inserted in Mindbaz");

        Ok(subscriber)
    }

    /// Returns whether Mindbaz accepted the unsubscription. A refusal is logged, not raised.
    #[tracing::instrument(name = "Unsubscribing a subscriber", skip(self, subscriber))]
    pub async fn unsubscribe(&self, subscriber: &Subscriber) -> Result<bool, RemoteError> {
        let Some(id) = subscriber.id else {
            tracing::error!(
                email = ?subscriber.email(),
                "Cannot unsubscribe a subscriber that is not saved in Mindbaz"
            );
            return Ok(false);
        };

        let request = UnsubscribeRequest {
            id_subscriber: id,
            id_send: None,
            id_campaign: None,
        };
        let response = self.web_service.unsubscribe(&request).await?;

        if response {
            tracing::info!(id, "Subscriber successfully unsubscribed");
        } else {
            tracing::error!(id, response, "An error occurred while unsubscribing subscriber");
        }

        Ok(response)
    }
}
