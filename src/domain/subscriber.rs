use chrono::{DateTime, Utc};

use crate::domain::civility::Civility;
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_status::SubscriberStatus;

/// Identifier assigned by Mindbaz when a subscriber is inserted.
pub type SubscriberId = i64;

/// Typed view of a Mindbaz subscriber. Every attribute is optional because the
/// remote field list only carries what was requested or stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Subscriber {
    pub id: Option<SubscriberId>,
    pub email: Option<SubscriberEmail>,
    pub first_subscription_date: Option<DateTime<Utc>>,
    pub last_subscription_date: Option<DateTime<Utc>>,
    pub unsubscription_date: Option<DateTime<Utc>>,
    pub status: Option<SubscriberStatus>,
    pub civility: Option<Civility>,
    pub last_name: Option<String>,
    pub first_name: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl Subscriber {
    pub fn new(email: SubscriberEmail) -> Subscriber {
        Subscriber {
            email: Some(email),
            ..Default::default()
        }
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_ref().map(AsRef::as_ref)
    }
}
