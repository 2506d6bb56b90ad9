use serde::Deserialize;

use crate::domain::civility::Civility;
use crate::domain::subscriber::Subscriber;
use crate::domain::subscriber_email::SubscriberEmail;

/// Attributes accepted when registering a subscriber in Mindbaz. Only the email is mandatory.
#[derive(Debug, Clone)]
pub struct NewSubscriber {
    pub email: SubscriberEmail,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub civility: Option<Civility>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct NewSubscriberBody {
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub civility: Option<Civility>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
    pub country: Option<String>,
}

impl From<SubscriberEmail> for NewSubscriber {
    fn from(email: SubscriberEmail) -> Self {
        NewSubscriber {
            email,
            first_name: None,
            last_name: None,
            civility: None,
            city: None,
            zip_code: None,
            country: None,
        }
    }
}

impl From<NewSubscriber> for Subscriber {
    fn from(new_subscriber: NewSubscriber) -> Self {
        Subscriber {
            email: Some(new_subscriber.email),
            first_name: new_subscriber.first_name,
            last_name: new_subscriber.last_name,
            civility: new_subscriber.civility,
            city: new_subscriber.city,
            zip_code: new_subscriber.zip_code,
            country: new_subscriber.country,
            ..Default::default()
        }
    }
}

impl TryFrom<NewSubscriberBody> for NewSubscriber {
    type Error = String;

    fn try_from(body: NewSubscriberBody) -> Result<Self, Self::Error> {
        let email = SubscriberEmail::parse(body.email)?;

        Ok(NewSubscriber {
            email,
            first_name: non_blank(body.first_name),
            last_name: non_blank(body.last_name),
            civility: body.civility,
            city: non_blank(body.city),
            zip_code: non_blank(body.zip_code),
            country: non_blank(body.country),
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
