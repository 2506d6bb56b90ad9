//! Conversion between [`Subscriber`] and the field list Mindbaz uses to transmit subscribers.
//!
//! Mindbaz does not expose named attributes: a subscriber is a list of `(idField, value)`
//! pairs. [`FIELDS`] and [`SubscriberField::id`] form the table both directions consult.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::domain::civility::Civility;
use crate::domain::subscriber::{Subscriber, SubscriberId};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::domain::subscriber_status::SubscriberStatus;
use crate::web_service::{FieldData, RawSubscriber, UNSAVED_SUBSCRIBER_ID};

pub const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const PARSE_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Mindbaz,
}

impl Format {
    pub fn parse(name: &str) -> Option<Format> {
        match name {
            "mindbaz" => Some(Format::Mindbaz),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Mindbaz => "mindbaz",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriberField {
    Id,
    Email,
    FirstSubscriptionDate,
    LastSubscriptionDate,
    UnsubscriptionDate,
    Status,
    Civility,
    LastName,
    FirstName,
    City,
    ZipCode,
    Country,
}

/// Subscriber attributes in encoding order.
pub const FIELDS: [SubscriberField; 12] = [
    SubscriberField::Id,
    SubscriberField::Email,
    SubscriberField::FirstSubscriptionDate,
    SubscriberField::LastSubscriptionDate,
    SubscriberField::UnsubscriptionDate,
    SubscriberField::Status,
    SubscriberField::Civility,
    SubscriberField::LastName,
    SubscriberField::FirstName,
    SubscriberField::City,
    SubscriberField::ZipCode,
    SubscriberField::Country,
];

impl SubscriberField {
    /// Mindbaz field id.
    pub fn id(&self) -> i32 {
        match self {
            SubscriberField::Id => 0,
            SubscriberField::Email => 1,
            SubscriberField::FirstSubscriptionDate => 2,
            SubscriberField::LastSubscriptionDate => 3,
            SubscriberField::UnsubscriptionDate => 4,
            SubscriberField::Status => 7,
            SubscriberField::Civility => 13,
            SubscriberField::LastName => 14,
            SubscriberField::FirstName => 15,
            SubscriberField::City => 17,
            SubscriberField::ZipCode => 18,
            SubscriberField::Country => 19,
        }
    }

    pub fn from_id(id: i32) -> Option<SubscriberField> {
        FIELDS.into_iter().find(|field| field.id() == id)
    }
}

#[derive(thiserror::Error, Debug)]
#[error("Invalid value {value:?} for Mindbaz field {field:?}: {reason}")]
pub struct CodecError {
    pub field: SubscriberField,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SubscriberEncoder;

impl SubscriberEncoder {
    pub const FORMAT: Format = Format::Mindbaz;

    pub fn supports_encoding(&self, format: &str) -> bool {
        Format::parse(format) == Some(Self::FORMAT)
    }

    pub fn supports_decoding(&self, format: &str) -> bool {
        Format::parse(format) == Some(Self::FORMAT)
    }

    pub fn encode(&self, subscriber: &Subscriber) -> RawSubscriber {
        let fields = FIELDS
            .iter()
            .filter_map(|field| {
                encode_value(subscriber, *field).map(|value| FieldData::new(field.id(), value))
            })
            .collect();

        RawSubscriber {
            id_subscriber: subscriber.id.unwrap_or(UNSAVED_SUBSCRIBER_ID),
            fields,
        }
    }

    pub fn decode(&self, raw: &RawSubscriber) -> Result<Subscriber, CodecError> {
        let mut subscriber = Subscriber::default();

        for field_data in &raw.fields {
            let (Some(field), Some(value)) =
                (SubscriberField::from_id(field_data.id_field), &field_data.value)
            else {
                continue;
            };

            decode_value(&mut subscriber, field, value)?;
        }

        if subscriber.id.is_none() && raw.id_subscriber >= 0 {
            subscriber.id = Some(raw.id_subscriber);
        }

        Ok(subscriber)
    }
}

fn encode_value(subscriber: &Subscriber, field: SubscriberField) -> Option<String> {
    match field {
        SubscriberField::Id => subscriber.id.map(|id| id.to_string()),
        SubscriberField::Email => subscriber.email().map(str::to_string),
        SubscriberField::FirstSubscriptionDate => subscriber.first_subscription_date.map(format_date),
        SubscriberField::LastSubscriptionDate => subscriber.last_subscription_date.map(format_date),
        SubscriberField::UnsubscriptionDate => subscriber.unsubscription_date.map(format_date),
        SubscriberField::Status => subscriber.status.map(|status| status.code().to_string()),
        SubscriberField::Civility => subscriber.civility.map(|civility| civility.code().to_string()),
        SubscriberField::LastName => subscriber.last_name.clone(),
        SubscriberField::FirstName => subscriber.first_name.clone(),
        SubscriberField::City => subscriber.city.clone(),
        SubscriberField::ZipCode => subscriber.zip_code.clone(),
        SubscriberField::Country => subscriber.country.clone(),
    }
}

fn decode_value(
    subscriber: &mut Subscriber,
    field: SubscriberField,
    value: &str,
) -> Result<(), CodecError> {
    let invalid = |reason: String| CodecError {
        field,
        value: value.to_string(),
        reason,
    };

    match field {
        SubscriberField::Id => {
            subscriber.id = Some(
                value
                    .trim()
                    .parse::<SubscriberId>()
                    .map_err(|e| invalid(e.to_string()))?,
            )
        }
        SubscriberField::Email => {
            subscriber.email = Some(SubscriberEmail::parse(value.to_string()).map_err(invalid)?)
        }
        SubscriberField::FirstSubscriptionDate => {
            subscriber.first_subscription_date = Some(parse_date(value).map_err(invalid)?)
        }
        SubscriberField::LastSubscriptionDate => {
            subscriber.last_subscription_date = Some(parse_date(value).map_err(invalid)?)
        }
        SubscriberField::UnsubscriptionDate => {
            subscriber.unsubscription_date = Some(parse_date(value).map_err(invalid)?)
        }
        SubscriberField::Status => {
            subscriber.status = Some(
                parse_code(value)
                    .and_then(SubscriberStatus::from_code)
                    .map_err(invalid)?,
            )
        }
        SubscriberField::Civility => {
            subscriber.civility =
                Some(parse_code(value).and_then(Civility::from_code).map_err(invalid)?)
        }
        SubscriberField::LastName => subscriber.last_name = Some(value.to_string()),
        SubscriberField::FirstName => subscriber.first_name = Some(value.to_string()),
        SubscriberField::City => subscriber.city = Some(value.to_string()),
        SubscriberField::ZipCode => subscriber.zip_code = Some(value.to_string()),
        SubscriberField::Country => subscriber.country = Some(value.to_string()),
    }

    Ok(())
}

fn format_date(date: DateTime<Utc>) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Reads [`DATE_FORMAT`], optionally with fractional seconds, or an RFC 3339 timestamp.
fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();

    NaiveDateTime::parse_from_str(value, PARSE_DATE_FORMAT)
        .map(|date| Utc.from_utc_datetime(&date))
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|date| date.with_timezone(&Utc)))
        .map_err(|e| e.to_string())
}

fn parse_code(value: &str) -> Result<i32, String> {
    value.trim().parse::<i32>().map_err(|e| e.to_string())
}
