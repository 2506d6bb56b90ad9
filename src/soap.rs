//! SOAP 1.1 envelopes for the Mindbaz web services.

use quick_xml::escape::escape;
use quick_xml::events::Event;
use quick_xml::Reader;
use secrecy::{ExposeSecret, Secret};

use crate::web_service::{FieldData, RawSubscriber, RemoteError};

pub const NAMESPACE: &str = "http://www.mindbaz.com/webservices/";

const UNKNOWN_FAULT: &str = "Unknown SOAP fault";

/// Credentials sent in the `MindbazAuthHeader` of every request.
#[derive(Clone)]
pub struct Credentials {
    pub id_site: i64,
    pub login: String,
    pub password: Secret<String>,
}

/// Value of the `SOAPAction` header for an operation.
pub fn soap_action(operation: &str) -> String {
    format!("\"{}{}\"", NAMESPACE, operation)
}

/// Wraps an operation body in an envelope carrying the authentication header.
pub fn envelope(credentials: &Credentials, operation: &str, body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <soap:Header>
    <MindbazAuthHeader xmlns="{ns}">
      <IdSite>{id_site}</IdSite>
      <Login>{login}</Login>
      <Password>{password}</Password>
    </MindbazAuthHeader>
  </soap:Header>
  <soap:Body>
    <{operation} xmlns="{ns}">{body}</{operation}>
  </soap:Body>
</soap:Envelope>"#,
        ns = NAMESPACE,
        id_site = credentials.id_site,
        login = escape(credentials.login.as_str()),
        password = escape(credentials.password.expose_secret().as_str()),
        operation = operation,
        body = body,
    )
}

/// `<name>value</name>`, or nothing when the value is absent.
pub fn element(name: &str, value: Option<&str>) -> String {
    match value {
        Some(value) => format!("<{name}>{}</{name}>", escape(value)),
        None => String::new(),
    }
}

pub fn array_of_string(name: &str, values: &[String]) -> String {
    let items: String = values
        .iter()
        .map(|value| element("string", Some(value)))
        .collect();

    format!("<{name}>{items}</{name}>")
}

pub fn array_of_int(name: &str, values: &[i32]) -> String {
    let items: String = values
        .iter()
        .map(|value| format!("<int>{value}</int>"))
        .collect();

    format!("<{name}>{items}</{name}>")
}

pub fn subscriber(name: &str, subscriber: &RawSubscriber) -> String {
    let fields: String = subscriber
        .fields
        .iter()
        .map(|field| {
            format!(
                "<SubscriberFieldData><idField>{}</idField>{}</SubscriberFieldData>",
                field.id_field,
                element("value", field.value.as_deref())
            )
        })
        .collect();

    format!(
        "<{name}><idSubscriber>{}</idSubscriber><fld>{fields}</fld></{name}>",
        subscriber.id_subscriber
    )
}

/// Text of the first element with the given local name, e.g. `SendResult`.
pub fn parse_result(xml: &str, result: &str) -> Result<Option<String>, RemoteError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut inside = false;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) if e.local_name().as_ref() == result.as_bytes() => inside = true,
            Event::Empty(e) if e.local_name().as_ref() == result.as_bytes() => return Ok(None),
            Event::Text(text) if inside => {
                return Ok(Some(text.unescape().map_err(malformed)?.into_owned()))
            }
            Event::End(e) if e.local_name().as_ref() == result.as_bytes() => return Ok(None),
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

/// Subscribers of a `GetSubscribersByEmail` response, in document order.
/// Values are kept verbatim, surrounding whitespace included.
pub fn parse_subscribers(xml: &str) -> Result<Vec<RawSubscriber>, RemoteError> {
    let mut reader = Reader::from_str(xml);

    let mut subscribers = Vec::new();
    let mut current: Option<RawSubscriber> = None;
    let mut field: Option<FieldData> = None;
    let mut tag: Option<Vec<u8>> = None;

    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                let name = e.local_name().as_ref().to_vec();
                match name.as_slice() {
                    b"Subscriber" => current = Some(RawSubscriber::default()),
                    b"SubscriberFieldData" => {
                        field = Some(FieldData {
                            id_field: -1,
                            value: None,
                        })
                    }
                    // `<value></value>` is an empty string, `<value />` no value at all
                    b"value" => {
                        if let Some(field) = field.as_mut() {
                            field.value = Some(String::new());
                        }
                    }
                    _ => {}
                }
                tag = Some(name);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(malformed)?;
                match (tag.as_deref(), field.as_mut(), current.as_mut()) {
                    (Some(b"idField"), Some(field), _) => field.id_field = parse_number(&text)?,
                    (Some(b"value"), Some(field), _) => {
                        field.value.get_or_insert_with(String::new).push_str(&text)
                    }
                    (Some(b"idSubscriber"), None, Some(subscriber)) => {
                        subscriber.id_subscriber = parse_number(&text)?
                    }
                    _ => {}
                }
            }
            Event::End(e) => {
                match e.local_name().as_ref() {
                    b"SubscriberFieldData" => {
                        if let (Some(field), Some(subscriber)) = (field.take(), current.as_mut()) {
                            subscriber.fields.push(field);
                        }
                    }
                    b"Subscriber" => {
                        if let Some(subscriber) = current.take() {
                            subscribers.push(subscriber);
                        }
                    }
                    _ => {}
                }
                tag = None;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(subscribers)
}

/// Message of a SOAP fault, if the document is one: a `Fault` element directly under the body.
pub fn parse_fault(xml: &str) -> Option<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut depth = 0usize;
    let mut body_depth: Option<usize> = None;
    let mut in_fault = false;
    let mut in_faultstring = false;
    let mut message: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                match e.local_name().as_ref() {
                    b"Body" if body_depth.is_none() => body_depth = Some(depth),
                    b"Fault" if body_depth.map(|body| body + 1) == Some(depth) => in_fault = true,
                    b"faultstring" if in_fault => in_faultstring = true,
                    _ => {}
                }
            }
            Ok(Event::Empty(e))
                if e.local_name().as_ref() == b"Fault"
                    && body_depth.map(|body| body + 1) == Some(depth + 1) =>
            {
                return Some(UNKNOWN_FAULT.to_string())
            }
            Ok(Event::Text(text)) if in_faultstring => {
                message = text.unescape().ok().map(|text| text.into_owned());
            }
            Ok(Event::End(e)) => {
                match e.local_name().as_ref() {
                    b"faultstring" => in_faultstring = false,
                    b"Fault" if in_fault => {
                        return Some(message.unwrap_or_else(|| UNKNOWN_FAULT.to_string()))
                    }
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
    }
}

fn parse_number<T: std::str::FromStr>(text: &str) -> Result<T, RemoteError>
where
    T::Err: std::fmt::Display,
{
    text.trim()
        .parse::<T>()
        .map_err(|e| RemoteError::MalformedResponse(format!("{}: {:?}", e, text)))
}

fn malformed(e: impl std::fmt::Display) -> RemoteError {
    RemoteError::MalformedResponse(e.to_string())
}
