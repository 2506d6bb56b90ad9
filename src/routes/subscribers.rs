use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use serde::Deserialize;

use crate::domain::new_subscriber::{NewSubscriber, NewSubscriberBody};
use crate::domain::subscriber::{Subscriber, SubscriberId};
use crate::domain::subscriber_email::SubscriberEmail;
use crate::transport::MindbazTransport;
use crate::web_service::RemoteError;

#[derive(Deserialize, Debug)]
pub struct Parameters {
    pub email: String,
}

#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(body, transport),
    fields(subscriber_email = %body.email)
)]
pub async fn create_subscriber(
    body: web::Json<NewSubscriberBody>,
    transport: web::Data<MindbazTransport>,
) -> Result<HttpResponse, SubscriberError> {
    let new_subscriber: NewSubscriber = body
        .into_inner()
        .try_into()
        .map_err(SubscriberError::ValidationError)?;

    let subscriber = transport
        .subscriber_manager()
        .create(new_subscriber)
        .await?;

    Ok(HttpResponse::Created().json(subscriber))
}

#[tracing::instrument(
    name = "Finding a subscriber handler",
    skip(transport),
    fields(subscriber_email = %parameters.email)
)]
pub async fn find_subscriber(
    parameters: web::Query<Parameters>,
    transport: web::Data<MindbazTransport>,
) -> Result<HttpResponse, SubscriberError> {
    let email = SubscriberEmail::parse(parameters.into_inner().email)
        .map_err(SubscriberError::ValidationError)?;

    match transport.subscriber_manager().find_one_by_email(&email).await? {
        Some(subscriber) => Ok(HttpResponse::Ok().json(subscriber)),
        None => Err(SubscriberError::NotFound(email.as_ref().to_string())),
    }
}

#[tracing::instrument(name = "Unsubscribing a subscriber handler", skip(transport))]
pub async fn unsubscribe_subscriber(
    path: web::Path<SubscriberId>,
    transport: web::Data<MindbazTransport>,
) -> Result<HttpResponse, SubscriberError> {
    let subscriber = Subscriber {
        id: Some(path.into_inner()),
        ..Default::default()
    };

    let unsubscribed = transport.subscriber_manager().unsubscribe(&subscriber).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "unsubscribed": unsubscribed })))
}

#[derive(thiserror::Error)]
pub enum SubscriberError {
    #[error("{0}")]
    ValidationError(String),
    #[error("No Mindbaz subscriber matches {0}.")]
    NotFound(String),
    #[error("Failed to talk to Mindbaz.")]
    RemoteError(#[from] RemoteError),
}

impl std::fmt::Debug for SubscriberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriberError::RemoteError(err) => write!(f, "Caused by:\n\t({:?})", err),
            _ => write!(f, "Caused by:\n\t({})", self),
        }
    }
}

impl ResponseError for SubscriberError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscriberError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscriberError::NotFound(_) => StatusCode::NOT_FOUND,
            SubscriberError::RemoteError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
