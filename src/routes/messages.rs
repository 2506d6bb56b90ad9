use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};

use crate::domain::message::{Message, MessageBody};
use crate::transport::{DispatchOutcome, MindbazTransport, TransportError};

#[derive(serde::Serialize)]
struct DispatchResponse<'a> {
    dispatched: usize,
    failed: Vec<&'a DispatchOutcome>,
}

#[tracing::instrument(
    name = "Relaying a message to Mindbaz subscribers",
    skip(body, transport),
    fields(
        campaign = ?body.campaign,
        subject = %body.subject
    )
)]
pub async fn send_message(
    body: web::Json<MessageBody>,
    transport: web::Data<MindbazTransport>,
) -> Result<HttpResponse, SendMessageError> {
    let body = body.into_inner();
    let campaign = body.campaign.clone();
    let message: Message = body.try_into().map_err(SendMessageError::ValidationError)?;

    let report = transport.dispatch(&message, campaign.as_deref()).await?;

    Ok(HttpResponse::Ok().json(DispatchResponse {
        dispatched: report.dispatched(),
        failed: report.failures().collect(),
    }))
}

#[derive(thiserror::Error)]
pub enum SendMessageError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    TransportError(#[from] TransportError),
}

impl std::fmt::Debug for SendMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendMessageError::TransportError(err) => write!(f, "Caused by:\n\t({:?})", err),
            _ => write!(f, "Caused by:\n\t({})", self),
        }
    }
}

impl ResponseError for SendMessageError {
    fn status_code(&self) -> StatusCode {
        match self {
            SendMessageError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SendMessageError::TransportError(TransportError::InvalidCampaign(_)) => {
                StatusCode::BAD_REQUEST
            }
            SendMessageError::TransportError(TransportError::MissingSubscribers(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            SendMessageError::TransportError(TransportError::Remote(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            SendMessageError::TransportError(TransportError::MissingSubscribers(missing)) => {
                HttpResponse::build(self.status_code())
                    .json(serde_json::json!({ "missing": missing }))
            }
            _ => HttpResponse::new(self.status_code()),
        }
    }
}
