use actix_web::{HttpResponse, Responder};

/// Endpoint used by clients to know if the relay is up. It does not call Mindbaz.
#[tracing::instrument(name = "Relay health check handler")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}
