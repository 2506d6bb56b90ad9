use async_trait::async_trait;
use reqwest::Client;
use std::time;

use crate::domain::subscriber::SubscriberId;
use crate::domain::subscriber_status::SubscriberStatus;
use crate::soap::{self, Credentials};
use crate::web_service::{
    OneshotWebService, RawSubscriber, RemoteError, SendRequest, SubscriberWebService,
    UnsubscribeRequest,
};

const REQUEST_TIMEOUT: time::Duration = time::Duration::from_secs(10);

const SUBSCRIBER_SERVICE: &str = "subscriber.asmx";
const ONESHOT_SERVICE: &str = "oneshot.asmx";

/// SOAP client for the Mindbaz subscriber and oneshot web services.
pub struct MindbazClient {
    http_client: Client,
    base_url: String,
    credentials: Credentials,
}

impl MindbazClient {
    pub fn new(
        base_url: String,
        credentials: Credentials,
        timeout: Option<time::Duration>,
    ) -> Result<MindbazClient, reqwest::Error> {
        let http_client = Client::builder()
            .timeout(timeout.unwrap_or(REQUEST_TIMEOUT))
            .build()?;

        Ok(MindbazClient {
            http_client,
            base_url,
            credentials,
        })
    }

    async fn call(&self, service: &str, operation: &str, body: String) -> Result<String, RemoteError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), service);
        let envelope = soap::envelope(&self.credentials, operation, &body);

        let response = self
            .http_client
            .post(&url)
            .header("Content-Type", "text/xml; charset=utf-8")
            .header("SOAPAction", soap::soap_action(operation))
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        // SOAP 1.1 reports faults with a 500 status, so look for one before the status itself
        if let Some(fault) = soap::parse_fault(&text) {
            return Err(RemoteError::Fault(fault));
        }
        if !status.is_success() {
            return Err(RemoteError::Status(status.as_u16()));
        }

        Ok(text)
    }

    async fn call_for_result(
        &self,
        service: &str,
        operation: &str,
        body: String,
    ) -> Result<String, RemoteError> {
        let response = self.call(service, operation, body).await?;
        let result = format!("{}Result", operation);

        soap::parse_result(&response, &result)?
            .ok_or_else(|| RemoteError::MalformedResponse(format!("missing {}", result)))
    }
}

#[async_trait]
impl SubscriberWebService for MindbazClient {
    #[tracing::instrument(name = "Looking up Mindbaz subscribers by email", skip(self))]
    async fn get_subscribers_by_email(
        &self,
        emails: &[String],
        statuses: &[SubscriberStatus],
    ) -> Result<Vec<RawSubscriber>, RemoteError> {
        let codes: Vec<i32> = statuses.iter().map(SubscriberStatus::code).collect();
        let body = format!(
            "{}{}",
            soap::array_of_string("emails", emails),
            soap::array_of_int("statuses", &codes)
        );

        let response = self
            .call(SUBSCRIBER_SERVICE, "GetSubscribersByEmail", body)
            .await?;

        soap::parse_subscribers(&response)
    }

    #[tracing::instrument(
        name = "Inserting a Mindbaz subscriber",
        skip(self, subscriber),
        fields(fields = subscriber.fields.len())
    )]
    async fn insert_subscriber(
        &self,
        subscriber: &RawSubscriber,
        detect_duplicates: bool,
    ) -> Result<SubscriberId, RemoteError> {
        let body = format!(
            "{}<detectDuplicates>{}</detectDuplicates>",
            soap::subscriber("subscriber", subscriber),
            detect_duplicates
        );

        let result = self
            .call_for_result(SUBSCRIBER_SERVICE, "InsertSubscriber", body)
            .await?;

        result
            .trim()
            .parse::<SubscriberId>()
            .map_err(|e| RemoteError::MalformedResponse(format!("{}: {:?}", e, result)))
    }

    #[tracing::instrument(name = "Unsubscribing a Mindbaz subscriber", skip(self))]
    async fn unsubscribe(&self, request: &UnsubscribeRequest) -> Result<bool, RemoteError> {
        let id_send = request.id_send.map(|id| id.to_string());
        let id_campaign = request.id_campaign.map(|id| id.to_string());
        let body = format!(
            "<idSubscriber>{}</idSubscriber>{}{}",
            request.id_subscriber,
            soap::element("idSend", id_send.as_deref()),
            soap::element("idCampaign", id_campaign.as_deref())
        );

        let result = self
            .call_for_result(SUBSCRIBER_SERVICE, "Unsubscribe", body)
            .await?;

        Ok(result.trim().eq_ignore_ascii_case("true"))
    }
}

#[async_trait]
impl OneshotWebService for MindbazClient {
    #[tracing::instrument(
        name = "Sending a Mindbaz oneshot message",
        skip(self, request),
        fields(
            id_campaign = %request.id_campaign,
            id_subscriber = %request.id_subscriber
        )
    )]
    async fn send(&self, request: &SendRequest) -> Result<String, RemoteError> {
        let body = format!(
            "<idCampaign>{}</idCampaign><idSubscriber>{}</idSubscriber>{}{}{}{}",
            request.id_campaign,
            request.id_subscriber,
            soap::element("htmlContent", request.html_content.as_deref()),
            soap::element("textContent", request.text_content.as_deref()),
            soap::element("sender", Some(request.sender.as_str())),
            soap::element("subject", Some(request.subject.as_str()))
        );

        let result = self.call_for_result(ONESHOT_SERVICE, "Send", body).await?;

        Ok(result.trim().to_string())
    }
}
