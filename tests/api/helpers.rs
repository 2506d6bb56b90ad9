use reqwest::Response;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockBuilder, MockServer, ResponseTemplate};

use mindbaz_mailer::{
    config::{get_configuration, Settings},
    startup::Application,
};

pub const CAMPAIGN: &str = "newsletter";

pub struct TestApp {
    pub config: Settings,
    pub address: String,
    pub mindbaz_server: MockServer,
}

impl TestApp {
    pub async fn spawn_app() -> TestApp {
        Self::spawn_app_with(|_| {}).await
    }

    pub async fn spawn_app_with(customize: impl FnOnce(&mut Settings)) -> TestApp {
        let mut config = get_configuration().expect("Missing configuration file.");
        let mindbaz_server = MockServer::start().await;

        // We are using port 0 as way to define a different port per each test. Port 0 is a special case that operating systems
        // take into account: when port is 0, the OS will search for the first available port
        config.set_app_port(0);
        config.set_mindbaz_base_url(mindbaz_server.uri());
        customize(&mut config);

        let application = Application::build(config.clone())
            .await
            .expect("Failed to build application.");

        let address = format!("http://127.0.0.1:{}", application.get_port());

        tokio::spawn(application.run_until_stop());

        TestApp {
            address,
            config,
            mindbaz_server,
        }
    }

    pub async fn post_message(&self, body: serde_json::Value) -> Response {
        reqwest::Client::new()
            .post(&format!("{}/messages", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_subscriber(&self, body: serde_json::Value) -> Response {
        reqwest::Client::new()
            .post(&format!("{}/subscribers", self.address))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_subscriber(&self, email: &str) -> Response {
        reqwest::Client::new()
            .get(&format!("{}/subscribers", self.address))
            .query(&[("email", email)])
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_unsubscribe(&self, id: i64) -> Response {
        reqwest::Client::new()
            .post(&format!("{}/subscribers/{}/unsubscribe", self.address, id))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

/// Mock matching one Mindbaz SOAP operation.
pub fn soap_operation(service: &str, operation: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(format!("/{}", service)))
        .and(header(
            "SOAPAction",
            format!("\"http://www.mindbaz.com/webservices/{}\"", operation).as_str(),
        ))
}

pub fn soap_response(operation: &str, result: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(format!(
        r#"<?xml version="1.0" encoding="utf-8"?><soap:Envelope xmlns:soap="http://schemas.xmlsoap.org/soap/envelope/"><soap:Body><{operation}Response xmlns="http://www.mindbaz.com/webservices/">{result}</{operation}Response></soap:Body></soap:Envelope>"#
    ))
}

/// `GetSubscribersByEmail` response listing the given `(id, email)` pairs.
pub fn subscribers_response(subscribers: &[(i64, &str)]) -> ResponseTemplate {
    let subscribers: String = subscribers
        .iter()
        .map(|(id, email)| {
            format!(
                "<Subscriber><idSubscriber>{id}</idSubscriber><fld><SubscriberFieldData><idField>0</idField><value>{id}</value></SubscriberFieldData><SubscriberFieldData><idField>1</idField><value>{email}</value></SubscriberFieldData></fld></Subscriber>"
            )
        })
        .collect();

    soap_response(
        "GetSubscribersByEmail",
        &format!("<GetSubscribersByEmailResult>{subscribers}</GetSubscribersByEmailResult>"),
    )
}

pub fn message_body(to: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "campaign": CAMPAIGN,
        "sender": "noreply@example.com",
        "to": to,
        "subject": "Bar",
        "content_type": "text/html",
        "body": "<p>Foo</p>",
        "children": [
            { "content_type": "text/plain", "body": "Foo" }
        ]
    })
}
