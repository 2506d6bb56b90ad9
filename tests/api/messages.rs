use wiremock::matchers::{any, body_string_contains};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{message_body, soap_operation, soap_response, subscribers_response, TestApp};

#[tokio::test]
async fn messages_are_sent_to_known_subscribers() {
    let test_app = TestApp::spawn_app().await;

    soap_operation("subscriber.asmx", "GetSubscribersByEmail")
        .and(body_string_contains("<string>foo@example.com</string>"))
        .respond_with(subscribers_response(&[(456, "foo@example.com")]))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;
    soap_operation("oneshot.asmx", "Send")
        .and(body_string_contains("<idCampaign>123</idCampaign><idSubscriber>456</idSubscriber><htmlContent>&lt;p&gt;Foo&lt;/p&gt;</htmlContent><textContent>Foo</textContent>"))
        .respond_with(soap_response("Send", "<SendResult>OK</SendResult>"))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;

    let response = test_app.post_message(message_body(&["Foo@Example.com"])).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["dispatched"], 1);
    assert_eq!(body["failed"], serde_json::json!([]));
}

#[tokio::test]
async fn messages_with_an_unknown_campaign_are_rejected_with_400() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.mindbaz_server)
        .await;

    let mut body = message_body(&["foo@example.com"]);
    body["campaign"] = serde_json::json!("unknown");
    let response = test_app.post_message(body).await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn messages_to_missing_subscribers_are_rejected_with_422() {
    let test_app = TestApp::spawn_app().await;

    soap_operation("subscriber.asmx", "GetSubscribersByEmail")
        .respond_with(subscribers_response(&[(456, "foo@example.com")]))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;
    soap_operation("oneshot.asmx", "Send")
        .respond_with(soap_response("Send", "<SendResult>OK</SendResult>"))
        .expect(0)
        .mount(&test_app.mindbaz_server)
        .await;

    let response = test_app
        .post_message(message_body(&["foo@example.com", "bar@example.com"]))
        .await;

    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["missing"], serde_json::json!(["bar@example.com"]));
}

#[tokio::test]
async fn missing_subscribers_are_inserted_when_configured() {
    let test_app = TestApp::spawn_app_with(|config| config.set_insert_missing_subscribers(true)).await;

    soap_operation("subscriber.asmx", "GetSubscribersByEmail")
        .respond_with(subscribers_response(&[]))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;
    soap_operation("subscriber.asmx", "InsertSubscriber")
        .and(body_string_contains("<value>bar@example.com</value>"))
        .and(body_string_contains("<detectDuplicates>true</detectDuplicates>"))
        .respond_with(soap_response(
            "InsertSubscriber",
            "<InsertSubscriberResult>789</InsertSubscriberResult>",
        ))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;
    soap_operation("oneshot.asmx", "Send")
        .and(body_string_contains("<idSubscriber>789</idSubscriber>"))
        .respond_with(soap_response("Send", "<SendResult>OK</SendResult>"))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;

    let response = test_app.post_message(message_body(&["bar@example.com"])).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["dispatched"], 1);
}

#[tokio::test]
async fn rejected_sends_are_reported_but_counted() {
    let test_app = TestApp::spawn_app().await;

    soap_operation("subscriber.asmx", "GetSubscribersByEmail")
        .respond_with(subscribers_response(&[
            (1, "foo@example.com"),
            (2, "bar@example.com"),
        ]))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;
    soap_operation("oneshot.asmx", "Send")
        .and(body_string_contains("<idSubscriber>1</idSubscriber>"))
        .respond_with(soap_response("Send", "<SendResult>NOK</SendResult>"))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;
    soap_operation("oneshot.asmx", "Send")
        .and(body_string_contains("<idSubscriber>2</idSubscriber>"))
        .respond_with(soap_response("Send", "<SendResult>OK</SendResult>"))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;

    let response = test_app
        .post_message(message_body(&["foo@example.com", "bar@example.com"]))
        .await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["dispatched"], 2);
    assert_eq!(
        body["failed"],
        serde_json::json!([{
            "subscriber_id": 1,
            "email": "foo@example.com",
            "outcome": "rejected",
            "response": "NOK"
        }])
    );
}

#[tokio::test]
async fn messages_fail_with_500_when_mindbaz_is_down() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;

    let response = test_app.post_message(message_body(&["foo@example.com"])).await;

    assert_eq!(response.status().as_u16(), 500);
}

#[tokio::test]
async fn messages_return_400_when_body_is_invalid() {
    let test_app = TestApp::spawn_app().await;
    let test_cases = vec![
        (
            serde_json::json!({
                "campaign": "newsletter",
                "sender": "noreply@example.com",
                "subject": "Bar",
                "body": "<p>Foo</p>"
            }),
            "missing recipients",
        ),
        (message_body(&[]), "empty recipients"),
        (message_body(&["not-an-email"]), "invalid recipient"),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_message(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload had {}",
            error_message
        );
    }
}
