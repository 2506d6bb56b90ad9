use wiremock::matchers::{any, body_string_contains};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{soap_operation, soap_response, subscribers_response, TestApp};

#[tokio::test]
async fn create_subscriber_returns_201_with_the_mindbaz_identifier() {
    let test_app = TestApp::spawn_app().await;

    soap_operation("subscriber.asmx", "InsertSubscriber")
        .and(body_string_contains("<SubscriberFieldData><idField>1</idField><value>foo@example.com</value></SubscriberFieldData>"))
        .and(body_string_contains("<SubscriberFieldData><idField>15</idField><value>John</value></SubscriberFieldData>"))
        .respond_with(soap_response(
            "InsertSubscriber",
            "<InsertSubscriberResult>123</InsertSubscriberResult>",
        ))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;

    let response = test_app
        .post_subscriber(serde_json::json!({
            "email": "Foo@Example.com",
            "first_name": "John",
            "last_name": "DOE",
            "civility": "mr"
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], 123);
    assert_eq!(body["email"], "foo@example.com");
    assert_eq!(body["civility"], "mr");
}

#[tokio::test]
async fn create_subscriber_returns_400_when_body_is_invalid() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.mindbaz_server)
        .await;

    // This is a common practice and it is called table-driven tests. In this case, it simulates different kind of possible request bodies
    // where API should return 400.
    let test_cases = vec![
        (serde_json::json!({}), "missing email"),
        (serde_json::json!({ "email": "foo.com" }), "invalid email"),
        (
            serde_json::json!({ "email": "foo@example.com", "civility": "sir" }),
            "unknown civility",
        ),
    ];

    for (invalid_body, error_message) in test_cases {
        let response = test_app.post_subscriber(invalid_body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 status when payload had {}",
            error_message
        );
    }
}

#[tokio::test]
async fn find_subscriber_returns_the_matching_subscriber() {
    let test_app = TestApp::spawn_app().await;

    soap_operation("subscriber.asmx", "GetSubscribersByEmail")
        .and(body_string_contains("<statuses><int>0</int><int>1</int></statuses>"))
        .respond_with(subscribers_response(&[(456, "foo@example.com")]))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;

    let response = test_app.get_subscriber("foo@example.com").await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["id"], 456);
}

#[tokio::test]
async fn find_subscriber_returns_404_when_nobody_matches() {
    let test_app = TestApp::spawn_app().await;

    soap_operation("subscriber.asmx", "GetSubscribersByEmail")
        .respond_with(subscribers_response(&[]))
        .expect(1)
        .mount(&test_app.mindbaz_server)
        .await;

    let response = test_app.get_subscriber("foo@example.com").await;

    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn unsubscribe_reports_the_mindbaz_answer() {
    let test_cases = vec![("true", true), ("false", false)];

    for (result, unsubscribed) in test_cases {
        let test_app = TestApp::spawn_app().await;

        soap_operation("subscriber.asmx", "Unsubscribe")
            .and(body_string_contains("<idSubscriber>123</idSubscriber>"))
            .respond_with(soap_response(
                "Unsubscribe",
                &format!("<UnsubscribeResult>{}</UnsubscribeResult>", result),
            ))
            .expect(1)
            .mount(&test_app.mindbaz_server)
            .await;

        let response = test_app.post_unsubscribe(123).await;

        assert_eq!(response.status().as_u16(), 200);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["unsubscribed"], unsubscribed);
    }
}
