//! Tests for the Prowl notifier

use super::*;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn notifier_for(server: &MockServer, api_key: Option<&str>) -> Notifier {
    Notifier::new(
        format!("{}/publicapi/add", server.uri()),
        api_key.map(str::to_string),
        "Stock Checker",
        "iPhone Stock",
    )
}

#[tokio::test]
async fn deliver_posts_prowl_form() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/publicapi/add"))
        .and(body_string_contains("apikey=test-key"))
        .and(body_string_contains("priority=2"))
        .and(body_string_contains("application=Stock+Checker"))
        .and(body_string_contains("event=iPhone+Stock"))
        .and(body_string_contains("description=Covent+Garden"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = notifier_for(&server, Some("test-key"))
        .deliver("Covent Garden has stock of iPhone 7", Priority::Emergency)
        .await
        .unwrap();
    assert_eq!(outcome, Delivery::Sent);
}

#[tokio::test]
async fn missing_key_skips_delivery() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server, None);
    assert!(!notifier.is_configured());
    assert_eq!(
        notifier.deliver("hello", Priority::Normal).await.unwrap(),
        Delivery::Skipped
    );
    assert!(!notifier.notify("hello", Priority::Normal));
    notifier.flush().await;
}

#[tokio::test]
async fn blank_key_counts_as_missing() {
    let server = MockServer::start().await;
    assert!(!notifier_for(&server, Some("  ")).is_configured());
}

#[tokio::test]
async fn rejected_push_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = notifier_for(&server, Some("bad-key"))
        .deliver("hello", Priority::High)
        .await
        .unwrap_err();
    assert!(matches!(err, StockError::HttpStatus(s) if s.as_u16() == 401));
}

#[tokio::test]
async fn detached_failure_is_swallowed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server, Some("test-key"));
    assert!(notifier.notify("hello", Priority::Emergency));
    // the task completes normally even though delivery failed
    notifier.flush().await;
}

#[tokio::test]
async fn report_error_pushes_prefixed_message_at_normal_priority() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("priority=0"))
        .and(body_string_contains("description=Stock+Checker+Error%3A+feed+down"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server, Some("test-key"));
    notifier.report_error("feed down");
    notifier.flush().await;
}

#[test]
fn priority_values_match_prowl_range() {
    assert_eq!(Priority::VeryLow.value(), -2);
    assert_eq!(Priority::Moderate.value(), -1);
    assert_eq!(Priority::Normal.value(), 0);
    assert_eq!(Priority::High.value(), 1);
    assert_eq!(Priority::Emergency.value(), 2);
}

#[tokio::test]
async fn clones_share_in_flight_deliveries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(3)
        .mount(&server)
        .await;

    let notifier = notifier_for(&server, Some("test-key"));
    let clone = notifier.clone();
    clone.stock_alert("one");
    clone.stock_alert("two");
    notifier.notify("three", Priority::High);

    notifier.flush().await;
    server.verify().await;
}
