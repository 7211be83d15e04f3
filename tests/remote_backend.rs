//! Integration tests for the remote fire backend against a mock HTTP server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use petriscope::backend::remote::RemoteBackend;
use petriscope::backend::{ExecutionError, FireBackend};
use petriscope::core::net::Net;

fn fired_default() -> Net {
    let mut net = Net::default_net();
    net.tokens[0].place_id = "p2".to_string();
    net
}

async fn backend_for(server: &MockServer) -> RemoteBackend {
    RemoteBackend::new(format!("{}/fire", server.uri()), Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn posts_wrapped_net_and_returns_next() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fire"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({ "net": { "tokens": [
            { "id": "t1", "place_id": "p1", "color": "foobar" }
        ] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "net": fired_default() })))
        .expect(1)
        .mount(&server)
        .await;

    let next = backend_for(&server)
        .await
        .fire(&Net::default_net())
        .await
        .unwrap();
    assert_eq!(next, fired_default());
}

#[tokio::test]
async fn null_colours_and_extra_fields_are_accepted() {
    let server = MockServer::start().await;
    let mut body = json!({ "net": fired_default() });
    body["net"]["tokens"][0]["color"] = serde_json::Value::Null;
    body["net"]["input_arcs"][0]["expr"] = json!("x");
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let next = backend_for(&server)
        .await
        .fire(&Net::default_net())
        .await
        .unwrap();
    assert_eq!(next.tokens[0].color, "");
}

#[tokio::test]
async fn error_status_carries_body_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fire"))
        .respond_with(ResponseTemplate::new(400).set_body_string("no transitions are enabled\n"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .await
        .fire(&Net::default_net())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ExecutionError::Status {
            status: 400,
            message: "no transitions are enabled".into()
        }
    );
}

#[tokio::test]
async fn body_without_net_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"next\": {}}"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .await
        .fire(&Net::default_net())
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutionError::MalformedResponse(_)), "{:?}", err);
}

#[tokio::test]
async fn invalid_returned_net_is_rejected() {
    let server = MockServer::start().await;
    let mut broken = fired_default();
    broken.places.retain(|p| p.id != "p2");
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "net": broken })))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .await
        .fire(&Net::default_net())
        .await
        .unwrap_err();
    assert!(matches!(err, ExecutionError::InvalidNet(_)), "{:?}", err);
}

#[tokio::test]
async fn slow_service_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "net": fired_default() }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let backend =
        RemoteBackend::new(format!("{}/fire", server.uri()), Duration::from_secs(1)).unwrap();
    let err = backend.fire(&Net::default_net()).await.unwrap_err();
    assert_eq!(err, ExecutionError::Timeout(Duration::from_secs(1)));
}

#[tokio::test]
async fn sub_second_timeout_is_reported_exactly() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "net": fired_default() }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let backend =
        RemoteBackend::new(format!("{}/fire", server.uri()), Duration::from_millis(300)).unwrap();
    let err = backend.fire(&Net::default_net()).await.unwrap_err();
    assert_eq!(err, ExecutionError::Timeout(Duration::from_millis(300)));
    assert!(err.to_string().ends_with("300ms"), "{}", err);
}

#[tokio::test]
async fn unreachable_service_is_network_error() {
    let backend = RemoteBackend::new("http://127.0.0.1:9/fire", Duration::from_secs(5)).unwrap();
    let err = backend.fire(&Net::default_net()).await.unwrap_err();
    assert!(matches!(err, ExecutionError::Network(_)), "{:?}", err);
}
