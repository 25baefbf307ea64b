//! Integration tests for HttpPinClient
//!
//! These tests run the client against wiremock stub boards and verify the
//! exact request bodies, the status handling and the read/write round trips.

mod common;

use pinbridge_core::{Error, HttpConfig, PinAddress, PinState};
use pinbridge_network::HttpPinClient;
use rstest::rstest;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> HttpPinClient {
    HttpPinClient::new(&HttpConfig::new(server.uri())).unwrap()
}

/// Test write-then-read returns the written level for both levels
#[rstest]
#[case(0, PinState::LOW)]
#[case(0, PinState::HIGH)]
#[case(13, PinState::LOW)]
#[case(13, PinState::HIGH)]
#[case(65535, PinState::HIGH)]
#[tokio::test]
async fn test_write_then_read_round_trip(#[case] pin: u32, #[case] state: PinState) {
    let (server, _table) = common::start_echo_board().await;
    let client = client_for(&server);
    let pin = PinAddress::new(pin);

    client.write_pin(pin, state).await.unwrap();
    let read = client.read_pin(pin).await.unwrap();

    assert_eq!(read, f64::from(state.as_u8()));
}

/// Test the read request body and content type match the firmware contract
#[tokio::test]
async fn test_read_request_wire_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/read-pins"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"pin_reads": [4]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pin_reads": [{"state": 73}]})))
        .expect(1)
        .mount(&server)
        .await;

    let state = client_for(&server).read_pin(PinAddress::new(4)).await.unwrap();
    assert_eq!(state, 73.0);
}

/// Test the write request body matches the firmware contract
#[tokio::test]
async fn test_write_request_wire_format() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write-pins"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({"pin_writes": [{"pin_num": 2, "state": 100}]})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .set_level(PinAddress::new(2), true)
        .await
        .unwrap();
}

/// Test PWM writes scale by 100 and PWM reads return the raw state
#[rstest]
#[case(0.0, 0)]
#[case(0.25, 25)]
#[case(0.333, 33)]
#[case(0.5, 50)]
#[case(0.875, 88)]
#[case(1.0, 100)]
#[tokio::test]
async fn test_pwm_round_trip_keeps_raw_state(#[case] duty: f64, #[case] expected: u64) {
    let (server, table) = common::start_echo_board().await;
    let client = client_for(&server);
    let pin = PinAddress::new(5);

    client.set_pwm(pin, duty).await.unwrap();
    assert_eq!(table.get(5), Some(expected));

    let read = client.read_pwm(pin).await.unwrap();
    assert_eq!(read, expected as f64);
}

/// Test boolean reads are true only for exactly 100
#[rstest]
#[case(json!(100), true)]
#[case(json!(100.0), true)]
#[case(json!(0), false)]
#[case(json!(99), false)]
#[case(json!(1), false)]
#[case(json!(50.5), false)]
#[tokio::test]
async fn test_get_level_mapping(#[case] state: serde_json::Value, #[case] expected: bool) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/read-pins"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"pin_reads": [{"state": state}]})),
        )
        .mount(&server)
        .await;

    let high = client_for(&server).get_level(PinAddress::new(7)).await.unwrap();
    assert_eq!(high, expected);
}

/// Test set(true) followed by get() through the echo board
#[tokio::test]
async fn test_set_then_get_level() {
    let (server, _table) = common::start_echo_board().await;
    let client = client_for(&server);
    let pin = PinAddress::new(21);

    client.set_level(pin, true).await.unwrap();
    assert!(client.get_level(pin).await.unwrap());

    client.set_level(pin, false).await.unwrap();
    assert!(!client.get_level(pin).await.unwrap());
}

/// Test non-200 status surfaces as RemoteRejected and is not retried
#[rstest]
#[case(500)]
#[case(404)]
#[case(201)]
#[tokio::test]
async fn test_non_200_is_rejected_without_retry(#[case] status: u16) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/read-pins"))
        .respond_with(ResponseTemplate::new(status))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).read_pin(PinAddress::new(1)).await;
    match result {
        Err(Error::RemoteRejected { status: got, .. }) => assert_eq!(got, status),
        other => panic!("expected RemoteRejected({status}), got {other:?}"),
    }
    // MockServer verifies `expect(1)` on drop
}

/// Test a write rejected by the board surfaces its status
#[tokio::test]
async fn test_write_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/write-pins"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .write_pin(PinAddress::new(1), PinState::HIGH)
        .await;
    assert!(matches!(result, Err(Error::RemoteRejected { status: 503, .. })));
}

/// Test a 200 response with the wrong shape is MalformedResponse
#[rstest]
#[case(json!({}))]
#[case(json!({"pin_reads": []}))]
#[case(json!({"pin_reads": [{"level": 1}]}))]
#[case(json!({"pin_reads": "100"}))]
#[tokio::test]
async fn test_malformed_response(#[case] body: serde_json::Value) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/read-pins"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let result = client_for(&server).read_pin(PinAddress::new(1)).await;
    assert!(matches!(result, Err(Error::MalformedResponse(_))));
}

/// Test an oversized body is refused while reading it, not after buffering
#[tokio::test]
async fn test_oversized_response_rejected() {
    let server = MockServer::start().await;
    let padding = "x".repeat(100 * 1024);
    Mock::given(method("POST"))
        .and(path("/read-pins"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"pin_reads": [{"state": 100}], "padding": padding})),
        )
        .mount(&server)
        .await;

    let result = client_for(&server).read_pin(PinAddress::new(1)).await;
    match result {
        Err(Error::MalformedResponse(message)) => {
            assert!(message.starts_with("response from"), "{message}");
            assert!(message.contains("65536 bytes"), "{message}");
        }
        other => panic!("expected MalformedResponse, got {other:?}"),
    }
}

/// Test a failed call leaves the client usable for other pins
#[tokio::test]
async fn test_client_usable_after_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/read-pins"))
        .and(body_json(json!({"pin_reads": [1]})))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/read-pins"))
        .and(body_json(json!({"pin_reads": [2]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pin_reads": [{"state": 100}]})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert!(client.read_pin(PinAddress::new(1)).await.is_err());
    assert_eq!(client.read_pin(PinAddress::new(2)).await.unwrap(), 100.0);
}

/// Test the configured request timeout applies to a hung endpoint
#[tokio::test]
async fn test_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/read-pins"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"pin_reads": [{"state": 0}]}))
                .set_delay(std::time::Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let config = HttpConfig::new(server.uri())
        .with_request_timeout(std::time::Duration::from_millis(100));
    let client = HttpPinClient::new(&config).unwrap();

    let result = client.read_pin(PinAddress::new(1)).await;
    assert!(matches!(result, Err(Error::TransportUnavailable(_))));
}
