//! Stub firmware shared by the HTTP integration tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pinbridge_core::PinAddress;
use pinbridge_protocol::{PinCodec, PinReading, ReadPinsResponse};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Pin table shared between the read and write endpoints.
#[derive(Clone, Default)]
pub struct PinTable(Arc<Mutex<HashMap<PinAddress, u8>>>);

impl PinTable {
    pub fn get(&self, pin: u32) -> Option<u64> {
        self.0
            .lock()
            .unwrap()
            .get(&PinAddress::new(pin))
            .map(|&state| u64::from(state))
    }
}

/// `/write-pins` handler: stores every pin/state pair.
struct WriteHandler(PinTable);

impl Respond for WriteHandler {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = PinCodec::new().decode_write_request(&request.body) else {
            return ResponseTemplate::new(400);
        };
        let mut table = self.0.0.lock().unwrap();
        for write in body.pin_writes {
            table.insert(write.pin_num, write.state.as_u8());
        }
        ResponseTemplate::new(200).set_body_json(json!({"ok": true}))
    }
}

/// `/read-pins` handler: echoes the last state written to each pin.
struct ReadHandler(PinTable);

impl Respond for ReadHandler {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(body) = PinCodec::new().decode_read_request(&request.body) else {
            return ResponseTemplate::new(400);
        };
        let table = self.0.0.lock().unwrap();
        let response = ReadPinsResponse {
            pin_reads: body
                .pin_reads
                .into_iter()
                .map(|pin| PinReading {
                    pin_num: Some(pin),
                    state: f64::from(table.get(&pin).copied().unwrap_or(0)),
                })
                .collect(),
        };
        ResponseTemplate::new(200).set_body_json(response)
    }
}

/// Start a stub board that echoes the last write of each pin on read.
pub async fn start_echo_board() -> (MockServer, PinTable) {
    let server = MockServer::start().await;
    let table = PinTable::default();

    Mock::given(method("POST"))
        .and(path("/write-pins"))
        .respond_with(WriteHandler(table.clone()))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/read-pins"))
        .respond_with(ReadHandler(table.clone()))
        .mount(&server)
        .await;

    (server, table)
}
