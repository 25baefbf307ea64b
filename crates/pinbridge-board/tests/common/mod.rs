//! Fake firmware for board-level tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pinbridge_core::PinAddress;
use pinbridge_protocol::{PinCodec, PinReading, ReadPinsResponse};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Pin states held by the fake firmware, shared with the test.
#[derive(Clone, Default)]
pub struct Firmware {
    states: Arc<Mutex<HashMap<u64, f64>>>,
}

impl Firmware {
    /// Preset the state reported for a pin.
    pub fn preset(&self, pin: u64, state: f64) {
        self.states.lock().unwrap().insert(pin, state);
    }

    /// Last state written to or preset for a pin.
    pub fn state(&self, pin: u64) -> Option<f64> {
        self.states.lock().unwrap().get(&pin).copied()
    }

    fn handle(&self, request: &Request) -> Option<Value> {
        let codec = PinCodec::new();
        let mut states = self.states.lock().unwrap();

        if request.url.path() == "/write-pins" {
            let body = codec.decode_write_request(&request.body).ok()?;
            for write in body.pin_writes {
                states.insert(
                    u64::from(write.pin_num.as_u32()),
                    f64::from(write.state.as_u8()),
                );
            }
            return Some(json!({}));
        }

        let body = codec.decode_read_request(&request.body).ok()?;
        let response = ReadPinsResponse {
            pin_reads: body
                .pin_reads
                .into_iter()
                .map(|pin: PinAddress| PinReading {
                    pin_num: Some(pin),
                    state: states
                        .get(&u64::from(pin.as_u32()))
                        .copied()
                        .unwrap_or(0.0),
                })
                .collect(),
        };
        serde_json::to_value(response).ok()
    }
}

impl Respond for Firmware {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        match self.handle(request) {
            Some(body) => ResponseTemplate::new(200).set_body_json(body),
            None => ResponseTemplate::new(400),
        }
    }
}

/// Start the fake firmware on both pin endpoints.
pub async fn start_firmware() -> (MockServer, Firmware) {
    let server = MockServer::start().await;
    let firmware = Firmware::default();

    for endpoint in ["/read-pins", "/write-pins"] {
        Mock::given(method("POST"))
            .and(path(endpoint))
            .respond_with(firmware.clone())
            .mount(&server)
            .await;
    }

    (server, firmware)
}
