use pinbridge_core::{PinAddress, PinState};
use serde::{Deserialize, Serialize};

/// Body of a `read-pins` request.
///
/// Wire form: `{"pin_reads": [4]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadPinsRequest {
    pub pin_reads: Vec<PinAddress>,
}

impl ReadPinsRequest {
    /// Request a single pin.
    pub fn single(pin: PinAddress) -> Self {
        Self {
            pin_reads: vec![pin],
        }
    }
}

/// One pin/state pair in a write request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinWrite {
    pub pin_num: PinAddress,
    pub state: PinState,
}

/// Body of a `write-pins` request, also the payload of a BLE write.
///
/// Wire form: `{"pin_writes": [{"pin_num": 4, "state": 100}]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WritePinsRequest {
    pub pin_writes: Vec<PinWrite>,
}

impl WritePinsRequest {
    /// Write a single pin.
    pub fn single(pin: PinAddress, state: PinState) -> Self {
        Self {
            pin_writes: vec![PinWrite {
                pin_num: pin,
                state,
            }],
        }
    }
}

/// One entry of a `read-pins` response.
///
/// Only `state` is required; any other keys the firmware sends are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PinReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_num: Option<PinAddress>,
    pub state: f64,
}

/// Body of a `read-pins` response.
///
/// Wire form: `{"pin_reads": [{"state": 100}]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadPinsResponse {
    pub pin_reads: Vec<PinReading>,
}
