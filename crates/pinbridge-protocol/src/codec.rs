//! JSON codec for pin command bodies.
//!
//! This module converts pin operations into the request bodies understood by
//! the remote board firmware and decodes its responses. The same write body is
//! used by both transports: it is POSTed to `/write-pins` over HTTP and written
//! verbatim to the command characteristic over BLE.
//!
//! # Wire Format
//!
//! ```text
//! read request   {"pin_reads": [<pin>]}
//! read response  {"pin_reads": [{"state": <number>}, ...]}
//! write request  {"pin_writes": [{"pin_num": <pin>, "state": <0-100>}]}
//! ```
//!
//! Only the first element of a read response is consulted.
//!
//! # Error Handling
//!
//! Decoding never panics on an unexpected shape. Invalid JSON, missing keys,
//! a non-numeric `state`, or an empty `pin_reads` list all surface as
//! [`Error::MalformedResponse`].
//!
//! # Example
//!
//! ```
//! use pinbridge_core::{PinAddress, PinState};
//! use pinbridge_protocol::PinCodec;
//!
//! let codec = PinCodec::new();
//!
//! let body = codec.encode_write(PinAddress::new(2), PinState::HIGH).unwrap();
//! assert_eq!(body, br#"{"pin_writes":[{"pin_num":2,"state":100}]}"#);
//!
//! let state = codec.decode_read_response(br#"{"pin_reads":[{"state":100}]}"#).unwrap();
//! assert_eq!(state, 100.0);
//! ```

use pinbridge_core::{Error, PinAddress, PinState, Result};

use crate::message::{ReadPinsRequest, ReadPinsResponse, WritePinsRequest};

/// Default maximum response body size in bytes (64 KB).
///
/// A single-pin response is a few dozen bytes; anything near this size is not
/// a pin response.
const DEFAULT_MAX_BODY_SIZE: usize = 64 * 1024;

/// Encoder/decoder for pin command bodies.
#[derive(Debug, Clone, Copy)]
pub struct PinCodec {
    /// Maximum accepted body size in bytes.
    max_body_size: usize,
}

impl PinCodec {
    /// Create a new codec with the default maximum body size.
    pub fn new() -> Self {
        Self {
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        }
    }

    /// Create a new codec with a custom maximum body size.
    pub fn with_max_body_size(max_body_size: usize) -> Self {
        Self { max_body_size }
    }

    /// Get the current maximum body size.
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// Encode a read request for one pin.
    ///
    /// # Errors
    /// Returns `Error::Encode` if serialization fails.
    pub fn encode_read(&self, pin: PinAddress) -> Result<Vec<u8>> {
        to_body(&ReadPinsRequest::single(pin))
    }

    /// Encode a write request for one pin.
    ///
    /// # Errors
    /// Returns `Error::Encode` if serialization fails.
    pub fn encode_write(&self, pin: PinAddress, state: PinState) -> Result<Vec<u8>> {
        to_body(&WritePinsRequest::single(pin, state))
    }

    /// Decode a read response and return the first reported state.
    ///
    /// # Errors
    /// Returns `Error::MalformedResponse` if the body exceeds the size limit,
    /// does not match the expected shape, or carries no readings.
    pub fn decode_read_response(&self, body: &[u8]) -> Result<f64> {
        let response: ReadPinsResponse = self.parse_body(body)?;
        response
            .pin_reads
            .first()
            .map(|reading| reading.state)
            .ok_or_else(|| Error::malformed("'pin_reads' is empty"))
    }

    /// Decode a read request body, as received by the remote board.
    ///
    /// # Errors
    /// Returns `Error::MalformedResponse` if the body is not a read request.
    pub fn decode_read_request(&self, body: &[u8]) -> Result<ReadPinsRequest> {
        self.parse_body(body)
    }

    /// Decode a write request body, as received by the remote board.
    ///
    /// # Errors
    /// Returns `Error::MalformedResponse` if the body is not a write request.
    pub fn decode_write_request(&self, body: &[u8]) -> Result<WritePinsRequest> {
        self.parse_body(body)
    }

    fn parse_body<T: serde::de::DeserializeOwned>(&self, body: &[u8]) -> Result<T> {
        if body.len() > self.max_body_size {
            return Err(Error::malformed(format!(
                "body of {} bytes exceeds limit of {} bytes",
                body.len(),
                self.max_body_size
            )));
        }
        serde_json::from_slice(body).map_err(|e| Error::malformed(e.to_string()))
    }
}

impl Default for PinCodec {
    fn default() -> Self {
        Self::new()
    }
}

fn to_body<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| Error::Encode(e.to_string()))
}
