//! HTTP client for the remote board's pin endpoints.
//!
//! This module provides the HTTP backend of a board: every pin operation is a
//! single JSON `POST` to the firmware, encoded and decoded by [`PinCodec`].
//!
//! # Architecture
//!
//! ```text
//! Board
//!     │
//!     └─> GpioPin / AnalogPin
//!             │
//!             └─> HttpPinClient ───(HTTP POST)───> ESP32 firmware
//!                    │                              /read-pins
//!                    └─> PinCodec (JSON bodies)     /write-pins
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use pinbridge_core::{HttpConfig, PinAddress};
//! use pinbridge_network::HttpPinClient;
//!
//! # async fn example() -> pinbridge_core::Result<()> {
//! let client = HttpPinClient::new(&HttpConfig::new("http://192.168.4.1"))?;
//!
//! client.set_level(PinAddress::new(2), true).await?;
//! let high = client.get_level(PinAddress::new(2)).await?;
//! println!("pin 2 high: {high}");
//! # Ok(())
//! # }
//! ```
//!
//! # Design Principles
//!
//! The client is a thin transport layer:
//! - **No automatic retry**: Caller decides retry strategy
//! - **No request serialization**: Concurrent calls share one `reqwest::Client`
//! - **No default timeout**: A hung endpoint blocks the caller unless
//!   `request_timeout_ms` is configured
//! - **Typed failures**: Status, transport and shape errors are distinct
//!
//! # PWM Scaling
//!
//! [`set_pwm`](HttpPinClient::set_pwm) scales its duty fraction by 100 before
//! sending, while [`read_pwm`](HttpPinClient::read_pwm) returns the raw state
//! unscaled. Callers reading back a duty of `0.25` get `25.0`.

use pinbridge_core::{
    Error, HttpConfig, PinAddress, PinState, Result,
    constants::{CONTENT_TYPE_JSON, READ_PINS_PATH, WRITE_PINS_PATH},
};
use pinbridge_protocol::PinCodec;
use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, trace, warn};

/// HTTP backend for a remote board.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpPinClient {
    /// Base URL without trailing slash
    base_url: String,

    /// Shared HTTP client
    http: reqwest::Client,

    /// Body codec
    codec: PinCodec,
}

impl HttpPinClient {
    /// Create a new client for the configured base URL.
    ///
    /// No request is made until the first pin operation.
    ///
    /// # Errors
    ///
    /// Returns `Error::TransportUnavailable` if the HTTP client cannot be
    /// initialized (for example, TLS backend failure).
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| Error::transport(format!("HTTP client init failed: {e}")))?;

        let base_url = config.url.trim_end_matches('/').to_string();
        debug!("Creating HTTP pin client for {}", base_url);

        Ok(Self {
            base_url,
            http,
            codec: PinCodec::new(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read the raw state of one pin.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The request cannot be sent (`TransportUnavailable`)
    /// - The board answers with a non-200 status (`RemoteRejected`)
    /// - The response body has the wrong shape (`MalformedResponse`)
    pub async fn read_pin(&self, pin: PinAddress) -> Result<f64> {
        let body = self.codec.encode_read(pin)?;
        let response = self.post(READ_PINS_PATH, body).await?;
        let state = self.codec.decode_read_response(&response)?;
        trace!(%pin, state, "Pin read");
        Ok(state)
    }

    /// Write one pin state.
    ///
    /// The response body is ignored; a 200 status is success.
    ///
    /// # Errors
    ///
    /// Returns `TransportUnavailable` or `RemoteRejected` as for
    /// [`read_pin`](Self::read_pin).
    pub async fn write_pin(&self, pin: PinAddress, state: PinState) -> Result<()> {
        let body = self.codec.encode_write(pin, state)?;
        self.post(WRITE_PINS_PATH, body).await?;
        trace!(%pin, %state, "Pin written");
        Ok(())
    }

    /// Read a pin as a boolean level (`true` iff the state is exactly 100).
    ///
    /// # Errors
    ///
    /// See [`read_pin`](Self::read_pin).
    pub async fn get_level(&self, pin: PinAddress) -> Result<bool> {
        let state = self.read_pin(pin).await?;
        Ok(PinState::reading_is_high(state))
    }

    /// Drive a pin high (100) or low (0).
    ///
    /// # Errors
    ///
    /// See [`write_pin`](Self::write_pin).
    pub async fn set_level(&self, pin: PinAddress, high: bool) -> Result<()> {
        self.write_pin(pin, PinState::from_level(high)).await
    }

    /// Read the PWM state of a pin.
    ///
    /// Returns the raw 0-100 state as reported, not a 0-1 fraction.
    ///
    /// # Errors
    ///
    /// See [`read_pin`](Self::read_pin).
    pub async fn read_pwm(&self, pin: PinAddress) -> Result<f64> {
        self.read_pin(pin).await
    }

    /// Set the PWM duty cycle of a pin.
    ///
    /// `duty_cycle` is a fraction in `[0, 1]` and is sent as
    /// `round(duty_cycle * 100)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDutyCycle` for fractions outside `[0, 1]`, otherwise
    /// see [`write_pin`](Self::write_pin).
    pub async fn set_pwm(&self, pin: PinAddress, duty_cycle: f64) -> Result<()> {
        let state = PinState::from_duty_cycle(duty_cycle)?;
        self.write_pin(pin, state).await
    }

    /// POST a JSON body and return the response body of a 200 reply.
    async fn post(&self, path: &str, body: Vec<u8>) -> Result<Vec<u8>> {
        let endpoint = format!("{}{}", self.base_url, path);
        debug!(
            endpoint = %endpoint,
            body = %String::from_utf8_lossy(&body),
            "Sending pin request"
        );

        let mut response = self
            .http
            .post(&endpoint)
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", endpoint, e);
                Error::transport(format!("failed to send request to {endpoint}: {e}"))
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("Request to {} rejected: {}", endpoint, status);
            return Err(Error::RemoteRejected {
                status: status.as_u16(),
                reason: status.to_string(),
            });
        }

        let limit = self.codec.max_body_size();
        if let Some(length) = response.content_length().filter(|&n| n > limit as u64) {
            warn!("Response from {} is {} bytes, over the {} byte limit", endpoint, length, limit);
            return Err(oversized_response(&endpoint, limit));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| {
            error!("Failed to read response from {}: {}", endpoint, e);
            Error::transport(format!("failed to read response from {endpoint}: {e}"))
        })? {
            if body.len() + chunk.len() > limit {
                warn!("Response from {} exceeded the {} byte limit", endpoint, limit);
                return Err(oversized_response(&endpoint, limit));
            }
            body.extend_from_slice(&chunk);
        }
        trace!(response = %String::from_utf8_lossy(&body), "Received response");

        Ok(body)
    }
}

fn oversized_response(endpoint: &str, limit: usize) -> Error {
    Error::malformed(format!(
        "response from {endpoint} exceeds limit of {limit} bytes"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_client_creation_trims_trailing_slash() {
        let client = HttpPinClient::new(&HttpConfig::new("http://10.0.0.7/")).unwrap();
        assert_eq!(client.base_url(), "http://10.0.0.7");
    }

    #[test]
    fn test_client_creation_with_timeout() {
        let config =
            HttpConfig::new("http://10.0.0.7").with_request_timeout(Duration::from_millis(250));
        assert!(HttpPinClient::new(&config).is_ok());
    }

    #[tokio::test]
    async fn test_invalid_duty_cycle_sends_nothing() {
        // Unroutable host: the request would fail if it were ever sent.
        let client = HttpPinClient::new(&HttpConfig::new("http://192.0.2.1:9")).unwrap();
        let result = client.set_pwm(PinAddress::new(1), 1.5).await;
        assert!(matches!(result, Err(Error::InvalidDutyCycle { .. })));
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = HttpPinClient::new(&HttpConfig::new(format!("http://{addr}"))).unwrap();
        let result = client.read_pin(PinAddress::new(1)).await;
        assert!(matches!(result, Err(Error::TransportUnavailable(_))));
    }
}
