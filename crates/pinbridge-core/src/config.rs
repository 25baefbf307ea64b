//! Board configuration.
//!
//! A board is bound to exactly one backend. The JSON form is either
//! `{"url": "http://..."}` or `{"bt_server_name": "..."}`:
//!
//! ```
//! use pinbridge_core::BoardConfig;
//!
//! let http: BoardConfig = serde_json::from_str(r#"{"url": "http://10.0.0.7"}"#).unwrap();
//! assert!(matches!(http, BoardConfig::Http(_)));
//!
//! let ble: BoardConfig = serde_json::from_str(r#"{"bt_server_name": "esp32-pins"}"#).unwrap();
//! assert!(matches!(ble, BoardConfig::Ble(_)));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, constants::DEFAULT_DISCOVERY_TIMEOUT_MS};

/// Configuration for a board reached over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpConfig {
    /// Base URL of the remote board, e.g. `http://192.168.4.1`.
    pub url: String,

    /// Optional per-request timeout. Requests wait forever when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
}

impl HttpConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            request_timeout_ms: None,
        }
    }

    /// Set a per-request timeout.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    /// Ensure all required fields are present.
    ///
    /// `path` locates this config in the caller's document (for example
    /// `components.0`) and is echoed in the error.
    ///
    /// # Errors
    /// Returns `Error::ConfigInvalid` if `url` is empty.
    pub fn validate(&self, path: &str) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(missing(path, "url"));
        }
        Ok(())
    }
}

/// Configuration for a board reached over Bluetooth Low Energy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BleConfig {
    /// Advertised name of the peripheral, matched case-insensitively.
    pub bt_server_name: String,

    /// Override for the discovery deadline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discovery_timeout_ms: Option<u64>,
}

impl BleConfig {
    pub fn new(bt_server_name: impl Into<String>) -> Self {
        Self {
            bt_server_name: bt_server_name.into(),
            discovery_timeout_ms: None,
        }
    }

    pub fn with_discovery_timeout(mut self, timeout: Duration) -> Self {
        self.discovery_timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    /// Discovery deadline, falling back to the 10 second default.
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_millis(
            self.discovery_timeout_ms
                .unwrap_or(DEFAULT_DISCOVERY_TIMEOUT_MS),
        )
    }

    /// Ensure all required fields are present.
    ///
    /// # Errors
    /// Returns `Error::ConfigInvalid` if `bt_server_name` is empty.
    pub fn validate(&self, path: &str) -> Result<()> {
        if self.bt_server_name.trim().is_empty() {
            return Err(missing(path, "bt_server_name"));
        }
        Ok(())
    }
}

/// Backend selection for a board.
///
/// Exactly one backend is allowed; a document carrying both `url` and
/// `bt_server_name` matches neither variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoardConfig {
    Http(HttpConfig),
    Ble(BleConfig),
}

impl BoardConfig {
    /// Validate whichever backend config is present.
    ///
    /// # Errors
    /// Returns `Error::ConfigInvalid` naming the missing field.
    pub fn validate(&self, path: &str) -> Result<()> {
        match self {
            BoardConfig::Http(config) => config.validate(path),
            BoardConfig::Ble(config) => config.validate(path),
        }
    }
}

impl From<HttpConfig> for BoardConfig {
    fn from(config: HttpConfig) -> Self {
        BoardConfig::Http(config)
    }
}

impl From<BleConfig> for BoardConfig {
    fn from(config: BleConfig) -> Self {
        BoardConfig::Ble(config)
    }
}

fn missing(path: &str, field: &str) -> Error {
    Error::ConfigInvalid {
        path: path.to_string(),
        field: field.to_string(),
    }
}
