use thiserror::Error;

/// Errors surfaced by every pinbridge backend.
///
/// Construction-time variants (`AdapterUnavailable`, `DiscoveryTimeout`,
/// `ScanFailed`, `ConnectFailed`) abort board creation. Every other variant is
/// returned per call and leaves the board usable.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("{path}: missing required field '{field}'")]
    ConfigInvalid { path: String, field: String },

    #[error("Invalid pin name '{name}': expected a non-negative integer")]
    InvalidPin { name: String },

    #[error("Duty cycle must be within [0, 1], got {duty}")]
    InvalidDutyCycle { duty: f64 },

    // Transport errors
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    #[error("Remote rejected request with status {status}: {reason}")]
    RemoteRejected { status: u16, reason: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to encode request: {0}")]
    Encode(String),

    // Bluetooth errors
    #[error("Bluetooth adapter unavailable: {0}")]
    AdapterUnavailable(String),

    #[error("Timeout waiting for device '{name}' after {timeout_ms}ms")]
    DiscoveryTimeout { name: String, timeout_ms: u64 },

    #[error("Scan failed: {0}")]
    ScanFailed(String),

    #[error("Failed to connect to {address}: {reason}")]
    ConnectFailed { address: String, reason: String },

    #[error("Discovery for '{name}' already finished in state {state}")]
    DiscoveryFinished { name: String, state: String },

    #[error("Characteristic {uuid} not found on any service")]
    CharacteristicNotFound { uuid: uuid::Uuid },

    #[error("{operation} not supported")]
    NotSupported { operation: String },
}

impl Error {
    /// Create a new unsupported operation error.
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }

    /// Create a new transport error from any displayable cause.
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::TransportUnavailable(cause.to_string())
    }

    /// Create a new malformed response error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Returns `true` for errors that prevent a board from being built.
    #[must_use]
    pub fn is_construction_failure(&self) -> bool {
        matches!(
            self,
            Self::AdapterUnavailable(_)
                | Self::DiscoveryTimeout { .. }
                | Self::ScanFailed(_)
                | Self::ConnectFailed { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_supported_error() {
        let error = Error::not_supported("SetPowerMode");
        assert!(matches!(error, Error::NotSupported { .. }));
        assert_eq!(error.to_string(), "SetPowerMode not supported");
    }

    #[test]
    fn test_config_invalid_names_path_and_field() {
        let error = Error::ConfigInvalid {
            path: "components.0".to_string(),
            field: "url".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "components.0: missing required field 'url'"
        );
    }

    #[test]
    fn test_remote_rejected_carries_status() {
        let error = Error::RemoteRejected {
            status: 500,
            reason: "500 Internal Server Error".to_string(),
        };
        assert!(error.to_string().contains("500"));
        assert!(!error.is_construction_failure());
    }

    #[test]
    fn test_construction_failures() {
        assert!(Error::ScanFailed("adapter busy".to_string()).is_construction_failure());
        assert!(
            Error::DiscoveryTimeout {
                name: "esp32".to_string(),
                timeout_ms: 10_000,
            }
            .is_construction_failure()
        );
        assert!(!Error::not_supported("Get").is_construction_failure());
        assert!(
            !Error::DiscoveryFinished {
                name: "esp32".to_string(),
                state: "Connected".to_string(),
            }
            .is_construction_failure()
        );
    }
}
