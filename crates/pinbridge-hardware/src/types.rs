//! Data types shared by the Bluetooth LE traits.

use std::fmt;
use uuid::Uuid;

/// One advertisement seen while scanning.
///
/// Adapters report a result every time a peripheral advertises, so the same
/// peripheral may appear many times during one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// Advertised local name, if the advertisement carried one.
    pub local_name: Option<String>,

    /// Adapter-specific peripheral address used to connect.
    pub address: String,

    /// Signal strength in dBm.
    pub rssi: Option<i16>,
}

impl ScanResult {
    /// Create a scan result with a name and address and no RSSI.
    pub fn named(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            local_name: Some(name.into()),
            address: address.into(),
            rssi: None,
        }
    }

    /// Set the signal strength.
    pub fn with_rssi(mut self, rssi: i16) -> Self {
        self.rssi = Some(rssi);
        self
    }

    /// Advertised name, treating an empty name as absent.
    pub fn name(&self) -> Option<&str> {
        self.local_name.as_deref().filter(|name| !name.is_empty())
    }
}

impl fmt::Display for ScanResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{} ({})", name, self.address),
            None => write!(f, "<unnamed> ({})", self.address),
        }
    }
}

/// Whether a scan should keep delivering results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanControl {
    /// Keep scanning.
    Continue,

    /// Stop the scan; the adapter may still deliver results already queued.
    Stop,
}

/// A primary service exposed by a connected peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GattService {
    pub uuid: Uuid,
}

/// A characteristic of a connected peripheral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GattCharacteristic {
    /// Characteristic UUID.
    pub uuid: Uuid,

    /// UUID of the service the characteristic belongs to.
    pub service_uuid: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_is_absent() {
        let result = ScanResult {
            local_name: Some(String::new()),
            address: "AA:BB".to_string(),
            rssi: None,
        };
        assert_eq!(result.name(), None);
        assert_eq!(result.to_string(), "<unnamed> (AA:BB)");
    }

    #[test]
    fn test_named_display() {
        let result = ScanResult::named("esp32", "AA:BB").with_rssi(-60);
        assert_eq!(result.name(), Some("esp32"));
        assert_eq!(result.rssi, Some(-60));
        assert_eq!(result.to_string(), "esp32 (AA:BB)");
    }
}
