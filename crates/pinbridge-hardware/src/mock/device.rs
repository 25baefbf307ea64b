//! Mock connected peripheral.
//!
//! A [`MockBleDevice`] exposes a scripted GATT table and records every
//! write-without-response it receives.

use std::sync::{Arc, Mutex};

use pinbridge_core::{Error, Result, constants::PIN_WRITE_CHARACTERISTIC_UUID};
use uuid::{Uuid, uuid};

use super::lock;
use crate::traits::BleDevice;
use crate::types::{GattCharacteristic, GattService};

/// Service UUID used by [`MockBleDevice::with_pin_service`].
pub const MOCK_PIN_SERVICE_UUID: Uuid = uuid!("4fafc201-1fb5-459e-8fcc-c5c9c331914b");

/// A write recorded by a [`MockBleDevice`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedWrite {
    /// Characteristic the data was written to.
    pub characteristic: GattCharacteristic,

    /// Raw bytes written.
    pub data: Vec<u8>,
}

impl RecordedWrite {
    /// Written bytes as UTF-8 text.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

#[derive(Debug, Clone)]
struct MockService {
    uuid: Uuid,
    characteristics: Vec<Uuid>,
    fail_discovery: bool,
}

#[derive(Debug, Default)]
struct DeviceLog {
    writes: Vec<RecordedWrite>,
    service_discoveries: usize,
}

/// Mock connected peripheral.
///
/// # Examples
///
/// ```
/// use pinbridge_core::constants::PIN_WRITE_CHARACTERISTIC_UUID;
/// use pinbridge_hardware::mock::MockBleDevice;
/// use pinbridge_hardware::traits::BleDevice;
///
/// #[tokio::main]
/// async fn main() -> pinbridge_core::Result<()> {
///     let device = MockBleDevice::new().with_pin_service();
///     let handle = device.handle();
///
///     let services = device.discover_services().await?;
///     let chars = device
///         .discover_characteristics(&services[0], &[PIN_WRITE_CHARACTERISTIC_UUID])
///         .await?;
///     device.write_without_response(&chars[0], b"hello").await?;
///
///     assert_eq!(handle.writes()[0].text(), "hello");
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBleDevice {
    services: Vec<MockService>,
    service_discovery_error: Option<String>,
    write_error: Option<String>,
    log: Arc<Mutex<DeviceLog>>,
}

impl MockBleDevice {
    /// Create a peripheral with no services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a service with the given characteristics.
    pub fn with_service(
        mut self,
        uuid: Uuid,
        characteristics: impl IntoIterator<Item = Uuid>,
    ) -> Self {
        self.services.push(MockService {
            uuid,
            characteristics: characteristics.into_iter().collect(),
            fail_discovery: false,
        });
        self
    }

    /// Add a service whose characteristic discovery always fails.
    pub fn with_failing_service(mut self, uuid: Uuid) -> Self {
        self.services.push(MockService {
            uuid,
            characteristics: Vec::new(),
            fail_discovery: true,
        });
        self
    }

    /// Add the firmware's pin service carrying the pin-write characteristic.
    pub fn with_pin_service(self) -> Self {
        self.with_service(MOCK_PIN_SERVICE_UUID, [PIN_WRITE_CHARACTERISTIC_UUID])
    }

    /// Make service enumeration fail.
    pub fn fail_service_discovery(mut self, reason: impl Into<String>) -> Self {
        self.service_discovery_error = Some(reason.into());
        self
    }

    /// Make every write fail.
    pub fn fail_writes(mut self, reason: impl Into<String>) -> Self {
        self.write_error = Some(reason.into());
        self
    }

    /// Get a handle observing this peripheral and all its clones.
    pub fn handle(&self) -> MockBleDeviceHandle {
        MockBleDeviceHandle {
            log: Arc::clone(&self.log),
        }
    }
}

impl BleDevice for MockBleDevice {
    async fn discover_services(&self) -> Result<Vec<GattService>> {
        lock(&self.log).service_discoveries += 1;

        if let Some(reason) = &self.service_discovery_error {
            return Err(Error::transport(reason));
        }

        Ok(self
            .services
            .iter()
            .map(|service| GattService { uuid: service.uuid })
            .collect())
    }

    async fn discover_characteristics(
        &self,
        service: &GattService,
        filter: &[Uuid],
    ) -> Result<Vec<GattCharacteristic>> {
        let Some(mock) = self.services.iter().find(|s| s.uuid == service.uuid) else {
            return Err(Error::transport(format!("unknown service {}", service.uuid)));
        };

        if mock.fail_discovery {
            return Err(Error::transport(format!(
                "characteristic discovery failed for service {}",
                service.uuid
            )));
        }

        Ok(mock
            .characteristics
            .iter()
            .filter(|uuid| filter.is_empty() || filter.contains(uuid))
            .map(|&uuid| GattCharacteristic {
                uuid,
                service_uuid: mock.uuid,
            })
            .collect())
    }

    async fn write_without_response(
        &self,
        characteristic: &GattCharacteristic,
        data: &[u8],
    ) -> Result<()> {
        if let Some(reason) = &self.write_error {
            return Err(Error::transport(reason));
        }

        lock(&self.log).writes.push(RecordedWrite {
            characteristic: *characteristic,
            data: data.to_vec(),
        });
        Ok(())
    }
}

/// Observer for a [`MockBleDevice`].
#[derive(Debug, Clone)]
pub struct MockBleDeviceHandle {
    log: Arc<Mutex<DeviceLog>>,
}

impl MockBleDeviceHandle {
    /// All successful writes, oldest first.
    pub fn writes(&self) -> Vec<RecordedWrite> {
        lock(&self.log).writes.clone()
    }

    /// Number of times services were enumerated.
    pub fn service_discoveries(&self) -> usize {
        lock(&self.log).service_discoveries
    }
}
