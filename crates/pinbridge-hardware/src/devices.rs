//! Enum wrappers for Bluetooth LE backend dispatch.
//!
//! Native `async fn` in traits (RPITIT) is not object-safe, so
//! `Box<dyn BleAdapter>` is not available. These enums give a board one
//! concrete adapter and peripheral type whichever backend is in use, with
//! real radios behind the `hardware-btleplug` feature.
//!
//! # Examples
//!
//! ```
//! use pinbridge_hardware::devices::AnyBleAdapter;
//! use pinbridge_hardware::mock::MockBleAdapter;
//!
//! let adapter = AnyBleAdapter::from(MockBleAdapter::new());
//! assert!(matches!(adapter, AnyBleAdapter::Mock(_)));
//! ```

use std::future::Future;

use pinbridge_core::Result;
use uuid::Uuid;

#[cfg(feature = "hardware-btleplug")]
use crate::native::{BtleplugAdapter, BtleplugDevice};
use crate::mock::{MockBleAdapter, MockBleDevice};
use crate::traits::{BleAdapter, BleDevice};
use crate::types::{GattCharacteristic, GattService, ScanControl, ScanResult};

/// Any supported Bluetooth LE radio.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyBleAdapter {
    /// Scripted radio for development and testing.
    Mock(MockBleAdapter),

    /// Host radio through btleplug.
    #[cfg(feature = "hardware-btleplug")]
    Btleplug(BtleplugAdapter),
}

impl BleAdapter for AnyBleAdapter {
    type Device = AnyBleDevice;

    async fn enable(&self) -> Result<()> {
        match self {
            Self::Mock(adapter) => adapter.enable().await,
            #[cfg(feature = "hardware-btleplug")]
            Self::Btleplug(adapter) => adapter.enable().await,
        }
    }

    fn scan<F>(&self, on_result: F) -> impl Future<Output = Result<()>> + Send
    where
        F: FnMut(&ScanResult) -> ScanControl + Send + 'static,
    {
        async move {
            match self {
                Self::Mock(adapter) => adapter.scan(on_result).await,
                #[cfg(feature = "hardware-btleplug")]
                Self::Btleplug(adapter) => adapter.scan(on_result).await,
            }
        }
    }

    async fn connect(&self, peripheral: &ScanResult) -> Result<AnyBleDevice> {
        match self {
            Self::Mock(adapter) => adapter.connect(peripheral).await.map(AnyBleDevice::Mock),
            #[cfg(feature = "hardware-btleplug")]
            Self::Btleplug(adapter) => adapter
                .connect(peripheral)
                .await
                .map(AnyBleDevice::Btleplug),
        }
    }
}

impl From<MockBleAdapter> for AnyBleAdapter {
    fn from(adapter: MockBleAdapter) -> Self {
        Self::Mock(adapter)
    }
}

#[cfg(feature = "hardware-btleplug")]
impl From<BtleplugAdapter> for AnyBleAdapter {
    fn from(adapter: BtleplugAdapter) -> Self {
        Self::Btleplug(adapter)
    }
}

/// Any supported connected peripheral.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyBleDevice {
    /// Scripted peripheral for development and testing.
    Mock(MockBleDevice),

    /// Peripheral connected through btleplug.
    #[cfg(feature = "hardware-btleplug")]
    Btleplug(BtleplugDevice),
}

impl BleDevice for AnyBleDevice {
    async fn discover_services(&self) -> Result<Vec<GattService>> {
        match self {
            Self::Mock(device) => device.discover_services().await,
            #[cfg(feature = "hardware-btleplug")]
            Self::Btleplug(device) => device.discover_services().await,
        }
    }

    async fn discover_characteristics(
        &self,
        service: &GattService,
        filter: &[Uuid],
    ) -> Result<Vec<GattCharacteristic>> {
        match self {
            Self::Mock(device) => device.discover_characteristics(service, filter).await,
            #[cfg(feature = "hardware-btleplug")]
            Self::Btleplug(device) => device.discover_characteristics(service, filter).await,
        }
    }

    async fn write_without_response(
        &self,
        characteristic: &GattCharacteristic,
        data: &[u8],
    ) -> Result<()> {
        match self {
            Self::Mock(device) => device.write_without_response(characteristic, data).await,
            #[cfg(feature = "hardware-btleplug")]
            Self::Btleplug(device) => device.write_without_response(characteristic, data).await,
        }
    }
}
