//! Bluetooth LE layer for pinbridge boards.
//!
//! This crate finds a board's radio by its advertised name, connects to it,
//! and writes pin commands to the firmware's command characteristic.
//!
//! # Layout
//!
//! - [`traits`]: `BleAdapter` and `BleDevice`, the seams every backend
//!   implements
//! - [`discovery`]: the scan-match-connect state machine
//! - [`gatt`]: characteristic resolution and pin writes
//! - [`devices`]: enum dispatch over the available backends
//! - [`mock`]: scripted backends for tests and development
//!
//! Real radios are available through btleplug with the `hardware-btleplug`
//! feature.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use pinbridge_core::{PinAddress, PinState};
//! use pinbridge_hardware::discovery::BleDiscovery;
//! use pinbridge_hardware::gatt::PinCommandWriter;
//! use pinbridge_hardware::mock::{MockBleAdapter, MockBleDevice};
//! use pinbridge_hardware::types::ScanResult;
//!
//! #[tokio::main]
//! async fn main() -> pinbridge_core::Result<()> {
//!     let adapter = MockBleAdapter::new()
//!         .advertise(ScanResult::named("garden-valves", "AA:03"))
//!         .with_device(MockBleDevice::new().with_pin_service());
//!
//!     let mut discovery =
//!         BleDiscovery::new(Arc::new(adapter), "garden-valves", Duration::from_secs(5));
//!     let device = discovery.run().await?;
//!
//!     PinCommandWriter::new()
//!         .write_pin(&device, PinAddress::new(2), PinState::HIGH)
//!         .await
//! }
//! ```

pub mod devices;
pub mod discovery;
pub mod gatt;
pub mod mock;
#[cfg(feature = "hardware-btleplug")]
pub mod native;
pub mod traits;
pub mod types;

pub use devices::{AnyBleAdapter, AnyBleDevice};
pub use discovery::{BleDiscovery, DiscoveryState};
pub use gatt::PinCommandWriter;
#[cfg(feature = "hardware-btleplug")]
pub use native::{BtleplugAdapter, BtleplugDevice};
pub use traits::{BleAdapter, BleDevice};
pub use types::{GattCharacteristic, GattService, ScanControl, ScanResult};
