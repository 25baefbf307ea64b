//! Bluetooth LE adapter and peripheral traits.
//!
//! All traits use native `async fn` methods (Rust 1.90 + Edition 2024 RPITIT).
//! They are not object-safe; dispatch over concrete backends goes through the
//! enums in [`crate::devices`].
//!
//! [`BleAdapter::scan`] is spelled out as `-> impl Future + Send` because
//! discovery runs the scan on a spawned Tokio task.

#![allow(async_fn_in_trait)]

use std::future::Future;

use pinbridge_core::Result;
use uuid::Uuid;

use crate::types::{GattCharacteristic, GattService, ScanControl, ScanResult};

/// A local Bluetooth LE radio.
///
/// # Example
///
/// ```
/// use pinbridge_hardware::mock::MockBleAdapter;
/// use pinbridge_hardware::traits::BleAdapter;
/// use pinbridge_hardware::types::{ScanControl, ScanResult};
///
/// #[tokio::main]
/// async fn main() -> pinbridge_core::Result<()> {
///     let adapter = MockBleAdapter::new()
///         .advertise(ScanResult::named("esp32", "AA:01"))
///         .end_scan_after_advertisements();
///
///     adapter.enable().await?;
///     adapter
///         .scan(|result| {
///             println!("saw {result}");
///             ScanControl::Continue
///         })
///         .await?;
///     Ok(())
/// }
/// ```
pub trait BleAdapter: Send + Sync + 'static {
    /// Connected peripheral type.
    type Device: BleDevice;

    /// Power on and claim the radio.
    ///
    /// # Errors
    ///
    /// Returns `Error::AdapterUnavailable` if no usable radio is present.
    async fn enable(&self) -> Result<()>;

    /// Scan for advertisements, calling `on_result` for each one.
    ///
    /// The future completes when `on_result` returns [`ScanControl::Stop`],
    /// when the adapter ends the scan on its own, or with an error. It may
    /// never complete if neither happens.
    ///
    /// # Errors
    ///
    /// Returns `Error::ScanFailed` if the scan cannot start or aborts.
    fn scan<F>(&self, on_result: F) -> impl Future<Output = Result<()>> + Send
    where
        F: FnMut(&ScanResult) -> ScanControl + Send + 'static;

    /// Connect to an advertised peripheral.
    ///
    /// # Errors
    ///
    /// Returns `Error::ConnectFailed` if the link cannot be established.
    async fn connect(&self, peripheral: &ScanResult) -> Result<Self::Device>;
}

/// A connected Bluetooth LE peripheral.
pub trait BleDevice: Send + Sync {
    /// Enumerate the peripheral's primary services.
    async fn discover_services(&self) -> Result<Vec<GattService>>;

    /// Enumerate the characteristics of one service.
    ///
    /// Only characteristics whose UUID is in `filter` are returned; an empty
    /// filter returns all of them.
    async fn discover_characteristics(
        &self,
        service: &GattService,
        filter: &[Uuid],
    ) -> Result<Vec<GattCharacteristic>>;

    /// Write `data` to a characteristic without waiting for acknowledgement.
    async fn write_without_response(
        &self,
        characteristic: &GattCharacteristic,
        data: &[u8],
    ) -> Result<()>;
}
