//! Board facade dispatching pin operations to one backend.
//!
//! A [`Board`] is built once from its configuration and is bound to exactly
//! one backend for its whole life:
//!
//! ```text
//! BoardConfig ─┬─ HttpConfig ─> HttpPinClient ──────────────> /read-pins, /write-pins
//!              └─ BleConfig ──> BleDiscovery ─> AnyBleDevice ─> pin-write characteristic
//! ```
//!
//! Construction either succeeds with a connected backend or fails without
//! leaving a board behind. After that, per-call failures never change the
//! board's state.
//!
//! [`close`](Board::close) only marks the board as closed. It does not abort
//! calls in flight, and a BLE board keeps its link to the peripheral.

use std::sync::Arc;
use std::time::Duration;

use pinbridge_core::{BleConfig, BoardConfig, Error, HttpConfig, PowerMode, Result};
use pinbridge_hardware::{AnyBleAdapter, AnyBleDevice, BleDiscovery, PinCommandWriter};
use pinbridge_network::HttpPinClient;
use serde_json::{Map, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::pins::{AnalogPin, DigitalInterrupt, GpioPin};

/// Which transport a board talks through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Http,
    Ble,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Http => write!(f, "http"),
            BackendKind::Ble => write!(f, "ble"),
        }
    }
}

#[derive(Debug)]
pub(crate) enum Backend {
    Http(HttpPinClient),
    Ble(BleBackend),
}

#[derive(Debug)]
pub(crate) struct BleBackend {
    pub(crate) device: AnyBleDevice,
    pub(crate) writer: PinCommandWriter,
}

/// A remote board reached over HTTP or Bluetooth LE.
///
/// # Examples
///
/// ```no_run
/// use pinbridge_board::Board;
/// use pinbridge_core::HttpConfig;
///
/// #[tokio::main]
/// async fn main() -> pinbridge_core::Result<()> {
///     let board = Board::http("garage", &HttpConfig::new("http://192.168.4.1"))?;
///
///     let relay = board.gpio_pin_by_name("4");
///     relay.set(true).await?;
///     println!("relay high: {}", relay.get().await?);
///
///     board.close();
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Board {
    name: String,
    backend: Backend,
    cancel: CancellationToken,
}

impl Board {
    /// Build a board from a validated-on-entry configuration.
    ///
    /// `adapter` is only used for BLE configurations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigInvalid` if the configuration is missing its required
    /// field, `AdapterUnavailable` if a BLE board is configured without an
    /// adapter, and otherwise the errors of [`http`](Self::http) or
    /// [`ble`](Self::ble).
    pub async fn from_config(
        name: impl Into<String>,
        config: &BoardConfig,
        adapter: Option<AnyBleAdapter>,
    ) -> Result<Self> {
        let name = name.into();
        config.validate(&name)?;

        match config {
            BoardConfig::Http(http) => Self::http(name, http),
            BoardConfig::Ble(ble) => {
                let adapter = adapter.ok_or_else(|| {
                    Error::AdapterUnavailable("no Bluetooth adapter available".to_string())
                })?;
                Self::ble(name, ble, adapter).await
            }
        }
    }

    /// Build a board backed by the HTTP firmware endpoints.
    ///
    /// No request is made until the first pin operation.
    ///
    /// # Errors
    ///
    /// Returns `TransportUnavailable` if the HTTP client cannot be created.
    pub fn http(name: impl Into<String>, config: &HttpConfig) -> Result<Self> {
        let name = name.into();
        let client = HttpPinClient::new(config)?;
        info!(board = %name, url = %client.base_url(), "HTTP board ready");

        Ok(Self::with_backend(name, Backend::Http(client)))
    }

    /// Build a board by discovering and connecting to its BLE peripheral.
    ///
    /// # Errors
    ///
    /// Returns `AdapterUnavailable`, `ScanFailed`, `DiscoveryTimeout` or
    /// `ConnectFailed` from discovery.
    pub async fn ble(
        name: impl Into<String>,
        config: &BleConfig,
        adapter: AnyBleAdapter,
    ) -> Result<Self> {
        let name = name.into();
        let mut discovery = BleDiscovery::new(
            Arc::new(adapter),
            config.bt_server_name.clone(),
            config.discovery_timeout(),
        );
        let device = discovery.run().await?;
        info!(board = %name, peripheral = %config.bt_server_name, "BLE board ready");

        Ok(Self::with_backend(
            name,
            Backend::Ble(BleBackend {
                device,
                writer: PinCommandWriter::new(),
            }),
        ))
    }

    fn with_backend(name: String, backend: Backend) -> Self {
        Self {
            name,
            backend,
            cancel: CancellationToken::new(),
        }
    }

    /// Board name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Transport this board is bound to.
    pub fn backend_kind(&self) -> BackendKind {
        match self.backend {
            Backend::Http(_) => BackendKind::Http,
            Backend::Ble(_) => BackendKind::Ble,
        }
    }

    pub(crate) fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Get an analog pin by name.
    ///
    /// The name is parsed when the pin is read, not here.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` on a BLE board.
    pub fn analog_by_name(&self, name: &str) -> Result<AnalogPin<'_>> {
        match self.backend {
            Backend::Http(_) => Ok(AnalogPin::new(self, name)),
            Backend::Ble(_) => Err(Error::not_supported("AnalogByName")),
        }
    }

    /// Get a GPIO pin by name.
    ///
    /// The name is parsed on every call, so an invalid name surfaces as
    /// `InvalidPin` from the first operation.
    pub fn gpio_pin_by_name(&self, name: &str) -> GpioPin<'_> {
        GpioPin::new(self, name)
    }

    /// Get a digital interrupt by name.
    ///
    /// # Errors
    ///
    /// Always returns `NotSupported`.
    pub fn digital_interrupt_by_name(&self, name: &str) -> Result<DigitalInterrupt<'_>> {
        debug!(board = %self.name, interrupt = name, "Digital interrupt requested");
        Err(Error::not_supported("DigitalInterruptByName"))
    }

    /// Stream ticks from digital interrupts.
    ///
    /// # Errors
    ///
    /// Always returns `NotSupported`.
    pub async fn stream_ticks(&self, interrupts: &[DigitalInterrupt<'_>]) -> Result<()> {
        debug!(board = %self.name, count = interrupts.len(), "Tick stream requested");
        Err(Error::not_supported("StreamTicks"))
    }

    /// Change the board's power mode.
    ///
    /// # Errors
    ///
    /// Always returns `NotSupported`.
    pub async fn set_power_mode(&self, mode: PowerMode, duration: Option<Duration>) -> Result<()> {
        debug!(board = %self.name, %mode, ?duration, "Power mode change requested");
        Err(Error::not_supported("SetPowerMode"))
    }

    /// Run a free-form command.
    ///
    /// # Errors
    ///
    /// Always returns `NotSupported`.
    pub async fn do_command(&self, command: &Map<String, Value>) -> Result<Map<String, Value>> {
        debug!(board = %self.name, keys = command.len(), "Command requested");
        Err(Error::not_supported("DoCommand"))
    }

    /// Mark the board as closed.
    ///
    /// Calls in flight are not aborted and the BLE link stays up; operations
    /// issued afterwards still reach the backend.
    pub fn close(&self) {
        if !self.cancel.is_cancelled() {
            info!(board = %self.name, backend = %self.backend_kind(), "Closing board");
        }
        self.cancel.cancel();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token cancelled when the board is closed.
    ///
    /// Hosts can tie their own background work to the board's lifetime.
    pub fn closed_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }
}
