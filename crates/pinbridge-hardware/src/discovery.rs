//! Bluetooth LE peripheral discovery.
//!
//! Discovery finds a peripheral by its advertised name and connects to it:
//!
//! ```text
//! Idle ─> Enabling ─┬─> AdapterError
//!                   └─> Scanning ─┬─> Found ─> Connecting ─┬─> Connected
//!                                 ├─> TimedOut             └─> ConnectError
//!                                 └─> ScanError
//! ```
//!
//! The scan runs on its own Tokio task. Its callback signals a match through
//! a capacity-1 channel with `try_send`, so the callback never blocks and the
//! first match is the only one delivered. The waiting side races that signal
//! against the scan task finishing with an error and against the deadline.
//!
//! Name matching ignores case. Only the first match is connected to, even if
//! the radio keeps reporting the same peripheral.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use pinbridge_core::{Error, Result};
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

use crate::traits::BleAdapter;
use crate::types::{ScanControl, ScanResult};

/// Discovery progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscoveryState {
    Idle,
    Enabling,
    AdapterError,
    Scanning,
    Found,
    TimedOut,
    ScanError,
    Connecting,
    Connected,
    ConnectError,
}

impl DiscoveryState {
    /// Check if moving to `target` follows the discovery flow.
    pub fn can_transition_to(&self, target: &DiscoveryState) -> bool {
        use DiscoveryState::*;
        matches!(
            (self, target),
            (Idle, Enabling)
                | (Enabling, AdapterError | Scanning)
                | (Scanning, Found | TimedOut | ScanError)
                | (Found, Connecting)
                | (Connecting, Connected | ConnectError)
        )
    }

    /// Whether discovery has finished, successfully or not.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::AdapterError
                | Self::TimedOut
                | Self::ScanError
                | Self::Connected
                | Self::ConnectError
        )
    }
}

impl fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Finds and connects to one named peripheral.
///
/// A discovery runs once; calling [`run`](Self::run) again after it finished
/// returns an error without touching the radio.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::time::Duration;
/// use pinbridge_hardware::discovery::{BleDiscovery, DiscoveryState};
/// use pinbridge_hardware::mock::{MockBleAdapter, MockBleDevice};
/// use pinbridge_hardware::types::ScanResult;
///
/// #[tokio::main]
/// async fn main() -> pinbridge_core::Result<()> {
///     let adapter = MockBleAdapter::new()
///         .advertise(ScanResult::named("ESP32-Board", "AA:02"))
///         .with_device(MockBleDevice::new().with_pin_service());
///
///     let mut discovery =
///         BleDiscovery::new(Arc::new(adapter), "esp32-board", Duration::from_secs(10));
///     let _device = discovery.run().await?;
///
///     assert_eq!(discovery.state(), DiscoveryState::Connected);
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct BleDiscovery<A: BleAdapter> {
    adapter: Arc<A>,
    target_name: String,
    timeout: Duration,
    state: DiscoveryState,
    history: Vec<DiscoveryState>,
}

impl<A: BleAdapter> BleDiscovery<A> {
    /// Create a discovery for `target_name` with an overall deadline.
    ///
    /// The deadline starts once the radio is enabled and covers the scan
    /// only, not connecting.
    pub fn new(adapter: Arc<A>, target_name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            adapter,
            target_name: target_name.into(),
            timeout,
            state: DiscoveryState::Idle,
            history: vec![DiscoveryState::Idle],
        }
    }

    /// Current state.
    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn history(&self) -> &[DiscoveryState] {
        &self.history
    }

    /// Advertised name being looked for.
    pub fn target_name(&self) -> &str {
        &self.target_name
    }

    /// Enable the radio, scan for the target and connect to it.
    ///
    /// # Errors
    ///
    /// - `AdapterUnavailable` if the radio cannot be enabled
    /// - `ScanFailed` if the scan cannot start or aborts
    /// - `DiscoveryTimeout` if no match is seen before the deadline
    /// - `ConnectFailed` if the matched peripheral refuses the link
    /// - `DiscoveryFinished` if this discovery already ran
    pub async fn run(&mut self) -> Result<A::Device> {
        if self.state != DiscoveryState::Idle {
            return Err(Error::DiscoveryFinished {
                name: self.target_name.clone(),
                state: self.state.to_string(),
            });
        }

        self.transition_to(DiscoveryState::Enabling);
        if let Err(e) = self.adapter.enable().await {
            error!("Failed to enable Bluetooth adapter: {}", e);
            self.transition_to(DiscoveryState::AdapterError);
            return Err(match e {
                Error::AdapterUnavailable(_) => e,
                other => Error::AdapterUnavailable(other.to_string()),
            });
        }

        self.transition_to(DiscoveryState::Scanning);
        info!(
            target_name = %self.target_name,
            timeout_ms = self.timeout.as_millis() as u64,
            "Scanning for peripheral"
        );

        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        let (found_tx, mut found_rx) = mpsc::channel::<ScanResult>(1);
        let callback = match_callback(self.target_name.clone(), found_tx);
        let adapter = Arc::clone(&self.adapter);
        let mut scan_task = tokio::spawn(async move { adapter.scan(callback).await });
        let mut scan_finished = false;

        let found = loop {
            tokio::select! {
                biased;

                Some(result) = found_rx.recv() => break result,

                joined = &mut scan_task, if !scan_finished => {
                    scan_finished = true;
                    let failure = match joined {
                        Ok(Ok(())) => {
                            debug!("Scan ended without a match, waiting for deadline");
                            continue;
                        }
                        Ok(Err(Error::ScanFailed(reason))) => reason,
                        Ok(Err(other)) => other.to_string(),
                        Err(join_error) => join_error.to_string(),
                    };
                    error!("Bluetooth scan failed: {}", failure);
                    self.transition_to(DiscoveryState::ScanError);
                    return Err(Error::ScanFailed(failure));
                }

                () = &mut deadline => {
                    warn!(
                        "No peripheral named '{}' found within {:?}",
                        self.target_name, self.timeout
                    );
                    scan_task.abort();
                    self.transition_to(DiscoveryState::TimedOut);
                    return Err(Error::DiscoveryTimeout {
                        name: self.target_name.clone(),
                        timeout_ms: self.timeout.as_millis() as u64,
                    });
                }
            }
        };

        self.transition_to(DiscoveryState::Found);
        info!(
            peripheral = found.name().unwrap_or_default(),
            address = %found.address,
            rssi = ?found.rssi,
            "Found target peripheral"
        );

        self.transition_to(DiscoveryState::Connecting);
        match self.adapter.connect(&found).await {
            Ok(device) => {
                self.transition_to(DiscoveryState::Connected);
                info!("Connected to {}", found);
                Ok(device)
            }
            Err(e) => {
                error!("Failed to connect to {}: {}", found, e);
                self.transition_to(DiscoveryState::ConnectError);
                Err(match e {
                    Error::ConnectFailed { .. } => e,
                    other => Error::ConnectFailed {
                        address: found.address.clone(),
                        reason: other.to_string(),
                    },
                })
            }
        }
    }

    fn transition_to(&mut self, next: DiscoveryState) {
        debug_assert!(
            self.state.can_transition_to(&next),
            "invalid discovery transition {} -> {}",
            self.state,
            next
        );
        debug!("Discovery state: {} -> {}", self.state, next);
        self.state = next;
        self.history.push(next);
    }
}

/// Build the scan callback that reports the first advertisement named
/// `target_name`.
fn match_callback(
    target_name: String,
    found_tx: mpsc::Sender<ScanResult>,
) -> impl FnMut(&ScanResult) -> ScanControl + Send + 'static {
    let target = target_name.to_lowercase();
    let mut signalled = false;

    move |result| {
        let Some(name) = result.name() else {
            return ScanControl::Continue;
        };
        info!(peripheral = name, address = %result.address, rssi = ?result.rssi, "Advertisement");

        if name.to_lowercase() != target {
            return ScanControl::Continue;
        }
        if signalled {
            trace!("Dropping repeated match for {}", result);
            return ScanControl::Stop;
        }

        match found_tx.try_send(result.clone()) {
            Ok(()) => {
                signalled = true;
                ScanControl::Stop
            }
            Err(e) => {
                trace!("Dropping match for {}: {}", result, e);
                ScanControl::Stop
            }
        }
    }
}
