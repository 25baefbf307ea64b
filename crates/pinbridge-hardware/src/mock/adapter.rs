//! Mock Bluetooth LE radio.
//!
//! A [`MockBleAdapter`] replays a scripted list of advertisements to the scan
//! callback and hands out a [`MockBleDevice`] on connect.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pinbridge_core::{Error, Result};

use super::{MockBleDevice, lock};
use crate::traits::BleAdapter;
use crate::types::{ScanControl, ScanResult};

#[derive(Debug, Default)]
struct AdapterLog {
    enabled: bool,
    delivered: usize,
    stop_requests: usize,
    connects: Vec<String>,
}

/// Mock Bluetooth LE radio.
///
/// By default the scan replays every advertisement once, stops as soon as the
/// callback asks it to, and otherwise keeps scanning forever like a real radio
/// would.
///
/// # Examples
///
/// ```
/// use pinbridge_hardware::mock::{MockBleAdapter, MockBleDevice};
/// use pinbridge_hardware::types::ScanResult;
///
/// let adapter = MockBleAdapter::new()
///     .advertise(ScanResult::named("thermostat", "AA:01"))
///     .advertise(ScanResult::named("esp32", "AA:02"))
///     .with_device(MockBleDevice::new().with_pin_service());
/// let handle = adapter.handle();
/// assert!(!handle.is_enabled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockBleAdapter {
    advertisements: Vec<ScanResult>,
    interval: Duration,
    enable_delay: Duration,
    ignore_stop: bool,
    end_after_advertisements: bool,
    enable_error: Option<String>,
    scan_error: Option<String>,
    connect_error: Option<String>,
    device: MockBleDevice,
    log: Arc<Mutex<AdapterLog>>,
}

impl MockBleAdapter {
    /// Create a radio that sees no advertisements.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an advertisement to the scan script.
    pub fn advertise(mut self, result: ScanResult) -> Self {
        self.advertisements.push(result);
        self
    }

    /// Wait this long before delivering each advertisement.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Take this long to power the radio up.
    pub fn with_enable_delay(mut self, delay: Duration) -> Self {
        self.enable_delay = delay;
        self
    }

    /// Keep delivering advertisements after the callback asked to stop.
    pub fn ignore_stop(mut self) -> Self {
        self.ignore_stop = true;
        self
    }

    /// End the scan once the script is exhausted instead of idling.
    pub fn end_scan_after_advertisements(mut self) -> Self {
        self.end_after_advertisements = true;
        self
    }

    /// Make `enable` fail.
    pub fn fail_enable(mut self, reason: impl Into<String>) -> Self {
        self.enable_error = Some(reason.into());
        self
    }

    /// Make the scan fail before delivering anything.
    pub fn fail_scan(mut self, reason: impl Into<String>) -> Self {
        self.scan_error = Some(reason.into());
        self
    }

    /// Make every connection attempt fail.
    pub fn fail_connect(mut self, reason: impl Into<String>) -> Self {
        self.connect_error = Some(reason.into());
        self
    }

    /// Peripheral returned by a successful connect.
    pub fn with_device(mut self, device: MockBleDevice) -> Self {
        self.device = device;
        self
    }

    /// Get a handle observing this radio and all its clones.
    pub fn handle(&self) -> MockBleAdapterHandle {
        MockBleAdapterHandle {
            log: Arc::clone(&self.log),
        }
    }
}

impl BleAdapter for MockBleAdapter {
    type Device = MockBleDevice;

    async fn enable(&self) -> Result<()> {
        if !self.enable_delay.is_zero() {
            tokio::time::sleep(self.enable_delay).await;
        }
        if let Some(reason) = &self.enable_error {
            return Err(Error::AdapterUnavailable(reason.clone()));
        }
        lock(&self.log).enabled = true;
        Ok(())
    }

    fn scan<F>(&self, mut on_result: F) -> impl Future<Output = Result<()>> + Send
    where
        F: FnMut(&ScanResult) -> ScanControl + Send + 'static,
    {
        async move {
            if let Some(reason) = &self.scan_error {
                return Err(Error::ScanFailed(reason.clone()));
            }

            for advertisement in &self.advertisements {
                if !self.interval.is_zero() {
                    tokio::time::sleep(self.interval).await;
                }

                lock(&self.log).delivered += 1;
                if on_result(advertisement) == ScanControl::Stop {
                    lock(&self.log).stop_requests += 1;
                    if !self.ignore_stop {
                        return Ok(());
                    }
                }
            }

            if !self.end_after_advertisements {
                std::future::pending::<()>().await;
            }
            Ok(())
        }
    }

    async fn connect(&self, peripheral: &ScanResult) -> Result<MockBleDevice> {
        lock(&self.log).connects.push(peripheral.address.clone());

        match &self.connect_error {
            Some(reason) => Err(Error::ConnectFailed {
                address: peripheral.address.clone(),
                reason: reason.clone(),
            }),
            None => Ok(self.device.clone()),
        }
    }
}

/// Observer for a [`MockBleAdapter`].
#[derive(Debug, Clone)]
pub struct MockBleAdapterHandle {
    log: Arc<Mutex<AdapterLog>>,
}

impl MockBleAdapterHandle {
    /// Whether `enable` succeeded.
    pub fn is_enabled(&self) -> bool {
        lock(&self.log).enabled
    }

    /// Number of advertisements handed to the scan callback.
    pub fn delivered(&self) -> usize {
        lock(&self.log).delivered
    }

    /// Number of times the scan callback asked to stop.
    pub fn stop_requests(&self) -> usize {
        lock(&self.log).stop_requests
    }

    /// Addresses passed to `connect`, in call order.
    pub fn connect_attempts(&self) -> Vec<String> {
        lock(&self.log).connects.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scan_stops_on_request() {
        let adapter = MockBleAdapter::new()
            .advertise(ScanResult::named("a", "01"))
            .advertise(ScanResult::named("b", "02"))
            .advertise(ScanResult::named("c", "03"));
        let handle = adapter.handle();

        adapter
            .scan(|result| {
                if result.name() == Some("b") {
                    ScanControl::Stop
                } else {
                    ScanControl::Continue
                }
            })
            .await
            .unwrap();

        assert_eq!(handle.delivered(), 2);
        assert_eq!(handle.stop_requests(), 1);
    }

    #[tokio::test]
    async fn test_scan_ignoring_stop_delivers_everything() {
        let adapter = MockBleAdapter::new()
            .advertise(ScanResult::named("a", "01"))
            .advertise(ScanResult::named("a", "01"))
            .ignore_stop()
            .end_scan_after_advertisements();
        let handle = adapter.handle();

        adapter.scan(|_| ScanControl::Stop).await.unwrap();

        assert_eq!(handle.delivered(), 2);
        assert_eq!(handle.stop_requests(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scan_idles_after_script() {
        let adapter = MockBleAdapter::new().advertise(ScanResult::named("a", "01"));

        let result = tokio::time::timeout(
            Duration::from_secs(60),
            adapter.scan(|_| ScanControl::Continue),
        )
        .await;
        assert!(result.is_err(), "scan should still be running");
    }

    #[tokio::test]
    async fn test_enable_and_connect_failures() {
        let adapter = MockBleAdapter::new()
            .fail_enable("radio off")
            .fail_connect("out of range");
        let handle = adapter.handle();

        assert!(matches!(
            adapter.enable().await,
            Err(Error::AdapterUnavailable(_))
        ));
        assert!(!handle.is_enabled());

        let result = adapter.connect(&ScanResult::named("a", "01")).await;
        assert!(matches!(result, Err(Error::ConnectFailed { .. })));
        assert_eq!(handle.connect_attempts(), vec!["01".to_string()]);
    }
}
