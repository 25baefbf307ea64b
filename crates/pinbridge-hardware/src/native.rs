//! Host Bluetooth LE radio through btleplug.
//!
//! Enabled with the `hardware-btleplug` feature. Scan results are built from
//! the adapter's event stream: every discovered or updated peripheral is
//! reported with its current properties. Peripherals are addressed by their
//! btleplug id, which is stable for the lifetime of the adapter.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use btleplug::api::{
    Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter, WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use futures::StreamExt;
use pinbridge_core::{Error, Result};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

use crate::traits::{BleAdapter, BleDevice};
use crate::types::{GattCharacteristic, GattService, ScanControl, ScanResult};

/// A host Bluetooth LE radio.
#[derive(Debug)]
pub struct BtleplugAdapter {
    adapter: Adapter,
    seen: Mutex<HashMap<String, PeripheralId>>,
}

impl BtleplugAdapter {
    /// Open the first radio reported by the host.
    ///
    /// # Errors
    ///
    /// Returns `Error::AdapterUnavailable` if the Bluetooth stack cannot be
    /// reached or reports no radios.
    pub async fn first() -> Result<Self> {
        Self::nth(0).await
    }

    /// Open the radio at `index` in the host's adapter list.
    ///
    /// # Errors
    ///
    /// See [`first`](Self::first).
    pub async fn nth(index: usize) -> Result<Self> {
        let manager = Manager::new()
            .await
            .map_err(|e| Error::AdapterUnavailable(format!("Bluetooth stack unavailable: {e}")))?;
        let adapters = manager
            .adapters()
            .await
            .map_err(|e| Error::AdapterUnavailable(format!("failed to list adapters: {e}")))?;
        let adapter = adapters
            .into_iter()
            .nth(index)
            .ok_or_else(|| Error::AdapterUnavailable(format!("no Bluetooth adapter at index {index}")))?;

        Ok(Self {
            adapter,
            seen: Mutex::new(HashMap::new()),
        })
    }

    fn remember(&self, address: &str, id: &PeripheralId) {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(address.to_string(), id.clone());
    }

    fn lookup(&self, address: &str) -> Option<PeripheralId> {
        self.seen
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(address)
            .cloned()
    }

    async fn scan_result(&self, id: &PeripheralId) -> Option<ScanResult> {
        let peripheral = self.adapter.peripheral(id).await.ok()?;
        let properties = peripheral.properties().await.ok()??;
        let address = id.to_string();
        self.remember(&address, id);

        Some(ScanResult {
            local_name: properties.local_name,
            address,
            rssi: properties.rssi,
        })
    }
}

impl BleAdapter for BtleplugAdapter {
    type Device = BtleplugDevice;

    async fn enable(&self) -> Result<()> {
        let info = self
            .adapter
            .adapter_info()
            .await
            .map_err(|e| Error::AdapterUnavailable(e.to_string()))?;
        info!("Using Bluetooth adapter {}", info);
        Ok(())
    }

    fn scan<F>(&self, mut on_result: F) -> impl Future<Output = Result<()>> + Send
    where
        F: FnMut(&ScanResult) -> ScanControl + Send + 'static,
    {
        async move {
            let mut events = self
                .adapter
                .events()
                .await
                .map_err(|e| Error::ScanFailed(e.to_string()))?;
            self.adapter
                .start_scan(ScanFilter::default())
                .await
                .map_err(|e| Error::ScanFailed(e.to_string()))?;
            debug!("Bluetooth scan started");

            while let Some(event) = events.next().await {
                let id = match event {
                    CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => id,
                    _ => continue,
                };
                let Some(result) = self.scan_result(&id).await else {
                    trace!("No properties for {}", id);
                    continue;
                };

                if on_result(&result) == ScanControl::Stop {
                    if let Err(e) = self.adapter.stop_scan().await {
                        warn!("Failed to stop Bluetooth scan: {}", e);
                    }
                    return Ok(());
                }
            }

            debug!("Bluetooth event stream ended");
            Ok(())
        }
    }

    async fn connect(&self, peripheral: &ScanResult) -> Result<BtleplugDevice> {
        let connect_failed = |reason: String| Error::ConnectFailed {
            address: peripheral.address.clone(),
            reason,
        };

        let id = self
            .lookup(&peripheral.address)
            .ok_or_else(|| connect_failed("peripheral was not seen by this adapter".to_string()))?;
        let device = self
            .adapter
            .peripheral(&id)
            .await
            .map_err(|e| connect_failed(e.to_string()))?;
        device
            .connect()
            .await
            .map_err(|e| connect_failed(e.to_string()))?;

        Ok(BtleplugDevice { peripheral: device })
    }
}

/// A peripheral connected through btleplug.
#[derive(Debug)]
pub struct BtleplugDevice {
    peripheral: Peripheral,
}

impl BtleplugDevice {
    fn characteristic(&self, target: &GattCharacteristic) -> Option<Characteristic> {
        self.peripheral
            .characteristics()
            .into_iter()
            .find(|c| c.uuid == target.uuid && c.service_uuid == target.service_uuid)
    }
}

impl BleDevice for BtleplugDevice {
    async fn discover_services(&self) -> Result<Vec<GattService>> {
        self.peripheral
            .discover_services()
            .await
            .map_err(Error::transport)?;

        Ok(self
            .peripheral
            .services()
            .into_iter()
            .filter(|service| service.primary)
            .map(|service| GattService { uuid: service.uuid })
            .collect())
    }

    async fn discover_characteristics(
        &self,
        service: &GattService,
        filter: &[Uuid],
    ) -> Result<Vec<GattCharacteristic>> {
        let found = self
            .peripheral
            .services()
            .into_iter()
            .find(|s| s.uuid == service.uuid)
            .ok_or_else(|| Error::transport(format!("service {} not discovered", service.uuid)))?;

        Ok(found
            .characteristics
            .into_iter()
            .filter(|c| filter.is_empty() || filter.contains(&c.uuid))
            .map(|c| GattCharacteristic {
                uuid: c.uuid,
                service_uuid: c.service_uuid,
            })
            .collect())
    }

    async fn write_without_response(
        &self,
        characteristic: &GattCharacteristic,
        data: &[u8],
    ) -> Result<()> {
        let target = self.characteristic(characteristic).ok_or(Error::CharacteristicNotFound {
            uuid: characteristic.uuid,
        })?;

        self.peripheral
            .write(&target, data, WriteType::WithoutResponse)
            .await
            .map_err(Error::transport)
    }
}
