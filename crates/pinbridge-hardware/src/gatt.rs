//! Pin writes over a GATT characteristic.
//!
//! The firmware exposes one writable characteristic that accepts the same
//! JSON write body the HTTP backend POSTs to `/write-pins`. Writes go out
//! without response, so success only means the radio accepted the bytes.
//!
//! The characteristic is looked up again on every write. Nothing is cached
//! between calls.

use pinbridge_core::{
    Error, PinAddress, PinState, Result, constants::PIN_WRITE_CHARACTERISTIC_UUID,
};
use pinbridge_protocol::PinCodec;
use tracing::{debug, error, trace};
use uuid::Uuid;

use crate::traits::BleDevice;
use crate::types::GattCharacteristic;

/// Writes pin commands to a connected peripheral.
#[derive(Debug, Clone, Copy)]
pub struct PinCommandWriter {
    characteristic_uuid: Uuid,
    codec: PinCodec,
}

impl PinCommandWriter {
    /// Create a writer targeting the firmware's pin-write characteristic.
    pub fn new() -> Self {
        Self::with_characteristic(PIN_WRITE_CHARACTERISTIC_UUID)
    }

    /// Create a writer targeting another characteristic.
    pub fn with_characteristic(characteristic_uuid: Uuid) -> Self {
        Self {
            characteristic_uuid,
            codec: PinCodec::new(),
        }
    }

    /// Characteristic UUID written to.
    pub fn characteristic_uuid(&self) -> Uuid {
        self.characteristic_uuid
    }

    /// Encode and write one pin state.
    ///
    /// # Errors
    ///
    /// - `TransportUnavailable` if services cannot be enumerated or the
    ///   write is refused
    /// - `CharacteristicNotFound` if no service carries the characteristic
    pub async fn write_pin<D: BleDevice>(
        &self,
        device: &D,
        pin: PinAddress,
        state: PinState,
    ) -> Result<()> {
        let characteristic = self.resolve(device).await?;
        let body = self.codec.encode_write(pin, state)?;

        debug!(
            %pin,
            %state,
            body = %String::from_utf8_lossy(&body),
            "Writing pin command"
        );

        device
            .write_without_response(&characteristic, &body)
            .await
            .map_err(|e| {
                error!("Failed to write pin command: {}", e);
                match e {
                    Error::TransportUnavailable(_) => e,
                    other => Error::transport(other),
                }
            })
    }

    /// Find the first service exposing the target characteristic.
    ///
    /// Services whose characteristics cannot be listed are skipped.
    async fn resolve<D: BleDevice>(&self, device: &D) -> Result<GattCharacteristic> {
        let services = device.discover_services().await.map_err(|e| {
            error!("Failed to discover services: {}", e);
            Error::transport(format!("failed to discover services: {e}"))
        })?;

        let filter = [self.characteristic_uuid];
        for service in &services {
            match device.discover_characteristics(service, &filter).await {
                Ok(characteristics) => {
                    if let Some(found) = characteristics
                        .into_iter()
                        .find(|c| c.uuid == self.characteristic_uuid)
                    {
                        trace!(service = %service.uuid, "Resolved pin characteristic");
                        return Ok(found);
                    }
                }
                Err(e) => {
                    debug!(service = %service.uuid, "Skipping service: {}", e);
                }
            }
        }

        Err(Error::CharacteristicNotFound {
            uuid: self.characteristic_uuid,
        })
    }
}

impl Default for PinCommandWriter {
    fn default() -> Self {
        Self::new()
    }
}
