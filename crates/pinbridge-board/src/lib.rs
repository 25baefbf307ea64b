//! Board facade for pinbridge.
//!
//! A [`Board`] exposes the pins of a remote microcontroller and forwards each
//! pin operation to the backend chosen by its configuration: JSON over HTTP,
//! or JSON written to a Bluetooth LE characteristic.
//!
//! | Operation            | HTTP            | BLE             |
//! |----------------------|-----------------|-----------------|
//! | `GpioPin::set`       | `/write-pins`   | characteristic  |
//! | `GpioPin::get`       | `/read-pins`    | `NotSupported`  |
//! | `GpioPin::pwm`       | `/read-pins`    | `NotSupported`  |
//! | `GpioPin::set_pwm`   | `/write-pins`   | `NotSupported`  |
//! | `AnalogPin::read`    | `/read-pins`    | `NotSupported`  |
//!
//! PWM frequency, analog writes, digital interrupts, power modes and
//! free-form commands are not supported by either backend.

pub mod board;
pub mod pins;

pub use board::{BackendKind, Board};
pub use pins::{AnalogPin, DigitalInterrupt, GpioPin};
