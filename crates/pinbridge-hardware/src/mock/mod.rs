//! Mock Bluetooth LE implementations for testing and development.
//!
//! The mocks are scripted up front with builder methods and report what was
//! done to them through cloneable handles, so tests can hand the mock itself
//! to a board and still inspect it afterwards.

pub mod adapter;
pub mod device;

pub use adapter::{MockBleAdapter, MockBleAdapterHandle};
pub use device::{MockBleDevice, MockBleDeviceHandle, RecordedWrite};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock a mock's shared log, recovering it if a test thread panicked.
fn lock<T>(log: &Mutex<T>) -> MutexGuard<'_, T> {
    log.lock().unwrap_or_else(PoisonError::into_inner)
}
