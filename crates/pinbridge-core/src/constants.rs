//! Wire-level constants shared by the HTTP and BLE backends.
//!
//! Both backends speak the same JSON command bodies to the remote board, so
//! the pin state encoding and the endpoint/characteristic identifiers are
//! kept in one place.
//!
//! # Pin State Encoding
//!
//! | Meaning | Wire value |
//! |---------|------------|
//! | Low / `false` | [`STATE_LOW`] (0) |
//! | High / `true` | [`STATE_HIGH`] (100) |
//! | PWM duty `d` (0.0-1.0) | `round(d * 100)` |
//!
//! # Usage
//!
//! ```
//! use pinbridge_core::constants::*;
//! use std::time::Duration;
//!
//! assert_eq!(READ_PINS_PATH, "/read-pins");
//! let deadline = Duration::from_millis(DEFAULT_DISCOVERY_TIMEOUT_MS);
//! assert_eq!(deadline.as_secs(), 10);
//! ```

use uuid::{Uuid, uuid};

// ============================================================================
// Pin State
// ============================================================================

/// Wire state for a low pin.
pub const STATE_LOW: u8 = 0;

/// Wire state for a high pin.
///
/// A boolean read is `true` only when the remote reports exactly this value.
pub const STATE_HIGH: u8 = 100;

// ============================================================================
// HTTP Endpoints
// ============================================================================

/// Path appended to the base URL for pin reads.
pub const READ_PINS_PATH: &str = "/read-pins";

/// Path appended to the base URL for pin writes.
pub const WRITE_PINS_PATH: &str = "/write-pins";

/// Content type of every request body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

// ============================================================================
// Bluetooth
// ============================================================================

/// GATT characteristic that accepts pin write commands.
///
/// # Examples
///
/// ```
/// use pinbridge_core::constants::PIN_WRITE_CHARACTERISTIC_UUID;
///
/// assert_eq!(
///     PIN_WRITE_CHARACTERISTIC_UUID.to_string(),
///     "c79b2ca7-f39d-4060-8168-816fa26737b7"
/// );
/// ```
pub const PIN_WRITE_CHARACTERISTIC_UUID: Uuid = uuid!("c79b2ca7-f39d-4060-8168-816fa26737b7");

/// Default time allowed for finding the named peripheral (milliseconds).
///
/// This is the only deadline enforced by default; HTTP requests have none.
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 10_000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_bounds() {
        assert!(STATE_LOW < STATE_HIGH);
        assert_eq!(STATE_HIGH, 100);
    }

    #[test]
    fn test_paths_are_rooted() {
        assert!(READ_PINS_PATH.starts_with('/'));
        assert!(WRITE_PINS_PATH.starts_with('/'));
    }
}
