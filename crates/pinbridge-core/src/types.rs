use crate::{
    Result,
    constants::{STATE_HIGH, STATE_LOW},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pin number on the remote board.
///
/// Pins are addressed by name in the host API, but both backends only
/// understand the integer form, so names are parsed on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PinAddress(u32);

impl PinAddress {
    /// Create a pin address from a raw pin number.
    #[must_use]
    pub fn new(pin: u32) -> Self {
        PinAddress(pin)
    }

    /// Get the raw pin number.
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PinAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PinAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let pin: u32 = s.parse().map_err(|_| Error::InvalidPin {
            name: s.to_string(),
        })?;
        Ok(PinAddress(pin))
    }
}

/// Duty value written to a pin, in the range 0-100.
///
/// The same encoding carries both boolean levels (0 or 100) and PWM
/// percentages on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PinState(u8);

impl PinState {
    /// Low level (0).
    pub const LOW: PinState = PinState(STATE_LOW);

    /// High level (100).
    pub const HIGH: PinState = PinState(STATE_HIGH);

    /// Create a pin state with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidDutyCycle` if `state` is greater than 100.
    pub fn new(state: u8) -> Result<Self> {
        if state > STATE_HIGH {
            return Err(Error::InvalidDutyCycle {
                duty: f64::from(state) / 100.0,
            });
        }
        Ok(PinState(state))
    }

    /// Map a boolean level to its wire state.
    #[must_use]
    pub fn from_level(high: bool) -> Self {
        if high { Self::HIGH } else { Self::LOW }
    }

    /// Convert a duty cycle fraction (0.0-1.0) into a wire state.
    ///
    /// The fraction is scaled by 100 and rounded to the nearest integer.
    ///
    /// # Errors
    /// Returns `Error::InvalidDutyCycle` for values outside `[0, 1]` or NaN.
    pub fn from_duty_cycle(duty: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&duty) {
            return Err(Error::InvalidDutyCycle { duty });
        }
        Ok(PinState((duty * 100.0).round() as u8))
    }

    /// Interpret a raw numeric reading as a boolean level.
    ///
    /// Only an exact `100` reads as high; every other value is low.
    #[must_use]
    pub fn reading_is_high(raw: f64) -> bool {
        raw == f64::from(STATE_HIGH)
    }

    /// Get the raw state value.
    #[must_use]
    pub fn as_u8(&self) -> u8 {
        self.0
    }

    /// Returns `true` if this is the canonical high state.
    #[must_use]
    pub fn is_high(&self) -> bool {
        self.0 == STATE_HIGH
    }
}

impl TryFrom<u8> for PinState {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        PinState::new(value)
    }
}

impl From<PinState> for u8 {
    fn from(state: PinState) -> Self {
        state.0
    }
}

impl fmt::Display for PinState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Analog reading returned by an analog pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalogValue {
    /// Raw value reported by the remote board, truncated to an integer.
    pub value: i32,
}

/// Board power modes accepted by the host API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerMode {
    Normal,
    OfflineDeep,
}

impl fmt::Display for PowerMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PowerMode::Normal => write!(f, "normal"),
            PowerMode::OfflineDeep => write!(f, "offline_deep"),
        }
    }
}
