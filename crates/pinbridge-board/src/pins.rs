//! Pin handles handed out by a [`Board`].
//!
//! Handles borrow their board and hold only the pin name. The name is parsed
//! into a [`PinAddress`] on every call, so a handle for `"abc"` can be created
//! but every operation on it fails with `InvalidPin`.

use pinbridge_core::{AnalogValue, Error, PinAddress, PinState, Result};
use tracing::trace;

use crate::board::{Backend, Board};

/// An analog input pin.
#[derive(Debug, Clone)]
pub struct AnalogPin<'a> {
    board: &'a Board,
    name: String,
}

impl<'a> AnalogPin<'a> {
    pub(crate) fn new(board: &'a Board, name: &str) -> Self {
        Self {
            board,
            name: name.to_string(),
        }
    }

    /// Pin name as given at lookup.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read the pin.
    ///
    /// The reported state is truncated toward zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPin` for a non-numeric name, `NotSupported` on a BLE
    /// board, and otherwise the HTTP client's errors.
    pub async fn read(&self) -> Result<AnalogValue> {
        let pin: PinAddress = self.name.parse()?;
        match self.board.backend() {
            Backend::Http(client) => {
                let state = client.read_pin(pin).await?;
                trace!(%pin, state, "Analog read");
                Ok(AnalogValue {
                    value: state as i32,
                })
            }
            Backend::Ble(_) => Err(Error::not_supported("Read")),
        }
    }

    /// Write an analog value.
    ///
    /// # Errors
    ///
    /// Always returns `NotSupported`.
    pub async fn write(&self, value: i32) -> Result<()> {
        trace!(pin = %self.name, value, "Analog write requested");
        Err(Error::not_supported("Write"))
    }
}

/// A general purpose I/O pin.
#[derive(Debug, Clone)]
pub struct GpioPin<'a> {
    board: &'a Board,
    name: String,
}

impl<'a> GpioPin<'a> {
    pub(crate) fn new(board: &'a Board, name: &str) -> Self {
        Self {
            board,
            name: name.to_string(),
        }
    }

    /// Pin name as given at lookup.
    pub fn name(&self) -> &str {
        &self.name
    }

    fn address(&self) -> Result<PinAddress> {
        self.name.parse()
    }

    /// Drive the pin high or low.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPin` for a non-numeric name, otherwise the backend's
    /// transport errors.
    pub async fn set(&self, high: bool) -> Result<()> {
        let pin = self.address()?;
        match self.board.backend() {
            Backend::Http(client) => client.set_level(pin, high).await,
            Backend::Ble(ble) => {
                ble.writer
                    .write_pin(&ble.device, pin, PinState::from_level(high))
                    .await
            }
        }
    }

    /// Read the pin level; high only if the board reports exactly 100.
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` on a BLE board.
    pub async fn get(&self) -> Result<bool> {
        let pin = self.address()?;
        match self.board.backend() {
            Backend::Http(client) => client.get_level(pin).await,
            Backend::Ble(_) => Err(Error::not_supported("Get")),
        }
    }

    /// Read the PWM state as reported (0-100, not a fraction).
    ///
    /// # Errors
    ///
    /// Returns `NotSupported` on a BLE board.
    pub async fn pwm(&self) -> Result<f64> {
        let pin = self.address()?;
        match self.board.backend() {
            Backend::Http(client) => client.read_pwm(pin).await,
            Backend::Ble(_) => Err(Error::not_supported("PWM")),
        }
    }

    /// Set the PWM duty cycle from a fraction in `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDutyCycle` outside `[0, 1]` and `NotSupported` on a
    /// BLE board.
    pub async fn set_pwm(&self, duty_cycle: f64) -> Result<()> {
        let pin = self.address()?;
        match self.board.backend() {
            Backend::Http(client) => client.set_pwm(pin, duty_cycle).await,
            Backend::Ble(_) => Err(Error::not_supported("SetPWM")),
        }
    }

    /// Read the PWM frequency.
    ///
    /// # Errors
    ///
    /// Always returns `NotSupported`.
    pub async fn pwm_freq(&self) -> Result<u32> {
        Err(Error::not_supported("PWMFreq"))
    }

    /// Set the PWM frequency.
    ///
    /// # Errors
    ///
    /// Always returns `NotSupported`.
    pub async fn set_pwm_freq(&self, freq_hz: u32) -> Result<()> {
        trace!(pin = %self.name, freq_hz, "PWM frequency change requested");
        Err(Error::not_supported("SetPWMFreq"))
    }
}

/// A digital interrupt.
///
/// No backend supports interrupts, so boards never hand one out; the type
/// exists for [`Board::stream_ticks`].
#[derive(Debug, Clone)]
pub struct DigitalInterrupt<'a> {
    board: &'a Board,
    name: String,
}

impl DigitalInterrupt<'_> {
    /// Interrupt name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current tick count.
    ///
    /// # Errors
    ///
    /// Always returns `NotSupported`.
    pub async fn value(&self) -> Result<i64> {
        trace!(board = %self.board.name(), interrupt = %self.name, "Interrupt value requested");
        Err(Error::not_supported("Value"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinbridge_core::HttpConfig;
    use rstest::rstest;

    fn http_board() -> Board {
        Board::http("test-board", &HttpConfig::new("http://192.0.2.1")).unwrap()
    }

    #[rstest]
    #[case("abc")]
    #[case("-3")]
    #[case("")]
    #[tokio::test]
    async fn test_invalid_pin_name_fails_at_call_time(#[case] name: &str) {
        let board = http_board();
        let pin = board.gpio_pin_by_name(name);
        assert_eq!(pin.name(), name);

        assert!(matches!(pin.set(true).await, Err(Error::InvalidPin { .. })));
        assert!(matches!(pin.get().await, Err(Error::InvalidPin { .. })));

        let analog = board.analog_by_name(name).unwrap();
        assert!(matches!(analog.read().await, Err(Error::InvalidPin { .. })));
    }

    #[tokio::test]
    async fn test_pwm_frequency_not_supported() {
        let board = http_board();
        let pin = board.gpio_pin_by_name("3");

        assert!(matches!(pin.pwm_freq().await, Err(Error::NotSupported { .. })));
        assert!(matches!(
            pin.set_pwm_freq(1000).await,
            Err(Error::NotSupported { .. })
        ));
    }

    #[tokio::test]
    async fn test_analog_write_not_supported() {
        let board = http_board();
        let analog = board.analog_by_name("34").unwrap();
        assert!(matches!(analog.write(512).await, Err(Error::NotSupported { .. })));
    }
}
