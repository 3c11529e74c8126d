//! Rail enable output as an `embedded-hal` [`OutputPin`].
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO configured by `hw_init`.
//! On host/test: writes the simulated pin bank in `hw_init`.

use embedded_hal::digital::{Error, ErrorKind, ErrorType, OutputPin};

use crate::drivers::hw_init;

/// A failed level write, carrying the ESP-IDF error code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioError(pub i32);

impl Error for GpioError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// One relay-driver output, active HIGH.
#[derive(Debug)]
pub struct RailPin {
    gpio: i32,
}

impl RailPin {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl ErrorType for RailPin {
    type Error = GpioError;
}

impl OutputPin for RailPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, false).map_err(GpioError)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, true).map_err(GpioError)
    }
}
