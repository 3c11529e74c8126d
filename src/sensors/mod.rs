//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns the converter, a delay source and both sensor drivers, and
//! is the [`SensorPort`] implementation the control service reads through.

pub mod calibration;
pub mod solar;
pub mod temperature;

use embedded_hal::delay::DelayNs;

use crate::app::ports::{AnalogPort, SensorPort};
use crate::error::SensorFault;
use solar::{SolarProbe, SolarReading};
use temperature::{TemperatureReading, TemperatureSensor};

/// Aggregates the temperature sensor and the solar probe over one converter.
pub struct SensorHub<A, D> {
    adc: A,
    delay: D,
    temperature: TemperatureSensor,
    solar: SolarProbe,
}

impl<A: AnalogPort, D: DelayNs> SensorHub<A, D> {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(adc: A, delay: D, temperature: TemperatureSensor, solar: SolarProbe) -> Self {
        Self {
            adc,
            delay,
            temperature,
            solar,
        }
    }

    #[cfg(test)]
    pub(crate) fn adc_mut(&mut self) -> &mut A {
        &mut self.adc
    }
}

impl<A: AnalogPort, D: DelayNs> SensorPort for SensorHub<A, D> {
    fn read_temperature(&mut self) -> Result<TemperatureReading, SensorFault> {
        self.temperature.read(&mut self.adc, &mut self.delay)
    }

    fn read_solar(&mut self) -> Result<SolarReading, SensorFault> {
        self.solar.read(&mut self.adc)
    }
}
