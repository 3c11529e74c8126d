//! On-die temperature sensor.
//!
//! One reading is a single conversion against the internal 1.1 V
//! reference, masked to 10 bits and converted with the factory
//! [`CalibrationConstants`].  A result pinned at either rail means the
//! converter is not actually measuring anything and is reported as
//! [`SensorFault::Saturated`].

use embedded_hal::delay::DelayNs;

use super::calibration::{CalibrationConstants, RAW_FULL_SCALE, RAW_MASK};
use crate::app::ports::{AnalogChannel, AnalogPort, SampleTiming, VoltageReference};
use crate::error::SensorFault;

/// Sample timing for the temperature channel: internal 1.1 V reference,
/// 64-clock init delay, reduced sample capacitance, no accumulation.
/// Together this exceeds the 32 µs the sense element needs to settle.
pub const TEMPSENSE_TIMING: SampleTiming = SampleTiming {
    reference: VoltageReference::Internal1V1,
    init_delay_clocks: 64,
    sample_len: 31,
    sample_delay: 10,
    reduced_sample_cap: true,
    accumulate: 1,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemperatureReading {
    /// Raw count, already masked to 10 bits.
    pub raw: u16,
    pub celsius: i32,
}

pub struct TemperatureSensor {
    calibration: CalibrationConstants,
    settle_ms: u32,
}

impl TemperatureSensor {
    pub fn new(calibration: CalibrationConstants, settle_ms: u32) -> Self {
        Self {
            calibration,
            settle_ms,
        }
    }

    /// Configure, trigger, wait, read and convert.
    pub fn read<A, D>(&self, adc: &mut A, delay: &mut D) -> Result<TemperatureReading, SensorFault>
    where
        A: AnalogPort,
        D: DelayNs,
    {
        let channel = AnalogChannel::DieTemperature;
        adc.configure(channel, &TEMPSENSE_TIMING)?;
        adc.trigger(channel)?;
        delay.delay_ms(self.settle_ms);
        let raw = adc.result(channel)? & RAW_MASK;

        if raw == 0 || raw == RAW_FULL_SCALE {
            return Err(SensorFault::Saturated);
        }

        Ok(TemperatureReading {
            raw,
            celsius: self.calibration.celsius(raw),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::testing::{FakeAdc, NoDelay};

    #[test]
    fn reads_reference_scenario() {
        let sensor = TemperatureSensor::new(CalibrationConstants::new(200, 192), 1);
        let mut adc = FakeAdc::with_temperature(600);
        let reading = sensor.read(&mut adc, &mut NoDelay::default()).unwrap();
        assert_eq!(reading, TemperatureReading { raw: 600, celsius: 27 });
    }

    #[test]
    fn programs_tempsense_timing_before_triggering() {
        let sensor = TemperatureSensor::new(CalibrationConstants::REFERENCE, 1);
        let mut adc = FakeAdc::with_temperature(600);
        let mut delay = NoDelay::default();
        sensor.read(&mut adc, &mut delay).unwrap();
        assert_eq!(adc.configured, Some((AnalogChannel::DieTemperature, TEMPSENSE_TIMING)));
        assert_eq!(adc.triggers, 1);
        assert_eq!(delay.total_ns, 1_000_000);
    }

    #[test]
    fn upper_bits_are_ignored() {
        let sensor = TemperatureSensor::new(CalibrationConstants::REFERENCE, 1);
        let mut adc = FakeAdc::with_temperature(0xFC00 | 600);
        let reading = sensor.read(&mut adc, &mut NoDelay::default()).unwrap();
        assert_eq!(reading.raw, 600);
    }

    #[test]
    fn rail_pinned_counts_are_saturated() {
        let sensor = TemperatureSensor::new(CalibrationConstants::REFERENCE, 1);
        for raw in [0, RAW_FULL_SCALE] {
            let mut adc = FakeAdc::with_temperature(raw);
            assert_eq!(
                sensor.read(&mut adc, &mut NoDelay::default()),
                Err(SensorFault::Saturated)
            );
        }
    }

    #[test]
    fn converter_errors_propagate() {
        let sensor = TemperatureSensor::new(CalibrationConstants::REFERENCE, 1);
        let mut adc = FakeAdc::failing();
        assert_eq!(
            sensor.read(&mut adc, &mut NoDelay::default()),
            Err(SensorFault::AdcReadFailed)
        );
    }
}
