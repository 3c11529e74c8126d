//! Solar-rail availability probe.
//!
//! A single uncalibrated conversion of the solar sense divider against the
//! 1.1 V bandgap.  The count is only compared against a threshold, so no
//! calibration is applied.

use super::calibration::RAW_MASK;
use crate::app::ports::{AnalogChannel, AnalogPort, SampleTiming, VoltageReference};
use crate::error::SensorFault;

/// Bandgap-referenced read, default converter timing.
pub const SOLAR_SENSE_TIMING: SampleTiming = SampleTiming {
    reference: VoltageReference::Internal1V1,
    init_delay_clocks: 0,
    sample_len: 0,
    sample_delay: 0,
    reduced_sample_cap: false,
    accumulate: 1,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolarReading {
    pub raw: u16,
    /// `raw >= threshold`.
    pub sufficient: bool,
}

pub struct SolarProbe {
    threshold: u16,
}

impl SolarProbe {
    pub fn new(threshold: u16) -> Self {
        Self { threshold }
    }

    pub fn read<A: AnalogPort>(&self, adc: &mut A) -> Result<SolarReading, SensorFault> {
        let channel = AnalogChannel::SolarSense;
        adc.configure(channel, &SOLAR_SENSE_TIMING)?;
        adc.trigger(channel)?;
        let raw = adc.result(channel)? & RAW_MASK;
        Ok(SolarReading {
            raw,
            sufficient: raw >= self.threshold,
        })
    }
}
