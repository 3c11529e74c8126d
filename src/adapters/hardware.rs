//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the [`RailDriver`], exposing them through
//! [`SensorPort`] and [`RailPort`].  This is the only module in the
//! system that touches actual hardware.  On non-espidf targets, the
//! underlying drivers use cfg-gated simulation stubs.

use log::{debug, warn};

use crate::app::ports::{
    AnalogChannel, AnalogPort, RailPort, SampleTiming, SensorPort, VoltageReference,
};
use crate::config::SystemConfig;
use crate::drivers::delay::{BoardDelay, board_delay};
use crate::drivers::hw_init::{self, ADC1_CH_SOLAR, ADC1_CH_TEMP};
use crate::drivers::rail_pin::RailPin;
use crate::drivers::rails::RailDriver;
use crate::error::{ActuatorError, SensorFault};
use crate::fsm::context::Selection;
use crate::pins;
use crate::sensors::SensorHub;
use crate::sensors::calibration::CalibrationConstants;
use crate::sensors::solar::{SolarProbe, SolarReading};
use crate::sensors::temperature::{TemperatureReading, TemperatureSensor};

// ── Analog port over the ADC1 oneshot unit ────────────────────

/// Bits dropped to bring the 12-bit ADC1 result onto the 10-bit scale the
/// calibration record was characterised against.
const RESOLUTION_SHIFT: u16 = 2;

fn adc_channel(channel: AnalogChannel) -> u32 {
    match channel {
        AnalogChannel::DieTemperature => ADC1_CH_TEMP,
        AnalogChannel::SolarSense => ADC1_CH_SOLAR,
    }
}

fn slot(channel: AnalogChannel) -> usize {
    match channel {
        AnalogChannel::DieTemperature => 0,
        AnalogChannel::SolarSense => 1,
    }
}

/// [`AnalogPort`] backed by `hw_init`'s ADC1 oneshot unit.
///
/// The oneshot driver converts synchronously, so `trigger` performs the
/// read and `result` hands back the latched count.  Only the reference
/// selection of [`SampleTiming`] maps onto this converter (as an unattenuated
/// input); the remaining timing fields are fixed in silicon.
#[derive(Debug, Default)]
pub struct BoardAdc {
    configured: [bool; 2],
    latched: [Option<u16>; 2],
}

impl BoardAdc {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnalogPort for BoardAdc {
    fn configure(
        &mut self,
        channel: AnalogChannel,
        timing: &SampleTiming,
    ) -> Result<(), SensorFault> {
        let VoltageReference::Internal1V1 = timing.reference;
        let i = slot(channel);
        if !self.configured[i] {
            hw_init::adc1_configure(adc_channel(channel)).map_err(|rc| {
                warn!("adc: configure {channel:?} failed (rc={rc})");
                SensorFault::AdcReadFailed
            })?;
            self.configured[i] = true;
            debug!("adc: {channel:?} set to {:?}", timing.reference);
        }
        self.latched[i] = None;
        Ok(())
    }

    fn trigger(&mut self, channel: AnalogChannel) -> Result<(), SensorFault> {
        let raw12 = hw_init::adc1_read(adc_channel(channel)).map_err(|rc| {
            warn!("adc: read {channel:?} failed (rc={rc})");
            SensorFault::AdcReadFailed
        })?;
        self.latched[slot(channel)] = Some(raw12 >> RESOLUTION_SHIFT);
        Ok(())
    }

    fn result(&mut self, channel: AnalogChannel) -> Result<u16, SensorFault> {
        self.latched[slot(channel)]
            .take()
            .ok_or(SensorFault::AdcReadFailed)
    }
}

// ── Hardware adapter ──────────────────────────────────────────

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensors: SensorHub<BoardAdc, BoardDelay>,
    rails: RailDriver<RailPin, BoardDelay>,
}

impl HardwareAdapter {
    pub fn new(
        sensors: SensorHub<BoardAdc, BoardDelay>,
        rails: RailDriver<RailPin, BoardDelay>,
    ) -> Self {
        Self { sensors, rails }
    }

    /// Wire up the board from the pin map around an already built rail
    /// driver.  `hw_init::init_peripherals` must have run first.
    pub fn board(
        config: &SystemConfig,
        calibration: CalibrationConstants,
        rails: RailDriver<RailPin, BoardDelay>,
    ) -> Self {
        let sensors = SensorHub::new(
            BoardAdc::new(),
            board_delay(),
            TemperatureSensor::new(calibration, config.adc_settle_ms),
            SolarProbe::new(config.solar_threshold_raw),
        );
        Self::new(sensors, rails)
    }
}

/// Rail driver over the board's enable pins.  Built before any fallible
/// init step so a boot failure can still release both rails.
pub fn board_rails(config: &SystemConfig) -> RailDriver<RailPin, BoardDelay> {
    RailDriver::new(
        RailPin::new(pins::SOLAR_ENABLE_GPIO),
        RailPin::new(pins::HOUSE_ENABLE_GPIO),
        board_delay(),
        config.rail_settle_ms,
    )
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_temperature(&mut self) -> Result<TemperatureReading, SensorFault> {
        self.sensors.read_temperature()
    }

    fn read_solar(&mut self) -> Result<SolarReading, SensorFault> {
        self.sensors.read_solar()
    }
}

// ── RailPort implementation ───────────────────────────────────

impl RailPort for HardwareAdapter {
    fn apply(&mut self, selection: Selection) -> Result<(), ActuatorError> {
        self.rails.apply(selection)
    }

    fn selection(&self) -> Selection {
        self.rails.selection()
    }
}
