//! Mock hardware adapter for integration tests.
//!
//! Plays back scripted sensor readings and records every rail call so
//! tests can assert on the full command history without touching real
//! GPIO/ADC registers.

use std::collections::VecDeque;

use sunrail::app::events::AppEvent;
use sunrail::app::ports::{EventSink, RailPort, SensorPort};
use sunrail::error::{ActuatorError, SensorFault};
use sunrail::fsm::context::Selection;
use sunrail::sensors::solar::SolarReading;
use sunrail::sensors::temperature::TemperatureReading;

/// Solar threshold the mock judges raw counts against.
pub const SOLAR_THRESHOLD: u16 = 12;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    temperatures: VecDeque<Result<i32, SensorFault>>,
    solar: VecDeque<Result<u16, SensorFault>>,
    /// Every selection passed to `apply`, in order.
    pub applied: Vec<Selection>,
    /// Number of solar probes taken.
    pub solar_reads: u32,
    /// Make the next `apply` fail.
    pub fail_next_apply: bool,
    on_wire: Selection,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            temperatures: VecDeque::new(),
            solar: VecDeque::new(),
            applied: Vec::new(),
            solar_reads: 0,
            fail_next_apply: false,
            on_wire: Selection::Off,
        }
    }

    /// Queue one cycle that does not consult the solar probe.
    pub fn script(&mut self, celsius: i32) -> &mut Self {
        self.temperatures.push_back(Ok(celsius));
        self
    }

    /// Queue one hot cycle and the solar count its probe will return.
    pub fn script_hot(&mut self, celsius: i32, solar_raw: u16) -> &mut Self {
        self.temperatures.push_back(Ok(celsius));
        self.solar.push_back(Ok(solar_raw));
        self
    }

    pub fn script_fault(&mut self, fault: SensorFault) -> &mut Self {
        self.temperatures.push_back(Err(fault));
        self
    }

    pub fn script_solar_failure(&mut self, celsius: i32) -> &mut Self {
        self.temperatures.push_back(Ok(celsius));
        self.solar.push_back(Err(SensorFault::AdcReadFailed));
        self
    }

    pub fn on_wire(&self) -> Selection {
        self.on_wire
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_temperature(&mut self) -> Result<TemperatureReading, SensorFault> {
        let celsius = self
            .temperatures
            .pop_front()
            .expect("temperature script exhausted")?;
        Ok(TemperatureReading { raw: 600, celsius })
    }

    fn read_solar(&mut self) -> Result<SolarReading, SensorFault> {
        self.solar_reads += 1;
        let raw = self.solar.pop_front().expect("solar script exhausted")?;
        Ok(SolarReading {
            raw,
            sufficient: raw >= SOLAR_THRESHOLD,
        })
    }
}

impl RailPort for MockHardware {
    fn apply(&mut self, selection: Selection) -> Result<(), ActuatorError> {
        self.applied.push(selection);
        if std::mem::take(&mut self.fail_next_apply) {
            self.on_wire = Selection::Off;
            return Err(ActuatorError::GpioWriteFailed);
        }
        self.on_wire = selection;
        Ok(())
    }

    fn selection(&self) -> Selection {
        self.on_wire
    }
}

// ── Recording event sink ──────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events other than per-cycle telemetry.
    pub fn significant(&self) -> Vec<&AppEvent> {
        self.events
            .iter()
            .filter(|e| !matches!(e, AppEvent::Telemetry(_)))
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
