//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ArbiterService (domain)
//! ```
//!
//! Driven adapters (ADC, rail relays, event sinks) implement these traits.
//! The [`ArbiterService`](super::service::ArbiterService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::error::{ActuatorError, SensorFault};
use crate::fsm::context::Selection;
use crate::sensors::solar::SolarReading;
use crate::sensors::temperature::TemperatureReading;

// ───────────────────────────────────────────────────────────────
// Analog port (raw converter access)
// ───────────────────────────────────────────────────────────────

/// Analog inputs the firmware samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalogChannel {
    /// On-die temperature sense element.
    DieTemperature,
    /// Solar-rail sense divider.
    SolarSense,
}

/// Converter reference selection.
///
/// Both inputs read against the bandgap: the temperature sensor requires
/// it and the solar divider is scaled for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoltageReference {
    /// Internal 1.1 V bandgap.
    Internal1V1,
}

/// Sample timing applied before a conversion.
///
/// The temperature sensor needs at least 32 µs of settle time: an init
/// delay plus a sample-length/sample-delay pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleTiming {
    pub reference: VoltageReference,
    /// Delay after enabling the converter, in ADC clock cycles.
    pub init_delay_clocks: u16,
    /// Sample length, in ADC clock cycles.
    pub sample_len: u8,
    /// Sampling delay, in ADC clock cycles.
    pub sample_delay: u8,
    /// Reduced sample capacitance (recommended for references ≥ 1 V).
    pub reduced_sample_cap: bool,
    /// Number of samples accumulated per result.
    pub accumulate: u8,
}

/// Register-level converter access.
///
/// One conversion is `configure` → `trigger` → settle delay → `result`.
/// The settle delay is owned by the caller.
pub trait AnalogPort {
    /// Select the channel and program reference and sample timing.
    fn configure(&mut self, channel: AnalogChannel, timing: &SampleTiming)
    -> Result<(), SensorFault>;

    /// Start a single conversion on the configured channel.
    fn trigger(&mut self, channel: AnalogChannel) -> Result<(), SensorFault>;

    /// Raw result of the last conversion (unmasked).
    fn result(&mut self, channel: AnalogChannel) -> Result<u16, SensorFault>;
}

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// One calibrated temperature conversion.
    fn read_temperature(&mut self) -> Result<TemperatureReading, SensorFault>;

    /// One raw read of the solar-sense input, judged against the threshold.
    fn read_solar(&mut self) -> Result<SolarReading, SensorFault>;
}

// ───────────────────────────────────────────────────────────────
// Rail port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to select a power rail.
///
/// Implementations deassert the losing rail, wait the settle delay, then
/// assert the winner.  Both rails are never asserted at the same time.
pub trait RailPort {
    /// Drive the outputs to `selection`.  No-op if already there.
    fn apply(&mut self, selection: Selection) -> Result<(), ActuatorError>;

    /// The selection currently on the wire.
    fn selection(&self) -> Selection;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → diagnostics)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Sink that drops every event.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &super::events::AppEvent) {}
}

// ───────────────────────────────────────────────────────────────
// Scheduler delegate
// ───────────────────────────────────────────────────────────────

/// Callback the [`Scheduler`](crate::scheduler::Scheduler) invokes when a
/// control cycle is due.  The main loop implements it by running one
/// service tick.
pub trait SchedulerDelegate {
    /// `cycle` is the 1-based count of cycles fired since boot.
    fn on_cycle_due(&mut self, cycle: u64);
}
