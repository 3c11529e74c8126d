//! System configuration parameters
//!
//! All tunable parameters for the SunRail arbiter.  Defaults are the
//! reference values; a JSON override can be baked in at build time
//! (see `main.rs`) without touching the arbitration logic.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::sensors::calibration::RAW_FULL_SCALE;

/// Largest accepted confirmation window (cycles).
pub const MAX_CONFIRM_CYCLES: u8 = 8;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Zones ---
    /// Lower bound (inclusive) of the hot zone, °C.
    pub too_hot_c: i32,
    /// Upper bound (inclusive) of the cold zone, °C.
    pub too_cold_c: i32,

    // --- Solar ---
    /// Minimum solar-sense ADC count deemed sufficient.
    pub solar_threshold_raw: u16,

    // --- Debounce ---
    /// Consecutive agreeing hot-zone cycles required before a rail switch.
    pub confirm_cycles: u8,

    // --- Timing ---
    /// Gap between deasserting one rail and asserting the other (ms).
    pub rail_settle_ms: u32,
    /// Wait after triggering an ADC conversion (ms).
    pub adc_settle_ms: u32,
    /// Nominal period between control cycles (ms).
    pub cycle_interval_ms: u32,
    /// Low-power wake period; the watchdog is fed on every wake (ms).
    pub wake_interval_ms: u32,

    // --- Plausibility ---
    /// Readings below this are reported as a sensor fault, °C.
    pub plausible_min_c: i32,
    /// Readings above this are reported as a sensor fault, °C.
    pub plausible_max_c: i32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            too_hot_c: 30,
            too_cold_c: 15,

            solar_threshold_raw: 12,

            confirm_cycles: 3,

            rail_settle_ms: 5,
            adc_settle_ms: 1,
            cycle_interval_ms: 6_000,
            wake_interval_ms: 2_000,

            plausible_min_c: -40,
            plausible_max_c: 125,
        }
    }
}

impl SystemConfig {
    /// Reject configurations the arbiter cannot run safely with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.too_cold_c >= self.too_hot_c {
            return Err(Error::Config("too_cold_c must be below too_hot_c"));
        }
        if self.confirm_cycles == 0 || self.confirm_cycles > MAX_CONFIRM_CYCLES {
            return Err(Error::Config("confirm_cycles must be within 1..=8"));
        }
        if self.solar_threshold_raw > RAW_FULL_SCALE {
            return Err(Error::Config("solar_threshold_raw exceeds the 10-bit full scale"));
        }
        if self.cycle_interval_ms == 0 || self.wake_interval_ms == 0 {
            return Err(Error::Config("intervals must be non-zero"));
        }
        if self.wake_interval_ms > self.cycle_interval_ms {
            return Err(Error::Config("wake_interval_ms must not exceed cycle_interval_ms"));
        }
        if self.plausible_min_c >= self.plausible_max_c {
            return Err(Error::Config("plausible_min_c must be below plausible_max_c"));
        }
        if self.too_cold_c < self.plausible_min_c || self.too_hot_c > self.plausible_max_c {
            return Err(Error::Config("zone thresholds must lie inside the plausible window"));
        }
        Ok(())
    }

    /// Parse a (possibly partial) JSON override on top of the defaults and
    /// validate the result.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON override"))?;
        config.validate()?;
        Ok(config)
    }
}
