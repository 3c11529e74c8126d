//! Safety supervisor.
//!
//! The supervisor runs **every cycle before the arbiter** and decides
//! whether the temperature reading may drive the rails at all.
//!
//! ## Fault lifecycle
//!
//! 1. A read fails, the raw count is saturated, or the converted value is
//!    outside the plausibility window.
//! 2. The supervisor latches the fault and logs the rising edge once.
//! 3. The arbiter receives `Observation::Fault` and drops both rails.
//! 4. The first valid reading clears the latch (logged once) and normal
//!    zone logic resumes on that same cycle.

use crate::config::SystemConfig;
use crate::error::SensorFault;
use crate::sensors::temperature::TemperatureReading;
use log::{error, info};

/// Safety supervisor.
pub struct SafetySupervisor {
    plausible_min_c: i32,
    plausible_max_c: i32,
    /// Latched fault, if the last reading was rejected.
    latched: Option<SensorFault>,
    /// Rejected readings since boot.
    fault_count: u32,
}

impl SafetySupervisor {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            plausible_min_c: config.plausible_min_c,
            plausible_max_c: config.plausible_max_c,
            latched: None,
            fault_count: 0,
        }
    }

    /// Vet one temperature read.  Returns the usable °C value, or the fault
    /// that should be fed to the arbiter instead.
    pub fn evaluate(
        &mut self,
        reading: Result<TemperatureReading, SensorFault>,
    ) -> Result<i32, SensorFault> {
        let verdict = reading.and_then(|r| {
            if (self.plausible_min_c..=self.plausible_max_c).contains(&r.celsius) {
                Ok(r.celsius)
            } else {
                Err(SensorFault::Implausible)
            }
        });

        match verdict {
            Ok(_) => {
                if let Some(prev) = self.latched.take() {
                    info!("SENSOR FAULT CLEARED: {prev}");
                }
            }
            Err(fault) => {
                self.fault_count = self.fault_count.saturating_add(1);
                if self.latched != Some(fault) {
                    error!("SENSOR FAULT SET: {fault}");
                }
                self.latched = Some(fault);
            }
        }

        verdict
    }

    /// The currently latched fault.
    pub fn fault(&self) -> Option<SensorFault> {
        self.latched
    }

    pub fn has_fault(&self) -> bool {
        self.latched.is_some()
    }

    /// Rejected readings since boot.
    pub fn fault_count(&self) -> u32 {
        self.fault_count
    }
}
