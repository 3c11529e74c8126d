//! Wake/cycle scheduler.
//!
//! The device idles between wakes (light sleep on the board, a plain
//! sleep on host).  Every wake feeds the watchdog, but a control cycle
//! only runs once enough wake time has accumulated to cover the control
//! cadence.  When that happens the scheduler notifies a
//! [`SchedulerDelegate`]; the main loop implements the delegate to run one
//! [`ArbiterService::tick`](crate::app::service::ArbiterService::tick).
//!
//! ```text
//!   wake ── wake ── wake ── wake ── wake ── wake ── ...
//!    2s      2s      2s      2s      2s      2s
//!                    │                       │
//!                    ▼                       ▼
//!            on_cycle_due(1)         on_cycle_due(2)     (cadence 6s)
//! ```
//!
//! The wake source never touches arbitration state; it only ends the idle
//! period.

use crate::app::ports::SchedulerDelegate;
use log::info;

/// The scheduler engine.
///
/// Decoupled from the control service: it only counts time and invokes
/// the delegate, which keeps it independently testable.
pub struct Scheduler {
    cycle_interval_ms: u32,
    /// Wake time accumulated since the last cycle fired.
    elapsed_ms: u64,
    /// Cycles delivered since boot.
    cycles: u64,
}

impl Scheduler {
    pub fn new(cycle_interval_ms: u32) -> Self {
        info!("Scheduler: control cycle every {cycle_interval_ms} ms");
        Self {
            cycle_interval_ms: cycle_interval_ms.max(1),
            elapsed_ms: 0,
            cycles: 0,
        }
    }

    /// Account for one wake after `elapsed_ms` of idle.  Fires at most one
    /// cycle per wake; surplus time carries over to the next wake.
    pub fn on_wake(&mut self, elapsed_ms: u32, delegate: &mut dyn SchedulerDelegate) {
        self.elapsed_ms += u64::from(elapsed_ms);

        let cadence = u64::from(self.cycle_interval_ms);
        if self.elapsed_ms < cadence {
            return;
        }
        // Never let a long stall queue up a burst of cycles.
        self.elapsed_ms = (self.elapsed_ms - cadence).min(cadence - 1);

        self.cycles += 1;
        delegate.on_cycle_due(self.cycles);
    }
}
