//! Application service: the hexagonal core.
//!
//! [`ArbiterService`] owns the power arbiter, safety supervisor, and shared
//! context.  It exposes a clean, hardware-agnostic API.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!                 │     ArbiterService      │
//!    RailPort ◀── │  Safety · PowerArbiter  │
//!                 └────────────────────────┘
//! ```

use log::{error, info, warn};

use crate::config::SystemConfig;
use crate::fsm::context::{ArbiterContext, Observation, Rail, RailState, Selection, SystemState};
use crate::fsm::{PowerArbiter, ZoneId};
use crate::safety::SafetySupervisor;

use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, RailPort, SensorPort};

// ───────────────────────────────────────────────────────────────
// ArbiterService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct ArbiterService {
    arbiter: PowerArbiter,
    ctx: ArbiterContext,
    safety: SafetySupervisor,
    cycle_count: u64,
    /// Solar sense count from the most recent probe this cycle.
    last_solar_raw: Option<u16>,
}

impl ArbiterService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the rails: call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        let safety = SafetySupervisor::new(&config);
        let ctx = ArbiterContext::new(config);

        Self {
            arbiter: PowerArbiter::standard(),
            ctx,
            safety,
            cycle_count: 0,
            last_solar_raw: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter the startup zone and drive the boot default (solar on).
    pub fn start(&mut self, rails: &mut impl RailPort, sink: &mut impl EventSink) {
        self.arbiter.start(&mut self.ctx);
        let selection = self.ctx.selection();
        if let Err(e) = rails.apply(selection) {
            error!("Boot rail selection failed: {e}");
            sink.emit(&AppEvent::RailFault(selection));
        }
        sink.emit(&AppEvent::Started(rails.selection()));
        info!(
            "ArbiterService started in {:?} ({:?})",
            self.arbiter.current_zone(),
            rails.selection()
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run one full control cycle: temperature → safety → (solar probe) →
    /// arbiter → rails.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`RailPort`]: this avoids a double mutable borrow while keeping the
    /// port boundary explicit.
    pub fn tick(&mut self, hw: &mut (impl SensorPort + RailPort), sink: &mut impl EventSink) {
        self.cycle_count += 1;
        self.last_solar_raw = None;
        let prev_zone = self.arbiter.current_zone();
        let prev_state = self.ctx.state;
        let prev_fault = self.safety.fault();

        // 1. Temperature, vetted by the supervisor
        let verdict = self.safety.evaluate(hw.read_temperature());

        // 2. Build this cycle's observation; the solar probe is only
        //    consulted in the hot zone.
        let observation = match verdict {
            Ok(celsius) => {
                self.ctx.state.last_temperature = Some(celsius);
                let solar_sufficient = if celsius >= self.ctx.config.too_hot_c {
                    Some(self.probe_solar(hw))
                } else {
                    None
                };
                Observation::Temperature {
                    celsius,
                    solar_sufficient,
                }
            }
            Err(fault) => {
                self.ctx.state.last_temperature = None;
                if prev_fault != Some(fault) {
                    sink.emit(&AppEvent::SensorFault(fault));
                }
                Observation::Fault(fault)
            }
        };

        // 3. Arbiter (pure state logic)
        let desired = self.arbiter.evaluate(&mut self.ctx, observation);

        let zone = self.arbiter.current_zone();
        if zone != prev_zone {
            sink.emit(&AppEvent::ZoneChanged {
                from: prev_zone,
                to: zone,
            });
        }
        self.emit_pending_changes(&prev_state, sink);

        // 4. Drive the rails if the selection moved (or a previous write
        //    left them out of step)
        self.drive(hw, desired, sink);

        sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            cycle: self.cycle_count,
            zone: self.arbiter.current_zone(),
            celsius: self.ctx.state.last_temperature,
            solar_raw: self.last_solar_raw,
            selection: self.ctx.selection(),
            pending: self.ctx.state.pending(),
            fault_count: self.safety.fault_count(),
        }
    }

    /// Current temperature zone.
    pub fn zone(&self) -> ZoneId {
        self.arbiter.current_zone()
    }

    /// The arbitration state (per-rail status and last temperature).
    pub fn system_state(&self) -> &SystemState {
        &self.ctx.state
    }

    /// Selection the arbiter currently wants on the wire.
    pub fn selection(&self) -> Selection {
        self.ctx.selection()
    }

    /// Total control cycles executed since startup.
    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.ctx.config
    }

    // ── Internal ──────────────────────────────────────────────

    /// One solar probe.  A failed read counts as insufficient.
    fn probe_solar(&mut self, hw: &mut impl SensorPort) -> bool {
        match hw.read_solar() {
            Ok(reading) => {
                self.last_solar_raw = Some(reading.raw);
                reading.sufficient
            }
            Err(e) => {
                warn!("Solar probe failed: {e}, treating as insufficient");
                false
            }
        }
    }

    fn emit_pending_changes(&self, prev: &SystemState, sink: &mut impl EventSink) {
        for rail in [Rail::Solar, Rail::House] {
            let before = prev.rail(rail);
            let after = self.ctx.state.rail(rail);
            if before == after {
                continue;
            }
            match (before, after) {
                (_, RailState::Pending(count)) => sink.emit(&AppEvent::SwitchPending {
                    rail,
                    count,
                    needed: self.ctx.config.confirm_cycles,
                }),
                (RailState::Pending(_), RailState::Inactive) => {
                    sink.emit(&AppEvent::PendingCleared { rail });
                }
                _ => {}
            }
        }
    }

    fn drive(&self, rails: &mut impl RailPort, desired: Selection, sink: &mut impl EventSink) {
        let from = rails.selection();
        if from == desired {
            return;
        }
        match rails.apply(desired) {
            Ok(()) => sink.emit(&AppEvent::RailSwitched {
                from,
                to: desired,
                celsius: self.ctx.state.last_temperature,
            }),
            Err(e) => {
                error!("Rail switch {from:?} -> {desired:?} failed: {e}");
                sink.emit(&AppEvent::RailFault(desired));
            }
        }
    }
}
