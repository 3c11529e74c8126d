//! SunRail Firmware: Main Entry Point
//!
//! Hexagonal architecture with a sleep-paced control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter                        LogEventSink           │
//! │  (Sensor + Rail ports, ADC1 + GPIO)     (EventSink)            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ArbiterService (pure logic)                 │    │
//! │  │  Safety · PowerArbiter (zone FSM + debounce)           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Scheduler (delegate-driven) · light sleep · watchdog          │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use sunrail::adapters::hardware::{self, HardwareAdapter};
use sunrail::adapters::log_sink::LogEventSink;
use sunrail::app::ports::SchedulerDelegate;
use sunrail::app::service::ArbiterService;
use sunrail::config::SystemConfig;
use sunrail::drivers::delay::BoardDelay;
use sunrail::drivers::rail_pin::RailPin;
use sunrail::drivers::rails::RailDriver;
use sunrail::drivers::{hw_init, sleep, watchdog::Watchdog};
use sunrail::scheduler::Scheduler;
use sunrail::sensors::calibration;

// ── Scheduler delegate ────────────────────────────────────────
//
// Bridges the scheduler (which only counts wake time) to the service:
// each due cycle runs exactly one control tick.

struct ControlCycle<'a> {
    app: &'a mut ArbiterService,
    hw: &'a mut HardwareAdapter,
    sink: &'a mut LogEventSink,
}

impl SchedulerDelegate for ControlCycle<'_> {
    fn on_cycle_due(&mut self, cycle: u64) {
        log::debug!("cycle {cycle} due");
        self.app.tick(&mut *self.hw, &mut *self.sink);
    }
}

// ── Configuration ─────────────────────────────────────────────

/// Build-time override (`SUNRAIL_CONFIG` JSON), else the reference values.
fn load_config() -> SystemConfig {
    let Some(json) = option_env!("SUNRAIL_CONFIG") else {
        info!("Config: reference defaults");
        return SystemConfig::default();
    };
    match SystemConfig::from_json(json) {
        Ok(cfg) => {
            info!("Config: build-time override applied");
            cfg
        }
        Err(e) => {
            warn!("Config override rejected ({e}), using defaults");
            SystemConfig::default()
        }
    }
}

/// Park the controller with both rails released.  Never returns; the
/// watchdog (if armed) or an operator reset recovers the device.
fn halt(reason: &dyn core::fmt::Display, rails: &mut RailDriver<RailPin, BoardDelay>) -> ! {
    error!("{reason}, halting with rails released");
    if let Err(e) = rails.all_off() {
        error!("Rail release failed: {e}");
    }
    loop {
        sleep::idle(60_000);
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SunRail v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = load_config();
    info!(
        "Zones: cold <= {}°C < neutral < {}°C <= hot, solar >= {}, confirm {} cycles",
        config.too_cold_c, config.too_hot_c, config.solar_threshold_raw, config.confirm_cycles
    );

    // ── 3. Peripherals + calibration ──────────────────────────
    let mut rails = hardware::board_rails(&config);
    if let Err(e) = hw_init::init_peripherals() {
        halt(&e, &mut rails);
    }
    let calibration = match calibration::load_factory() {
        Ok(c) => c,
        Err(e) => halt(&e, &mut rails),
    };
    let watchdog = Watchdog::for_wake_interval(config.wake_interval_ms);

    // ── 4. Adapters + service ─────────────────────────────────
    let mut hw = HardwareAdapter::board(&config, calibration, rails);
    let mut log_sink = LogEventSink::new();
    let mut sched = Scheduler::new(config.cycle_interval_ms);
    let mut app = ArbiterService::new(config.clone());

    app.start(&mut hw, &mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        sleep::idle(config.wake_interval_ms);
        watchdog.feed();

        let mut cycle = ControlCycle {
            app: &mut app,
            hw: &mut hw,
            sink: &mut log_sink,
        };
        sched.on_wake(config.wake_interval_ms, &mut cycle);
    }
}
