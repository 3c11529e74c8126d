//! Integration tests for the ArbiterService → PowerArbiter → rails pipeline.
//!
//! These run on the host (x86_64) and drive whole control cycles through
//! scripted sensor readings, asserting on the rail calls and the emitted
//! events.

use crate::mock_hw::{MockHardware, RecordingSink};

use sunrail::app::events::AppEvent;
use sunrail::app::service::ArbiterService;
use sunrail::config::SystemConfig;
use sunrail::error::SensorFault;
use sunrail::fsm::ZoneId;
use sunrail::fsm::context::{Rail, RailState, Selection};

fn make_app() -> (ArbiterService, MockHardware, RecordingSink) {
    make_app_with(SystemConfig::default())
}

fn make_app_with(config: SystemConfig) -> (ArbiterService, MockHardware, RecordingSink) {
    let mut app = ArbiterService::new(config);
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

fn run(app: &mut ArbiterService, hw: &mut MockHardware, sink: &mut RecordingSink, cycles: usize) {
    for _ in 0..cycles {
        app.tick(hw, sink);
    }
}

// ── Boot ──────────────────────────────────────────────────────

#[test]
fn boot_selects_solar() {
    let (app, hw, sink) = make_app();
    assert_eq!(hw.applied, [Selection::Solar]);
    assert_eq!(sink.events, [AppEvent::Started(Selection::Solar)]);
    assert_eq!(app.system_state().solar, RailState::Active);
    assert_eq!(app.system_state().house, RailState::Inactive);
    assert_eq!(app.system_state().last_temperature, None);
}

// ── Hot-zone debounce ─────────────────────────────────────────

#[test]
fn three_insufficient_hot_cycles_switch_to_house() {
    let (mut app, mut hw, mut sink) = make_app();
    sink.clear();
    hw.script_hot(32, 10).script_hot(32, 10).script_hot(32, 10);

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.system_state().house, RailState::Pending(1));
    assert_eq!(hw.on_wire(), Selection::Solar);

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.system_state().house, RailState::Pending(2));
    assert_eq!(hw.on_wire(), Selection::Solar);

    app.tick(&mut hw, &mut sink);
    assert_eq!(app.system_state().house, RailState::Active);
    assert_eq!(app.system_state().solar, RailState::Inactive);
    assert_eq!(hw.on_wire(), Selection::House);
    assert_eq!(hw.applied, [Selection::Solar, Selection::House]);

    assert_eq!(
        sink.significant(),
        [
            &AppEvent::ZoneChanged {
                from: ZoneId::Neutral,
                to: ZoneId::Hot
            },
            &AppEvent::SwitchPending {
                rail: Rail::House,
                count: 1,
                needed: 3
            },
            &AppEvent::SwitchPending {
                rail: Rail::House,
                count: 2,
                needed: 3
            },
            &AppEvent::RailSwitched {
                from: Selection::Solar,
                to: Selection::House,
                celsius: Some(32)
            },
        ]
    );
}

#[test]
fn solar_recovery_on_cycle_two_resets_pending() {
    let (mut app, mut hw, mut sink) = make_app();
    sink.clear();
    hw.script_hot(32, 10).script_hot(32, 15);
    for _ in 0..10 {
        hw.script_hot(32, 15);
    }

    run(&mut app, &mut hw, &mut sink, 2);
    assert_eq!(app.system_state().house, RailState::Inactive);
    assert!(sink
        .events
        .contains(&AppEvent::PendingCleared { rail: Rail::House }));

    run(&mut app, &mut hw, &mut sink, 10);
    assert_eq!(hw.applied, [Selection::Solar]);
    assert_eq!(hw.on_wire(), Selection::Solar);
}

#[test]
fn solar_returns_after_three_sufficient_cycles() {
    let (mut app, mut hw, mut sink) = make_app();
    for _ in 0..3 {
        hw.script_hot(35, 0);
    }
    for _ in 0..3 {
        hw.script_hot(35, 12);
    }
    run(&mut app, &mut hw, &mut sink, 5);
    assert_eq!(hw.on_wire(), Selection::House);
    assert_eq!(app.system_state().solar, RailState::Pending(2));

    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(hw.on_wire(), Selection::Solar);
    assert_eq!(
        hw.applied,
        [Selection::Solar, Selection::House, Selection::Solar]
    );
}

#[test]
fn legacy_single_cycle_confirmation() {
    let (mut app, mut hw, mut sink) = make_app_with(SystemConfig {
        confirm_cycles: 1,
        ..SystemConfig::default()
    });
    hw.script_hot(30, 11);
    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.on_wire(), Selection::House);
}

// ── Probe gating ──────────────────────────────────────────────

#[test]
fn solar_probe_only_runs_when_hot() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.script(22).script(10).script(29).script_hot(30, 50);

    run(&mut app, &mut hw, &mut sink, 3);
    assert_eq!(hw.solar_reads, 0);

    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(hw.solar_reads, 1);
    assert_eq!(app.build_telemetry().solar_raw, Some(50));
}

#[test]
fn failed_solar_probe_counts_as_insufficient() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.script_solar_failure(33);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.system_state().house, RailState::Pending(1));
    assert_eq!(app.build_telemetry().solar_raw, None);
}

// ── Cold / neutral ────────────────────────────────────────────

#[test]
fn cold_drops_both_rails_immediately() {
    let (mut app, mut hw, mut sink) = make_app();
    for _ in 0..3 {
        hw.script_hot(31, 3);
    }
    hw.script(15);
    run(&mut app, &mut hw, &mut sink, 3);
    assert_eq!(hw.on_wire(), Selection::House);
    sink.clear();

    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.on_wire(), Selection::Off);
    assert_eq!(app.zone(), ZoneId::Cold);
    assert_eq!(
        sink.significant(),
        [
            &AppEvent::ZoneChanged {
                from: ZoneId::Hot,
                to: ZoneId::Cold
            },
            &AppEvent::RailSwitched {
                from: Selection::House,
                to: Selection::Off,
                celsius: Some(15)
            },
        ]
    );
}

#[test]
fn neutral_restores_solar_from_cold() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.script(5).script(16);
    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(hw.on_wire(), Selection::Off);
    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(hw.on_wire(), Selection::Solar);
}

#[test]
fn pending_discarded_when_leaving_hot_zone() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.script_hot(31, 1).script_hot(31, 1).script(25).script_hot(31, 1);
    run(&mut app, &mut hw, &mut sink, 3);
    assert_eq!(app.system_state().pending(), None);

    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(app.system_state().house, RailState::Pending(1));
    assert_eq!(hw.on_wire(), Selection::Solar);
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn sensor_fault_releases_rails_and_recovers() {
    let (mut app, mut hw, mut sink) = make_app();
    sink.clear();
    hw.script_fault(SensorFault::Saturated)
        .script_fault(SensorFault::Saturated)
        .script(22);

    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.on_wire(), Selection::Off);
    assert_eq!(app.zone(), ZoneId::Fault);
    assert!(sink
        .events
        .contains(&AppEvent::SensorFault(SensorFault::Saturated)));

    // The fault event is edge-triggered.
    sink.clear();
    app.tick(&mut hw, &mut sink);
    assert!(!sink
        .events
        .iter()
        .any(|e| matches!(e, AppEvent::SensorFault(_))));

    app.tick(&mut hw, &mut sink);
    assert_eq!(hw.on_wire(), Selection::Solar);
    assert_eq!(app.zone(), ZoneId::Neutral);
    assert_eq!(app.build_telemetry().fault_count, 2);
}

#[test]
fn implausible_temperature_is_a_fault() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.script(400);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.zone(), ZoneId::Fault);
    assert_eq!(hw.on_wire(), Selection::Off);
    assert_eq!(app.system_state().last_temperature, None);
}

#[test]
fn failed_rail_write_is_retried_next_cycle() {
    let (mut app, mut hw, mut sink) = make_app();
    for _ in 0..4 {
        hw.script_hot(32, 10);
    }
    run(&mut app, &mut hw, &mut sink, 2);
    hw.fail_next_apply = true;

    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(hw.on_wire(), Selection::Off);
    assert!(sink.events.contains(&AppEvent::RailFault(Selection::House)));

    run(&mut app, &mut hw, &mut sink, 1);
    assert_eq!(hw.on_wire(), Selection::House);
    assert_eq!(
        hw.applied,
        [Selection::Solar, Selection::House, Selection::House]
    );
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn every_cycle_emits_telemetry() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.script(20).script(21);
    run(&mut app, &mut hw, &mut sink, 2);
    let telemetry: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::Telemetry(t) => Some(t.cycle),
            _ => None,
        })
        .collect();
    assert_eq!(telemetry, [1, 2]);
    assert_eq!(app.cycle_count(), 2);
}
