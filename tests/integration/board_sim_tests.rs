//! End-to-end run of the real board adapter against the host simulation
//! backends in `hw_init` (injected ADC counts, observable GPIO levels).
//!
//! The simulated peripherals are process-wide statics, so everything that
//! touches them lives in this single test.

use crate::mock_hw::RecordingSink;

use sunrail::adapters::hardware::{HardwareAdapter, board_rails};
use sunrail::app::ports::RailPort;
use sunrail::app::service::ArbiterService;
use sunrail::config::SystemConfig;
use sunrail::drivers::hw_init::{self, ADC1_CH_SOLAR, ADC1_CH_TEMP, sim_gpio_level, sim_set_adc};
use sunrail::fsm::ZoneId;
use sunrail::fsm::context::Selection;
use sunrail::pins::{HOUSE_ENABLE_GPIO, SOLAR_ENABLE_GPIO};
use sunrail::sensors::calibration::CalibrationConstants;

/// 12-bit counts: the adapter drops two bits before calibration.
const TEMP_32C: u16 = 607 << 2;
const TEMP_10C: u16 = 578 << 2;
const TEMP_27C: u16 = 600 << 2;
const SOLAR_WEAK: u16 = 10 << 2;

fn rails() -> (bool, bool) {
    (sim_gpio_level(SOLAR_ENABLE_GPIO), sim_gpio_level(HOUSE_ENABLE_GPIO))
}

#[test]
fn board_adapter_full_cycle() {
    hw_init::init_peripherals().unwrap();
    assert_eq!(rails(), (false, false));

    let config = SystemConfig::default();

    // The boot-failure path releases both pins through the same driver.
    let mut driver = board_rails(&config);
    driver.apply(Selection::House).unwrap();
    assert_eq!(rails(), (false, true));
    driver.all_off().unwrap();
    assert_eq!(rails(), (false, false));

    let mut hw =
        HardwareAdapter::board(&config, CalibrationConstants::REFERENCE, board_rails(&config));
    let mut app = ArbiterService::new(config);
    let mut sink = RecordingSink::new();

    app.start(&mut hw, &mut sink);
    assert_eq!(rails(), (true, false));

    // Mild: solar stays.
    sim_set_adc(ADC1_CH_TEMP, TEMP_27C);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.system_state().last_temperature, Some(27));
    assert_eq!(rails(), (true, false));

    // Hot with a weak solar rail: house after three cycles.
    sim_set_adc(ADC1_CH_TEMP, TEMP_32C);
    sim_set_adc(ADC1_CH_SOLAR, SOLAR_WEAK);
    app.tick(&mut hw, &mut sink);
    app.tick(&mut hw, &mut sink);
    assert_eq!(rails(), (true, false));
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.zone(), ZoneId::Hot);
    assert_eq!(rails(), (false, true));
    assert_eq!(hw.selection(), Selection::House);

    // Cold: everything off.
    sim_set_adc(ADC1_CH_TEMP, TEMP_10C);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.system_state().last_temperature, Some(10));
    assert_eq!(rails(), (false, false));

    // Disconnected sensor reads full scale: fault, still off.
    sim_set_adc(ADC1_CH_TEMP, 0x0FFF);
    app.tick(&mut hw, &mut sink);
    assert_eq!(app.zone(), ZoneId::Fault);
    assert_eq!(rails(), (false, false));
}
