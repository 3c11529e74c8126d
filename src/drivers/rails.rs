//! Solar/house rail driver.
//!
//! Switching discipline: deassert every rail that must end up off, wait
//! the settle delay, then assert the winner.  If any deassert fails the
//! winner is never asserted, so both relays can never be closed together.
//!
//! Generic over `embedded-hal` pins and delay so it runs unchanged against
//! [`RailPin`](super::rail_pin::RailPin) on the board and recording mocks
//! in tests.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use log::{info, warn};

use crate::app::ports::RailPort;
use crate::error::ActuatorError;
use crate::fsm::context::{Rail, Selection};

pub struct RailDriver<P, D> {
    solar: P,
    house: P,
    delay: D,
    settle_ms: u32,
    /// What is known to be on the wire.
    current: Selection,
}

impl<P: OutputPin, D: DelayNs> RailDriver<P, D> {
    /// Both outputs are assumed low (as left by `hw_init`).
    pub fn new(solar: P, house: P, delay: D, settle_ms: u32) -> Self {
        Self {
            solar,
            house,
            delay,
            settle_ms,
            current: Selection::Off,
        }
    }

    fn pin(&mut self, rail: Rail) -> &mut P {
        match rail {
            Rail::Solar => &mut self.solar,
            Rail::House => &mut self.house,
        }
    }

    fn release(&mut self, rail: Rail) -> Result<(), ActuatorError> {
        self.pin(rail).set_low().map_err(|_| {
            warn!("rail: {} deassert failed", rail.name());
            ActuatorError::GpioWriteFailed
        })
    }

    /// Drive both outputs low, ignoring the current bookkeeping.
    pub fn all_off(&mut self) -> Result<(), ActuatorError> {
        let solar = self.release(Rail::Solar);
        let house = self.release(Rail::House);
        solar.and(house)?;
        self.current = Selection::Off;
        Ok(())
    }
}

impl<P: OutputPin, D: DelayNs> RailPort for RailDriver<P, D> {
    fn apply(&mut self, selection: Selection) -> Result<(), ActuatorError> {
        if selection == self.current {
            return Ok(());
        }

        let winner = selection.rail();
        for rail in [Rail::Solar, Rail::House] {
            if Some(rail) != winner {
                self.release(rail)?;
            }
        }
        self.current = Selection::Off;

        if let Some(rail) = winner {
            self.delay.delay_ms(self.settle_ms);
            self.pin(rail).set_high().map_err(|_| {
                warn!("rail: {} assert failed", rail.name());
                ActuatorError::GpioWriteFailed
            })?;
            self.current = selection;
        }

        info!("rail: now {selection:?}");
        Ok(())
    }

    fn selection(&self) -> Selection {
        self.current
    }
}
