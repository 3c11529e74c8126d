//! Rail drivers, hardware initialisation, and peripheral helpers.

pub mod delay;
pub mod hw_init;
pub mod rail_pin;
pub mod rails;
pub mod sleep;
pub mod watchdog;
