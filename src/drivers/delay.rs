//! Blocking delay source for the ADC and rail settle waits.
//!
//! On ESP-IDF: the ROM busy-wait (`Ets`), accurate at the millisecond
//! scale where FreeRTOS ticks are too coarse.
//! On host/test: `std::thread::sleep`.

#[cfg(target_os = "espidf")]
pub type BoardDelay = esp_idf_hal::delay::Ets;

#[cfg(target_os = "espidf")]
pub fn board_delay() -> BoardDelay {
    esp_idf_hal::delay::Ets
}

#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct BoardDelay;

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::delay::DelayNs for BoardDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn board_delay() -> BoardDelay {
    BoardDelay
}
