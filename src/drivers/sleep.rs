//! Inter-cycle idle.
//!
//! On ESP-IDF: timer-woken light sleep.  CPU state and RAM are retained,
//! so the control loop resumes exactly where it stopped.  If light sleep is
//! rejected (e.g. a peripheral holds a lock) the wait falls back to a
//! FreeRTOS delay so the cadence is preserved.
//! On host/test: `std::thread::sleep`.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

/// Idle for `ms` milliseconds.
#[cfg(target_os = "espidf")]
pub fn idle(ms: u32) {
    // SAFETY: plain ESP-IDF sleep API calls from the single main task.
    let ret = unsafe {
        let ret = esp_sleep_enable_timer_wakeup(u64::from(ms) * 1_000);
        if ret == ESP_OK {
            esp_light_sleep_start()
        } else {
            ret
        }
    };
    if ret != ESP_OK {
        log::warn!("sleep: light sleep rejected (rc={ret}), delaying instead");
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

/// Idle for `ms` milliseconds.
#[cfg(not(target_os = "espidf"))]
pub fn idle(ms: u32) {
    std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
}
