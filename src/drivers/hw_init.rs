//! One-shot hardware peripheral initialization.
//!
//! Configures the ADC1 oneshot unit and the rail GPIO outputs using raw
//! ESP-IDF sys calls. Called once from `main()` before the control loop
//! starts.
//!
//! On host builds every call is backed by static atomics so tests can
//! inject converter counts and observe output levels.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={rc})"),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={rc})"),
        }
    }
}

impl core::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

/// ADC1 channel of the temperature sense element (GPIO 4).
pub const ADC1_CH_TEMP: u32 = 3;
/// ADC1 channel of the solar sense divider (GPIO 6).
pub const ADC1_CH_SOLAR: u32 = 5;

#[cfg(target_os = "espidf")]
pub fn init_peripherals() -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc()?;
        init_gpio_outputs()?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals() -> Result<(), HwInitError> {
    for gpio in &SIM_GPIO {
        gpio.store(false, Ordering::Relaxed);
    }
    log::info!("hw_init(sim): peripheral init skipped");
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// main-loop ADC path.  No concurrent access is possible because
/// `init_adc()` completes before the control loop starts.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc() -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    adc1_configure(ADC1_CH_TEMP).map_err(HwInitError::AdcInitFailed)?;
    adc1_configure(ADC1_CH_SOLAR).map_err(HwInitError::AdcInitFailed)?;

    info!(
        "hw_init: ADC1 configured (CH{ADC1_CH_TEMP}=temp GPIO{}, CH{ADC1_CH_SOLAR}=solar GPIO{})",
        pins::TEMP_ADC_GPIO,
        pins::SOLAR_SENSE_ADC_GPIO
    );
    Ok(())
}

/// (Re)program one ADC1 channel for the ~0–1.1 V bandgap range (no
/// attenuation).  Returns the ESP-IDF error code on failure.
#[cfg(target_os = "espidf")]
pub fn adc1_configure(channel: u32) -> Result<(), i32> {
    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: adc_atten_t_ADC_ATTEN_DB_0,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), channel, &chan_cfg) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_configure(_channel: u32) -> Result<(), i32> {
    Ok(())
}

/// One blocking 12-bit conversion.  Returns the ESP-IDF error code on
/// failure.
#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract: single-threaded main-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), channel, &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(u16::try_from(raw.max(0)).unwrap_or(u16::MAX))
}

#[cfg(not(target_os = "espidf"))]
static SIM_ADC_TEMP: AtomicU16 = AtomicU16::new(2400);
#[cfg(not(target_os = "espidf"))]
static SIM_ADC_SOLAR: AtomicU16 = AtomicU16::new(400);

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u32) -> Result<u16, i32> {
    match channel {
        ADC1_CH_TEMP => Ok(SIM_ADC_TEMP.load(Ordering::Relaxed)),
        ADC1_CH_SOLAR => Ok(SIM_ADC_SOLAR.load(Ordering::Relaxed)),
        _ => Err(-1),
    }
}

/// Inject the 12-bit count the next read of `channel` returns.
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u32, raw12: u16) {
    match channel {
        ADC1_CH_TEMP => SIM_ADC_TEMP.store(raw12, Ordering::Relaxed),
        ADC1_CH_SOLAR => SIM_ADC_SOLAR.store(raw12, Ordering::Relaxed),
        _ => {}
    }
}

// ── GPIO Outputs ──────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_outputs() -> Result<(), HwInitError> {
    let output_pins = [pins::SOLAR_ENABLE_GPIO, pins::HOUSE_ENABLE_GPIO];

    for &pin in &output_pins {
        let cfg = gpio_config_t {
            pin_bit_mask: 1u64 << pin,
            mode: gpio_mode_t_GPIO_MODE_OUTPUT,
            pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
            pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
            intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        };
        let ret = unsafe { gpio_config(&cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::GpioConfigFailed(ret));
        }
        // Both rails start released.
        unsafe { gpio_set_level(pin, 0) };
    }

    info!("hw_init: rail outputs configured, both low");
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // pin was validated during init_gpio_outputs(). Main-loop only.
    let ret = unsafe { gpio_set_level(pin, u32::from(high)) };
    if ret != ESP_OK as i32 {
        return Err(ret);
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
const SIM_GPIO_COUNT: usize = 49;

#[cfg(not(target_os = "espidf"))]
static SIM_GPIO: [AtomicBool; SIM_GPIO_COUNT] = [const { AtomicBool::new(false) }; SIM_GPIO_COUNT];

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(pin: i32, high: bool) -> Result<(), i32> {
    let slot = usize::try_from(pin)
        .ok()
        .and_then(|i| SIM_GPIO.get(i))
        .ok_or(-1)?;
    slot.store(high, Ordering::Relaxed);
    Ok(())
}

/// Level last written to `pin` (host simulation only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_gpio_level(pin: i32) -> bool {
    usize::try_from(pin)
        .ok()
        .and_then(|i| SIM_GPIO.get(i))
        .is_some_and(|g| g.load(Ordering::Relaxed))
}
