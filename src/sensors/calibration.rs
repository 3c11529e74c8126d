//! Per-device temperature calibration and the fixed-point conversion.
//!
//! The factory record holds two bytes: an additive offset and a
//! multiplicative gain.  Applied to a 10-bit raw count they yield
//! `256 × T[K]`, which is shifted down to integer Celsius:
//!
//! ```text
//! fx  = (raw - offset) * gain        // 256 × kelvin
//! fx -= 69_927                       // 256 × 273.15, floored
//! fx += 128                          // round to nearest
//! °C  = fx >> 8                      // arithmetic shift
//! ```
//!
//! The arithmetic is signed, so readings below 0 °C floor correctly
//! instead of wrapping.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: the record is read once at boot from the eFuse user block.
//! On host/test: the reference constants are returned.

use crate::error::Error;

/// Valid bits of a raw conversion result.
pub const RAW_MASK: u16 = 0x03FF;
/// Full-scale raw count (10-bit converter).
pub const RAW_FULL_SCALE: u16 = RAW_MASK;

/// `256 × 273.15 = 69926.4`; subtracting the fraction and flooring is the
/// same as subtracting the next integer up.
const KELVIN_OFFSET_FX: i32 = 69_927;
const ROUND_HALF_FX: i32 = 0x80;
const FX_SHIFT: u32 = 8;

/// Factory calibration record for the on-die temperature sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationConstants {
    /// Subtracted from the raw count.
    pub offset: u8,
    /// Multiplies the offset-corrected count into `256 × kelvin`.
    pub gain: u8,
}

impl CalibrationConstants {
    /// Typical values for an uncharacterised part (raw 600 ≈ 27 °C).
    pub const REFERENCE: Self = Self {
        offset: 200,
        gain: 192,
    };

    pub const fn new(offset: u8, gain: u8) -> Self {
        Self { offset, gain }
    }

    /// Raw count → `256 × kelvin`.
    pub fn kelvin_fx(&self, raw: u16) -> i32 {
        let corrected = i32::from(raw & RAW_MASK) - i32::from(self.offset);
        corrected * i32::from(self.gain)
    }

    /// Raw count → integer °C, rounded to nearest.
    pub fn celsius(&self, raw: u16) -> i32 {
        (self.kelvin_fx(raw) - KELVIN_OFFSET_FX + ROUND_HALF_FX) >> FX_SHIFT
    }
}

/// Load the factory calibration record.  Call once at startup.
#[cfg(target_os = "espidf")]
pub fn load_factory() -> Result<CalibrationConstants, Error> {
    use esp_idf_svc::sys::{esp_efuse_block_t_EFUSE_BLK3, esp_efuse_read_block, ESP_OK};

    let mut record = [0u8; 2];
    // SAFETY: `record` outlives the call and is exactly 16 bits wide.
    let ret = unsafe {
        esp_efuse_read_block(
            esp_efuse_block_t_EFUSE_BLK3,
            record.as_mut_ptr().cast(),
            crate::pins::TEMPSENSE_EFUSE_BIT_OFFSET,
            16,
        )
    };
    if ret != ESP_OK as i32 {
        return Err(Error::Init("calibration eFuse read failed"));
    }

    let constants = CalibrationConstants::new(record[0], record[1]);
    if constants.gain == 0 {
        return Err(Error::Init("calibration eFuse not programmed"));
    }
    log::info!(
        "calibration: offset={} gain={}",
        constants.offset,
        constants.gain
    );
    Ok(constants)
}

/// Load the factory calibration record.  Call once at startup.
#[cfg(not(target_os = "espidf"))]
pub fn load_factory() -> Result<CalibrationConstants, Error> {
    Ok(CalibrationConstants::REFERENCE)
}
