//! GPIO / peripheral pin assignments for the SunRail controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Rail outputs (relay drivers, active HIGH)
// ---------------------------------------------------------------------------

/// Digital output: enables the solar-fed rail relay.
pub const SOLAR_ENABLE_GPIO: i32 = 7;
/// Digital output: enables the house/grid rail relay.
pub const HOUSE_ENABLE_GPIO: i32 = 9;

// ---------------------------------------------------------------------------
// Analog inputs (ADC1)
// ---------------------------------------------------------------------------

/// On-board temperature sense element, ADC1 channel 3 (GPIO 4 on ESP32-S3).
pub const TEMP_ADC_GPIO: i32 = 4;
/// Solar-rail sense divider, ADC1 channel 5 (GPIO 6 on ESP32-S3).
pub const SOLAR_SENSE_ADC_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Calibration storage
// ---------------------------------------------------------------------------

/// Bit offset of the temperature calibration record inside the eFuse user
/// block (offset byte followed by gain byte).
pub const TEMPSENSE_EFUSE_BIT_OFFSET: usize = 0;
