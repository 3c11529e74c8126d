//! Shared mutable context threaded through every zone handler.
//!
//! `ArbiterContext` is the single struct that zone handlers read from and
//! write to.  It carries the latest observation, the per-rail
//! [`SystemState`], configuration, and timing.  The desired output is
//! derived from `state` after each tick; handlers never touch hardware.

use crate::config::SystemConfig;
use crate::error::SensorFault;

use super::ZoneId;

// ---------------------------------------------------------------------------
// Rails
// ---------------------------------------------------------------------------

/// One of the two switchable power sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rail {
    Solar,
    House,
}

impl Rail {
    /// The competing rail.
    pub fn other(self) -> Self {
        match self {
            Self::Solar => Self::House,
            Self::House => Self::Solar,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Solar => "solar",
            Self::House => "house",
        }
    }
}

/// Per-rail arbitration state.
///
/// `Pending(n)` means a condition favouring this rail has held for `n`
/// consecutive cycles without being confirmed yet.  A pending rail is
/// never active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RailState {
    #[default]
    Inactive,
    Pending(u8),
    Active,
}

impl RailState {
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending(_))
    }

    /// Consecutive confirming cycles so far (0 unless pending).
    pub fn confirm_count(self) -> u8 {
        match self {
            Self::Pending(n) => n,
            _ => 0,
        }
    }
}

/// Which rail (if any) should be asserted.  At most one by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Off,
    Solar,
    House,
}

impl Selection {
    pub fn rail(self) -> Option<Rail> {
        match self {
            Self::Off => None,
            Self::Solar => Some(Rail::Solar),
            Self::House => Some(Rail::House),
        }
    }

    pub fn of(rail: Option<Rail>) -> Self {
        match rail {
            None => Self::Off,
            Some(Rail::Solar) => Self::Solar,
            Some(Rail::House) => Self::House,
        }
    }

    pub fn solar_active(self) -> bool {
        matches!(self, Self::Solar)
    }

    pub fn house_active(self) -> bool {
        matches!(self, Self::House)
    }
}

// ---------------------------------------------------------------------------
// System state
// ---------------------------------------------------------------------------

/// Aggregate arbitration state, owned by the control service for the
/// lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemState {
    pub solar: RailState,
    pub house: RailState,
    /// Most recent valid temperature (°C).  `None` until the first good
    /// reading, and after a sensor fault.
    pub last_temperature: Option<i32>,
}

impl Default for SystemState {
    /// Boot default: solar preferred.
    fn default() -> Self {
        Self {
            solar: RailState::Active,
            house: RailState::Inactive,
            last_temperature: None,
        }
    }
}

impl SystemState {
    pub fn rail(&self, rail: Rail) -> RailState {
        match rail {
            Rail::Solar => self.solar,
            Rail::House => self.house,
        }
    }

    pub fn rail_mut(&mut self, rail: Rail) -> &mut RailState {
        match rail {
            Rail::Solar => &mut self.solar,
            Rail::House => &mut self.house,
        }
    }

    /// The rail currently marked active.
    pub fn selection(&self) -> Selection {
        debug_assert!(
            !(self.solar.is_active() && self.house.is_active()),
            "both rails active"
        );
        if self.solar.is_active() {
            Selection::Solar
        } else if self.house.is_active() {
            Selection::House
        } else {
            Selection::Off
        }
    }

    /// Commit `selection`: the chosen rail becomes active, everything else
    /// inactive, all pending counts cleared.
    pub fn commit(&mut self, selection: Selection) {
        self.solar = if selection.solar_active() {
            RailState::Active
        } else {
            RailState::Inactive
        };
        self.house = if selection.house_active() {
            RailState::Active
        } else {
            RailState::Inactive
        };
    }

    /// Drop a pending condition on `rail` (active rails are untouched).
    pub fn clear_pending(&mut self, rail: Rail) {
        let slot = self.rail_mut(rail);
        if slot.is_pending() {
            *slot = RailState::Inactive;
        }
    }

    pub fn clear_all_pending(&mut self) {
        self.clear_pending(Rail::Solar);
        self.clear_pending(Rail::House);
    }

    /// Rail currently waiting for confirmation, with its count.
    pub fn pending(&self) -> Option<(Rail, u8)> {
        [Rail::Solar, Rail::House]
            .into_iter()
            .find_map(|r| match self.rail(r) {
                RailState::Pending(n) => Some((r, n)),
                _ => None,
            })
    }
}

// ---------------------------------------------------------------------------
// Observation (written by the service before each tick)
// ---------------------------------------------------------------------------

/// What the sensors reported this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observation {
    Temperature {
        celsius: i32,
        /// `None` when the solar probe was not consulted.
        solar_sufficient: Option<bool>,
    },
    Fault(SensorFault),
}

impl Default for Observation {
    fn default() -> Self {
        // Mid-band until the first real cycle: keeps the boot default.
        Self::Temperature {
            celsius: 22,
            solar_sufficient: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ArbiterContext
// ---------------------------------------------------------------------------

/// The shared context passed to every zone handler function.
pub struct ArbiterContext {
    // -- Input --
    pub observation: Observation,

    // -- State --
    pub state: SystemState,

    // -- Configuration --
    pub config: SystemConfig,
}

impl ArbiterContext {
    pub fn new(config: SystemConfig) -> Self {
        Self {
            observation: Observation::default(),
            state: SystemState::default(),
            config,
        }
    }

    /// Classify the current observation against the configured thresholds.
    pub fn observed_zone(&self) -> ZoneId {
        match self.observation {
            Observation::Fault(_) => ZoneId::Fault,
            Observation::Temperature { celsius, .. } => {
                if celsius >= self.config.too_hot_c {
                    ZoneId::Hot
                } else if celsius <= self.config.too_cold_c {
                    ZoneId::Cold
                } else {
                    ZoneId::Neutral
                }
            }
        }
    }

    /// Solar sufficiency for this cycle.  Adequate unless disproven.
    pub fn solar_sufficient(&self) -> bool {
        match self.observation {
            Observation::Temperature {
                solar_sufficient, ..
            } => solar_sufficient.unwrap_or(true),
            Observation::Fault(_) => false,
        }
    }

    /// The selection the rails should be driven to.
    pub fn selection(&self) -> Selection {
        self.state.selection()
    }
}
