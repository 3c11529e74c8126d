//! Outbound application events.
//!
//! The [`ArbiterService`](super::service::ArbiterService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on the
//! other side decide what to do with them.

use crate::error::SensorFault;
use crate::fsm::ZoneId;
use crate::fsm::context::{Rail, Selection};

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started and driven the boot default.
    Started(Selection),

    /// The observed temperature moved into another zone.
    ZoneChanged { from: ZoneId, to: ZoneId },

    /// The rail outputs were driven to a new selection.
    RailSwitched {
        from: Selection,
        to: Selection,
        /// Temperature that caused the switch, if one was valid.
        celsius: Option<i32>,
    },

    /// A rail candidate advanced but is not yet confirmed.
    SwitchPending { rail: Rail, count: u8, needed: u8 },

    /// A pending candidate was dropped before confirmation.
    PendingCleared { rail: Rail },

    /// This cycle's temperature could not be used.
    SensorFault(SensorFault),

    /// Driving the rail outputs failed.
    RailFault(Selection),

    /// Per-cycle snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryData {
    pub cycle: u64,
    pub zone: ZoneId,
    pub celsius: Option<i32>,
    /// Raw solar sense count, when probed this cycle.
    pub solar_raw: Option<u16>,
    pub selection: Selection,
    pub pending: Option<(Rail, u8)>,
    pub fault_count: u32,
}
