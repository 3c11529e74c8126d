//! Function-pointer zone state machine: the power arbiter.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  ZoneTable                                               │
//! │  ┌─────────┬───────────┬──────────┬───────────────────┐  │
//! │  │ ZoneId  │ on_enter  │ on_exit  │ on_update         │  │
//! │  ├─────────┼───────────┼──────────┼───────────────────┤  │
//! │  │ Cold    │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ Neutral │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ Hot     │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  │ Fault   │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<> │  │
//! │  └─────────┴───────────┴──────────┴───────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** zone.  If
//! the observation now belongs to another zone it returns `Some(next)`;
//! the engine runs `on_exit` for the current zone, then `on_enter` for the
//! next.  Every zone applies its rail policy both on entry and on update,
//! so one tick always leaves [`SystemState`](context::SystemState) in the
//! zone's target shape.

pub mod context;
pub mod states;

use context::{ArbiterContext, Observation, Selection};
use log::info;

// ---------------------------------------------------------------------------
// Zone identity
// ---------------------------------------------------------------------------

/// Temperature zones the arbiter distinguishes.
/// Must stay in sync with the table built in [`states::build_zone_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ZoneId {
    /// `t <= too_cold`: both rails off.
    Cold = 0,
    /// `too_cold < t < too_hot`: solar on, house off.
    Neutral = 1,
    /// `t >= too_hot`: debounced solar/house selection.
    Hot = 2,
    /// Sensor fault: handled like `Cold`.
    Fault = 3,
}

impl ZoneId {
    /// Total number of zones: used to size the table array.
    pub const COUNT: usize = 4;

    /// Convert a `usize` index back to `ZoneId`.  Returns `Fault` for
    /// out-of-range indices (fail-safe).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Cold,
            1 => Self::Neutral,
            2 => Self::Hot,
            3 => Self::Fault,
            _ => {
                debug_assert!(false, "invalid zone index: {idx}");
                Self::Fault
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type ZoneActionFn = fn(&mut ArbiterContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type ZoneUpdateFn = fn(&mut ArbiterContext) -> Option<ZoneId>;

// ---------------------------------------------------------------------------
// Zone descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single zone.
pub struct ZoneDescriptor {
    pub name: &'static str,
    pub on_enter: Option<ZoneActionFn>,
    pub on_exit: Option<ZoneActionFn>,
    pub on_update: ZoneUpdateFn,
}

// ---------------------------------------------------------------------------
// Arbiter engine
// ---------------------------------------------------------------------------

/// The power-source arbiter.
///
/// Owns the zone table.  The [`ArbiterContext`] (and the
/// [`SystemState`](context::SystemState) inside it) belongs to the caller
/// and is threaded through every handler call.
pub struct PowerArbiter {
    /// Fixed-size table indexed by `ZoneId as usize`.
    table: [ZoneDescriptor; ZoneId::COUNT],
    /// Index of the current zone.
    current: usize,
}

impl PowerArbiter {
    /// Construct an arbiter with the given table, starting in `initial`.
    pub fn new(table: [ZoneDescriptor; ZoneId::COUNT], initial: ZoneId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Arbiter with the standard zone table, starting in `Neutral` so that
    /// `start` asserts the solar boot default.
    pub fn standard() -> Self {
        Self::new(states::build_zone_table(), ZoneId::Neutral)
    }

    /// Run the initial `on_enter` for the starting zone.
    /// Call once after construction, before the first `evaluate()`.
    pub fn start(&mut self, ctx: &mut ArbiterContext) {
        info!("Arbiter starting in zone: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the arbiter by one control cycle using `ctx.observation`.
    fn tick(&mut self, ctx: &mut ArbiterContext) {
        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Record `observation`, run one cycle, and return the rail selection
    /// the outputs should now be driven to.
    pub fn evaluate(&mut self, ctx: &mut ArbiterContext, observation: Observation) -> Selection {
        ctx.observation = observation;
        self.tick(ctx);
        ctx.selection()
    }

    /// The current zone.
    pub fn current_zone(&self) -> ZoneId {
        ZoneId::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: ZoneId, ctx: &mut ArbiterContext) {
        let next_idx = next_id as usize;

        info!(
            "Zone transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
