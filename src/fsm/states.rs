//! Concrete zone handler functions and table builder.
//!
//! Each zone is defined by plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!              t <= too_cold            too_cold < t < too_hot
//!   ┌──────┐ ◀──────────────── ┌─────────┐ ──────────────▶ ┌──────┐
//!   │ COLD │                   │ NEUTRAL │                 │ HOT  │
//!   └──────┘ ────────────────▶ └─────────┘ ◀────────────── └──────┘
//!   both off                   solar on                    debounced
//!
//!  Any zone ──[sensor fault]──▶ FAULT (both off) ──[good reading]──▶ zone of t
//! ```
//!
//! Cold, neutral and fault act on the first cycle.  Only the hot zone
//! debounces: a change of rail must be observed for `confirm_cycles`
//! consecutive cycles before it is committed.

use super::context::{ArbiterContext, Observation, Rail, RailState, Selection};
use super::{ZoneDescriptor, ZoneId};
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static zone table.  Called once at startup.
pub fn build_zone_table() -> [ZoneDescriptor; ZoneId::COUNT] {
    [
        // Index 0: Cold
        ZoneDescriptor {
            name: "Cold",
            on_enter: Some(cold_enter),
            on_exit: None,
            on_update: cold_update,
        },
        // Index 1: Neutral
        ZoneDescriptor {
            name: "Neutral",
            on_enter: Some(neutral_enter),
            on_exit: None,
            on_update: neutral_update,
        },
        // Index 2: Hot
        ZoneDescriptor {
            name: "Hot",
            on_enter: Some(hot_enter),
            on_exit: Some(hot_exit),
            on_update: hot_update,
        },
        // Index 3: Fault
        ZoneDescriptor {
            name: "Fault",
            on_enter: Some(fault_enter),
            on_exit: Some(fault_exit),
            on_update: fault_update,
        },
    ]
}

/// `Some(observed)` when the observation belongs to a zone other than `here`.
fn leave_for(ctx: &ArbiterContext, here: ZoneId) -> Option<ZoneId> {
    let observed = ctx.observed_zone();
    (observed != here).then_some(observed)
}

// ═══════════════════════════════════════════════════════════════════════════
//  COLD zone: nothing to cool, drop both rails
// ═══════════════════════════════════════════════════════════════════════════

fn cold_enter(ctx: &mut ArbiterContext) {
    ctx.state.commit(Selection::Off);
    if let Observation::Temperature { celsius, .. } = ctx.observation {
        info!(
            "COLD: {}°C <= {}°C, both rails off",
            celsius, ctx.config.too_cold_c
        );
    }
}

fn cold_update(ctx: &mut ArbiterContext) -> Option<ZoneId> {
    if let next @ Some(_) = leave_for(ctx, ZoneId::Cold) {
        return next;
    }
    ctx.state.commit(Selection::Off);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  NEUTRAL zone: solar is the default source
// ═══════════════════════════════════════════════════════════════════════════

fn neutral_enter(ctx: &mut ArbiterContext) {
    ctx.state.commit(Selection::Solar);
    info!("NEUTRAL: solar rail on, house rail off");
}

fn neutral_update(ctx: &mut ArbiterContext) -> Option<ZoneId> {
    if let next @ Some(_) = leave_for(ctx, ZoneId::Neutral) {
        return next;
    }
    ctx.state.commit(Selection::Solar);
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  HOT zone: pick the rail that can carry the cooling load
// ═══════════════════════════════════════════════════════════════════════════

fn hot_enter(ctx: &mut ArbiterContext) {
    if let Observation::Temperature { celsius, .. } = ctx.observation {
        info!(
            "HOT: {}°C >= {}°C, arbitrating solar/house",
            celsius, ctx.config.too_hot_c
        );
    }
    hot_step(ctx);
}

fn hot_update(ctx: &mut ArbiterContext) -> Option<ZoneId> {
    if let next @ Some(_) = leave_for(ctx, ZoneId::Hot) {
        return next;
    }
    hot_step(ctx);
    None
}

fn hot_exit(ctx: &mut ArbiterContext) {
    // Unconfirmed candidates do not survive leaving the zone.
    ctx.state.clear_all_pending();
}

/// One debounced hot-zone decision.
///
/// The desired rail is house when solar is insufficient, solar otherwise.
/// If it is already active the competing rail's pending count is dropped.
/// Otherwise its own count advances and the switch commits once the count
/// reaches `confirm_cycles`.
fn hot_step(ctx: &mut ArbiterContext) {
    let desired = if ctx.solar_sufficient() {
        Rail::Solar
    } else {
        Rail::House
    };
    ctx.state.clear_pending(desired.other());

    let current = ctx.state.rail(desired);
    if current.is_active() {
        return;
    }

    let count = current.confirm_count().saturating_add(1);
    if count >= ctx.config.confirm_cycles {
        info!(
            "HOT: {} rail confirmed after {} cycles, switching",
            desired.name(),
            count
        );
        ctx.state.commit(Selection::of(Some(desired)));
    } else {
        *ctx.state.rail_mut(desired) = RailState::Pending(count);
        info!(
            "HOT: {} rail pending ({}/{})",
            desired.name(),
            count,
            ctx.config.confirm_cycles
        );
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAULT zone: no trustworthy temperature, fail safe
// ═══════════════════════════════════════════════════════════════════════════

fn fault_enter(ctx: &mut ArbiterContext) {
    ctx.state.commit(Selection::Off);
    ctx.state.last_temperature = None;
    if let Observation::Fault(fault) = ctx.observation {
        warn!("FAULT: {fault}, both rails off until a valid reading");
    }
}

fn fault_update(ctx: &mut ArbiterContext) -> Option<ZoneId> {
    if let next @ Some(_) = leave_for(ctx, ZoneId::Fault) {
        return next;
    }
    ctx.state.commit(Selection::Off);
    None
}

fn fault_exit(_ctx: &mut ArbiterContext) {
    info!("FAULT: valid reading restored");
}
