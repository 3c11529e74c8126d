//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn or_dash<T: core::fmt::Display>(v: Option<T>) -> String {
    v.map_or_else(|| "-".to_string(), |v| v.to_string())
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => {
                let pending = t
                    .pending
                    .map_or_else(|| "-".to_string(), |(r, n)| format!("{}:{n}", r.name()));
                info!(
                    "TELEM | cycle={} | zone={:?} | T={}\u{00b0}C | solar_raw={} | rails={:?} | \
                     pending={} | faults={}",
                    t.cycle,
                    t.zone,
                    or_dash(t.celsius),
                    or_dash(t.solar_raw),
                    t.selection,
                    pending,
                    t.fault_count,
                );
            }
            AppEvent::ZoneChanged { from, to } => {
                info!("ZONE | {from:?} -> {to:?}");
            }
            AppEvent::RailSwitched { from, to, celsius } => {
                info!("SWITCH | {from:?} -> {to:?} at T={}\u{00b0}C", or_dash(*celsius));
            }
            AppEvent::SwitchPending { rail, count, needed } => {
                info!("PENDING | {} {count}/{needed}", rail.name());
            }
            AppEvent::PendingCleared { rail } => {
                info!("PENDING | {} cleared", rail.name());
            }
            AppEvent::SensorFault(fault) => {
                warn!("FAULT | sensor: {fault}");
            }
            AppEvent::RailFault(selection) => {
                warn!("FAULT | rails could not reach {selection:?}");
            }
            AppEvent::Started(selection) => {
                info!("START | rails={selection:?}");
            }
        }
    }
}
