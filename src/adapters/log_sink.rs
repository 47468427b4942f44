//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::PumpStage;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { tasks } => {
                info!("START | tasks={} | self test running", tasks);
            }
            AppEvent::SelfTestComplete => {
                info!("START | self test complete, automatic control live");
            }
            AppEvent::EnvironmentChanged { from, to } => {
                info!("ENV | {:?} -> {:?}", from, to);
            }
            AppEvent::PumpPhase(phase) => {
                info!("PUMP | {:?}", phase);
            }
            AppEvent::PumpFailover(PumpStage::DryTank) => {
                warn!("PUMP | no flow on either pump, both stopped");
            }
            AppEvent::PumpFailover(stage) => {
                warn!("PUMP | no flow, failover to {:?}", stage);
            }
            AppEvent::OverrideChanged { group, manual } => {
                info!(
                    "CMD | {:?} {}",
                    group,
                    if *manual { "manual" } else { "automatic" }
                );
            }
            AppEvent::AlertChanged(Some(text)) => {
                info!("ALERT | {}", text);
            }
            AppEvent::AlertChanged(None) => {
                info!("ALERT | cleared");
            }
            AppEvent::SensorReadFailed => {
                debug!("SENSOR | climate read failed");
            }
        }
    }
}
