//! Water pump duty cycle with optional flow failover.
//!
//! The pump task runs once per pump interval.  Pump 1 runs for one call,
//! then both pumps rest for `pump_off_multiplier` calls.
//!
//! With `pump_failover` enabled a faster flow-check task watches the flow
//! switch while a pump is commanded on:
//!
//! ```text
//!  PRIMARY (pump 1) ──[no flow for settle time]──▶ SECONDARY (pump 2)
//!                                                      │
//!                          [no flow for settle time]   ▼
//!                                                  DRY_TANK (both off)
//! ```
//!
//! The next pump-task call after a failover ends the run phase as usual and
//! the following cycle starts on pump 1 again.

use log::{debug, info, warn};

use crate::config::SystemConfig;
use crate::context::{Actuator, ControlContext};

/// Phase change reported by [`PumpCycleController::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumpPhase {
    Started,
    Stopped,
}

/// Which pump the failover logic is currently relying on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PumpStage {
    #[default]
    Primary,
    Secondary,
    DryTank,
}

#[derive(Debug, Default)]
pub struct PumpCycleController {
    off_calls: u8,
    cycles: u32,
    /// Uptime of the last pump-task call.
    last_call_ms: u64,
    stage: PumpStage,
    /// Uptime the current failover stage began.
    stage_started_ms: u64,
}

impl PumpCycleController {
    pub fn new() -> Self {
        Self::default()
    }

    /// One pump-task invocation.  Returns the phase change, if any.
    pub fn tick(&mut self, ctx: &mut ControlContext, now_ms: u64) -> Option<PumpPhase> {
        if ctx.overrides.pump {
            debug!("PUMP: overridden, holding outputs");
            return None;
        }
        self.last_call_ms = now_ms;
        let multiplier = ctx.config.pump_off_multiplier;

        let running = ctx.intent.pump_running() || self.stage == PumpStage::DryTank;
        if !running && self.off_calls >= multiplier {
            ctx.intent.set(Actuator::Pump1, true);
            ctx.intent.set(Actuator::Pump2, false);
            self.off_calls = 0;
            self.stage = PumpStage::Primary;
            self.stage_started_ms = now_ms;
            info!("PUMP: on (cycle {})", self.cycles + 1);
            Some(PumpPhase::Started)
        } else if running {
            ctx.intent.set(Actuator::Pump1, false);
            ctx.intent.set(Actuator::Pump2, false);
            self.off_calls = self.off_calls.saturating_add(1);
            self.cycles = self.cycles.wrapping_add(1);
            self.stage = PumpStage::Primary;
            info!("PUMP: off after {} cycles", self.cycles);
            Some(PumpPhase::Stopped)
        } else {
            self.off_calls = self.off_calls.saturating_add(1);
            debug!("PUMP: resting {}/{}", self.off_calls, multiplier);
            None
        }
    }

    /// Flow-check task body.  Advances the failover stage when the running
    /// pump shows no flow for `flow_settle_ms`.
    pub fn check_flow(&mut self, ctx: &mut ControlContext, now_ms: u64) -> Option<PumpStage> {
        if ctx.overrides.pump || !ctx.config.pump_failover {
            return None;
        }
        if !ctx.intent.pump_running() || ctx.readings.flow_detected {
            return None;
        }
        if now_ms.wrapping_sub(self.stage_started_ms) < ctx.config.flow_settle_ms {
            return None;
        }

        match self.stage {
            PumpStage::Primary => {
                warn!("PUMP: no flow on pump 1, switching to pump 2");
                ctx.intent.set(Actuator::Pump1, false);
                ctx.intent.set(Actuator::Pump2, true);
                self.stage = PumpStage::Secondary;
            }
            PumpStage::Secondary => {
                warn!("PUMP: no flow on pump 2, tank dry, pumps off");
                ctx.intent.set(Actuator::Pump1, false);
                ctx.intent.set(Actuator::Pump2, false);
                self.stage = PumpStage::DryTank;
            }
            PumpStage::DryTank => return None,
        }
        self.stage_started_ms = now_ms;
        Some(self.stage)
    }

    /// Milliseconds until the next phase change, for the status display.
    pub fn countdown_ms(&self, now_ms: u64, pump_running: bool, config: &SystemConfig) -> u64 {
        let calls_left = if pump_running {
            1
        } else {
            // Calls still counted as rest, plus the one that starts the pump.
            u64::from(config.pump_off_multiplier.saturating_sub(self.off_calls)) + 1
        };
        let since_call = now_ms.wrapping_sub(self.last_call_ms);
        (calls_left * config.pump_interval_ms).saturating_sub(since_call)
    }

    pub fn off_calls(&self) -> u8 {
        self.off_calls
    }

    /// Completed run phases since boot.
    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    pub fn stage(&self) -> PumpStage {
        self.stage
    }
}
