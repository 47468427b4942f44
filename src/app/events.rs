//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use crate::context::AlertText;
use crate::control::{EnvState, PumpPhase, PumpStage};

/// Actuator group an override applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverrideGroup {
    Pump,
    Exhaust,
    Lighting,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service registered its tasks and began the boot self test.
    Started { tasks: usize },

    /// The boot actuator walk finished; automatic control is live.
    SelfTestComplete,

    /// The environment controller changed logical state.
    EnvironmentChanged { from: EnvState, to: EnvState },

    /// The pump duty cycle started or stopped a run.
    PumpPhase(PumpPhase),

    /// Flow failover moved to another stage.
    PumpFailover(PumpStage),

    /// The command channel took or released an actuator group.
    OverrideChanged { group: OverrideGroup, manual: bool },

    /// Alert line set (`Some`) or cleared (`None`).
    AlertChanged(Option<AlertText>),

    /// The air sensor could not be read; the previous values stand.
    SensorReadFailed,
}
