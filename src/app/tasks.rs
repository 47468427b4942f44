//! Periodic task table.
//!
//! Registration order is execution order within one scheduler tick.

use crate::config::SystemConfig;
use crate::scheduler::{Scheduler, SchedulerFull};

/// Every periodic job the control loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    PumpCycle,
    Lighting,
    Irrigation,
    ReadSensors,
    Display,
    Environment,
    TankLevel,
    FlowCheck,
}

/// Scheduler capacity: one slot per [`Task`].
pub const MAX_TASKS: usize = 8;

pub type TaskScheduler = Scheduler<Task, MAX_TASKS>;

/// Register the task table for `config`.  The flow check only runs with
/// pump failover enabled.
pub fn register_all(sched: &mut TaskScheduler, config: &SystemConfig) -> Result<(), SchedulerFull> {
    sched.register("pump", config.pump_interval_ms, Task::PumpCycle)?;
    sched.register("lighting", config.lighting_interval_ms, Task::Lighting)?;
    sched.register("irrigation", config.irrigation_interval_ms, Task::Irrigation)?;
    sched.register("sensors", config.sensor_interval_ms, Task::ReadSensors)?;
    sched.register("display", config.display_interval_ms, Task::Display)?;
    sched.register("environment", config.environment_interval_ms, Task::Environment)?;
    sched.register("tank", config.tank_interval_ms, Task::TankLevel)?;
    if config.pump_failover {
        sched.register("flow-check", config.flow_check_interval_ms, Task::FlowCheck)?;
    }
    Ok(())
}
