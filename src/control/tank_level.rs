//! Fish-tank top-up valve.
//!
//! Opens when the lower float runs dry, closes once the upper float is
//! wet.  Between the floats the valve keeps its last state.

use log::info;

use crate::context::{Actuator, ControlContext};

#[derive(Debug, Default)]
pub struct TankLevelController;

impl TankLevelController {
    pub fn new() -> Self {
        Self
    }

    /// Returns the new valve state when it changed.
    pub fn tick(&mut self, ctx: &mut ControlContext) -> Option<bool> {
        let floats = ctx.readings.floats;
        let open = ctx.intent.get(Actuator::TankValve);

        let next = if floats.high {
            false
        } else if !floats.low {
            true
        } else {
            open
        };
        if next == open {
            return None;
        }
        ctx.intent.set(Actuator::TankValve, next);
        info!("TANK: valve {}", if next { "open" } else { "closed" });
        Some(next)
    }
}
