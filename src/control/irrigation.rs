//! Irrigation valve timer.
//!
//! Called once per irrigation interval.  Every `irrigation_multiplier`-th
//! call opens the valve for one interval; every other call closes it.

use log::info;

use crate::context::{Actuator, ControlContext};

#[derive(Debug, Default)]
pub struct IrrigationController {
    calls: u8,
}

impl IrrigationController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new valve state.
    pub fn tick(&mut self, ctx: &mut ControlContext) -> bool {
        self.calls = self.calls.saturating_add(1);
        let open = self.calls >= ctx.config.irrigation_multiplier;
        if open {
            self.calls = 0;
        }
        if open != ctx.intent.get(Actuator::IrrigationValve) {
            info!("IRRIGATION: valve {}", if open { "open" } else { "closed" });
        }
        ctx.intent.set(Actuator::IrrigationValve, open);
        open
    }
}
