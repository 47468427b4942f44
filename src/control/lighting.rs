//! Grow-light schedule.
//!
//! Between `light_on_hour` and `light_off_hour` (inclusive) the light
//! contactor, the spotlight and every LED are on.  Until wall-clock time is
//! known the outputs are left as they are.

use log::{debug, info};

use crate::context::{Actuator, ControlContext};

#[derive(Debug, Default)]
pub struct LightingController {
    lit: Option<bool>,
}

impl LightingController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the schedule for `hour`.  Returns the new state when it changed.
    pub fn tick(&mut self, ctx: &mut ControlContext, hour: Option<u8>) -> Option<bool> {
        if ctx.overrides.lighting {
            debug!("LIGHTS: overridden, holding outputs");
            return None;
        }
        let Some(hour) = hour else {
            debug!("LIGHTS: wall clock unknown, skipping");
            return None;
        };

        let on = (ctx.config.light_on_hour..=ctx.config.light_off_hour).contains(&hour);
        set_lighting(ctx, on);

        if self.lit == Some(on) {
            return None;
        }
        self.lit = Some(on);
        info!("LIGHTS: {} at {:02}h", if on { "on" } else { "off" }, hour);
        Some(on)
    }
}

/// Switch the whole lighting group: contactor, spotlight and LEDs.
pub fn set_lighting(ctx: &mut ControlContext, on: bool) {
    ctx.intent.set(Actuator::LightContactor, on);
    ctx.intent.set(Actuator::Spotlight, on);
    ctx.intent.leds.set_all(on, on);
}
