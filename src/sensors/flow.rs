//! Hall-effect flow switch on the pump outlet.
//!
//! Digital output, HIGH while water moves.  Only presence of flow matters
//! to the failover logic, so no pulse counting is done.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads the GPIO level via hw_init helpers.
//! On host/test: reads a simulation flag (default: no flow).

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(not(target_os = "espidf"))]
static SIM_FLOW: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_flow(flowing: bool) {
    SIM_FLOW.store(flowing, Ordering::Relaxed);
}

pub struct FlowSwitch {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    gpio: i32,
}

impl FlowSwitch {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    #[cfg(target_os = "espidf")]
    pub fn flowing(&self) -> bool {
        crate::drivers::hw_init::gpio_read(self.gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn flowing(&self) -> bool {
        SIM_FLOW.load(Ordering::Relaxed)
    }
}
