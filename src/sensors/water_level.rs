//! Fish-tank float switches and the rain sensor.
//!
//! Each float closes to HIGH when water reaches it.  The rain sensor's
//! digital output goes LOW when the plate is wet.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads real GPIO levels via hw_init helpers.
//! On host/test: reads simulation flags (healthy tank, dry weather).

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

use crate::context::FloatSwitches;

#[cfg(not(target_os = "espidf"))]
static SIM_FLOAT_HIGH: AtomicBool = AtomicBool::new(false);
#[cfg(not(target_os = "espidf"))]
static SIM_FLOAT_LOW: AtomicBool = AtomicBool::new(true);
#[cfg(not(target_os = "espidf"))]
static SIM_RAIN: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_floats(floats: FloatSwitches) {
    SIM_FLOAT_HIGH.store(floats.high, Ordering::Relaxed);
    SIM_FLOAT_LOW.store(floats.low, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_rain(wet: bool) {
    SIM_RAIN.store(wet, Ordering::Relaxed);
}

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
pub struct FloatSwitchPair {
    high_gpio: i32,
    low_gpio: i32,
}

impl FloatSwitchPair {
    pub fn new(high_gpio: i32, low_gpio: i32) -> Self {
        Self { high_gpio, low_gpio }
    }

    #[cfg(target_os = "espidf")]
    pub fn read(&self) -> FloatSwitches {
        use crate::drivers::hw_init::gpio_read;
        FloatSwitches {
            high: gpio_read(self.high_gpio),
            low: gpio_read(self.low_gpio),
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read(&self) -> FloatSwitches {
        FloatSwitches {
            high: SIM_FLOAT_HIGH.load(Ordering::Relaxed),
            low: SIM_FLOAT_LOW.load(Ordering::Relaxed),
        }
    }
}

#[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
pub struct RainSensor {
    gpio: i32,
}

impl RainSensor {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    #[cfg(target_os = "espidf")]
    pub fn wet(&self) -> bool {
        !crate::drivers::hw_init::gpio_read(self.gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn wet(&self) -> bool {
        SIM_RAIN.load(Ordering::Relaxed)
    }
}
