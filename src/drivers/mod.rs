//! Hardware initialisation, the LCD panel driver, and task pinning helpers.

pub mod hw_init;
pub mod lcd;
pub mod task_pin;
