//! Application core: control logic, zero I/O.
//!
//! This module wires the controllers, the scheduler and the display
//! renderer into one service.  All interaction with hardware happens
//! through **port traits** defined in [`ports`], keeping this layer fully
//! testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
pub mod tasks;
