//! BioControl firmware library.
//!
//! Greenhouse and aquaponics supervisory controller: climate-driven
//! exhaust and heater assist, timed recirculation pump with flow
//! failover, irrigation and lighting schedules, tank top-up and a
//! scrolling 16x2 status display.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod bus;
pub mod channels;
pub mod config;
pub mod context;
pub mod control;
pub mod display;
pub mod error;
pub mod pins;
pub mod scheduler;

// Hardware-facing modules; each one carries a host simulation behind
// cfg attributes so the crate builds and tests off-target.
pub mod adapters;
pub mod drivers;
pub mod sensors;

#[cfg(target_os = "espidf")]
mod esp_link_shims;
