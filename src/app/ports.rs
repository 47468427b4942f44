//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, the actuator bus, the character display, the
//! clock, event sinks) implement these traits.  The
//! [`AppService`](super::service::AppService) consumes them via generics,
//! so the control core never touches hardware directly.

use crate::context::{ActuatorIntent, FloatSwitches};
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// One air temperature / humidity measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClimateSample {
    pub temperature_c: i16,
    pub humidity_pct: u8,
}

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Sample the enclosure air sensor.
    fn read_climate(&mut self) -> Result<ClimateSample, SensorError>;

    /// Water is moving through the pump outlet.
    fn read_flow(&mut self) -> bool;

    fn read_float_switches(&mut self) -> FloatSwitches;

    /// Rain sensor is wet.
    fn read_rain(&mut self) -> bool;

    /// Latest outside humidity published by the weather collaborator since
    /// the previous call.  Never blocks.
    fn poll_external_humidity(&mut self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: makes the actuator intent physical.
pub trait ActuatorPort {
    /// Push every relay and LED bank to the outputs.
    fn apply(&mut self, intent: &ActuatorIntent);
}

// ───────────────────────────────────────────────────────────────
// Display port
// ───────────────────────────────────────────────────────────────

/// Character display surface addressed by (row, column).
pub trait DisplayPort {
    /// Write `text` starting at the given cell.  Callers clip to the row.
    fn write_at(&mut self, row: u8, col: u8, text: &str);

    fn clear(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Time port
// ───────────────────────────────────────────────────────────────

pub trait TimePort {
    /// Milliseconds since boot (monotonic).
    fn uptime_ms(&self) -> u64;

    /// Hour of day (0–23), `None` until the wall clock is synced.
    fn current_hour(&self) -> Option<u8>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

/// Everything the service drives on one board.
pub trait Hardware: SensorPort + ActuatorPort + DisplayPort + TimePort {}

impl<T: SensorPort + ActuatorPort + DisplayPort + TimePort> Hardware for T {}
