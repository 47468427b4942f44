//! Mock hardware adapter for integration tests.
//!
//! Records every actuator flush and display write so tests can assert on
//! the full output history without touching real GPIO or I2C.

use biocontrol::app::events::AppEvent;
use biocontrol::app::ports::{
    ActuatorPort, ClimateSample, DisplayPort, EventSink, SensorPort, TimePort,
};
use biocontrol::context::{Actuator, ActuatorIntent, FloatSwitches};
use biocontrol::error::SensorError;

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Uptime reported to the service.
    pub now_ms: u64,
    pub hour: Option<u8>,

    pub climate: Result<ClimateSample, SensorError>,
    pub flow: bool,
    pub floats: FloatSwitches,
    pub raining: bool,
    /// Returned once by the next humidity poll.
    pub external_humidity: Option<u8>,

    /// Every intent flushed to the outputs, in order.
    pub applied: Vec<ActuatorIntent>,
    pub rows: [String; 2],
    pub clears: usize,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            hour: None,
            climate: Ok(ClimateSample {
                temperature_c: 25,
                humidity_pct: 70,
            }),
            flow: true,
            floats: FloatSwitches {
                high: false,
                low: true,
            },
            raining: false,
            external_humidity: None,
            applied: Vec::new(),
            rows: [blank(), blank()],
            clears: 0,
        }
    }

    pub fn set_climate(&mut self, temperature_c: i16, humidity_pct: u8) {
        self.climate = Ok(ClimateSample {
            temperature_c,
            humidity_pct,
        });
    }

    pub fn last(&self) -> ActuatorIntent {
        self.applied.last().copied().unwrap_or_default()
    }

    pub fn is_on(&self, actuator: Actuator) -> bool {
        self.last().get(actuator)
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

fn blank() -> String {
    " ".repeat(16)
}

impl SensorPort for MockHardware {
    fn read_climate(&mut self) -> Result<ClimateSample, SensorError> {
        self.climate
    }

    fn read_flow(&mut self) -> bool {
        self.flow
    }

    fn read_float_switches(&mut self) -> FloatSwitches {
        self.floats
    }

    fn read_rain(&mut self) -> bool {
        self.raining
    }

    fn poll_external_humidity(&mut self) -> Option<u8> {
        self.external_humidity.take()
    }
}

impl ActuatorPort for MockHardware {
    fn apply(&mut self, intent: &ActuatorIntent) {
        self.applied.push(*intent);
    }
}

impl DisplayPort for MockHardware {
    fn write_at(&mut self, row: u8, col: u8, text: &str) {
        let row = &mut self.rows[usize::from(row)];
        let mut cells: Vec<char> = row.chars().collect();
        for (i, c) in text.chars().enumerate() {
            if let Some(cell) = cells.get_mut(usize::from(col) + i) {
                *cell = c;
            }
        }
        *row = cells.into_iter().collect();
    }

    fn clear(&mut self) {
        self.rows = [blank(), blank()];
        self.clears += 1;
    }
}

impl TimePort for MockHardware {
    fn uptime_ms(&self) -> u64 {
        self.now_ms
    }

    fn current_hour(&self) -> Option<u8> {
        self.hour
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps every event.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
