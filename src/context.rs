//! Shared mutable context threaded through every scheduled task.
//!
//! `ControlContext` is the single struct that tasks read from and write to.
//! It contains the latest sensor snapshot, the actuator intent, the
//! override flags owned by the command channel, the alert line, and the
//! configuration.  Think of it as the "blackboard" in a blackboard
//! architecture; only one task touches it at any instant.

use heapless::String;

use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// Sensor snapshot (written by the sensor task only)
// ---------------------------------------------------------------------------

/// Fish-tank float switches.  `true` = water present at that float.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatSwitches {
    pub high: bool,
    pub low: bool,
}

impl Default for FloatSwitches {
    fn default() -> Self {
        // Assume a healthy tank until the first read.
        Self { high: false, low: true }
    }
}

/// A point-in-time snapshot of every input the controllers consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorReading {
    /// Air temperature (°C).
    pub temperature_c: i16,
    /// Relative humidity inside the enclosure (%).
    pub humidity_pct: u8,
    /// Relative humidity outside, from the weather collaborator (%).
    pub external_humidity_pct: u8,
    /// Rain sensor is wet.
    pub raining: bool,
    /// Water is moving through the pump outlet.
    pub flow_detected: bool,
    pub floats: FloatSwitches,
}

impl Default for SensorReading {
    fn default() -> Self {
        Self {
            temperature_c: 25,
            humidity_pct: 70,
            external_humidity_pct: 70,
            raining: false,
            flow_detected: false,
            floats: FloatSwitches::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Actuator table
// ---------------------------------------------------------------------------

/// Relay-bank actuators, in wire order (bit 7 first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Actuator {
    Pump1 = 0,
    Pump2 = 1,
    TankValve = 2,
    IrrigationValve = 3,
    LightContactor = 4,
    Exhaust = 5,
    Spotlight = 6,
    Lamp = 7,
}

impl Actuator {
    /// Total number of relay channels.
    pub const COUNT: usize = 8;

    /// Every actuator in table order.
    pub const ALL: [Actuator; Self::COUNT] = [
        Self::Pump1,
        Self::Pump2,
        Self::TankValve,
        Self::IrrigationValve,
        Self::LightContactor,
        Self::Exhaust,
        Self::Spotlight,
        Self::Lamp,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Pump1 => "pump-1",
            Self::Pump2 => "pump-2",
            Self::TankValve => "tank-valve",
            Self::IrrigationValve => "irrigation-valve",
            Self::LightContactor => "light-contactor",
            Self::Exhaust => "exhaust",
            Self::Spotlight => "spotlight",
            Self::Lamp => "lamp",
        }
    }
}

/// Grow-light LED colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColour {
    Red,
    Blue,
}

/// Number of LEDs of each colour.
pub const LEDS_PER_COLOUR: usize = 12;

/// Desired state of every grow-light LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GrowLights {
    pub red: [bool; LEDS_PER_COLOUR],
    pub blue: [bool; LEDS_PER_COLOUR],
}

impl GrowLights {
    /// Set a single LED.  Out-of-range indices are ignored.
    pub fn set(&mut self, colour: LedColour, index: usize, on: bool) {
        let leds = match colour {
            LedColour::Red => &mut self.red,
            LedColour::Blue => &mut self.blue,
        };
        if let Some(led) = leds.get_mut(index) {
            *led = on;
        }
    }

    /// Set every LED of both colours.
    pub fn set_all(&mut self, red: bool, blue: bool) {
        self.red = [red; LEDS_PER_COLOUR];
        self.blue = [blue; LEDS_PER_COLOUR];
    }

    pub fn any_on(&self) -> bool {
        self.red.iter().chain(self.blue.iter()).any(|&on| on)
    }
}

/// What the air conditioner is asked to do by the temperature branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClimateAssist {
    #[default]
    Off,
    /// Heat towards the set point.
    Heat { setpoint_c: i16 },
    /// Cool towards the set point (exhaust escalation).
    Cool { setpoint_c: i16 },
}

/// Logical air-conditioner demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClimateIntent {
    pub assist: ClimateAssist,
    pub dehumidify: bool,
}

impl ClimateIntent {
    /// The unit must be powered.
    pub fn is_on(&self) -> bool {
        self.assist != ClimateAssist::Off || self.dehumidify
    }
}

/// Desired state of every output.  Written by controllers, read by the
/// output flush and the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ActuatorIntent {
    relays: [bool; Actuator::COUNT],
    pub leds: GrowLights,
    pub climate: ClimateIntent,
}

impl ActuatorIntent {
    /// All outputs off.
    pub fn all_off() -> Self {
        Self::default()
    }

    pub fn get(&self, actuator: Actuator) -> bool {
        self.relays[actuator as usize]
    }

    pub fn set(&mut self, actuator: Actuator, on: bool) {
        self.relays[actuator as usize] = on;
    }

    /// Relay states in wire order.
    pub fn relays(&self) -> [bool; Actuator::COUNT] {
        self.relays
    }

    /// True if either pump is commanded on.
    pub fn pump_running(&self) -> bool {
        self.get(Actuator::Pump1) || self.get(Actuator::Pump2)
    }
}

// ---------------------------------------------------------------------------
// Overrides
// ---------------------------------------------------------------------------

/// Per-group flags: `true` means the external command channel owns the
/// group and automation must leave it alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverrideFlags {
    pub pump: bool,
    pub exhaust: bool,
    pub lighting: bool,
}

// ---------------------------------------------------------------------------
// ControlContext
// ---------------------------------------------------------------------------

/// Longest alert line kept; longer text is truncated.
pub const ALERT_CAP: usize = 64;

/// Free-text alert shown on the second display row.
pub type AlertText = String<ALERT_CAP>;

/// The shared context passed to every scheduled task.
pub struct ControlContext {
    /// Latest sensor readings.
    pub readings: SensorReading,
    /// Desired actuator states, flushed to the bus once per loop.
    pub intent: ActuatorIntent,
    /// Groups currently owned by the command channel.
    pub overrides: OverrideFlags,
    /// Alert line; replaces the pump countdown until cleared.
    pub alert: Option<AlertText>,
    /// System configuration (tunable parameters).
    pub config: SystemConfig,
}

impl ControlContext {
    /// Create a new context with the given configuration.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            readings: SensorReading::default(),
            intent: ActuatorIntent::all_off(),
            overrides: OverrideFlags::default(),
            alert: None,
            config,
        }
    }
}
