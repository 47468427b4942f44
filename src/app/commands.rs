//! Inbound commands to the application service.
//!
//! The voice-assistant bridge exposes one named on/off device per
//! actuator group.  The `-auto` devices are inverted: switching one on
//! hands the group back to automation, switching it off takes manual
//! ownership.
//!
//! Produced by the voice bridge and queued through
//! [`channels::submit_command`](crate::channels::submit_command).

use crate::context::AlertText;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Drive pump 1 directly; pump 2 is switched off.
    Pump(bool),
    /// `true` returns the pump group to the duty cycle.
    PumpAuto(bool),
    Exhaust(bool),
    ExhaustAuto(bool),
    /// Both LED colours and the light contactor.
    Lighting(bool),
    Spotlight(bool),
    Lamp(bool),
    LightingAuto(bool),
    /// Replace the pump countdown on row 1 with free text.
    SetAlert(AlertText),
    ClearAlert,
}

impl AppCommand {
    /// Map a bridge device name and state onto a command.
    pub fn from_device(name: &str, on: bool) -> Option<Self> {
        let cmd = match name {
            "pump" => Self::Pump(on),
            "pump-auto" => Self::PumpAuto(on),
            "exhaust" => Self::Exhaust(on),
            "exhaust-auto" => Self::ExhaustAuto(on),
            "lighting" => Self::Lighting(on),
            "spotlight" => Self::Spotlight(on),
            "lamp" => Self::Lamp(on),
            "lighting-auto" => Self::LightingAuto(on),
            _ => return None,
        };
        Some(cmd)
    }

    /// Build a [`SetAlert`](Self::SetAlert), truncating to the alert capacity.
    pub fn alert(text: &str) -> Self {
        let mut line = AlertText::new();
        for c in text.chars() {
            if line.push(c).is_err() {
                break;
            }
        }
        Self::SetAlert(line)
    }
}
