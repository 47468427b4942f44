//! Inter-task hand-off between worker threads and the control loop.
//!
//! Uses `embassy-sync` primitives in statics so the weather worker and
//! the command transport can reach the loop without heap allocation.
//! The control loop only ever polls; it never waits on either.
//!
//! `submit_command` is the entry point for the voice-assistant bridge,
//! which maps its device names through [`AppCommand::from_device`].
//!
//! ```text
//! ┌────────────────┐  AppCommand   ┌──────────────┐
//! │ Voice bridge   │──────────────▶│              │
//! └────────────────┘  (bounded)    │ Control loop │
//! ┌────────────────┐  humidity %   │   (sync)     │
//! │ Weather worker │──────────────▶│              │
//! └────────────────┘  (latest)     └──────────────┘
//! ```

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use crate::app::commands::AppCommand;

/// Channel depth for inbound commands.
const CMD_DEPTH: usize = 8;

/// Inbound command channel: voice bridge → control loop.
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, AppCommand, CMD_DEPTH> =
    Channel::new();

/// Latest outside humidity.  A newer value replaces an unread one.
pub static EXTERNAL_HUMIDITY: Signal<CriticalSectionRawMutex, u8> = Signal::new();

/// Queue a command for the control loop.  Returns `false` when full.
pub fn submit_command(cmd: AppCommand) -> bool {
    match COMMAND_CHANNEL.try_send(cmd) {
        Ok(()) => true,
        Err(_) => {
            log::warn!("CMD: queue full, command dropped");
            false
        }
    }
}

/// Next queued command, if any.
pub fn next_command() -> Option<AppCommand> {
    COMMAND_CHANNEL.try_receive().ok()
}

pub fn publish_external_humidity(pct: u8) {
    EXTERNAL_HUMIDITY.signal(pct);
}

/// Take the latest outside humidity published since the last call.
pub fn take_external_humidity() -> Option<u8> {
    EXTERNAL_HUMIDITY.try_take()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Statics are shared across the test binary: each test uses its own
    // primitive only.

    #[test]
    fn newest_humidity_wins() {
        publish_external_humidity(60);
        publish_external_humidity(72);
        assert_eq!(take_external_humidity(), Some(72));
        assert_eq!(take_external_humidity(), None);
    }

    #[test]
    fn commands_drain_in_order() {
        assert!(submit_command(AppCommand::Lamp(true)));
        assert!(submit_command(AppCommand::ClearAlert));
        assert_eq!(next_command(), Some(AppCommand::Lamp(true)));
        assert_eq!(next_command(), Some(AppCommand::ClearAlert));
        assert_eq!(next_command(), None);
    }
}
