//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`], the shift-register [`ActuatorBus`], the
//! character LCD and the clock, exposing them through the port traits.
//! This is the only module in the system that touches actual hardware.
//! On non-espidf targets, the underlying drivers use cfg-gated
//! simulation stubs.

use crate::app::ports::{
    ActuatorPort, ClimateSample, DisplayPort, SensorPort, TimePort,
};
use crate::bus::{ActuatorBus, ShiftRegisterChain};
use crate::channels;
use crate::context::{ActuatorIntent, FloatSwitches};
use crate::drivers::hw_init::{GpioLine, RomDelay};
use crate::drivers::lcd::CharLcd;
use crate::error::SensorError;
use crate::pins;
use crate::sensors::SensorHub;

use super::time::Esp32TimeAdapter;

/// The four 74HC595 chains of the board, driven over raw GPIO.
pub type BoardBus = ActuatorBus<GpioLine, RomDelay>;

/// Bus wired to the board's pin map, relay bank first.
pub fn bus_on_board() -> BoardBus {
    let chain = |data, clock, latch| {
        ShiftRegisterChain::new(GpioLine(data), GpioLine(clock), GpioLine(latch))
    };
    ActuatorBus::new(
        [
            chain(pins::RELAY_DATA_GPIO, pins::RELAY_CLOCK_GPIO, pins::RELAY_LATCH_GPIO),
            chain(pins::LEDS1_DATA_GPIO, pins::LEDS1_CLOCK_GPIO, pins::LEDS1_LATCH_GPIO),
            chain(pins::LEDS2_DATA_GPIO, pins::LEDS2_CLOCK_GPIO, pins::LEDS2_LATCH_GPIO),
            chain(pins::LEDS3_DATA_GPIO, pins::LEDS3_CLOCK_GPIO, pins::LEDS3_LATCH_GPIO),
        ],
        RomDelay,
    )
}

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    bus: BoardBus,
    lcd: CharLcd,
    clock: Esp32TimeAdapter,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, bus: BoardBus, lcd: CharLcd, clock: Esp32TimeAdapter) -> Self {
        Self {
            sensor_hub,
            bus,
            lcd,
            clock,
        }
    }

    /// Last bank images pushed to the shift registers.
    pub fn bus(&self) -> &BoardBus {
        &self.bus
    }

    pub fn lcd(&self) -> &CharLcd {
        &self.lcd
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_climate(&mut self) -> Result<ClimateSample, SensorError> {
        self.sensor_hub.read_climate()
    }

    fn read_flow(&mut self) -> bool {
        self.sensor_hub.read_flow()
    }

    fn read_float_switches(&mut self) -> FloatSwitches {
        self.sensor_hub.read_floats()
    }

    fn read_rain(&mut self) -> bool {
        self.sensor_hub.read_rain()
    }

    fn poll_external_humidity(&mut self) -> Option<u8> {
        channels::take_external_humidity()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn apply(&mut self, intent: &ActuatorIntent) {
        self.bus.flush(intent);
    }
}

// ── DisplayPort / TimePort ────────────────────────────────────

impl DisplayPort for HardwareAdapter {
    fn write_at(&mut self, row: u8, col: u8, text: &str) {
        self.lcd.write_at(row, col, text);
    }

    fn clear(&mut self) {
        self.lcd.clear();
    }
}

impl TimePort for HardwareAdapter {
    fn uptime_ms(&self) -> u64 {
        self.clock.uptime_ms()
    }

    fn current_hour(&self) -> Option<u8> {
        self.clock.current_hour()
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::bus::Bank;
    use crate::context::Actuator;

    fn board() -> HardwareAdapter {
        HardwareAdapter::new(
            SensorHub::on_board(),
            bus_on_board(),
            CharLcd::new(),
            Esp32TimeAdapter::new(),
        )
    }

    #[test]
    fn apply_flushes_every_bank() {
        let mut hw = board();
        let mut intent = ActuatorIntent::all_off();
        intent.set(Actuator::Pump1, true);
        intent.leds.set_all(true, false);
        hw.apply(&intent);

        let banks = hw.bus().banks();
        assert!(banks[Bank::Relays as usize][0]);
        assert!(banks[Bank::Leds1 as usize].iter().all(|b| *b));
    }

    #[test]
    fn display_writes_reach_the_panel() {
        let mut hw = board();
        hw.write_at(0, 0, "Hum:70% Temp:25C");
        assert_eq!(hw.lcd().row(0), "Hum:70% Temp:25C");
        hw.clear();
        assert_eq!(hw.lcd().row(0).trim(), "");
    }
}
