//! 74HC595 actuator bus.
//!
//! Four independent shift-register chains share one wire protocol: the
//! relay bank and three LED banks.  Each chain takes one byte per update,
//! bit 7 = channel 0, shifted most-significant bit first.
//!
//! ```text
//!   latch ─┐                                    ┌──┐
//!          └────────────────────────────────────┘  └──
//!   clock      ┌┐  ┌┐  ┌┐  ┌┐  ┌┐  ┌┐  ┌┐  ┌┐
//!          ────┘└──┘└──┘└──┘└──┘└──┘└──┘└──┘└──────────
//!   data     b7  b6  b5  b4  b3  b2  b1  b0
//! ```
//!
//! Writes are fire-and-forget.  A pin error is logged and the sequence
//! carries on; there is no readback.  The bus never checks the vector it
//! is handed, so mutual exclusion between outputs is the controllers' job.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};
use log::warn;

use crate::context::{ActuatorIntent, LEDS_PER_COLOUR};

/// Latch pulse width (µs).
const LATCH_PULSE_US: u32 = 1;

/// Channels per chain.
pub const BANK_WIDTH: usize = 8;

/// Pack eight outputs into one byte, `bits[0]` in bit 7.
pub fn pack(bits: [bool; BANK_WIDTH]) -> u8 {
    bits.iter()
        .fold(0u8, |byte, &on| (byte << 1) | u8::from(on))
}

// ── Chain ─────────────────────────────────────────────────────

/// One daisy-chained 74HC595 group: data, clock and latch lines.
pub struct ShiftRegisterChain<P> {
    data: P,
    clock: P,
    latch: P,
}

impl<P: OutputPin> ShiftRegisterChain<P> {
    pub fn new(data: P, clock: P, latch: P) -> Self {
        Self { data, clock, latch }
    }

    /// Shift `bits` out and latch them onto the outputs.
    pub fn encode(&mut self, bits: [bool; BANK_WIDTH], delay: &mut impl DelayNs) {
        let byte = pack(bits);

        drive(&mut self.latch, false, "latch");
        for bit in (0..8).rev() {
            drive(&mut self.data, byte & (1 << bit) != 0, "data");
            drive(&mut self.clock, true, "clock");
            drive(&mut self.clock, false, "clock");
        }

        delay.delay_us(LATCH_PULSE_US);
        drive(&mut self.latch, true, "latch");
        delay.delay_us(LATCH_PULSE_US);
        drive(&mut self.latch, false, "latch");
    }
}

fn drive<P: OutputPin>(pin: &mut P, high: bool, line: &str) {
    let result = if high { pin.set_high() } else { pin.set_low() };
    if let Err(e) = result {
        warn!("BUS: {} pin write failed: {:?}", line, e.kind());
    }
}

// ── Bus ───────────────────────────────────────────────────────

/// Chain index on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Bank {
    Relays = 0,
    /// Red 0-7.
    Leds1 = 1,
    /// Red 8-11, blue 0-3.
    Leds2 = 2,
    /// Blue 4-11.
    Leds3 = 3,
}

impl Bank {
    pub const ALL: [Bank; 4] = [Self::Relays, Self::Leds1, Self::Leds2, Self::Leds3];
}

/// Owns every chain and the last byte image written to each.
pub struct ActuatorBus<P, D> {
    chains: [ShiftRegisterChain<P>; 4],
    banks: [[bool; BANK_WIDTH]; 4],
    delay: D,
}

impl<P: OutputPin, D: DelayNs> ActuatorBus<P, D> {
    /// `chains` in [`Bank`] order.
    pub fn new(chains: [ShiftRegisterChain<P>; 4], delay: D) -> Self {
        Self {
            chains,
            banks: [[false; BANK_WIDTH]; 4],
            delay,
        }
    }

    /// Write one bank immediately.
    pub fn encode(&mut self, bank: Bank, bits: [bool; BANK_WIDTH]) {
        let i = bank as usize;
        self.banks[i] = bits;
        self.chains[i].encode(bits, &mut self.delay);
    }

    /// Fill the bank buffers from `intent` and write all four chains.
    pub fn flush(&mut self, intent: &ActuatorIntent) {
        let images = bank_images(intent);
        for bank in Bank::ALL {
            self.encode(bank, images[bank as usize]);
        }
    }

    /// Last image written to each bank.
    pub fn banks(&self) -> &[[bool; BANK_WIDTH]; 4] {
        &self.banks
    }
}

/// Map the intent onto the four bank images.
pub fn bank_images(intent: &ActuatorIntent) -> [[bool; BANK_WIDTH]; 4] {
    let mut banks = [[false; BANK_WIDTH]; 4];
    banks[Bank::Relays as usize] = intent.relays();

    let red = &intent.leds.red;
    let blue = &intent.leds.blue;
    banks[Bank::Leds1 as usize].copy_from_slice(&red[..8]);
    banks[Bank::Leds2 as usize][..4].copy_from_slice(&red[8..LEDS_PER_COLOUR]);
    banks[Bank::Leds2 as usize][4..].copy_from_slice(&blue[..4]);
    banks[Bank::Leds3 as usize].copy_from_slice(&blue[4..LEDS_PER_COLOUR]);
    banks
}
