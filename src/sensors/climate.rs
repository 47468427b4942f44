//! DHT11 air temperature / humidity sensor.
//!
//! Single-wire protocol on an open-drain GPIO with pull-up:
//!
//! ```text
//!  host  ──┐ 18 ms ┌─ 30 µs ─┐
//!          └───────┘         │
//!  sensor                    └─ 80 µs low ─ 80 µs high ─ 40 bits ─┘
//!  bit: 50 µs low, then high for ~26 µs (0) or ~70 µs (1)
//! ```
//!
//! Frame: humidity int, humidity dec, temperature int, temperature dec
//! (bit 7 = below zero), checksum.  Only the integer parts are used.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the line with ROM delays and the µs timer.
//! On host/test: returns values set through [`sim_set_climate`].

use crate::app::ports::ClimateSample;
use crate::error::SensorError;

/// Plausible DHT11 range; anything outside is a corrupted frame.
const TEMP_RANGE_C: core::ops::RangeInclusive<i16> = -20..=60;
const MAX_HUMIDITY_PCT: u8 = 100;

/// Validate and decode a 5-byte frame.
pub fn decode_frame(frame: &[u8; 5]) -> Result<ClimateSample, SensorError> {
    let sum = frame[..4]
        .iter()
        .fold(0u8, |acc, &b| acc.wrapping_add(b));
    if sum != frame[4] {
        return Err(SensorError::Checksum);
    }

    let humidity_pct = frame[0];
    let mut temperature_c = i16::from(frame[2]);
    if frame[3] & 0x80 != 0 {
        temperature_c = -temperature_c;
    }

    if humidity_pct > MAX_HUMIDITY_PCT || !TEMP_RANGE_C.contains(&temperature_c) {
        return Err(SensorError::OutOfRange);
    }
    Ok(ClimateSample {
        temperature_c,
        humidity_pct,
    })
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicBool, AtomicI16, AtomicU8, Ordering};

    static TEMPERATURE: AtomicI16 = AtomicI16::new(25);
    static HUMIDITY: AtomicU8 = AtomicU8::new(70);
    static FAIL: AtomicBool = AtomicBool::new(false);

    pub fn set(temperature_c: i16, humidity_pct: u8) {
        TEMPERATURE.store(temperature_c, Ordering::Relaxed);
        HUMIDITY.store(humidity_pct, Ordering::Relaxed);
    }

    pub fn set_failing(fail: bool) {
        FAIL.store(fail, Ordering::Relaxed);
    }

    pub fn frame() -> Option<[u8; 5]> {
        if FAIL.load(Ordering::Relaxed) {
            return None;
        }
        let t = TEMPERATURE.load(Ordering::Relaxed);
        let h = HUMIDITY.load(Ordering::Relaxed);
        let t_int = t.unsigned_abs() as u8;
        let t_dec = if t < 0 { 0x80 } else { 0 };
        let sum = h.wrapping_add(t_int).wrapping_add(t_dec);
        Some([h, 0, t_int, t_dec, sum])
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: i16, humidity_pct: u8) {
    sim::set(temperature_c, humidity_pct);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_read_failure(fail: bool) {
    sim::set_failing(fail);
}

// ── Driver ────────────────────────────────────────────────────

pub struct Dht11 {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    gpio: i32,
}

impl Dht11 {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }

    pub fn read(&mut self) -> Result<ClimateSample, SensorError> {
        let frame = self.capture()?;
        decode_frame(&frame)
    }

    #[cfg(not(target_os = "espidf"))]
    fn capture(&mut self) -> Result<[u8; 5], SensorError> {
        sim::frame().ok_or(SensorError::Timeout)
    }

    #[cfg(target_os = "espidf")]
    fn capture(&mut self) -> Result<[u8; 5], SensorError> {
        use crate::drivers::hw_init::gpio_write;
        use esp_idf_hal::delay::Ets;

        // Start signal.
        gpio_write(self.gpio, false);
        Ets::delay_ms(18);
        gpio_write(self.gpio, true);
        Ets::delay_us(30);

        self.wait_for_level(false, 200)?;
        self.wait_for_level(true, 200)?;
        self.wait_for_level(false, 200)?;

        let mut frame = [0u8; 5];
        for byte in &mut frame {
            for _ in 0..8 {
                self.wait_for_level(true, 80)?;
                let start = now_us();
                self.wait_for_level(false, 120)?;
                *byte = (*byte << 1) | u8::from(now_us() - start > 50);
            }
        }
        Ok(frame)
    }

    #[cfg(target_os = "espidf")]
    fn wait_for_level(&self, high: bool, timeout_us: i64) -> Result<(), SensorError> {
        let deadline = now_us() + timeout_us;
        while now_us() <= deadline {
            if crate::drivers::hw_init::gpio_read(self.gpio) == high {
                return Ok(());
            }
        }
        Err(SensorError::Timeout)
    }
}

#[cfg(target_os = "espidf")]
fn now_us() -> i64 {
    // SAFETY: reads the monotonic high-resolution timer; no side effects.
    unsafe { esp_idf_svc::sys::esp_timer_get_time() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_valid_frame() {
        let frame = [65, 0, 27, 3, 95];
        assert_eq!(
            decode_frame(&frame),
            Ok(ClimateSample {
                temperature_c: 27,
                humidity_pct: 65,
            })
        );
    }

    #[test]
    fn negative_temperature_flag() {
        let frame = [40, 0, 5, 0x80, 40u8.wrapping_add(5).wrapping_add(0x80)];
        assert_eq!(decode_frame(&frame).map(|s| s.temperature_c), Ok(-5));
    }

    #[test]
    fn checksum_mismatch_rejected() {
        assert_eq!(decode_frame(&[65, 0, 27, 3, 96]), Err(SensorError::Checksum));
    }

    #[test]
    fn implausible_values_rejected() {
        // 120 %RH with a correct checksum.
        assert_eq!(
            decode_frame(&[120, 0, 20, 0, 140]),
            Err(SensorError::OutOfRange)
        );
    }
}
