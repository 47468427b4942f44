//! HD44780 16x2 character LCD behind a PCF8574 I2C backpack.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: `hd44780-driver` runs the 4-bit wake-up and framing over
//! `esp-idf-hal`'s I2C master.
//! On host/test: keeps an in-memory frame of the two rows.

use crate::display::{COLS, ROWS};

/// DDRAM address of the first cell of each row.
const ROW_OFFSETS: [u8; ROWS] = [0x00, 0x40];

/// DDRAM address of (row, col).  Out-of-range rows and columns clamp.
pub fn cursor_address(row: u8, col: u8) -> u8 {
    let row = usize::from(row).min(ROWS - 1);
    ROW_OFFSETS[row] + col.min(COLS as u8 - 1)
}

#[cfg(target_os = "espidf")]
mod panel {
    use esp_idf_hal::delay::Ets;
    use esp_idf_hal::i2c::I2cDriver;
    use hd44780_driver::bus::I2CBus;
    use hd44780_driver::{Cursor, CursorBlink, Display, DisplayMode, HD44780};
    use log::{info, warn};

    use super::cursor_address;
    use crate::drivers::hw_init::HwInitError;

    pub struct CharLcd {
        lcd: HD44780<I2CBus<I2cDriver<'static>>>,
    }

    impl CharLcd {
        pub fn new(i2c: I2cDriver<'static>, addr: u8) -> Result<Self, HwInitError> {
            let mut delay = Ets;
            let mut lcd = HD44780::new_i2c(i2c, addr, &mut delay)
                .map_err(|_| HwInitError::LcdInitFailed)?;
            lcd.reset(&mut delay).map_err(|_| HwInitError::LcdInitFailed)?;
            lcd.set_display_mode(
                DisplayMode {
                    display: Display::On,
                    cursor_visibility: Cursor::Invisible,
                    cursor_blink: CursorBlink::Off,
                },
                &mut delay,
            )
            .map_err(|_| HwInitError::LcdInitFailed)?;
            lcd.clear(&mut delay).map_err(|_| HwInitError::LcdInitFailed)?;
            info!("LCD: ready at 0x{:02X}", addr);
            Ok(Self { lcd })
        }

        pub fn write_at(&mut self, row: u8, col: u8, text: &str) {
            let mut delay = Ets;
            let result = self
                .lcd
                .set_cursor_pos(cursor_address(row, col), &mut delay)
                .and_then(|()| self.lcd.write_str(text, &mut delay));
            if result.is_err() {
                warn!("LCD: write to row {} failed", row);
            }
        }

        pub fn clear(&mut self) {
            if self.lcd.clear(&mut Ets).is_err() {
                warn!("LCD: clear failed");
            }
        }
    }
}

#[cfg(not(target_os = "espidf"))]
mod panel {
    use super::{COLS, ROWS};

    /// In-memory panel: the last text written to each cell.
    pub struct CharLcd {
        frame: [[u8; COLS]; ROWS],
    }

    impl Default for CharLcd {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CharLcd {
        pub fn new() -> Self {
            Self {
                frame: [[b' '; COLS]; ROWS],
            }
        }

        pub fn write_at(&mut self, row: u8, col: u8, text: &str) {
            let Some(cells) = self.frame.get_mut(usize::from(row)) else {
                return;
            };
            let start = usize::from(col);
            for (cell, b) in cells.iter_mut().skip(start).zip(text.bytes()) {
                *cell = b;
            }
        }

        pub fn clear(&mut self) {
            self.frame = [[b' '; COLS]; ROWS];
        }

        /// Current contents of `row`.
        pub fn row(&self, row: usize) -> &str {
            self.frame
                .get(row)
                .and_then(|cells| core::str::from_utf8(cells).ok())
                .unwrap_or("")
        }
    }
}

pub use panel::CharLcd;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_addresses_rows() {
        assert_eq!(cursor_address(0, 0), 0x00);
        assert_eq!(cursor_address(1, 4), 0x44);
        assert_eq!(cursor_address(1, 40), 0x4F);
        assert_eq!(cursor_address(5, 0), 0x40);
    }

    #[cfg(not(target_os = "espidf"))]
    #[test]
    fn sim_panel_keeps_frame() {
        let mut lcd = CharLcd::new();
        lcd.write_at(1, 3, "Pump");
        assert_eq!(lcd.row(1), "   Pump         ");
        lcd.clear();
        assert_eq!(lcd.row(1), "                ");
    }
}
