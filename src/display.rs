//! 2x16 character display renderer.
//!
//! Each row holds either static text or a [`ScrollWindow`].  The display
//! task calls [`DisplayRenderer::advance`] once per refresh; a scrolling
//! row moves one cell per call over the cycle `text + " "`:
//!
//! ```text
//!   cursor 0   |Irrigation valve| stuck open
//!   cursor 9   |valve stuck open| Irrigati...
//!   cursor 20  | Irrigation valv|
//! ```
//!
//! Text is folded to ASCII before it reaches the HD44780 character ROM.

use core::fmt::Write as _;

use heapless::String;

use crate::app::ports::DisplayPort;
use crate::context::ALERT_CAP;

pub const COLS: usize = 16;
pub const ROWS: usize = 2;

/// One rendered row.
pub type Line = String<COLS>;
/// Text held by a row, long enough for a full alert.
pub type RowText = String<ALERT_CAP>;

/// Visible slice of a row longer than the display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollWindow {
    text: RowText,
    cursor: usize,
}

impl ScrollWindow {
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RowContent {
    Static(RowText),
    Scroll(ScrollWindow),
}

#[derive(Debug, Default)]
pub struct DisplayRenderer {
    rows: [Option<RowContent>; ROWS],
}

impl DisplayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `text` at (`row`, `col`), clipped to the row.  No wrapping.
    pub fn draw(&self, surface: &mut impl DisplayPort, row: usize, col: usize, text: &str) {
        if row >= ROWS || col >= COLS {
            return;
        }
        let clipped: Line = ascii_fold(text).take(COLS - col).collect();
        surface.write_at(row as u8, col as u8, &clipped);
    }

    /// Assign `text` to `row`.  Text wider than the display scrolls.
    ///
    /// Re-assigning the text a row already shows keeps its scroll position.
    pub fn set_scroll(&mut self, row: usize, text: &str) {
        let Some(slot) = self.rows.get_mut(row) else {
            return;
        };
        let folded: RowText = ascii_fold(text).take(ALERT_CAP).collect();

        if let Some(RowContent::Scroll(window)) = slot {
            if window.text == folded {
                return;
            }
        }
        *slot = Some(if folded.len() > COLS {
            RowContent::Scroll(ScrollWindow {
                text: folded,
                cursor: 0,
            })
        } else {
            RowContent::Static(folded)
        });
    }

    /// Drop whatever `row` holds.
    pub fn clear_scroll(&mut self, row: usize) {
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = None;
        }
    }

    /// Render `row` and step its scroll window.
    pub fn advance(&mut self, surface: &mut impl DisplayPort, row: usize) {
        let Some(Some(content)) = self.rows.get_mut(row) else {
            return;
        };
        let line = match content {
            RowContent::Static(text) => pad(text),
            RowContent::Scroll(window) => {
                let line = scroll_window(&window.text, window.cursor, COLS);
                window.cursor += 1;
                if window.cursor > window.text.len() {
                    window.cursor = 0;
                }
                line
            }
        };
        surface.write_at(row as u8, 0, &line);
    }

    /// Scroll state of `row`, if it is scrolling.
    pub fn window(&self, row: usize) -> Option<&ScrollWindow> {
        match self.rows.get(row) {
            Some(Some(RowContent::Scroll(window))) => Some(window),
            _ => None,
        }
    }
}

/// `width` cells of the cycle `text + " "` starting at `cursor`.
pub fn scroll_window(text: &str, cursor: usize, width: usize) -> Line {
    let bytes = text.as_bytes();
    let period = bytes.len() + 1;
    (0..width.min(COLS))
        .map(|i| {
            let idx = (cursor + i) % period;
            bytes.get(idx).map_or(' ', |&b| char::from(b))
        })
        .collect()
}

/// Right-pad to the full display width.
fn pad(text: &str) -> Line {
    let mut line: Line = text.chars().take(COLS).collect();
    while line.push(' ').is_ok() {}
    line
}

fn ascii_fold(text: &str) -> impl Iterator<Item = char> + '_ {
    text.chars().map(|c| if c.is_ascii() { c } else { '?' })
}

// ── Status layout ─────────────────────────────────────────────

/// Row 0: `Hum:70% Temp:25C`.
pub fn climate_line(humidity_pct: u8, temperature_c: i16) -> RowText {
    let mut line = RowText::new();
    let _ = write!(line, "Hum:{}% Temp:{}C", humidity_pct, temperature_c);
    line
}

/// Row 1 when no alert is set: `Pump 1:05 min`.
pub fn pump_countdown_line(remaining_ms: u64) -> RowText {
    let secs = remaining_ms.div_ceil(1000);
    let mut line = RowText::new();
    let _ = write!(line, "Pump {}:{:02} min", secs / 60, secs % 60);
    line
}
