//! GPIO / peripheral pin assignments for the controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// DHT11 air temperature / humidity, single-wire open drain.
pub const DHT_GPIO: i32 = 32;
/// Hall-effect flow switch on the pump outlet.  HIGH = flow.
pub const FLOW_GPIO: i32 = 2;
/// Upper float switch of the fish tank.  HIGH = water at the top.
pub const FLOAT_HIGH_GPIO: i32 = 34;
/// Lower float switch of the fish tank.  HIGH = water at the bottom.
pub const FLOAT_LOW_GPIO: i32 = 35;
/// Rain sensor digital output.  LOW = wet.
pub const RAIN_GPIO: i32 = 36;

// ---------------------------------------------------------------------------
// 74HC595 chains
// ---------------------------------------------------------------------------

/// Relay bank (pumps, valves, contactor, exhaust, spotlight, lamp).
pub const RELAY_DATA_GPIO: i32 = 4;
pub const RELAY_CLOCK_GPIO: i32 = 19;
pub const RELAY_LATCH_GPIO: i32 = 18;

/// LED bank 1 (red 0-7).
pub const LEDS1_DATA_GPIO: i32 = 17;
pub const LEDS1_CLOCK_GPIO: i32 = 16;
pub const LEDS1_LATCH_GPIO: i32 = 5;

/// LED bank 2 (red 8-11, blue 0-3).
pub const LEDS2_DATA_GPIO: i32 = 13;
pub const LEDS2_CLOCK_GPIO: i32 = 14;
pub const LEDS2_LATCH_GPIO: i32 = 27;

/// LED bank 3 (blue 4-11).
pub const LEDS3_DATA_GPIO: i32 = 33;
pub const LEDS3_CLOCK_GPIO: i32 = 25;
pub const LEDS3_LATCH_GPIO: i32 = 26;

// ---------------------------------------------------------------------------
// Character display (PCF8574 I2C backpack)
// ---------------------------------------------------------------------------

pub const LCD_SDA_GPIO: i32 = 21;
pub const LCD_SCL_GPIO: i32 = 22;
pub const LCD_I2C_ADDR: u8 = 0x27;

/// Every push-pull output driven by the firmware.
pub const OUTPUT_GPIOS: [i32; 12] = [
    RELAY_DATA_GPIO,
    RELAY_CLOCK_GPIO,
    RELAY_LATCH_GPIO,
    LEDS1_DATA_GPIO,
    LEDS1_CLOCK_GPIO,
    LEDS1_LATCH_GPIO,
    LEDS2_DATA_GPIO,
    LEDS2_CLOCK_GPIO,
    LEDS2_LATCH_GPIO,
    LEDS3_DATA_GPIO,
    LEDS3_CLOCK_GPIO,
    LEDS3_LATCH_GPIO,
];

/// Every digital input polled by the firmware.
pub const INPUT_GPIOS: [i32; 4] = [FLOW_GPIO, FLOAT_HIGH_GPIO, FLOAT_LOW_GPIO, RAIN_GPIO];
