//! System configuration parameters
//!
//! All tunable parameters for the greenhouse controller.  Values are
//! compile-time defaults; there is no runtime reload and no persistent store.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Temperature (°C) ---
    /// Above this the exhaust is started.
    pub temp_max_c: i16,
    /// Below this heat assist is engaged.
    pub temp_min_c: i16,
    /// Dead band on both sides of the ideal range.
    pub temp_margin_c: i16,

    // --- Humidity (%RH) ---
    /// At or above this the air conditioner dehumidifies.
    pub humidity_max_pct: u8,
    /// Above this (and below `humidity_max_pct`) the exhaust vents.
    pub humidity_exhaust_pct: u8,
    /// Venting stops once humidity drops this far below `humidity_exhaust_pct`.
    pub humidity_clear_margin_pct: u8,

    // --- Exhaust escalation ---
    /// Maximum exhaust run time before the air conditioner takes over (ms).
    pub exhaust_timeout_ms: u64,

    // --- Pump duty cycle ---
    /// Length of one pump phase; the pump task runs at this interval (ms).
    pub pump_interval_ms: u64,
    /// Number of pump intervals spent off for every interval on.
    pub pump_off_multiplier: u8,
    /// Enable secondary-pump failover on missing flow.
    pub pump_failover: bool,
    /// Time a pump must run before a missing flow counts as a failure (ms).
    pub flow_settle_ms: u64,

    // --- Irrigation ---
    /// Irrigation task interval; the valve stays open for one interval (ms).
    pub irrigation_interval_ms: u64,
    /// Open the valve once every N irrigation calls.
    pub irrigation_multiplier: u8,

    // --- Lighting (hour of day, inclusive) ---
    pub light_on_hour: u8,
    pub light_off_hour: u8,

    // --- Task intervals ---
    /// Sensor read interval (milliseconds)
    pub sensor_interval_ms: u64,
    /// Display refresh interval (milliseconds)
    pub display_interval_ms: u64,
    /// Environment controller interval (milliseconds)
    pub environment_interval_ms: u64,
    /// Lighting schedule check interval (milliseconds)
    pub lighting_interval_ms: u64,
    /// Tank float switch check interval (milliseconds)
    pub tank_interval_ms: u64,
    /// Flow check interval while failover is enabled (milliseconds)
    pub flow_check_interval_ms: u64,
    /// Weather collaborator poll interval (milliseconds)
    pub weather_interval_ms: u64,

    // --- Self test ---
    /// On and off time of each actuator during the boot self test (ms).
    pub self_test_step_ms: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Temperature
            temp_max_c: 30,
            temp_min_c: 20,
            temp_margin_c: 2,

            // Humidity
            humidity_max_pct: 95,
            humidity_exhaust_pct: 90,
            humidity_clear_margin_pct: 5,

            // Escalation
            exhaust_timeout_ms: 60 * 60 * 1000, // 1 h

            // Pump
            pump_interval_ms: 60 * 1000,
            pump_off_multiplier: 2,
            pump_failover: false,
            flow_settle_ms: 1000,

            // Irrigation
            irrigation_interval_ms: 60 * 1000,
            irrigation_multiplier: 2,

            // Lighting
            light_on_hour: 8,
            light_off_hour: 21,

            // Timing
            sensor_interval_ms: 2000,
            display_interval_ms: 500,
            environment_interval_ms: 60 * 1000,
            lighting_interval_ms: 3 * 60 * 1000,
            tank_interval_ms: 5000,
            flow_check_interval_ms: 1000,
            weather_interval_ms: 60 * 1000,

            self_test_step_ms: 100,
        }
    }
}

impl SystemConfig {
    /// Lower edge of the ideal temperature band.
    pub fn ideal_low_c(&self) -> i16 {
        self.temp_min_c + self.temp_margin_c
    }

    /// Upper edge of the ideal temperature band.
    pub fn ideal_high_c(&self) -> i16 {
        self.temp_max_c - self.temp_margin_c
    }

    /// Humidity at or below which venting is cleared.
    pub fn humidity_clear_pct(&self) -> u8 {
        self.humidity_exhaust_pct
            .saturating_sub(self.humidity_clear_margin_pct)
    }

    /// Reject settings that would make the controllers chatter or stall.
    pub fn validate(&self) -> Result<(), Error> {
        if self.temp_margin_c < 0 {
            return Err(Error::Config("temperature margin must not be negative"));
        }
        if self.ideal_low_c() > self.ideal_high_c() {
            return Err(Error::Config("ideal temperature band is empty"));
        }
        if self.humidity_exhaust_pct >= self.humidity_max_pct || self.humidity_max_pct > 100 {
            return Err(Error::Config("humidity thresholds out of order"));
        }
        if self.light_on_hour > 23 || self.light_off_hour > 23 {
            return Err(Error::Config("lighting hour out of range"));
        }
        if self.pump_off_multiplier == 0 || self.irrigation_multiplier == 0 {
            return Err(Error::Config("multiplier must be at least 1"));
        }
        let intervals = [
            self.pump_interval_ms,
            self.irrigation_interval_ms,
            self.sensor_interval_ms,
            self.display_interval_ms,
            self.environment_interval_ms,
            self.lighting_interval_ms,
            self.tank_interval_ms,
            self.flow_check_interval_ms,
        ];
        if intervals.contains(&0) {
            return Err(Error::Config("task interval must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = SystemConfig::default();
        assert!(c.validate().is_ok());
        assert!(c.temp_max_c > c.temp_min_c);
        assert!(c.humidity_max_pct > c.humidity_exhaust_pct);
        assert!(c.light_on_hour < c.light_off_hour);
    }

    #[test]
    fn ideal_band_uses_margin() {
        let c = SystemConfig::default();
        assert_eq!(c.ideal_low_c(), 22);
        assert_eq!(c.ideal_high_c(), 28);
        assert_eq!(c.humidity_clear_pct(), 85);
    }

    #[test]
    fn empty_ideal_band_rejected() {
        let c = SystemConfig {
            temp_margin_c: 6,
            ..SystemConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(Error::Config("ideal temperature band is empty"))
        );
    }

    #[test]
    fn zero_interval_rejected() {
        let c = SystemConfig {
            display_interval_ms: 0,
            ..SystemConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let c = SystemConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: SystemConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c, c2);
    }
}
