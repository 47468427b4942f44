//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every local sensor driver.  The hardware adapter hands
//! its readings to the sensor task through the
//! [`SensorPort`](crate::app::ports::SensorPort).

pub mod climate;
pub mod flow;
pub mod water_level;

use log::debug;

use crate::app::ports::ClimateSample;
use crate::context::FloatSwitches;
use crate::error::SensorError;
use crate::pins;
use climate::Dht11;
use flow::FlowSwitch;
use water_level::{FloatSwitchPair, RainSensor};

/// Aggregates all sensor drivers.
pub struct SensorHub {
    pub climate: Dht11,
    pub flow: FlowSwitch,
    pub floats: FloatSwitchPair,
    pub rain: RainSensor,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(climate: Dht11, flow: FlowSwitch, floats: FloatSwitchPair, rain: RainSensor) -> Self {
        Self {
            climate,
            flow,
            floats,
            rain,
        }
    }

    /// Hub wired to the board's pin map.
    pub fn on_board() -> Self {
        Self::new(
            Dht11::new(pins::DHT_GPIO),
            FlowSwitch::new(pins::FLOW_GPIO),
            FloatSwitchPair::new(pins::FLOAT_HIGH_GPIO, pins::FLOAT_LOW_GPIO),
            RainSensor::new(pins::RAIN_GPIO),
        )
    }

    pub fn read_climate(&mut self) -> Result<ClimateSample, SensorError> {
        let sample = self.climate.read()?;
        debug!(
            "SENSORS: T={}C H={}%",
            sample.temperature_c, sample.humidity_pct
        );
        Ok(sample)
    }

    pub fn read_flow(&self) -> bool {
        self.flow.flowing()
    }

    pub fn read_floats(&self) -> FloatSwitches {
        self.floats.read()
    }

    pub fn read_rain(&self) -> bool {
        self.rain.wet()
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn hub_reports_simulated_inputs() {
        climate::sim_set_climate(-4, 55);
        flow::sim_set_flow(true);
        water_level::sim_set_floats(FloatSwitches { high: true, low: true });
        water_level::sim_set_rain(true);

        let mut hub = SensorHub::on_board();
        assert_eq!(
            hub.read_climate(),
            Ok(ClimateSample {
                temperature_c: -4,
                humidity_pct: 55,
            })
        );
        assert!(hub.read_flow());
        assert_eq!(hub.read_floats(), FloatSwitches { high: true, low: true });
        assert!(hub.read_rain());

        climate::sim_set_read_failure(true);
        assert_eq!(hub.read_climate(), Err(SensorError::Timeout));
        climate::sim_set_read_failure(false);
    }
}
