//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                    |
//! |------------|--------------------|--------------------------------|
//! | `hardware` | SensorPort         | DHT11, flow / float / rain GPIO|
//! |            | ActuatorPort       | 74HC595 relay + LED chains     |
//! |            | DisplayPort        | PCF8574 16x2 LCD               |
//! | `log_sink` | EventSink          | Serial log output              |
//! | `time`     | TimePort           | ESP32 system timer, SNTP clock |
//! | `weather`  | (feeds SensorPort) | HTTP current-weather endpoint  |

pub mod hardware;
pub mod log_sink;
pub mod time;
pub mod weather;
