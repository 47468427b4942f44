//! Outside-humidity collaborator.
//!
//! Polls an OpenWeather-style current-weather endpoint on its own thread
//! and publishes `main.humidity` through
//! [`EXTERNAL_HUMIDITY`](crate::channels::EXTERNAL_HUMIDITY).  The control
//! loop never waits on the network; a failed poll leaves the last value in
//! place.

use serde::Deserialize;

use crate::error::CommsError;

#[derive(Deserialize)]
struct WeatherBody {
    main: MainBlock,
}

#[derive(Deserialize)]
struct MainBlock {
    humidity: f32,
}

/// Extract relative humidity (%) from a current-weather response body.
pub fn parse_humidity(body: &[u8]) -> Result<u8, CommsError> {
    let parsed: WeatherBody =
        serde_json::from_slice(body).map_err(|_| CommsError::MalformedPayload)?;
    let h = parsed.main.humidity;
    if !(0.0..=100.0).contains(&h) {
        return Err(CommsError::MalformedPayload);
    }
    Ok(h.round() as u8)
}

#[cfg(target_os = "espidf")]
pub use worker::spawn_weather_worker;

#[cfg(target_os = "espidf")]
mod worker {
    use std::time::Duration;

    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};
    use esp_idf_svc::http::Method;
    use log::{debug, info, warn};

    use super::parse_humidity;
    use crate::channels;
    use crate::drivers::task_pin::{spawn_on_core, Core};
    use crate::error::{CommsError, Error};

    /// Largest response body accepted.
    const BODY_CAP: usize = 2048;

    /// Start the polling thread on the protocol core.
    pub fn spawn_weather_worker(
        url: &'static str,
        interval_ms: u64,
    ) -> Result<std::thread::JoinHandle<()>, Error> {
        spawn_on_core(Core::Pro, 4, 8, "weather\0", move || {
            info!("WEATHER: polling every {}s", interval_ms / 1000);
            loop {
                match fetch(url) {
                    Ok(h) => {
                        debug!("WEATHER: outside humidity {}%", h);
                        channels::publish_external_humidity(h);
                    }
                    Err(e) => warn!("WEATHER: poll failed: {}", e),
                }
                std::thread::sleep(Duration::from_millis(interval_ms));
            }
        })
    }

    fn fetch(url: &str) -> Result<u8, CommsError> {
        let mut conn = EspHttpConnection::new(&Configuration {
            crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
            ..Default::default()
        })
        .map_err(|_| CommsError::HttpRequestFailed)?;

        conn.initiate_request(Method::Get, url, &[])
            .map_err(|_| CommsError::HttpRequestFailed)?;
        conn.initiate_response()
            .map_err(|_| CommsError::HttpRequestFailed)?;
        if conn.status() != 200 {
            return Err(CommsError::HttpRequestFailed);
        }

        let mut body = [0u8; BODY_CAP];
        let mut len = 0;
        while len < BODY_CAP {
            let n = conn
                .read(&mut body[len..])
                .map_err(|_| CommsError::HttpRequestFailed)?;
            if n == 0 {
                break;
            }
            len += n;
        }
        parse_humidity(&body[..len])
    }
}
