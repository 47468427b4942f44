//! BioControl firmware: main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter            LogEventSink     Esp32TimeAdapter  │
//! │  (Sensor+Actuator+Display)  (EventSink)      (TimePort)        │
//! │  weather worker ──▶ EXTERNAL_HUMIDITY    voice ──▶ COMMANDS    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Scheduler · Environment · Pump · Lighting · Display   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::time::Duration;

use anyhow::{anyhow, Result};
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::modem::Modem;
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::units::Hertz;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::sntp::EspSntp;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration as WifiCfg, EspWifi};
use log::{error, info, warn};

use biocontrol::adapters::hardware::{self, HardwareAdapter};
use biocontrol::adapters::log_sink::LogEventSink;
use biocontrol::adapters::time::Esp32TimeAdapter;
use biocontrol::adapters::weather;
use biocontrol::app::service::AppService;
use biocontrol::channels;
use biocontrol::config::SystemConfig;
use biocontrol::drivers::{hw_init, lcd::CharLcd};
use biocontrol::pins;
use biocontrol::sensors::SensorHub;

/// Station credentials, baked in at build time.
const WIFI_SSID: Option<&str> = option_env!("BIOCONTROL_WIFI_SSID");
const WIFI_PASS: Option<&str> = option_env!("BIOCONTROL_WIFI_PASS");
/// Full current-weather URL including coordinates and API key.
const WEATHER_URL: Option<&str> = option_env!("BIOCONTROL_WEATHER_URL");

/// Brazil local time (UTC-3), POSIX TZ syntax.
const LOCAL_TZ: &str = "<-03>3";
const LCD_I2C_HZ: u32 = 100_000;
/// Main-loop pause between ticks.
const LOOP_SLEEP_MS: u64 = 10;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  BioControl v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Peripherals ────────────────────────────────────────
    if let Err(e) = hw_init::init_peripherals() {
        error!("HAL init failed: {}, halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    let peripherals = Peripherals::take()?;
    let i2c = I2cDriver::new(
        peripherals.i2c0,
        peripherals.pins.gpio21,
        peripherals.pins.gpio22,
        &I2cConfig::new().baudrate(Hertz(LCD_I2C_HZ)),
    )?;
    let lcd = CharLcd::new(i2c, pins::LCD_I2C_ADDR)?;

    let mut hw = HardwareAdapter::new(
        SensorHub::on_board(),
        hardware::bus_on_board(),
        lcd,
        Esp32TimeAdapter::new(),
    );
    let mut log_sink = LogEventSink::new();

    // ── 3. Network collaborators ──────────────────────────────
    let config = SystemConfig::default();

    // Held for the life of the program; dropping either tears it down.
    let wifi = match (WIFI_SSID, WIFI_PASS) {
        (Some(ssid), Some(pass)) => match connect_wifi(peripherals.modem, ssid, pass) {
            Ok(wifi) => Some(wifi),
            Err(e) => {
                warn!("WiFi: {}, running without network", e);
                None
            }
        },
        _ => {
            warn!("WiFi: no credentials built in, running without network");
            None
        }
    };
    let _sntp = if wifi.is_some() {
        start_clock()
    } else {
        None
    };

    match (&wifi, WEATHER_URL) {
        (Some(_), Some(url)) => {
            if let Err(e) = weather::spawn_weather_worker(url, config.weather_interval_ms) {
                warn!("WEATHER: worker not started: {}", e);
            }
        }
        (Some(_), None) => warn!("WEATHER: no endpoint built in"),
        _ => {}
    }

    // ── 4. Application service ────────────────────────────────
    let mut app = AppService::new(config)?;
    app.start(&mut hw, &mut log_sink);

    info!("System ready. Entering control loop.");

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        while let Some(cmd) = channels::next_command() {
            app.handle_command(cmd, &mut log_sink);
        }
        app.tick(&mut hw, &mut log_sink);
        std::thread::sleep(Duration::from_millis(LOOP_SLEEP_MS));
    }
}

/// Join the configured access point and wait for an address.
fn connect_wifi(modem: Modem, ssid: &str, pass: &str) -> Result<BlockingWifi<EspWifi<'static>>> {
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;
    let mut wifi = BlockingWifi::wrap(EspWifi::new(modem, sysloop.clone(), Some(nvs))?, sysloop)?;

    wifi.set_configuration(&WifiCfg::Client(ClientConfiguration {
        ssid: ssid.try_into().map_err(|_| anyhow!("SSID too long"))?,
        password: pass.try_into().map_err(|_| anyhow!("password too long"))?,
        ..Default::default()
    }))?;
    wifi.start()?;
    wifi.connect()?;
    wifi.wait_netif_up()?;

    let ip = wifi.wifi().sta_netif().get_ip_info()?;
    info!("WiFi: connected to '{}', ip {}", ssid, ip.ip);
    Ok(wifi)
}

/// Start SNTP and switch the C library to local time.
fn start_clock() -> Option<EspSntp<'static>> {
    // SAFETY: single-threaded boot; no other thread reads the environment yet.
    unsafe {
        std::env::set_var("TZ", LOCAL_TZ);
        esp_idf_svc::sys::tzset();
    }
    match EspSntp::new_default() {
        Ok(sntp) => {
            info!("SNTP: started, lighting waits for first sync");
            Some(sntp)
        }
        Err(e) => {
            warn!("SNTP: {}, lighting schedule inactive", e);
            None
        }
    }
}
