//! ESP32 time adapter.
//!
//! Monotonic uptime for the task scheduler and the wall-clock hour for the
//! lighting window.
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` for
//!   host-side testing and simulation.

use crate::app::ports::TimePort;

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot.
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        // SAFETY: esp_timer is started by the IDF before app_main.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since the adapter was built.
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Current hour-of-day (0–23) from system clock. `None` if wall clock not synced (e.g. pre-NTP).
    #[cfg(target_os = "espidf")]
    pub fn current_hour(&self) -> Option<u8> {
        use core::ptr;
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        // Reject obviously unsynced time (e.g. before 2020-01-01)
        const EPOCH_2020: i64 = 1_577_836_800;
        if tv.tv_sec < EPOCH_2020 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        let hour = tm.tm_hour;
        u8::try_from(hour).ok().filter(|h| *h < 24)
    }

    /// Current hour-of-day.  On host, whatever [`sim_set_hour`] last stored.
    #[cfg(not(target_os = "espidf"))]
    pub fn current_hour(&self) -> Option<u8> {
        sim::hour()
    }
}

impl TimePort for Esp32TimeAdapter {
    fn uptime_ms(&self) -> u64 {
        Esp32TimeAdapter::uptime_ms(self)
    }

    fn current_hour(&self) -> Option<u8> {
        Esp32TimeAdapter::current_hour(self)
    }
}

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::sync::atomic::{AtomicU8, Ordering};

    /// 0xFF = unsynced.
    static SIM_HOUR: AtomicU8 = AtomicU8::new(0xFF);

    pub fn set(hour: Option<u8>) {
        SIM_HOUR.store(hour.filter(|h| *h < 24).unwrap_or(0xFF), Ordering::Relaxed);
    }

    pub fn hour() -> Option<u8> {
        Some(SIM_HOUR.load(Ordering::Relaxed)).filter(|h| *h < 24)
    }
}

/// Set the simulated wall-clock hour (`None` = not synced).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_hour(hour: Option<u8>) {
    sim::set(hour);
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;

    #[test]
    fn sim_hour_rejects_out_of_range() {
        let clock = Esp32TimeAdapter::new();
        sim_set_hour(Some(19));
        assert_eq!(clock.current_hour(), Some(19));
        sim_set_hour(Some(24));
        assert_eq!(clock.current_hour(), None);
        sim_set_hour(None);
        assert_eq!(TimePort::current_hour(&clock), None);
    }
}
