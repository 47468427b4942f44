//! Worker threads pinned to an ESP32 core.
//!
//! On the device the pthread config set by `esp_pthread_set_cfg()` is
//! consumed by the next spawn from the calling thread.  On host the
//! core and priority are ignored.

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// PRO_CPU: Wi-Fi, lwIP and the weather poller.
    Pro = 0,
    /// APP_CPU: the control loop.
    App = 1,
}

/// `name` is NUL-terminated for FreeRTOS, e.g. `"weather\0"`.
pub fn spawn_on_core(
    core: Core,
    priority: u8,
    stack_kb: usize,
    name: &'static str,
    f: impl FnOnce() + Send + 'static,
) -> Result<std::thread::JoinHandle<()>, Error> {
    let label = thread_label(name);
    configure_next_thread(core, priority, stack_kb, name)?;
    log::info!("TASK: '{}' on {:?} (prio {}, {} KB)", label, core, priority, stack_kb);

    std::thread::Builder::new()
        .name(label.into())
        .stack_size(stack_kb * 1024)
        .spawn(f)
        .map_err(|_| Error::Init("worker thread spawn failed"))
}

fn thread_label(name: &'static str) -> &'static str {
    name.trim_end_matches('\0')
}

#[cfg(target_os = "espidf")]
fn configure_next_thread(core: Core, priority: u8, stack_kb: usize, name: &'static str) -> Result<(), Error> {
    // SAFETY: the default config is fully initialised and `name` is a
    // 'static NUL-terminated string.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = core as i32;
        cfg.prio = i32::from(priority);
        cfg.stack_size = (stack_kb * 1024) as i32;
        cfg.thread_name = name.as_ptr().cast();
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(Error::Init("esp_pthread_set_cfg failed"));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn configure_next_thread(_core: Core, _priority: u8, _stack_kb: usize, _name: &'static str) -> Result<(), Error> {
    Ok(())
}
