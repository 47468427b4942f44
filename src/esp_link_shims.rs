//! ESP-IDF runtime symbol providers for third-party crates.
//!
//! `embassy-sync` statics in [`channels`](crate::channels) lock through
//! `critical-section`; on the device the lock is a process-wide mutex,
//! re-entrant per thread.  Host tests get the `std` implementation from
//! the dev-dependency instead.

use core::cell::{Cell, RefCell};
use std::sync::{Mutex, MutexGuard, PoisonError};

static CRITICAL_SECTION_MUTEX: Mutex<()> = Mutex::new(());

thread_local! {
    static DEPTH: Cell<u8> = const { Cell::new(0) };
    static GUARD: RefCell<Option<MutexGuard<'static, ()>>> = const { RefCell::new(None) };
}

struct EspCriticalSection;

critical_section::set_impl!(EspCriticalSection);

// SAFETY: the mutex serialises every thread; nesting on one thread only
// bumps the depth, and the guard drops when the outermost section ends.
unsafe impl critical_section::Impl for EspCriticalSection {
    unsafe fn acquire() -> critical_section::RawRestoreState {
        DEPTH.with(|depth| {
            if depth.get() == 0 {
                let lock = CRITICAL_SECTION_MUTEX
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                GUARD.with(|guard| *guard.borrow_mut() = Some(lock));
            }
            depth.set(depth.get().saturating_add(1));
        });
    }

    unsafe fn release(_restore: critical_section::RawRestoreState) {
        DEPTH.with(|depth| match depth.get() {
            0 => {}
            1 => {
                depth.set(0);
                GUARD.with(|guard| *guard.borrow_mut() = None);
            }
            d => depth.set(d - 1),
        });
    }
}
