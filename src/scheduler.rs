//! Cooperative fixed-interval task scheduler.
//!
//! Every periodic job in the firmware shares one thread.  The main loop
//! calls [`Scheduler::tick`] with the current uptime; each task whose
//! interval has elapsed runs to completion, in registration order, through
//! the [`TaskRunner`] the caller supplies.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Main loop                             │
//! │                                                              │
//! │   now ──▶ Scheduler.tick(now, runner)                        │
//! │              │                                               │
//! │              ├── sensors     due? ──▶ runner.run_task()      │
//! │              ├── pump        due? ──▶ runner.run_task()      │
//! │              ├── environment due? ──▶ runner.run_task()      │
//! │              └── display     due? ──▶ runner.run_task()      │
//! │                                                              │
//! │   flush intent ──▶ ActuatorBus                               │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! `last_run` is stamped with the `now` the tick was called with, not
//! advanced by the interval, so periods drift forward by however long the
//! loop took to come around.  Task bodies must not block: one slow body
//! delays every task behind it.  A panicking body is not caught.

use heapless::Vec;
use log::{debug, info};

// ═══════════════════════════════════════════════════════════════
//  Task types
// ═══════════════════════════════════════════════════════════════

/// Executes the body of a due task.
///
/// The scheduler knows nothing about what a task does; it only decides
/// *when*.  The runner owns the shared context and dispatches on `task`.
pub trait TaskRunner<T> {
    /// Run `task` to completion.  `now_ms` is the tick's timestamp.
    fn run_task(&mut self, task: &T, now_ms: u64);
}

/// A single registered task.
#[derive(Debug, Clone)]
pub struct ScheduledTask<T> {
    /// Human-readable label (e.g., "sensors").
    pub label: &'static str,
    /// Minimum time between runs.
    pub interval_ms: u64,
    /// Timestamp of the last run.  Starts at zero (boot).
    pub last_run_ms: u64,
    /// Task identity handed to the runner.
    pub task: T,
}

impl<T> ScheduledTask<T> {
    /// True if the task should run at `now_ms`.
    pub fn is_due(&self, now_ms: u64) -> bool {
        now_ms.wrapping_sub(self.last_run_ms) >= self.interval_ms
    }
}

/// Returned by [`Scheduler::register`] when every slot is taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerFull;

impl core::fmt::Display for SchedulerFull {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "scheduler full")
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// The scheduler engine.  Fixed capacity `N`, stack allocated.
pub struct Scheduler<T, const N: usize> {
    tasks: Vec<ScheduledTask<T>, N>,
}

impl<T, const N: usize> Default for Scheduler<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Scheduler<T, N> {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Add a task.  Returns its slot index, or [`SchedulerFull`].
    pub fn register(
        &mut self,
        label: &'static str,
        interval_ms: u64,
        task: T,
    ) -> Result<usize, SchedulerFull> {
        let slot = self.tasks.len();
        self.tasks
            .push(ScheduledTask {
                label,
                interval_ms,
                last_run_ms: 0,
                task,
            })
            .map_err(|_| SchedulerFull)?;
        info!(
            "Scheduler: registered '{}' every {}ms at slot {}",
            label, interval_ms, slot
        );
        Ok(slot)
    }

    /// Run every due task, in registration order.  Returns how many ran.
    pub fn tick(&mut self, now_ms: u64, runner: &mut impl TaskRunner<T>) -> usize {
        let mut ran = 0;
        for entry in &mut self.tasks {
            if !entry.is_due(now_ms) {
                continue;
            }
            debug!("Scheduler: running '{}'", entry.label);
            runner.run_task(&entry.task, now_ms);
            entry.last_run_ms = now_ms;
            ran += 1;
        }
        ran
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Registered tasks, in registration order.
    pub fn tasks(&self) -> impl Iterator<Item = &ScheduledTask<T>> {
        self.tasks.iter()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    /// Test runner that records every dispatch.
    struct RecordingRunner {
        runs: std::vec::Vec<(&'static str, u64)>,
    }

    impl RecordingRunner {
        fn new() -> Self {
            Self {
                runs: std::vec::Vec::new(),
            }
        }
    }

    impl TaskRunner<&'static str> for RecordingRunner {
        fn run_task(&mut self, task: &&'static str, now_ms: u64) {
            self.runs.push((*task, now_ms));
        }
    }

    #[test]
    fn task_runs_once_interval_elapsed() {
        let mut sched: Scheduler<&'static str, 4> = Scheduler::new();
        let mut runner = RecordingRunner::new();
        sched.register("a", 1000, "a").unwrap();

        assert_eq!(sched.tick(999, &mut runner), 0);
        assert_eq!(sched.tick(1000, &mut runner), 1);
        assert_eq!(runner.runs, vec![("a", 1000)]);

        // Not again until another full interval.
        assert_eq!(sched.tick(1999, &mut runner), 0);
        assert_eq!(sched.tick(2000, &mut runner), 1);
    }

    #[test]
    fn last_run_stamped_with_actual_tick_time() {
        let mut sched: Scheduler<&'static str, 4> = Scheduler::new();
        let mut runner = RecordingRunner::new();
        sched.register("a", 1000, "a").unwrap();

        // Loop came around late; the next period counts from 1700.
        sched.tick(1700, &mut runner);
        assert_eq!(sched.tick(2000, &mut runner), 0);
        assert_eq!(sched.tick(2699, &mut runner), 0);
        assert_eq!(sched.tick(2700, &mut runner), 1);
    }

    #[test]
    fn due_tasks_run_in_registration_order() {
        let mut sched: Scheduler<&'static str, 4> = Scheduler::new();
        let mut runner = RecordingRunner::new();
        sched.register("slow", 500, "slow").unwrap();
        sched.register("fast", 100, "fast").unwrap();
        sched.register("rare", 10_000, "rare").unwrap();

        assert_eq!(sched.tick(500, &mut runner), 2);
        assert_eq!(runner.runs, vec![("slow", 500), ("fast", 500)]);
    }

    #[test]
    fn register_past_capacity_fails() {
        let mut sched: Scheduler<u8, 2> = Scheduler::new();
        assert_eq!(sched.register("a", 1, 0), Ok(0));
        assert_eq!(sched.register("b", 1, 1), Ok(1));
        assert_eq!(sched.register("c", 1, 2), Err(SchedulerFull));
        assert_eq!(sched.len(), 2);
    }

    #[test]
    fn empty_scheduler_runs_nothing() {
        let mut sched: Scheduler<&'static str, 2> = Scheduler::new();
        let mut runner = RecordingRunner::new();
        assert!(sched.is_empty());
        assert_eq!(sched.tick(u64::MAX / 2, &mut runner), 0);
    }
}
